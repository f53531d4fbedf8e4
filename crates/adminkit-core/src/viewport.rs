#![forbid(unsafe_code)]

//! Compact/wide classification of the layout viewport.

/// Default widest viewport, in CSS pixels, still treated as compact.
pub const DEFAULT_COMPACT_MAX_WIDTH: f64 = 1024.0;

/// Layout class of the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportMode {
    /// Narrow screens: the filter panel collapses behind a toggle.
    Compact,
    /// Desktop layout: the filter panel renders in normal flow.
    Wide,
}

impl ViewportMode {
    /// Classify `width` against `compact_max_width` (inclusive).
    ///
    /// Non-finite widths are treated as wide.
    #[must_use]
    pub fn classify(width: f64, compact_max_width: f64) -> Self {
        if width.is_finite() && width <= compact_max_width {
            Self::Compact
        } else {
            Self::Wide
        }
    }

    #[must_use]
    pub const fn is_compact(self) -> bool {
        matches!(self, Self::Compact)
    }
}

/// `true` when `width` is at most 1024px.
#[must_use]
pub fn is_compact(width: f64) -> bool {
    ViewportMode::classify(width, DEFAULT_COMPACT_MAX_WIDTH).is_compact()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn breakpoint_is_inclusive() {
        assert!(is_compact(1024.0));
        assert!(!is_compact(1024.5));
        assert!(is_compact(0.0));
        assert!(!is_compact(1920.0));
    }

    #[test]
    fn nan_is_wide() {
        assert_eq!(ViewportMode::classify(f64::NAN, 1024.0), ViewportMode::Wide);
    }

    #[test]
    fn custom_breakpoint() {
        assert_eq!(ViewportMode::classify(900.0, 768.0), ViewportMode::Wide);
        assert_eq!(ViewportMode::classify(768.0, 768.0), ViewportMode::Compact);
    }

    proptest! {
        #[test]
        fn compact_iff_at_most_breakpoint(width in 0.0f64..10_000.0) {
            prop_assert_eq!(is_compact(width), width <= 1024.0);
        }

        #[test]
        fn classification_is_deterministic(width in any::<f64>()) {
            prop_assert_eq!(
                ViewportMode::classify(width, DEFAULT_COMPACT_MAX_WIDTH),
                ViewportMode::classify(width, DEFAULT_COMPACT_MAX_WIDTH)
            );
        }
    }
}

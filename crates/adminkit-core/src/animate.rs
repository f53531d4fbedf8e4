#![forbid(unsafe_code)]

//! Staggered fade/slide-in for result rows and dashboard cards.
//!
//! Each collection is hidden immediately with a per-element transition
//! delay of `min(index * step, cap)`. The reveal waits for the next
//! animation frame so the browser commits the hidden state first; after
//! that frame the elements are never touched again.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::selectors::{Landmark, resolve_all};

/// Timing and offset of one staggered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerConfig {
    /// Delay added per element position.
    pub step_ms: u64,
    /// Upper bound of any element's delay.
    pub cap_ms: u64,
    /// Starting vertical offset in pixels.
    pub offset_px: u32,
    /// Duration of the opacity and transform transitions.
    pub duration_ms: u64,
}

impl StaggerConfig {
    /// Results table rows.
    pub const ROWS: Self = Self {
        step_ms: 25,
        cap_ms: 400,
        offset_px: 6,
        duration_ms: 300,
    };

    /// Dashboard and content cards.
    pub const CARDS: Self = Self {
        step_ms: 60,
        cap_ms: 500,
        offset_px: 10,
        duration_ms: 400,
    };

    #[must_use]
    pub fn delay(&self, index: usize) -> Duration {
        stagger_delay(index, self.step_ms, self.cap_ms)
    }

    fn transition(&self) -> String {
        let secs = format_seconds(self.duration_ms);
        format!("opacity {secs} ease, transform {secs} ease")
    }
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self::ROWS
    }
}

/// `min(index * step_ms, cap_ms)`, saturating.
#[must_use]
pub fn stagger_delay(index: usize, step_ms: u64, cap_ms: u64) -> Duration {
    let index = u64::try_from(index).unwrap_or(u64::MAX);
    Duration::from_millis(index.saturating_mul(step_ms).min(cap_ms))
}

/// `300` -> `"0.3s"`, `1250` -> `"1.25s"`.
pub(crate) fn format_seconds(ms: u64) -> String {
    let whole = ms / 1000;
    let frac = ms % 1000;
    if frac == 0 {
        return format!("{whole}s");
    }
    let digits = format!("{frac:03}");
    format!("{whole}.{}s", digits.trim_end_matches('0'))
}

/// Elements hidden this page-ready, waiting for their reveal frame.
#[derive(Debug, Clone)]
pub struct EntranceAnimator<N> {
    pending: Vec<N>,
    revealed: usize,
}

impl<N> Default for EntranceAnimator<N> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            revealed: 0,
        }
    }
}

impl<N: Clone> EntranceAnimator<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Some element still waits for its reveal frame.
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Elements revealed so far.
    #[must_use]
    pub const fn revealed(&self) -> usize {
        self.revealed
    }

    /// Hide every element of `landmark` and queue it for reveal.
    ///
    /// Returns the number of elements staged. Reduced motion is checked by
    /// the caller once for all collections.
    pub fn stage<P>(&mut self, page: &mut P, landmark: Landmark, config: &StaggerConfig) -> usize
    where
        P: Page<Node = N> + ?Sized,
    {
        let elements = resolve_all(page, landmark);
        let transition = config.transition();
        let hidden = format!("translateY({}px)", config.offset_px);
        for (index, element) in elements.iter().enumerate() {
            let delay = config.delay(index);
            page.set_style(element, "opacity", "0");
            page.set_style(element, "transform", &hidden);
            page.set_style(element, "transition", &transition);
            page.set_style(element, "transition-delay", &format!("{}ms", delay.as_millis()));
            tracing::trace!(?landmark, index, delay_ms = delay.as_millis() as u64, "staged");
        }
        let staged = elements.len();
        self.pending.extend(elements);
        staged
    }

    /// Reveal everything staged before this frame.
    pub fn on_animation_frame<P>(&mut self, page: &mut P) -> usize
    where
        P: Page<Node = N> + ?Sized,
    {
        let batch = std::mem::take(&mut self.pending);
        for element in &batch {
            page.set_style(element, "opacity", "1");
            page.set_style(element, "transform", "translateY(0)");
        }
        self.revealed += batch.len();
        batch.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_page::MemoryPage;
    use proptest::prelude::*;

    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn row_and_card_curves() {
        let rows = StaggerConfig::ROWS;
        assert_eq!(rows.delay(0), ms(0));
        assert_eq!(rows.delay(3), ms(75));
        assert_eq!(rows.delay(16), ms(400));
        assert_eq!(rows.delay(17), ms(400));
        let cards = StaggerConfig::CARDS;
        assert_eq!(cards.delay(8), ms(480));
        assert_eq!(cards.delay(9), ms(500));
    }

    #[test]
    fn seconds_formatting() {
        assert_eq!(format_seconds(300), "0.3s");
        assert_eq!(format_seconds(400), "0.4s");
        assert_eq!(format_seconds(500), "0.5s");
        assert_eq!(format_seconds(1250), "1.25s");
        assert_eq!(format_seconds(2000), "2s");
        assert_eq!(format_seconds(5), "0.005s");
    }

    #[test]
    fn stage_then_reveal_on_next_frame() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let table = page.add_element(&body, "table#result_list");
        let tbody = page.add_element(&table, "tbody");
        let rows: Vec<_> = (0..3).map(|_| page.add_element(&tbody, "tr")).collect();

        let mut animator = EntranceAnimator::new();
        assert_eq!(animator.stage(&mut page, Landmark::ResultRows, &StaggerConfig::ROWS), 3);
        assert!(animator.has_pending_frame());
        assert_eq!(page.style(&rows[0], "opacity"), "0");
        assert_eq!(page.style(&rows[2], "transform"), "translateY(6px)");
        assert_eq!(
            page.style(&rows[1], "transition"),
            "opacity 0.3s ease, transform 0.3s ease"
        );
        assert_eq!(page.style(&rows[2], "transition-delay"), "50ms");

        assert_eq!(animator.on_animation_frame(&mut page), 3);
        assert!(!animator.has_pending_frame());
        for row in &rows {
            assert_eq!(page.style(row, "opacity"), "1");
            assert_eq!(page.style(row, "transform"), "translateY(0)");
        }

        let before = page.mutation_count();
        assert_eq!(animator.on_animation_frame(&mut page), 0);
        assert_eq!(page.mutation_count(), before);
        assert_eq!(animator.revealed(), 3);
    }

    proptest! {
        #[test]
        fn delays_are_monotone_and_capped(
            step in 0u64..1_000,
            cap in 0u64..5_000,
            len in 1usize..200,
        ) {
            prop_assert_eq!(stagger_delay(0, step, cap), Duration::ZERO);
            let mut previous = Duration::ZERO;
            for index in 0..len {
                let delay = stagger_delay(index, step, cap);
                prop_assert!(delay >= previous);
                prop_assert!(delay <= ms(cap));
                previous = delay;
            }
        }

        #[test]
        fn huge_indices_saturate(index in any::<usize>()) {
            prop_assert!(stagger_delay(index, u64::MAX, 400) <= ms(400));
        }
    }
}

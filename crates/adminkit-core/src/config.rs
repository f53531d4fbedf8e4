#![forbid(unsafe_code)]

//! Configuration for the whole behavior layer.
//!
//! Every field has a default matching the admin theme's stock behavior, so
//! `EnhanceConfig::default()` needs no page-supplied data. Hosts may load
//! overrides from JSON; missing keys keep their defaults.
//!
//! ```json
//! {
//!   "viewport": { "compact_max_width": 992 },
//!   "messages": { "dismiss_after_ms": 8000 },
//!   "nav": { "matching": "segment" },
//!   "log_level": "debug"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::animate::StaggerConfig;
use crate::editor::EditorConfig;
use crate::messages::MessageConfig;
use crate::nav::NavConfig;
use crate::panel::FilterToggleConfig;
use crate::search_hint::SearchHintConfig;
use crate::submit_guard::SubmitGuardConfig;
use crate::viewport::DEFAULT_COMPACT_MAX_WIDTH;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Widest viewport, in CSS pixels, treated as compact.
    pub compact_max_width: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            compact_max_width: DEFAULT_COMPACT_MAX_WIDTH,
        }
    }
}

/// Top-level configuration of [`crate::Enhancer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub viewport: ViewportConfig,
    /// Results-table row animation.
    pub rows: StaggerConfig,
    /// Dashboard card animation.
    pub cards: StaggerConfig,
    pub messages: MessageConfig,
    pub submit: SubmitGuardConfig,
    pub filter_toggle: FilterToggleConfig,
    pub search_hint: SearchHintConfig,
    pub nav: NavConfig,
    pub editor: EditorConfig,
    /// Minimum level of log events the host forwards to the console.
    pub log_level: String,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            rows: StaggerConfig::ROWS,
            cards: StaggerConfig::CARDS,
            messages: MessageConfig::default(),
            submit: SubmitGuardConfig::default(),
            filter_toggle: FilterToggleConfig::default(),
            search_hint: SearchHintConfig::default(),
            nav: NavConfig::default(),
            editor: EditorConfig::default(),
            log_level: "info".to_owned(),
        }
    }
}

impl EnhanceConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Returns every problem found. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let width = self.viewport.compact_max_width;
        if !width.is_finite() || width < 0.0 {
            errors.push(format!(
                "viewport.compact_max_width must be a non-negative number, got {width}"
            ));
        }

        for (name, stagger) in [("rows", &self.rows), ("cards", &self.cards)] {
            if stagger.cap_ms < stagger.step_ms {
                errors.push(format!(
                    "{name}.cap_ms ({}) must be >= {name}.step_ms ({})",
                    stagger.cap_ms, stagger.step_ms
                ));
            }
        }

        if self.messages.remove_after_fade_ms < self.messages.fade_ms {
            errors.push(format!(
                "messages.remove_after_fade_ms ({}) must be >= messages.fade_ms ({})",
                self.messages.remove_after_fade_ms, self.messages.fade_ms
            ));
        }

        if self.submit.reset_after_ms == 0 {
            errors.push("submit.reset_after_ms must be > 0".into());
        }
        if self.submit.class_name.trim().is_empty() || self.submit.class_name.contains(' ') {
            errors.push(format!(
                "submit.class_name must be a single class, got `{}`",
                self.submit.class_name
            ));
        }

        if self.editor.enabled {
            errors.extend(self.editor.validate());
        }

        if !LOG_LEVELS
            .iter()
            .any(|level| level.eq_ignore_ascii_case(self.log_level.trim()))
        {
            errors.push(format!("log_level `{}` is not a known level", self.log_level));
        }

        errors
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::NavMatch;

    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = EnhanceConfig::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.viewport.compact_max_width, 1024.0);
        assert_eq!(config.rows.step_ms, 25);
        assert_eq!(config.cards.cap_ms, 500);
        assert_eq!(config.messages.dismiss_after_ms, 5000);
        assert_eq!(config.submit.reset_after_ms, 8000);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EnhanceConfig::from_json_str(
            r#"{ "messages": { "dismiss_after_ms": 8000 }, "nav": { "matching": "segment" } }"#,
        )
        .unwrap();
        assert_eq!(config.messages.dismiss_after_ms, 8000);
        assert_eq!(config.messages.fade_ms, 500);
        assert_eq!(config.nav.matching, NavMatch::Segment);
        assert_eq!(config.rows, StaggerConfig::ROWS);
        assert_eq!(config.filter_toggle.label, "Filtres");
    }

    #[test]
    fn empty_object_equals_default() {
        assert_eq!(
            EnhanceConfig::from_json_str("{}").unwrap(),
            EnhanceConfig::default()
        );
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = EnhanceConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn validation_collects_every_problem() {
        let err = EnhanceConfig::from_json_str(
            r#"{
                "rows": { "step_ms": 50, "cap_ms": 10 },
                "messages": { "fade_ms": 900 },
                "submit": { "reset_after_ms": 0, "class_name": "a b" },
                "log_level": "loud"
            }"#,
        )
        .unwrap_err();
        let ConfigError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 5, "{errors:?}");
    }

    #[test]
    fn disabled_editor_is_not_validated() {
        let mut config = EnhanceConfig::default();
        config.editor.selector.clear();
        assert_eq!(config.validate().len(), 1);
        config.editor.enabled = false;
        assert!(config.validate().is_empty());
    }
}

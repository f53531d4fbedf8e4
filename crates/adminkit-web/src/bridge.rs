#![forbid(unsafe_code)]

//! Translation between browser values and the enhancer's host-driven API.

use core::time::Duration;

use adminkit_core::{ConfigError, EnhanceConfig, KeyInput, Modifiers};

/// Id of the `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "adminkit-config";

/// Build a [`KeyInput`] from a `KeyboardEvent`'s `key` and modifier flags.
#[must_use]
pub fn key_input(key: &str, shift: bool, alt: bool, ctrl: bool, meta: bool) -> KeyInput {
    let mut modifiers = Modifiers::NONE;
    modifiers.set(Modifiers::SHIFT, shift);
    modifiers.set(Modifiers::ALT, alt);
    modifiers.set(Modifiers::CTRL, ctrl);
    modifiers.set(Modifiers::SUPER, meta);
    KeyInput::new(key).with_modifiers(modifiers)
}

/// Milliseconds from a browser clock as a [`Duration`]; NaN and negatives
/// become zero.
#[must_use]
pub fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

/// `setTimeout` delay that fires no earlier than `deadline`.
#[must_use]
pub fn timeout_ms(deadline: Duration, now: Duration) -> i32 {
    let remaining = deadline.saturating_sub(now);
    let mut ms = remaining.as_millis();
    if remaining > Duration::from_millis(u64::try_from(ms).unwrap_or(u64::MAX)) {
        ms += 1;
    }
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// The single pending `setTimeout` the host keeps for the enhancer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    armed_for: Option<Duration>,
}

impl TimerSlot {
    #[must_use]
    pub const fn armed_for(&self) -> Option<Duration> {
        self.armed_for
    }

    /// Returns the delay of a timer to (re)arm for `next`, or `None` when the
    /// armed timer already covers it. A returned delay replaces the armed
    /// timer.
    pub fn plan(&mut self, next: Option<Duration>, now: Duration) -> Option<i32> {
        let next = next?;
        if self.armed_for.is_some_and(|armed| armed <= next) {
            return None;
        }
        self.armed_for = Some(next);
        Some(timeout_ms(next, now))
    }

    /// The armed timer ran.
    pub fn fired(&mut self) {
        self.armed_for = None;
    }
}

/// Configuration from the page's JSON, if any.
///
/// Invalid JSON or settings fall back to defaults; the error is handed back
/// so it can be logged once logging is up.
#[must_use]
pub fn resolve_config(json: Option<&str>) -> (EnhanceConfig, Option<ConfigError>) {
    let Some(json) = json.map(str::trim).filter(|json| !json.is_empty()) else {
        return (EnhanceConfig::default(), None);
    };
    match EnhanceConfig::from_json_str(json) {
        Ok(config) => (config, None),
        Err(err) => (EnhanceConfig::default(), Some(err)),
    }
}

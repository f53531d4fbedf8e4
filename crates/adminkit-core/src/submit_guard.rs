#![forbid(unsafe_code)]

//! Advisory double-submit flag for forms.
//!
//! The first submit marks the form with a styling class and arms a reset
//! timer; later submits while the flag is up change nothing. The flag is a
//! presentation hook only. It never cancels the submit event or disables a
//! control, so a second real submission still goes through.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::scheduler::TaskHandle;

/// Settings for [`SubmissionGuard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitGuardConfig {
    /// Class added while a submission is in flight.
    pub class_name: String,
    /// Safety window after which the class is removed again.
    pub reset_after_ms: u64,
}

impl Default for SubmitGuardConfig {
    fn default() -> Self {
        Self {
            class_name: "is-submitting".to_owned(),
            reset_after_ms: 8000,
        }
    }
}

impl SubmitGuardConfig {
    #[must_use]
    pub const fn reset_after(&self) -> Duration {
        Duration::from_millis(self.reset_after_ms)
    }
}

/// One flagged form and the timer that will clear it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FormGuardState<N> {
    form: N,
    reset: TaskHandle,
}

/// Tracks which forms currently carry the submitting flag.
#[derive(Debug, Clone)]
pub struct SubmissionGuard<N> {
    flagged: Vec<FormGuardState<N>>,
}

impl<N> Default for SubmissionGuard<N> {
    fn default() -> Self {
        Self {
            flagged: Vec::new(),
        }
    }
}

impl<N: Clone + PartialEq> SubmissionGuard<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `form` is flagged.
    #[must_use]
    pub fn is_submitting(&self, form: &N) -> bool {
        self.flagged.iter().any(|state| state.form == *form)
    }

    /// Reset timer armed for `form`.
    #[must_use]
    pub fn reset_handle(&self, form: &N) -> Option<TaskHandle> {
        self.flagged
            .iter()
            .find(|state| state.form == *form)
            .map(|state| state.reset)
    }

    /// Flag `form` on its first submission.
    ///
    /// `arm_reset` is called exactly once per flagging and must schedule the
    /// reset, returning its handle. Returns `false` when the form was
    /// already flagged.
    pub fn mark<P>(
        &mut self,
        page: &mut P,
        form: &N,
        config: &SubmitGuardConfig,
        arm_reset: impl FnOnce() -> TaskHandle,
    ) -> bool
    where
        P: Page<Node = N> + ?Sized,
    {
        if self.is_submitting(form) || page.has_class(form, &config.class_name) {
            return false;
        }
        page.add_class(form, &config.class_name);
        let reset = arm_reset();
        self.flagged.push(FormGuardState {
            form: form.clone(),
            reset,
        });
        tracing::debug!("form flagged as submitting");
        true
    }

    /// Clear the flag once the safety window elapsed.
    pub fn clear<P>(&mut self, page: &mut P, form: &N, config: &SubmitGuardConfig)
    where
        P: Page<Node = N> + ?Sized,
    {
        self.flagged.retain(|state| state.form != *form);
        page.remove_class(form, &config.class_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_page::MemoryPage;
    use crate::scheduler::Scheduler;

    use pretty_assertions::assert_eq;

    #[test]
    fn second_submit_is_a_no_op() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let form = page.add_element(&body, "form");
        let config = SubmitGuardConfig::default();
        let mut scheduler = Scheduler::new();
        let mut guard = SubmissionGuard::new();

        assert!(guard.mark(&mut page, &form, &config, || {
            scheduler.schedule(config.reset_after(), form)
        }));
        assert!(!guard.mark(&mut page, &form, &config, || {
            scheduler.schedule(config.reset_after(), form)
        }));
        assert_eq!(page.classes(&form), vec!["is-submitting"]);
        assert_eq!(scheduler.pending(), 1);
        assert!(guard.reset_handle(&form).is_some());
    }

    #[test]
    fn clear_allows_reflagging() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let form = page.add_element(&body, "form.change-form");
        let config = SubmitGuardConfig::default();
        let mut scheduler = Scheduler::new();
        let mut guard = SubmissionGuard::new();

        guard.mark(&mut page, &form, &config, || scheduler.schedule(config.reset_after(), form));
        guard.clear(&mut page, &form, &config);
        assert!(!guard.is_submitting(&form));
        assert_eq!(page.classes(&form), vec!["change-form"]);

        assert!(guard.mark(&mut page, &form, &config, || {
            scheduler.schedule(config.reset_after(), form)
        }));
    }

    #[test]
    fn existing_class_counts_as_flagged() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let form = page.add_element(&body, "form.is-submitting");
        let mut guard = SubmissionGuard::new();
        let armed = std::cell::Cell::new(false);
        let marked = guard.mark(&mut page, &form, &SubmitGuardConfig::default(), || {
            armed.set(true);
            Scheduler::<()>::new().schedule(Duration::ZERO, ())
        });
        assert!(!marked);
        assert!(!armed.get());
    }
}

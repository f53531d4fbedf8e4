#![forbid(unsafe_code)]

//! [`Enhancer`]: runs every behavior once at page-ready and routes host
//! events afterwards.
//!
//! The host drives it:
//! - call [`Enhancer::start`] when the document is ready,
//! - route each [`Listen`] request back into the matching `on_*` method,
//! - call [`Enhancer::advance`] when [`Enhancer::next_deadline`] passes,
//! - call [`Enhancer::on_animation_frame`] while
//!   [`Enhancer::has_pending_frame`] is true.
//!
//! Time is a monotonic [`Duration`] since page-ready, supplied by the host.

use core::time::Duration;

use crate::animate::EntranceAnimator;
use crate::config::EnhanceConfig;
use crate::keyboard::{KeyInput, KeyOutcome, ShortcutAction, ShortcutTable, is_typing_tag};
use crate::messages::{collect_messages, remove_message, start_fade};
use crate::nav::highlight_active;
use crate::page::{Listen, Page};
use crate::panel::PanelController;
use crate::scheduler::Scheduler;
use crate::search_hint::apply_search_hint;
use crate::selectors::{Landmark, resolve, resolve_all};
use crate::submit_guard::SubmissionGuard;
use crate::viewport::ViewportMode;

/// Delayed work owned by the enhancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task<N> {
    /// Remove the submitting flag from a form.
    ClearSubmitting(N),
    /// Begin fading a message out.
    FadeMessage(N),
    /// Detach a faded message.
    RemoveMessage(N),
}

/// What [`Enhancer::start`] found and did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartReport {
    pub viewport_compact: bool,
    pub search_hint: bool,
    pub filter_toggle: bool,
    pub forms_guarded: usize,
    pub rows_staged: usize,
    pub cards_staged: usize,
    pub nav_links_active: usize,
    pub messages_scheduled: usize,
}

/// Behavior layer bound to one page for its lifetime.
#[derive(Debug)]
pub struct Enhancer<P: Page> {
    page: P,
    config: EnhanceConfig,
    viewport: ViewportMode,
    shortcuts: ShortcutTable,
    panel: PanelController<P::Node>,
    guard: SubmissionGuard<P::Node>,
    animator: EntranceAnimator<P::Node>,
    scheduler: Scheduler<Task<P::Node>>,
    started: bool,
}

impl<P: Page> Enhancer<P> {
    #[must_use]
    pub fn new(page: P, config: EnhanceConfig) -> Self {
        let viewport = ViewportMode::classify(
            page.viewport_width(),
            config.viewport.compact_max_width,
        );
        Self {
            page,
            config,
            viewport,
            shortcuts: ShortcutTable::default(),
            panel: PanelController::new(),
            guard: SubmissionGuard::new(),
            animator: EntranceAnimator::new(),
            scheduler: Scheduler::new(),
            started: false,
        }
    }

    /// Replace the shortcut table before [`Self::start`].
    #[must_use]
    pub fn with_shortcuts(mut self, shortcuts: ShortcutTable) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    #[must_use]
    pub const fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    #[must_use]
    pub const fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    #[must_use]
    pub const fn viewport(&self) -> ViewportMode {
        self.viewport
    }

    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Filter panel visibility as last written.
    #[must_use]
    pub const fn panel_visible(&self) -> bool {
        self.panel.visible()
    }

    /// Whether `form` currently carries the submitting flag.
    #[must_use]
    pub fn is_submitting(&self, form: &P::Node) -> bool {
        self.guard.is_submitting(form)
    }

    /// Earliest time [`Self::advance`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Elements wait for [`Self::on_animation_frame`].
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.animator.has_pending_frame()
    }

    /// Consume the enhancer, returning the page.
    pub fn into_page(self) -> P {
        self.page
    }

    fn refresh_viewport(&mut self) -> ViewportMode {
        self.viewport = ViewportMode::classify(
            self.page.viewport_width(),
            self.config.viewport.compact_max_width,
        );
        self.viewport
    }

    /// Page-ready. Runs each behavior once; later calls do nothing.
    pub fn start(&mut self, now: Duration) -> StartReport {
        if self.started {
            return StartReport::default();
        }
        self.started = true;
        self.scheduler.set_now(now);
        let mut report = StartReport {
            viewport_compact: self.refresh_viewport().is_compact(),
            ..StartReport::default()
        };

        report.search_hint = apply_search_hint(&mut self.page, &self.config.search_hint);

        self.page.listen(Listen::KeyDown);

        report.filter_toggle =
            self.panel
                .ensure_toggle(&mut self.page, self.viewport, &self.config.filter_toggle);

        let forms = resolve_all(&self.page, Landmark::Forms);
        report.forms_guarded = forms.len();
        for form in forms {
            self.page.listen(Listen::Submit(form));
        }

        if self.page.prefers_reduced_motion() {
            tracing::debug!("reduced motion preferred, entrance animations skipped");
        } else {
            report.rows_staged =
                self.animator
                    .stage(&mut self.page, Landmark::ResultRows, &self.config.rows);
            report.cards_staged =
                self.animator
                    .stage(&mut self.page, Landmark::DashboardCards, &self.config.cards);
        }

        report.nav_links_active = highlight_active(&mut self.page, &self.config.nav)
            .matched
            .len();

        let messages = collect_messages(&self.page);
        report.messages_scheduled = messages.len();
        let dismiss_after = self.config.messages.dismiss_after();
        for message in messages {
            self.scheduler.schedule(dismiss_after, Task::FadeMessage(message));
        }

        self.page.listen(Listen::Resize);

        tracing::info!(
            compact = report.viewport_compact,
            toggle = report.filter_toggle,
            forms = report.forms_guarded,
            rows = report.rows_staged,
            cards = report.cards_staged,
            nav = report.nav_links_active,
            messages = report.messages_scheduled,
            "admin enhancements started"
        );
        report
    }

    /// Global key-down. The host prevents the default action when asked.
    pub fn on_keydown(&mut self, input: &KeyInput) -> KeyOutcome {
        let typing = self.page.active_tag().is_some_and(|tag| is_typing_tag(&tag));
        let Some(binding) = self.shortcuts.resolve(input, typing).copied() else {
            return KeyOutcome::ignored();
        };
        let handled = match binding.action {
            ShortcutAction::FocusSearch => self.focus_search(),
            ShortcutAction::AddObject => self.open_add_link(),
            ShortcutAction::CollapseFilters => {
                let mode = self.refresh_viewport();
                self.panel.collapse(&mut self.page, mode)
            }
        };
        tracing::debug!(binding = binding.name, handled, "shortcut");
        KeyOutcome {
            action: Some(binding.action),
            handled,
            prevent_default: binding.prevent.resolve(handled),
        }
    }

    fn focus_search(&mut self) -> bool {
        let Some(input) = resolve(&self.page, Landmark::SearchInput) else {
            return false;
        };
        self.page.focus_and_select(&input);
        true
    }

    fn open_add_link(&mut self) -> bool {
        let Some(target) = resolve(&self.page, Landmark::AddLink)
            .and_then(|link| self.page.link_target(&link))
        else {
            return false;
        };
        self.page.navigate(&target);
        true
    }

    /// Window resize: reclassify and let the panel follow.
    pub fn on_resize(&mut self) -> ViewportMode {
        let mode = self.refresh_viewport();
        if self.started {
            self.panel.on_resize(&mut self.page, mode);
        }
        mode
    }

    /// Click on the synthesized filter toggle. Returns the new visibility.
    pub fn on_toggle_click(&mut self) -> Option<bool> {
        let mode = self.refresh_viewport();
        self.panel.toggle(&mut self.page, mode)
    }

    /// A form is being submitted at `now`. Returns `true` on first flagging.
    ///
    /// Never asks the host to cancel the submission.
    pub fn on_submit(&mut self, form: &P::Node, now: Duration) -> bool {
        self.advance(now);
        let reset_after = self.config.submit.reset_after();
        let scheduler = &mut self.scheduler;
        self.guard
            .mark(&mut self.page, form, &self.config.submit, || {
                scheduler.schedule(reset_after, Task::ClearSubmitting(form.clone()))
            })
    }

    /// Reveal elements staged for entrance.
    pub fn on_animation_frame(&mut self) -> usize {
        self.animator.on_animation_frame(&mut self.page)
    }

    /// Run every task due at or before `now`. Returns how many ran.
    pub fn advance(&mut self, now: Duration) -> usize {
        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due(now) {
            self.run_task(task);
            ran += 1;
        }
        ran
    }

    fn run_task(&mut self, task: Task<P::Node>) {
        match task {
            Task::ClearSubmitting(form) => {
                self.guard.clear(&mut self.page, &form, &self.config.submit);
            }
            Task::FadeMessage(message) => {
                start_fade(&mut self.page, &message, &self.config.messages);
                self.scheduler.schedule(
                    self.config.messages.remove_after_fade(),
                    Task::RemoveMessage(message),
                );
            }
            Task::RemoveMessage(message) => remove_message(&mut self.page, &message),
        }
    }
}

#![forbid(unsafe_code)]

//! Collapsible filter panel for compact viewports.
//!
//! [`PanelController`] owns the panel's visibility flag. The toggle click,
//! the Escape shortcut and the resize handler all write it through
//! [`PanelController::set_visible`], which updates the panel's `display`
//! and the toggle's `aria-expanded` together so the two never disagree.

use serde::{Deserialize, Serialize};

use crate::page::{Listen, Page};
use crate::selectors::{FILTER_TOGGLE_ID, Landmark, resolve};
use crate::viewport::ViewportMode;

/// Text and markup of the synthesized toggle button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterToggleConfig {
    /// Visible button label.
    pub label: String,
    /// `aria-label` of the button.
    pub aria_label: String,
    /// Icon markup placed before the label. Trusted, inserted as HTML.
    pub icon_html: String,
    /// `class` attribute of the button.
    pub button_class: String,
}

impl Default for FilterToggleConfig {
    fn default() -> Self {
        Self {
            label: "Filtres".to_owned(),
            aria_label: "Afficher ou masquer les filtres".to_owned(),
            icon_html: r#"<i class="fas fa-filter" style="margin-right:6px;font-size:.78rem"></i>"#
                .to_owned(),
            button_class: "btn btn-outline-light".to_owned(),
        }
    }
}

/// Visibility state of the filter panel plus the toggle that drives it.
#[derive(Debug, Clone)]
pub struct PanelController<N> {
    toggle: Option<N>,
    visible: bool,
}

impl<N> Default for PanelController<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> PanelController<N> {
    /// Panel starts in its server-rendered, visible state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            toggle: None,
            visible: true,
        }
    }

    #[must_use]
    pub const fn visible(&self) -> bool {
        self.visible
    }

    /// The toggle this controller created, if any.
    #[must_use]
    pub fn toggle_node(&self) -> Option<&N> {
        self.toggle.as_ref()
    }
}

impl<N: Clone + PartialEq + core::fmt::Debug> PanelController<N> {
    /// Create the toggle button and collapse the panel, once.
    ///
    /// Requires the filter panel and the search container, a compact
    /// viewport, and no element already carrying the toggle id. Returns
    /// `true` when a button was created.
    pub fn ensure_toggle<P>(&mut self, page: &mut P, mode: ViewportMode, config: &FilterToggleConfig) -> bool
    where
        P: Page<Node = N> + ?Sized,
    {
        if !mode.is_compact() || page.element_by_id(FILTER_TOGGLE_ID).is_some() {
            return false;
        }
        let Some(search) = resolve(page, Landmark::SearchContainer) else {
            return false;
        };
        if resolve(page, Landmark::FilterPanel).is_none() {
            return false;
        }
        let Some(button) = page.create_element("button") else {
            return false;
        };

        page.set_attribute(&button, "type", "button");
        page.set_attribute(&button, "id", FILTER_TOGGLE_ID);
        page.set_attribute(&button, "class", &config.button_class);
        let label = escape_text(&config.label);
        let html = if config.icon_html.is_empty() {
            label
        } else {
            format!("{} {label}", config.icon_html)
        };
        page.set_inner_html(&button, &html);
        page.set_attribute(&button, "aria-label", &config.aria_label);
        page.set_attribute(&button, "aria-expanded", "false");
        page.append_child(&search, &button);
        page.listen(Listen::ToggleClick(button.clone()));

        tracing::debug!("filter toggle created");
        self.toggle = Some(button);
        self.set_visible(page, false);
        true
    }

    /// Flip visibility in response to a toggle click. Compact mode only.
    ///
    /// Returns the new visibility, or `None` when nothing changed.
    pub fn toggle<P>(&mut self, page: &mut P, mode: ViewportMode) -> Option<bool>
    where
        P: Page<Node = N> + ?Sized,
    {
        if !mode.is_compact() {
            return None;
        }
        let next = !self.visible;
        self.set_visible(page, next).then_some(next)
    }

    /// Hide the panel for the Escape shortcut. Compact mode only; does not
    /// require the panel to be open or a toggle to exist.
    pub fn collapse<P>(&mut self, page: &mut P, mode: ViewportMode) -> bool
    where
        P: Page<Node = N> + ?Sized,
    {
        mode.is_compact() && self.set_visible(page, false)
    }

    /// Re-evaluate after a viewport change.
    ///
    /// Wide viewports get the panel back in normal flow. Narrowing the window
    /// leaves the page alone: the toggle is only synthesized at start.
    pub fn on_resize<P>(&mut self, page: &mut P, mode: ViewportMode)
    where
        P: Page<Node = N> + ?Sized,
    {
        if mode == ViewportMode::Wide {
            self.set_visible(page, true);
        }
    }

    /// Single writer of panel visibility.
    ///
    /// Returns `false` (and changes nothing) when the page has no filter panel.
    pub fn set_visible<P>(&mut self, page: &mut P, visible: bool) -> bool
    where
        P: Page<Node = N> + ?Sized,
    {
        let Some(panel) = resolve(page, Landmark::FilterPanel) else {
            return false;
        };
        page.set_style(&panel, "display", if visible { "" } else { "none" });
        if let Some(toggle) = &self.toggle {
            page.set_attribute(toggle, "aria-expanded", if visible { "true" } else { "false" });
        }
        self.visible = visible;
        true
    }
}

fn escape_text(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

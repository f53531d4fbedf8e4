#![forbid(unsafe_code)]

//! Markup contract of the admin framework, and soft lookups against it.
//!
//! Every element the behaviors touch is named by a [`Landmark`]. Resolution
//! goes through [`resolve`] and [`resolve_all`], which return `None` or an
//! empty list when the page does not carry that piece of markup.

use crate::page::Page;

/// Id given to the synthesized filter toggle button.
pub const FILTER_TOGGLE_ID: &str = "toggle-admin-filters";

/// Sidebar tree item.
pub const NAV_ITEM: &str = ".nav-item";
/// Collapsible submenu inside a sidebar item.
pub const NAV_TREEVIEW: &str = ".nav-treeview";
/// Link inside a sidebar item.
pub const NAV_LINK: &str = ".nav-link";

/// Structural elements of the consumed admin markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    /// Text input of the change-list search bar.
    SearchInput,
    /// Container of the change-list search bar.
    SearchContainer,
    /// Collapsible filter sidebar of a change list.
    FilterPanel,
    /// "Add object" link among the object tools.
    AddLink,
    /// Body rows of the results table.
    ResultRows,
    /// Card-like blocks on dashboards and content pages.
    DashboardCards,
    /// Links of the navigation sidebar.
    SidebarLinks,
    /// Transient notification entries.
    Messages,
    /// Every form on the page.
    Forms,
}

impl Landmark {
    pub const ALL: [Self; 9] = [
        Self::SearchInput,
        Self::SearchContainer,
        Self::FilterPanel,
        Self::AddLink,
        Self::ResultRows,
        Self::DashboardCards,
        Self::SidebarLinks,
        Self::Messages,
        Self::Forms,
    ];

    /// CSS selector for this landmark.
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::SearchInput => "#changelist-search input[type=\"text\"]",
            Self::SearchContainer => "#changelist-search",
            Self::FilterPanel => "#changelist-filter",
            Self::AddLink => ".object-tools .addlink",
            Self::ResultRows => "#result_list tbody tr",
            Self::DashboardCards => {
                ".content-wrapper .card, .content-wrapper .small-box, \
                 .content-wrapper .info-box, #content-main .module"
            }
            Self::SidebarLinks => ".nav-sidebar .nav-link",
            Self::Messages => ".messagelist li, .messages .alert",
            Self::Forms => "form",
        }
    }
}

/// First element of `landmark`, or `None` when the page lacks it.
pub fn resolve<P: Page + ?Sized>(page: &P, landmark: Landmark) -> Option<P::Node> {
    let found = page.query(landmark.css());
    if found.is_none() {
        tracing::trace!(?landmark, "landmark absent");
    }
    found
}

/// Every element of `landmark` in document order.
pub fn resolve_all<P: Page + ?Sized>(page: &P, landmark: Landmark) -> Vec<P::Node> {
    page.query_all(landmark.css())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_page::MemoryPage;

    use pretty_assertions::assert_eq;

    #[test]
    fn absent_landmarks_resolve_to_none() {
        let page = MemoryPage::new();
        for landmark in Landmark::ALL {
            assert_eq!(resolve(&page, landmark), None, "{landmark:?}");
            assert!(resolve_all(&page, landmark).is_empty(), "{landmark:?}");
        }
    }

    #[test]
    fn search_input_requires_text_type() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let search = page.add_element(&body, "div#changelist-search");
        let hidden = page.add_element(&search, "input");
        page.set_attribute(&hidden, "type", "hidden");
        assert_eq!(resolve(&page, Landmark::SearchInput), None);

        let text = page.add_element(&search, "input");
        page.set_attribute(&text, "type", "text");
        assert_eq!(resolve(&page, Landmark::SearchInput), Some(text));
    }

    #[test]
    fn dashboard_cards_cover_every_group() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let wrapper = page.add_element(&body, "div.content-wrapper");
        let card = page.add_element(&wrapper, "div.card");
        let small = page.add_element(&wrapper, "div.small-box");
        let info = page.add_element(&wrapper, "div.info-box");
        let main = page.add_element(&body, "div#content-main");
        let module = page.add_element(&main, "div.module");
        // Outside every container: not a dashboard card.
        page.add_element(&body, "div.card");

        assert_eq!(
            resolve_all(&page, Landmark::DashboardCards),
            vec![card, small, info, module]
        );
    }
}

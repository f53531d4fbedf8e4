#![forbid(unsafe_code)]

//! Sidebar highlighting from the current path.
//!
//! A link matches when its raw `href` is a prefix of the current path
//! (`#`, empty and single-character hrefs never match). A matched link is
//! marked active; when it sits inside a collapsible submenu, the submenu's
//! top-level item is opened and that item's own link is marked active too.
//! Only one level of nesting is walked, and several links may match.

use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::selectors::{Landmark, NAV_ITEM, NAV_LINK, NAV_TREEVIEW, resolve_all};

/// How a link's href is compared with the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavMatch {
    /// Plain string prefix: `/admin/art` matches `/admin/articles/`.
    #[default]
    Prefix,
    /// Prefix that ends on a path segment boundary.
    Segment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub matching: NavMatch,
}

/// Whether a link with raw `href` should be active on `path`.
#[must_use]
pub fn href_matches(href: &str, path: &str, matching: NavMatch) -> bool {
    if href.is_empty() || href == "#" || href.len() <= 1 || !path.starts_with(href) {
        return false;
    }
    match matching {
        NavMatch::Prefix => true,
        NavMatch::Segment => {
            href.ends_with('/')
                || matches!(path.as_bytes().get(href.len()), None | Some(b'/' | b'?' | b'#'))
        }
    }
}

/// Links, items and menus touched by one highlight pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavActivation<N> {
    pub path: String,
    /// Leaf links whose href matched.
    pub matched: Vec<N>,
    /// Top-level items opened because a nested link matched.
    pub expanded: Vec<N>,
}

/// Mark active links and open their parent menus.
pub fn highlight_active<P>(page: &mut P, config: &NavConfig) -> NavActivation<P::Node>
where
    P: Page + ?Sized,
{
    let path = page.location_path();
    let mut activation = NavActivation {
        path: path.clone(),
        matched: Vec::new(),
        expanded: Vec::new(),
    };

    for link in resolve_all(page, Landmark::SidebarLinks) {
        let Some(href) = page.attribute(&link, "href") else {
            continue;
        };
        if !href_matches(&href, &path, config.matching) {
            continue;
        }
        page.add_class(&link, "active");
        page.set_attribute(&link, "aria-current", "page");

        let top_item = page
            .closest(&link, NAV_ITEM)
            .and_then(|item| page.closest(&item, NAV_TREEVIEW))
            .and_then(|menu| page.closest(&menu, NAV_ITEM));
        if let Some(top_item) = top_item {
            page.add_class(&top_item, "menu-open");
            if let Some(top_link) = page.child_matching(&top_item, NAV_LINK) {
                page.add_class(&top_link, "active");
            }
            activation.expanded.push(top_item);
        }
        tracing::debug!(%href, "sidebar link active");
        activation.matched.push(link);
    }
    activation
}

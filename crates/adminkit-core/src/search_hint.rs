#![forbid(unsafe_code)]

//! Advertises the `/` shortcut on the change-list search input.

use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::selectors::{Landmark, resolve};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHintConfig {
    /// `aria-label` given to an unlabeled search input.
    pub aria_label: String,
    /// Placeholder used when the input has none.
    pub placeholder: String,
    /// Appended to an existing placeholder.
    pub suffix: String,
}

impl Default for SearchHintConfig {
    fn default() -> Self {
        Self {
            aria_label: "Recherche dans la liste admin".to_owned(),
            placeholder: "Rechercher…  (/)".to_owned(),
            suffix: "  (/)".to_owned(),
        }
    }
}

/// Label the search input and mention `/` in its placeholder.
///
/// Returns `false` when the page has no search input.
pub fn apply_search_hint<P: Page + ?Sized>(page: &mut P, config: &SearchHintConfig) -> bool {
    let Some(input) = resolve(page, Landmark::SearchInput) else {
        return false;
    };
    if page
        .attribute(&input, "aria-label")
        .is_none_or(|label| label.is_empty())
    {
        page.set_attribute(&input, "aria-label", &config.aria_label);
    }
    let current = page.attribute(&input, "placeholder").unwrap_or_default();
    if !current.contains('/') {
        let placeholder = if current.is_empty() {
            config.placeholder.clone()
        } else {
            format!("{current}{}", config.suffix)
        };
        page.set_attribute(&input, "placeholder", &placeholder);
    }
    true
}

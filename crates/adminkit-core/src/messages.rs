#![forbid(unsafe_code)]

//! Timed fade-out and removal of flash messages present at page-ready.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animate::format_seconds;
use crate::page::Page;
use crate::selectors::{Landmark, resolve_all};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Delay from page-ready to the start of the fade.
    pub dismiss_after_ms: u64,
    /// Duration of every fade transition.
    pub fade_ms: u64,
    /// Delay from fade start to removal; slightly longer than `fade_ms`.
    pub remove_after_fade_ms: u64,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: 5000,
            fade_ms: 500,
            remove_after_fade_ms: 550,
        }
    }
}

impl MessageConfig {
    #[must_use]
    pub const fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }

    #[must_use]
    pub const fn remove_after_fade(&self) -> Duration {
        Duration::from_millis(self.remove_after_fade_ms)
    }
}

/// Messages to schedule, in document order.
pub fn collect_messages<P: Page + ?Sized>(page: &P) -> Vec<P::Node> {
    resolve_all(page, Landmark::Messages)
}

/// Start collapsing `message`: fade, slide up and squeeze its box to nothing.
pub fn start_fade<P: Page + ?Sized>(page: &mut P, message: &P::Node, config: &MessageConfig) {
    let secs = format_seconds(config.fade_ms);
    let transition = ["opacity", "transform", "max-height", "padding", "margin"]
        .iter()
        .map(|property| format!("{property} {secs} ease"))
        .collect::<Vec<_>>()
        .join(", ");
    page.set_style(message, "transition", &transition);
    page.set_style(message, "opacity", "0");
    page.set_style(message, "transform", "translateY(-8px)");
    page.set_style(message, "max-height", "0");
    page.set_style(message, "padding", "0");
    page.set_style(message, "margin", "0");
    page.set_style(message, "overflow", "hidden");
}

/// Drop `message` from the document once its fade finished.
pub fn remove_message<P: Page + ?Sized>(page: &mut P, message: &P::Node) {
    page.remove(message);
    tracing::trace!("message removed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_page::MemoryPage;

    use pretty_assertions::assert_eq;

    #[test]
    fn fade_sets_collapsed_styles() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let list = page.add_element(&body, "ul.messagelist");
        let entry = page.add_element(&list, "li.success");
        let alerts = page.add_element(&body, "div.messages");
        let alert = page.add_element(&alerts, "div.alert");

        assert_eq!(collect_messages(&page), vec![entry, alert]);

        start_fade(&mut page, &entry, &MessageConfig::default());
        assert_eq!(
            page.style(&entry, "transition"),
            "opacity 0.5s ease, transform 0.5s ease, max-height 0.5s ease, \
             padding 0.5s ease, margin 0.5s ease"
        );
        assert_eq!(page.style(&entry, "opacity"), "0");
        assert_eq!(page.style(&entry, "max-height"), "0");
        assert_eq!(page.style(&entry, "overflow"), "hidden");

        remove_message(&mut page, &entry);
        assert_eq!(collect_messages(&page), vec![alert]);
    }
}

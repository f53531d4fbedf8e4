#![forbid(unsafe_code)]

//! `adminkit-core` holds the behavior layer that decorates server-rendered
//! admin pages: keyboard shortcuts, a collapsible filter panel, staggered
//! entrance animations, sidebar highlighting, advisory double-submit flags
//! and auto-dismissed messages.
//!
//! Design goals:
//! - **Host-driven**: the embedding environment delivers events, advances the
//!   clock and runs animation frames. Nothing here blocks or spawns.
//! - **Markup-tolerant**: every lookup yields an `Option`; missing markup
//!   disables one behavior and nothing else.
//! - **Page-agnostic**: behaviors talk to a [`Page`] trait. `adminkit-web`
//!   implements it over the browser DOM, [`MemoryPage`] implements it in
//!   memory for tests.

pub mod animate;
pub mod config;
pub mod editor;
pub mod keyboard;
pub mod memory_page;
pub mod messages;
pub mod nav;
pub mod orchestrator;
pub mod page;
pub mod panel;
pub mod scheduler;
pub mod search_hint;
pub mod selectors;
pub mod submit_guard;
pub mod viewport;

pub use config::{ConfigError, EnhanceConfig};
pub use editor::EditorConfig;
pub use keyboard::{KeyInput, KeyOutcome, Modifiers, ShortcutAction};
pub use memory_page::{MemoryPage, NodeId};
pub use orchestrator::Enhancer;
pub use page::{Listen, Page};
pub use scheduler::{Scheduler, TaskHandle};
pub use selectors::Landmark;
pub use viewport::ViewportMode;

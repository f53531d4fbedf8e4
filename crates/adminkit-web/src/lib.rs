#![forbid(unsafe_code)]

//! Browser host for [`adminkit_core`].
//!
//! On `wasm32` this crate binds [`adminkit_core::Page`] to the live document
//! through `web-sys`, registers the DOM listeners the enhancer asks for, and
//! turns its deadlines and frame requests into `setTimeout` and
//! `requestAnimationFrame` calls. JavaScript calls `start()` (configuration
//! from the page) or `start_with_config(json)`.
//!
//! The event translation and console logging helpers are plain Rust and are
//! tested natively.

pub mod bridge;
pub mod console_log;

#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
pub mod web_page;

#[cfg(target_arch = "wasm32")]
pub use wasm::{start, start_with_config};
#[cfg(target_arch = "wasm32")]
pub use web_page::WebPage;

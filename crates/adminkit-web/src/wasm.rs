#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and the event loop glue around [`Enhancer`].
//!
//! A single [`Host`] lives in a thread-local. DOM listeners, timers and
//! animation frames all enter through [`with_host`], let the enhancer react,
//! then call [`Host::sync`] so the next deadline and frame request match the
//! enhancer's state. Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::Rc;

use adminkit_core::{EditorConfig, Enhancer};
use js_sys::{Function, Reflect};
use tracing::Level;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};
use web_time::Instant;

use crate::bridge::{CONFIG_ELEMENT_ID, TimerSlot, key_input, resolve_config};
use crate::console_log::{self, parse_level};
use crate::web_page::{Dispatch, HostEvent, WebPage};

thread_local! {
    static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
}

struct Host {
    enhancer: Enhancer<WebPage>,
    ready_at: Instant,
    timer: TimerSlot,
    timeout_handle: Option<i32>,
    frame_requested: bool,
}

impl Host {
    fn now(&self) -> core::time::Duration {
        self.ready_at.elapsed()
    }

    fn window(&self) -> Window {
        self.enhancer.page().window().clone()
    }

    fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::KeyDown(event) => {
                let input = key_input(
                    &event.key(),
                    event.shift_key(),
                    event.alt_key(),
                    event.ctrl_key(),
                    event.meta_key(),
                );
                if self.enhancer.on_keydown(&input).prevent_default {
                    event.prevent_default();
                }
            }
            HostEvent::Resize => {
                self.enhancer.on_resize();
            }
            HostEvent::Submit(form) => {
                let now = self.now();
                self.enhancer.on_submit(&form, now);
            }
            HostEvent::ToggleClick => {
                self.enhancer.on_toggle_click();
            }
        }
        self.sync();
    }

    /// Arm the timer and request a frame as the enhancer needs.
    fn sync(&mut self) {
        let window = self.window();
        let now = self.now();
        if let Some(delay) = self.timer.plan(self.enhancer.next_deadline(), now) {
            if let Some(handle) = self.timeout_handle.take() {
                window.clear_timeout_with_handle(handle);
            }
            let callback = Closure::once_into_js(on_timer);
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay,
            ) {
                Ok(handle) => self.timeout_handle = Some(handle),
                Err(err) => {
                    tracing::warn!(?err, "setTimeout failed");
                    self.timer.fired();
                }
            }
        }

        if self.enhancer.has_pending_frame() && !self.frame_requested {
            let callback = Closure::once_into_js(on_frame);
            match window.request_animation_frame(callback.unchecked_ref()) {
                Ok(_) => self.frame_requested = true,
                Err(err) => tracing::warn!(?err, "requestAnimationFrame failed"),
            }
        }
    }
}

fn with_host<R>(f: impl FnOnce(&mut Host) -> R) -> Option<R> {
    HOST.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            tracing::warn!("nested host callback dropped");
            return None;
        };
        slot.as_mut().map(f)
    })
}

fn dispatch(event: HostEvent) {
    with_host(|host| host.handle(event));
}

fn on_timer() {
    with_host(|host| {
        host.timer.fired();
        host.timeout_handle = None;
        let now = host.now();
        let ran = host.enhancer.advance(now);
        tracing::trace!(ran, "timer");
        host.sync();
    });
}

fn on_frame() {
    with_host(|host| {
        host.frame_requested = false;
        let revealed = host.enhancer.on_animation_frame();
        tracing::trace!(revealed, "animation frame");
        host.sync();
    });
}

fn on_ready() {
    with_host(|host| {
        host.ready_at = Instant::now();
        let now = host.now();
        host.enhancer.start(now);
        init_editor(&host.window(), &host.enhancer.config().editor);
        host.sync();
    });
}

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn console_sink(level: Level, line: &str) {
    let value = JsValue::from_str(line);
    if level == Level::ERROR {
        web_sys::console::error_1(&value);
    } else if level == Level::WARN {
        web_sys::console::warn_1(&value);
    } else if level == Level::INFO {
        web_sys::console::info_1(&value);
    } else {
        web_sys::console::debug_1(&value);
    }
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "adminkit panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("adminkit panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

/// Hand the editor settings to `window.tinymce.init` when the editor script
/// is loaded.
fn init_editor(window: &Window, editor: &EditorConfig) {
    if !editor.enabled {
        return;
    }
    let tinymce =
        Reflect::get(window, &JsValue::from_str("tinymce")).unwrap_or(JsValue::UNDEFINED);
    if tinymce.is_undefined() || tinymce.is_null() {
        tracing::debug!("rich-text editor not loaded");
        return;
    }
    let Ok(init) = Reflect::get(&tinymce, &JsValue::from_str("init"))
        .and_then(|init| init.dyn_into::<Function>())
    else {
        tracing::warn!("tinymce.init is not a function");
        return;
    };
    let options = match editor.to_init_json() {
        Ok(json) => js_sys::JSON::parse(&json),
        Err(err) => {
            tracing::warn!(%err, "editor settings did not serialize");
            return;
        }
    };
    match options.and_then(|options| init.call1(&tinymce, &options)) {
        Ok(_) => tracing::debug!(selector = %editor.selector, "rich-text editor initialized"),
        Err(err) => tracing::warn!(?err, "tinymce.init failed"),
    }
}

fn config_json(document: &Document) -> Option<String> {
    document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|script| script.text_content())
}

fn boot(json: Option<&str>) -> Result<(), JsValue> {
    let (config, error) = resolve_config(json);
    if !console_log::install(parse_level(&config.log_level), console_sink) {
        tracing::debug!("global subscriber already installed");
    }
    if let Some(err) = error {
        tracing::warn!(%err, "invalid configuration, using defaults");
    }

    if HOST.with(|cell| cell.try_borrow().map_or(true, |slot| slot.is_some())) {
        tracing::debug!("already started");
        return Ok(());
    }

    let router: Dispatch = Rc::new(dispatch);
    let page = WebPage::new(router)?;
    let document = page.document().clone();
    let host = Host {
        enhancer: Enhancer::new(page, config),
        ready_at: Instant::now(),
        timer: TimerSlot::default(),
        timeout_handle: None,
        frame_requested: false,
    };
    HOST.with(|cell| *cell.borrow_mut() = Some(host));

    if document.ready_state() == "loading" {
        let callback = Closure::once_into_js(on_ready);
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
    } else {
        on_ready();
    }
    Ok(())
}

/// Start with configuration read from `<script id="adminkit-config">`, or
/// defaults when the page has none.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();
    let json = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| config_json(&document));
    boot(json.as_deref())
}

/// Start with an explicit JSON configuration.
#[wasm_bindgen]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    install_panic_hook();
    boot(Some(json))
}

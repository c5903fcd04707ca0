//! Outdoor proposal form entry point

use std::sync::OnceLock;
use zoon::*;

/// Stores the main application task handle to prevent it from being dropped.
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

mod app;
mod billboard_picker;
mod config;
mod connection;
mod dataflow;
mod debounce;
mod debug_utils;
mod error_display;
mod proposal_form;
mod rest_catalog;

pub fn main() {
    // Browsers without EventSource would crash zoon's Connection on init.
    ensure_reconnecting_event_source();

    let handle = Task::start_droppable(async {
        let app = crate::app::OutdoorApp::new().await;
        let root_element = app.root();
        start_app("app", move || root_element);
        // Actors live as long as `app`, and `app` as long as this task.
        std::future::pending::<()>().await;
        drop(app);
    });
    let _ = MAIN_TASK.set(handle);
}

#[wasm_bindgen::prelude::wasm_bindgen(inline_js = r#"
export function ensure_reconnecting_event_source() {
  if (typeof window === 'undefined') return;
  if (typeof window.ReconnectingEventSource !== 'undefined') return;
  if (typeof window.EventSource !== 'undefined') {
    window.ReconnectingEventSource = window.EventSource;
    return;
  }
  // Fallback stub: won't stream events but prevents init crash.
  window.ReconnectingEventSource = function(url) {
    console.warn('ReconnectingEventSource stub: EventSource not available', url);
    this.url = url;
    this.close = function() {};
    this.addEventListener = function() {};
    this.removeEventListener = function() {};
    this.dispatchEvent = function() { return true; };
  };
}
"#)]
extern "C" {
    fn ensure_reconnecting_event_source();
}

/// Tab Triage - Chrome Extension for AI-assisted tab organization
/// Built with Rust + WASM + Yew

mod background;
mod grouping;
mod storage;
mod summarize;
mod tab_data;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Entry point for the background service worker: background.js forwards
// chrome.runtime.onMessage requests here and replies with the result
#[wasm_bindgen]
pub async fn handle_command(request: JsValue) -> Result<JsValue, JsValue> {
    background::dispatch(request)
        .await
        .map_err(|e| JsValue::from_str(&e))
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

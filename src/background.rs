/// Background worker: command dispatch and the summarize→group→persist pipeline

use crate::grouping;
use crate::storage::{SessionStore, SESSIONS_KEY, SNAPSHOT_KEY};
use crate::summarize;
use crate::tab_data::{SavedSession, Snapshot, TabRecord};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn promptText(prompt: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

/// Commands accepted over the runtime message channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    #[serde(rename = "PROCESS_TABS")]
    ProcessTabs,
    #[serde(rename = "GET_LATEST_GROUPS")]
    GetLatestGroups,
    #[serde(rename = "SAVE_SESSION")]
    SaveSession {
        #[serde(default)]
        name: Option<String>,
    },
}

/// Decode a request from the message channel and run it
pub async fn dispatch(request: JsValue) -> Result<JsValue, String> {
    let command: Command = serde_wasm_bindgen::from_value(request)
        .map_err(|e| format!("Unrecognized command: {:?}", e))?;

    log::debug!("dispatching {:?}", command);

    match command {
        Command::ProcessTabs => to_response(&process_tabs().await?),
        Command::GetLatestGroups => to_response(&load_snapshot().await),
        Command::SaveSession { name } => to_response(&save_session(name).await?),
    }
}

fn to_response<T: Serialize>(value: &T) -> Result<JsValue, String> {
    serde_wasm_bindgen::to_value(value).map_err(|e| format!("Failed to serialize response: {:?}", e))
}

/// Enumerate tabs, summarize each one, group, and persist the snapshot
pub async fn process_tabs() -> Result<Snapshot, String> {
    let tabs_js = queryTabs()
        .await
        .map_err(|e| format!("Failed to query tabs: {:?}", e))?;
    let mut tabs: Vec<TabRecord> = serde_wasm_bindgen::from_value(tabs_js)
        .map_err(|e| format!("Failed to parse tabs: {:?}", e))?;

    log::info!("processing {} tabs", tabs.len());

    // One tab at a time; the on-device model does not take parallel sessions
    for tab in &mut tabs {
        tab.summary = summarize::summarize_tab(tab).await;
    }

    let model_response = classify_with_model(&tabs).await;
    let groups = grouping::group_tabs(&tabs, model_response.as_deref());

    let snapshot = Snapshot {
        generated_at: js_sys::Date::now(),
        groups,
    };

    // Last writer wins: concurrent PROCESS_TABS invocations race on this key
    store_value(SNAPSHOT_KEY, &snapshot).await?;

    Ok(snapshot)
}

/// Ask the prompt capability to classify the summarized tabs. Any failure
/// yields None and the caller falls back to keyword rules.
async fn classify_with_model(tabs: &[TabRecord]) -> Option<String> {
    if tabs.is_empty() {
        return None;
    }

    match promptText(&grouping::build_classification_prompt(tabs)).await {
        Ok(response) => response.as_string(),
        Err(_) => {
            log::debug!("prompt capability unavailable for classification");
            None
        }
    }
}

/// The stored snapshot, or the empty default when none exists or it fails
/// to decode
pub async fn load_snapshot() -> Snapshot {
    match getStorage(SNAPSHOT_KEY).await {
        Ok(js) if !js.is_null() && !js.is_undefined() => {
            serde_wasm_bindgen::from_value(js).unwrap_or_default()
        }
        _ => Snapshot::default(),
    }
}

/// Wrap the current snapshot into a session record and append it to the
/// persisted list
pub async fn save_session(name: Option<String>) -> Result<SavedSession, String> {
    let snapshot = load_snapshot().await;

    let name = match name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        Some(n) => n,
        None => {
            let date = js_sys::Date::new(&JsValue::from_f64(js_sys::Date::now()));
            format!("Session {}", format_date(&date))
        }
    };

    let session = SavedSession::from_snapshot(snapshot, name);

    let mut store = load_sessions().await;
    store.add_session(session.clone());
    store_value(SESSIONS_KEY, &store).await?;

    log::info!("saved session {} ({} tabs)", session.id, session.groups.iter().map(|g| g.tabs.len()).sum::<usize>());

    Ok(session)
}

async fn load_sessions() -> SessionStore {
    match getStorage(SESSIONS_KEY).await {
        Ok(js) if !js.is_null() && !js.is_undefined() => {
            serde_wasm_bindgen::from_value(js).unwrap_or_default()
        }
        _ => SessionStore::new(),
    }
}

async fn store_value<T: Serialize>(key: &str, value: &T) -> Result<(), String> {
    let js = serde_wasm_bindgen::to_value(value)
        .map_err(|e| format!("Failed to serialize storage: {:?}", e))?;

    setStorage(key, js)
        .await
        .map_err(|e| format!("Failed to save storage: {:?}", e))
}

fn format_date(date: &js_sys::Date) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds()
    )
}

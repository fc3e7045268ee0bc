/// Summarization step: on-device AI capabilities with a static fallback

use crate::tab_data::TabRecord;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn extractPageText(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn summarizeText(text: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn promptText(prompt: &str) -> Result<JsValue, JsValue>;
}

const PROMPT_INSTRUCTION: &str =
    "Summarize the following page in one short sentence. Reply with the sentence only.";

/// Character budget for page text sent to the prompt capability
const PROMPT_TEXT_LIMIT: usize = 1500;

/// Produce a one-line summary for a tab. Never fails: each tier is attempted
/// once and any failure falls through to the next.
///
/// Tiers: on-device summarizer over extracted page text, then the prompt
/// capability with a fixed instruction, then a string derived from the title.
pub async fn summarize_tab(tab: &TabRecord) -> String {
    if let Some(text) = extract_page_text(tab.id).await {
        match summarizeText(&text).await {
            Ok(response) => {
                if let Some(summary) = response_text(&response) {
                    return summary;
                }
            }
            Err(_) => {
                log::debug!("summarizer unavailable for tab {}", tab.id);
            }
        }

        match promptText(&build_prompt(&text)).await {
            Ok(response) => {
                if let Some(summary) = response_text(&response) {
                    return summary;
                }
            }
            Err(_) => {
                log::debug!("prompt capability unavailable for tab {}", tab.id);
            }
        }
    }

    title_summary(&tab.title, &tab.url)
}

async fn extract_page_text(tab_id: i32) -> Option<String> {
    match extractPageText(tab_id).await {
        Ok(js) => js
            .as_string()
            .map(|text| collapse_whitespace(&text))
            .filter(|text| !text.is_empty()),
        Err(_) => {
            log::debug!("page text extraction failed for tab {}", tab_id);
            None
        }
    }
}

/// A usable model response: a non-empty string, squashed to one line
fn response_text(js: &JsValue) -> Option<String> {
    js.as_string()
        .map(|text| collapse_whitespace(&text))
        .filter(|text| !text.is_empty())
}

/// Fixed instruction plus the page text truncated to the prompt budget
pub fn build_prompt(page_text: &str) -> String {
    format!(
        "{}\n\n{}",
        PROMPT_INSTRUCTION,
        truncate_page_text(page_text, PROMPT_TEXT_LIMIT)
    )
}

/// Collapse runs of whitespace (including newlines) into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, on a char boundary
pub fn truncate_page_text(text: &str, max_chars: usize) -> String {
    let collapsed = collapse_whitespace(text);
    collapsed.chars().take(max_chars).collect()
}

/// Static summary derived from the tab title, the last tier
pub fn title_summary(title: &str, url: &str) -> String {
    let trimmed = title.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    match url::Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) {
        Some(host) => format!("Page on {}", host),
        None => "Untitled tab".to_string(),
    }
}

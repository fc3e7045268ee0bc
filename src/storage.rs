/// Storage layout for chrome.storage.local

use crate::tab_data::SavedSession;
use serde::{Deserialize, Serialize};

/// Latest snapshot, overwritten on every processing run
pub const SNAPSHOT_KEY: &str = "tab_triage_snapshot";
/// Append-only list of saved sessions
pub const SESSIONS_KEY: &str = "tab_triage_sessions";
/// Popup theme preference, "light" or "dark"
pub const THEME_KEY: &str = "tab_triage_theme";

/// Persisted session list. Append-only: sessions are never mutated or
/// deleted, and stay in creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStore {
    pub sessions: Vec<SavedSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            sessions: Vec::new(),
        }
    }

    pub fn add_session(&mut self, session: SavedSession) {
        self.sessions.push(session);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Data structures for Tab Triage
use serde::{Deserialize, Serialize};

/// Information about a browser tab, plus the summary attached during a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabRecord {
    pub id: i32,
    #[serde(rename = "windowId", default)]
    pub window_id: i32,
    pub url: String,
    pub title: String,
    #[serde(rename = "favIconUrl", default)]
    pub fav_icon_url: Option<String>,
    #[serde(default)]
    pub summary: String,
}

impl TabRecord {
    pub fn new(id: i32, window_id: i32, url: String, title: String) -> TabRecord {
        TabRecord {
            id,
            window_id,
            url,
            title,
            fav_icon_url: None,
            summary: String::new(),
        }
    }

    /// Favicon URL to render: the browser-supplied one, or a service URL
    /// derived from the tab's host
    pub fn favicon(&self) -> Option<String> {
        if let Some(fav) = &self.fav_icon_url {
            if !fav.is_empty() {
                return Some(fav.clone());
            }
        }
        let host = url::Url::parse(&self.url).ok()?.host_str()?.to_string();
        Some(format!("https://www.google.com/s2/favicons?domain={}&sz=32", host))
    }
}

/// One named category of tabs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabGroup {
    pub name: String,
    pub tabs: Vec<TabRecord>,
}

/// The single latest summarized-and-grouped view of all tabs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(rename = "generatedAt")]
    pub generated_at: f64,
    pub groups: Vec<TabGroup>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            generated_at: 0.0,
            groups: Vec::new(),
        }
    }
}

impl Snapshot {
    pub fn tab_count(&self) -> usize {
        self.groups.iter().map(|g| g.tabs.len()).sum()
    }
}

/// A user-named, persisted copy of a past snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedSession {
    pub id: String,
    pub name: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: f64,
    pub groups: Vec<TabGroup>,
}

impl SavedSession {
    /// Wrap a snapshot into an immutable session record with a fresh id
    pub fn from_snapshot(snapshot: Snapshot, name: String) -> SavedSession {
        SavedSession {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            generated_at: snapshot.generated_at,
            groups: snapshot.groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_record_creation() {
        let tab = TabRecord::new(
            1,
            100,
            "https://google.com".to_string(),
            "Google".to_string(),
        );

        assert_eq!(tab.id, 1);
        assert_eq!(tab.window_id, 100);
        assert_eq!(tab.url, "https://google.com");
        assert_eq!(tab.title, "Google");
        assert_eq!(tab.summary, "");
        assert!(tab.fav_icon_url.is_none());
    }

    #[test]
    fn test_favicon_prefers_browser_supplied() {
        let mut tab = TabRecord::new(1, 0, "https://github.com/x".to_string(), "x".to_string());
        tab.fav_icon_url = Some("https://github.com/favicon.ico".to_string());

        assert_eq!(tab.favicon(), Some("https://github.com/favicon.ico".to_string()));
    }

    #[test]
    fn test_favicon_derived_from_host() {
        let tab = TabRecord::new(1, 0, "https://docs.rs/serde".to_string(), "serde".to_string());

        assert_eq!(
            tab.favicon(),
            Some("https://www.google.com/s2/favicons?domain=docs.rs&sz=32".to_string())
        );
    }

    #[test]
    fn test_favicon_unparseable_url() {
        let tab = TabRecord::new(1, 0, "not a url".to_string(), "x".to_string());
        assert_eq!(tab.favicon(), None);
    }

    #[test]
    fn test_snapshot_default_is_empty() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.groups.len(), 0);
        assert_eq!(snapshot.tab_count(), 0);
    }

    #[test]
    fn test_session_from_empty_snapshot_has_id() {
        let session = SavedSession::from_snapshot(Snapshot::default(), "Session 1".to_string());

        assert!(!session.id.is_empty());
        assert_eq!(session.name, "Session 1");
        assert_eq!(session.groups.len(), 0);
    }

    #[test]
    fn test_serialization() {
        let snapshot = Snapshot {
            generated_at: 1698508200000.0,
            groups: vec![TabGroup {
                name: "Research".to_string(),
                tabs: vec![TabRecord::new(
                    7,
                    1,
                    "https://arxiv.org/abs/1706.03762".to_string(),
                    "Attention Is All You Need".to_string(),
                )],
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let deserialized: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, snapshot);
        assert_eq!(deserialized.groups[0].tabs[0].id, 7);
    }

    #[test]
    fn test_tab_record_parses_browser_shape() {
        // chrome.tabs.query objects carry camelCase keys and no summary
        let json = r#"{"id": 3, "windowId": 12, "url": "https://example.com",
                       "title": "Example", "favIconUrl": "https://example.com/f.ico"}"#;
        let tab: TabRecord = serde_json::from_str(json).unwrap();

        assert_eq!(tab.window_id, 12);
        assert_eq!(tab.fav_icon_url.as_deref(), Some("https://example.com/f.ico"));
        assert_eq!(tab.summary, "");
    }
}

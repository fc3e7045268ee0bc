/// Grouping step: AI classification with a static keyword fallback

use crate::tab_data::{TabGroup, TabRecord};
use serde_json::Value;

/// Fixed fallback categories with their keyword lists; first match wins
const KEYWORD_RULES: &[(&str, &[&str])] = &[
    (
        "Research",
        &["arxiv", "paper", "research", "scholar", "wiki", "docs", "documentation", "tutorial"],
    ),
    (
        "Shopping",
        &["amazon", "shop", "cart", "deal", "price", "ebay", "etsy", "order", "buy"],
    ),
    (
        "Entertainment",
        &["youtube", "video", "netflix", "music", "spotify", "twitch", "movie", "game"],
    ),
    (
        "Social",
        &["twitter", "reddit", "facebook", "linkedin", "instagram", "mastodon", "discord"],
    ),
    (
        "News",
        &["news", "bbc", "nytimes", "guardian", "reuters", "headline", "article"],
    ),
];

const CATCH_ALL: &str = "Other";

/// Group summarized tabs into named categories.
///
/// Uses the model's classification when it yields at least one usable group,
/// otherwise the keyword rules. The output never contains an empty category
/// name or an empty group.
pub fn group_tabs(tabs: &[TabRecord], model_response: Option<&str>) -> Vec<TabGroup> {
    if let Some(raw) = model_response {
        match parse_model_groups(raw, tabs) {
            Some(groups) if !groups.is_empty() => return groups,
            _ => log::debug!("model grouping unusable, using keyword rules"),
        }
    }

    keyword_groups(tabs)
}

/// Instruction sent to the prompt capability for classification. Lists one
/// line per tab so items can be re-linked by URL or title afterwards.
pub fn build_classification_prompt(tabs: &[TabRecord]) -> String {
    let mut prompt = String::from(
        "Sort these browser tabs into a few named categories. Reply with JSON only, \
         shaped as {\"groups\": {\"Category\": [{\"url\": \"...\", \"title\": \"...\"}]}}.\n\n",
    );
    for tab in tabs {
        prompt.push_str(&format!("- {} ({}): {}\n", tab.title, tab.url, tab.summary));
    }
    prompt
}

/// Parse a model classification response and re-link its items to the
/// original tab records. Returns None on any malformed input so the caller
/// falls back to keyword rules.
fn parse_model_groups(raw: &str, tabs: &[TabRecord]) -> Option<Vec<TabGroup>> {
    let value: Value = serde_json::from_str(strip_code_fence(raw)).ok()?;
    let categories = value.get("groups")?.as_object()?;

    let mut groups = Vec::new();
    for (name, items) in categories {
        // Shape check: every category value must be an array
        let items = items.as_array()?;

        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let matched: Vec<TabRecord> = items
            .iter()
            .filter_map(|item| relink_item(item, tabs))
            .collect();

        // Hallucinated-only categories vanish here
        if !matched.is_empty() {
            groups.push(TabGroup {
                name: name.to_string(),
                tabs: matched,
            });
        }
    }

    Some(groups)
}

/// Match one returned item back to its original tab record, by exact URL or
/// case-insensitive title. Unmatched items are discarded.
fn relink_item(item: &Value, tabs: &[TabRecord]) -> Option<TabRecord> {
    let (url, title) = match item {
        Value::Object(obj) => (
            obj.get("url").and_then(Value::as_str),
            obj.get("title").and_then(Value::as_str),
        ),
        Value::String(s) => (Some(s.as_str()), Some(s.as_str())),
        _ => return None,
    };

    tabs.iter()
        .find(|tab| {
            url.is_some_and(|u| tab.url == u)
                || title.is_some_and(|t| !t.is_empty() && tab.title.eq_ignore_ascii_case(t))
        })
        .cloned()
}

/// Models love to wrap JSON in a markdown fence
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim().trim_end_matches("```").trim()
}

/// Deterministic keyword grouping over title + summary text
pub fn keyword_groups(tabs: &[TabRecord]) -> Vec<TabGroup> {
    let mut buckets: Vec<(&str, Vec<TabRecord>)> = KEYWORD_RULES
        .iter()
        .map(|(name, _)| (*name, Vec::new()))
        .collect();
    buckets.push((CATCH_ALL, Vec::new()));

    for tab in tabs {
        let haystack = format!("{} {}", tab.title, tab.summary).to_lowercase();
        let slot = KEYWORD_RULES
            .iter()
            .position(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
            .unwrap_or(KEYWORD_RULES.len());
        buckets[slot].1.push(tab.clone());
    }

    buckets
        .into_iter()
        .filter(|(_, tabs)| !tabs.is_empty())
        .map(|(name, tabs)| TabGroup {
            name: name.to_string(),
            tabs,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab_with_summary(id: i32, url: &str, title: &str, summary: &str) -> TabRecord {
        let mut tab = TabRecord::new(id, 1, url.to_string(), title.to_string());
        tab.summary = summary.to_string();
        tab
    }

    fn fixture_tabs() -> Vec<TabRecord> {
        vec![
            tab_with_summary(1, "https://arxiv.org/abs/1", "", "arxiv paper"),
            tab_with_summary(2, "https://amazon.com/dp/2", "", "amazon deal"),
            tab_with_summary(3, "https://youtube.com/watch?v=3", "", "youtube video"),
        ]
    }

    #[test]
    fn test_keyword_fallback_fixed_summaries() {
        let groups = keyword_groups(&fixture_tabs());

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].name, "Research");
        assert_eq!(groups[0].tabs[0].id, 1);
        assert_eq!(groups[1].name, "Shopping");
        assert_eq!(groups[1].tabs[0].id, 2);
        assert_eq!(groups[2].name, "Entertainment");
        assert_eq!(groups[2].tabs[0].id, 3);
    }

    #[test]
    fn test_keyword_fallback_catch_all() {
        let tabs = vec![tab_with_summary(9, "https://example.com", "plain page", "nothing special")];
        let groups = keyword_groups(&tabs);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Other");
    }

    #[test]
    fn test_keyword_fallback_first_match_wins() {
        // "arxiv" (Research) is checked before "video" (Entertainment)
        let tabs = vec![tab_with_summary(1, "https://a.com", "arxiv video", "")];
        let groups = keyword_groups(&tabs);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Research");
    }

    #[test]
    fn test_no_empty_group_names_or_buckets() {
        let tabs = fixture_tabs();
        for response in [
            None,
            Some("not json"),
            Some(r#"{"wrong": 1}"#),
            Some(r#"{"groups": {"": [{"url": "https://arxiv.org/abs/1"}]}}"#),
        ] {
            let groups = group_tabs(&tabs, response);
            assert!(!groups.is_empty());
            for group in &groups {
                assert!(!group.name.is_empty());
                assert!(!group.tabs.is_empty());
            }
        }
    }

    #[test]
    fn test_malformed_response_uses_keyword_fallback() {
        let tabs = fixture_tabs();

        let from_bad_json = group_tabs(&tabs, Some("{{{"));
        let from_missing_key = group_tabs(&tabs, Some(r#"{"categories": {}}"#));
        let expected = keyword_groups(&tabs);

        assert_eq!(from_bad_json, expected);
        assert_eq!(from_missing_key, expected);
    }

    #[test]
    fn test_non_array_category_is_malformed() {
        let tabs = fixture_tabs();
        let response = r#"{"groups": {"Reading": "not an array"}}"#;

        assert_eq!(group_tabs(&tabs, Some(response)), keyword_groups(&tabs));
    }

    #[test]
    fn test_model_groups_relinked_by_url() {
        let tabs = fixture_tabs();
        let response = r#"{"groups": {"Papers": [{"url": "https://arxiv.org/abs/1"}]}}"#;

        let groups = group_tabs(&tabs, Some(response));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Papers");
        assert_eq!(groups[0].tabs[0].id, 1);
        assert_eq!(groups[0].tabs[0].summary, "arxiv paper");
    }

    #[test]
    fn test_model_groups_relinked_by_title_case_insensitive() {
        let tabs = vec![tab_with_summary(4, "https://a.com", "Quarterly Report", "")];
        let response = r#"{"groups": {"Work": [{"title": "quarterly report"}]}}"#;

        let groups = group_tabs(&tabs, Some(response));

        assert_eq!(groups[0].tabs[0].id, 4);
    }

    #[test]
    fn test_hallucinated_items_discarded() {
        let tabs = fixture_tabs();
        let response = r#"{"groups": {
            "Papers": [{"url": "https://arxiv.org/abs/1"}, {"url": "https://made-up.example"}],
            "Ghosts": [{"title": "never opened this"}]
        }}"#;

        let groups = group_tabs(&tabs, Some(response));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Papers");
        assert_eq!(groups[0].tabs.len(), 1);
    }

    #[test]
    fn test_all_items_hallucinated_falls_back() {
        let tabs = fixture_tabs();
        let response = r#"{"groups": {"Ghosts": [{"url": "https://made-up.example"}]}}"#;

        assert_eq!(group_tabs(&tabs, Some(response)), keyword_groups(&tabs));
    }

    #[test]
    fn test_code_fenced_response_accepted() {
        let tabs = fixture_tabs();
        let response =
            "```json\n{\"groups\": {\"Papers\": [{\"url\": \"https://arxiv.org/abs/1\"}]}}\n```";

        let groups = group_tabs(&tabs, Some(response));

        assert_eq!(groups[0].name, "Papers");
    }

    #[test]
    fn test_bare_string_items_match_url_or_title() {
        let tabs = vec![
            tab_with_summary(1, "https://a.com", "Alpha", ""),
            tab_with_summary(2, "https://b.com", "Beta", ""),
        ];
        let response = r#"{"groups": {"Letters": ["https://a.com", "beta"]}}"#;

        let groups = group_tabs(&tabs, Some(response));

        assert_eq!(groups[0].tabs.len(), 2);
    }

    #[test]
    fn test_classification_prompt_lists_every_tab() {
        let tabs = fixture_tabs();
        let prompt = build_classification_prompt(&tabs);

        for tab in &tabs {
            assert!(prompt.contains(&tab.url));
            assert!(prompt.contains(&tab.summary));
        }
        assert!(prompt.contains("\"groups\""));
    }

    #[test]
    fn test_empty_tab_list() {
        assert!(group_tabs(&[], None).is_empty());
        assert!(group_tabs(&[], Some(r#"{"groups": {}}"#)).is_empty());
    }
}

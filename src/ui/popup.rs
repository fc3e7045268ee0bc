/// Popup UI for the Tab Triage extension

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::background::Command;
use crate::storage::THEME_KEY;
use crate::tab_data::{SavedSession, Snapshot, TabGroup};
use crate::ui::components::{ThemeToggle, Toast, ToastKind};

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendCommand(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

#[derive(Clone, PartialEq)]
enum AppState {
    Loading(String),
    Idle,
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading("Loading groups...".to_string()));
    let snapshot = use_state(Snapshot::default);
    let search_query = use_state(String::new);
    let session_name = use_state(String::new);
    let dark = use_state(|| false);
    let toast = use_state(|| None::<(String, ToastKind)>);

    // Load theme preference and the latest snapshot on mount
    {
        let state = state.clone();
        let snapshot = snapshot.clone();
        let dark = dark.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                dark.set(load_theme_dark().await);

                match fetch_latest().await {
                    Ok(latest) => {
                        snapshot.set(latest);
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Failed to load groups: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    // Organize tabs handler
    let on_process = {
        let state = state.clone();
        let snapshot = snapshot.clone();

        Callback::from(move |_| {
            let state = state.clone();
            let snapshot = snapshot.clone();

            state.set(AppState::Loading("Summarizing and grouping tabs...".to_string()));

            spawn_local(async move {
                match run_processing().await {
                    Ok(fresh) => {
                        snapshot.set(fresh);
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Failed to organize: {}", e)));
                    }
                }
            });
        })
    };

    // Save session handler
    let on_save = {
        let session_name = session_name.clone();
        let toast = toast.clone();

        Callback::from(move |_| {
            let name = (*session_name).trim().to_string();
            let name = if name.is_empty() { None } else { Some(name) };
            let session_name = session_name.clone();
            let toast = toast.clone();

            spawn_local(async move {
                match request_save(name).await {
                    Ok(session) => {
                        session_name.set(String::new());
                        toast.set(Some((format!("Saved \"{}\"", session.name), ToastKind::Success)));
                    }
                    Err(e) => {
                        log::warn!("session save failed: {}", e);
                        toast.set(Some(("Could not save session".to_string(), ToastKind::Error)));
                    }
                }
            });
        })
    };

    // Theme toggle handler
    let on_toggle_theme = {
        let dark = dark.clone();

        Callback::from(move |_| {
            let next = !*dark;
            dark.set(next);

            spawn_local(async move {
                persist_theme(next).await;
            });
        })
    };

    // Search handler
    let on_search_input = {
        let search_query = search_query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                search_query.set(input.value());
            }
        })
    };

    // Session name input handler
    let on_name_input = {
        let session_name = session_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                session_name.set(input.value());
            }
        })
    };

    let on_dismiss_toast = {
        let toast = toast.clone();
        Callback::from(move |_| toast.set(None))
    };

    let is_busy = matches!(*state, AppState::Loading(_));

    // Filter groups by search query; filtering is view-only, the snapshot
    // itself stays untouched
    let query = search_query.to_lowercase();
    let filtered_groups: Vec<TabGroup> = if query.is_empty() {
        snapshot.groups.clone()
    } else {
        snapshot
            .groups
            .iter()
            .filter_map(|group| {
                if group.name.to_lowercase().contains(&query) {
                    return Some(group.clone());
                }
                let tabs: Vec<_> = group
                    .tabs
                    .iter()
                    .filter(|tab| {
                        tab.title.to_lowercase().contains(&query)
                            || tab.url.to_lowercase().contains(&query)
                            || tab.summary.to_lowercase().contains(&query)
                    })
                    .cloned()
                    .collect();
                if tabs.is_empty() {
                    None
                } else {
                    Some(TabGroup {
                        name: group.name.clone(),
                        tabs,
                    })
                }
            })
            .collect()
    };

    let has_snapshot = snapshot.generated_at > 0.0;

    html! {
        <div class={if *dark { "popup-container theme-dark" } else { "popup-container theme-light" }}>
            <div class="popup-header">
                <h1 class="popup-title">{"Tab Triage"}</h1>
                <ThemeToggle dark={*dark} onclick={on_toggle_theme} />
            </div>

            <div class="actions-row">
                <Button onclick={on_process} disabled={is_busy} block={true}>
                    {"✨ Organize Tabs"}
                </Button>
            </div>

            <div class="save-row">
                <input
                    type="text"
                    placeholder="Session name (optional)"
                    value={(*session_name).clone()}
                    oninput={on_name_input}
                    class="session-name-input"
                />
                <Button onclick={on_save} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"💾 Save Session"}
                </Button>
            </div>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            // Search bar
            <div class="search-container">
                <input
                    type="text"
                    placeholder="Search groups, titles, or summaries..."
                    value={(*search_query).clone()}
                    oninput={on_search_input}
                    class="search-input"
                />
            </div>

            // Grouped tabs
            if filtered_groups.is_empty() {
                <div class="empty-state">
                    if !has_snapshot {
                        <p>{"No groups yet."}</p>
                        <p class="empty-state-hint">{"Organize Tabs builds a summarized view of every open tab."}</p>
                    } else if query.is_empty() {
                        <p>{"The last run produced no groups."}</p>
                    } else {
                        <p>{"No tabs match your search."}</p>
                    }
                </div>
            } else {
                <div class="groups-list">
                    {for filtered_groups.iter().map(|group| html! {
                        <GroupCard key={group.name.clone()} group={group.clone()} />
                    })}
                </div>
            }

            // Footer stats
            if has_snapshot {
                <div class="footer">
                    {format!("{} groups • {} tabs • {}",
                        snapshot.groups.len(),
                        snapshot.tab_count(),
                        format_date(&js_sys::Date::new(&JsValue::from_f64(snapshot.generated_at)))
                    )}
                </div>
            }

            if let Some((message, kind)) = (*toast).clone() {
                <Toast message={message} kind={kind} on_dismiss={on_dismiss_toast} />
            }
        </div>
    }
}

// Group card component
#[derive(Properties, PartialEq)]
struct GroupCardProps {
    group: TabGroup,
}

#[function_component(GroupCard)]
fn group_card(props: &GroupCardProps) -> Html {
    let expanded = use_state(|| true);
    let group = &props.group;

    let toggle_expanded = {
        let expanded = expanded.clone();
        Callback::from(move |_| {
            expanded.set(!*expanded);
        })
    };

    html! {
        <div class="group-card">
            <div class="group-header" onclick={toggle_expanded}>
                <h3 class="group-title">
                    {format!("{} ({})", group.name, group.tabs.len())}
                </h3>
                <span class="group-chevron">{if *expanded { "▲" } else { "▼" }}</span>
            </div>

            if *expanded {
                <div class="tabs-list">
                    {for group.tabs.iter().map(|tab| html! {
                        <div key={tab.id} class="tab-item">
                            if let Some(favicon) = tab.favicon() {
                                <img src={favicon} class="tab-favicon" alt="" />
                            }
                            <div class="tab-content">
                                <a href={tab.url.clone()} target="_blank" class="tab-title">
                                    {&tab.title}
                                </a>
                                if !tab.summary.is_empty() {
                                    <div class="tab-summary">{&tab.summary}</div>
                                }
                            </div>
                        </div>
                    })}
                </div>
            }
        </div>
    }
}

// Helper functions

async fn send_command(command: &Command) -> Result<JsValue, String> {
    let message = serde_wasm_bindgen::to_value(command)
        .map_err(|e| format!("Failed to serialize command: {:?}", e))?;

    sendCommand(message)
        .await
        .map_err(|e| format!("Command failed: {:?}", e))
}

async fn fetch_latest() -> Result<Snapshot, String> {
    let response = send_command(&Command::GetLatestGroups).await?;

    serde_wasm_bindgen::from_value(response)
        .map_err(|e| format!("Failed to parse snapshot: {:?}", e))
}

async fn run_processing() -> Result<Snapshot, String> {
    let response = send_command(&Command::ProcessTabs).await?;

    serde_wasm_bindgen::from_value(response)
        .map_err(|e| format!("Failed to parse snapshot: {:?}", e))
}

async fn request_save(name: Option<String>) -> Result<SavedSession, String> {
    let response = send_command(&Command::SaveSession { name }).await?;

    serde_wasm_bindgen::from_value(response)
        .map_err(|e| format!("Failed to parse session: {:?}", e))
}

async fn load_theme_dark() -> bool {
    match getStorage(THEME_KEY).await {
        Ok(js) => js.as_string().as_deref() == Some("dark"),
        Err(_) => false,
    }
}

async fn persist_theme(dark: bool) {
    let value = JsValue::from_str(if dark { "dark" } else { "light" });
    if let Err(e) = setStorage(THEME_KEY, value).await {
        log::warn!("failed to persist theme: {:?}", e);
    }
}

fn format_date(date: &js_sys::Date) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes()
    )
}

/// Reusable UI components

use yew::prelude::*;

#[derive(PartialEq, Clone)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub message: String,
    #[prop_or(ToastKind::Success)]
    pub kind: ToastKind,
    pub on_dismiss: Callback<MouseEvent>,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let (bg_color, border_color) = match props.kind {
        ToastKind::Success => ("#e8f5e9", "#4caf50"),
        ToastKind::Error => ("#ffebee", "#f44336"),
    };

    html! {
        <div style={format!("position: fixed; bottom: 12px; left: 12px; right: 12px; padding: 10px 12px; border-radius: 4px; background-color: {}; border-left: 4px solid {}; display: flex; justify-content: space-between; align-items: center;", bg_color, border_color)}>
            <span class="toast-message">{&props.message}</span>
            <button onclick={props.on_dismiss.clone()} class="toast-dismiss">{"✗"}</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ThemeToggleProps {
    pub dark: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(ThemeToggle)]
pub fn theme_toggle(props: &ThemeToggleProps) -> Html {
    html! {
        <button
            onclick={props.onclick.clone()}
            class="theme-toggle"
            title={if props.dark { "Switch to light theme" } else { "Switch to dark theme" }}
        >
            {if props.dark { "☀️" } else { "🌙" }}
        </button>
    }
}

//! Connection badge component

use leptos::prelude::*;

/// Badge style for the connection state: green when live, red otherwise
pub fn badge_style(connected: bool) -> String {
    let (color, bg) = if connected {
        ("#155724", "#d4edda")
    } else {
        ("#721c24", "#f8d7da")
    };

    format!(
        "display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; \
         font-size: 0.85em; font-weight: 600; color: {}; background-color: {};",
        color, bg
    )
}

/// A colored badge showing Connected or Disconnected
#[component]
pub fn StatusBadge(#[prop(into)] connected: Signal<bool>) -> impl IntoView {
    view! {
        <span style=move || badge_style(connected.get())>
            {move || if connected.get() { "Connected" } else { "Disconnected" }}
        </span>
    }
}

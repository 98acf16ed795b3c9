//! Sensor card component

use leptos::prelude::*;

/// One sensor reading with its title
#[component]
pub fn SensorCard(title: String, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div style="background: #fff; padding: 1rem; border-radius: 0.25rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1);">
            <div style="font-size: 0.85em; color: #6c757d; margin-bottom: 0.25rem;">{title}</div>
            <div style="font-size: 2em; font-weight: 600;">{move || value.get()}</div>
        </div>
    }
}

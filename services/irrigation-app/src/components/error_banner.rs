//! Error banner component

use leptos::prelude::*;

/// Shows the current error message, if any
#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div
                    role="alert"
                    style="margin-bottom: 1rem; padding: 0.75rem; border-radius: 0.25rem; color: #721c24; background-color: #f8d7da;"
                >
                    {text}
                </div>
            }
        })
    }
}

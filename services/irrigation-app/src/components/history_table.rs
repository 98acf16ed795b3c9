//! Message history table component

use irrigation_telemetry::view::HistoryRow;
use leptos::prelude::*;

/// Displays the message history, newest first
#[component]
pub fn HistoryTable(#[prop(into)] rows: Signal<Vec<HistoryRow>>) -> impl IntoView {
    view! {
        <section>
            <h2>"Recent messages"</h2>
            {move || {
                let data = rows.get();
                if data.is_empty() {
                    view! { <p>"No messages yet."</p> }.into_any()
                } else {
                    view! {
                        <table style="width: 100%; border-collapse: collapse; background: #fff;">
                            <thead>
                                <tr style="border-bottom: 2px solid #dee2e6;">
                                    <th style="padding: 0.5rem; text-align: left;">"Time"</th>
                                    <th style="padding: 0.5rem; text-align: left;">"Topic"</th>
                                    <th style="padding: 0.5rem; text-align: left;">"Value"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {data.into_iter().map(|h| {
                                    view! {
                                        <tr style="border-bottom: 1px solid #dee2e6;">
                                            <td style="padding: 0.5rem;">{h.time}</td>
                                            <td style="padding: 0.5rem;">{h.topic}</td>
                                            <td style="padding: 0.5rem;">{h.value}</td>
                                        </tr>
                                    }
                                }).collect::<Vec<_>>()}
                            </tbody>
                        </table>
                    }.into_any()
                }
            }}
        </section>
    }
}

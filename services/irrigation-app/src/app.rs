//! Main App component

use crate::components::error_banner::ErrorBanner;
use crate::components::history_table::HistoryTable;
use crate::components::sensor_card::SensorCard;
use crate::components::status_badge::StatusBadge;
use crate::live;
use irrigation_telemetry::view::CARDS;
use irrigation_telemetry::{DashboardState, DashboardView};
use leptos::prelude::*;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let state = RwSignal::new(DashboardState::default());
    let view_model = Memo::new(move |_| state.with(|s| DashboardView::from(s)));

    // Effects only run in the browser
    Effect::new(move |_| live::connect(state));

    let connected = Signal::derive(move || view_model.with(|v| v.connected));
    let error = Signal::derive(move || view_model.with(|v| v.error.clone()));
    let history = Signal::derive(move || view_model.with(|v| v.history.clone()));

    let cards = CARDS
        .iter()
        .map(|card| {
            let topic = card.topic;
            let value = Signal::derive(move || view_model.with(|v| v.card_value(topic)));
            view! { <SensorCard title=card.title.to_string() value=value /> }
        })
        .collect::<Vec<_>>();

    view! {
        <main style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
            <header style="display: flex; align-items: center; justify-content: space-between;">
                <h1>"Smart Irrigation Dashboard"</h1>
                <StatusBadge connected=connected />
            </header>
            <ErrorBanner message=error />
            <section style="display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem;">
                {cards}
            </section>
            <HistoryTable rows=history />
        </main>
    }
}

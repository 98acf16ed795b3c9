//! Irrigation Dashboard - Leptos frontend
//!
//! Reactive web UI that talks to the telemetry gateway directly: snapshots
//! over HTTP, live readings over its WebSocket.

pub mod app;
pub mod components;
pub mod live;

pub use app::App;

/// Hydration entry point for WASM client
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    leptos::mount::hydrate_body(App);
}

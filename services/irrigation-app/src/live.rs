//! Browser side of the telemetry feed
//!
//! Loads the status and history snapshots from the gateway and follows its
//! WebSocket, applying everything to one reactive [`DashboardState`]. Outside
//! the browser this is a no-op.

use irrigation_telemetry::DashboardState;
use leptos::prelude::*;

/// Start the snapshot requests and open the stream. The socket is closed when
/// the calling reactive scope is cleaned up.
pub fn connect(state: RwSignal<DashboardState>) {
    #[cfg(all(feature = "hydrate", target_arch = "wasm32"))]
    browser::connect(state);

    #[cfg(not(all(feature = "hydrate", target_arch = "wasm32")))]
    let _ = state;
}

#[cfg(all(feature = "hydrate", target_arch = "wasm32"))]
mod browser {
    use irrigation_telemetry::{ApiEndpoints, CurrentState, DashboardState, HistoryEntry, StateEvent};
    use leptos::logging::{error, log};
    use leptos::prelude::*;
    use leptos::task::spawn_local;
    use serde::de::DeserializeOwned;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

    fn apply(state: RwSignal<DashboardState>, event: StateEvent) {
        state.update(|s| {
            if let Err(e) = s.apply(event) {
                error!("{}", e);
            }
        });
    }

    fn resolve_endpoints() -> Result<ApiEndpoints, String> {
        let window = web_sys::window().ok_or("no window")?;
        let origin = window.location().origin().map_err(|e| format!("{:?}", e))?;
        ApiEndpoints::resolve(option_env!("IRRIGATION_API_URL"), &origin).map_err(|e| e.to_string())
    }

    async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
        let resp = gloo_net::http::Request::get(url)
            .send()
            .await
            .map_err(|e| format!("{}", e))?;
        if !resp.ok() {
            return Err(format!("GET {} returned status {}", url, resp.status()));
        }
        let body = resp.text().await.map_err(|e| format!("{}", e))?;
        serde_json::from_str(&body).map_err(|e| format!("{}", e))
    }

    pub fn connect(state: RwSignal<DashboardState>) {
        let endpoints = match resolve_endpoints() {
            Ok(endpoints) => endpoints,
            Err(e) => {
                error!("Cannot resolve API base: {}", e);
                state.update(DashboardState::endpoints_unresolved);
                return;
            }
        };
        log!("Using telemetry gateway at {}", endpoints.base());

        let status_url = endpoints.status_url();
        spawn_local(async move {
            match fetch_json::<CurrentState>(&status_url).await {
                Ok(status) => apply(state, StateEvent::StatusLoaded(status)),
                Err(e) => {
                    error!("Failed to fetch /api/status: {}", e);
                    apply(state, StateEvent::StatusFailed);
                }
            }
        });

        let history_url = endpoints.history_url();
        spawn_local(async move {
            match fetch_json::<Vec<serde_json::Value>>(&history_url).await {
                Ok(values) => {
                    let (history, skipped) = HistoryEntry::parse_snapshot(values);
                    if skipped > 0 {
                        error!("Skipped {} malformed history entries", skipped);
                    }
                    apply(state, StateEvent::HistoryLoaded(history));
                }
                Err(e) => error!("Failed to fetch /api/history: {}", e),
            }
        });

        match endpoints.stream_url() {
            Ok(url) => open_stream(state, &url),
            Err(e) => {
                error!("Failed to open websocket: {}", e);
                apply(state, StateEvent::StreamUnavailable);
            }
        }
    }

    fn open_stream(state: RwSignal<DashboardState>, url: &str) {
        let ws = match WebSocket::new(url) {
            Ok(ws) => ws,
            Err(e) => {
                error!("Failed to open websocket: {:?}", e);
                apply(state, StateEvent::StreamUnavailable);
                return;
            }
        };

        let onopen = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            apply(state, StateEvent::StreamOpened);
        });
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();

        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |e: MessageEvent| {
            match e.data().as_string() {
                Some(text) => apply(state, StateEvent::StreamMessage(text)),
                None => error!("Invalid WS message: non-text frame"),
            }
        });
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();

        let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |e: CloseEvent| {
            log!("WS closed ({})", e.code());
            apply(state, StateEvent::StreamClosed);
        });
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();

        let onerror = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            error!("WS error: {:?}", e.type_());
            apply(state, StateEvent::StreamError(e.type_()));
        });
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        let socket = StoredValue::new_local(ws);
        on_cleanup(move || {
            socket.with_value(|ws| {
                ws.set_onopen(None);
                ws.set_onmessage(None);
                ws.set_onclose(None);
                ws.set_onerror(None);
                let _ = ws.close();
            });
        });
    }
}

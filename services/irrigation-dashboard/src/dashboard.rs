//! Web dashboard with a server-rendered page and a JSON view endpoint

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;

use irrigation_telemetry::DashboardView;

use crate::reconciler::StateHandle;

/// Dashboard application state
#[derive(Clone)]
pub struct AppState {
    pub state: StateHandle,
}

/// Build the dashboard axum router
pub fn build_router(state: StateHandle) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/state", get(state_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { state })
}

/// Serve the dashboard until the token is cancelled
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: StateHandle,
    cancel: CancellationToken,
) -> crate::Result<()> {
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await
        .map_err(|e| crate::DashboardError::Dashboard(format!("Server error: {}", e)))
}

fn current_view(app: &AppState) -> DashboardView {
    let state = app.state.borrow();
    DashboardView::from(&*state)
}

async fn index_handler(State(app): State<AppState>) -> impl IntoResponse {
    Html(render_page(&current_view(&app)))
}

async fn state_handler(State(app): State<AppState>) -> impl IntoResponse {
    axum::Json(current_view(&app))
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

const REFRESH_SCRIPT: &str = r#"
function esc(s) {
    return String(s).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));
}
function refreshData() {
    fetch('/api/state')
        .then(r => r.json())
        .then(view => {
            const badge = document.getElementById('connection');
            badge.textContent = view.connected ? 'Connected' : 'Disconnected';
            badge.style.color = view.connected ? '#155724' : '#721c24';
            badge.style.backgroundColor = view.connected ? '#d4edda' : '#f8d7da';
            const banner = document.getElementById('banner');
            banner.textContent = view.error || '';
            banner.style.display = view.error ? 'block' : 'none';
            for (const card of view.cards) {
                document.getElementById('card-' + card.topic).textContent = card.value;
            }
            document.getElementById('history-body').innerHTML = view.history.map(h =>
                `<tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">${esc(h.time)}</td>
                    <td style="padding: 0.5rem;">${esc(h.topic)}</td>
                    <td style="padding: 0.5rem;">${esc(h.value)}</td>
                </tr>`).join('');
        });
}
setInterval(refreshData, 2000);
"#;

/// Render the full dashboard page for a view
pub fn render_page(view: &DashboardView) -> String {
    let (color, bg) = if view.connected {
        ("#155724", "#d4edda")
    } else {
        ("#721c24", "#f8d7da")
    };

    let banner_display = if view.error.is_some() { "block" } else { "none" };
    let banner_text = escape_html(view.error.as_deref().unwrap_or(""));

    let cards: String = view
        .cards
        .iter()
        .map(|card| {
            format!(
                r#"<div style="background: #fff; padding: 1rem; border-radius: 0.25rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1);">
                    <div style="font-size: 0.85em; color: #6c757d; margin-bottom: 0.25rem;">{}</div>
                    <div id="card-{}" style="font-size: 2em; font-weight: 600;">{}</div>
                </div>"#,
                escape_html(&card.title),
                escape_html(&card.topic),
                escape_html(&card.value)
            )
        })
        .collect();

    let history_rows: String = view
        .history
        .iter()
        .map(|row| {
            format!(
                r#"<tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                </tr>"#,
                escape_html(&row.time),
                escape_html(&row.topic),
                escape_html(&row.value)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Smart Irrigation Dashboard</title>
    <script>{script}</script>
</head>
<body style="font-family: system-ui, sans-serif; background: #f8fafc; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <header style="display: flex; align-items: center; justify-content: space-between;">
        <h1>Smart Irrigation Dashboard</h1>
        <span id="connection" style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {color}; background-color: {bg};">{status}</span>
    </header>
    <div id="banner" style="display: {banner_display}; margin-bottom: 1rem; padding: 0.75rem; border-radius: 0.25rem; color: #721c24; background-color: #f8d7da;">{banner_text}</div>
    <section style="display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem;">{cards}</section>
    <section>
        <h2>Recent messages</h2>
        <table style="width: 100%; border-collapse: collapse; background: #fff;">
            <thead>
                <tr style="border-bottom: 2px solid #dee2e6;">
                    <th style="padding: 0.5rem; text-align: left;">Time</th>
                    <th style="padding: 0.5rem; text-align: left;">Topic</th>
                    <th style="padding: 0.5rem; text-align: left;">Value</th>
                </tr>
            </thead>
            <tbody id="history-body">{history_rows}</tbody>
        </table>
    </section>
</body>
</html>"#,
        script = REFRESH_SCRIPT,
        color = color,
        bg = bg,
        status = view.status_label(),
        banner_display = banner_display,
        banner_text = banner_text,
        cards = cards,
        history_rows = history_rows,
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

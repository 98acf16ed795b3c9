//! BDD test world for the irrigation dashboard

use cucumber::World;
use irrigation_dashboard::reconciler::StateHandle;
use irrigation_dashboard::stream::Inbound;
use irrigation_telemetry::DashboardState;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    // Reconciliation testing
    pub state: DashboardState,
    pub last_apply_failed: bool,

    // Dashboard testing
    pub response_status: Option<u16>,
    pub response_body: Option<String>,

    // Lifecycle testing
    pub gateway_status: Option<(u16, String)>,
    pub gateway_history: Option<(u16, String)>,
    pub stream_frames: Vec<Inbound>,
    pub stream_refused: bool,
    pub api_base: Option<String>,
    pub live_state: Option<StateHandle>,
    pub cancel: Option<CancellationToken>,
    pub running: Option<JoinHandle<irrigation_dashboard::Result<()>>>,
}

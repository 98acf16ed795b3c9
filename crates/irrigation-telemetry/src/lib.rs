//! Irrigation telemetry model
//!
//! Readings, the bounded message history, and the reconciliation rules that
//! merge an initial REST snapshot with a live stream of sensor messages.
//! Runtime-agnostic so the native service and the browser frontend share it.

pub mod endpoint;
pub mod error;
pub mod history;
pub mod reading;
pub mod state;
pub mod view;

pub use endpoint::ApiEndpoints;
pub use error::{EndpointError, ReconcileError};
pub use history::{History, HISTORY_CAPACITY};
pub use reading::{HistoryEntry, Scalar, TopicValue};
pub use state::{CurrentState, DashboardState, StateEvent};
pub use view::DashboardView;

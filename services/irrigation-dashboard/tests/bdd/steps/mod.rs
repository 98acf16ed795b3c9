//! BDD step definitions for the irrigation dashboard

pub mod lifecycle_steps;
pub mod reconciliation_steps;

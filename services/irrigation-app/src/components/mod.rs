//! UI components

pub mod error_banner;
pub mod history_table;
pub mod sensor_card;
pub mod status_badge;

//! Operator maintenance tasks.

pub mod service;

pub use service::{CleanupReport, MaintenanceService};

//! Notification feed and status-change recipient rules.

pub mod rules;
pub mod service;

pub use rules::status_change_recipients;
pub use service::NotificationService;

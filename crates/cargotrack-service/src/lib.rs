//! # cargotrack-service
//!
//! Business logic service layer for CargoTrack. Each service orchestrates
//! the stores, the object store and access control to implement one
//! application-level use case family.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod directory;
pub mod file;
pub mod maintenance;
pub mod notification;
pub mod order;

pub use context::RequestContext;
pub use directory::{DirectoryService, ImportMode, ImportReport};
pub use file::{FileRelayService, UploadRequest};
pub use maintenance::{CleanupReport, MaintenanceService};
pub use notification::{NotificationService, status_change_recipients};
pub use order::{OrderInput, OrderPatch, OrderQuery, OrderService};

#[cfg(test)]
pub(crate) mod testing;

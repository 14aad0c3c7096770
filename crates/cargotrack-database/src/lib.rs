//! # cargotrack-database
//!
//! PostgreSQL connection management, the store traits the service layer
//! depends on, their sqlx-backed repositories, and an in-memory store for
//! tests and local development.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use store::{
    FileUploadStore, NotificationStore, OrderFilter, OrderStore, ProfileStore, RecipientExcess,
};

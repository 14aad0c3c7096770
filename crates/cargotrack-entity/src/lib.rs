//! # cargotrack-entity
//!
//! Domain entity models for CargoTrack. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod file;
pub mod notification;
pub mod order;
pub mod profile;

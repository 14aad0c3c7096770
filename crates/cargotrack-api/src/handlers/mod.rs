//! Route handlers organized by domain.

pub mod admin;
pub mod file;
pub mod health;
pub mod notification;
pub mod order;
pub mod user;

//! Shipment orders: create, query, update and status transitions.

pub mod input;
pub mod service;

pub use input::{OrderInput, OrderPatch, OrderQuery};
pub use service::OrderService;

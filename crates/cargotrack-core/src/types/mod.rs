//! Shared value types.

pub mod scope;

pub use scope::Scope;

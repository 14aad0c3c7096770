//! Identity provider admin API.

pub mod client;
pub mod users;

pub use client::ProviderAdminClient;
pub use users::{ProviderUser, decode_user_list};

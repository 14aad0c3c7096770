//! # cargotrack-auth
//!
//! Authentication and authorization for CargoTrack.
//!
//! ## Modules
//!
//! - `identity`: bearer token verification (JWKS, shared secret, unverified fallback)
//! - `principal`: the authenticated caller
//! - `acl`: party-based access checks and list scoping
//! - `admin`: identity provider admin API client (user listing)

pub mod acl;
pub mod admin;
pub mod identity;
pub mod principal;

pub use acl::{PartyRecord, can_access, can_modify, list_scope};
pub use admin::{ProviderAdminClient, ProviderUser};
pub use identity::IdentityResolver;
pub use principal::Principal;

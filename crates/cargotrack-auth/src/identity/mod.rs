//! Bearer token verification.
//!
//! Stages run in order and each only when configured: provider JWKS,
//! shared secret, then unverified decoding for development.

pub mod claims;
pub mod jwks;
pub mod resolver;
pub mod unverified;

#[cfg(test)]
pub(crate) mod test_keys;

pub use claims::TokenClaims;
pub use jwks::JwksVerifier;
pub use resolver::IdentityResolver;

//! Resolve a bearer token into a [`Principal`].

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::{debug, warn};

use cargotrack_core::config::IdentityConfig;
use cargotrack_core::error::AppError;
use cargotrack_core::result::AppResult;

use super::claims::TokenClaims;
use super::jwks::JwksVerifier;
use super::unverified;
use crate::principal::Principal;

/// Runs the configured verification stages in order.
#[derive(Clone)]
pub struct IdentityResolver {
    jwks: Option<JwksVerifier>,
    secret: Option<DecodingKey>,
    allow_unverified: bool,
    admin_email: String,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("jwks", &self.jwks)
            .field("shared_secret", &self.secret.is_some())
            .field("allow_unverified", &self.allow_unverified)
            .finish()
    }
}

impl IdentityResolver {
    /// Build the resolver from identity configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let jwks = match config.jwks_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => Some(JwksVerifier::new(
                url,
                Duration::from_secs(config.jwks_timeout_seconds),
            )?),
            None => None,
        };
        let secret = config
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| DecodingKey::from_secret(s.as_bytes()));

        if config.allow_unverified {
            warn!("Unverified token decoding is enabled; do not use this outside development");
        }

        Ok(Self {
            jwks,
            secret,
            allow_unverified: config.allow_unverified,
            admin_email: config.admin_email.clone(),
        })
    }

    /// The configured administrator email.
    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    /// Verify the token and build the caller's principal.
    pub async fn resolve(&self, token: &str) -> AppResult<Principal> {
        let claims = self.verify(token).await?;
        Principal::from_claims(claims, &self.admin_email)
    }

    async fn verify(&self, token: &str) -> AppResult<TokenClaims> {
        if let Some(ref jwks) = self.jwks {
            match jwks.verify(token).await {
                Ok(claims) => return Ok(claims),
                Err(e) => warn!(error = %e, "JWKS verification failed"),
            }
        }

        if let Some(ref key) = self.secret {
            match verify_with_secret(token, key) {
                Ok(claims) => return Ok(claims),
                Err(e) => debug!(error = %e, "Shared secret verification failed"),
            }
        }

        if self.allow_unverified {
            match unverified::decode_claims(token) {
                Ok(claims) => {
                    warn!(sub = %claims.sub, "Accepted token without verification");
                    return Ok(claims);
                }
                Err(e) => debug!(error = %e, "Unverified decoding failed"),
            }
        }

        Err(AppError::authentication("Invalid authentication"))
    }
}

fn verify_with_secret(token: &str, key: &DecodingKey) -> AppResult<TokenClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.validate_exp = true;
    decode::<TokenClaims>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(map_jwt_error)
}

/// Map a jsonwebtoken failure onto an authentication error.
pub(crate) fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AppError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::authentication("Token has expired")
        }
        jsonwebtoken::errors::ErrorKind::InvalidToken => {
            AppError::authentication("Invalid token format")
        }
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            AppError::authentication("Invalid token signature")
        }
        _ => AppError::authentication(format!("Token validation failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cargotrack_core::error::ErrorKind;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn config() -> IdentityConfig {
        IdentityConfig {
            jwt_secret: Some(SECRET.into()),
            admin_email: "admin@cargotrack.test".into(),
            ..IdentityConfig::default()
        }
    }

    fn mint(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn exp() -> i64 {
        chrono::Utc::now().timestamp() + 600
    }

    #[tokio::test]
    async fn test_shared_secret_token_resolves() {
        let resolver = IdentityResolver::new(&config()).unwrap();
        let token = mint(
            json!({"sub": "u1", "email": "admin@cargotrack.test", "exp": exp()}),
            SECRET,
        );
        let principal = resolver.resolve(&token).await.unwrap();
        assert_eq!(principal.subject, "u1");
        assert!(principal.is_admin);
    }

    #[tokio::test]
    async fn test_wrong_secret_is_rejected() {
        let resolver = IdentityResolver::new(&config()).unwrap();
        let token = mint(json!({"sub": "u1", "email": "a@x.test", "exp": exp()}), "other");
        let err = resolver.resolve(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let resolver = IdentityResolver::new(&config()).unwrap();
        let past = chrono::Utc::now().timestamp() - 3600;
        let token = mint(json!({"sub": "u1", "email": "a@x.test", "exp": past}), SECRET);
        assert!(resolver.resolve(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_unverified_fallback_only_when_enabled() {
        let token = mint(json!({"sub": "dev", "email": "dev@x.test", "exp": exp()}), "unknown");

        let strict = IdentityResolver::new(&config()).unwrap();
        assert!(strict.resolve(&token).await.is_err());

        let lax = IdentityResolver::new(&IdentityConfig {
            allow_unverified: true,
            ..config()
        })
        .unwrap();
        assert_eq!(lax.resolve(&token).await.unwrap().email, "dev@x.test");
    }

    #[tokio::test]
    async fn test_no_stage_configured_rejects() {
        let resolver = IdentityResolver::new(&IdentityConfig::default()).unwrap();
        let token = mint(json!({"sub": "u1", "email": "a@x.test", "exp": exp()}), SECRET);
        assert!(resolver.resolve(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_jwks_falls_through_to_secret() {
        let resolver = IdentityResolver::new(&IdentityConfig {
            jwks_url: Some("http://127.0.0.1:9/.well-known/jwks.json".into()),
            jwks_timeout_seconds: 1,
            ..config()
        })
        .unwrap();
        let token = mint(json!({"sub": "u1", "email": "a@x.test", "exp": exp()}), SECRET);
        assert_eq!(resolver.resolve(&token).await.unwrap().email, "a@x.test");
    }

    #[tokio::test]
    async fn test_jwks_stage_accepts_provider_token() {
        use crate::identity::test_keys::{KID, es256_token, jwks, serve_json};

        let resolver = IdentityResolver::new(&IdentityConfig {
            jwks_url: Some(serve_json(jwks()).await),
            ..config()
        })
        .unwrap();

        let token = es256_token(
            KID,
            &json!({"sub": "prov-1", "email": "ops@acme.test", "exp": exp()}),
        );
        let principal = resolver.resolve(&token).await.unwrap();
        assert_eq!(principal.subject, "prov-1");
        assert!(!principal.is_admin);

        let shared = mint(json!({"sub": "u1", "email": "a@x.test", "exp": exp()}), SECRET);
        assert_eq!(resolver.resolve(&shared).await.unwrap().email, "a@x.test");
    }

    #[tokio::test]
    async fn test_kid_miss_falls_through_and_fails_without_other_stages() {
        use crate::identity::test_keys::{es256_token, jwks, serve_json};

        let resolver = IdentityResolver::new(&IdentityConfig {
            jwks_url: Some(serve_json(jwks()).await),
            jwt_secret: None,
            ..config()
        })
        .unwrap();
        let token = es256_token("unknown-kid", &json!({"sub": "u1", "email": "a@x.test", "exp": exp()}));
        let err = resolver.resolve(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);

        let lax = IdentityResolver::new(&IdentityConfig {
            jwks_url: Some(serve_json(jwks()).await),
            jwt_secret: None,
            allow_unverified: true,
            ..config()
        })
        .unwrap();
        assert_eq!(lax.resolve(&token).await.unwrap().email, "a@x.test");
    }
}

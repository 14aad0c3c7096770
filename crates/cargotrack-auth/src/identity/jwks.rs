//! Verification against the provider's published JSON Web Key Set.

use std::time::Duration;

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use tracing::debug;

use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;

use super::claims::TokenClaims;
use super::resolver::map_jwt_error;

/// Asymmetric algorithms accepted from the key set.
const ACCEPTED: [Algorithm; 2] = [Algorithm::RS256, Algorithm::ES256];

/// Fetches the JWKS and verifies tokens against the key named by `kid`.
#[derive(Debug, Clone)]
pub struct JwksVerifier {
    url: String,
    http: reqwest::Client,
}

impl JwksVerifier {
    /// Create a verifier whose key set fetch gives up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build JWKS client", e)
            })?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    async fn fetch(&self) -> AppResult<JwkSet> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Failed to fetch JWKS", e)
            })?;
        response.json::<JwkSet>().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed JWKS document", e)
        })
    }

    /// Verify a token: signature, algorithm and expiry. Audience is not checked.
    pub async fn verify(&self, token: &str) -> AppResult<TokenClaims> {
        let header = decode_header(token).map_err(map_jwt_error)?;
        if !ACCEPTED.contains(&header.alg) {
            return Err(AppError::authentication(format!(
                "Unsupported token algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AppError::authentication("Token header has no key id"))?;

        let keys = self.fetch().await?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AppError::authentication(format!("No JWKS key matches kid '{kid}'")))?;
        let key = DecodingKey::from_jwk(jwk).map_err(map_jwt_error)?;

        let mut validation = Validation::new(header.alg);
        validation.validate_aud = false;
        validation.validate_exp = true;

        let data = decode::<TokenClaims>(token, &key, &validation).map_err(map_jwt_error)?;
        debug!(kid = %kid, sub = %data.claims.sub, "Token verified against JWKS");
        Ok(data.claims)
    }
}

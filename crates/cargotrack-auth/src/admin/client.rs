//! HTTP client for the identity provider admin API.

use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::info;

use cargotrack_core::config::IdentityConfig;
use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;

use super::users::{ProviderUser, decode_user_list};

/// Lists provider users with the service key.
#[derive(Debug, Clone)]
pub struct ProviderAdminClient {
    http: reqwest::Client,
    provider_url: String,
    service_key: String,
}

impl ProviderAdminClient {
    /// Create a client from identity configuration.
    ///
    /// Both `identity.provider_url` and `identity.service_key` are required.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        if config.provider_url.is_empty() || config.service_key.is_empty() {
            return Err(AppError::configuration(
                "identity.provider_url and identity.service_key are required to list users",
            ));
        }
        let http = reqwest::Client::builder().build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;
        Ok(Self {
            http,
            provider_url: config.provider_url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        })
    }

    fn users_url(&self) -> String {
        format!("{}/auth/v1/admin/users", self.provider_url)
    }

    /// `GET /auth/v1/admin/users`, normalised to a flat list.
    pub async fn list_users(&self) -> AppResult<Vec<ProviderUser>> {
        let response = self
            .http
            .get(self.users_url())
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key))
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to reach identity provider: {e}"),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Identity provider returned {status}: {body}"
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Identity provider returned a non-JSON body",
                e,
            )
        })?;
        let users = decode_user_list(body)?;
        info!(count = users.len(), "Fetched users from identity provider");
        Ok(users)
    }
}

//! REST client for the storefront endpoints of the platform API.
//!
//! Wraps profile fetch, draft save, publish, unpublish and the
//! breeding-program reference lookup using [`reqwest`]. Every request
//! carries the tenant id (path and `X-Tenant-Id`) and a fresh
//! `X-Request-Id` for log correlation.

use async_trait::async_trait;
use serde::Deserialize;
use storefront_core::backend::{BackendError, ProfileSnapshot, StorefrontBackend};
use storefront_core::profile::StorefrontProfile;
use storefront_core::roster::BreedingProgramRefs;
use storefront_core::tenant::TenantContext;
use uuid::Uuid;

use crate::config::ClientConfig;

/// Header carrying the tenant id on every request.
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// HTTP client for the storefront endpoints.
pub struct StorefrontApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the storefront REST layer.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Storefront API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Error body shape returned by the platform API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Pull the human-readable reason out of an API error body, if any.
pub fn extract_error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .filter(|m| !m.trim().is_empty())
}

impl From<StorefrontApiError> for BackendError {
    fn from(err: StorefrontApiError) -> Self {
        match err {
            StorefrontApiError::ApiError { status, body } => match extract_error_message(&body) {
                Some(reason) => BackendError::Rejected(reason),
                None => BackendError::Transport(format!("HTTP {status}")),
            },
            StorefrontApiError::Request(e) => BackendError::Transport(e.to_string()),
        }
    }
}

impl StorefrontApi {
    /// Create a client from configuration, applying its request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, StorefrontApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of a tenant-scoped endpoint, e.g. `storefront/draft`.
    pub fn tenant_url(&self, tenant: &TenantContext, path: &str) -> String {
        format!(
            "{}/api/v1/tenants/{}/{}",
            self.api_url,
            tenant.tenant_id(),
            path.trim_start_matches('/')
        )
    }

    /// Fetch the published and draft snapshots.
    ///
    /// Sends `GET /api/v1/tenants/{id}/storefront`.
    pub async fn get_storefront(
        &self,
        tenant: &TenantContext,
    ) -> Result<ProfileSnapshot, StorefrontApiError> {
        let response = self
            .request(reqwest::Method::GET, tenant, "storefront")
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Store `profile` as the tenant's draft.
    ///
    /// Sends `PUT /api/v1/tenants/{id}/storefront/draft`.
    pub async fn put_draft(
        &self,
        tenant: &TenantContext,
        profile: &StorefrontProfile,
    ) -> Result<(), StorefrontApiError> {
        let response = self
            .request(reqwest::Method::PUT, tenant, "storefront/draft")
            .json(profile)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Publish `profile` as the live storefront.
    ///
    /// Sends `POST /api/v1/tenants/{id}/storefront/publish`.
    pub async fn post_publish(
        &self,
        tenant: &TenantContext,
        profile: &StorefrontProfile,
    ) -> Result<(), StorefrontApiError> {
        let response = self
            .request(reqwest::Method::POST, tenant, "storefront/publish")
            .json(profile)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Take the storefront offline. The draft is left alone.
    ///
    /// Sends `POST /api/v1/tenants/{id}/storefront/unpublish`.
    pub async fn post_unpublish(&self, tenant: &TenantContext) -> Result<(), StorefrontApiError> {
        let response = self
            .request(reqwest::Method::POST, tenant, "storefront/unpublish")
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Breed texts referenced by the tenant's breeding programs.
    ///
    /// Sends `GET /api/v1/tenants/{id}/breeding-programs/breed-references`.
    pub async fn get_breed_references(
        &self,
        tenant: &TenantContext,
    ) -> Result<Vec<String>, StorefrontApiError> {
        let response = self
            .request(
                reqwest::Method::GET,
                tenant,
                "breeding-programs/breed-references",
            )
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn request(
        &self,
        method: reqwest::Method,
        tenant: &TenantContext,
        path: &str,
    ) -> reqwest::RequestBuilder {
        let url = self.tenant_url(tenant, path);
        let request_id = Uuid::new_v4();
        tracing::debug!(
            tenant_id = tenant.tenant_id(),
            %request_id,
            %method,
            url = %url,
            "Storefront API request",
        );
        self.client
            .request(method, url)
            .header(TENANT_HEADER, tenant.tenant_id().to_string())
            .header(REQUEST_ID_HEADER, request_id.to_string())
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`StorefrontApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StorefrontApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), body = %body, "Storefront API error");
            return Err(StorefrontApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StorefrontApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), StorefrontApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl StorefrontBackend for StorefrontApi {
    async fn fetch_profile(&self, tenant: &TenantContext) -> Result<ProfileSnapshot, BackendError> {
        Ok(self.get_storefront(tenant).await?)
    }

    async fn save_draft(
        &self,
        tenant: &TenantContext,
        profile: &StorefrontProfile,
    ) -> Result<(), BackendError> {
        Ok(self.put_draft(tenant, profile).await?)
    }

    async fn publish(
        &self,
        tenant: &TenantContext,
        profile: &StorefrontProfile,
    ) -> Result<(), BackendError> {
        Ok(self.post_publish(tenant, profile).await?)
    }

    async fn unpublish(&self, tenant: &TenantContext) -> Result<(), BackendError> {
        Ok(self.post_unpublish(tenant).await?)
    }

    async fn fetch_breeding_program_references(
        &self,
        tenant: &TenantContext,
    ) -> Result<BreedingProgramRefs, BackendError> {
        let names = self.get_breed_references(tenant).await?;
        Ok(BreedingProgramRefs::new(names))
    }
}

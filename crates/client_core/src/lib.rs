//! HTTP client for the Modeling Commons service and the async seam the
//! upload dialog talks through.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Serialize;
use shared::{
    domain::{Group, ModelSummary, Person},
    error::{ApiError, ApiException, ErrorCode},
    protocol::{
        CreateModelPayload, GroupsResponseBody, LoginPayload, LoginResponseBody,
        SearchResponseBody, UpdateModelPayload, UploadResponseBody, UploadStatus,
    },
};
use tokio::task::AbortHandle;
use tracing::warn;
use url::Url;

pub use shared::domain::{GroupId, ModelId, PermissionLevel, UploadMode};

/// Preview image attached to a new-model upload. File-backed images are
/// read lazily, when the upload request is actually issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewImage {
    Png(Vec<u8>),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewModelUpload {
    pub name: String,
    pub group: Option<GroupId>,
    pub visibility: PermissionLevel,
    pub changeability: PermissionLevel,
    pub preview: Option<PreviewImage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelUpdate {
    pub model_id: ModelId,
    pub name: String,
    pub description: String,
    pub mode: UploadMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub status: UploadStatus,
    pub model: Option<ModelSummary>,
}

impl UploadOutcome {
    fn connection_error() -> Self {
        Self {
            status: UploadStatus::ConnectionError,
            model: None,
        }
    }
}

/// Everything the upload dialog needs from the Commons.
///
/// Upload and update are infallible at the transport level: failures are
/// folded into `UploadStatus::ConnectionError` so callers deal with one
/// status vocabulary. Search and account calls surface transport errors
/// directly.
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn login(&self, email_address: &str, password: &str) -> Result<Person>;
    async fn logout(&self) -> Result<()>;
    async fn list_groups(&self) -> Result<Vec<Group>>;
    async fn search_models(
        &self,
        query: &str,
        limit: u32,
        changeable_only: bool,
    ) -> Result<Vec<ModelSummary>>;
    async fn upload_model(&self, upload: NewModelUpload) -> Result<UploadOutcome>;
    async fn update_model(&self, update: ModelUpdate) -> Result<UploadOutcome>;
}

/// Handle to one in-flight request, identified by the generation stamped
/// when it was issued. `abort` cancels the spawned task so its completion
/// event is never queued; the generation lets the issuer recognize (and
/// discard) a response that raced the abort.
#[derive(Debug)]
pub struct RequestHandle {
    generation: u64,
    abort: AbortHandle,
}

impl RequestHandle {
    pub fn new(generation: u64, abort: AbortHandle) -> Self {
        Self { generation, abort }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn abort(&self) {
        self.abort.abort();
    }
}

/// `reqwest`-backed [`ModelService`]. Session state lives in the cookie
/// store, so one client instance spans login through upload.
pub struct CommonsClient {
    http: Client,
    base_url: Url,
}

impl CommonsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid Modeling Commons url: {base_url}"))?;
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path: {path}"))
    }

    async fn post_for_status<P: Serialize + Sync>(&self, path: &str, payload: &P) -> UploadOutcome {
        match self.try_post_for_status(path, payload).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(path, "modeling commons request failed: {err:#}");
                UploadOutcome::connection_error()
            }
        }
    }

    async fn try_post_for_status<P: Serialize + Sync>(
        &self,
        path: &str,
        payload: &P,
    ) -> Result<UploadOutcome> {
        let body: UploadResponseBody = self
            .http
            .post(self.endpoint(path)?)
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(UploadOutcome {
            status: UploadStatus::from_wire(&body.status),
            model: body.model,
        })
    }

    async fn encode_preview(&self, preview: Option<PreviewImage>) -> Result<Option<String>> {
        match preview {
            None => Ok(None),
            Some(PreviewImage::Png(bytes)) => Ok(Some(STANDARD.encode(bytes))),
            Some(PreviewImage::File(path)) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("unreadable preview image: {}", path.display()))?;
                Ok(Some(STANDARD.encode(bytes)))
            }
        }
    }
}

#[async_trait]
impl ModelService for CommonsClient {
    async fn login(&self, email_address: &str, password: &str) -> Result<Person> {
        let response = self
            .http
            .post(self.endpoint("account/login")?)
            .json(&LoginPayload {
                email_address: email_address.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            let error: ApiError = response.json().await.unwrap_or_else(|_| {
                ApiError::new(ErrorCode::NotLoggedIn, "Invalid email address or password")
            });
            return Err(ApiException::from(error).into());
        }

        let body: LoginResponseBody = response.error_for_status()?.json().await?;
        Ok(body.person)
    }

    async fn logout(&self) -> Result<()> {
        self.http
            .post(self.endpoint("account/logout")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let body: GroupsResponseBody = self
            .http
            .get(self.endpoint("account/groups")?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.groups)
    }

    async fn search_models(
        &self,
        query: &str,
        limit: u32,
        changeable_only: bool,
    ) -> Result<Vec<ModelSummary>> {
        let body: SearchResponseBody = self
            .http
            .get(self.endpoint("models/search")?)
            .query(&[
                ("query", query.to_string()),
                ("limit", limit.to_string()),
                ("changeable_only", changeable_only.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.models)
    }

    async fn upload_model(&self, upload: NewModelUpload) -> Result<UploadOutcome> {
        let preview_image_b64 = match self.encode_preview(upload.preview).await {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("preview image rejected before upload: {err:#}");
                return Ok(UploadOutcome {
                    status: UploadStatus::InvalidPreviewImage,
                    model: None,
                });
            }
        };
        let payload = CreateModelPayload {
            name: upload.name,
            group_id: upload.group,
            visibility: upload.visibility,
            changeability: upload.changeability,
            preview_image_b64,
        };
        Ok(self.post_for_status("models/create", &payload).await)
    }

    async fn update_model(&self, update: ModelUpdate) -> Result<UploadOutcome> {
        let payload = UpdateModelPayload {
            model_id: update.model_id,
            name: update.name,
            description: update.description,
            mode: update.mode,
        };
        Ok(self.post_for_status("models/update", &payload).await)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

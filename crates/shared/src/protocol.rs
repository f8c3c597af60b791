use serde::{Deserialize, Serialize};

use crate::domain::{Group, GroupId, ModelId, ModelSummary, PermissionLevel, Person, UploadMode};

/// Outcome of an upload or update request, as reported by the Commons.
///
/// The wire contract is the raw status string, matched exactly and
/// case-sensitively; anything the client does not recognize becomes
/// `Unrecognized` rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    NotLoggedIn,
    MissingParameters,
    ModelNotSaved,
    ConnectionError,
    Success,
    InvalidPreviewImage,
    SuccessPreviewNotSaved,
    Unrecognized,
}

impl UploadStatus {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "NOT_LOGGED_IN" => UploadStatus::NotLoggedIn,
            "MISSING_PARAMETERS" => UploadStatus::MissingParameters,
            "MODEL_NOT_SAVED" => UploadStatus::ModelNotSaved,
            "CONNECTION_ERROR" => UploadStatus::ConnectionError,
            "SUCCESS" => UploadStatus::Success,
            "INVALID_PREVIEW_IMAGE" => UploadStatus::InvalidPreviewImage,
            "SUCCESS_PREVIEW_NOT_SAVED" => UploadStatus::SuccessPreviewNotSaved,
            _ => UploadStatus::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email_address: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponseBody {
    pub person: Person,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupsResponseBody {
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponseBody {
    pub models: Vec<ModelSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateModelPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    pub visibility: PermissionLevel,
    pub changeability: PermissionLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image_b64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateModelPayload {
    pub model_id: ModelId,
    pub name: String,
    pub description: String,
    pub mode: UploadMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponseBody {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelSummary>,
}

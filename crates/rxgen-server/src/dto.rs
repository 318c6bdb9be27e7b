use rxgen_core::{ExtractedResult, Profile, QueryLog};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::GenerationRequest;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub instruction: Option<String>,
    /// Loosely typed; see [`example_list`].
    #[serde(default)]
    pub examples: Option<Value>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub profile_name: Option<String>,
}

impl From<GenerateRequest> for GenerationRequest {
    fn from(request: GenerateRequest) -> Self {
        GenerationRequest {
            instruction: request.instruction,
            examples: example_list(request.examples),
            language: request.language,
            profile_name: request.profile_name,
        }
    }
}

/// Scalar array elements are rendered as text; nulls, nested values and
/// non-array bodies contribute nothing.
fn example_list(value: Option<Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(_) | Value::Bool(_) => Some(item.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub ok: bool,
    pub text: String,
    pub extracted: ExtractedResult,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub master: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
}

impl From<Profile> for ProfileSummary {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub ok: bool,
    pub profile: ProfileSummary,
}

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub ok: bool,
    pub profiles: Vec<ProfileSummary>,
}

#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub ok: bool,
    pub logs: Vec<QueryLog>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub ok: bool,
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub generation_configured: bool,
}

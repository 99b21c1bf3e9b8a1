use serde::{Deserialize, Serialize};

/// Backend platforms the gateway can route to. All of them host the same
/// Gradio applications; they differ in domain, catalog mirror, and
/// credential policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    HuggingFace,
    ModelScope,
    OpenXlab,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [Self::HuggingFace, Self::ModelScope, Self::OpenXlab];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::ModelScope => "modelscope",
            Self::OpenXlab => "openxlab",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound body of `POST /v1/images/generations`. Unknown fields are
/// ignored so OpenAI clients sending `size`, `quality`, or `user` keep
/// working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
}

/// One generated image as reported by a backend, before public shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOutput {
    pub url: String,
    pub seed: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

/// Public success shape of `POST /v1/images/generations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub created: u64,
    pub data: Vec<ImageData>,
}

/// Parsed contents of the `Authorization` header. A provider hint scopes
/// the credential to one backend platform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credential {
    pub token: Option<String>,
    pub provider_hint: Option<ProviderId>,
}

impl Credential {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.provider_hint.is_none()
    }
}

/// Entry of the `GET /v1/models` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelObject {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub owned_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelObject>,
}

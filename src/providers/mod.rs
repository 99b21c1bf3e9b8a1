pub mod space;

use crate::core::types::ProviderId;

/// Static routing and credential policy for one hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: ProviderId,
    /// Domain suffix the platform serves applications under; also the
    /// recognition key for asset URL rewriting.
    pub host_suffix: &'static str,
    pub requires_auth: bool,
}

impl ProviderConfig {
    /// Root of the Gradio HTTP API for one hosted application.
    pub fn api_root(&self, space: &str) -> String {
        format!("https://{space}{}/gradio_api", self.host_suffix)
    }
}

static HUGGING_FACE: ProviderConfig = ProviderConfig {
    provider: ProviderId::HuggingFace,
    host_suffix: ".hf.space",
    requires_auth: false,
};

static MODEL_SCOPE: ProviderConfig = ProviderConfig {
    provider: ProviderId::ModelScope,
    host_suffix: ".ms.show",
    requires_auth: false,
};

// OpenXLab fronts every app with account tokens; anonymous queue calls are
// rejected upstream, so the gateway rejects them before the network.
static OPEN_XLAB: ProviderConfig = ProviderConfig {
    provider: ProviderId::OpenXlab,
    host_suffix: ".openxlab.space",
    requires_auth: true,
};

pub fn provider_config(provider: ProviderId) -> &'static ProviderConfig {
    match provider {
        ProviderId::HuggingFace => &HUGGING_FACE,
        ProviderId::ModelScope => &MODEL_SCOPE,
        ProviderId::OpenXlab => &OPEN_XLAB,
    }
}

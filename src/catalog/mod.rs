use crate::core::types::{ModelList, ModelObject, ProviderId};

/// One routable model: the public id plus the backend coordinates needed to
/// drive its hosted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub id: &'static str,
    pub owned_by: &'static str,
    pub created: u64,
    pub provider: ProviderId,
    /// Application id on the hosting platform; combined with the provider's
    /// domain to form the API root.
    pub space: &'static str,
    /// Named Gradio endpoint the queue protocol targets.
    pub endpoint: &'static str,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub aliases: &'static [&'static str],
}

/// Routing decision for one request, derived once from the requested model
/// string and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub provider: ProviderId,
    pub entry: &'static ModelEntry,
}

/// The mirrored catalog. Hugging Face hosts the primary spaces; ModelScope
/// and OpenXLab mirror a subset under their own domains. The `dall-e`
/// aliases keep stock OpenAI clients routable.
static CATALOG: &[ModelEntry] = &[
    ModelEntry {
        id: "flux-schnell",
        owned_by: "black-forest-labs",
        created: 1_722_816_000,
        provider: ProviderId::HuggingFace,
        space: "black-forest-labs-flux-1-schnell",
        endpoint: "infer",
        width: 1024,
        height: 1024,
        steps: 4,
        aliases: &["black-forest-labs/flux.1-schnell", "flux.1-schnell", "dall-e-2"],
    },
    ModelEntry {
        id: "flux-dev",
        owned_by: "black-forest-labs",
        created: 1_722_816_000,
        provider: ProviderId::HuggingFace,
        space: "black-forest-labs-flux-1-dev",
        endpoint: "infer",
        width: 1024,
        height: 1024,
        steps: 28,
        aliases: &["black-forest-labs/flux.1-dev", "flux.1-dev", "dall-e-3"],
    },
    ModelEntry {
        id: "sd-3.5-large",
        owned_by: "stabilityai",
        created: 1_729_555_200,
        provider: ProviderId::ModelScope,
        space: "stabilityai-stable-diffusion-3-5-large",
        endpoint: "infer",
        width: 1024,
        height: 1024,
        steps: 28,
        aliases: &["stabilityai/stable-diffusion-3.5-large", "sd3.5-large"],
    },
    ModelEntry {
        id: "sdxl-turbo",
        owned_by: "stabilityai",
        created: 1_700_611_200,
        provider: ProviderId::OpenXlab,
        space: "stabilityai-sdxl-turbo",
        endpoint: "generate",
        width: 512,
        height: 512,
        steps: 1,
        aliases: &["stabilityai/sdxl-turbo"],
    },
    ModelEntry {
        id: "playground-v2.5",
        owned_by: "playgroundai",
        created: 1_708_992_000,
        provider: ProviderId::HuggingFace,
        space: "playgroundai-playground-v2-5",
        endpoint: "infer",
        width: 1024,
        height: 1024,
        steps: 25,
        aliases: &["playgroundai/playground-v2.5-1024px-aesthetic"],
    },
];

/// Resolves a requested model id against the alias table. Unknown ids fall
/// back to the default entry instead of failing; clients pinned to OpenAI
/// model names keep working.
pub fn resolve(requested: &str) -> ResolvedTarget {
    let wanted = requested.trim();

    for entry in CATALOG {
        let matches = entry.id.eq_ignore_ascii_case(wanted)
            || entry
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(wanted));
        if matches {
            return ResolvedTarget {
                provider: entry.provider,
                entry,
            };
        }
    }

    default_target()
}

pub fn default_target() -> ResolvedTarget {
    let entry = &CATALOG[0];
    ResolvedTarget {
        provider: entry.provider,
        entry,
    }
}

/// Static listing served by `GET /v1/models`, in catalog order.
pub fn model_list() -> ModelList {
    ModelList {
        object: "list".to_string(),
        data: CATALOG
            .iter()
            .map(|entry| ModelObject {
                id: entry.id.to_string(),
                object: "model".to_string(),
                created: entry.created,
                owned_by: entry.owned_by.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests;

use super::*;

#[test]
fn test_resolve_by_primary_id() {
    let target = resolve("flux-dev");
    assert_eq!(target.provider, ProviderId::HuggingFace);
    assert_eq!(target.entry.id, "flux-dev");
    assert_eq!(target.entry.space, "black-forest-labs-flux-1-dev");
}

#[test]
fn test_resolve_by_alias_case_insensitive() {
    let target = resolve("Black-Forest-Labs/FLUX.1-schnell");
    assert_eq!(target.entry.id, "flux-schnell");

    let target = resolve("SD3.5-LARGE");
    assert_eq!(target.entry.id, "sd-3.5-large");
    assert_eq!(target.provider, ProviderId::ModelScope);
}

#[test]
fn test_resolve_openai_aliases() {
    assert_eq!(resolve("dall-e-2").entry.id, "flux-schnell");
    assert_eq!(resolve("dall-e-3").entry.id, "flux-dev");
}

#[test]
fn test_resolve_unknown_falls_back_to_default() {
    let target = resolve("made-up-model-9000");
    assert_eq!(target.entry.id, default_target().entry.id);
    assert_eq!(target.provider, ProviderId::HuggingFace);

    // An empty model string (absent field) resolves the same way.
    assert_eq!(resolve("").entry.id, default_target().entry.id);
}

#[test]
fn test_resolve_trims_whitespace() {
    assert_eq!(resolve("  flux-schnell  ").entry.id, "flux-schnell");
}

#[test]
fn test_openxlab_entry_exists() {
    let target = resolve("sdxl-turbo");
    assert_eq!(target.provider, ProviderId::OpenXlab);
    assert_eq!(target.entry.endpoint, "generate");
}

#[test]
fn test_model_list_shape_and_order() {
    let listing = model_list();
    assert_eq!(listing.object, "list");

    let ids: Vec<&str> = listing.data.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "flux-schnell",
            "flux-dev",
            "sd-3.5-large",
            "sdxl-turbo",
            "playground-v2.5"
        ]
    );

    for model in &listing.data {
        assert_eq!(model.object, "model");
        assert!(model.created > 0);
        assert!(!model.owned_by.is_empty());
    }
}

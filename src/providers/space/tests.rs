use serde_json::json;

use super::*;
use crate::catalog;

#[test]
fn test_gradio_inputs_follow_entry_defaults() {
    let target = catalog::resolve("flux-schnell");
    let inputs = gradio_inputs("a red fox", target.entry);

    assert_eq!(
        inputs,
        vec![
            json!("a red fox"),
            json!(0),
            json!(true),
            json!(1024),
            json!(1024),
            json!(4)
        ]
    );

    let turbo = catalog::resolve("sdxl-turbo");
    let inputs = gradio_inputs("a red fox", turbo.entry);
    assert_eq!(inputs[3], json!(512));
    assert_eq!(inputs[5], json!(1));
}

#[test]
fn test_image_output_from_bare_url_string() {
    let outputs = vec![json!("https://s.hf.space/gradio_api/file=a.png"), json!(9)];
    let output = image_output_from("huggingface", &outputs).expect("url extracted");
    assert_eq!(output.url, "https://s.hf.space/gradio_api/file=a.png");
    assert_eq!(output.seed, Some(9));
}

#[test]
fn test_image_output_from_url_object() {
    let outputs = vec![json!({"url": "https://s.hf.space/file=b.webp", "path": "/tmp/b.webp"})];
    let output = image_output_from("huggingface", &outputs).expect("url extracted");
    assert_eq!(output.url, "https://s.hf.space/file=b.webp");
    assert_eq!(output.seed, None);
}

#[test]
fn test_image_output_from_nested_image_object() {
    let outputs = vec![json!({"image": {"url": "https://s.ms.show/file=c.png"}, "caption": null})];
    let output = image_output_from("modelscope", &outputs).expect("url extracted");
    assert_eq!(output.url, "https://s.ms.show/file=c.png");
}

#[test]
fn test_image_output_rejects_unknown_shape_with_bounded_preview() {
    let noise = "n".repeat(400);
    let outputs = vec![json!({"blob": noise})];
    let error = image_output_from("huggingface", &outputs).expect_err("unknown shape");
    assert_eq!(error.kind, ErrorKind::ProviderError);
    assert!(error.message.starts_with("unexpected image payload shape:"));
    let preview = error
        .message
        .strip_prefix("unexpected image payload shape: ")
        .expect("prefix present");
    assert!(preview.chars().count() <= 200);
}

#[test]
fn test_image_output_rejects_empty_sequence() {
    let error = image_output_from("huggingface", &[]).expect_err("empty outputs");
    assert_eq!(error.kind, ErrorKind::ProviderError);
    assert_eq!(error.message, "empty output sequence from backend");
}

#[test]
fn test_seed_ignored_when_not_numeric() {
    let outputs = vec![json!("https://s.hf.space/file=d.png"), json!("not-a-seed")];
    let output = image_output_from("huggingface", &outputs).expect("url extracted");
    assert_eq!(output.seed, None);
}

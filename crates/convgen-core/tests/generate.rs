//! Integration tests for parallel synthesis of a whole code model

mod test_utils;

// Internal imports (std, crate)
use std::sync::Arc;

// External imports (alphabetized)
use convgen_core::{
    synthesize_all, Error, GeneratorConfig, Reference, ReferenceSink, UnmatchedPolicy,
};
use tempfile::tempdir;
use test_utils::{widgets, WIDGETS};

#[tokio::test]
async fn test_synthesize_all_unions_references() -> convgen_core::Result<()> {
    let model = Arc::new(widgets());
    let total = model.convenience_methods().count();
    let sink = ReferenceSink::new();

    let reports = synthesize_all(
        Arc::clone(&model),
        Arc::new(GeneratorConfig::default()),
        &sink,
        &[],
    )
    .await?;

    assert_eq!(reports.len(), total);
    assert!(reports.iter().all(|r| r.is_ok()));
    for reference in [
        Reference::RequestOptions,
        Reference::MultipartHelper,
        Reference::VersionValidation,
        Reference::MergePatchHelper {
            model: "WidgetPatch".to_string(),
        },
    ] {
        assert!(sink.contains(&reference), "missing {reference:?}");
    }

    // the sink holds exactly the union of the per-method references
    let union: std::collections::BTreeSet<_> = reports
        .iter()
        .filter_map(|r| r.result.as_ref().ok())
        .flat_map(|m| m.references.iter().cloned())
        .collect();
    assert_eq!(sink.snapshot(), union);
    Ok(())
}

#[tokio::test]
async fn test_failing_method_does_not_affect_others() -> convgen_core::Result<()> {
    let model = Arc::new(widgets());
    let config = GeneratorConfig {
        unmatched_parameters: UnmatchedPolicy::Strict,
        ..GeneratorConfig::default()
    };
    let sink = ReferenceSink::new();

    let reports = synthesize_all(Arc::clone(&model), Arc::new(config), &sink, &[]).await?;

    let failed: Vec<_> = reports.iter().filter(|r| !r.is_ok()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].method, "deleteWidget");
    assert_eq!(reports.len(), model.convenience_methods().count());
    assert!(sink.contains(&Reference::MultipartHelper));
    Ok(())
}

#[tokio::test]
async fn test_selection_limits_and_validates() -> convgen_core::Result<()> {
    let model = Arc::new(widgets());
    let config = Arc::new(GeneratorConfig::default());
    let sink = ReferenceSink::new();

    let selection = vec!["updateWidget".to_string()];
    let reports =
        synthesize_all(Arc::clone(&model), Arc::clone(&config), &sink, &selection).await?;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].method, "updateWidget");
    assert!(!sink.contains(&Reference::MultipartHelper));

    let unknown = vec!["frobnicate".to_string()];
    let err = synthesize_all(model, config, &sink, &unknown)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CodeModel(_)));
    Ok(())
}

#[tokio::test]
async fn test_invalid_config_aborts_the_run() {
    let config = GeneratorConfig {
        request_options_name: String::new(),
        ..GeneratorConfig::default()
    };
    let err = synthesize_all(
        Arc::new(widgets()),
        Arc::new(config),
        &ReferenceSink::new(),
        &[],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn test_code_model_from_file() -> convgen_core::Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("widgets.yaml");
    tokio::fs::write(&file_path, WIDGETS).await?;

    let model = convgen_core::CodeModel::from_file(&file_path).await?;
    assert_eq!(model, widgets());
    Ok(())
}

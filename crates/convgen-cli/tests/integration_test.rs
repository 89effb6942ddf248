//! End-to-end integration tests for the convgen CLI

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Output};

/// Path of the shared widget-service code model
fn fixture() -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .context("Failed to locate workspace root")?;
    Ok(workspace_root.join("tests/fixtures/code-model/widgets.yaml"))
}

fn convgen(args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_convgen"))
        .args(args)
        .output()
        .context("Failed to run convgen")
}

#[test]
fn test_classify_mime() -> Result<()> {
    let output = convgen(&[
        "classify-mime",
        "application/vnd.foo+json",
        "text/plain; charset=utf-8",
        "application/octet-stream",
    ])?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let families: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .collect();
    assert_eq!(families, vec!["json", "text", "binary"]);
    Ok(())
}

#[test]
fn test_synthesize_prints_plan() -> Result<()> {
    let fixture = fixture()?;
    let output = convgen(&[
        "synthesize",
        "--code-model",
        fixture.to_str().context("non UTF-8 fixture path")?,
    ])?;
    assert!(
        output.status.success(),
        "convgen failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = plan["methods"]
        .as_array()
        .context("methods is not an array")?
        .iter()
        .filter_map(|m| m["name"].as_str())
        .collect();
    assert!(names.contains(&"listWidgets"));
    assert!(names.contains(&"getWidgetAsync"));
    assert_eq!(plan["failures"].as_array().map(Vec::len), Some(0));
    assert!(plan["references"]
        .as_array()
        .context("references is not an array")?
        .iter()
        .any(|r| r["reference"] == "multipart_helper"));
    Ok(())
}

#[test]
fn test_synthesize_writes_yaml_file() -> Result<()> {
    let fixture = fixture()?;
    let dir = tempfile::tempdir()?;
    let output_path = dir.path().join("plan.yaml");

    let output = convgen(&[
        "synthesize",
        "--code-model",
        fixture.to_str().context("non UTF-8 fixture path")?,
        "--method",
        "updateWidget",
        "--format",
        "yaml",
        "--output",
        output_path.to_str().context("non UTF-8 output path")?,
    ])?;
    assert!(output.status.success());

    let plan: serde_yaml::Value = serde_yaml::from_str(&std::fs::read_to_string(&output_path)?)?;
    let methods = plan["methods"]
        .as_sequence()
        .context("methods is not a sequence")?;
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0]["name"].as_str(), Some("updateWidget"));
    Ok(())
}

#[test]
fn test_strict_config_reports_failures() -> Result<()> {
    let fixture = fixture()?;
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("convgen.yaml");
    std::fs::write(&config_path, "unmatched_parameters: strict\n")?;

    let output = convgen(&[
        "synthesize",
        "--code-model",
        fixture.to_str().context("non UTF-8 fixture path")?,
        "--config",
        config_path.to_str().context("non UTF-8 config path")?,
    ])?;
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("deleteWidget"), "stderr: {stderr}");

    // the plan of the remaining methods is still printed
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(plan["failures"][0]["method"], "deleteWidget");
    Ok(())
}

#[test]
fn test_unknown_method_is_rejected() -> Result<()> {
    let fixture = fixture()?;
    let output = convgen(&[
        "synthesize",
        "--code-model",
        fixture.to_str().context("non UTF-8 fixture path")?,
        "--method",
        "frobnicate",
    ])?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

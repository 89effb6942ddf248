//! Parallel synthesis of the convenience methods of a code model

// Internal imports (std, crate)
use std::sync::Arc;

use crate::{
    config::GeneratorConfig,
    error::{Error, Result},
    ir::SynthesizedMethod,
    model::{CodeModel, MethodPair},
    references::ReferenceSink,
    synth::synthesize,
};

// External imports (alphabetized)
use futures::future::join_all;
use log::{info, warn};
use tokio::task::JoinError;

/// Outcome of synthesizing one convenience method
#[derive(Debug)]
pub struct MethodReport {
    pub method: String,
    pub result: Result<SynthesizedMethod>,
}

impl MethodReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Positions of the selected overloads, as (operation, overload) indices
fn select(code_model: &CodeModel, selection: &[String]) -> Result<Vec<(usize, usize)>> {
    let targets: Vec<_> = code_model
        .operations
        .iter()
        .enumerate()
        .flat_map(|(op, methods)| {
            methods
                .convenience
                .iter()
                .enumerate()
                .map(move |(index, method)| (op, index, method.name.as_str()))
        })
        .filter(|(_, _, name)| selection.is_empty() || selection.iter().any(|s| s == *name))
        .collect();

    if let Some(missing) = selection
        .iter()
        .find(|s| !targets.iter().any(|(_, _, name)| *name == s.as_str()))
    {
        return Err(Error::code_model(format!(
            "no convenience method named '{missing}'"
        )));
    }
    Ok(targets.into_iter().map(|(op, index, _)| (op, index)).collect())
}

/// Main entry point for synthesis.
///
/// Every selected method (all of them when `selection` is empty) is
/// synthesized on its own blocking task. A failing method is reported in its
/// [`MethodReport`] and does not affect the others. References of successful
/// methods are added to `sink`.
pub async fn synthesize_all(
    code_model: Arc<CodeModel>,
    config: Arc<GeneratorConfig>,
    sink: &ReferenceSink,
    selection: &[String],
) -> Result<Vec<MethodReport>> {
    config.validate()?;
    let targets = select(&code_model, selection)?;
    info!("Synthesizing {} convenience methods", targets.len());

    let (methods, tasks): (Vec<String>, Vec<_>) = targets
        .into_iter()
        .map(|(op, index)| {
            let method = code_model.operations[op].convenience[index].name.clone();
            let code_model = Arc::clone(&code_model);
            let config = Arc::clone(&config);
            let sink = sink.clone();
            let task = tokio::task::spawn_blocking(move || {
                let operation = &code_model.operations[op];
                let pair = MethodPair {
                    protocol: &operation.protocol,
                    convenience: &operation.convenience[index],
                };
                let result = synthesize(&code_model, &config, pair);
                match &result {
                    Ok(method) => sink.extend(method.references.iter().cloned()),
                    Err(e) => warn!("{}: {}", pair.convenience.name, e),
                }
                MethodReport {
                    method: pair.convenience.name.clone(),
                    result,
                }
            });
            (method, task)
        })
        .unzip();

    let joined = join_all(tasks).await;
    Ok(methods
        .into_iter()
        .zip(joined)
        .map(|(method, joined)| into_report(method, joined))
        .collect())
}

/// Report of a joined task; a task that panicked fails only its own method
fn into_report(
    method: String,
    joined: std::result::Result<MethodReport, JoinError>,
) -> MethodReport {
    joined.unwrap_or_else(|e| {
        warn!("{method}: synthesis task failed: {e}");
        MethodReport {
            method,
            result: Err(Error::from(e)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicked_task_fails_only_its_method() {
        let panicked = tokio::task::spawn_blocking(|| -> MethodReport {
            panic!("synthesis blew up");
        })
        .await;

        let report = into_report("getWidget".to_string(), panicked);
        assert_eq!(report.method, "getWidget");
        assert!(matches!(report.result, Err(Error::Task(_))));
    }

    #[tokio::test]
    async fn test_finished_task_keeps_its_report() {
        let finished = tokio::task::spawn_blocking(|| MethodReport {
            method: "deleteWidget".to_string(),
            result: Err(Error::unknown_parameter("deleteWidget", "reason")),
        })
        .await;

        let report = into_report("deleteWidget".to_string(), finished);
        assert!(matches!(
            report.result,
            Err(Error::UnknownParameter { .. })
        ));
    }
}

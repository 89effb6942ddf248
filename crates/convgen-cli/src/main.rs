//! convgen CLI entrypoint
//! Parses command-line arguments and dispatches to the core synthesizer.

// Internal imports (std, crate)
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use convgen_core::{
    classify_mime, synthesize_all, CodeModel, GeneratorConfig, Reference, ReferenceSink,
    SynthesizedMethod,
};
use serde::Serialize;
use tokio::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "convgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Synthesize convenience methods from a client code model
    Synthesize {
        /// Path to the code model (YAML or JSON)
        #[arg(long)]
        code_model: PathBuf,
        /// Generator configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Only synthesize the named convenience method; may be repeated
        #[arg(long = "method")]
        methods: Vec<String>,
        /// Format of the synthesized plan
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Write the plan to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the serialization family of each content type
    ClassifyMime {
        #[arg(required = true)]
        content_types: Vec<String>,
    },
}

/// A method that could not be synthesized
#[derive(Debug, Serialize)]
struct Failure {
    method: String,
    error: String,
}

/// Everything printed by `synthesize`
#[derive(Debug, Serialize)]
struct Plan {
    methods: Vec<SynthesizedMethod>,
    failures: Vec<Failure>,
    references: BTreeSet<Reference>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for the plan
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match &cli.command {
        Commands::Synthesize {
            code_model,
            config,
            methods,
            format,
            output,
        } => {
            let model = CodeModel::from_file(code_model)
                .await
                .with_context(|| format!("Failed to load code model {}", code_model.display()))?;
            let config = match config {
                Some(path) => GeneratorConfig::from_file(path)
                    .await
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => GeneratorConfig::default(),
            };

            let sink = ReferenceSink::new();
            let reports = synthesize_all(Arc::new(model), Arc::new(config), &sink, methods)
                .await
                .context("Synthesis failed")?;

            let mut plan = Plan {
                methods: Vec::new(),
                failures: Vec::new(),
                references: sink.snapshot(),
            };
            for report in reports {
                match report.result {
                    Ok(method) => plan.methods.push(method),
                    Err(e) => plan.failures.push(Failure {
                        method: report.method,
                        error: e.to_string(),
                    }),
                }
            }
            tracing::info!(
                "Synthesized {} methods, {} failed",
                plan.methods.len(),
                plan.failures.len()
            );

            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&plan)?,
                OutputFormat::Yaml => serde_yaml::to_string(&plan)?,
            };
            match output {
                Some(path) => fs::write(path, rendered)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{rendered}"),
            }

            if !plan.failures.is_empty() {
                for failure in &plan.failures {
                    eprintln!("{}: {}", failure.method, failure.error);
                }
                anyhow::bail!(
                    "{} of {} methods failed",
                    plan.failures.len(),
                    plan.failures.len() + plan.methods.len()
                );
            }
        }
        Commands::ClassifyMime { content_types } => {
            for content_type in content_types {
                println!("{content_type}\t{}", classify_mime(content_type));
            }
        }
    }
    Ok(())
}

//! Synthesis of one convenience method.
//!
//! A convenience method is turned into statements by a fixed sequence of
//! stages, listed in [`PIPELINE`]. Every stage reads the pairings produced by
//! the matcher and appends to the method's own statement block; nothing is
//! shared with other methods being synthesized at the same time.
//!
//! # Examples
//!
//! ```no_run
//! use convgen_core::config::GeneratorConfig;
//! use convgen_core::model::CodeModel;
//! use convgen_core::synth::synthesize;
//!
//! # #[tokio::main]
//! # async fn main() -> convgen_core::Result<()> {
//! let model = CodeModel::from_file("widgets.yaml").await?;
//! let config = GeneratorConfig::default();
//! for pair in model.convenience_methods() {
//!     let method = synthesize(&model, &config, pair)?;
//!     println!("{}: {} statements", method.name, method.statements.len());
//! }
//! # Ok(())
//! # }
//! ```

mod expression;
mod invocation;
mod matcher;
mod multipart;
mod transform;
mod versioning;

// Internal imports (std, crate)
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::builders::{get_builder, InvocationBuilder};
use crate::config::GeneratorConfig;
use crate::ir::{Block, Expr, Intrinsic, ReturnConversion, SynthesizedMethod};
use crate::model::{CodeModel, ConvenienceMethod, MethodPair, ProtocolMethod, TypeRef};
use crate::references::Reference;
use crate::Result;

// External imports (alphabetized)
use log::debug;
use serde::Serialize;

pub use matcher::{match_parameters, Pairing, BODY_SENTINEL};

/// Loop variable used when iterating over a collection parameter
pub(crate) const ITEM_VARIABLE: &str = "paramItemValue";

/// One step of the synthesis pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Pair convenience parameters with protocol parameters
    Match,
    /// Read grouped properties out of aggregate parameters
    GroupBy,
    /// Build synthetic body objects
    Flatten,
    /// Reject parameters the active api-version does not support
    VersionGuards,
    /// Serialize every pairing for the wire
    Synthesize,
    /// Call the protocol method and convert its result
    Invoke,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Match => "match",
            Self::GroupBy => "group-by",
            Self::Flatten => "flatten",
            Self::VersionGuards => "version-guards",
            Self::Synthesize => "synthesize",
            Self::Invoke => "invoke",
        };
        f.write_str(name)
    }
}

/// Stages in execution order. Grouping runs before flattening so that a
/// flattened body can read grouped parameters.
pub const PIPELINE: [Stage; 6] = [
    Stage::Match,
    Stage::GroupBy,
    Stage::Flatten,
    Stage::VersionGuards,
    Stage::Synthesize,
    Stage::Invoke,
];

/// Synthesize the statements, invocation and return conversion of one convenience method
pub fn synthesize(
    code_model: &CodeModel,
    config: &GeneratorConfig,
    pair: MethodPair<'_>,
) -> Result<SynthesizedMethod> {
    MethodSynthesizer::new(code_model, config, pair).run()
}

/// Working state of a single method; owned by one synthesis call
struct MethodSynthesizer<'a> {
    code_model: &'a CodeModel,
    config: &'a GeneratorConfig,
    protocol: &'a ProtocolMethod,
    convenience: &'a ConvenienceMethod,
    builder: Box<dyn InvocationBuilder>,
    pairings: Vec<Pairing<'a>>,
    block: Block,
    /// Expressions passed to the protocol method, by protocol parameter name
    arguments: BTreeMap<String, Expr>,
    /// Flattened bodies that already hold their serialized payload
    serialized_bodies: BTreeSet<String>,
    invocation: Expr,
    return_conversion: ReturnConversion,
    references: BTreeSet<Reference>,
}

impl<'a> MethodSynthesizer<'a> {
    fn new(code_model: &'a CodeModel, config: &'a GeneratorConfig, pair: MethodPair<'a>) -> Self {
        Self {
            code_model,
            config,
            protocol: pair.protocol,
            convenience: pair.convenience,
            builder: get_builder(pair.convenience.kind),
            pairings: Vec::new(),
            block: Block::new(),
            arguments: BTreeMap::new(),
            serialized_bodies: BTreeSet::new(),
            invocation: Expr::Null,
            return_conversion: ReturnConversion::Discard,
            references: BTreeSet::new(),
        }
    }

    fn run(mut self) -> Result<SynthesizedMethod> {
        self.block.comment(format!(
            "Generated convenience method for {}",
            self.protocol.name
        ));
        self.block.declare(
            self.options_name(),
            Some(TypeRef::named("RequestOptions")),
            Expr::intrinsic(Intrinsic::NewRequestOptions, Vec::new()),
        );
        self.references.insert(Reference::RequestOptions);

        for stage in PIPELINE {
            debug!("{}: running stage {}", self.convenience.name, stage);
            match stage {
                Stage::Match => {
                    self.pairings = match_parameters(self.convenience, self.protocol)?;
                }
                Stage::GroupBy => self.apply_group_by()?,
                Stage::Flatten => self.apply_flatten()?,
                Stage::VersionGuards => self.write_version_guards(),
                Stage::Synthesize => self.synthesize_parameters()?,
                Stage::Invoke => self.assemble_invocation(),
            }
        }
        debug!(
            "{}: {} statements, {} references",
            self.convenience.name,
            self.block.len(),
            self.references.len()
        );

        Ok(SynthesizedMethod {
            name: self.convenience.name.clone(),
            protocol: self.protocol.name.clone(),
            kind: self.convenience.kind,
            statements: self.block.into_statements(),
            invocation: self.invocation,
            return_conversion: self.return_conversion,
            references: self.references,
        })
    }

    fn options_name(&self) -> String {
        self.config.request_options_name.clone()
    }

    fn method_name(&self) -> &'a str {
        &self.convenience.name
    }
}

//! Convgen Core Library
//!
//! This library synthesizes the marshalling logic of convenience methods:
//! given a wire-level protocol method and a strongly-typed convenience
//! signature, it produces language-agnostic statements that transform,
//! serialize and version-check the parameters before delegating to the
//! protocol method.

pub mod builders;
pub mod config;
pub mod error;
pub mod generate;
pub mod ir;
pub mod mime;
pub mod model;
pub mod patch;
pub mod references;
pub mod synth;
pub mod taxonomy;
pub mod utils;

pub use crate::{
    config::{GeneratorConfig, UnmatchedPolicy},
    error::{Error, Result},
    generate::{synthesize_all, MethodReport},
    ir::SynthesizedMethod,
    mime::{classify_mime, MimeFamily},
    model::CodeModel,
    references::{Reference, ReferenceSink},
    synth::synthesize,
};

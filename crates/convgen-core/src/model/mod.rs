//! The client code model consumed by the synthesizer.
//!
//! The model is produced upstream from an API description and handed over as
//! a JSON or YAML document. Everything in it is read-only for the duration of
//! a generation pass.
//!
//! # Examples
//!
//! ```no_run
//! use convgen_core::model::CodeModel;
//! use convgen_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let model = CodeModel::from_file("widgets.yaml").await?;
//! for method in model.convenience_methods() {
//!     println!("{} -> {}", method.convenience.name, method.protocol.name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod method;
mod types;

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

pub use client::{ClientModel, ClientModelProperty};
pub use method::{
    ConvenienceMethod, ConvenienceParameter, FlattenMapping, GroupedProperty, MethodKind,
    Operation, OperationMethods, PageDetails, ParameterTransformation, ProtocolMethod,
    ProtocolParameter, Versioning, WireParameter,
};
pub use types::{
    BinaryEncoding, CollectionFormat, EnumType, EnumValue, ParameterLocation, PrimitiveKind,
    TypeRef,
};

/// Models, enums and operations of one client
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeModel {
    #[serde(default)]
    pub models: Vec<ClientModel>,
    #[serde(default)]
    pub enums: Vec<EnumType>,
    #[serde(default)]
    pub operations: Vec<OperationMethods>,
}

/// A convenience overload borrowed together with the protocol method it targets
#[derive(Clone, Copy, Debug)]
pub struct MethodPair<'a> {
    pub protocol: &'a ProtocolMethod,
    pub convenience: &'a ConvenienceMethod,
}

impl CodeModel {
    /// Load a code model from a file (supports both YAML and JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::parse_content(&content).map_err(|e| {
            crate::Error::code_model(format!(
                "Failed to parse code model at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse content as either JSON or YAML
    pub fn parse_content(content: &str) -> std::result::Result<Self, String> {
        // JSON is a subset of YAML, but its errors are more precise
        match serde_json::from_str(content) {
            Ok(model) => Ok(model),
            Err(json_err) => serde_yaml::from_str(content).map_err(|yaml_err| {
                format!("neither valid JSON ({json_err}) nor valid YAML ({yaml_err})")
            }),
        }
    }

    pub fn model(&self, name: &str) -> Option<&ClientModel> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Model behind a declared type, when the type names one
    pub fn model_of(&self, ty: &TypeRef) -> Option<&ClientModel> {
        ty.type_name().and_then(|name| self.model(name))
    }

    /// Every convenience overload paired with its protocol method, in declaration order
    pub fn convenience_methods(&self) -> impl Iterator<Item = MethodPair<'_>> {
        self.operations.iter().flat_map(|op| {
            op.convenience.iter().map(move |convenience| MethodPair {
                protocol: &op.protocol,
                convenience,
            })
        })
    }

    pub fn find_method(&self, name: &str) -> Option<MethodPair<'_>> {
        self.convenience_methods()
            .find(|pair| pair.convenience.name == name)
    }
}

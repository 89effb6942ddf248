//! Client models: the classes callers construct and receive.

use serde::{Deserialize, Serialize};

use super::types::TypeRef;

/// A property of a client model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientModelProperty {
    /// Client-facing property name
    pub name: String,
    /// Name used on the wire; defaults to `name`
    #[serde(default)]
    pub serialized_name: Option<String>,
    pub wire_type: TypeRef,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
}

impl ClientModelProperty {
    pub fn serialized_name(&self) -> &str {
        self.serialized_name.as_deref().unwrap_or(&self.name)
    }
}

/// A model declared in the code model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientModel {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<ClientModelProperty>,
    /// Serialized as multipart/form-data parts rather than a single document
    #[serde(default)]
    pub multipart: bool,
    /// Tracks touched fields and supports merge-patch serialization
    #[serde(default)]
    pub merge_patch: bool,
}

impl ClientModel {
    pub fn property(&self, name: &str) -> Option<&ClientModelProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Properties the caller can set, in declaration order
    pub fn writable_properties(&self) -> impl Iterator<Item = &ClientModelProperty> {
        self.properties.iter().filter(|p| !p.read_only)
    }
}

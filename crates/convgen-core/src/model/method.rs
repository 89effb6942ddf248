//! Protocol and convenience method declarations.

use serde::{Deserialize, Serialize};

use super::types::{CollectionFormat, ParameterLocation, TypeRef};

/// Wire view of one operation parameter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireParameter {
    /// Declared parameter name, before reserved-word escaping
    pub name: String,
    /// Name sent on the wire (header name, query key); absent for an unnamed body
    #[serde(default)]
    pub serialized_name: Option<String>,
    pub location: ParameterLocation,
    pub raw_type: TypeRef,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub collection_format: Option<CollectionFormat>,
    #[serde(default)]
    pub explode: bool,
    /// Query values that are already percent-encoded
    #[serde(default)]
    pub already_encoded: bool,
}

impl WireParameter {
    pub fn collection_format(&self) -> CollectionFormat {
        self.collection_format.unwrap_or_default()
    }

    /// Explode semantics with the multi format: one query entry per element
    pub fn is_multi_explode(&self) -> bool {
        self.explode && self.collection_format == Some(CollectionFormat::Multi)
    }
}

/// The literal HTTP operation shared by a protocol method and its convenience overloads
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub request_content_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<WireParameter>,
}

impl Operation {
    pub fn request_content_type(&self) -> &str {
        self.request_content_type.as_deref().unwrap_or("application/json")
    }
}

/// An input parameter of the protocol method
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProtocolParameter {
    pub name: String,
    #[serde(default)]
    pub location: Option<ParameterLocation>,
    pub raw_type: TypeRef,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub constant: bool,
    /// Supplied from client state (endpoint, api-version) rather than by the caller
    #[serde(default)]
    pub from_client: bool,
}

/// The wire-level method that convenience overloads delegate to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProtocolMethod {
    pub name: String,
    pub operation: Operation,
    #[serde(default)]
    pub parameters: Vec<ProtocolParameter>,
}

/// API versions in which a parameter exists
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioning {
    #[serde(default)]
    pub added: Vec<String>,
}

/// An input parameter of a convenience method, or one synthesized by a transformation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvenienceParameter {
    pub name: String,
    pub client_type: TypeRef,
    /// Type the value takes on the wire; defaults to `client_type`
    #[serde(default)]
    pub wire_type: Option<TypeRef>,
    #[serde(default)]
    pub location: Option<ParameterLocation>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub constant: bool,
    #[serde(default)]
    pub from_client: bool,
    #[serde(default)]
    pub versioning: Option<Versioning>,
}

impl ConvenienceParameter {
    pub fn new(name: impl Into<String>, client_type: TypeRef, required: bool) -> Self {
        Self {
            name: name.into(),
            client_type,
            wire_type: None,
            location: None,
            required,
            constant: false,
            from_client: false,
            versioning: None,
        }
    }

    pub fn at(mut self, location: ParameterLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_wire_type(mut self, wire_type: TypeRef) -> Self {
        self.wire_type = Some(wire_type);
        self
    }

    pub fn added_in<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versioning = Some(Versioning {
            added: versions.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn wire_type(&self) -> &TypeRef {
        self.wire_type.as_ref().unwrap_or(&self.client_type)
    }

    /// Versions the parameter is gated to, when it is gated at all
    pub fn added_versions(&self) -> Option<&[String]> {
        self.versioning
            .as_ref()
            .map(|v| v.added.as_slice())
            .filter(|added| !added.is_empty())
    }
}

/// Synchronous methods throw; asynchronous ones return a failed result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    #[default]
    Sync,
    Async,
}

/// Page-streaming details of a convenience method
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageDetails {
    /// Parameters such as continuation tokens that callers never supply
    #[serde(default)]
    pub hidden_parameters: Vec<String>,
    pub item_type: TypeRef,
}

impl PageDetails {
    pub fn should_hide(&self, parameter: &str) -> bool {
        self.hidden_parameters.iter().any(|p| p == parameter)
    }
}

/// One property of a grouping parameter turned into its own parameter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupedProperty {
    pub property: String,
    pub out: ConvenienceParameter,
}

/// Input of a flattened body property: a parameter, or a property of one
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlattenMapping {
    pub input: String,
    #[serde(default)]
    pub input_property: Option<String>,
    pub target_property: String,
}

/// Turns friendly convenience parameters into protocol-level ones
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterTransformation {
    GroupBy {
        source: String,
        mappings: Vec<GroupedProperty>,
    },
    Flatten {
        /// Synthesized body parameter; `client_type` is the body model
        target: ConvenienceParameter,
        mappings: Vec<FlattenMapping>,
    },
}

impl ParameterTransformation {
    /// Convenience parameters the transformation reads from
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Self::GroupBy { source, .. } => vec![source.as_str()],
            Self::Flatten { mappings, .. } => mappings.iter().map(|m| m.input.as_str()).collect(),
        }
    }
}

/// A strongly-typed overload that delegates to a protocol method
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvenienceMethod {
    pub name: String,
    #[serde(default)]
    pub kind: MethodKind,
    pub operation: Operation,
    #[serde(default)]
    pub parameters: Vec<ConvenienceParameter>,
    #[serde(default)]
    pub transformations: Vec<ParameterTransformation>,
    /// Absent for a void-returning overload
    #[serde(default)]
    pub returns: Option<TypeRef>,
    #[serde(default)]
    pub only_required_parameters: bool,
    #[serde(default)]
    pub paging: Option<PageDetails>,
}

impl ConvenienceMethod {
    pub fn parameter(&self, name: &str) -> Option<&ConvenienceParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn is_page_streaming(&self) -> bool {
        self.paging.is_some()
    }

    /// Whether some transformation reads `parameter`
    pub fn is_transformation_input(&self, parameter: &str) -> bool {
        self.transformations
            .iter()
            .any(|t| t.inputs().contains(&parameter))
    }
}

/// A protocol method together with its convenience overloads
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationMethods {
    pub protocol: ProtocolMethod,
    #[serde(default)]
    pub convenience: Vec<ConvenienceMethod>,
}

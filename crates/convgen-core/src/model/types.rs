//! Declared types and wire-level enumerations of the code model.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Where a parameter travels on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Header,
    Query,
    Body,
    Path,
    /// Synthesized request-context parameter; never serialized
    Context,
}

/// How a sequence parameter is joined into a single wire value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    #[default]
    Csv,
    Ssv,
    Tsv,
    Pipes,
    Multi,
}

impl CollectionFormat {
    /// Delimiter placed between joined elements
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Csv => ",",
            Self::Ssv => " ",
            Self::Tsv => "\t",
            Self::Pipes => "|",
            Self::Multi => "&",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Ssv => "ssv",
            Self::Tsv => "tsv",
            Self::Pipes => "pipes",
            Self::Multi => "multi",
        }
    }
}

/// Scalar kinds, including the wire encodings of date-times and durations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    DateTime,
    DateTimeRfc7231,
    UnixTime,
    Date,
    Duration,
    DurationSeconds,
    Uuid,
    Url,
}

impl PrimitiveKind {
    /// Value types have no null state unless declared nullable (boxed)
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            Self::Boolean | Self::Int32 | Self::Int64 | Self::Float32 | Self::Float64
        )
    }

    /// Wire forms that must be converted from the client representation first
    pub fn is_wire_encoded(&self) -> bool {
        matches!(
            self,
            Self::DateTimeRfc7231 | Self::UnixTime | Self::DurationSeconds
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Decimal => "decimal",
            Self::DateTime => "date_time",
            Self::DateTimeRfc7231 => "date_time_rfc7231",
            Self::UnixTime => "unix_time",
            Self::Date => "date",
            Self::Duration => "duration",
            Self::DurationSeconds => "duration_seconds",
            Self::Uuid => "uuid",
            Self::Url => "url",
        }
    }
}

/// Encoding of binary payloads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryEncoding {
    /// Opaque binary payload, passed through untouched
    #[default]
    Opaque,
    /// Byte array carried as base64url text
    Base64Url,
    /// Raw byte array
    Bytes,
}

/// A declared type as it appears in the code model
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive {
        name: PrimitiveKind,
        #[serde(default)]
        nullable: bool,
    },
    String,
    Binary {
        #[serde(default)]
        encoding: BinaryEncoding,
    },
    /// Reference to a model or enum declared in the code model
    Named { name: String },
    Array { items: Box<TypeRef> },
    Map {
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
}

impl TypeRef {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            name: kind,
            nullable: false,
        }
    }

    pub fn boxed(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            name: kind,
            nullable: true,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }

    pub fn array(items: TypeRef) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn opaque_binary() -> Self {
        Self::Binary {
            encoding: BinaryEncoding::Opaque,
        }
    }

    pub fn is_opaque_binary(&self) -> bool {
        matches!(
            self,
            Self::Binary {
                encoding: BinaryEncoding::Opaque
            }
        )
    }

    /// Declared name of a model or enum reference
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Named { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { name, nullable } => {
                write!(f, "{}", name.as_str())?;
                if *nullable {
                    write!(f, "?")?;
                }
                Ok(())
            }
            Self::String => write!(f, "string"),
            Self::Binary { encoding } => match encoding {
                BinaryEncoding::Opaque => write!(f, "binary"),
                BinaryEncoding::Base64Url => write!(f, "base64url"),
                BinaryEncoding::Bytes => write!(f, "bytes"),
            },
            Self::Named { name } => write!(f, "{name}"),
            Self::Array { items } => write!(f, "array<{items}>"),
            Self::Map { key, value } => write!(f, "map<{key}, {value}>"),
        }
    }
}

/// One member of an enum declaration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: JsonValue,
}

/// An enum declared in the code model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    /// Type of the wire value behind each member
    #[serde(default = "default_enum_backing")]
    pub backing: TypeRef,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

impl EnumType {
    pub fn is_string_backed(&self) -> bool {
        self.backing == TypeRef::String
    }
}

fn default_enum_backing() -> TypeRef {
    TypeRef::String
}

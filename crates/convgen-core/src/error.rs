//! Error handling for the convgen synthesis library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Generation errors always carry
//! the name of the convenience method being synthesized so a driver can report
//! them without losing track of which method failed.
//!
//! # Examples
//!
//! ```
//! use convgen_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::code_model("operation 'getWidget' has no protocol method"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for convgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for convgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The code model could not be loaded or is malformed
    #[error("Code model error: {0}")]
    CodeModel(String),

    /// A transformation or mapping names a convenience parameter the method does not declare
    #[error("method '{method}': parameter '{parameter}' is not declared on the convenience method")]
    UnknownParameter { method: String, parameter: String },

    /// A transformation names a property that the model does not declare
    #[error("method '{method}': model '{model}' has no property '{property}'")]
    UnknownProperty {
        method: String,
        model: String,
        property: String,
    },

    /// A transformation reads or builds a type that is not a declared model
    #[error("method '{method}': type '{model}' is not a declared model")]
    UnknownModel { method: String, model: String },

    /// A synthesized parameter has a wire location but no wire parameter in the operation
    #[error("method '{method}': operation has no wire parameter for '{parameter}'")]
    UnknownWireParameter { method: String, parameter: String },

    /// Two protocol parameters serialize under the same wire name
    #[error("method '{method}': protocol method declares wire name '{name}' more than once")]
    DuplicateWireName { method: String, name: String },

    /// A convenience parameter has no wire mapping and strict matching is enabled
    #[error("method '{method}': parameter '{parameter}' has no wire mapping")]
    UnmatchedParameter { method: String, parameter: String },

    /// A merge-patch object was asked to set a field it does not declare
    #[error("merge-patch object '{model}' has no field '{field}'")]
    UnknownField { model: String, field: String },

    /// A generation task panicked or was cancelled
    #[error("Generation task failed: {0}")]
    Task(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new code model error
    pub fn code_model<S: Into<String>>(msg: S) -> Self {
        Self::CodeModel(msg.into())
    }

    /// Create a new unknown-parameter error for `method`
    pub fn unknown_parameter(method: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::UnknownParameter {
            method: method.into(),
            parameter: parameter.into(),
        }
    }

    /// Create a new unknown-property error for `method`
    pub fn unknown_property(
        method: impl Into<String>,
        model: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        Self::UnknownProperty {
            method: method.into(),
            model: model.into(),
            property: property.into(),
        }
    }

    /// Create a new unknown-model error for `method`
    pub fn unknown_model(method: impl Into<String>, model: impl ToString) -> Self {
        Self::UnknownModel {
            method: method.into(),
            model: model.to_string(),
        }
    }

    /// Whether this error aborts a single method rather than the whole run
    pub fn is_generation_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownParameter { .. }
                | Self::UnknownProperty { .. }
                | Self::UnknownModel { .. }
                | Self::UnknownWireParameter { .. }
                | Self::DuplicateWireName { .. }
                | Self::UnmatchedParameter { .. }
        )
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_errors_name_the_method() {
        let err = Error::unknown_property("updateWidget", "Widget", "colour");
        assert!(err.is_generation_error());
        assert_eq!(
            err.to_string(),
            "method 'updateWidget': model 'Widget' has no property 'colour'"
        );
    }

    #[test]
    fn config_errors_are_not_generation_errors() {
        assert!(!Error::config("bad policy").is_generation_error());
    }
}

//! Mutation-tracking models and merge-patch serialization.
//!
//! A [`MergePatchObject`] remembers which fields were touched through its
//! setters. Serializing it in [`SerializationMode::MergePatch`] emits only the
//! touched fields, writing an explicit `null` for a field that was touched but
//! holds no value. The mode is an argument of every serialization call and is
//! passed down to nested objects, so nothing on the object has to be switched
//! on before and off after serializing.
//!
//! # Examples
//!
//! ```
//! use convgen_core::patch::{MergePatchObject, SerializationMode};
//! use serde_json::json;
//!
//! let mut patch = MergePatchObject::new("ResourcePatch", ["description", "intValue"]);
//! patch.set("description", "updated").unwrap();
//! assert_eq!(
//!     patch.to_json(SerializationMode::MergePatch),
//!     json!({"description": "updated"})
//! );
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::model::ClientModel;
use crate::{Error, Result};

/// Selects how a mutation-tracking model is written
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializationMode {
    /// Every field holding a value
    #[default]
    Full,
    /// Only touched fields, with explicit nulls
    MergePatch,
}

/// Value stored in a field of a [`MergePatchObject`]
#[derive(Clone, Debug, PartialEq)]
pub enum PatchValue {
    Json(JsonValue),
    Object(Box<MergePatchObject>),
    List(Vec<PatchValue>),
    Map(BTreeMap<String, PatchValue>),
}

impl PatchValue {
    fn to_json(&self, mode: SerializationMode) -> JsonValue {
        match self {
            Self::Json(value) => value.clone(),
            Self::Object(object) => object.to_json(mode),
            // merge patch replaces arrays wholesale, so elements are written in full
            Self::List(items) => JsonValue::Array(
                items
                    .iter()
                    .map(|item| item.to_json(SerializationMode::Full))
                    .collect(),
            ),
            Self::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json(mode)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for PatchValue {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<MergePatchObject> for PatchValue {
    fn from(object: MergePatchObject) -> Self {
        Self::Object(Box::new(object))
    }
}

impl From<&str> for PatchValue {
    fn from(value: &str) -> Self {
        Self::Json(JsonValue::from(value))
    }
}

impl From<String> for PatchValue {
    fn from(value: String) -> Self {
        Self::Json(JsonValue::from(value))
    }
}

impl From<i64> for PatchValue {
    fn from(value: i64) -> Self {
        Self::Json(JsonValue::from(value))
    }
}

impl From<f64> for PatchValue {
    fn from(value: f64) -> Self {
        Self::Json(JsonValue::from(value))
    }
}

impl From<bool> for PatchValue {
    fn from(value: bool) -> Self {
        Self::Json(JsonValue::from(value))
    }
}

impl From<Vec<PatchValue>> for PatchValue {
    fn from(items: Vec<PatchValue>) -> Self {
        Self::List(items)
    }
}

/// A model instance that tracks which fields were set
#[derive(Clone, Debug, PartialEq)]
pub struct MergePatchObject {
    model: String,
    /// Declared fields in declaration order, by wire name
    fields: Vec<(String, Option<PatchValue>)>,
    touched: BTreeSet<String>,
}

impl MergePatchObject {
    pub fn new<I, S>(model: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model: model.into(),
            fields: fields.into_iter().map(|f| (f.into(), None)).collect(),
            touched: BTreeSet::new(),
        }
    }

    /// Empty instance of a code-model model, keyed by serialized property names
    pub fn for_model(model: &ClientModel) -> Self {
        Self::new(
            model.name.clone(),
            model.properties.iter().map(|p| p.serialized_name().to_string()),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn slot(&mut self, field: &str) -> Result<&mut Option<PatchValue>> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
            .ok_or_else(|| Error::UnknownField {
                model: self.model.clone(),
                field: field.to_string(),
            })
    }

    /// Set a field and mark it touched
    pub fn set(&mut self, field: &str, value: impl Into<PatchValue>) -> Result<&mut Self> {
        *self.slot(field)? = Some(value.into());
        self.touched.insert(field.to_string());
        Ok(self)
    }

    /// Remove a field's value and mark it touched, producing an explicit null in a patch
    pub fn clear(&mut self, field: &str) -> Result<&mut Self> {
        *self.slot(field)? = None;
        self.touched.insert(field.to_string());
        Ok(self)
    }

    pub fn get(&self, field: &str) -> Option<&PatchValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn touched(&self) -> impl Iterator<Item = &str> {
        self.touched.iter().map(String::as_str)
    }

    pub fn to_json(&self, mode: SerializationMode) -> JsonValue {
        let mut out = JsonMap::new();
        for (name, value) in &self.fields {
            match mode {
                SerializationMode::Full => {
                    if let Some(value) = value {
                        out.insert(name.clone(), value.to_json(mode));
                    }
                }
                SerializationMode::MergePatch => {
                    if !self.touched.contains(name) {
                        continue;
                    }
                    let json = value
                        .as_ref()
                        .map_or(JsonValue::Null, |value| value.to_json(mode));
                    out.insert(name.clone(), json);
                }
            }
        }
        JsonValue::Object(out)
    }

    /// Borrow the object as a `Serialize` value bound to `mode`
    pub fn with_mode(&self, mode: SerializationMode) -> ModeView<'_> {
        ModeView { object: self, mode }
    }
}

/// A [`MergePatchObject`] paired with the mode it serializes in
#[derive(Clone, Copy, Debug)]
pub struct ModeView<'a> {
    object: &'a MergePatchObject,
    mode: SerializationMode,
}

impl Serialize for ModeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.object.to_json(self.mode).serialize(serializer)
    }
}

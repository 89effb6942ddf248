//! Symbolic references required by generated code.
//!
//! Each synthesized method records the helpers and types its statements rely
//! on. A driver generating many methods in parallel unions them into one
//! [`ReferenceSink`]; insertion is commutative and idempotent, so the final
//! content does not depend on scheduling.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashSet;
use serde::Serialize;

use crate::model::TypeRef;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "reference", rename_all = "snake_case")]
pub enum Reference {
    RequestOptions,
    /// A model class used by the statements
    Model { name: String },
    /// Merge-patch serialization support for a model
    MergePatchHelper { model: String },
    MultipartHelper,
    /// Api-version membership check and argument-validation error
    VersionValidation,
    /// Delimited iterable serializer
    CollectionSerializer,
    /// Stream mapping and joining helpers
    StreamCollectors,
    Base64Url,
    /// Type token for deserializing a generic container
    TypeReference { ty: TypeRef },
}

/// Thread-safe, insert-only set of references
#[derive(Clone, Debug, Default)]
pub struct ReferenceSink {
    inner: Arc<DashSet<Reference>>,
}

impl ReferenceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the reference was not present yet
    pub fn insert(&self, reference: Reference) -> bool {
        self.inner.insert(reference)
    }

    pub fn extend<I: IntoIterator<Item = Reference>>(&self, references: I) {
        for reference in references {
            self.inner.insert(reference);
        }
    }

    pub fn contains(&self, reference: &Reference) -> bool {
        self.inner.contains(reference)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sorted copy of the current content
    pub fn snapshot(&self) -> BTreeSet<Reference> {
        self.inner.iter().map(|r| r.key().clone()).collect()
    }
}

//! Closed classification of value shapes.
//!
//! Every serialization decision dispatches on [`TypeNode`] with an exhaustive
//! `match`, so adding a variant forces each dispatch site to be revisited.
//! Classification never fails: a name the code model does not declare
//! degrades to a model without a definition.

use crate::model::{
    BinaryEncoding, ClientModel, CodeModel, EnumType, PrimitiveKind, TypeRef,
};

/// Shape of a declared type, resolved against the code model
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TypeNode<'a> {
    Primitive { kind: PrimitiveKind, nullable: bool },
    String,
    Binary(BinaryEncoding),
    Model {
        name: &'a str,
        /// Absent when the code model does not declare the name
        definition: Option<&'a ClientModel>,
    },
    Enum(&'a EnumType),
    Sequence(&'a TypeRef),
    Map { key: &'a TypeRef, value: &'a TypeRef },
}

/// Classify `ty` against the declarations in `model`
pub fn classify<'a>(ty: &'a TypeRef, model: &'a CodeModel) -> TypeNode<'a> {
    match ty {
        TypeRef::Primitive { name, nullable } => TypeNode::Primitive {
            kind: *name,
            nullable: *nullable,
        },
        TypeRef::String => TypeNode::String,
        TypeRef::Binary { encoding } => TypeNode::Binary(*encoding),
        TypeRef::Named { name } => {
            if let Some(decl) = model.enum_type(name) {
                TypeNode::Enum(decl)
            } else {
                TypeNode::Model {
                    name,
                    definition: model.model(name),
                }
            }
        }
        TypeRef::Array { items } => TypeNode::Sequence(items),
        TypeRef::Map { key, value } => TypeNode::Map { key, value },
    }
}

impl<'a> TypeNode<'a> {
    /// Whether a value of this shape can be null at runtime
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Primitive { kind, nullable } => *nullable || !kind.is_value_type(),
            Self::String
            | Self::Binary(_)
            | Self::Model { .. }
            | Self::Enum(_)
            | Self::Sequence(_)
            | Self::Map { .. } => true,
        }
    }

    /// Declared model, if this node is a model the code model knows
    pub fn definition(&self) -> Option<&'a ClientModel> {
        match self {
            Self::Model { definition, .. } => *definition,
            _ => None,
        }
    }
}

/// Whether `ty` names a model flagged for multipart/form-data
pub fn is_multipart_model(ty: &TypeRef, model: &CodeModel) -> bool {
    classify(ty, model)
        .definition()
        .is_some_and(|m| m.multipart)
}

/// Whether `ty` names a model that supports merge-patch serialization
pub fn is_merge_patch_model(ty: &TypeRef, model: &CodeModel) -> bool {
    classify(ty, model)
        .definition()
        .is_some_and(|m| m.merge_patch)
}

//! Multipart/form-data bodies.
//!
//! Each writable property of a multipart model becomes one part, named by the
//! property's serialized name. File parts are read from a file-details model,
//! which is itself flagged multipart, through its `content`, `contentType`
//! and `filename` properties.

use super::{MethodSynthesizer, ITEM_VARIABLE};
use crate::ir::{Collect, Expr, Intrinsic, MultipartPart};
use crate::model::{ClientModel, ClientModelProperty};
use crate::references::Reference;
use crate::taxonomy::{classify, is_multipart_model, TypeNode};

const FILE_FIELDS: [&str; 3] = ["content", "contentType", "filename"];

impl<'a> MethodSynthesizer<'a> {
    /// Multipart builder over the properties of `value`, an instance of `model`
    pub(super) fn multipart_expression(&mut self, value: Expr, model: &ClientModel) -> Expr {
        self.references.insert(Reference::MultipartHelper);
        let mut parts = Vec::new();
        for property in model.writable_properties() {
            parts.push(self.multipart_part(&value, property));
        }
        Expr::Multipart {
            options: self.options_name(),
            parts,
        }
    }

    fn multipart_part(&mut self, value: &Expr, property: &ClientModelProperty) -> MultipartPart {
        let name = property.serialized_name().to_string();
        let read = Expr::property(value.clone(), &property.name);
        let guard = |expr: Expr| {
            if property.required {
                expr
            } else {
                Expr::null_or(read.clone(), expr)
            }
        };

        match classify(&property.wire_type, self.code_model) {
            TypeNode::Model {
                definition: Some(file),
                ..
            } if file.multipart => {
                let [content, content_type, filename] =
                    FILE_FIELDS.map(|field| guard(Expr::property(read.clone(), field)));
                MultipartPart::File {
                    name,
                    content,
                    content_type,
                    filename,
                }
            }
            TypeNode::Sequence(items) if is_multipart_model(items, self.code_model) => {
                self.references.insert(Reference::StreamCollectors);
                let [content, content_type, filename] = FILE_FIELDS.map(|field| {
                    guard(Expr::map_each(
                        read.clone(),
                        ITEM_VARIABLE,
                        Expr::property(Expr::var(ITEM_VARIABLE), field),
                        Collect::List,
                    ))
                });
                MultipartPart::Files {
                    name,
                    content,
                    content_type,
                    filename,
                }
            }
            TypeNode::Model { .. } | TypeNode::Map { .. } | TypeNode::Sequence(_) => {
                MultipartPart::Json { name, value: read }
            }
            TypeNode::String => MultipartPart::Text { name, value: read },
            TypeNode::Primitive {
                kind,
                nullable: false,
            } if kind.is_value_type() => MultipartPart::Text {
                name,
                value: Expr::apply(Intrinsic::Stringify, read),
            },
            TypeNode::Primitive { .. } | TypeNode::Binary(_) | TypeNode::Enum(_) => {
                MultipartPart::Text {
                    name,
                    value: Expr::apply(Intrinsic::StringifyOrNull, read),
                }
            }
        }
    }
}

//! The protocol call and the conversion of its result.

use super::MethodSynthesizer;
use crate::ir::{Expr, ReturnConversion};
use crate::model::{BinaryEncoding, ParameterLocation, ProtocolParameter, TypeRef};
use crate::references::Reference;
use crate::taxonomy::{classify, TypeNode};

/// Declared type of the protocol parameter carrying the request options
const REQUEST_OPTIONS: &str = "RequestOptions";

fn is_request_options(parameter: &ProtocolParameter) -> bool {
    parameter.name == "requestOptions" || parameter.raw_type == TypeRef::named(REQUEST_OPTIONS)
}

impl<'a> MethodSynthesizer<'a> {
    pub(super) fn assemble_invocation(&mut self) {
        let protocol = self.protocol;
        let mut args = Vec::with_capacity(protocol.parameters.len());

        for parameter in &protocol.parameters {
            let argument = match self.arguments.remove(&parameter.name) {
                Some(argument) => argument,
                None if is_request_options(parameter) => Expr::var(self.options_name()),
                None => Expr::var(&parameter.name),
            };

            let already_serialized = argument
                .as_var()
                .is_some_and(|name| self.serialized_bodies.contains(name));
            let merge_patch = match parameter.location {
                Some(ParameterLocation::Body) if !already_serialized => {
                    self.merge_patch_model(&parameter.raw_type)
                }
                _ => None,
            };
            match merge_patch {
                Some(model) => {
                    let source = argument
                        .as_var()
                        .map_or_else(|| parameter.name.clone(), str::to_string);
                    let (declaration, variable) =
                        self.merge_patch_binding(&source, model, !parameter.required);
                    self.block.push(declaration);
                    args.push(variable);
                }
                None => args.push(argument),
            }
        }

        let call = Expr::Call {
            function: protocol.name.clone(),
            args,
        };
        self.invocation = self.builder.invocation(call);
        self.return_conversion = self.convert_result();
    }

    fn convert_result(&mut self) -> ReturnConversion {
        let convenience = self.convenience;
        if let Some(paging) = &convenience.paging {
            return ReturnConversion::PageItems {
                item: Box::new(self.convert_return(&paging.item_type)),
            };
        }
        match &convenience.returns {
            None => ReturnConversion::Discard,
            Some(ty) => self.convert_return(ty),
        }
    }

    fn convert_return(&mut self, ty: &TypeRef) -> ReturnConversion {
        match classify(ty, self.code_model) {
            TypeNode::Binary(BinaryEncoding::Opaque) => ReturnConversion::RawPayload,
            TypeNode::Enum(decl) => {
                self.references.insert(Reference::Model {
                    name: decl.name.clone(),
                });
                ReturnConversion::EnumFromWire {
                    name: decl.name.clone(),
                    backing: decl.backing.clone(),
                }
            }
            TypeNode::Sequence(_) | TypeNode::Map { .. } => {
                self.references
                    .insert(Reference::TypeReference { ty: ty.clone() });
                ReturnConversion::DeserializeGeneric { ty: ty.clone() }
            }
            TypeNode::Model { name, .. } => {
                self.references.insert(Reference::Model {
                    name: name.to_string(),
                });
                ReturnConversion::Deserialize { ty: ty.clone() }
            }
            TypeNode::Primitive { .. } | TypeNode::String | TypeNode::Binary(_) => {
                ReturnConversion::Deserialize { ty: ty.clone() }
            }
        }
    }
}

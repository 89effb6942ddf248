//! Per-parameter wire serialization.
//!
//! A paired parameter contributes an argument expression to the protocol
//! call. An unpaired parameter that still has a wire location is written into
//! the request options directly: headers and query entries by their wire
//! name, bodies through `SetBody`. Optional parameters are only written when
//! they are not null.

use super::matcher::Pairing;
use super::{MethodSynthesizer, ITEM_VARIABLE};
use crate::ir::{Collect, Expr, Intrinsic, RequestCall, Stmt};
use crate::mime::{classify_mime, is_merge_patch, MimeFamily};
use crate::model::{BinaryEncoding, ClientModel, ParameterLocation, TypeRef, WireParameter};
use crate::patch::SerializationMode;
use crate::references::Reference;
use crate::taxonomy::{classify, TypeNode};
use crate::{Error, Result};

use log::{debug, warn};

fn wire_name(wire: &WireParameter) -> String {
    wire.serialized_name.clone().unwrap_or_else(|| wire.name.clone())
}

impl<'a> MethodSynthesizer<'a> {
    pub(super) fn synthesize_parameters(&mut self) -> Result<()> {
        let pairings = self.pairings.clone();
        for pairing in &pairings {
            self.synthesize_parameter(pairing)?;
        }
        Ok(())
    }

    fn synthesize_parameter(&mut self, pairing: &Pairing<'a>) -> Result<()> {
        let name = pairing.name();
        if pairing.is_context() {
            let options = self.options_name();
            self.block.request(
                &options,
                RequestCall::SetContext {
                    value: Expr::var(name),
                },
            );
            return Ok(());
        }

        if let Some(protocol) = pairing.protocol {
            let argument = self.convert_to_protocol(pairing);
            self.arguments.insert(protocol.name.clone(), argument);
            return Ok(());
        }

        match pairing.wire {
            Some(wire) => match wire.location {
                ParameterLocation::Header => self.write_header(pairing, wire),
                ParameterLocation::Query => self.write_query(pairing, wire),
                ParameterLocation::Body => self.write_body(pairing, wire),
                ParameterLocation::Path | ParameterLocation::Context => {
                    debug!(
                        "{}: '{name}' has no protocol counterpart, passing by name",
                        self.convenience.name
                    );
                }
            },
            None => self.pass_through(pairing)?,
        }
        Ok(())
    }

    /// Policy for a parameter nothing else consumes
    fn pass_through(&mut self, pairing: &Pairing<'a>) -> Result<()> {
        let name = pairing.name();
        if self.convenience.is_transformation_input(name) {
            return Ok(());
        }
        if !self.config.allows_unmatched(name) {
            return Err(Error::UnmatchedParameter {
                method: self.convenience.name.clone(),
                parameter: name.to_string(),
            });
        }
        warn!(
            "{}: parameter '{name}' has no wire mapping and is passed through by name",
            self.convenience.name
        );
        Ok(())
    }

    fn is_merge_patch_operation(&self) -> bool {
        is_merge_patch(self.protocol.operation.request_content_type())
    }

    /// Model behind `ty` when the operation sends it as a merge patch
    pub(super) fn merge_patch_model(&self, ty: &TypeRef) -> Option<&'a ClientModel> {
        if !self.is_merge_patch_operation() {
            return None;
        }
        self.code_model.model_of(ty).filter(|m| m.merge_patch)
    }

    fn multipart_model(&self, ty: &TypeRef) -> Option<&'a ClientModel> {
        self.code_model.model_of(ty).filter(|m| m.multipart)
    }

    /// Declare `<name>InBinaryData` holding the merge-patch serialization of `name`.
    ///
    /// With `nullable` set the binding stays null when `name` is null.
    pub(super) fn merge_patch_binding(
        &mut self,
        name: &str,
        model: &ClientModel,
        nullable: bool,
    ) -> (Stmt, Expr) {
        self.references.insert(Reference::MergePatchHelper {
            model: model.name.clone(),
        });
        let variable = format!("{name}InBinaryData");
        let serialized = Expr::apply(
            Intrinsic::SerializeObject {
                mode: SerializationMode::MergePatch,
            },
            Expr::var(name),
        );
        let value = if nullable {
            Expr::null_or(Expr::var(name), serialized)
        } else {
            serialized
        };
        let declaration = Stmt::Declare {
            name: variable.clone(),
            ty: Some(TypeRef::opaque_binary()),
            value,
        };
        (declaration, Expr::var(variable))
    }

    /// Argument expression for a parameter paired with a protocol parameter
    fn convert_to_protocol(&mut self, pairing: &Pairing<'a>) -> Expr {
        let name = pairing.name();
        let value = Expr::var(name);
        let wire_type = pairing.parameter.wire_type();

        if let Some(wire) = pairing.wire.filter(|w| w.location == ParameterLocation::Body) {
            if let Some(model) = self.multipart_model(&wire.raw_type) {
                return self.multipart_expression(value, model);
            }
            if let Some(model) = self.merge_patch_model(&pairing.parameter.client_type) {
                // a protocol parameter typed as the model is serialized at the call site
                let serialized_at_call = pairing
                    .protocol
                    .is_some_and(|p| self.merge_patch_model(&p.raw_type).is_some());
                if serialized_at_call {
                    return value;
                }
                let (declaration, variable) =
                    self.merge_patch_binding(name, model, !pairing.is_required());
                self.block.push(declaration);
                return variable;
            }
            return self.body_expression(value, wire_type, SerializationMode::Full);
        }

        match classify(wire_type, self.code_model) {
            TypeNode::Enum(_) => self.expression_to_string(value, wire_type, pairing.wire),
            TypeNode::Sequence(items) => match classify(items, self.code_model) {
                TypeNode::Enum(decl) => {
                    self.references.insert(Reference::StreamCollectors);
                    let item = Expr::var(ITEM_VARIABLE);
                    let body = if decl.is_string_backed() {
                        Expr::apply(Intrinsic::StringifyOrEmpty, item)
                    } else {
                        Expr::if_null(
                            item.clone(),
                            Expr::str(""),
                            Expr::apply(Intrinsic::Stringify, Expr::apply(Intrinsic::EnumValue, item)),
                        )
                    };
                    Expr::map_each(value, ITEM_VARIABLE, body, Collect::List)
                }
                TypeNode::Primitive { .. }
                | TypeNode::String
                | TypeNode::Binary(_)
                | TypeNode::Model { .. }
                | TypeNode::Sequence(_)
                | TypeNode::Map { .. } => value,
            },
            TypeNode::Primitive { .. }
            | TypeNode::String
            | TypeNode::Binary(_)
            | TypeNode::Model { .. }
            | TypeNode::Map { .. } => value,
        }
    }

    /// Request body payload for `value` of declared type `ty`
    pub(super) fn body_expression(
        &mut self,
        value: Expr,
        ty: &TypeRef,
        mode: SerializationMode,
    ) -> Expr {
        let serialize = |arg| Expr::apply(Intrinsic::SerializeObject { mode }, arg);
        match classify_mime(self.protocol.operation.request_content_type()) {
            MimeFamily::Text => Expr::apply(Intrinsic::BinaryFromString, value),
            MimeFamily::Binary => value,
            MimeFamily::Json | MimeFamily::Xml | MimeFamily::Multipart => {
                match classify(ty, self.code_model) {
                    TypeNode::Binary(BinaryEncoding::Opaque) => value,
                    TypeNode::Binary(BinaryEncoding::Base64Url) => {
                        self.references.insert(Reference::Base64Url);
                        serialize(Expr::apply(Intrinsic::Base64UrlEncode, value))
                    }
                    TypeNode::Enum(_) => serialize(Expr::null_or(
                        value.clone(),
                        Expr::apply(Intrinsic::EnumValue, value),
                    )),
                    TypeNode::Binary(BinaryEncoding::Bytes)
                    | TypeNode::Primitive { .. }
                    | TypeNode::String
                    | TypeNode::Model { .. }
                    | TypeNode::Sequence(_)
                    | TypeNode::Map { .. } => serialize(value),
                }
            }
        }
    }

    /// Client value in its wire representation
    fn convert_from_client(&mut self, value: Expr, ty: &TypeRef) -> Expr {
        match ty {
            TypeRef::Primitive { name, .. } if name.is_wire_encoded() => {
                Expr::apply(Intrinsic::EncodeWire { kind: *name }, value)
            }
            TypeRef::Binary {
                encoding: BinaryEncoding::Base64Url,
            } => {
                self.references.insert(Reference::Base64Url);
                Expr::apply(Intrinsic::Base64UrlEncode, value)
            }
            _ => value,
        }
    }

    /// String form of a header or query value
    fn expression_to_string(
        &mut self,
        value: Expr,
        ty: &TypeRef,
        wire: Option<&WireParameter>,
    ) -> Expr {
        match classify(ty, self.code_model) {
            TypeNode::String => value,
            TypeNode::Enum(decl) => {
                if decl.is_string_backed() {
                    Expr::apply(Intrinsic::EnumToString, value)
                } else {
                    Expr::apply(Intrinsic::Stringify, Expr::apply(Intrinsic::EnumValue, value))
                }
            }
            TypeNode::Sequence(items) => {
                if wire.is_some_and(WireParameter::is_multi_explode) {
                    return value;
                }
                let format = wire.map(WireParameter::collection_format).unwrap_or_default();
                let item = Expr::var(ITEM_VARIABLE);
                let join = |body| {
                    Expr::map_each(
                        value.clone(),
                        ITEM_VARIABLE,
                        body,
                        Collect::Join {
                            delimiter: format.delimiter().to_string(),
                        },
                    )
                };
                match classify(items, self.code_model) {
                    TypeNode::Enum(decl) => {
                        self.references.insert(Reference::StreamCollectors);
                        let member = if decl.is_string_backed() {
                            item
                        } else {
                            Expr::null_or(item.clone(), Expr::apply(Intrinsic::EnumValue, item))
                        };
                        join(Expr::apply(Intrinsic::StringifyOrEmpty, member))
                    }
                    TypeNode::Primitive { kind, .. } if kind.is_value_type() => {
                        self.references.insert(Reference::StreamCollectors);
                        join(Expr::apply(Intrinsic::StringifyOrEmpty, item))
                    }
                    TypeNode::String => {
                        self.references.insert(Reference::StreamCollectors);
                        join(Expr::apply(Intrinsic::StringifyOrEmpty, item))
                    }
                    TypeNode::Primitive { .. }
                    | TypeNode::Binary(_)
                    | TypeNode::Model { .. }
                    | TypeNode::Sequence(_)
                    | TypeNode::Map { .. } => {
                        // elements are converted when the wire element type differs
                        let wire_items = match wire.map(|w| &w.raw_type) {
                            Some(TypeRef::Array { items: wire_items }) => wire_items.as_ref(),
                            _ => items,
                        };
                        let input = if wire_items != items {
                            let converted = self.convert_from_client(item, wire_items);
                            Expr::map_each(value, ITEM_VARIABLE, converted, Collect::List)
                        } else {
                            value
                        };
                        self.references.insert(Reference::CollectionSerializer);
                        Expr::apply(Intrinsic::SerializeIterable { format }, input)
                    }
                }
            }
            TypeNode::Primitive { .. }
            | TypeNode::Binary(_)
            | TypeNode::Model { .. }
            | TypeNode::Map { .. } => {
                let converted = self.convert_from_client(value, ty);
                Expr::apply(Intrinsic::Stringify, converted)
            }
        }
    }

    fn write_header(&mut self, pairing: &Pairing<'a>, wire: &WireParameter) {
        let name = pairing.name();
        let value =
            self.expression_to_string(Expr::var(name), pairing.parameter.wire_type(), Some(wire));
        let options = self.options_name();
        let call = RequestCall::SetHeader {
            name: wire_name(wire),
            value,
        };
        self.block
            .guarded(!pairing.is_required(), name, |block| block.request(&options, call));
    }

    fn write_query(&mut self, pairing: &Pairing<'a>, wire: &WireParameter) {
        let name = pairing.name();
        let options = self.options_name();
        let ty = pairing.parameter.wire_type();

        if let (true, TypeRef::Array { items }) = (wire.is_multi_explode(), ty) {
            let element = self.expression_to_string(Expr::var(ITEM_VARIABLE), items, Some(wire));
            let call = RequestCall::AddQueryParam {
                name: wire_name(wire),
                value: element,
                already_encoded: wire.already_encoded,
            };
            let skip_nulls = classify(items, self.code_model).is_nullable();
            let item_type = (**items).clone();
            self.block.guarded(!pairing.is_required(), name, |block| {
                block.for_each(ITEM_VARIABLE, item_type, Expr::var(name), |body| {
                    body.guarded(skip_nulls, ITEM_VARIABLE, |inner| inner.request(&options, call));
                });
            });
            return;
        }

        let value = self.expression_to_string(Expr::var(name), ty, Some(wire));
        let call = RequestCall::AddQueryParam {
            name: wire_name(wire),
            value,
            already_encoded: wire.already_encoded,
        };
        self.block
            .guarded(!pairing.is_required(), name, |block| block.request(&options, call));
    }

    fn write_body(&mut self, pairing: &Pairing<'a>, wire: &WireParameter) {
        let name = pairing.name();
        let options = self.options_name();
        let mut statements = Vec::new();

        let value = if let Some(model) = self.multipart_model(&wire.raw_type) {
            self.multipart_expression(Expr::var(name), model)
        } else if let Some(model) = self.merge_patch_model(&pairing.parameter.client_type) {
            let (declaration, variable) = self.merge_patch_binding(name, model, false);
            statements.push(declaration);
            variable
        } else {
            self.body_expression(
                Expr::var(name),
                pairing.parameter.wire_type(),
                SerializationMode::Full,
            )
        };
        statements.push(Stmt::Request {
            options,
            call: RequestCall::SetBody { value },
        });

        self.block.guarded(!pairing.is_required(), name, |block| {
            for statement in statements {
                block.push(statement);
            }
        });
    }
}

//! Grouping and flattening transformations.

use super::matcher::{find_wire, Pairing};
use super::MethodSynthesizer;
use crate::ir::{Expr, RequestCall, Setter};
use crate::model::{
    ConvenienceParameter, FlattenMapping, GroupedProperty, ParameterTransformation, TypeRef,
};
use crate::patch::SerializationMode;
use crate::references::Reference;
use crate::{Error, Result};

use log::debug;

impl<'a> MethodSynthesizer<'a> {
    pub(super) fn apply_group_by(&mut self) -> Result<()> {
        let convenience = self.convenience;
        for transformation in &convenience.transformations {
            if let ParameterTransformation::GroupBy { source, mappings } = transformation {
                self.group_by(source, mappings)?;
            }
        }
        Ok(())
    }

    pub(super) fn apply_flatten(&mut self) -> Result<()> {
        let convenience = self.convenience;
        for transformation in &convenience.transformations {
            if let ParameterTransformation::Flatten { target, mappings } = transformation {
                self.flatten(target, mappings)?;
            }
        }
        Ok(())
    }

    fn group_by(&mut self, source: &'a str, mappings: &'a [GroupedProperty]) -> Result<()> {
        let method = self.method_name();
        let source_parameter = self
            .convenience
            .parameter(source)
            .ok_or_else(|| Error::unknown_parameter(method, source))?;
        if !self.pairings.iter().any(|p| p.name() == source) {
            debug!("{method}: '{source}' is not part of this overload, skipping its group");
            return Ok(());
        }

        let source_type = &source_parameter.client_type;
        let model = self
            .code_model
            .model_of(source_type)
            .ok_or_else(|| Error::unknown_model(method, source_type))?;

        for mapping in mappings {
            let property = model.property(&mapping.property).ok_or_else(|| {
                Error::unknown_property(method, &model.name, &mapping.property)
            })?;
            let read = Expr::property(Expr::var(source), &property.name);
            let value = if source_parameter.required {
                read
            } else {
                Expr::null_or(Expr::var(source), read)
            };
            self.block.declare(
                &mapping.out.name,
                Some(mapping.out.client_type.clone()),
                value,
            );

            if mapping.out.location.is_none() {
                continue;
            }
            let wire = find_wire(&self.convenience.operation, &mapping.out.name).ok_or_else(|| {
                Error::UnknownWireParameter {
                    method: method.to_string(),
                    parameter: mapping.out.name.clone(),
                }
            })?;
            let protocol = self.claim_protocol(wire);
            self.pairings.push(Pairing {
                parameter: &mapping.out,
                wire: Some(wire),
                protocol,
                synthesized: true,
            });
        }
        Ok(())
    }

    /// Declared or grouped parameter a flatten mapping reads from
    fn flatten_input(&self, name: &str) -> Option<&'a ConvenienceParameter> {
        let convenience = self.convenience;
        convenience.parameter(name).or_else(|| {
            convenience
                .transformations
                .iter()
                .filter_map(|t| match t {
                    ParameterTransformation::GroupBy { mappings, .. } => Some(mappings),
                    ParameterTransformation::Flatten { .. } => None,
                })
                .flatten()
                .map(|m| &m.out)
                .find(|out| out.name == name)
        })
    }

    fn flatten(
        &mut self,
        target: &'a ConvenienceParameter,
        mappings: &'a [FlattenMapping],
    ) -> Result<()> {
        let method = self.method_name();
        if !target.required && self.convenience.only_required_parameters {
            debug!("{method}: optional body '{}' has no content in this overload", target.name);
            return Ok(());
        }

        let model = self
            .code_model
            .model_of(&target.client_type)
            .ok_or_else(|| Error::unknown_model(method, &target.client_type))?;

        let mut args = Vec::new();
        let mut setters = Vec::new();
        for mapping in mappings {
            let input = self
                .flatten_input(&mapping.input)
                .ok_or_else(|| Error::unknown_parameter(method, &mapping.input))?;
            let target_property = model.property(&mapping.target_property).ok_or_else(|| {
                Error::unknown_property(method, &model.name, &mapping.target_property)
            })?;

            let (value, required) = match &mapping.input_property {
                None => (Expr::var(&input.name), input.required),
                Some(name) => {
                    let property = self
                        .code_model
                        .model_of(&input.client_type)
                        .ok_or_else(|| Error::unknown_model(method, &input.client_type))?
                        .property(name)
                        .ok_or_else(|| {
                            Error::unknown_property(method, input.client_type.to_string(), name)
                        })?;
                    (
                        Expr::property(Expr::var(&input.name), &property.name),
                        property.required,
                    )
                }
            };

            let setter = || Setter {
                property: target_property.name.clone(),
                value: value.clone(),
            };
            if required {
                if self.config.required_fields_as_constructor_args {
                    args.push(value.clone());
                } else {
                    setters.push(setter());
                }
            } else if !self.convenience.only_required_parameters {
                setters.push(setter());
            }
        }

        let object = format!("{}Obj", target.name);
        self.block.declare(
            &object,
            Some(target.client_type.clone()),
            Expr::Construct {
                ty: target.client_type.clone(),
                args,
                setters,
            },
        );
        self.references.insert(Reference::Model {
            name: model.name.clone(),
        });

        let body = if model.multipart {
            self.multipart_expression(Expr::var(&object), model)
        } else if let Some(patch) = self.merge_patch_model(&target.client_type) {
            self.references.insert(Reference::MergePatchHelper {
                model: patch.name.clone(),
            });
            self.body_expression(
                Expr::var(&object),
                &target.client_type,
                SerializationMode::MergePatch,
            )
        } else {
            self.body_expression(Expr::var(&object), &target.client_type, SerializationMode::Full)
        };
        self.block
            .declare(&target.name, Some(TypeRef::opaque_binary()), body);
        self.serialized_bodies.insert(target.name.clone());

        if !target.required {
            let options = self.options_name();
            self.block.request(
                &options,
                RequestCall::SetBody {
                    value: Expr::var(&target.name),
                },
            );
        }
        Ok(())
    }
}

//! Pairing of convenience parameters with protocol parameters.
//!
//! Both sides are keyed by the name their operation sends on the wire. A
//! parameter binds to a wire parameter when the wire name, escaped for
//! reserved words, equals the parameter name and the declared locations do not
//! disagree. An unnamed body is keyed by [`BODY_SENTINEL`], so at most one
//! such body pairs up.

// Internal imports (std, crate)
use std::collections::{HashMap, HashSet};

use super::MethodSynthesizer;
use crate::model::{
    ConvenienceMethod, ConvenienceParameter, Operation, ParameterLocation, ProtocolMethod,
    ProtocolParameter, WireParameter,
};
use crate::utils::escape_reserved_parameter_name;
use crate::{Error, Result};

// External imports (alphabetized)
use log::debug;

/// Key of a request body that has no wire name
pub const BODY_SENTINEL: &str = "__internal_request_BODY";

/// A convenience parameter and the protocol parameter it feeds, if any
#[derive(Clone, Copy, Debug)]
pub struct Pairing<'a> {
    pub parameter: &'a ConvenienceParameter,
    /// Wire view of the parameter in the convenience method's operation
    pub wire: Option<&'a WireParameter>,
    pub protocol: Option<&'a ProtocolParameter>,
    /// Inserted by a transformation rather than by the matcher
    pub synthesized: bool,
}

impl<'a> Pairing<'a> {
    pub fn name(&self) -> &'a str {
        &self.parameter.name
    }

    pub fn is_required(&self) -> bool {
        self.parameter.required
    }

    /// Key the pairing is matched under
    pub fn key(&self) -> &'a str {
        self.wire
            .and_then(wire_key)
            .unwrap_or(&self.parameter.name)
    }

    pub fn is_context(&self) -> bool {
        self.parameter.location == Some(ParameterLocation::Context)
            || self
                .wire
                .is_some_and(|w| w.location == ParameterLocation::Context)
    }
}

/// Serialized name of a wire parameter, with the sentinel for an unnamed body
fn wire_key(wire: &WireParameter) -> Option<&str> {
    match (&wire.serialized_name, wire.location) {
        (Some(name), _) => Some(name),
        (None, ParameterLocation::Body) => Some(BODY_SENTINEL),
        (None, _) => None,
    }
}

/// Wire parameter of `operation` exposed under `name` after reserved-word escaping
pub(crate) fn find_wire<'a>(operation: &'a Operation, name: &str) -> Option<&'a WireParameter> {
    operation
        .parameters
        .iter()
        .find(|w| escape_reserved_parameter_name(&w.name) == name)
}

fn bind<'a>(
    operation: &'a Operation,
    name: &str,
    location: Option<ParameterLocation>,
) -> Option<&'a WireParameter> {
    find_wire(operation, name).filter(|w| location.map_or(true, |l| l == w.location))
}

fn protocol_key<'a>(protocol: &'a ProtocolMethod, parameter: &'a ProtocolParameter) -> &'a str {
    bind(&protocol.operation, &parameter.name, parameter.location)
        .and_then(wire_key)
        .unwrap_or(&parameter.name)
}

fn is_caller_supplied(constant: bool, from_client: bool) -> bool {
    !constant && !from_client
}

/// Protocol parameters indexed by wire key
fn protocol_index<'a>(
    method: &str,
    protocol: &'a ProtocolMethod,
) -> Result<HashMap<&'a str, &'a ProtocolParameter>> {
    let mut index = HashMap::new();
    for parameter in protocol
        .parameters
        .iter()
        .filter(|p| is_caller_supplied(p.constant, p.from_client))
    {
        let key = protocol_key(protocol, parameter);
        if index.insert(key, parameter).is_some() {
            return Err(Error::DuplicateWireName {
                method: method.to_string(),
                name: key.to_string(),
            });
        }
    }
    Ok(index)
}

/// Pair every caller-supplied convenience parameter with at most one protocol parameter
pub fn match_parameters<'a>(
    convenience: &'a ConvenienceMethod,
    protocol: &'a ProtocolMethod,
) -> Result<Vec<Pairing<'a>>> {
    let index = protocol_index(&convenience.name, protocol)?;
    let mut claimed = HashSet::new();
    let mut pairings = Vec::new();

    for parameter in convenience
        .parameters
        .iter()
        .filter(|p| is_caller_supplied(p.constant, p.from_client))
    {
        if convenience
            .paging
            .as_ref()
            .is_some_and(|paging| paging.should_hide(&parameter.name))
        {
            debug!(
                "{}: '{}' is hidden for paging",
                convenience.name, parameter.name
            );
            continue;
        }

        let wire = bind(&convenience.operation, &parameter.name, parameter.location);
        let mut pairing = Pairing {
            parameter,
            wire,
            protocol: None,
            synthesized: false,
        };
        if let Some(target) = index.get(pairing.key()) {
            if claimed.insert(target.name.as_str()) {
                pairing.protocol = Some(*target);
            } else {
                debug!(
                    "{}: protocol parameter '{}' already paired, '{}' stays unpaired",
                    convenience.name, target.name, parameter.name
                );
            }
        }
        pairings.push(pairing);
    }

    Ok(pairings)
}

impl<'a> MethodSynthesizer<'a> {
    /// Protocol parameter keyed by `wire`, unless an existing pairing already claimed it
    pub(super) fn claim_protocol(&self, wire: &'a WireParameter) -> Option<&'a ProtocolParameter> {
        let key = wire_key(wire).unwrap_or(&wire.name);
        let protocol = self.protocol;
        let target = protocol
            .parameters
            .iter()
            .filter(|p| is_caller_supplied(p.constant, p.from_client))
            .find(|p| protocol_key(protocol, p) == key)?;

        let taken = self
            .pairings
            .iter()
            .any(|p| p.protocol.is_some_and(|claimed| claimed.name == target.name));
        if taken {
            debug!(
                "{}: protocol parameter '{}' already paired",
                self.convenience.name, target.name
            );
            return None;
        }
        Some(target)
    }
}

//! Test utilities for synthesis integration tests
#![allow(dead_code)]

// Internal imports (std, crate)
use std::collections::HashMap;

// External imports (alphabetized)
use convgen_core::ir::{Collect, Expr, Intrinsic, RequestCall, Stmt};
use convgen_core::model::CodeModel;
use convgen_core::{synthesize, GeneratorConfig, SynthesizedMethod};
use serde_json::Value as JsonValue;

pub const WIDGETS: &str = include_str!("../../../../tests/fixtures/code-model/widgets.yaml");

/// Parsed widget-service fixture
pub fn widgets() -> CodeModel {
    CodeModel::parse_content(WIDGETS).expect("widgets fixture parses")
}

/// Synthesize the convenience method `name` of `model`
pub fn synthesize_named(
    model: &CodeModel,
    config: &GeneratorConfig,
    name: &str,
) -> convgen_core::Result<SynthesizedMethod> {
    let pair = model
        .find_method(name)
        .unwrap_or_else(|| panic!("fixture has no method {name}"));
    synthesize(model, config, pair)
}

/// A request-options mutation observed while running statements
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub kind: &'static str,
    pub name: String,
    pub value: JsonValue,
}

/// Interprets synthesized statements over JSON values.
///
/// Only what the tests look at is modelled: variables, null checks, loops,
/// string conversions of scalars and the request calls. Failures raised by
/// a guard end the run with the failure message.
#[derive(Debug, Default)]
pub struct Evaluator {
    env: HashMap<String, JsonValue>,
    pub api_version: String,
    pub recorded: Vec<Recorded>,
}

impl Evaluator {
    pub fn new(api_version: &str) -> Self {
        Self {
            api_version: api_version.to_string(),
            ..Self::default()
        }
    }

    pub fn bind(mut self, name: &str, value: JsonValue) -> Self {
        self.env.insert(name.to_string(), value);
        self
    }

    /// Execute `stmts`; `Err` carries the message of a raised failure
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), String> {
        for stmt in stmts {
            match stmt {
                Stmt::Comment { .. } | Stmt::Eval { .. } => {}
                Stmt::Declare { name, value, .. } => {
                    let value = self.eval(value);
                    self.env.insert(name.clone(), value);
                }
                Stmt::Request { call, .. } => self.record(call),
                Stmt::If { condition, body } => {
                    if self.eval(condition) == JsonValue::Bool(true) {
                        self.run(body)?;
                    }
                }
                Stmt::ForEach {
                    item, source, body, ..
                } => {
                    let elements = match self.eval(source) {
                        JsonValue::Array(elements) => elements,
                        _ => Vec::new(),
                    };
                    for element in elements {
                        self.env.insert(item.clone(), element);
                        self.run(body)?;
                    }
                    self.env.remove(item);
                }
                Stmt::Throw { error } | Stmt::Return { value: error } => {
                    return Err(text(&self.eval(error)));
                }
            }
        }
        Ok(())
    }

    /// Recorded calls of one kind, as (name, value) pairs
    pub fn calls(&self, kind: &str) -> Vec<(String, JsonValue)> {
        self.recorded
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| (r.name.clone(), r.value.clone()))
            .collect()
    }

    fn record(&mut self, call: &RequestCall) {
        let (kind, name, value) = match call {
            RequestCall::SetHeader { name, value } => ("header", name.clone(), value),
            RequestCall::AddQueryParam { name, value, .. } => ("query", name.clone(), value),
            RequestCall::SetBody { value } => ("body", String::new(), value),
            RequestCall::SetContext { value } => ("context", String::new(), value),
        };
        let value = self.eval(value);
        self.recorded.push(Recorded { kind, name, value });
    }

    fn eval(&self, expr: &Expr) -> JsonValue {
        match expr {
            Expr::Var { name } => self.env.get(name).cloned().unwrap_or(JsonValue::Null),
            Expr::Str { value } => JsonValue::String(value.clone()),
            Expr::Null => JsonValue::Null,
            Expr::Property { target, property } => self
                .eval(target)
                .get(property)
                .cloned()
                .unwrap_or(JsonValue::Null),
            Expr::NotNull { value } => JsonValue::Bool(!self.eval(value).is_null()),
            Expr::IfNull {
                value,
                then,
                otherwise,
            } => {
                if self.eval(value).is_null() {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::MapEach {
                source,
                item,
                body,
                collect,
            } => {
                let elements = match self.eval(source) {
                    JsonValue::Array(elements) => elements,
                    _ => return JsonValue::Null,
                };
                let mapped: Vec<JsonValue> = elements
                    .into_iter()
                    .map(|element| {
                        let mut scope = Evaluator {
                            env: self.env.clone(),
                            ..Evaluator::default()
                        };
                        scope.env.insert(item.clone(), element);
                        scope.eval(body)
                    })
                    .collect();
                match collect {
                    Collect::List => JsonValue::Array(mapped),
                    Collect::Join { delimiter } => JsonValue::String(
                        mapped.iter().map(text).collect::<Vec<_>>().join(delimiter),
                    ),
                }
            }
            Expr::Intrinsic { op, args } => self.intrinsic(op, args),
            Expr::Construct { .. } | Expr::Multipart { .. } | Expr::Call { .. } => {
                JsonValue::Null
            }
        }
    }

    fn intrinsic(&self, op: &Intrinsic, args: &[Expr]) -> JsonValue {
        let first = || args.first().map(|a| self.eval(a)).unwrap_or(JsonValue::Null);
        match op {
            Intrinsic::ApiVersionNotIn => JsonValue::Bool(
                !args
                    .iter()
                    .any(|a| self.eval(a) == JsonValue::String(self.api_version.clone())),
            ),
            Intrinsic::InvalidArgument
            | Intrinsic::FailedResult
            | Intrinsic::EnumValue
            | Intrinsic::EncodeWire { .. } => first(),
            Intrinsic::EnumToString | Intrinsic::Stringify => JsonValue::String(text(&first())),
            Intrinsic::StringifyOrNull => match first() {
                JsonValue::Null => JsonValue::Null,
                value => JsonValue::String(text(&value)),
            },
            Intrinsic::StringifyOrEmpty => match first() {
                JsonValue::Null => JsonValue::String(String::new()),
                value => JsonValue::String(text(&value)),
            },
            other => JsonValue::String(format!("{other:?}")),
        }
    }
}

/// Plain string form of a JSON scalar
pub fn text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Language-agnostic statements and expressions produced by the synthesizer.
//!
//! A statement emitter renders these into target-language source. Nothing in
//! here knows about syntax: helpers the generated code needs at runtime are
//! named by [`Intrinsic`], request-option mutations by [`RequestCall`].

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{CollectionFormat, MethodKind, PrimitiveKind, TypeRef};
use crate::patch::SerializationMode;
use crate::references::Reference;

/// Runtime helpers a generated expression calls into
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Intrinsic {
    /// Fresh, empty request options
    NewRequestOptions,
    /// Text payload from a string
    BinaryFromString,
    /// Serialize an object into a payload in the given mode
    SerializeObject { mode: SerializationMode },
    Base64UrlEncode,
    /// Wire string of a string-backed enum member
    EnumToString,
    /// Backing value of an enum member
    EnumValue,
    /// Convert a client value into its wire encoding
    EncodeWire { kind: PrimitiveKind },
    /// String form of a non-null value
    Stringify,
    /// String form, with null mapped to the empty string
    StringifyOrEmpty,
    /// String form, with null preserved
    StringifyOrNull,
    /// Serialize an iterable with the collection format's delimiter
    SerializeIterable { format: CollectionFormat },
    /// True when the client's api-version is none of the argument strings
    ApiVersionNotIn,
    /// Argument-validation error carrying the message argument
    InvalidArgument,
    /// Failed asynchronous result wrapping the error argument
    FailedResult,
    /// Resolve an asynchronous response into its payload
    AwaitPayload,
}

/// How `Expr::MapEach` gathers its results
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "into", rename_all = "snake_case")]
pub enum Collect {
    List,
    Join { delimiter: String },
}

/// A setter call chained onto a constructed object
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Setter {
    pub property: String,
    pub value: Expr,
}

/// One chained call of a multipart/form-data builder
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "part", rename_all = "snake_case")]
pub enum MultipartPart {
    File {
        name: String,
        content: Expr,
        content_type: Expr,
        filename: Expr,
    },
    /// Parallel lists projected from an array of files
    Files {
        name: String,
        content: Expr,
        content_type: Expr,
        filename: Expr,
    },
    Json {
        name: String,
        value: Expr,
    },
    Text {
        name: String,
        value: Expr,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum Expr {
    Var {
        name: String,
    },
    Str {
        value: String,
    },
    Null,
    /// Property read through the model's getter
    Property {
        target: Box<Expr>,
        property: String,
    },
    Construct {
        ty: TypeRef,
        args: Vec<Expr>,
        setters: Vec<Setter>,
    },
    Intrinsic {
        op: Intrinsic,
        args: Vec<Expr>,
    },
    /// `value == null ? then : otherwise`
    IfNull {
        value: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    NotNull {
        value: Box<Expr>,
    },
    /// Map every element of `source`, bound to `item`, through `body`
    MapEach {
        source: Box<Expr>,
        item: String,
        body: Box<Expr>,
        collect: Collect,
    },
    /// Multipart builder bound to the request options; finalizing yields the body
    Multipart {
        options: String,
        parts: Vec<MultipartPart>,
    },
    /// Call of the protocol method
    Call {
        function: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var { name: name.into() }
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Str {
            value: value.into(),
        }
    }

    pub fn property(target: Expr, property: impl Into<String>) -> Self {
        Self::Property {
            target: Box::new(target),
            property: property.into(),
        }
    }

    pub fn intrinsic(op: Intrinsic, args: Vec<Expr>) -> Self {
        Self::Intrinsic { op, args }
    }

    /// Single-argument intrinsic call
    pub fn apply(op: Intrinsic, arg: Expr) -> Self {
        Self::Intrinsic {
            op,
            args: vec![arg],
        }
    }

    pub fn if_null(value: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::IfNull {
            value: Box::new(value),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// `value == null ? null : otherwise`
    pub fn null_or(value: Expr, otherwise: Expr) -> Self {
        Self::if_null(value, Self::Null, otherwise)
    }

    pub fn not_null(value: Expr) -> Self {
        Self::NotNull {
            value: Box::new(value),
        }
    }

    pub fn map_each(source: Expr, item: impl Into<String>, body: Expr, collect: Collect) -> Self {
        Self::MapEach {
            source: Box::new(source),
            item: item.into(),
            body: Box::new(body),
            collect,
        }
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            Self::Var { name } => Some(name),
            _ => None,
        }
    }
}

/// A mutation of the request options
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RequestCall {
    SetHeader {
        name: String,
        value: Expr,
    },
    AddQueryParam {
        name: String,
        value: Expr,
        already_encoded: bool,
    },
    SetBody {
        value: Expr,
    },
    SetContext {
        value: Expr,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum Stmt {
    Comment {
        text: String,
    },
    Declare {
        name: String,
        ty: Option<TypeRef>,
        value: Expr,
    },
    Eval {
        expr: Expr,
    },
    Request {
        options: String,
        call: RequestCall,
    },
    If {
        condition: Expr,
        body: Vec<Stmt>,
    },
    ForEach {
        item: String,
        item_type: TypeRef,
        source: Expr,
        body: Vec<Stmt>,
    },
    Throw {
        error: Expr,
    },
    Return {
        value: Expr,
    },
}

impl Stmt {
    /// Statements nested directly inside this one
    pub fn children(&self) -> &[Stmt] {
        match self {
            Self::If { body, .. } | Self::ForEach { body, .. } => body,
            _ => &[],
        }
    }
}

/// Ordered statement list under construction
#[derive(Debug, Default)]
pub struct Block {
    statements: Vec<Stmt>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.statements.push(stmt);
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.push(Stmt::Comment { text: text.into() });
    }

    pub fn declare(&mut self, name: impl Into<String>, ty: Option<TypeRef>, value: Expr) {
        self.push(Stmt::Declare {
            name: name.into(),
            ty,
            value,
        });
    }

    pub fn request(&mut self, options: &str, call: RequestCall) {
        self.push(Stmt::Request {
            options: options.to_string(),
            call,
        });
    }

    pub fn if_block(&mut self, condition: Expr, build: impl FnOnce(&mut Block)) {
        let mut inner = Block::new();
        build(&mut inner);
        self.push(Stmt::If {
            condition,
            body: inner.statements,
        });
    }

    /// Run `build` unconditionally, or inside `if name != null` when `guarded`
    pub fn guarded(&mut self, guarded: bool, name: &str, build: impl FnOnce(&mut Block)) {
        if guarded {
            self.if_block(Expr::not_null(Expr::var(name)), build);
        } else {
            build(self);
        }
    }

    pub fn for_each(
        &mut self,
        item: impl Into<String>,
        item_type: TypeRef,
        source: Expr,
        build: impl FnOnce(&mut Block),
    ) {
        let mut inner = Block::new();
        build(&mut inner);
        self.push(Stmt::ForEach {
            item: item.into(),
            item_type,
            source,
            body: inner.statements,
        });
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn into_statements(self) -> Vec<Stmt> {
        self.statements
    }
}

/// Conversion of the raw response payload into the convenience return type
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "conversion", rename_all = "snake_case")]
pub enum ReturnConversion {
    /// Void overload: the payload is dropped
    Discard,
    /// Opaque binary: the payload is returned as is
    RawPayload,
    Deserialize { ty: TypeRef },
    /// Generic containers need a type-reference helper
    DeserializeGeneric { ty: TypeRef },
    EnumFromWire { name: String, backing: TypeRef },
    /// Page-streaming: each page item is converted
    PageItems { item: Box<ReturnConversion> },
}

/// Everything synthesized for one convenience method
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SynthesizedMethod {
    pub name: String,
    pub protocol: String,
    pub kind: MethodKind,
    pub statements: Vec<Stmt>,
    pub invocation: Expr,
    pub return_conversion: ReturnConversion,
    pub references: BTreeSet<Reference>,
}

impl SynthesizedMethod {
    /// Depth-first walk over all statements, nested ones included
    pub fn walk(&self) -> Vec<&Stmt> {
        fn visit<'s>(stmts: &'s [Stmt], out: &mut Vec<&'s Stmt>) {
            for stmt in stmts {
                out.push(stmt);
                visit(stmt.children(), out);
            }
        }
        let mut out = Vec::new();
        visit(&self.statements, &mut out);
        out
    }
}

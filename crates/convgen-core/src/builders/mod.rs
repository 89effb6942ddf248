//! Method-kind specific shapes of failures and protocol calls.
pub mod asynchronous;
pub mod sync;

use crate::ir::{Expr, Stmt};
use crate::model::MethodKind;

/// Trait for shaping the parts of a synthesized method that depend on its kind.
pub trait InvocationBuilder {
    /// Statement that ends the method with `error`
    fn fail(&self, error: Expr) -> Stmt;

    /// Wrap the protocol call so that it yields the raw response payload
    fn invocation(&self, call: Expr) -> Expr;
}

pub fn get_builder(kind: MethodKind) -> Box<dyn InvocationBuilder> {
    match kind {
        MethodKind::Sync => Box::new(sync::SyncInvocationBuilder),
        MethodKind::Async => Box::new(asynchronous::AsyncInvocationBuilder),
    }
}

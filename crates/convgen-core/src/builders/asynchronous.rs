//! Asynchronous convenience methods.
//!
//! Nothing is thrown from an asynchronous method: a failed guard returns a
//! failed result instead, and the protocol call is awaited for its payload.

use super::InvocationBuilder;
use crate::ir::{Expr, Intrinsic, Stmt};

pub struct AsyncInvocationBuilder;

impl InvocationBuilder for AsyncInvocationBuilder {
    fn fail(&self, error: Expr) -> Stmt {
        Stmt::Return {
            value: Expr::apply(Intrinsic::FailedResult, error),
        }
    }

    fn invocation(&self, call: Expr) -> Expr {
        Expr::apply(Intrinsic::AwaitPayload, call)
    }
}

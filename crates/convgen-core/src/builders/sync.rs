//! Blocking convenience methods: failures are thrown, the call returns the payload.

use super::InvocationBuilder;
use crate::ir::{Expr, Stmt};

pub struct SyncInvocationBuilder;

impl InvocationBuilder for SyncInvocationBuilder {
    fn fail(&self, error: Expr) -> Stmt {
        Stmt::Throw { error }
    }

    fn invocation(&self, call: Expr) -> Expr {
        call
    }
}

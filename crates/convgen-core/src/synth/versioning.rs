//! Api-version applicability guards.

use super::MethodSynthesizer;
use crate::ir::{Expr, Intrinsic};
use crate::references::Reference;

impl<'a> MethodSynthesizer<'a> {
    /// One guard per pairing gated to a set of api-versions
    pub(super) fn write_version_guards(&mut self) {
        let pairings = self.pairings.clone();
        for pairing in &pairings {
            let Some(versions) = pairing.parameter.added_versions() else {
                continue;
            };
            let condition = Expr::intrinsic(
                Intrinsic::ApiVersionNotIn,
                versions.iter().map(|v| Expr::str(v.as_str())).collect(),
            );
            let message = format!(
                "Parameter {} is only available in api-version {}.",
                pairing.name(),
                versions.join(", ")
            );
            let failure = self
                .builder
                .fail(Expr::apply(Intrinsic::InvalidArgument, Expr::str(message)));
            self.block.if_block(condition, |block| block.push(failure));
            self.references.insert(Reference::VersionValidation);
        }
    }
}

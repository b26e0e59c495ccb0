//! Passes 7 through 9: the checks that need a fully typed tree. Dot
//! expressions targeted by assignment are flagged as writes, arithmetic is
//! limited to arithmetic-capable types and assignment targets must be
//! lvalues, and explicit casts must be between related types.

use super::Analysis;
use crate::arena_ctx::AstContext;
use crate::ast::walk::walk_all;
use crate::ast::{BinaryOp, CastKind, Expr, ExprKind, Module};
use crate::error::ErrorKind;
use crate::scope::{ScopeArena, SymbolKind};

/// Pass 7. There is no way to know at parse time that `p.x = ...` stores
/// rather than loads; the assignment's shape only exists once the tree is
/// built.
pub(super) fn mark_dot_writes<'a>(
    module: &Module<'a>,
    _ctx: &AstContext<'a>,
    _analysis: &mut Analysis,
) {
    walk_all(module.body, &mut |expr| {
        if let ExprKind::Binary(binary) = &expr.kind {
            if binary.op == BinaryOp::Assign {
                if let ExprKind::Dot(dot) = &binary.lhs.get().kind {
                    dot.is_write.set(true);
                }
            }
        }
    });
}

/// Pass 8. Comparisons work on every type; everything else has rules:
/// assignment needs a writable left side, arithmetic needs a numeric type.
pub(super) fn check_binary_exprs<'a>(
    module: &Module<'a>,
    _ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) {
    walk_all(module.body, &mut |expr| {
        let ExprKind::Binary(binary) = &expr.kind else {
            return;
        };
        if binary.op.is_comparison() || binary.op.is_logical() {
            return;
        }
        if binary.op == BinaryOp::Assign {
            if !is_writable(binary.lhs.get(), analysis.scopes) {
                analysis.errors.error(
                    ErrorKind::CannotAssignToLValue,
                    binary.op_span,
                    "Cannot assign a value to the expression left of '='",
                );
            }
        } else if binary.op.is_arithmetic() {
            let Some(ty) = expr.ty() else {
                return;
            };
            if !ty.can_do_arithmetic() {
                analysis.errors.error(
                    ErrorKind::OperatorCannotBeUsedWithType,
                    binary.op_span,
                    format!(
                        "Operator '{}' cannot be used with type '{}'.",
                        binary.op.text(),
                        analysis.types.name_of(ty, analysis.interner)
                    ),
                );
            }
        }
    });
}

/// A reference to a variable symbol, a member access, or a declaration in
/// initializer position can be assigned to. Nothing else can.
fn is_writable(expr: &Expr, scopes: &ScopeArena) -> bool {
    match &expr.kind {
        ExprKind::VariableRef(var_ref) => var_ref
            .symbol
            .get()
            .map(|id| scopes.symbol(id).kind == SymbolKind::Variable)
            .unwrap_or(false),
        ExprKind::Dot(_) | ExprKind::VariableDecl(_) => true,
        _ => false,
    }
}

/// Pass 9. `cast<T>(e)` is legal iff `e`'s type and `T` are implicitly
/// convertible in at least one direction.
pub(super) fn check_explicit_casts<'a>(
    module: &Module<'a>,
    _ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) {
    walk_all(module.body, &mut |expr| {
        let ExprKind::Cast(cast) = &expr.kind else {
            return;
        };
        if cast.cast_kind != CastKind::Explicit {
            return;
        }
        let (Some(from), Some(to)) = (cast.value.ty(), cast.target.resolved()) else {
            return;
        };
        if from.can_implicit_cast_to(to) {
            return;
        }
        if !from.can_explicit_cast_to(to) {
            analysis.errors.error(
                ErrorKind::InvalidExplicitCast,
                expr.span,
                format!(
                    "Cannot cast from '{}' to '{}'",
                    analysis.types.name_of(from, analysis.interner),
                    analysis.types.name_of(to, analysis.interner)
                ),
            );
        }
    });
}

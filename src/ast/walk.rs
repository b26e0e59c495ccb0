//! Traversal helpers shared by the semantic passes. Passes that track
//! lexical scope match on `Compound`/`FuncDef` themselves and fall back to
//! [`for_each_child`] for everything else.

use super::{Expr, ExprKind};

/// Calls `f` once for each direct child of `expr`, in source order.
pub fn for_each_child<'a>(expr: &'a Expr<'a>, mut f: impl FnMut(&'a Expr<'a>)) {
    match &expr.kind {
        ExprKind::LiteralInt32(_)
        | ExprKind::LiteralFloat(_)
        | ExprKind::LiteralBool(_)
        | ExprKind::VariableRef(_)
        | ExprKind::VariableDecl(_) => {}
        ExprKind::Binary(binary) => {
            f(binary.lhs.get());
            f(binary.rhs.get());
        }
        ExprKind::Unary(unary) => f(unary.operand),
        ExprKind::Cast(cast) => f(cast.value),
        ExprKind::If(if_expr) => {
            f(if_expr.condition.get());
            f(if_expr.then_expr.get());
            if let Some(else_expr) = if_expr.else_expr.get() {
                f(else_expr);
            }
        }
        ExprKind::While(while_expr) => {
            f(while_expr.condition.get());
            f(while_expr.body);
        }
        ExprKind::Compound(compound) => {
            for stmt in compound.stmts {
                f(stmt);
            }
        }
        ExprKind::Return(value) => f(value),
        ExprKind::FuncDef(func) => f(func.body),
        ExprKind::FuncCall(call) => {
            f(call.target);
            for arg in call.args {
                f(arg);
            }
        }
        ExprKind::Dot(dot) => f(dot.lhs),
        ExprKind::Class(class) => f(class.body),
        ExprKind::Assert(condition) => f(condition),
    }
}

/// Pre-order traversal of `expr` and everything below it.
pub fn walk_all<'a>(expr: &'a Expr<'a>, f: &mut impl FnMut(&'a Expr<'a>)) {
    f(expr);
    for_each_child(expr, |child| walk_all(child, f));
}

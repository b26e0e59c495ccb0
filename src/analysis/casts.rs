//! Pass 6: bottom-up typing. Derives every expression's type from its
//! children and grafts implicit casts where the typing rules require a
//! conversion: logical operands and conditions become `bool`, mixed
//! arithmetic widens the narrower side, assignments convert their right
//! side to the target's type.

use super::Analysis;
use crate::arena_ctx::AstContext;
use crate::ast::walk::for_each_child;
use crate::ast::{
    BinaryExpr, BinaryOp, CastExpr, CastKind, DotExpr, Expr, ExprKind, FuncCall, IfExpr, Module,
    TypeRef, UnaryOp, WhileExpr,
};
use crate::error::ErrorKind;
use crate::types::Ty;

pub(super) fn add_implicit_casts<'a>(
    module: &Module<'a>,
    ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) {
    type_walk(module.body, ctx, analysis);
}

fn type_walk<'a>(expr: &'a Expr<'a>, ctx: &AstContext<'a>, analysis: &mut Analysis) {
    for_each_child(expr, |child| type_walk(child, ctx, analysis));
    annotate(expr, ctx, analysis);
}

/// Types one node whose children are already typed. Bails without setting
/// a type only when a child failed first; the pipeline's error gate keeps
/// such half-typed trees from ever leaving the front-end.
fn annotate<'a>(expr: &'a Expr<'a>, ctx: &AstContext<'a>, analysis: &mut Analysis) {
    if expr.ty().is_some() {
        return;
    }
    let ty = match &expr.kind {
        ExprKind::LiteralInt32(_) => Ty::INT32,
        ExprKind::LiteralFloat(_) => Ty::FLOAT,
        ExprKind::LiteralBool(_) => Ty::BOOL,
        ExprKind::VariableRef(var_ref) => {
            match var_ref
                .symbol
                .get()
                .and_then(|id| analysis.scopes.symbol(id).ty)
            {
                Some(ty) => ty,
                None => return,
            }
        }
        ExprKind::VariableDecl(decl) => match decl.type_ref.resolved() {
            Some(ty) => ty,
            None => return,
        },
        ExprKind::Unary(unary) => match unary.op {
            UnaryOp::Not => Ty::BOOL,
            UnaryOp::PreIncrement | UnaryOp::PreDecrement => match unary.operand.ty() {
                Some(ty) => ty,
                None => return,
            },
        },
        ExprKind::Cast(cast) => match cast.target.resolved() {
            Some(ty) => ty,
            None => return,
        },
        ExprKind::Binary(binary) => match annotate_binary(binary, ctx, analysis) {
            Some(ty) => ty,
            None => return,
        },
        ExprKind::If(if_expr) => match annotate_if(expr, if_expr, ctx, analysis) {
            Some(ty) => ty,
            None => return,
        },
        ExprKind::While(while_expr) => match annotate_while(while_expr, ctx, analysis) {
            Some(ty) => ty,
            None => return,
        },
        ExprKind::Compound(compound) => match compound.stmts.last() {
            None => Ty::VOID,
            Some(last) => match last.ty() {
                Some(ty) => ty,
                None => return,
            },
        },
        ExprKind::Return(value) => match value.ty() {
            Some(ty) => ty,
            None => return,
        },
        ExprKind::FuncDef(func) => match func.func_ty.get() {
            Some(id) => Ty::Function(id),
            None => return,
        },
        ExprKind::FuncCall(call) => match annotate_call(call, analysis) {
            Some(ty) => ty,
            None => return,
        },
        ExprKind::Dot(dot) => match annotate_dot(dot, analysis) {
            Some(ty) => ty,
            None => return,
        },
        ExprKind::Class(_) => Ty::VOID,
        ExprKind::Assert(_) => Ty::VOID,
    };
    expr.set_ty(ty);
}

fn annotate_binary<'a>(
    binary: &BinaryExpr<'a>,
    ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) -> Option<Ty> {
    let lhs_ty = binary.lhs.get().ty()?;
    let rhs_ty = binary.rhs.get().ty()?;

    if binary.op.is_logical() {
        let mut ok = true;
        for slot in [&binary.lhs, &binary.rhs] {
            let operand = slot.get();
            let ty = operand.ty()?;
            if ty == Ty::BOOL {
                continue;
            }
            if ty.can_coerce_to_condition() {
                slot.set(implicit_cast(ctx, operand, Ty::BOOL));
            } else {
                analysis.errors.error(
                    ErrorKind::InvalidImplicitCastInBinaryExpr,
                    binary.op_span,
                    format!(
                        "Cannot implicitly convert '{}' to 'bool'",
                        ty_name(ty, analysis)
                    ),
                );
                ok = false;
            }
        }
        return ok.then_some(Ty::BOOL);
    }

    let result_ty = if lhs_ty == rhs_ty {
        lhs_ty
    } else if lhs_ty.can_implicit_cast_to(rhs_ty) && binary.op != BinaryOp::Assign {
        // Widen the left side up to the right...
        binary.lhs.set(implicit_cast(ctx, binary.lhs.get(), rhs_ty));
        rhs_ty
    } else if rhs_ty.can_implicit_cast_to(lhs_ty) {
        // ...or the right side up to the left.
        binary.rhs.set(implicit_cast(ctx, binary.rhs.get(), lhs_ty));
        lhs_ty
    } else {
        let message = if binary.op == BinaryOp::Assign {
            format!(
                "Cannot assign value of type '{}' to a variable of type '{}'",
                ty_name(rhs_ty, analysis),
                ty_name(lhs_ty, analysis)
            )
        } else {
            format!(
                "Cannot implicitly convert '{}' to '{}' or vice-versa",
                ty_name(rhs_ty, analysis),
                ty_name(lhs_ty, analysis)
            )
        };
        analysis
            .errors
            .error(ErrorKind::InvalidImplicitCastInBinaryExpr, binary.op_span, message);
        return None;
    };

    Some(if binary.op.is_comparison() {
        Ty::BOOL
    } else {
        result_ty
    })
}

fn annotate_if<'a>(
    expr: &'a Expr<'a>,
    if_expr: &IfExpr<'a>,
    ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) -> Option<Ty> {
    let condition = if_expr.condition.get();
    let cond_ty = condition.ty()?;
    if cond_ty != Ty::BOOL {
        if cond_ty.can_coerce_to_condition() {
            if_expr
                .condition
                .set(implicit_cast(ctx, condition, Ty::BOOL));
        } else {
            analysis.errors.error(
                ErrorKind::InvalidImplicitCastInIfCondition,
                condition.span,
                format!(
                    "Condition expression cannot be implicitly converted from '{}' to 'bool'.",
                    ty_name(cond_ty, analysis)
                ),
            );
            return None;
        }
    }

    let then_expr = if_expr.then_expr.get();
    let then_ty = then_expr.ty()?;
    let Some(else_expr) = if_expr.else_expr.get() else {
        return Some(then_ty);
    };
    let else_ty = else_expr.ty()?;

    if then_ty == else_ty {
        Some(then_ty)
    } else if else_ty.can_implicit_cast_to(then_ty) {
        if_expr
            .else_expr
            .set(Some(implicit_cast(ctx, else_expr, then_ty)));
        Some(then_ty)
    } else if then_ty.can_implicit_cast_to(else_ty) {
        if_expr
            .then_expr
            .set(implicit_cast(ctx, then_expr, else_ty));
        Some(else_ty)
    } else {
        analysis.errors.error(
            ErrorKind::InvalidImplicitCastInIfBodies,
            expr.span,
            format!(
                "Cannot implicitly convert '{}' to '{}' or vice-versa",
                ty_name(then_ty, analysis),
                ty_name(else_ty, analysis)
            ),
        );
        None
    }
}

fn annotate_while<'a>(
    while_expr: &WhileExpr<'a>,
    ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) -> Option<Ty> {
    let condition = while_expr.condition.get();
    let cond_ty = condition.ty()?;
    if cond_ty != Ty::BOOL {
        if cond_ty.can_coerce_to_condition() {
            while_expr
                .condition
                .set(implicit_cast(ctx, condition, Ty::BOOL));
        } else {
            analysis.errors.error(
                ErrorKind::InvalidImplicitCastInInWhileCondition,
                condition.span,
                format!(
                    "Condition expression cannot be implicitly converted from '{}' to 'bool'.",
                    ty_name(cond_ty, analysis)
                ),
            );
            return None;
        }
    }
    Some(Ty::VOID)
}

fn annotate_call(call: &FuncCall, analysis: &mut Analysis) -> Option<Ty> {
    let target_ty = call.target.ty()?;
    match target_ty {
        Ty::Function(func_id) => Some(analysis.types.function(func_id).return_ty),
        other => {
            analysis.errors.error(
                ErrorKind::OperatorCannotBeUsedWithType,
                call.open_paren_span,
                format!(
                    "Operator '()' cannot be used with type '{}'.",
                    ty_name(other, analysis)
                ),
            );
            None
        }
    }
}

fn annotate_dot(dot: &DotExpr, analysis: &mut Analysis) -> Option<Ty> {
    let lhs_ty = dot.lhs.ty()?;
    let Ty::Class(class_id) = lhs_ty else {
        analysis.errors.error(
            ErrorKind::LeftOfDotNotClass,
            dot.dot_span,
            "Type of value on left side of '.' operator is not an instance of a class.",
        );
        return None;
    };

    let class_type = analysis.types.class(class_id);
    if let Some(field) = class_type.find_field(dot.member) {
        dot.member_ordinal.set(Some(field.ordinal));
        return field.ty;
    }
    if let Some(method) = class_type.find_method(dot.member) {
        return method.ty;
    }

    analysis.errors.error(
        ErrorKind::ClassMemberNotFound,
        dot.dot_span,
        format!(
            "Class '{}' does not have a member named '{}'",
            analysis.interner.resolve(class_type.name),
            analysis.interner.resolve(dot.member)
        ),
    );
    None
}

/// Wraps `value` in an implicit cast to `to`, reusing the value's span.
fn implicit_cast<'a>(ctx: &AstContext<'a>, value: &'a Expr<'a>, to: Ty) -> &'a Expr<'a> {
    let cast = ctx.alloc_expr(
        value.span,
        ExprKind::Cast(CastExpr {
            target: TypeRef::known(ctx.next_node_id(), value.span, to),
            value,
            cast_kind: CastKind::Implicit,
        }),
    );
    cast.set_ty(to);
    cast
}

fn ty_name(ty: Ty, analysis: &Analysis) -> String {
    analysis.types.name_of(ty, analysis.interner)
}

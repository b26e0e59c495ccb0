//! Implicit-cast insertion and explicit-cast legality across the type
//! lattice.

#[allow(dead_code)]
mod common;

use common::{error_kinds, with_compiled};
use tarn::ast::{CastKind, Expr, ExprKind};
use tarn::error::ErrorKind;
use tarn::types::Ty;

fn body_stmts<'c, 'a>(compilation: &'c tarn::Compilation<'a>) -> &'c [&'a Expr<'a>] {
    match &compilation.module.body.kind {
        ExprKind::Compound(body) => body.stmts,
        _ => panic!("module body must be a compound"),
    }
}

#[test]
fn logical_operands_become_bool() {
    with_compiled("x:int = 1; x && true;", |compilation, _| {
        let stmts = body_stmts(compilation);
        assert_eq!(stmts[1].ty(), Some(Ty::BOOL));
        let ExprKind::Binary(and) = &stmts[1].kind else {
            panic!();
        };
        let ExprKind::Cast(cast) = &and.lhs.get().kind else {
            panic!("int operand of '&&' must be cast");
        };
        assert_eq!(cast.cast_kind, CastKind::Implicit);
        assert_eq!(cast.target.resolved(), Some(Ty::BOOL));
        // The bool side stays bare.
        assert!(matches!(and.rhs.get().kind, ExprKind::LiteralBool(true)));
    });
}

#[test]
fn assignment_widens_only_the_right_side() {
    with_compiled("x:float; x = 1;", |compilation, _| {
        let stmts = body_stmts(compilation);
        assert_eq!(stmts[1].ty(), Some(Ty::FLOAT));
        let ExprKind::Binary(assign) = &stmts[1].kind else {
            panic!();
        };
        // The target keeps its type; the int value is converted.
        assert!(matches!(assign.lhs.get().kind, ExprKind::VariableRef(_)));
        let ExprKind::Cast(cast) = &assign.rhs.get().kind else {
            panic!("assigned int must be cast to float");
        };
        assert_eq!(cast.target.resolved(), Some(Ty::FLOAT));
    });
}

#[test]
fn assignment_never_narrows() {
    let kinds = error_kinds("x:int = 1.5;");
    assert_eq!(kinds, vec![ErrorKind::InvalidImplicitCastInBinaryExpr]);
}

#[test]
fn narrowing_assignment_message_names_both_types() {
    let diagnostics = common::compile_errors("x:int = 1.5;");
    assert!(
        diagnostics[0]
            .message
            .contains("Cannot assign value of type 'float' to a variable of type 'int'"),
        "message was: {}",
        diagnostics[0].message
    );
}

#[test]
fn comparisons_unify_operands_but_yield_bool() {
    with_compiled("1 < 2.5;", |compilation, _| {
        let stmts = body_stmts(compilation);
        assert_eq!(stmts[0].ty(), Some(Ty::BOOL));
        let ExprKind::Binary(cmp) = &stmts[0].kind else {
            panic!();
        };
        let ExprKind::Cast(cast) = &cmp.lhs.get().kind else {
            panic!("int side of the comparison must widen");
        };
        assert_eq!(cast.target.resolved(), Some(Ty::FLOAT));
    });
}

#[test]
fn equal_types_need_no_cast() {
    with_compiled("1 + 2; 1.5 + 2.5; true == false;", |compilation, _| {
        tarn::ast::walk::walk_all(compilation.module.body, &mut |expr| {
            assert!(
                !matches!(expr.kind, ExprKind::Cast(_)),
                "no casts expected anywhere in this module"
            );
        });
    });
}

#[test]
fn widening_explicit_cast() {
    with_compiled("cast<float>(1);", |compilation, _| {
        let stmts = body_stmts(compilation);
        assert_eq!(stmts[0].ty(), Some(Ty::FLOAT));
    });
}

#[test]
fn unrelated_explicit_cast_is_rejected() {
    let kinds = error_kinds("class Point { x:int; } p:Point; cast<int>(p);");
    assert_eq!(kinds, vec![ErrorKind::InvalidExplicitCast]);
}

#[test]
fn class_condition_cannot_become_bool() {
    let kinds = error_kinds("class Point { x:int; } p:Point; if(p) 1;");
    assert_eq!(kinds, vec![ErrorKind::InvalidImplicitCastInIfCondition]);
}

#[test]
fn class_while_condition_uses_the_while_kind() {
    let kinds = error_kinds("class Point { x:int; } p:Point; while(p) 1;");
    assert_eq!(kinds, vec![ErrorKind::InvalidImplicitCastInInWhileCondition]);
}

#[test]
fn incompatible_if_branches() {
    let kinds = error_kinds("class Point { x:int; } p:Point; if(true) p else 1;");
    assert_eq!(kinds, vec![ErrorKind::InvalidImplicitCastInIfBodies]);
}

#[test]
fn logical_operand_with_no_bool_conversion() {
    let kinds = error_kinds("class Point { x:int; } p:Point; p && true;");
    assert_eq!(kinds, vec![ErrorKind::InvalidImplicitCastInBinaryExpr]);
}

#[test]
fn arithmetic_on_bools_is_rejected() {
    let kinds = error_kinds("true + false;");
    assert_eq!(kinds, vec![ErrorKind::OperatorCannotBeUsedWithType]);
}

#[test]
fn comparison_of_bools_is_fine() {
    with_compiled("true == false; true != true;", |compilation, _| {
        for stmt in body_stmts(compilation) {
            assert_eq!(stmt.ty(), Some(Ty::BOOL));
        }
    });
}

#[test]
fn ternary_gets_the_same_treatment_as_if() {
    with_compiled("(? 1; 2; 3.0);", |compilation, _| {
        let stmts = body_stmts(compilation);
        assert_eq!(stmts[0].ty(), Some(Ty::FLOAT));
        let ExprKind::If(if_expr) = &stmts[0].kind else {
            panic!("ternary lowers to if");
        };
        assert!(matches!(
            if_expr.condition.get().kind,
            ExprKind::Cast(_)
        ));
        assert!(matches!(if_expr.then_expr.get().kind, ExprKind::Cast(_)));
    });
}

#[test]
fn double_widens_over_float() {
    // double > float > int in the widening order; the result takes the
    // widest operand.
    with_compiled("d:double; f:float; d = f + 1;", |compilation, _| {
        let stmts = body_stmts(compilation);
        assert_eq!(stmts[2].ty(), Some(Ty::DOUBLE));
        let ExprKind::Binary(assign) = &stmts[2].kind else {
            panic!();
        };
        let ExprKind::Cast(rhs_cast) = &assign.rhs.get().kind else {
            panic!("float sum must widen to double for the assignment");
        };
        assert_eq!(rhs_cast.target.resolved(), Some(Ty::DOUBLE));
        // Inside the sum the int literal widened to float first.
        let ExprKind::Binary(sum) = &rhs_cast.value.kind else {
            panic!();
        };
        assert_eq!(sum.lhs.get().ty(), Some(Ty::FLOAT));
        assert_eq!(sum.rhs.get().ty(), Some(Ty::FLOAT));
    });
}

#[test]
fn implicit_casts_reuse_the_operand_span() {
    with_compiled("1 + 2.5;", |compilation, _| {
        let stmts = body_stmts(compilation);
        let ExprKind::Binary(sum) = &stmts[0].kind else {
            panic!();
        };
        let cast = sum.lhs.get();
        let ExprKind::Cast(inner) = &cast.kind else {
            panic!();
        };
        assert_eq!(cast.span, inner.value.span);
    });
}

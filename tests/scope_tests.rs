//! Scopes, symbols, classes and member access through the full pipeline.

#[allow(dead_code)]
mod common;

use common::{compile_errors, error_kinds, with_compiled};
use tarn::ast::{Expr, ExprKind};
use tarn::error::ErrorKind;
use tarn::scope::{StorageKind, SymbolKind};
use tarn::types::Ty;

fn body_stmts<'c, 'a>(compilation: &'c tarn::Compilation<'a>) -> &'c [&'a Expr<'a>] {
    match &compilation.module.body.kind {
        ExprKind::Compound(body) => body.stmts,
        _ => panic!("module body must be a compound"),
    }
}

#[test]
fn duplicate_declaration_in_one_scope() {
    let kinds = error_kinds("x:int; x:float;");
    assert_eq!(kinds, vec![ErrorKind::SymbolAlreadyDefinedInScope]);
}

#[test]
fn inner_scope_may_shadow() {
    with_compiled("x:int; { x:float; x + 1.5; };", |compilation, _| {
        let stmts = body_stmts(compilation);
        let ExprKind::Compound(inner) = &stmts[1].kind else {
            panic!("expected block");
        };
        assert_eq!(inner.stmts[1].ty(), Some(Ty::FLOAT));
    });
}

#[test]
fn outer_variable_is_visible_inside_blocks() {
    with_compiled("x:int = 1; { x + 1; };", |_, _| {});
}

#[test]
fn local_read_before_declaration_is_rejected() {
    let kinds = error_kinds("{ x + 1; x:int; };");
    assert_eq!(kinds, vec![ErrorKind::VariableUsedBeforeDefinition]);
}

#[test]
fn global_use_before_declaration_is_fine() {
    // Module-level symbols have global storage; declare-before-use only
    // constrains locals.
    with_compiled("x + 1; x:int;", |_, _| {});
}

#[test]
fn local_initializer_may_not_read_its_own_variable() {
    let kinds = error_kinds("{ x:int = x + 1; };");
    assert_eq!(kinds, vec![ErrorKind::VariableUsedBeforeDefinition]);
}

#[test]
fn later_local_reads_see_the_definition() {
    with_compiled("{ x:int = 1; x + 1; };", |_, _| {});
}

#[test]
fn function_definition_and_call() {
    with_compiled("func add:int(a:int, b:int) a + b; add(1, 2) + 3;", |compilation, _| {
        let stmts = body_stmts(compilation);
        assert_eq!(stmts[1].ty(), Some(Ty::INT32));
        let ExprKind::Binary(sum) = &stmts[1].kind else {
            panic!();
        };
        let ExprKind::FuncCall(call) = &sum.lhs.get().kind else {
            panic!("expected call on the left");
        };
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.target.ty().map(|t| matches!(t, Ty::Function(_))), Some(true));
    });
}

#[test]
fn parameters_are_visible_in_the_body() {
    with_compiled("func twice:float(v:float) v + v;", |compilation, interner| {
        let stmts = body_stmts(compilation);
        let ExprKind::FuncDef(func) = &stmts[0].kind else {
            panic!();
        };
        let param = compilation
            .scopes
            .symbol(func.parameters[0].symbol.get().expect("param symbol"));
        assert_eq!(interner.resolve(param.name), "v");
        assert_eq!(param.storage, StorageKind::Local);
        assert_eq!(param.ty, Some(Ty::FLOAT));
    });
}

#[test]
fn duplicate_parameter_names_are_rejected() {
    let kinds = error_kinds("func f:int(a:int, a:int) 1;");
    assert_eq!(kinds, vec![ErrorKind::SymbolAlreadyDefinedInScope]);
}

#[test]
fn duplicate_function_name_is_rejected() {
    let kinds = error_kinds("func f:int() 1; func f:int() 2;");
    assert_eq!(kinds, vec![ErrorKind::SymbolAlreadyDefinedInScope]);
}

#[test]
fn calling_a_non_function_is_rejected() {
    let kinds = error_kinds("x:int = 1; x(2);");
    assert_eq!(kinds, vec![ErrorKind::OperatorCannotBeUsedWithType]);
}

#[test]
fn class_fields_resolve_through_dot() {
    with_compiled(
        "class Point { x:int; y:float; } p:Point; p.x + 1;",
        |compilation, _| {
            let stmts = body_stmts(compilation);
            assert_eq!(stmts[2].ty(), Some(Ty::INT32));
            let ExprKind::Binary(sum) = &stmts[2].kind else {
                panic!();
            };
            let ExprKind::Dot(dot) = &sum.lhs.get().kind else {
                panic!("expected member access");
            };
            assert_eq!(dot.member_ordinal.get(), Some(0));
            assert!(!dot.is_write.get());
        },
    );
}

#[test]
fn assigned_member_is_marked_as_write() {
    with_compiled(
        "class Point { x:int; } p:Point; p.x = 2;",
        |compilation, _| {
            let stmts = body_stmts(compilation);
            let ExprKind::Binary(assign) = &stmts[2].kind else {
                panic!();
            };
            let ExprKind::Dot(dot) = &assign.lhs.get().kind else {
                panic!();
            };
            assert!(dot.is_write.get());
        },
    );
}

#[test]
fn missing_member_is_reported_at_the_dot() {
    let diagnostics = compile_errors("class Point { x:int; } p:Point; p.z;");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ErrorKind::ClassMemberNotFound);
    assert!(diagnostics[0].message.contains("Point"));
    assert!(diagnostics[0].message.contains("'z'"));
}

#[test]
fn dot_on_a_primitive_is_rejected() {
    let kinds = error_kinds("b:bool = true; b.x;");
    assert_eq!(kinds, vec![ErrorKind::LeftOfDotNotClass]);
}

#[test]
fn class_fields_have_instance_storage() {
    with_compiled("class Point { x:int; }", |compilation, interner| {
        let stmts = body_stmts(compilation);
        let ExprKind::Class(class) = &stmts[0].kind else {
            panic!();
        };
        let ExprKind::Compound(body) = &class.body.kind else {
            panic!();
        };
        let field = compilation
            .scopes
            .symbols_in(body.scope)
            .next()
            .expect("field symbol");
        assert_eq!(field.storage, StorageKind::Instance);
        assert_eq!(interner.resolve(field.name), "x");
        assert_eq!(field.fully_qualified_name, "test.Point.x");
    });
}

#[test]
fn class_methods_populate_the_class_type() {
    with_compiled(
        "class Counter { n:int; func bump:int(by:int) n + by; }",
        |compilation, interner| {
            let stmts = body_stmts(compilation);
            let ExprKind::Class(class) = &stmts[0].kind else {
                panic!();
            };
            let class_type = compilation.types.class(class.class_id.get().unwrap());
            assert_eq!(class_type.fields.len(), 1);
            assert_eq!(class_type.methods.len(), 1);
            assert_eq!(interner.resolve(class_type.methods[0].name), "bump");
            assert!(matches!(class_type.methods[0].ty, Some(Ty::Function(_))));
        },
    );
}

#[test]
fn initialized_declarations_still_count_as_fields() {
    with_compiled("class Pixel { x:int = 0; }", |compilation, _| {
        let stmts = body_stmts(compilation);
        let ExprKind::Class(class) = &stmts[0].kind else {
            panic!();
        };
        let class_type = compilation.types.class(class.class_id.get().unwrap());
        assert_eq!(class_type.fields.len(), 1);
        assert_eq!(class_type.fields[0].ty, Some(Ty::INT32));
    });
}

#[test]
fn class_name_is_a_usable_type() {
    with_compiled("class Point { x:int; } p:Point;", |compilation, _| {
        let ExprKind::Compound(body) = &compilation.module.body.kind else {
            panic!();
        };
        let symbols: Vec<_> = compilation.scopes.symbols_in(body.scope).collect();
        assert_eq!(symbols[0].kind, SymbolKind::Type);
        assert_eq!(symbols[1].kind, SymbolKind::Variable);
        assert!(matches!(symbols[1].ty, Some(Ty::Class(_))));
    });
}

#[test]
fn unknown_type_name() {
    let kinds = error_kinds("x:Widget;");
    assert_eq!(kinds, vec![ErrorKind::TypeNotDefined]);
}

#[test]
fn variable_used_as_type() {
    let kinds = error_kinds("x:int; y:x;");
    assert_eq!(kinds, vec![ErrorKind::SymbolIsNotAType]);
}

#[test]
fn unresolved_name_suggests_a_close_match() {
    let diagnostics = compile_errors("count:int = 1; coutn + 1;");
    assert_eq!(diagnostics[0].kind, ErrorKind::VariableNotDefined);
    assert!(
        diagnostics[0].message.contains("Did you mean 'count'?"),
        "message was: {}",
        diagnostics[0].message
    );
}

#[test]
fn module_symbols_are_fully_qualified() {
    with_compiled("total:int;", |compilation, _| {
        let ExprKind::Compound(body) = &compilation.module.body.kind else {
            panic!();
        };
        let symbol = compilation.scopes.symbols_in(body.scope).next().unwrap();
        assert_eq!(symbol.fully_qualified_name, "test.total");
        assert_eq!(symbol.storage, StorageKind::Global);
    });
}

#[test]
fn scope_parents_mirror_nesting() {
    with_compiled("{ { 1; }; };", |compilation, _| {
        let ExprKind::Compound(module_body) = &compilation.module.body.kind else {
            panic!();
        };
        let ExprKind::Compound(outer) = &module_body.stmts[0].kind else {
            panic!();
        };
        let ExprKind::Compound(inner) = &outer.stmts[0].kind else {
            panic!();
        };
        assert_eq!(compilation.scopes.scope(module_body.scope).parent, None);
        assert_eq!(compilation.scopes.scope(outer.scope).parent, Some(module_body.scope));
        assert_eq!(compilation.scopes.scope(inner.scope).parent, Some(outer.scope));
    });
}

//! Passes 3 and 4: give every class its concrete member list, then resolve
//! every type reference written in the source.

use super::Analysis;
use crate::arena_ctx::AstContext;
use crate::ast::walk::for_each_child;
use crate::ast::{ClassDef, Expr, ExprKind, Module, TypeRef};
use crate::error::ErrorKind;
use crate::scope::{ScopeId, SymbolKind};
use crate::types::{ClassField, ClassMethod, FunctionType, Primitive, Ty};

/// Pass 3. Fills the field and method lists of each class type from the
/// declarations directly inside the class body. Member types stay empty
/// until type references resolve in pass 4.
pub(super) fn populate_class_types<'a>(
    module: &Module<'a>,
    _ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) {
    // Classes can nest inside functions and other classes; walk everything.
    populate_walk(module.body, analysis);
}

fn populate_walk<'a>(expr: &'a Expr<'a>, analysis: &mut Analysis) {
    if let ExprKind::Class(class) = &expr.kind {
        populate_one_class(class, analysis);
    }
    for_each_child(expr, |child| populate_walk(child, analysis));
}

fn populate_one_class<'a>(class: &ClassDef<'a>, analysis: &mut Analysis) {
    let Some(class_id) = class.class_id.get() else {
        return;
    };
    {
        let class_type = analysis.types.class(class_id);
        if !class_type.fields.is_empty() || !class_type.methods.is_empty() {
            return;
        }
    }

    let ExprKind::Compound(body) = &class.body.kind else {
        unreachable!("class body is always a compound expression");
    };

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    for stmt in body.stmts {
        // A field may be declared bare (`x:int;`) or with an initializer
        // (`x:int = 0;`); in the latter case the decl is the lhs of '='.
        let head = match &stmt.kind {
            ExprKind::Binary(binary) => binary.lhs.get(),
            _ => stmt,
        };
        match &head.kind {
            ExprKind::VariableDecl(decl) => fields.push(ClassField {
                name: decl.name,
                ty: None,
                ordinal: fields.len() as u32,
            }),
            ExprKind::FuncDef(func) => methods.push(ClassMethod {
                name: func.name,
                ty: None,
            }),
            _ => {}
        }
    }

    let class_type = analysis.types.class_mut(class_id);
    class_type.fields = fields;
    class_type.methods = methods;
}

/// Pass 4. Resolves every named type reference: primitive keywords first,
/// then a recursive symbol search that must land on a type symbol. Also
/// propagates the resolved types onto declaration symbols, function types
/// and class members, which is where later passes read them from.
pub(super) fn resolve_type_refs<'a>(
    module: &Module<'a>,
    _ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) {
    let mut stack = Vec::new();
    resolve_walk(module.body, &mut stack, analysis);
}

fn resolve_walk<'a>(expr: &'a Expr<'a>, stack: &mut Vec<ScopeId>, analysis: &mut Analysis) {
    match &expr.kind {
        ExprKind::Compound(compound) => {
            stack.push(compound.scope);
            for stmt in compound.stmts {
                resolve_walk(stmt, stack, analysis);
            }
            stack.pop();
        }
        ExprKind::VariableDecl(decl) => {
            resolve_type_ref(&decl.type_ref, stack, analysis);
            if let (Some(symbol), Some(ty)) = (decl.symbol.get(), decl.type_ref.resolved()) {
                analysis.scopes.symbol_mut(symbol).ty = Some(ty);
            }
        }
        ExprKind::Cast(cast) => {
            resolve_type_ref(&cast.target, stack, analysis);
            resolve_walk(cast.value, stack, analysis);
        }
        ExprKind::FuncDef(func) => {
            resolve_type_ref(&func.return_type_ref, stack, analysis);
            for param in func.parameters {
                resolve_type_ref(&param.type_ref, stack, analysis);
                if let (Some(symbol), Some(ty)) =
                    (param.symbol.get(), param.type_ref.resolved())
                {
                    analysis.scopes.symbol_mut(symbol).ty = Some(ty);
                }
            }

            if func.func_ty.get().is_none() {
                let return_ty = func.return_type_ref.resolved();
                let param_tys: Vec<_> = func
                    .parameters
                    .iter()
                    .map(|p| p.type_ref.resolved())
                    .collect();
                if let (Some(return_ty), true) = (return_ty, param_tys.iter().all(Option::is_some))
                {
                    let func_ty = analysis.types.add_function(FunctionType {
                        return_ty,
                        param_tys: param_tys.into_iter().flatten().collect(),
                    });
                    func.func_ty.set(Some(func_ty));
                    if let Some(symbol) = func.symbol.get() {
                        analysis.scopes.symbol_mut(symbol).ty = Some(Ty::Function(func_ty));
                    }
                }
            }

            stack.push(func.parameter_scope);
            resolve_walk(func.body, stack, analysis);
            stack.pop();
        }
        ExprKind::Class(class) => {
            resolve_walk(class.body, stack, analysis);
            fill_class_member_types(class, analysis);
        }
        _ => for_each_child(expr, |child| resolve_walk(child, stack, analysis)),
    }
}

fn resolve_type_ref(type_ref: &TypeRef, stack: &[ScopeId], analysis: &mut Analysis) {
    if type_ref.resolved().is_some() {
        return;
    }
    let Some(name) = type_ref.name else {
        return;
    };

    let text = analysis.interner.resolve(name);
    if let Some(primitive) = Primitive::from_keyword(text) {
        type_ref.resolve(Ty::Primitive(primitive));
        return;
    }

    let top = *stack
        .last()
        .expect("type resolution reached a reference outside any scope");
    match analysis.scopes.recursive_find_symbol(top, name) {
        None => {
            analysis.errors.error(
                ErrorKind::TypeNotDefined,
                type_ref.span,
                format!(
                    "Type '{}' was not defined in an accessible scope.",
                    analysis.interner.resolve(name)
                ),
            );
        }
        Some(symbol_id) => {
            let symbol = analysis.scopes.symbol(symbol_id);
            if symbol.kind != SymbolKind::Type {
                analysis.errors.error(
                    ErrorKind::SymbolIsNotAType,
                    type_ref.span,
                    format!("Symbol '{}' is not a type.", analysis.interner.resolve(name)),
                );
            } else {
                let ty = symbol
                    .ty
                    .expect("type symbols carry their type from creation");
                type_ref.resolve(ty);
            }
        }
    }
}

/// After the body's type references resolve, the member types are simply
/// the types of the instance-scope symbols of the same names.
fn fill_class_member_types<'a>(class: &ClassDef<'a>, analysis: &mut Analysis) {
    let Some(class_id) = class.class_id.get() else {
        return;
    };
    let ExprKind::Compound(body) = &class.body.kind else {
        unreachable!("class body is always a compound expression");
    };

    let member_names: Vec<_> = {
        let class_type = analysis.types.class(class_id);
        class_type
            .fields
            .iter()
            .map(|f| f.name)
            .chain(class_type.methods.iter().map(|m| m.name))
            .collect()
    };
    let field_count = analysis.types.class(class_id).fields.len();

    for (index, name) in member_names.into_iter().enumerate() {
        let ty = analysis
            .scopes
            .find_symbol(body.scope, name)
            .and_then(|sid| analysis.scopes.symbol(sid).ty);
        let class_type = analysis.types.class_mut(class_id);
        if index < field_count {
            class_type.fields[index].ty = ty;
        } else {
            class_type.methods[index - field_count].ty = ty;
        }
    }
}

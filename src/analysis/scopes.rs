//! Passes 1 and 2: wire every scope to its lexical parent, then populate
//! the symbol tables from declarations.

use super::Analysis;
use crate::arena_ctx::AstContext;
use crate::ast::walk::for_each_child;
use crate::ast::{Expr, ExprKind, Module};
use crate::error::ErrorKind;
use crate::scope::{ScopeId, SymbolKind};
use crate::types::Ty;

/// Pass 1. Mirrors lexical nesting onto the scope graph: compound scopes
/// and function parameter scopes point at the scope enclosing them; the
/// module's global scope keeps no parent.
pub(super) fn set_scope_parents<'a>(
    module: &Module<'a>,
    _ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) {
    let mut stack = Vec::new();
    parent_walk(module.body, &mut stack, analysis);
}

fn parent_walk<'a>(expr: &'a Expr<'a>, stack: &mut Vec<ScopeId>, analysis: &mut Analysis) {
    match &expr.kind {
        ExprKind::Compound(compound) => {
            if let Some(&top) = stack.last() {
                analysis.scopes.set_parent(compound.scope, top);
            }
            stack.push(compound.scope);
            for stmt in compound.stmts {
                parent_walk(stmt, stack, analysis);
            }
            stack.pop();
        }
        ExprKind::FuncDef(func) => {
            if let Some(&top) = stack.last() {
                analysis.scopes.set_parent(func.parameter_scope, top);
            }
            stack.push(func.parameter_scope);
            parent_walk(func.body, stack, analysis);
            stack.pop();
        }
        _ => for_each_child(expr, |child| parent_walk(child, stack, analysis)),
    }
}

/// Pass 2. Creates a symbol for every declaration and attaches it to both
/// the declaring node and the enclosing scope. Duplicate names within one
/// scope are a compile error, never a panic.
pub(super) fn populate_symbol_tables<'a>(
    module: &Module<'a>,
    _ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) {
    let mut stack = Vec::new();
    populate_walk(module.body, &mut stack, analysis);
}

fn populate_walk<'a>(expr: &'a Expr<'a>, stack: &mut Vec<ScopeId>, analysis: &mut Analysis) {
    match &expr.kind {
        ExprKind::Compound(compound) => {
            stack.push(compound.scope);
            for stmt in compound.stmts {
                populate_walk(stmt, stack, analysis);
            }
            stack.pop();
        }
        ExprKind::VariableDecl(decl) => {
            if decl.symbol.get().is_some() {
                return;
            }
            let top = top_scope(stack);
            if analysis.scopes.find_symbol(top, decl.name).is_some() {
                analysis.errors.error(
                    ErrorKind::SymbolAlreadyDefinedInScope,
                    expr.span,
                    format!(
                        "Symbol '{}' was previously defined in the current scope",
                        analysis.interner.resolve(decl.name)
                    ),
                );
            } else {
                let symbol = analysis.scopes.add_symbol(
                    top,
                    decl.name,
                    SymbolKind::Variable,
                    analysis.interner,
                );
                decl.symbol.set(Some(symbol));
            }
        }
        ExprKind::FuncDef(func) => {
            let top = top_scope(stack);
            if func.symbol.get().is_none() {
                if analysis.scopes.find_symbol(top, func.name).is_some() {
                    analysis.errors.error(
                        ErrorKind::SymbolAlreadyDefinedInScope,
                        expr.span,
                        format!(
                            "Symbol '{}' was previously defined in the current scope",
                            analysis.interner.resolve(func.name)
                        ),
                    );
                } else {
                    let symbol = analysis.scopes.add_symbol(
                        top,
                        func.name,
                        SymbolKind::Function,
                        analysis.interner,
                    );
                    func.symbol.set(Some(symbol));

                    for param in func.parameters {
                        if analysis
                            .scopes
                            .find_symbol(func.parameter_scope, param.name)
                            .is_some()
                        {
                            analysis.errors.error(
                                ErrorKind::SymbolAlreadyDefinedInScope,
                                param.span,
                                format!(
                                    "Duplicate parameter name '{}'",
                                    analysis.interner.resolve(param.name)
                                ),
                            );
                        } else {
                            let param_symbol = analysis.scopes.add_symbol(
                                func.parameter_scope,
                                param.name,
                                SymbolKind::Variable,
                                analysis.interner,
                            );
                            param.symbol.set(Some(param_symbol));
                        }
                    }
                }
            }
            stack.push(func.parameter_scope);
            populate_walk(func.body, stack, analysis);
            stack.pop();
        }
        ExprKind::Class(class) => {
            if class.class_id.get().is_none() {
                let top = top_scope(stack);
                if analysis.scopes.find_symbol(top, class.name).is_some() {
                    analysis.errors.error(
                        ErrorKind::SymbolAlreadyDefinedInScope,
                        expr.span,
                        format!(
                            "Symbol '{}' was previously defined in the current scope",
                            analysis.interner.resolve(class.name)
                        ),
                    );
                } else {
                    let class_id = analysis.types.add_class(class.name);
                    class.class_id.set(Some(class_id));
                    let symbol = analysis.scopes.add_symbol(
                        top,
                        class.name,
                        SymbolKind::Type,
                        analysis.interner,
                    );
                    analysis.scopes.symbol_mut(symbol).ty = Some(Ty::Class(class_id));
                }
            }
            populate_walk(class.body, stack, analysis);
        }
        _ => for_each_child(expr, |child| populate_walk(child, stack, analysis)),
    }
}

fn top_scope(stack: &[ScopeId]) -> ScopeId {
    *stack
        .last()
        .expect("symbol population reached a declaration outside any scope")
}

//! Pass 5: connect every variable reference to its symbol.
//!
//! Besides plain lookup this pass enforces declare-before-use for locals.
//! The set of already-visited local symbols grows as the walk proceeds in
//! source order; a read of a local not yet in the set is an error. A
//! declaration that is the left side of `=` defines its name for *writes*
//! immediately but for *reads* only after its initializer, so
//! `x:int = x + 1` is rejected.

use std::collections::HashSet;

use super::Analysis;
use crate::arena_ctx::AstContext;
use crate::ast::walk::for_each_child;
use crate::ast::{BinaryOp, Expr, ExprKind, Module, VariableAccess};
use crate::error::ErrorKind;
use crate::scope::{ScopeId, StorageKind, SymbolId, SymbolKind};
use crate::suggest::find_similar;

pub(super) fn resolve_symbol_refs<'a>(
    module: &Module<'a>,
    _ctx: &AstContext<'a>,
    analysis: &mut Analysis,
) {
    let mut stack = Vec::new();
    let mut defined = HashSet::new();
    resolve_walk(module.body, &mut stack, &mut defined, analysis);
}

fn resolve_walk<'a>(
    expr: &'a Expr<'a>,
    stack: &mut Vec<ScopeId>,
    defined: &mut HashSet<SymbolId>,
    analysis: &mut Analysis,
) {
    match &expr.kind {
        ExprKind::Compound(compound) => {
            stack.push(compound.scope);
            for stmt in compound.stmts {
                resolve_walk(stmt, stack, defined, analysis);
            }
            stack.pop();
        }
        ExprKind::FuncDef(func) => {
            // Parameters are defined on entry; the body may read them from
            // its first statement on.
            for param in func.parameters {
                if let Some(symbol) = param.symbol.get() {
                    defined.insert(symbol);
                }
            }
            stack.push(func.parameter_scope);
            resolve_walk(func.body, stack, defined, analysis);
            stack.pop();
        }
        ExprKind::Binary(binary)
            if binary.op == BinaryOp::Assign
                && matches!(binary.lhs.get().kind, ExprKind::VariableDecl(_)) =>
        {
            // Initializer first: the declared name only counts as defined
            // for reads once its initializing assignment is done.
            resolve_walk(binary.rhs.get(), stack, defined, analysis);
            resolve_walk(binary.lhs.get(), stack, defined, analysis);
        }
        ExprKind::VariableDecl(decl) => {
            if let Some(symbol) = decl.symbol.get() {
                if analysis.scopes.symbol(symbol).storage == StorageKind::Local {
                    defined.insert(symbol);
                }
            }
        }
        ExprKind::VariableRef(var_ref) => {
            if var_ref.symbol.get().is_some() {
                return;
            }
            let top = *stack
                .last()
                .expect("symbol resolution reached a reference outside any scope");
            match analysis.scopes.recursive_find_symbol(top, var_ref.name) {
                None => {
                    let name = analysis.interner.resolve(var_ref.name);
                    let mut message =
                        format!("Variable '{}' was not defined in this scope.", name);
                    let visible = analysis.scopes.visible_names(top);
                    let candidates: Vec<&str> = visible
                        .iter()
                        .map(|&n| analysis.interner.resolve(n))
                        .collect();
                    if let Some(suggestion) = find_similar(name, &candidates, 2) {
                        message.push_str(&format!(" Did you mean '{}'?", suggestion));
                    }
                    analysis
                        .errors
                        .error(ErrorKind::VariableNotDefined, expr.span, message);
                }
                Some(symbol_id) => {
                    let symbol = analysis.scopes.symbol(symbol_id);
                    let read_before_definition = symbol.kind == SymbolKind::Variable
                        && symbol.storage == StorageKind::Local
                        && var_ref.access.get() == VariableAccess::Read
                        && !defined.contains(&symbol_id);
                    if read_before_definition {
                        analysis.errors.error(
                            ErrorKind::VariableUsedBeforeDefinition,
                            expr.span,
                            format!(
                                "Variable '{}' used before its definition.",
                                analysis.interner.resolve(var_ref.name)
                            ),
                        );
                    } else {
                        var_ref.symbol.set(Some(symbol_id));
                    }
                }
            }
        }
        _ => for_each_child(expr, |child| resolve_walk(child, stack, defined, analysis)),
    }
}

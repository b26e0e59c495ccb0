//! The semantic pipeline: ordered passes that annotate the tree the parser
//! built. Symbol resolution and typing cannot happen at parse time (a name
//! can be used textually before the thing it refers to is known), so each
//! pass fills in one family of slots and the next pass builds on it.
//!
//! Order matters. Every pass assumes the previous ones succeeded, which is
//! also why the pipeline stops at the first pass boundary with errors.

mod casts;
mod checks;
mod resolve;
mod scopes;
mod types;

use crate::arena_ctx::AstContext;
use crate::ast::Module;
use crate::error::ErrorStream;
use crate::intern::Interner;
use crate::scope::ScopeArena;
use crate::types::TypeTable;

/// Everything the passes read and write besides the tree itself.
pub struct Analysis<'w> {
    pub scopes: &'w mut ScopeArena,
    pub types: &'w mut TypeTable,
    pub interner: &'w mut Interner,
    pub errors: &'w ErrorStream,
}

type Pass = for<'a, 'w> fn(&Module<'a>, &AstContext<'a>, &mut Analysis<'w>);

/// Runs the full pipeline over `module`. Idempotent on an already-annotated
/// tree: every pass skips slots that are already filled.
pub fn run<'a>(module: &Module<'a>, ctx: &AstContext<'a>, analysis: &mut Analysis) {
    const PASSES: &[Pass] = &[
        scopes::set_scope_parents,
        scopes::populate_symbol_tables,
        types::populate_class_types,
        types::resolve_type_refs,
        resolve::resolve_symbol_refs,
        casts::add_implicit_casts,
        checks::mark_dot_writes,
        checks::check_binary_exprs,
        checks::check_explicit_casts,
    ];

    for pass in PASSES {
        pass(module, ctx, analysis);
        if analysis.errors.has_errors() {
            break;
        }
    }
}

//! The compilation pipeline: source text → tokens → tree → annotated tree.
//!
//! The caller owns the arenas (see [`crate::ast_context!`]) and the
//! interner; everything else — scopes, symbols, types, diagnostics — is
//! created here and either returned inside the [`Compilation`] or as the
//! error list. There is no usable tree on failure.

use crate::analysis::{self, Analysis};
use crate::arena_ctx::AstContext;
use crate::ast::Module;
use crate::error::{Diagnostic, ErrorStream};
use crate::formatter;
use crate::intern::Interner;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::scope::ScopeArena;
use crate::types::TypeTable;

/// A successful compilation: the annotated module plus the tables its
/// annotations point into.
pub struct Compilation<'a> {
    pub module: Module<'a>,
    pub scopes: ScopeArena,
    pub types: TypeTable,
}

impl<'a> Compilation<'a> {
    pub fn pretty_print(&self, interner: &Interner) -> String {
        formatter::pretty_print(&self.module, &self.scopes, &self.types, interner)
    }
}

/// Runs the whole front-end over `source`. Zero diagnostics and a fully
/// annotated tree, or every diagnostic accumulated up to the pass boundary
/// that failed.
pub fn compile<'a>(
    ctx: &'a AstContext<'a>,
    interner: &mut Interner,
    input_name: &str,
    source: &str,
) -> Result<Compilation<'a>, Vec<Diagnostic>> {
    let errors = ErrorStream::new();
    let mut scopes = ScopeArena::new();
    let mut types = TypeTable::new();

    let parsed = {
        let lexer = Lexer::new(input_name, source, interner, &errors);
        let mut parser = Parser::new(lexer, ctx, &mut scopes, &errors);
        parser.parse_module()
    };
    let module = match parsed {
        Ok(module) if !errors.has_errors() => module,
        _ => return Err(errors.into_diagnostics()),
    };

    {
        let mut analysis = Analysis {
            scopes: &mut scopes,
            types: &mut types,
            interner,
            errors: &errors,
        };
        analysis::run(&module, ctx, &mut analysis);
    }
    if errors.has_errors() {
        return Err(errors.into_diagnostics());
    }

    Ok(Compilation {
        module,
        scopes,
        types,
    })
}

/// Parse without semantic analysis. Used by tooling and tests that inspect
/// or pretty-print the raw tree.
pub fn parse<'a>(
    ctx: &'a AstContext<'a>,
    interner: &mut Interner,
    input_name: &str,
    source: &str,
) -> Result<(Module<'a>, ScopeArena), Vec<Diagnostic>> {
    let errors = ErrorStream::new();
    let mut scopes = ScopeArena::new();

    let parsed = {
        let lexer = Lexer::new(input_name, source, interner, &errors);
        let mut parser = Parser::new(lexer, ctx, &mut scopes, &errors);
        parser.parse_module()
    };
    match parsed {
        Ok(module) if !errors.has_errors() => Ok((module, scopes)),
        _ => Err(errors.into_diagnostics()),
    }
}

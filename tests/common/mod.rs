//! Shared plumbing for the integration tests: owns the arena/interner setup
//! so individual tests read like the scenarios they check.

use tarn::compile::Compilation;
use tarn::error::{Diagnostic, ErrorKind};
use tarn::intern::Interner;

/// Compiles `source` and hands the result to `check`. Panics if any
/// diagnostic is produced.
pub fn with_compiled(source: &str, check: impl FnOnce(&Compilation, &Interner)) {
    tarn::ast_context!(ctx);
    let mut interner = Interner::new();
    match tarn::compile(&ctx, &mut interner, "test", source) {
        Ok(compilation) => check(&compilation, &interner),
        Err(diagnostics) => panic!(
            "expected {:?} to compile cleanly, got {:#?}",
            source, diagnostics
        ),
    }
}

/// Compiles `source` expecting failure and returns the diagnostics.
pub fn compile_errors(source: &str) -> Vec<Diagnostic> {
    tarn::ast_context!(ctx);
    let mut interner = Interner::new();
    match tarn::compile(&ctx, &mut interner, "test", source) {
        Ok(_) => panic!("expected {:?} to fail, but it compiled", source),
        Err(diagnostics) => diagnostics,
    }
}

pub fn error_kinds(source: &str) -> Vec<ErrorKind> {
    compile_errors(source).into_iter().map(|d| d.kind).collect()
}

/// Pretty-print of a successful compile.
pub fn pretty(source: &str) -> String {
    let mut result = String::new();
    with_compiled(source, |compilation, interner| {
        result = compilation.pretty_print(interner);
    });
    result
}

//! Property-style guarantees: the lexer terminates on any input, the
//! front-end is deterministic, and the semantic passes are idempotent.

use proptest::prelude::*;

use tarn::analysis::{self, Analysis};
use tarn::error::ErrorStream;
use tarn::intern::Interner;
use tarn::lexer::Lexer;
use tarn::token::TokenKind;

/// Soup of the characters the grammar cares about, plus comment openers
/// and a few identifiers, to exercise interesting lexer/parser paths.
fn token_soup() -> impl Strategy<Value = String> {
    proptest::string::string_regex(
        "[-+*/(){};:.!<>=&|#?_, \n0-9a-z]{0,120}",
    )
    .expect("valid regex")
}

proptest! {
    #[test]
    fn lexing_is_total_on_arbitrary_input(source in "\\PC{0,120}") {
        let mut interner = Interner::new();
        let errors = ErrorStream::new();
        let mut lexer = Lexer::new("prop", &source, &mut interner, &errors);
        // Every input reaches END_OF_INPUT within a bounded number of
        // tokens: each non-EOF token consumes at least one character.
        let mut remaining = source.chars().count() + 2;
        while lexer.next_token().kind != TokenKind::EndOfInput {
            remaining -= 1;
            prop_assert!(remaining > 0, "lexer failed to make progress");
        }
    }

    #[test]
    fn lexing_is_total_on_token_soup(source in token_soup()) {
        let mut interner = Interner::new();
        let errors = ErrorStream::new();
        let mut lexer = Lexer::new("prop", &source, &mut interner, &errors);
        let mut remaining = source.chars().count() + 2;
        while lexer.next_token().kind != TokenKind::EndOfInput {
            remaining -= 1;
            prop_assert!(remaining > 0, "lexer failed to make progress");
        }
    }

    #[test]
    fn compilation_is_deterministic(source in token_soup()) {
        let first = outcome(&source);
        let second = outcome(&source);
        prop_assert_eq!(first, second);
    }
}

/// Pretty dump on success, diagnostic kinds and spans on failure.
fn outcome(source: &str) -> Result<String, Vec<String>> {
    tarn::ast_context!(ctx);
    let mut interner = Interner::new();
    match tarn::compile(&ctx, &mut interner, "prop", source) {
        Ok(compilation) => Ok(compilation.pretty_print(&interner)),
        Err(diagnostics) => Err(diagnostics
            .into_iter()
            .map(|d| format!("{:?}@{:?}", d.kind, d.span))
            .collect()),
    }
}

const PASS_CORPUS: &[&str] = &[
    "1 + 2 * 3;",
    "x:int = 5; x + 1.5;",
    "if(1) 2 else 3.0;",
    "b:bool = true; while(b) b = !b;",
    "func add:int(a:int, b:int) a + b; add(1, 2);",
    "class Point { x:int; y:float; } p:Point; p.x = 2; p.y + 1.5;",
    "assert((? true; 1; 2) == 1);",
    "{ n:int = 3; { n + 1; }; };",
];

/// Running the full pass pipeline a second time over an already-annotated
/// tree must change nothing and report nothing.
#[test]
fn semantic_passes_are_idempotent() {
    for source in PASS_CORPUS {
        tarn::ast_context!(ctx);
        let mut interner = Interner::new();
        let mut compilation = tarn::compile(&ctx, &mut interner, "test", source)
            .unwrap_or_else(|diags| panic!("corpus entry {:?} failed: {:#?}", source, diags));
        let before = compilation.pretty_print(&interner);

        let errors = ErrorStream::new();
        {
            let mut analysis = Analysis {
                scopes: &mut compilation.scopes,
                types: &mut compilation.types,
                interner: &mut interner,
                errors: &errors,
            };
            analysis::run(&compilation.module, &ctx, &mut analysis);
        }
        assert_eq!(
            errors.error_count(),
            0,
            "second pipeline run over {:?} reported errors",
            source
        );
        assert_eq!(
            compilation.pretty_print(&interner),
            before,
            "second pipeline run over {:?} changed the tree",
            source
        );
    }
}

/// The whole corpus stays fully annotated after a rerun.
#[test]
fn rerun_keeps_every_node_typed() {
    for source in PASS_CORPUS {
        tarn::ast_context!(ctx);
        let mut interner = Interner::new();
        let compilation = tarn::compile(&ctx, &mut interner, "test", source).unwrap();
        tarn::ast::walk::walk_all(compilation.module.body, &mut |expr| {
            assert!(expr.ty().is_some(), "untyped node in {:?}", source);
        });
    }
}

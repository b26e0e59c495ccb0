//! File-driven front door, behind the `cli` feature: compile a source
//! file, report diagnostics with source excerpts, optionally dump the
//! annotated tree.

use std::path::PathBuf;

use clap::Parser;

use crate::intern::Interner;

#[derive(Parser, Debug)]
#[command(name = "tarnc", about = "Tarn front-end driver", version)]
pub struct Args {
    /// Source file to compile.
    pub file: PathBuf,

    /// Print the annotated syntax tree after a successful compile.
    #[arg(long)]
    pub ast: bool,
}

/// Returns the process exit code: 0 on success, 1 on diagnostics, 2 when
/// the file cannot be read.
pub fn run(args: &Args) -> u8 {
    let source = match std::fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("tarnc: {}: {}", args.file.display(), err);
            return 2;
        }
    };
    let input_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    crate::ast_context!(ctx);
    let mut interner = Interner::new();
    match crate::compile(&ctx, &mut interner, &input_name, &source) {
        Ok(compilation) => {
            if args.ast {
                print!("{}", compilation.pretty_print(&interner));
            }
            0
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                eprintln!("{}\n", diagnostic.display_with_source(&source));
            }
            eprintln!("{}: {} error(s)", input_name, diagnostics.len());
            1
        }
    }
}

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = tarn::cli::Args::parse();
    ExitCode::from(tarn::cli::run(&args))
}

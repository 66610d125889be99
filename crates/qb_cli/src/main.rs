use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser as ArgParser;
use log::debug;

use qb_interpreter::Evaluator;
use qb_parser::{Mode, Parser};

mod repl;

#[derive(ArgParser)]
#[command(name = "qutix")]
#[command(about = "QutixBrain language interpreter")]
#[command(version)]
struct Args {
    /// QutixBrain source file (.qbit); starts the interactive REPL when omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Report syntax errors and undefined variables instead of skipping them
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mode = if args.strict {
        Mode::Strict
    } else {
        Mode::Lenient
    };

    match args.file {
        Some(file) => run_file(&file, mode),
        None => repl::repl(mode),
    }
}

fn run_file(path: &Path, mode: Mode) -> Result<()> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("qbit") {
        bail!(
            "invalid file extension: QutixBrain files must end in .qbit (got '{}')",
            path.display()
        );
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("cannot open QutixBrain file '{}'", path.display()))?;

    let program = match Parser::with_mode(mode).parse_program(&source) {
        Ok(program) => program,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error);
            }
            bail!("{} syntax error(s) in '{}'", errors.len(), path.display());
        }
    };
    debug!("parsed {} statement(s)", program.statements.len());

    let stdout = io::stdout();
    let mut evaluator = Evaluator::with_mode(stdout.lock(), mode);
    evaluator.eval(&program)?;

    Ok(())
}

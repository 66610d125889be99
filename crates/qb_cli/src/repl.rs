use std::io;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::Editor;

use qb_interpreter::Evaluator;
use qb_parser::{Mode, Parser};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn repl(mode: Mode) -> Result<()> {
    println!("QutixBrain v{}", VERSION);

    let parser = Parser::with_mode(mode);
    // One environment for the whole session; errors keep the session alive
    let mut evaluator = Evaluator::with_mode(io::stdout(), mode);

    // `()` can be used when no completer is required
    let mut rl = Editor::<()>::new();
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                if line.trim() == "exit" || line.trim() == "quit" {
                    break;
                }
                // Skip empty lines
                else if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(line.as_str());

                match parser.parse_line(&line) {
                    Ok(Some(statement)) => {
                        if let Err(error) = evaluator.eval_statement(&statement) {
                            println!("Error: {}", error);
                        }
                    }
                    Ok(None) => {}
                    Err(error) => println!("Error: {}", error),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

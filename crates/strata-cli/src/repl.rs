//! The interactive loop.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use strata_engine::Database;

use crate::commands::{self, Command};

/// The prompt shown when waiting for input.
const PROMPT: &str = "strata> ";

/// Runs the read-eval-print loop until `exit` or end-of-input.
pub fn run(db: &Database) -> Result<()> {
    println!("StrataDB shell. Type 'exit' to quit.");
    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match commands::parse(line) {
                    Ok(Command::Exit) => break,
                    Ok(command) => match commands::execute(db, command) {
                        Ok(output) => println!("{output}"),
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(e) => println!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                debug!("input closed, leaving shell");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

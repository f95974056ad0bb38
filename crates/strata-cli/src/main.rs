//! StrataDB command shell.
//!
//! A line-oriented dispatcher over the table engine, for demos and
//! ad-hoc poking. Recognized verbs:
//!
//! ```text
//! CREATE TABLE <name> ( <col> <TYPE> [SUM|LAST] [INDEXED], ... )
//! INSERT INTO <name> VALUES ( v1, v2, ... )
//! SELECT * FROM <name>
//! QUERY <name> <column> <value>
//! exit
//! ```
//!
//! Integer literals are bare digits; string literals are double-quoted.
//! Parentheses and commas may be attached to tokens or stand alone.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use strata_engine::Database;

mod commands;
mod repl;

/// StrataDB interactive shell
#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Interactive shell for StrataDB")]
struct Args {
    /// Directory where table log files are kept
    #[arg(short = 'd', long, default_value = ".", env = "STRATA_DATA_DIR")]
    data_dir: PathBuf,

    /// Execute a single command and exit
    #[arg(short = 'c', long)]
    command: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let db = Database::new(&args.data_dir);

    match args.command {
        Some(line) => {
            match commands::parse(&line)? {
                commands::Command::Exit => {}
                command => println!("{}", commands::execute(&db, command)?),
            }
            Ok(())
        }
        None => repl::run(&db),
    }
}

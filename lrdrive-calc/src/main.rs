//! Command-line interface for lrdrive-calc.
//!
//! `lrdrive-calc parse` evaluates a calculator program from a file or from
//! standard input, printing one line per statement and every diagnostic.
//! `lrdrive-calc tables` dumps the parse tables.

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use lrdrive_calc::{CalcParser, SymTab};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluates a program
    Parse {
        /// Input file with calculator statements; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print parser statistics
        #[arg(long)]
        stats: bool,

        /// Maximum parser stack depth
        #[arg(long, default_value_t = lrdrive::DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },
    /// Prints the grammar's rules and automaton
    Tables,
}

fn read_source(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("can't read standard input")?;
            Ok(source)
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Parse {
            input,
            stats,
            max_depth,
        } => {
            let source = read_source(input.as_ref())?;
            let parser = CalcParser::try_new()
                .context("can't create parser")?
                .with_max_depth(max_depth);
            let mut symtab = SymTab::new();
            let eval = parser.evaluate(&source, &mut symtab);

            for statement in &eval.statements {
                match statement.value {
                    Some(value) => println!("{}: {value}", statement.span),
                    None => println!("{}: skipped", statement.span),
                }
            }
            for diagnostic in &eval.diagnostics {
                eprintln!("error: {diagnostic}");
            }
            for error in &eval.errors {
                eprintln!("error: {error}");
            }
            if let Err(err) = &eval.outcome {
                eprintln!("fatal: {err}");
            }
            if stats {
                eprintln!("{:#?}", eval.stats);
                for (name, value) in symtab.iter() {
                    eprintln!("{name} = {value}");
                }
            }
            Ok(if eval.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Tables => {
            let parser = CalcParser::try_new().context("can't create parser")?;
            print!("{}", parser.tables());
            Ok(ExitCode::SUCCESS)
        }
    }
}

//! Answers range-count queries read from a file or stdin.
//!
//! See [`avl_ost::protocol`] for the request format. Every answer is printed
//! followed by a single space, and the output ends with a newline.

use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::{fs, process};

use anyhow::Context;
use avl_ost::{AvlTree, protocol};
use clap::{ArgAction, Parser};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    /// File to read requests from. Reads stdin when omitted.
    input: Option<PathBuf>,
    /// Enables verbose logging. Repeat for more detail; `RUST_LOG` takes precedence.
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let input = match &args.input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).context("failed to read stdin")?;
            input
        }
    };
    tracing::info!(bytes = input.len(), "read requests");

    let mut tree = AvlTree::new();
    let answers = protocol::replay(&mut tree, protocol::requests::<i64>(&input)).context("malformed request")?;

    let mut out = BufWriter::new(io::stdout().lock());
    write_answers(&mut out, &answers)?;
    out.flush()?;

    tracing::info!(keys = tree.len(), height = tree.height(), "done");
    Ok(())
}

/// Writes every answer followed by a space, then a newline.
fn write_answers(out: &mut impl Write, answers: &[usize]) -> io::Result<()> {
    for answer in answers {
        write!(out, "{answer} ")?;
    }
    writeln!(out)
}

fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity_level(verbosity).as_str()));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Maps the number of `--verbose` flags to a log level.
fn verbosity_level(num: u8) -> Level {
    match num {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        3.. => Level::TRACE,
    }
}

//! Command line entry of the maidata diff tool.
//!
//! Usage:
//!   maidata-diff --lv <LEVEL> --txt1 <PATH> --txt2 <PATH>
//!   maidata-diff <LEVEL> <PATH1> <PATH2>
//!   maidata-diff            (asks for each value on stdin)

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{CommandFactory, Parser};
use thiserror::Error;

use maidata_diff::{
    Chart, DiffError,
    chart::{InoteBlock, Level, LevelError, read_chart},
    diff_charts,
    inote::{InoteError, parse_inote},
};

#[derive(Parser, Debug)]
#[command(name = "maidata-diff", version)]
#[command(about = "Maidata diff tool", long_about = None)]
#[command(
    after_help = "diff output format: 'note1': bpm-<bpm>, delay-<delay>\n                   'note2': bpm-<bpm>, delay-<delay>"
)]
struct Args {
    /// inote level (2-7)
    #[arg(long = "lv", value_name = "LEVEL")]
    level: Option<Level>,

    /// Path to txt 1
    #[arg(long, value_name = "PATH")]
    txt1: Option<PathBuf>,

    /// Path to txt 2
    #[arg(long, value_name = "PATH")]
    txt2: Option<PathBuf>,

    /// Positional args: level path1 path2
    #[arg(value_name = "ARGS", num_args = 0..=3)]
    positional: Vec<String>,
}

#[derive(Debug, Error)]
enum ArgsError {
    #[error("invalid args")]
    Invalid,
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("txt{0} not exist")]
    NotExist(u8),
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// A validated run request.
struct Invocation {
    level: Level,
    txt1: PathBuf,
    txt2: PathBuf,
}

impl Args {
    fn resolve(self) -> Result<Invocation, ArgsError> {
        let (level, txt1, txt2) = match (self.level, self.txt1, self.txt2) {
            (Some(level), Some(txt1), Some(txt2)) => (level, txt1, txt2),
            (level, txt1, txt2) => match self.positional.as_slice() {
                [level, txt1, txt2] => (level.parse()?, txt1.into(), txt2.into()),
                [] if level.is_none() && txt1.is_none() && txt2.is_none() => prompt_all()?,
                _ => return Err(ArgsError::Invalid),
            },
        };
        if !txt1.exists() {
            return Err(ArgsError::NotExist(1));
        }
        if !txt2.exists() {
            return Err(ArgsError::NotExist(2));
        }
        Ok(Invocation { level, txt1, txt2 })
    }
}

fn prompt_all() -> Result<(Level, PathBuf, PathBuf), ArgsError> {
    println!("Please provide the following parameters:");
    let mut input = io::stdin().lock();
    let level = prompt(&mut input, "Enter inote level (2-7): ")?.parse()?;
    let txt1 = prompt(&mut input, "Enter path to txt file 1: ")?;
    let txt2 = prompt(&mut input, "Enter path to txt file 2: ")?;
    Ok((level, unquote(&txt1).into(), unquote(&txt2).into()))
}

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

/// Strips the quotes a shell adds around dragged-in paths.
fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(path)
}

/// Reads a chart and cuts out the block of `level`, without parsing it.
fn load_block(label: &str, path: &Path, level: Level) -> Result<InoteBlock, DiffError> {
    read_chart(path)
        .and_then(|source| InoteBlock::extract(&source, level))
        .map_err(|source| DiffError::Load {
            label: label.to_owned(),
            source,
        })
}

fn parse(label: &str, path: &Path, block: InoteBlock) -> Result<Chart, DiffError> {
    let output = parse_inote(block.notation()).map_err(|source| {
        emit_error(path, block.notation(), &source);
        DiffError::Parse {
            label: label.to_owned(),
            source,
        }
    })?;
    let chart = Chart {
        label: label.to_owned(),
        block,
        output,
    };
    emit_warnings(path, &chart);
    Ok(chart)
}

#[cfg(feature = "diagnostics")]
fn emit_error(path: &Path, notation: &str, err: &InoteError) {
    let name = path.display().to_string();
    maidata_diff::diagnostics::emit_inote_error(&name, notation, err);
}

#[cfg(not(feature = "diagnostics"))]
fn emit_error(_path: &Path, _notation: &str, _err: &InoteError) {}

#[cfg(feature = "diagnostics")]
fn emit_warnings(path: &Path, chart: &Chart) {
    let name = path.display().to_string();
    maidata_diff::diagnostics::emit_inote_warnings(
        &name,
        chart.block.notation(),
        &chart.output.warnings,
    );
}

#[cfg(not(feature = "diagnostics"))]
fn emit_warnings(path: &Path, chart: &Chart) {
    for warning in &chart.output.warnings {
        eprintln!("warning: {}: {warning}", path.display());
    }
}

/// Both blocks are extracted before either is parsed, so a missing block is reported first.
fn run(invocation: &Invocation) -> Result<(), DiffError> {
    let left_block = load_block("txt1", &invocation.txt1, invocation.level)?;
    let right_block = load_block("txt2", &invocation.txt2, invocation.level)?;
    let left = parse("txt1", &invocation.txt1, left_block)?;
    let right = parse("txt2", &invocation.txt2, right_block)?;
    print!("{}", diff_charts(&left, &right));
    Ok(())
}

fn main() -> ExitCode {
    let invocation = match Args::parse().resolve() {
        Ok(invocation) => invocation,
        Err(ArgsError::Invalid) => {
            eprintln!("args error: invalid args");
            let _ = Args::command().print_help();
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("args error: {err}");
            return ExitCode::FAILURE;
        }
    };
    match run(&invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

//! CLI tool to select rows and columns from CSV files.
//!
//! Usage:
//!   csvcol --rows 1,10- --cols -3 data.csv
//!   csvcol --rowfile rows.txt -o out.csv < data.csv

use clap::Parser;
use csvcol::{AxisSpec, Config, Error, Filters, Input, Result, parse_comment, run};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Select rows and columns from CSV data.
///
/// Ranges are comma-separated 1-indexed positions or ranges, e.g.
/// `-3,5-7,9,11-` selects 1, 2, 3, 5, 6, 7, 9 and everything from 11 on.
/// Row numbers keep counting across input files.
#[derive(Parser)]
#[command(name = "csvcol")]
struct Cli {
    /// CSV files to read, after --csvfile ("-" for stdin)
    files: Vec<String>,

    /// CSV file read before any other ("-" for stdin)
    #[arg(short, long)]
    csvfile: Option<String>,

    /// Rows to output
    #[arg(short, long, allow_hyphen_values = true)]
    rows: Option<String>,

    /// File of row ranges, one fragment per line ("-" for stdin)
    #[arg(long)]
    rowfile: Option<String>,

    /// Columns to output
    #[arg(short = 'k', long, allow_hyphen_values = true)]
    cols: Option<String>,

    /// File of column ranges, one fragment per line ("-" for stdin)
    #[arg(long)]
    colfile: Option<String>,

    /// Skip input lines starting with this character ("" to disable)
    #[arg(long, default_value = "#")]
    commentchar: String,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print informational messages on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print debugging messages on stderr
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let input = |arg: String| Input::parse(&arg);
        Ok(Config {
            comment: parse_comment(&self.commentchar)?,
            csvfile: self.csvfile.map(input),
            files: self.files.into_iter().map(input).collect(),
            rows: AxisSpec::new(self.rows, self.rowfile.map(input)),
            cols: AxisSpec::new(self.cols, self.colfile.map(input)),
            output: self.output,
        })
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

fn execute(config: &Config) -> Result<()> {
    let filters = Filters::build(config)?;
    let output: Box<dyn Write> = match &config.output {
        Some(path) => open_output(path)?,
        None => Box::new(io::stdout().lock()),
    };
    run(config, &filters, output)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let result = cli.into_config().and_then(|config| execute(&config));
    if let Err(e) = result {
        report(&e);
        process::exit(e.kind().exit_code());
    }
}

fn report(e: &Error) {
    eprintln!("csvcol: {e}");
}

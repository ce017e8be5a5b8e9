// jack-analyzer: Jack tokenizer and syntax analyzer

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use jack_analyzer::analyzer::{self, Options};
use jack_analyzer::xml::tree_to_xml;
use jack_analyzer::DEFAULT_MAX_DEPTH;

/// Tokenize and parse Jack classes, writing each parse tree as XML
#[derive(Debug, Parser)]
#[command(name = "jack-analyzer", author, about, version)]
struct Args {
    /// A .jack file, or a directory whose .jack files are all analyzed
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Write outputs here instead of next to each source file
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Also write the token listing as <Name>T.xml
    #[arg(short, long)]
    tokens: bool,

    /// Report a failing file and continue with the rest
    #[arg(short, long)]
    keep_going: bool,

    /// Maximum nesting depth before parsing is abandoned
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print the parse tree of a single file to stdout instead of writing it
    #[arg(long, conflicts_with_all = ["out_dir", "tokens"])]
    stdout: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let options = Options {
        out_dir: args.out_dir,
        emit_tokens: args.tokens,
        keep_going: args.keep_going,
        max_depth: args.max_depth,
    };

    if args.stdout {
        if args.path.is_dir() {
            eprintln!("Error: --stdout needs a single .jack file, not a directory");
            return ExitCode::FAILURE;
        }
        return match analyzer::analyze_file_contents(&args.path, &options) {
            Ok(analysis) => {
                print!("{}", tree_to_xml(&analysis.tree));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}: {}", args.path.display(), e);
                ExitCode::FAILURE
            }
        };
    }

    tracing::trace!("analyzing path={:?}, options={:?}", args.path, options);
    match analyzer::analyze_path(&args.path, &options) {
        Ok(report) => {
            for (path, e) in &report.failures {
                eprintln!("Error: {}: {}", path.display(), e);
            }
            eprintln!(
                "Wrote {} file(s), {} failure(s).",
                report.written.len(),
                report.failures.len()
            );
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

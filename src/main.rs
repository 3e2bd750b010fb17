//! heat2dot CLI
//!
//! Usage:
//!   heat2dot [OPTIONS] [FILE]
//!
//! Reads a Heat template (JSON or YAML) from FILE or stdin and writes a DOT
//! graph to stdout. Diagnostics go to stderr.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use heat2dot::{
    convert_with_diagnostics, ConvertConfig, Diagnostics, DocumentFormat, DotConfig, Level,
    Stylesheet,
};

#[derive(Parser)]
#[command(name = "heat2dot")]
#[command(about = "Render Heat orchestration templates as Graphviz DOT graphs")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stylesheet file overriding shapes and colors (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Input format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    /// Omit the legend subgraph
    #[arg(long)]
    no_legend: bool,

    /// Only report fatal errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Json,
    Yaml,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Stylesheet::default(),
    };

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut config = ConvertConfig::new()
        .with_stylesheet(stylesheet)
        .with_dot(DotConfig::new().with_legend(!cli.no_legend));
    config.format = match cli.format {
        FormatArg::Auto => None,
        FormatArg::Json => Some(DocumentFormat::Json),
        FormatArg::Yaml => Some(DocumentFormat::Yaml),
    };

    let mut diagnostics = Diagnostics::new();
    let conversion = match convert_with_diagnostics(&source, &config, &mut diagnostics) {
        Ok(conversion) => conversion,
        Err(e) => {
            report(&diagnostics);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    report(&conversion.diagnostics);

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &conversion.dot) {
                eprintln!("Error writing file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => print!("{}", conversion.dot),
    }
}

fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        match diagnostic.level {
            Level::Info => tracing::info!("{}", diagnostic),
            Level::Warning => tracing::warn!("{}", diagnostic),
        }
    }
}

/// Diagnostics are plain lines on stderr; `RUST_LOG` overrides the level.
fn init_logging(quiet: bool) {
    let default_level = if quiet { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

//! # WebAssembly module dumper (wdump)
//!
//! Decodes a WebAssembly MVP binary module and prints it as canonical
//! s-expressions.
//!
//! ## Usage
//!
//! ```bash
//! wdump [-o <file>] [--verbose] [--debug] [--lenient] [<module.wasm>]
//! ```
//!
//! The module is read from standard input when no file is given, and the text
//! goes to standard output unless `--output` names a file. `--verbose` adds
//! comments with section sizes and entry counts. `--lenient` skips trailing
//! bytes at the end of a section and prints unbalanced control flow instead of
//! rejecting it.
//!
//! Diagnostics go to standard error. `RUST_LOG` selects the log level
//! (default `warn`, `--debug` forces `debug`) and `RUST_LOG_FORMAT` the layout
//! (`pretty`, `compact` or `json`).

#![warn(missing_docs)]

use std::{
    env,
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wdump_decoder::ReaderConfig;
use wdump_printer::{print_module, PrinterConfig};

/// wdump CLI arguments
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// WebAssembly module to print; reads standard input when omitted or `-`
    input: Option<PathBuf>,

    /// Write the text to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Add section and count comments
    #[arg(short, long, env = "WDUMP_VERBOSE")]
    verbose: bool,

    /// Log decoding progress at debug level
    #[arg(short, long)]
    debug: bool,

    /// Tolerate trailing section bytes and unbalanced nesting
    #[arg(long, env = "WDUMP_LENIENT")]
    lenient: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    initialize_tracing(args.debug);

    let start = Instant::now();
    let (name, bytes) = read_input(args.input.as_deref())?;
    debug!("Read {} bytes from {}", bytes.len(), name);

    let reader_config = if args.lenient {
        ReaderConfig::lenient()
    } else {
        ReaderConfig::strict()
    };
    let printer_config = PrinterConfig::default()
        .with_verbose(args.verbose)
        .with_strict_nesting(!args.lenient);

    let text = print_module(&bytes, &printer_config, &reader_config)
        .with_context(|| format!("Failed to decode {}", name))?;
    write_output(args.output.as_deref(), &text)?;

    info!("Printed {} in {:?}", name, start.elapsed());
    Ok(())
}

fn initialize_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let format = env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);

    // `init` also routes `log` records from the library crates
    match format.as_str() {
        "json" => subscriber.json().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.pretty().init(),
    }
}

/// Read the module from `path`, or from standard input.
fn read_input(path: Option<&Path>) -> Result<(String, Vec<u8>)> {
    match path {
        Some(path) if path != Path::new("-") => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read WebAssembly file {}", path.display()))?;
            Ok((path.display().to_string(), bytes))
        }
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read WebAssembly module from standard input")?;
            Ok(("<stdin>".to_string(), bytes))
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to standard output")
        }
    }
}

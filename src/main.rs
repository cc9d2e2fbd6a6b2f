//! tagsplit — split HTML messages for size-capped chat protocols
//!
//! - Reads markup from INPUT (or stdin when INPUT is missing or "-").
//! - Writes every chunk to OUTPUT (or stdout), joined by --separator, or
//!   NUL-terminated with --null.
//! - --stats prints one "index<TAB>chars" line per chunk on stderr.
//! - Logs go to stderr; RUST_LOG overrides --log-level.
//!
//! Every flag can also come from the environment (TAGSPLIT_*).

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use tagsplit::{SplitConfig, Splitter, DEFAULT_MAX_CHARS, DEFAULT_MIN_CHUNK_SIZE};

/// CLI flags
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Maximum chunk length in characters
    #[arg(short, long, env = "TAGSPLIT_MAX_CHARS", default_value_t = DEFAULT_MAX_CHARS)]
    max_chars: usize,

    /// Free room below which a long word moves to the next chunk whole
    #[arg(long, env = "TAGSPLIT_MIN_CHUNK", default_value_t = DEFAULT_MIN_CHUNK_SIZE)]
    min_chunk_size: usize,

    /// Text written between chunks
    #[arg(short, long, env = "TAGSPLIT_SEPARATOR", default_value = "\n-----\n")]
    separator: String,

    /// Terminate every chunk with NUL instead of using --separator
    #[arg(short = 'z', long, action = ArgAction::SetTrue)]
    null: bool,

    /// Print per-chunk lengths to stderr
    #[arg(long, action = ArgAction::SetTrue)]
    stats: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TAGSPLIT_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Input file (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    output: Option<PathBuf>,
}

fn setup_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env()
        .context("invalid RUST_LOG directive")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn render(chunks: &[String], separator: &str, null: bool) -> String {
    let mut out = String::with_capacity(chunks.iter().map(String::len).sum::<usize>() + 64);
    for (i, chunk) in chunks.iter().enumerate() {
        if null {
            out.push_str(chunk);
            out.push('\0');
            continue;
        }
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(chunk);
    }
    if !null && !chunks.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let config = SplitConfig::new(cli.max_chars, cli.min_chunk_size)
        .context("invalid split configuration")?;
    let src = read_input(cli.input.as_ref())?;

    let chunks = Splitter::new(config).split(&src);
    info!(
        input_chars = src.chars().count(),
        chunks = chunks.len(),
        max_chars = config.max_chars,
        "split complete"
    );

    if cli.stats {
        let mut err = io::stderr().lock();
        for (i, chunk) in chunks.iter().enumerate() {
            writeln!(err, "{}\t{}", i + 1, chunk.chars().count())?;
        }
    }

    let out = render(&chunks, &cli.separator, cli.null);
    match &cli.output {
        Some(path) if path.as_os_str() != "-" => fs::write(path, out)
            .with_context(|| format!("failed to write {}", path.display()))?,
        _ => io::stdout()
            .lock()
            .write_all(out.as_bytes())
            .context("failed to write stdout")?,
    }
    Ok(())
}

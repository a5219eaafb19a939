//! `dynjson` CLI: format, print, query and trim JSON documents.
//!
//! Input is parsed with the relaxed grammar by default, so bare keys,
//! comments and `( ("key" value) ... )` association lists are accepted.
//!
//! ## Usage
//!
//! ```sh
//! # Canonical JSON, pretty and sorted
//! echo '{ b: 1, a: [1, 2] }' | dynjson fmt --indent --sort-keys
//!
//! # Printable debug form with a title
//! dynjson print -i data.json --title Data
//!
//! # Dotted-path query (prints `null` on a miss)
//! dynjson get items.0.name -i data.json
//!
//! # Redact secrets and cap nesting
//! dynjson trim --max-depth 3 --hide password,token -i data.json
//!
//! # Kind of the document or of a path
//! dynjson kind items -i data.json
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dynjson::{EditOptions, JsonFormat, OnError, PrintOptions, Settings, Syntax, Value};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dynjson", version, about = "Format, query and trim JSON documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Io {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and re-emit canonical JSON
    Fmt {
        #[command(flatten)]
        io: Io,
        /// Two-space pretty layout
        #[arg(long)]
        indent: bool,
        /// Emit object keys in lexicographic order
        #[arg(long)]
        sort_keys: bool,
        /// Escape every non-ASCII character
        #[arg(long)]
        ascii: bool,
        /// Accept standard JSON only
        #[arg(long)]
        strict: bool,
    },
    /// Render the printable debug form
    Print {
        #[command(flatten)]
        io: Io,
        /// Prefix the output with `TITLE: `
        #[arg(long)]
        title: Option<String>,
        /// Single line, no whitespace
        #[arg(long)]
        compact: bool,
        /// Show origin type names
        #[arg(long)]
        detail: bool,
    },
    /// Print the value at a dotted path as JSON
    Get {
        /// Dotted path, e.g. `items.0.name`
        path: String,
        #[command(flatten)]
        io: Io,
    },
    /// Cap nesting depth and redact keys
    Trim {
        #[command(flatten)]
        io: Io,
        /// Deepest container level kept (root is 1, 0 is unlimited)
        #[arg(long, default_value_t = 0)]
        max_depth: usize,
        /// Comma-separated keys whose values are replaced by "***"
        #[arg(long)]
        hide: Option<String>,
        /// Two-space pretty layout
        #[arg(long)]
        indent: bool,
    },
    /// Print the kind of the document or of a dotted path
    Kind {
        /// Dotted path (the whole document if omitted)
        path: Option<String>,
        #[command(flatten)]
        io: Io,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::default();

    match cli.command {
        Commands::Fmt {
            io,
            indent,
            sort_keys,
            ascii,
            strict,
        } => {
            if strict {
                settings.parser = Syntax::Strict;
            }
            settings.force_ascii = ascii;
            let value = load(io.input.as_deref(), &settings)?;
            let format = JsonFormat::from_settings(&settings)
                .with_indent(indent)
                .with_sort_keys(sort_keys);
            write_output(io.output.as_deref(), &value.to_json_with(&format))?;
        }
        Commands::Print {
            io,
            title,
            compact,
            detail,
        } => {
            settings.show_detail = detail;
            let value = load(io.input.as_deref(), &settings)?;
            let mut options = PrintOptions::from_settings(&settings).with_no_indent(compact);
            options.title = title;
            write_output(io.output.as_deref(), &value.to_printable(&options))?;
        }
        Commands::Get { path, io } => {
            let value = load(io.input.as_deref(), &settings)?;
            let found = value.path(&path);
            tracing::debug!(path = %path, kind = %found.kind(), "path resolved");
            write_output(io.output.as_deref(), &found.to_json(false, false))?;
        }
        Commands::Trim {
            io,
            max_depth,
            hide,
            indent,
        } => {
            let mut value = load(io.input.as_deref(), &settings)?;
            let options = EditOptions::default()
                .with_max_depth(max_depth)
                .with_hide_keys(split_keys(hide.as_deref()));
            value.trim(&options);
            write_output(io.output.as_deref(), &value.to_json(indent, false))?;
        }
        Commands::Kind { path, io } => {
            let value = load(io.input.as_deref(), &settings)?;
            let target = match path.as_deref() {
                Some(path) => value.path(path),
                None => &value,
            };
            write_output(io.output.as_deref(), target.type_name())?;
        }
    }

    Ok(())
}

/// Read and parse the input document.
fn load(path: Option<&str>, settings: &Settings) -> Result<Value> {
    let text = read_input(path)?;
    Value::from_json_with(Some(&text), settings, OnError::Propagate)
        .with_context(|| format!("Failed to parse {}", path.unwrap_or("stdin")))
}

/// `a, b,,c` → `["a", "b", "c"]`
fn split_keys(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

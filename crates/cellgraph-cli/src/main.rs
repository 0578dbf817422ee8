//! cellgraph CLI - spreadsheet dependency extraction tool

use anyhow::{bail, Context, Result};
use cellgraph::{DependencyService, GraphStore, OpenOptions, ServiceResult};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellgraph")]
#[command(
    author,
    version,
    about = "Extract cell dependency graphs from spreadsheets and query them"
)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the dependency graph of a workbook as JSON
    Extract {
        /// Input spreadsheet file (xlsx, xlsm, csv)
        input: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// Show the upstream and downstream cells of one node
    Query {
        /// Input spreadsheet file
        input: PathBuf,

        /// Node identifier, e.g. Sheet1!B2
        node: String,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// Answer load/query requests read line by line from stdin
    Session {
        #[command(flatten)]
        read: ReadArgs,
    },
}

#[derive(Args)]
struct ReadArgs {
    /// Only emit cells stored in the XLSX file, not the whole used range
    #[arg(long)]
    sparse: bool,

    /// Sheet name given to CSV input
    #[arg(long, default_value = "Sheet1")]
    sheet_name: String,

    /// CSV field delimiter
    #[arg(long, default_value = ",")]
    delimiter: char,
}

impl ReadArgs {
    fn open_options(&self) -> Result<OpenOptions> {
        if !self.delimiter.is_ascii() {
            bail!("Delimiter must be a single ASCII character");
        }

        let mut options = OpenOptions::default();
        options.xlsx.fill_used_range = !self.sparse;
        options.csv.delimiter = self.delimiter as u8;
        options.csv.sheet_name = self.sheet_name.clone();
        Ok(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            input,
            output,
            pretty,
            read,
        } => extract(&input, output.as_deref(), pretty, &read),
        Commands::Query { input, node, read } => query(&input, &node, &read),
        Commands::Session { read } => session(&read),
    }
}

/// Log to stderr; `RUST_LOG` overrides the `-v` level
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn new_service(read: &ReadArgs) -> Result<DependencyService> {
    Ok(DependencyService::new(Arc::new(GraphStore::new())).with_open_options(read.open_options()?))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("Failed to serialize JSON")
}

fn extract(input: &Path, output: Option<&Path>, pretty: bool, read: &ReadArgs) -> Result<()> {
    let service = new_service(read)?;
    let extraction = service
        .upload(Some(input))
        .with_context(|| format!("Failed to extract '{}'", input.display()))?;

    let mut text = to_json(&extraction, pretty)?;
    text.push('\n');

    if let Some(output_path) = output {
        std::fs::write(output_path, &text)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!(
            "Wrote {} nodes, {} links, {} formulas to '{}'",
            extraction.nodes.len(),
            extraction.links.len(),
            extraction.formulas.len(),
            output_path.display()
        );
    } else {
        io::stdout()
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

fn query(input: &Path, node: &str, read: &ReadArgs) -> Result<()> {
    let service = new_service(read)?;
    service
        .upload(Some(input))
        .with_context(|| format!("Failed to extract '{}'", input.display()))?;

    let reach = service
        .query_reachability(node)
        .with_context(|| format!("Query for '{}' failed", node))?;
    println!("{}", to_json(&reach, true)?);

    Ok(())
}

fn session(read: &ReadArgs) -> Result<()> {
    let service = new_service(read)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let reply = match handle_line(&service, &line) {
            Step::Reply(reply) => reply,
            Step::Skip => continue,
            Step::Quit => break,
        };
        writeln!(stdout, "{}", reply).context("Failed to write to stdout")?;
        stdout.flush().context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Outcome of one session line
#[derive(Debug, PartialEq)]
enum Step {
    Reply(Value),
    Skip,
    Quit,
}

fn handle_line(service: &DependencyService, line: &str) -> Step {
    let line = line.trim();
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (line, None),
    };

    match command {
        "" => Step::Skip,
        "quit" | "exit" => Step::Quit,
        "load" => Step::Reply(respond(service.upload(argument))),
        "query" => Step::Reply(respond(
            service.query_reachability(argument.unwrap_or_default()),
        )),
        other => Step::Reply(json!({
            "error": format!("Unknown command: {}", other),
            "code": "bad_request",
        })),
    }
}

/// JSON body for one request outcome
fn respond<T: Serialize>(result: ServiceResult<T>) -> Value {
    let err = match result {
        Ok(body) => {
            return serde_json::to_value(body)
                .unwrap_or_else(|err| json!({ "error": err.to_string(), "code": "internal" }))
        }
        Err(err) => err,
    };

    tracing::debug!(code = err.code(), client = err.is_client_error(), "request failed");
    json!({ "error": err.to_string(), "code": err.code() })
}

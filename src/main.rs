// Main entry point for the fetchsql CLI
// Reads a fetch document from a file, the command line, stdin or an interactive shell
// and prints the equivalent SQL query

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use fetchsql::fetch::xml::XmlElement;
use fetchsql::{FetchParser, FetchRequest, LineBreak, RenderOptions, SqlRenderer};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// fetchsql - translate fetch documents into SQL queries
#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File containing the fetch document (reads stdin when omitted)
    file: Option<PathBuf>,

    /// Translate a single inline fetch document and exit
    #[arg(short, long, conflicts_with = "file")]
    execute: Option<String>,

    /// Also print the parsed model as JSON
    #[arg(long)]
    json: bool,

    /// Line ending used in the generated query
    #[arg(long, value_enum, default_value_t = LineEnding::Native)]
    line_ending: LineEnding,

    /// Spaces in front of every clause item
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum LineEnding {
    Native,
    Lf,
    Crlf,
}

impl From<LineEnding> for LineBreak {
    fn from(ending: LineEnding) -> Self {
        match ending {
            LineEnding::Native => LineBreak::native(),
            LineEnding::Lf => LineBreak::Lf,
            LineEnding::Crlf => LineBreak::CrLf,
        }
    }
}

/// Everything a translation needs besides its input
struct Translator {
    renderer: SqlRenderer,
    json: bool,
}

impl Translator {
    /// Parse, render and print one document
    fn run(&self, xml: &str) -> Result<()> {
        let request = FetchParser::parse(xml)?;
        println!("{}", self.renderer.render(&request));

        if self.json {
            println!();
            println!("{}", serde_json::to_string_pretty(&request)?);
        }

        log_summary(&request);
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let translator = Translator {
        renderer: SqlRenderer::with_options(RenderOptions {
            line_break: args.line_ending.into(),
            indent: args.indent,
        }),
        json: args.json,
    };

    // If a document was provided, translate it and exit
    if let Some(xml) = args.execute {
        return translator.run(&xml);
    }

    if let Some(path) = args.file {
        let xml = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return translator.run(&xml);
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut xml = String::new();
        stdin
            .lock()
            .read_to_string(&mut xml)
            .context("failed to read stdin")?;
        return translator.run(&xml);
    }

    println!("fetchsql interactive shell");
    println!("Paste a fetch document, it is translated once it is complete");
    println!("Type '.help' for help, '.exit' to quit");
    println!();

    repl(|xml| translator.run(xml))
}

/// Log to stderr, RUST_LOG wins over -v
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn log_summary(request: &FetchRequest) {
    let entities = request.entity.walk();
    info!(
        root = %request.entity.name,
        entities = entities.len(),
        "translated fetch document"
    );
    for entity in entities.iter().skip(1) {
        debug!(entity = %entity.name, "linked entity is not rendered");
    }
}

/// Read-Eval-Print Loop
/// Lines are buffered until the document is closed, then handed to `execute_fn`
fn repl<F>(mut execute_fn: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut buffer = String::new();

    loop {
        print!("{}", if buffer.is_empty() { "fetchsql> " } else { "     ...> " });
        stdout.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let trimmed = line.trim();

        // Handle special commands (starting with .)
        if trimmed.starts_with('.') {
            match trimmed {
                ".exit" | ".quit" => {
                    println!("Goodbye!");
                    break;
                }
                ".help" => print_help(),
                ".clear" => buffer.clear(),
                ".go" => {
                    run_buffer(&mut execute_fn, &mut buffer);
                }
                _ => {
                    println!("Unknown command: {}", trimmed);
                    println!("Type '.help' for help");
                }
            }
            continue;
        }

        if trimmed.is_empty() && buffer.is_empty() {
            continue;
        }

        buffer.push_str(&line);
        if closes_fetch(&buffer) {
            run_buffer(&mut execute_fn, &mut buffer);
        }
    }

    Ok(())
}

fn run_buffer<F>(execute_fn: &mut F, buffer: &mut String)
where
    F: FnMut(&str) -> Result<()>,
{
    if let Err(e) = execute_fn(buffer.as_str()) {
        eprintln!("Error: {:#}", e);
    }
    println!();
    buffer.clear();
}

/// True once the buffered text contains the closing fetch tag,
/// or is already a complete document such as a self-closing `<fetch/>`
fn closes_fetch(buffer: &str) -> bool {
    buffer.to_ascii_lowercase().contains("</fetch>") || XmlElement::parse_document(buffer).is_ok()
}

fn print_help() {
    println!("Special Commands:");
    println!("  .help              Show this help message");
    println!("  .go                Translate the buffered text now (e.g. after a typo left it open)");
    println!("  .clear             Discard the buffered text");
    println!("  .exit, .quit       Exit the shell");
    println!();
    println!("Example:");
    println!("  <fetch top='10'>");
    println!("    <entity name='account'>");
    println!("      <attribute name='name' />");
    println!("      <filter>");
    println!("        <condition attribute='statecode' operator='eq' value='0' />");
    println!("      </filter>");
    println!("    </entity>");
    println!("  </fetch>");
    println!();
    println!("Notes:");
    println!("  - Only the root entity is rendered; link-entity and order are parsed but ignored");
    println!("  - Every condition renders as equality, whatever its operator");
    println!();
}

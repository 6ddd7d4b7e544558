// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

/// pii-obfuscator command-line entry point.
///
/// The binary turns CLI flags (or a JSON event payload) into an obfuscation
/// request, hands it to the dispatcher with a directory-backed object store
/// and writes the masked document out.  Format handling lives under
/// `src/obfuscator`; storage access under `src/storage`.
mod dispatcher;
mod error;
mod obfuscator;
mod request;
mod storage;

use anyhow::{Context, Result, anyhow};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use dispatcher::Dispatcher;
use serde_json::{Value, json};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::OnceLock;
use storage::LocalStore;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `--version` banner.  The commit and rustc version come from `build.rs`.
fn version_string() -> String {
    let commit = option_env!("PII_OBFUSCATOR_COMMIT").unwrap_or("0000000");
    let rustc = option_env!("RUSTC_VERSION").unwrap_or("unknown");
    format!("pii-obfuscator {VERSION} (commit:{commit}) [rust:{rustc}]")
}

/// Cached version string with a 'static lifetime for clap metadata.
fn version_str() -> &'static str {
    static VERSION_STR: OnceLock<String> = OnceLock::new();
    VERSION_STR.get_or_init(version_string).as_str()
}

fn main() {
    std::process::exit(match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    });
}

/// Parse arguments, answer informational flags, then obfuscate one object.
/// Stdout only ever carries the masked document.
fn run() -> Result<i32> {
    let matches = match build_cli().try_get_matches() {
        Ok(m) => m,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                if err.kind() == ErrorKind::DisplayHelp {
                    print_usage();
                }
                return Ok(0);
            }
            _ => err.exit(),
        },
    };

    let opts = CliOptions::from_matches(&matches)?;

    if opts.show_version {
        println!("{}", version_string());
        return Ok(0);
    }

    if opts.list_formats {
        println!("Supported formats: {}", obfuscator::supported_formats());
        return Ok(0);
    }

    init_tracing(opts.verbose);

    let payload = load_payload(&opts.source)?;
    let dispatcher = Dispatcher::new(LocalStore::new(&opts.store_root));
    let masked = dispatcher.obfuscate_payload(&payload)?;
    write_output(opts.output.as_ref(), &masked)?;
    Ok(0)
}

fn build_cli() -> Command {
    Command::new("pii-obfuscator")
        .about("Mask PII fields in CSV, JSON Lines and JSON files held in object storage")
        .disable_version_flag(true)
        .version(version_str())
        .arg(
            Arg::new("event")
                .long("event")
                .value_name("FILE")
                .conflicts_with_all(["file", "pii"])
                .help("Read the JSON invocation payload from FILE (or - for stdin)"),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .value_name("S3_URI")
                .help("Object to obfuscate, e.g. s3://bucket/path/data.csv"),
        )
        .arg(
            Arg::new("pii")
                .long("pii")
                .value_name("FIELD")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .requires("file")
                .help("Field to mask (repeatable, or comma-separated)"),
        )
        .arg(
            Arg::new("store-root")
                .long("store-root")
                .value_name("DIR")
                .env("PII_OBFUSCATOR_STORE_ROOT")
                .default_value(".")
                .help("Directory holding one sub-directory per bucket"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Write the masked document to FILE instead of stdout"),
        )
        .arg(
            Arg::new("formats")
                .long("formats")
                .action(ArgAction::SetTrue)
                .help("List supported file formats and exit"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Log progress to stderr"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .action(ArgAction::SetTrue)
                .help("Print version information and exit"),
        )
}

/// Where the invocation payload comes from.
#[derive(Debug, PartialEq)]
enum PayloadSource {
    Event(String),
    Flags { file: String, pii: Vec<String> },
    Missing,
}

/// Structured view of the CLI flags.
#[derive(Debug)]
struct CliOptions {
    source: PayloadSource,
    store_root: PathBuf,
    output: Option<PathBuf>,
    list_formats: bool,
    verbose: bool,
    show_version: bool,
}

impl CliOptions {
    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let source = match (
            matches.get_one::<String>("event"),
            matches.get_one::<String>("file"),
        ) {
            (Some(event), _) => PayloadSource::Event(event.clone()),
            (None, Some(file)) => PayloadSource::Flags {
                file: file.clone(),
                pii: matches
                    .get_many::<String>("pii")
                    .map(|vals| {
                        vals.map(|v| v.trim().to_string())
                            .filter(|v| !v.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            (None, None) => PayloadSource::Missing,
        };

        Ok(Self {
            source,
            store_root: matches
                .get_one::<String>("store-root")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            output: matches.get_one::<String>("output").map(PathBuf::from),
            list_formats: matches.get_flag("formats"),
            verbose: matches.get_flag("verbose"),
            show_version: matches.get_flag("version"),
        })
    }
}

/// Build the JSON payload the dispatcher validates.  Flag input is shaped
/// into the same payload so both paths share one validation step.
fn load_payload(source: &PayloadSource) -> Result<Value> {
    match source {
        PayloadSource::Event(path) => {
            let bytes = read_event(path)?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("event payload in {path} is not valid JSON"))
        }
        PayloadSource::Flags { file, pii } => Ok(json!({
            "file_to_obfuscate": file,
            "pii_fields": pii,
        })),
        PayloadSource::Missing => {
            print_usage();
            Err(anyhow!("one of --event or --file is required"))
        }
    }
}

fn read_event(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("failed to read event from stdin")?;
        return Ok(buf);
    }
    fs::read(path).with_context(|| format!("failed to read {path}"))
}

fn write_output(path: Option<&PathBuf>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Log to stderr.  `--verbose` forces debug output, otherwise `RUST_LOG`
/// decides and the default is warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn print_usage() {
    static USAGE: &str = include_str!("../resources/usage_en.txt");
    eprintln!("\n{USAGE}");
}

//! Command-line interface for power-assert
//! Rewrites XCTest assertions in Swift sources, using the compiler's `-dump-ast` output,
//! so that failing assertions print a diagram of their sub-expression values.
//!
//! Usage:
//!   power-assert transform `<path>` [--dump `<file>`] [--output `<path>`] [--with-support]
//!                                                                       - Instrument a file or a directory
//!   power-assert inspect `<path>` [--dump `<file>`] --format `<format>`     - Print one pipeline stage as JSON
//!
//! Both accept `--config <file>` (layered over `power-assert.toml` in the working directory and
//! the built-in defaults), `--set key=value` (repeatable, applied last) and `-v` (repeatable)
//! to raise the log level. `RUST_LOG` overrides `-v`.

mod commands;

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use commands::{collect_jobs, dump_path_for, write_support, Destination, Job, INSPECT_FORMATS};
use power_assert::instrument::pipeline::InstrumentOptions;
use power_assert_config::Loader;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const PROJECT_CONFIG: &str = "power-assert.toml";

fn main() {
    let matches = Command::new("power-assert")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Instrument Swift test assertions with power-assert diagrams")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .value_name("KEY=VALUE")
                .global(true)
                .action(ArgAction::Append)
                .value_parser(parse_override)
                .help("Override one configuration value, e.g. generate.recorder=Diagram.Recorder"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Raise the log level (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("transform")
                .about("Instrument a Swift file, or every Swift file with a dump under a directory")
                .arg(path_arg())
                .arg(dump_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file, or output directory for a directory (default: stdout, or in place)"),
                )
                .arg(
                    Arg::new("with-support")
                        .long("with-support")
                        .action(ArgAction::SetTrue)
                        .help("Also write the Swift recorder source next to the output"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print one stage of the pipeline as JSON")
                .arg(path_arg())
                .arg(dump_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .required(true)
                        .value_parser(PossibleValuesParser::new(INSPECT_FORMATS.iter().copied()))
                        .help("Stage to print"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("transform", sub)) => {
            init_logging(sub);
            handle_transform_command(sub, &load_options(sub));
        }
        Some(("inspect", sub)) => {
            init_logging(sub);
            handle_inspect_command(sub, &load_options(sub));
        }
        _ => unreachable!("a subcommand is required"),
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Swift source file or directory")
        .required(true)
        .index(1)
}

fn dump_arg() -> Arg {
    Arg::new("dump")
        .long("dump")
        .short('d')
        .help("AST dump of the source (default: <path>.ast)")
}

fn init_logging(matches: &ArgMatches) {
    let level = match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,power_assert={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `key=value` for `--set`.
fn parse_override(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn load_options(matches: &ArgMatches) -> InstrumentOptions {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    let mut overrides = matches
        .get_many::<(String, String)>("set")
        .into_iter()
        .flatten();
    let config = overrides
        .try_fold(loader, |loader, (key, value)| {
            loader.set_override(key, value.as_str())
        })
        .and_then(Loader::build)
        .unwrap_or_else(|e| {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        });
    config.instrument_options()
}

/// Handle the transform command
fn handle_transform_command(matches: &ArgMatches, options: &InstrumentOptions) {
    let path = PathBuf::from(matches.get_one::<String>("path").expect("path is required"));
    let dump = matches.get_one::<String>("dump").map(PathBuf::from);
    let output = matches.get_one::<String>("output").map(PathBuf::from);

    if matches.get_flag("with-support") {
        let dir = if path.is_dir() {
            output.clone().unwrap_or_else(|| path.clone())
        } else {
            match output.as_deref() {
                Some(file) => file.parent().map(Path::to_path_buf).unwrap_or_default(),
                None => {
                    eprintln!("--with-support needs --output when transforming to stdout");
                    std::process::exit(1);
                }
            }
        };
        if let Err(e) = write_support(&dir, &options.generator.recorder) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    let jobs = if path.is_dir() {
        if dump.is_some() {
            eprintln!("--dump takes a single file; dumps under a directory are found as <file>.ast");
            std::process::exit(1);
        }
        collect_jobs(&path, output.as_deref()).unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        })
    } else {
        vec![Job {
            dump: dump.unwrap_or_else(|| dump_path_for(&path)),
            destination: output.map_or(Destination::Stdout, Destination::File),
            source: path,
        }]
    };

    let failures: Vec<String> = jobs
        .par_iter()
        .filter_map(|job| commands::transform(job, options).err())
        .collect();

    tracing::info!(
        files = jobs.len(),
        failed = failures.len(),
        "transform finished"
    );
    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("{}", failure);
        }
        std::process::exit(1);
    }
}

/// Handle the inspect command
fn handle_inspect_command(matches: &ArgMatches, options: &InstrumentOptions) {
    let path = Path::new(matches.get_one::<String>("path").expect("path is required"));
    let dump = matches
        .get_one::<String>("dump")
        .map(PathBuf::from)
        .unwrap_or_else(|| dump_path_for(path));
    let format = matches
        .get_one::<String>("format")
        .expect("format is required");

    let output = commands::inspect(path, &dump, format, options).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    println!("{}", output);
}

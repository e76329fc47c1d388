//! Transform and inspect commands
//!
//! Both commands work on (source, dump) pairs. A dump is found next to its source as
//! `<source>.ast` unless given explicitly. Errors come back as one-line strings that already
//! name the file, so the caller only has to print them.

use power_assert::instrument::pipeline::{
    capture_assertions, dump_tokens, instrument, locate_assertions, parse_normalized,
    InstrumentOptions, TransformError,
};
use power_assert::instrument::runtime::{support_source, SUPPORT_FILE_NAME};
use power_assert::instrument::source::SourceFile;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// All stages `inspect` can print.
pub const INSPECT_FORMATS: &[&str] = &["dump-tokens", "ast", "assertions", "captures"];

/// Where a transformed file goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

/// One file to transform.
#[derive(Debug, Clone)]
pub struct Job {
    pub source: PathBuf,
    pub dump: PathBuf,
    pub destination: Destination,
}

/// `Foo.swift` -> `Foo.swift.ast`
pub fn dump_path_for(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(".ast");
    PathBuf::from(name)
}

/// Every `*.swift` file under `root` that has a dump next to it, in path order.
///
/// With `output`, results mirror the directory layout under it; without, files are rewritten
/// in place.
pub fn collect_jobs(root: &Path, output: Option<&Path>) -> Result<Vec<Job>, String> {
    let mut sources = Vec::new();
    walk(root, &mut sources)?;
    sources.sort();

    let mut jobs = Vec::new();
    for source in sources {
        let dump = dump_path_for(&source);
        if !dump.is_file() {
            tracing::debug!(source = %source.display(), "no dump next to source, skipped");
            continue;
        }
        let destination = match output {
            Some(output) => {
                let relative = source.strip_prefix(root).unwrap_or(&source);
                Destination::File(output.join(relative))
            }
            None => Destination::File(source.clone()),
        };
        jobs.push(Job {
            source,
            dump,
            destination,
        });
    }
    Ok(jobs)
}

fn walk(dir: &Path, sources: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("{}: cannot read directory: {}", dir.display(), e))?;
    for entry in entries {
        let path = entry
            .map_err(|e| format!("{}: cannot read directory: {}", dir.display(), e))?
            .path();
        if path.is_dir() {
            walk(&path, sources)?;
        } else if path.extension().is_some_and(|ext| ext == "swift") {
            sources.push(path);
        }
    }
    Ok(())
}

/// Transform one file and write it out. Returns the number of rewritten assertions.
pub fn transform(job: &Job, options: &InstrumentOptions) -> Result<usize, String> {
    let _span = tracing::info_span!("transform", source = %job.source.display()).entered();
    let (source, dump) = read_pair(&job.source, &job.dump)?;
    let instrumented = instrument(&source, &dump, options)
        .map_err(|e| format!("{}: {}", job.source.display(), e))?;

    match &job.destination {
        Destination::Stdout => print!("{}", instrumented.source),
        Destination::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("{}: cannot create directory: {}", parent.display(), e))?;
            }
            fs::write(path, &instrumented.source)
                .map_err(|e| format!("{}: cannot write: {}", path.display(), e))?;
        }
    }
    tracing::info!(assertions = instrumented.assertions.len(), "transformed");
    Ok(instrumented.assertions.len())
}

/// Write the Swift source of `recorder` into `dir`, returning its path.
pub fn write_support(dir: &Path, recorder: &str) -> Result<PathBuf, String> {
    let source = support_source(recorder).map_err(|e| format!("Configuration error: {}", e))?;
    fs::create_dir_all(dir)
        .map_err(|e| format!("{}: cannot create directory: {}", dir.display(), e))?;
    let path = dir.join(SUPPORT_FILE_NAME);
    fs::write(&path, source).map_err(|e| format!("{}: cannot write: {}", path.display(), e))?;
    tracing::info!(path = %path.display(), "support source written");
    Ok(path)
}

/// Run the pipeline up to the stage `format` names and return that stage as JSON.
pub fn inspect(
    source_path: &Path,
    dump_path: &Path,
    format: &str,
    options: &InstrumentOptions,
) -> Result<String, String> {
    let (source, dump) = read_pair(source_path, dump_path)?;
    let source = SourceFile::new(&source);
    let failed = |e: TransformError| format!("{}: {}", source_path.display(), e);

    match format {
        "dump-tokens" => to_json(&dump_tokens(&dump, options)),
        "ast" => to_json(&parse_normalized(&source, &dump, options).map_err(failed)?),
        "assertions" => to_json(&locate_assertions(&source, &dump, options).map_err(failed)?),
        "captures" => to_json(&capture_assertions(&source, &dump, options).map_err(failed)?),
        _ => Err(format!(
            "Unknown format: {} (available: {})",
            format,
            INSPECT_FORMATS.join(", ")
        )),
    }
}

fn read_pair(source: &Path, dump: &Path) -> Result<(String, String), String> {
    let read = |path: &Path| {
        fs::read_to_string(path).map_err(|e| format!("{}: cannot read: {}", path.display(), e))
    };
    Ok((read(source)?, read(dump)?))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {}", e))
}

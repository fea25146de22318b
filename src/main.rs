use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};
use git_info_errors::{ConfigParseSnafu, ReadFileSnafu, WriteFileSnafu};
use git_info_rs::{GitInfo, GitInfoError, JsonText, ReportExt, Result};
use miette::{NamedSource, SourceSpan};
use serde_json::{Map, Value};
use snafu::ResultExt;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "git-info.yaml";

//
// ──────────────────────────────────────────────────────────────────────────────
//  CLI ARGUMENTS
// ──────────────────────────────────────────────────────────────────────────────
//
// The binary runs the plugin outside a bundler: it reads one manifest, treats
// its path as the module id and writes the transform result. Plugin options
// come from a YAML file using the same camelCase keys a bundler config would,
// and a handful of flags override individual keys.
//

#[derive(Parser, Debug)]
#[command(version, about = "Stamp git metadata into a package manifest")]
pub struct Cli {
    /// Manifest to transform.
    file: PathBuf,

    /// YAML file holding plugin options.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Emit::Module)]
    emit: Emit,

    #[arg(long, value_enum, default_value_t = ErrorFormat::Human)]
    error_format: ErrorFormat,

    /// Also write JSON logs to a daily file in this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long)]
    cwd: Option<PathBuf>,

    #[arg(long)]
    abbrev: Option<usize>,

    #[arg(long)]
    version_format: Option<String>,

    #[arg(long)]
    transform_filename: Option<String>,

    /// Add `buildDate` to the manifest.
    #[arg(long)]
    build_date: bool,

    /// Keep the manifest's own `version`.
    #[arg(long)]
    no_update_version: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// An ES module with named exports.
    Module,
    /// The rewritten manifest itself.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorFormat {
    Human,
    Json,
}

impl Cli {
    /// Option keys set on the command line, in plugin-option form.
    pub fn overrides(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(cwd) = &self.cwd {
            map.insert("cwd".into(), cwd.to_string_lossy().into_owned().into());
        }
        if let Some(abbrev) = self.abbrev {
            map.insert("abbrev".into(), abbrev.into());
        }
        if let Some(format) = &self.version_format {
            map.insert("versionFormat".into(), format.clone().into());
        }
        if let Some(name) = &self.transform_filename {
            map.insert("transformFilename".into(), name.clone().into());
        }
        if self.build_date {
            map.insert("enableBuildDate".into(), true.into());
        }
        if self.no_update_version {
            map.insert("updateVersion".into(), false.into());
        }
        map
    }
}

//
// ──────────────────────────────────────────────────────────────────────────────
//  CONFIGURATION LOADING
// ──────────────────────────────────────────────────────────────────────────────
//

pub fn load_config(path: &Path) -> Result<Map<String, Value>> {
    let text = fs::read_to_string(path).context(ReadFileSnafu { path })?;
    parse_config(path, &text)
}

/// Parse YAML plugin options. An empty file means "all defaults".
pub fn parse_config(path: &Path, text: &str) -> Result<Map<String, Value>> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }

    serde_yml::from_str(text).with_context(|source: &mut serde_yml::Error| ConfigParseSnafu {
        path,
        src: NamedSource::new(path.display().to_string(), text.to_string()),
        span: source
            .location()
            .map(|loc| SourceSpan::from((loc.index(), 1))),
    })
}

//
// ──────────────────────────────────────────────────────────────────────────────
//  MAIN EXECUTION PIPELINE
// ──────────────────────────────────────────────────────────────────────────────
//
//   1. Resolve plugin options (config file, then flag overrides).
//   2. Build the plugin, swapping in the JSON emitter for `--emit json`.
//   3. Transform the manifest; a skipped file is passed through unchanged.
//   4. Write the result.
//

pub fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => load_config(Path::new(DEFAULT_CONFIG))?,
        None => Map::new(),
    };
    config.extend(cli.overrides());

    let mut plugin = GitInfo::from_config(config)?;
    if cli.emit == Emit::Json {
        plugin = plugin.with_embed(JsonText);
    }

    let content = fs::read_to_string(&cli.file).context(ReadFileSnafu { path: &cli.file })?;
    let id = cli.file.to_string_lossy();

    let rendered = match plugin.transform(&content, &id)? {
        Some(result) => result.code,
        None => {
            info!(id = %id, "passing file through unchanged");
            content
        }
    };

    match &cli.output {
        Some(path) => fs::write(path, rendered).context(WriteFileSnafu { path })?,
        None => print!("{rendered}"),
    }

    Ok(())
}

fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Respect RUST_LOG or default to warnings only.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "git-info.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(non_blocking)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_filter(filter),
        )
        .init();

    guard
}

fn report(err: GitInfoError, format: ErrorFormat) -> miette::Report {
    if format == ErrorFormat::Json {
        let summary = err.to_report();
        if let Ok(json) = serde_json::to_string_pretty(&summary) {
            println!("{json}");
        }
    }
    miette::Report::new(err)
}

fn main() -> miette::Result<()> {
    // Panics get color-eyre's report; returned errors go through miette.
    color_eyre::install().map_err(|err| miette::miette!("{err}"))?;

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref());

    run(&cli).map_err(|err| report(err, cli.error_format))
}

#[cfg(test)]
mod common;

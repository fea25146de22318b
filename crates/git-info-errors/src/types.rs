/*
 * Structured Error Definitions.
 */

#![allow(unused_assignments)]

use std::{path::PathBuf, process::ExitStatus};

use miette::{Diagnostic, NamedSource, SourceSpan};
use snafu::prelude::*;

#[derive(Debug, Snafu, Diagnostic)]
#[snafu(visibility(pub))]
pub enum GitInfoError {
    /// The shell or the git executable could not be started in `cwd`.
    #[snafu(display("Failed to run `git {command}` in {}", cwd.display()))]
    #[diagnostic(
        code(git_info::command::spawn),
        help("Check that git is installed and that the working directory exists."),
    )]
    CommandSpawn {
        command: String,
        cwd: PathBuf,
        source: std::io::Error,
    },

    /// git ran but exited non-zero.
    #[snafu(display("`git {command}` failed ({status}): {stderr}"))]
    #[diagnostic(
        code(git_info::command::status),
        help("Run the command by hand in the same directory to see what git expects."),
    )]
    CommandStatus {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[snafu(display("`git {command}` wrote non-UTF-8 output"))]
    #[diagnostic(code(git_info::command::output))]
    CommandOutput {
        command: String,
        source: std::string::FromUtf8Error,
    },

    /// A `[name]` in a format template has no replacement.
    #[snafu(display("\"{template}\": unknown placeholder '{name}'"))]
    #[diagnostic(code(git_info::format::unknown_placeholder))]
    UnknownPlaceholder {
        template: String,
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown placeholder")]
        span: SourceSpan,
        #[help]
        hint: String,
    },

    #[snafu(display("Failed to parse {id} as JSON"))]
    #[diagnostic(code(git_info::manifest::parse))]
    ManifestParse {
        id: String,
        source: serde_json::Error,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid JSON here")]
        span: SourceSpan,
    },

    #[snafu(display("{id} holds a JSON {kind}, expected an object"))]
    #[diagnostic(
        code(git_info::manifest::shape),
        help("Only JSON objects can receive the git fields."),
    )]
    ManifestShape { id: String, kind: &'static str },

    #[snafu(display("Failed to serialize the rewritten manifest"))]
    #[diagnostic(code(git_info::manifest::serialize))]
    ManifestSerialize { source: serde_json::Error },

    #[snafu(display("Invalid plugin options"))]
    #[diagnostic(
        code(git_info::options::invalid),
        help("`abbrev` must be a positive integer and the flags must be booleans."),
    )]
    InvalidOptions { source: serde_json::Error },

    #[snafu(display("Invalid {option} pattern `{pattern}`"))]
    #[diagnostic(code(git_info::options::pattern))]
    InvalidPattern {
        option: &'static str,
        pattern: String,
        source: globset::Error,
    },

    /// A delegated embedding transform refused the rewritten manifest.
    #[snafu(display("Embedding transform failed for {id}: {reason}"))]
    #[diagnostic(code(git_info::embed))]
    Embed { id: String, reason: String },

    #[snafu(display("Failed to read {}", path.display()))]
    #[diagnostic(code(git_info::io::read))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to write {}", path.display()))]
    #[diagnostic(code(git_info::io::write))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to parse config at {}", path.display()))]
    #[diagnostic(
        code(git_info::config::parse),
        help("The config file is YAML with the plugin option names as keys."),
    )]
    ConfigParse {
        path: PathBuf,
        source: serde_yml::Error,
        #[source_code]
        src: NamedSource<String>,
        #[label("syntax error here")]
        span: Option<SourceSpan>,
    },
}

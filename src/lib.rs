//! Stamp git metadata into a package manifest while a bundler loads it.
//!
//! [`GitInfo`] intercepts `package.json` (or any configured file name), runs
//! git for the commit hash, branch and commit date, adds `gitAbbrevHash`,
//! `gitBranch`, `gitCommitHash`, `gitDate`, `gitVersion` and optionally
//! `buildDate`, rewrites `version`, and passes the result to an
//! [`EmbedTransform`] that turns it into an importable module.

pub mod build_date;
pub mod embed;
pub mod format;
pub mod inject;
pub mod options;
pub mod plugin;
pub mod runner;

pub use build_date::build_date;
pub use embed::{EmbedTransform, JsonModule, JsonModuleOptions, JsonText, TransformResult};
pub use format::format_string;
pub use git_info_errors::{ErrorReport, GitInfoError, ReportExt, Result};
pub use inject::{FALLBACK_VERSION, GitFacts, inject};
pub use options::{
    DEFAULT_BRANCH_COMMAND, DEFAULT_COMMIT_HASH_COMMAND, DEFAULT_DATE_COMMAND,
    DEFAULT_DATE_FORMAT, DEFAULT_VERSION_FORMAT, EMBED_OPTION_KEYS, GitInfoOptions,
    split_embed_options,
};
pub use plugin::{GitInfo, PLUGIN_NAME};
pub use runner::{CommandRunner, GitRunner, run_git};

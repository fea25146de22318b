use std::{num::NonZeroUsize, path::PathBuf};

use git_info_errors::{InvalidOptionsSnafu, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use snafu::ResultExt;
use tracing::warn;

pub const DEFAULT_ABBREV: NonZeroUsize = NonZeroUsize::MIN.saturating_add(6);
pub const DEFAULT_BRANCH_COMMAND: &str = "rev-parse --abbrev-ref HEAD";
pub const DEFAULT_COMMIT_HASH_COMMAND: &str = "rev-parse HEAD";
pub const DEFAULT_DATE_COMMAND: &str = "log -1 --format=";
pub const DEFAULT_DATE_FORMAT: &str = "%cD";
pub const DEFAULT_TRANSFORM_FILENAME: &str = "package.json";
pub const DEFAULT_VERSION_FORMAT: &str = "[version]-[branch]+g[abbrevHash]";

/// Keys owned by the embedding transform rather than by this plugin.
pub const EMBED_OPTION_KEYS: [&str; 6] = [
    "compact",
    "exclude",
    "include",
    "indent",
    "namedExports",
    "preferConst",
];

const OPTION_KEYS: [&str; 10] = [
    "abbrev",
    "branchCommand",
    "commitHashCommand",
    "cwd",
    "dateCommand",
    "dateFormat",
    "enableBuildDate",
    "transformFilename",
    "updateVersion",
    "versionFormat",
];

/// Effective plugin configuration, fixed when the plugin is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GitInfoOptions {
    /// Length of `gitAbbrevHash`, in characters.
    pub abbrev: NonZeroUsize,
    pub branch_command: String,
    pub commit_hash_command: String,
    /// Directory to run git in; the manifest's own directory when unset.
    pub cwd: Option<PathBuf>,
    pub date_command: String,
    pub date_format: String,
    pub enable_build_date: bool,
    /// Base name of the files this plugin rewrites.
    pub transform_filename: String,
    /// Replace `version` with the computed `gitVersion`.
    pub update_version: bool,
    pub version_format: String,
}

impl Default for GitInfoOptions {
    fn default() -> Self {
        Self {
            abbrev: DEFAULT_ABBREV,
            branch_command: DEFAULT_BRANCH_COMMAND.to_string(),
            commit_hash_command: DEFAULT_COMMIT_HASH_COMMAND.to_string(),
            cwd: None,
            date_command: DEFAULT_DATE_COMMAND.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            enable_build_date: false,
            transform_filename: DEFAULT_TRANSFORM_FILENAME.to_string(),
            update_version: true,
            version_format: DEFAULT_VERSION_FORMAT.to_string(),
        }
    }
}

impl GitInfoOptions {
    /// Merge the plugin's own keys over the defaults.
    ///
    /// `null` values count as unset. Keys this plugin does not know are
    /// logged and ignored.
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        let map: Map<String, Value> = map
            .into_iter()
            .filter(|(key, value)| {
                if !OPTION_KEYS.contains(&key.as_str()) {
                    warn!(option = %key, "ignoring unknown git-info option");
                    return false;
                }
                !value.is_null()
            })
            .collect();

        serde_json::from_value(Value::Object(map)).context(InvalidOptionsSnafu)
    }

    /// The full subcommand that prints the commit date.
    pub fn date_subcommand(&self) -> String {
        format!("{}{}", self.date_command, self.date_format)
    }
}

/// Split host options into `(embed, own)`: the keys listed in
/// [`EMBED_OPTION_KEYS`] and everything else.
pub fn split_embed_options(
    options: Map<String, Value>,
) -> (Map<String, Value>, Map<String, Value>) {
    options
        .into_iter()
        .partition(|(key, _)| EMBED_OPTION_KEYS.contains(&key.as_str()))
}

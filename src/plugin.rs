use std::path::Path;

use git_info_errors::{
    ManifestParseSnafu, ManifestSerializeSnafu, ManifestShapeSnafu, Result, line_col_span,
};
use miette::NamedSource;
use serde_json::{Map, Value};
use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    build_date::build_date,
    embed::{EmbedTransform, JsonModule, TransformResult},
    inject::{GitFacts, inject},
    options::{GitInfoOptions, split_embed_options},
    runner::{CommandRunner, GitRunner},
};

pub const PLUGIN_NAME: &str = "git-info";

//
// ──────────────────────────────────────────────────────────────────────────────
//  PLUGIN
// ──────────────────────────────────────────────────────────────────────────────
//
// `transform` is the only entry point the host calls. For a file whose base
// name is not `transformFilename` it returns `None` without touching git.
// Otherwise:
//
//   1. Run the commit hash, branch and date commands (in that order).
//   2. Parse the content as a JSON object.
//   3. Inject the git fields.
//   4. Serialize and hand the text to the embedding transform.
//
// Nothing is kept between calls besides the options and the build date.
//

pub struct GitInfo {
    options: GitInfoOptions,
    runner: Box<dyn CommandRunner>,
    embed: Box<dyn EmbedTransform>,
}

impl GitInfo {
    pub fn new(options: GitInfoOptions, embed: impl EmbedTransform + 'static) -> Self {
        // Pin the build date to plugin load time rather than first use.
        let _ = build_date();

        Self {
            options,
            runner: Box::new(GitRunner),
            embed: Box::new(embed),
        }
    }

    /// Build the plugin from host options, routing the JSON module keys to
    /// a [`JsonModule`] and the rest to [`GitInfoOptions`].
    pub fn from_config(config: Map<String, Value>) -> Result<Self> {
        let (embed_options, own_options) = split_embed_options(config);
        let embed = JsonModule::from_map(embed_options)?;
        let options = GitInfoOptions::from_map(own_options)?;
        Ok(Self::new(options, embed))
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn with_embed(mut self, embed: impl EmbedTransform + 'static) -> Self {
        self.embed = Box::new(embed);
        self
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn options(&self) -> &GitInfoOptions {
        &self.options
    }

    pub fn transform(&self, content: &str, id: &str) -> Result<Option<TransformResult>> {
        let path = Path::new(id);
        let file_name = path.file_name().and_then(|name| name.to_str());
        if file_name != Some(self.options.transform_filename.as_str()) {
            debug!(id, "not a manifest, skipping");
            return Ok(None);
        }

        let cwd = match &self.options.cwd {
            Some(cwd) => cwd.as_path(),
            None => match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            },
        };
        let facts = self.git_facts(cwd)?;

        let parsed: Value =
            serde_json::from_str(content).with_context(|source: &mut serde_json::Error| {
                ManifestParseSnafu {
                    id,
                    src: NamedSource::new(id, content.to_string()),
                    span: line_col_span(content, source.line(), source.column()),
                }
            })?;
        let mut data = match parsed {
            Value::Object(data) => data,
            other => {
                return ManifestShapeSnafu {
                    id,
                    kind: json_kind(&other),
                }
                .fail();
            }
        };

        inject(&self.options, &mut data, &facts)?;
        // `info!` shadows `Value` with the tracing trait inside its arguments.
        let git_version = data.get("gitVersion").and_then(Value::as_str);
        info!(id, git_version, "injected git info");

        let json = serde_json::to_string(&data).context(ManifestSerializeSnafu)?;
        self.embed.transform(&json, id)
    }

    fn git_facts(&self, cwd: &Path) -> Result<GitFacts> {
        let commit_hash = self.runner.run(cwd, &self.options.commit_hash_command)?;
        let branch = self.runner.run(cwd, &self.options.branch_command)?;
        let abbrev_hash = commit_hash.chars().take(self.options.abbrev.get()).collect();
        let commit_date = self.runner.run(cwd, &self.options.date_subcommand())?;

        Ok(GitFacts {
            build_date: build_date().to_string(),
            abbrev_hash,
            branch,
            commit_hash,
            commit_date,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

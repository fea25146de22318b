use std::collections::HashMap;

use git_info_errors::Result;
use serde_json::{Map, Value};

use crate::{format::format_string, options::GitInfoOptions};

/// Version used for `[version]` when the manifest has none.
pub const FALLBACK_VERSION: &str = "0.0.0";

/// Repository metadata gathered for one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitFacts {
    pub build_date: String,
    pub abbrev_hash: String,
    pub branch: String,
    pub commit_hash: String,
    pub commit_date: String,
}

/// Write the git fields into `data`.
///
/// `gitVersion` is formatted before anything is written, so a bad
/// `versionFormat` leaves `data` as it was.
pub fn inject(
    options: &GitInfoOptions,
    data: &mut Map<String, Value>,
    facts: &GitFacts,
) -> Result<()> {
    let version = version_text(data.get("version"));
    let fields = HashMap::from([
        ("version", version.as_str()),
        ("branch", facts.branch.as_str()),
        ("commitHash", facts.commit_hash.as_str()),
        ("abbrevHash", facts.abbrev_hash.as_str()),
    ]);
    let git_version = format_string(&options.version_format, &fields)?;

    if options.enable_build_date {
        data.insert("buildDate".into(), facts.build_date.clone().into());
    }
    data.insert("gitAbbrevHash".into(), facts.abbrev_hash.clone().into());
    data.insert("gitBranch".into(), facts.branch.clone().into());
    data.insert("gitCommitHash".into(), facts.commit_hash.clone().into());
    data.insert("gitDate".into(), facts.commit_date.clone().into());
    data.insert("gitVersion".into(), git_version.clone().into());
    if options.update_version {
        data.insert("version".into(), git_version.into());
    }

    Ok(())
}

// Falsy values (null, false, 0, NaN, "") fall back. Anything else is
// stringified the way a JS engine would: `1.0` is "1", `["1.2"]` is "1.2".
fn version_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => FALLBACK_VERSION.to_string(),
        Some(Value::String(s)) if s.is_empty() => FALLBACK_VERSION.to_string(),
        Some(Value::Number(n)) if n.as_f64().is_none_or(|f| f == 0.0 || f.is_nan()) => {
            FALLBACK_VERSION.to_string()
        }
        Some(other) => js_string(other),
    }
}

fn js_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            // f64 Display drops a zero fraction.
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(js_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

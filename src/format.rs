use std::{collections::HashMap, sync::LazyLock};

use git_info_errors::{Result, UnknownPlaceholderSnafu};
use miette::NamedSource;
use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("placeholder regex"));

/// Replace every `[name]` in `template` with `fields[name]`.
///
/// A placeholder missing from `fields` is an error naming both the template
/// and the placeholder. A `[` without a closing `]` is copied through as is.
pub fn format_string(template: &str, fields: &HashMap<&str, &str>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();

        let Some(value) = fields.get(name) else {
            return UnknownPlaceholderSnafu {
                template,
                name,
                src: NamedSource::new("format", template.to_string()),
                span: (whole.start(), whole.len()),
                hint: known_placeholders(fields),
            }
            .fail();
        };

        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}

fn known_placeholders(fields: &HashMap<&str, &str>) -> String {
    let mut names: Vec<_> = fields.keys().map(|k| format!("[{k}]")).collect();
    if names.is_empty() {
        return "No placeholders are available here.".to_string();
    }
    names.sort();
    format!("Known placeholders: {}", names.join(", "))
}

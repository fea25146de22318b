//! Turning the rewritten manifest into something the host can import.
//!
//! The plugin never builds module code itself. It hands JSON text and the
//! original id to an [`EmbedTransform`], and whatever that returns becomes
//! the plugin's result.

use git_info_errors::{EmbedSnafu, InvalidOptionsSnafu, InvalidPatternSnafu, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use snafu::ResultExt;
use tracing::{debug, warn};

/// Output handed back to the host bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub code: String,
}

/// The capability the plugin delegates module generation to.
///
/// `Ok(None)` means "not mine": the host keeps the original content.
pub trait EmbedTransform {
    fn transform(&self, code: &str, id: &str) -> Result<Option<TransformResult>>;
}

impl<F> EmbedTransform for F
where
    F: Fn(&str, &str) -> Result<Option<TransformResult>>,
{
    fn transform(&self, code: &str, id: &str) -> Result<Option<TransformResult>> {
        self(code, id)
    }
}

//
// ──────────────────────────────────────────────────────────────────────────────
//  JSON MODULE OPTIONS
// ──────────────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonModuleOptions {
    /// Drop all optional whitespace from the generated module.
    pub compact: bool,
    #[serde(deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub include: Vec<String>,
    pub indent: String,
    /// Export each identifier-safe top-level key on its own.
    pub named_exports: bool,
    pub prefer_const: bool,
}

impl Default for JsonModuleOptions {
    fn default() -> Self {
        Self {
            compact: false,
            exclude: Vec::new(),
            include: Vec::new(),
            indent: "\t".to_string(),
            named_exports: true,
            prefer_const: false,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(pattern) => vec![pattern],
        OneOrMany::Many(patterns) => patterns,
    })
}

//
// ──────────────────────────────────────────────────────────────────────────────
//  JSON MODULE
// ──────────────────────────────────────────────────────────────────────────────
//
// Emits an ES module for `.json` ids: one `export var key = value;` per
// top-level key that is already a legal identifier, followed by a default
// export holding every key. Non-object data (or `namedExports: false`) gets a
// single default export.
//

/// Reserved words and global builtins that cannot be exported by name.
const FORBIDDEN_IDENTIFIERS: &[&str] = &[
    "break", "case", "class", "catch", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
    "instanceof", "let", "new", "return", "super", "switch", "this", "throw", "try", "typeof",
    "var", "void", "while", "with", "yield", "enum", "await", "implements", "package",
    "protected", "static", "interface", "private", "public", "arguments", "Infinity", "NaN",
    "undefined", "null", "true", "false", "eval", "uneval", "isFinite", "isNaN", "parseFloat",
    "parseInt", "decodeURI", "decodeURIComponent", "encodeURI", "encodeURIComponent", "escape",
    "unescape", "Object", "Function", "Boolean", "Symbol", "Error", "EvalError",
    "InternalError", "RangeError", "ReferenceError", "SyntaxError", "TypeError", "URIError",
    "Number", "Math", "Date", "String", "RegExp", "Array", "Int8Array", "Uint8Array",
    "Uint8ClampedArray", "Int16Array", "Uint16Array", "Int32Array", "Uint32Array",
    "Float32Array", "Float64Array", "Map", "Set", "WeakMap", "WeakSet", "SIMD", "ArrayBuffer",
    "DataView", "JSON", "Promise", "Generator", "GeneratorFunction", "Reflect", "Proxy", "Intl",
];

#[derive(Debug, Clone)]
pub struct JsonModule {
    options: JsonModuleOptions,
    include: GlobSet,
    exclude: GlobSet,
}

impl JsonModule {
    pub fn new(options: JsonModuleOptions) -> Result<Self> {
        let include = glob_set("include", &options.include)?;
        let exclude = glob_set("exclude", &options.exclude)?;
        Ok(Self {
            options,
            include,
            exclude,
        })
    }

    /// Build from the pass-through keys split off the plugin options.
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        let options = serde_json::from_value(Value::Object(map)).context(InvalidOptionsSnafu)?;
        Self::new(options)
    }

    pub fn options(&self) -> &JsonModuleOptions {
        &self.options
    }

    fn accepts(&self, id: &str) -> bool {
        let id = id.replace('\\', "/");
        if self.exclude.is_match(&id) {
            return false;
        }
        self.options.include.is_empty() || self.include.is_match(&id)
    }

    /// Render `data` as module source.
    pub fn to_module(&self, data: &Value) -> String {
        let opts = &self.options;
        let t = if opts.compact { "" } else { opts.indent.as_str() };
        let sp = if opts.compact { "" } else { " " };
        let nl = if opts.compact { "" } else { "\n" };
        let decl = if opts.prefer_const { "const" } else { "var" };

        let map = match data {
            Value::Object(map) if opts.named_exports => map,
            _ => {
                let code = serialize(data, t, "");
                let gap = if !sp.is_empty() || code.starts_with(['{', '[', '-', '/']) {
                    sp
                } else {
                    " "
                };
                return format!("export default{gap}{code};");
            }
        };

        let mut named = String::new();
        let mut rows = Vec::with_capacity(map.len());
        for (key, value) in map {
            let value = serialize(value, t, "");
            if is_legal_identifier(key) {
                named.push_str(&format!("export {decl} {key}{sp}={sp}{value};{nl}"));
                rows.push(format!("{key}:{sp}{key}"));
            } else {
                rows.push(format!("{}:{sp}{value}", stringify(&Value::from(key.as_str()))));
            }
        }

        let rows = rows.join(&format!(",{nl}{t}"));
        format!("{named}export default{sp}{{{nl}{t}{rows}{nl}}};{nl}")
    }
}

impl EmbedTransform for JsonModule {
    fn transform(&self, code: &str, id: &str) -> Result<Option<TransformResult>> {
        if !id.ends_with(".json") || !self.accepts(id) {
            debug!(id, "json module skipped");
            return Ok(None);
        }

        match serde_json::from_str::<Value>(code) {
            Ok(data) => Ok(Some(TransformResult {
                code: self.to_module(&data),
            })),
            Err(err) => {
                warn!(id, error = %err, "could not parse JSON file");
                Ok(None)
            }
        }
    }
}

fn glob_set(option: &'static str, patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).context(InvalidPatternSnafu { option, pattern })?;
        builder.add(glob);
    }
    builder.build().context(InvalidPatternSnafu {
        option,
        pattern: patterns.join(", "),
    })
}

/// Identifiers that can be exported by name without any rewriting.
pub fn is_legal_identifier(key: &str) -> bool {
    let Some(first) = key.chars().next() else {
        return false;
    };
    !first.is_ascii_digit()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '$' || c == '_')
        && !FORBIDDEN_IDENTIFIERS.contains(&key)
}

fn serialize(value: &Value, indent: &str, base: &str) -> String {
    let inner = format!("{base}{indent}");
    let separator = if indent.is_empty() {
        String::new()
    } else {
        format!("\n{inner}")
    };
    let close = if indent.is_empty() {
        String::new()
    } else {
        format!("\n{base}")
    };

    match value {
        Value::Array(items) => {
            let mut out = String::from("[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&separator);
                out.push_str(&serialize(item, indent, &inner));
            }
            format!("{out}{close}]")
        }
        Value::Object(map) => {
            let colon = if indent.is_empty() { ":" } else { ": " };
            let mut out = String::from("{");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&separator);
                if is_legal_identifier(key) {
                    out.push_str(key);
                } else {
                    out.push_str(&stringify(&Value::from(key.as_str())));
                }
                out.push_str(colon);
                out.push_str(&serialize(item, indent, &inner));
            }
            format!("{out}{close}}}")
        }
        scalar => stringify(scalar),
    }
}

// JSON text is valid JS except for the two line separators.
fn stringify(value: &Value) -> String {
    value
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

//
// ──────────────────────────────────────────────────────────────────────────────
//  JSON TEXT
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emits the rewritten manifest as pretty-printed JSON instead of a module.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonText;

impl EmbedTransform for JsonText {
    fn transform(&self, code: &str, id: &str) -> Result<Option<TransformResult>> {
        let pretty = serde_json::from_str::<Value>(code)
            .and_then(|data| serde_json::to_string_pretty(&data))
            .map_err(|err| {
                EmbedSnafu {
                    id,
                    reason: err.to_string(),
                }
                .build()
            })?;

        Ok(Some(TransformResult {
            code: format!("{pretty}\n"),
        }))
    }
}

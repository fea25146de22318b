/*
 * Error taxonomy for the git-info plugin and its command line front end.
 *
 * This crate uses:
 * 1. snafu: For the error enum and its context selectors.
 * 2. miette: For diagnostic codes, help text and source snippets.
 * 3. serde: For machine-readable error summaries.
 */

pub mod types;

use miette::{Diagnostic, SourceSpan};
use serde::Serialize;
use tracing::error;

pub use types::*;

pub type Result<T, E = GitInfoError> = std::result::Result<T, E>;

/// Flat, serializable view of a [`GitInfoError`] for tools that consume
/// build failures as JSON.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

pub trait ReportExt {
    fn to_report(&self) -> ErrorReport;
}

impl ReportExt for GitInfoError {
    fn to_report(&self) -> ErrorReport {
        let mut causes = Vec::new();
        let mut next = std::error::Error::source(self);
        while let Some(cause) = next {
            causes.push(cause.to_string());
            next = cause.source();
        }

        let report = ErrorReport {
            title: self.to_string(),
            code: self.code().map(|c| c.to_string()),
            help: self.help().map(|h| h.to_string()),
            causes,
        };

        error!(
            title = %report.title,
            code = report.code.as_deref(),
            causes = ?report.causes,
            "git-info failure reported"
        );

        report
    }
}

/// Converts a 1-based line/column position, as reported by `serde_json`,
/// into a one-character span over `text`.
pub fn line_col_span(text: &str, line: usize, column: usize) -> SourceSpan {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let offset = (line_start + column.saturating_sub(1)).min(text.len());
    let len = usize::from(offset < text.len());
    (offset, len).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_on_first_line() {
        let span = line_col_span("{\"a\": x}", 1, 7);
        assert_eq!(span.offset(), 6);
        assert_eq!(span.len(), 1);
    }

    #[test]
    fn span_on_later_line() {
        let text = "{\n  \"a\": 1,\n  oops\n}";
        let span = line_col_span(text, 3, 3);
        assert_eq!(&text[span.offset()..span.offset() + span.len()], "o");
    }

    #[test]
    fn span_past_end_is_clamped() {
        let span = line_col_span("{", 4, 10);
        assert_eq!(span.offset(), 1);
        assert_eq!(span.len(), 0);
    }
}

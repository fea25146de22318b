//! Process-wide build timestamp.

use std::sync::LazyLock;

use chrono::Utc;

// Shared by every plugin instance so multiple outputs agree on one date.
static BUILD_DATE: LazyLock<String> =
    LazyLock::new(|| Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string());

/// The moment this process first asked for a build date, in HTTP-date form
/// (`Mon, 19 Oct 2026 17:46:00 GMT`).
pub fn build_date() -> &'static str {
    &BUILD_DATE
}

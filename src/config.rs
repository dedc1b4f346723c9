//! Compiled-in deployment configuration.
//!
//! The access code and endpoint URLs are baked into the binary on purpose:
//! the app is distributed as one artifact per classroom and none of these
//! values are end-user settings.

use std::time::Duration;

/// Shared access code teachers type to unlock the roster. Matched
/// case-insensitively.
pub const ACCESS_CODE: &str = "BEARS";

/// Deployed web-app URL acting as the spreadsheet-backed sync pipe.
/// Must end in `/exec`; an `/edit` URL is the sheet itself, not the pipe.
pub const SYNC_ENDPOINT: &str =
    "https://script.google.com/macros/s/YOUR_DEPLOYMENT_ID/exec";

/// The human-facing spreadsheet, surfaced through `health` so the UI can
/// offer an "open admin sheet" link.
pub const SPREADSHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/YOUR_SHEET_ID/edit#gid=0";

/// Fixed key the whole roster is cached under in the workspace database.
pub const CACHE_KEY: &str = "roster.students";

/// Quiet period between the last mutation and the auto-push.
pub const PUSH_QUIET_PERIOD: Duration = Duration::from_secs(2);

/// Environment variable holding the generative-language API key.
pub const SUGGEST_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Resolved sync endpoint. `ROSTERD_SYNC_ENDPOINT` overrides the compiled-in
/// URL so tests can point the adapter at a local stub.
pub fn sync_endpoint() -> String {
    std::env::var("ROSTERD_SYNC_ENDPOINT").unwrap_or_else(|_| SYNC_ENDPOINT.to_string())
}

/// Whether an endpoint URL looks like a real deployment rather than the
/// placeholder shipped in source.
pub fn endpoint_is_configured(endpoint: &str) -> bool {
    endpoint.contains("/exec") && endpoint.len() > 30 && !endpoint.contains("YOUR_DEPLOYMENT_ID")
}

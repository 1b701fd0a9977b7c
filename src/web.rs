//! HTTP front-end adapter
//!
//! Translates a query-string request into a JSON response. Hosting it
//! behind an actual HTTP server or serverless runtime is left to the
//! embedding application.

use crate::models::CheckedServer;
use crate::output::json::to_json_or_envelope;
use crate::runner::{Checker, DEFAULT_TIMEOUT_SECS};
use chrono::Utc;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Query parameter naming the host or URL to check
pub const TARGET_PARAM: &str = "target";

const ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";

/// Response handed back to the hosting runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Check the `target` query parameter against the current time
pub async fn handle_request(query: &HashMap<String, String>) -> WebResponse {
    let target = query.get(TARGET_PARAM).map(String::as_str).unwrap_or("");
    info!("web request for {:?}", target);

    let server = Checker::new()
        .with_threshold(Utc::now())
        .with_timeout(DEFAULT_TIMEOUT_SECS)
        .check(target, false)
        .await;
    response_for(&server)
}

/// 200 with the JSON result when the check passed, 401 otherwise
pub fn response_for(server: &CheckedServer) -> WebResponse {
    let status_code = if server.exit_code == 0 { 200 } else { 401 };
    WebResponse {
        status_code,
        headers: cors_headers(),
        body: to_json_or_envelope(server),
    }
}

fn cors_headers() -> BTreeMap<String, String> {
    [
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "GET,OPTIONS"),
        ("Access-Control-Allow-Headers", ALLOW_HEADERS),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

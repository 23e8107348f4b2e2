use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

/// Builds a blocking client with the configured per-call timeout. Adapters
/// build one client per call rather than pooling one.
pub fn client(timeout_secs: f64, user_agent: &str) -> Client {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs_f64(timeout_secs.max(0.001)))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Fetches `url` and parses it as JSON. `None` means the call itself failed
/// — timeout, connection reset, non-2xx status, or a non-JSON body — and the
/// caller must treat this as a transient failure, never an authoritative
/// absence.
pub fn fetch_json(client: &Client, url: &str) -> Option<Value> {
    let response = match client.get(url).send() {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(error = %e, url, "upstream request failed");
            return None;
        }
    };
    let response = match response.error_for_status() {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(error = %e, url, "upstream returned error status");
            return None;
        }
    };
    match response.json::<Value>() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(error = %e, url, "upstream returned non-JSON body");
            None
        }
    }
}

/// Minimal percent-encoding for query-string values (unreserved characters
/// pass through, everything else becomes `%XX`).
pub fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// A source-agnostic search candidate: the shape every adapter normalises
/// its raw results into before the shared matching rule runs.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub uri: String,
    pub pref_label: String,
    pub alt_labels: Vec<String>,
}

/// Shared matching rule: prefer the candidate whose `prefLabel`
/// equals the query case-insensitively, or whose `altLabel` contains the
/// query case-insensitively; otherwise the first candidate. Candidates
/// without a usable URI are skipped first.
pub fn pick_best<'a>(candidates: &'a [Candidate], query: &str) -> Option<&'a Candidate> {
    let usable: Vec<&Candidate> = candidates.iter().filter(|c| !c.uri.is_empty()).collect();
    if usable.is_empty() {
        return None;
    }
    let q = query.to_lowercase();
    usable
        .iter()
        .find(|c| {
            c.pref_label.to_lowercase() == q
                || c.alt_labels.iter().any(|a| a.to_lowercase() == q)
        })
        .copied()
        .or_else(|| usable.first().copied())
}

/// Accepts a JSON value that may be a bare string, a list of strings, or a
/// list of `{uri}`/`{value}` objects, and returns the list of strings it
/// denotes. Several upstream wire shapes (AGROVOC's `broader`, `altLabel`)
/// are documented as exactly this kind of polymorphic field.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("uri")
                    .or_else(|| obj.get("value"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

//! AGROVOC adapter (FAO Skosmos REST API).

use std::collections::HashMap;

use reqwest::blocking::Client;
use serde_json::Value;

use txr_types::{BroaderEntry, ConceptRecord, Source};

use crate::common::{fetch_json, pick_best, string_list, Candidate};

fn search_url(base_url: &str, label: &str, lang: &str) -> String {
    format!(
        "{base_url}/search/?query={}&lang={}",
        crate::common::percent_encode(label),
        crate::common::percent_encode(lang)
    )
}

fn data_url(base_url: &str, uri: &str) -> String {
    format!("{base_url}/data/?uri={}", crate::common::percent_encode(uri))
}

fn parse_candidates(body: &Value) -> Vec<Candidate> {
    body.get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .map(|r| Candidate {
                    uri: r.get("uri").and_then(Value::as_str).unwrap_or("").to_string(),
                    pref_label: r
                        .get("prefLabel")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                    alt_labels: string_list(r.get("altLabel")),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Extracts `prefLabel[lang]`, falling back to the first entry, for the
/// graph node whose `uri` matches.
fn label_for_node(graph: &[Value], uri: &str, lang: &str) -> String {
    let Some(node) = graph.iter().find(|n| n.get("uri").and_then(Value::as_str) == Some(uri))
    else {
        return String::new();
    };
    let Some(pref_labels) = node.get("prefLabel").and_then(Value::as_array) else {
        return String::new();
    };
    pref_labels
        .iter()
        .find(|l| l.get("lang").and_then(Value::as_str) == Some(lang))
        .or_else(|| pref_labels.first())
        .and_then(|l| l.get("value").and_then(Value::as_str))
        .unwrap_or("")
        .to_string()
}

/// Looks up the node matching `concept_uri` in `graph`, reads its `broader`
/// field (a string, a list of strings, or a list of `{uri}`), and resolves
/// each broader URI's label from the same graph.
fn parse_broader(graph: &[Value], concept_uri: &str, lang: &str) -> Vec<BroaderEntry> {
    let Some(node) = graph
        .iter()
        .find(|n| n.get("uri").and_then(Value::as_str) == Some(concept_uri))
    else {
        return Vec::new();
    };
    string_list(node.get("broader"))
        .into_iter()
        .map(|uri| {
            let label = label_for_node(graph, &uri, lang);
            BroaderEntry { uri, label }
        })
        .collect()
}

fn fetch_broader(client: &Client, base_url: &str, uri: &str, lang: &str) -> Vec<BroaderEntry> {
    let Some(body) = fetch_json(client, &data_url(base_url, uri)) else {
        tracing::debug!(uri, "agrovoc broader fetch failed, degrading to empty broader");
        return Vec::new();
    };
    let graph = body.get("graph").and_then(Value::as_array).cloned().unwrap_or_default();
    parse_broader(&graph, uri, lang)
}

/// Returns `(record, transient_failure)`. `transient_failure = true` means
/// the caller must not record an absence.
pub fn search(client: &Client, base_url: &str, label: &str, lang: &str) -> (Option<ConceptRecord>, bool) {
    let Some(body) = fetch_json(client, &search_url(base_url, label, lang)) else {
        return (None, true);
    };
    let candidates = parse_candidates(&body);
    let Some(best) = pick_best(&candidates, label) else {
        return (None, false);
    };

    let broader = fetch_broader(client, base_url, &best.uri, lang);
    let mut record = ConceptRecord::new(best.uri.clone(), best.pref_label.clone(), Source::Agrovoc);
    record.broader = broader;
    if !best.alt_labels.is_empty() {
        let mut alt = HashMap::new();
        alt.insert(lang.to_string(), best.alt_labels.clone());
        record.alt_label = Some(alt);
    }
    (Some(record), false)
}

/// Fetches the same `/data/` payload as `search`'s broader step and returns
/// every `prefLabel` entry whose `lang` is in `languages`.
pub fn labels(client: &Client, base_url: &str, uri: &str, languages: &[String]) -> HashMap<String, String> {
    let Some(body) = fetch_json(client, &data_url(base_url, uri)) else {
        return HashMap::new();
    };
    let Some(graph) = body.get("graph").and_then(Value::as_array) else {
        return HashMap::new();
    };
    let Some(node) = graph.iter().find(|n| n.get("uri").and_then(Value::as_str) == Some(uri)) else {
        return HashMap::new();
    };
    let Some(pref_labels) = node.get("prefLabel").and_then(Value::as_array) else {
        return HashMap::new();
    };
    let mut out = HashMap::new();
    for entry in pref_labels {
        let Some(lang) = entry.get("lang").and_then(Value::as_str) else {
            continue;
        };
        if !languages.iter().any(|l| l == lang) {
            continue;
        }
        if let Some(value) = entry.get("value").and_then(Value::as_str) {
            out.insert(lang.to_string(), value.to_string());
        }
    }
    out
}

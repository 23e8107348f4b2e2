//! DBpedia adapter (Lookup + Data REST APIs).

use std::collections::HashMap;

use reqwest::blocking::Client;
use serde_json::Value;

use txr_types::{BroaderEntry, ConceptRecord, Source};

use crate::common::{fetch_json, pick_best, percent_encode, Candidate};

const SKOS_BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
const ONTOLOGY_BROADER: &str = "http://dbpedia.org/ontology/broader";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

fn search_url(lookup_base_url: &str, label: &str, lang: &str) -> String {
    format!(
        "{lookup_base_url}?query={}&format=JSON&maxResults=5&language={}",
        percent_encode(label),
        percent_encode(lang)
    )
}

/// `http://dbpedia.org/resource/X` → `<data_base_url>/X.json`.
fn data_url(data_base_url: &str, resource_uri: &str) -> Option<String> {
    let name = resource_uri.rsplit_once("/resource/").map(|(_, name)| name)?;
    Some(format!("{data_base_url}/{name}.json"))
}

fn first_string(value: Option<&Value>) -> Option<String> {
    value?.as_array()?.first()?.as_str().map(str::to_string)
}

fn parse_candidates(body: &Value) -> Vec<Candidate> {
    body.get("docs")
        .and_then(Value::as_array)
        .map(|docs| {
            docs.iter()
                .map(|d| Candidate {
                    uri: first_string(d.get("resource")).unwrap_or_default(),
                    pref_label: first_string(d.get("label")).unwrap_or_default(),
                    alt_labels: Vec::new(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// The matched candidate's own `comment[0]`, not merely the first search hit
/// — `pick_best` may have selected a candidate other than `docs[0]`.
fn description(body: &Value, uri: &str) -> Option<String> {
    body.get("docs")
        .and_then(Value::as_array)
        .and_then(|docs| {
            docs.iter()
                .find(|d| first_string(d.get("resource")).as_deref() == Some(uri))
        })
        .and_then(|d| first_string(d.get("comment")))
}

/// Reads the `skos:broader` (falling back to `dbo:broader`) entries whose
/// `type == "uri"` out of the per-resource JSON-LD-ish payload at
/// `data[uri]`.
fn broader_uris(data: &Value, uri: &str) -> Vec<String> {
    let node = data.get(uri);
    let list = node
        .and_then(|n| n.get(SKOS_BROADER))
        .and_then(Value::as_array)
        .or_else(|| node.and_then(|n| n.get(ONTOLOGY_BROADER)).and_then(Value::as_array));
    list.map(|entries| {
        entries
            .iter()
            .filter(|e| e.get("type").and_then(Value::as_str) == Some("uri"))
            .filter_map(|e| e.get("value").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn label_for(data: &Value, uri: &str, lang: &str) -> String {
    let Some(entries) = data.get(uri).and_then(|n| n.get(RDFS_LABEL)).and_then(Value::as_array) else {
        return String::new();
    };
    entries
        .iter()
        .find(|e| e.get("lang").and_then(Value::as_str) == Some(lang))
        .and_then(|e| e.get("value").and_then(Value::as_str))
        .unwrap_or("")
        .to_string()
}

fn fetch_broader(client: &Client, data_base_url: &str, uri: &str, lang: &str) -> Vec<BroaderEntry> {
    let Some(url) = data_url(data_base_url, uri) else {
        return Vec::new();
    };
    let Some(data) = fetch_json(client, &url) else {
        tracing::debug!(uri, "dbpedia broader fetch failed, degrading to empty broader");
        return Vec::new();
    };
    broader_uris(&data, uri)
        .into_iter()
        .map(|broader_uri| {
            let label = label_for(&data, &broader_uri, lang);
            BroaderEntry { uri: broader_uri, label }
        })
        .collect()
}

pub fn search(
    client: &Client,
    lookup_base_url: &str,
    data_base_url: &str,
    label: &str,
    lang: &str,
) -> (Option<ConceptRecord>, bool) {
    let Some(body) = fetch_json(client, &search_url(lookup_base_url, label, lang)) else {
        return (None, true);
    };
    let candidates = parse_candidates(&body);
    let Some(best) = pick_best(&candidates, label) else {
        return (None, false);
    };

    let mut record = ConceptRecord::new(best.uri.clone(), best.pref_label.clone(), Source::Dbpedia);
    record.description = description(&body, &best.uri);
    record.broader = fetch_broader(client, data_base_url, &best.uri, lang);
    (Some(record), false)
}

pub fn labels(client: &Client, data_base_url: &str, uri: &str, languages: &[String]) -> HashMap<String, String> {
    let Some(url) = data_url(data_base_url, uri) else {
        return HashMap::new();
    };
    let Some(data) = fetch_json(client, &url) else {
        return HashMap::new();
    };
    let Some(entries) = data.get(uri).and_then(|n| n.get(RDFS_LABEL)).and_then(Value::as_array) else {
        return HashMap::new();
    };
    let mut out = HashMap::new();
    for entry in entries {
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

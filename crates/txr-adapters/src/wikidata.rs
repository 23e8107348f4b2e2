//! Wikidata adapter (MediaWiki Action API + Wikibase REST).

use std::collections::HashMap;

use reqwest::blocking::Client;
use serde_json::Value;

use txr_types::{BroaderEntry, ConceptRecord, Source};

use crate::common::{fetch_json, percent_encode, pick_best, Candidate};

const ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

fn search_url(base_url: &str, label: &str, lang: &str) -> String {
    format!(
        "{base_url}/w/api.php?action=wbsearchentities&search={}&language={}&type=item&format=json&limit=5",
        percent_encode(label),
        percent_encode(lang)
    )
}

fn entities_url(base_url: &str, ids: &[String], languages: Option<&str>) -> String {
    let ids = ids.join("|");
    match languages {
        Some(langs) => format!(
            "{base_url}/w/api.php?action=wbgetentities&ids={ids}&props=claims|labels&languages={langs}&format=json"
        ),
        None => format!("{base_url}/w/api.php?action=wbgetentities&ids={ids}&props=labels&format=json"),
    }
}

fn labels_rest_url(base_url: &str, qid: &str) -> String {
    format!("{base_url}/w/rest.php/wikibase/v0/entities/items/{qid}/labels")
}

fn qid_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(ENTITY_PREFIX)
}

fn parse_candidates(body: &Value) -> Vec<Candidate> {
    body.get("search")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .map(|r| {
                    let id = r.get("id").and_then(Value::as_str).unwrap_or("");
                    Candidate {
                        uri: if id.is_empty() {
                            String::new()
                        } else {
                            format!("{ENTITY_PREFIX}{id}")
                        },
                        pref_label: r.get("label").and_then(Value::as_str).unwrap_or("").to_string(),
                        alt_labels: Vec::new(),
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Reads `claims.P279[]` for `qid`, keeping only claims whose `mainsnak` is
/// an actual value (not `somevalue`/`novalue`), and returns the broader
/// item's QID for each.
fn broader_qids(entities_body: &Value, qid: &str) -> Vec<String> {
    let claims = entities_body
        .get("entities")
        .and_then(|e| e.get(qid))
        .and_then(|e| e.get("claims"))
        .and_then(|c| c.get("P279"))
        .and_then(Value::as_array);
    let Some(claims) = claims else {
        return Vec::new();
    };
    claims
        .iter()
        .filter(|c| c.get("mainsnak").and_then(|m| m.get("snaktype")).and_then(Value::as_str) == Some("value"))
        .filter_map(|c| {
            c.get("mainsnak")
                .and_then(|m| m.get("datavalue"))
                .and_then(|d| d.get("value"))
                .and_then(|v| v.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect()
}

fn fetch_broader(client: &Client, base_url: &str, qid: &str, lang: &str) -> Vec<BroaderEntry> {
    let Some(claims_body) = fetch_json(client, &entities_url(base_url, &[qid.to_string()], Some(lang))) else {
        tracing::debug!(qid, "wikidata claims fetch failed, degrading to empty broader");
        return Vec::new();
    };
    let broader_ids = broader_qids(&claims_body, qid);
    if broader_ids.is_empty() {
        return Vec::new();
    }

    // Batched follow-up call for the union of broader QIDs' labels.
    let Some(labels_body) = fetch_json(client, &entities_url(base_url, &broader_ids, None)) else {
        return broader_ids
            .into_iter()
            .map(|id| BroaderEntry {
                uri: format!("{ENTITY_PREFIX}{id}"),
                label: String::new(),
            })
            .collect();
    };
    broader_ids
        .into_iter()
        .map(|id| {
            let label = labels_body
                .get("entities")
                .and_then(|e| e.get(&id))
                .and_then(|e| e.get("labels"))
                .and_then(|l| l.get(lang))
                .and_then(|l| l.get("value"))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            BroaderEntry {
                uri: format!("{ENTITY_PREFIX}{id}"),
                label,
            }
        })
        .collect()
}

pub fn search(client: &Client, base_url: &str, label: &str, lang: &str) -> (Option<ConceptRecord>, bool) {
    let Some(body) = fetch_json(client, &search_url(base_url, label, lang)) else {
        return (None, true);
    };
    let candidates = parse_candidates(&body);
    let Some(best) = pick_best(&candidates, label) else {
        return (None, false);
    };
    let Some(qid) = qid_from_uri(&best.uri) else {
        return (None, false);
    };

    let mut record = ConceptRecord::new(best.uri.clone(), best.pref_label.clone(), Source::Wikidata);
    record.broader = fetch_broader(client, base_url, qid, lang);
    (Some(record), false)
}

pub fn labels(client: &Client, base_url: &str, uri: &str, languages: &[String]) -> HashMap<String, String> {
    let Some(qid) = qid_from_uri(uri) else {
        return HashMap::new();
    };
    let Some(body) = fetch_json(client, &labels_rest_url(base_url, qid)) else {
        return HashMap::new();
    };
    let Some(map) = body.as_object() else {
        return HashMap::new();
    };
    let mut out = HashMap::new();
    for lang in languages {
        if let Some(value) = map.get(lang).and_then(Value::as_str) {
            out.insert(lang.clone(), value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qid_extraction() {
        assert_eq!(qid_from_uri("http://www.wikidata.org/entity/Q10998"), Some("Q10998"));
        assert_eq!(qid_from_uri("not a wikidata uri"), None);
    }

    #[test]
    fn parses_search_results() {
        let body = serde_json::json!({
            "search": [
                {"id": "Q10998", "label": "potato"},
                {"id": "Q11007", "label": "tomato"},
            ]
        });
        let candidates = parse_candidates(&body);
        assert_eq!(candidates[0].uri, "http://www.wikidata.org/entity/Q10998");
        let best = pick_best(&candidates, "tomato").unwrap();
        assert_eq!(best.uri, "http://www.wikidata.org/entity/Q11007");
    }

    #[test]
    fn broader_skips_somevalue_claims() {
        let body = serde_json::json!({
            "entities": {
                "Q10998": {
                    "claims": {
                        "P279": [
                            {"mainsnak": {"snaktype": "somevalue"}},
                            {"mainsnak": {"snaktype": "value", "datavalue": {"value": {"id": "Q11004"}}}}
                        ]
                    }
                }
            }
        });
        let ids = broader_qids(&body, "Q10998");
        assert_eq!(ids, vec!["Q11004".to_string()]);
    }
}

use std::collections::HashMap;

use txr_types::{ConceptRecord, Source};

use crate::{agrovoc, common, dbpedia, wikidata};

/// Everything an adapter call needs to know about where to send requests and
/// how long to wait, independent of any particular lookup.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub agrovoc_base_url: String,
    pub dbpedia_lookup_base_url: String,
    pub dbpedia_data_base_url: String,
    pub wikidata_base_url: String,
    pub http_timeout_secs: f64,
    pub user_agent: String,
}

/// Dispatches `search` to the adapter named by `source`. Returns
/// `(record, transient_failure)` exactly as each adapter does.
pub fn search(config: &AdapterConfig, source: Source, label: &str, lang: &str) -> (Option<ConceptRecord>, bool) {
    let client = common::client(config.http_timeout_secs, &config.user_agent);
    match source {
        Source::Agrovoc => agrovoc::search(&client, &config.agrovoc_base_url, label, lang),
        Source::Dbpedia => dbpedia::search(
            &client,
            &config.dbpedia_lookup_base_url,
            &config.dbpedia_data_base_url,
            label,
            lang,
        ),
        Source::Wikidata => wikidata::search(&client, &config.wikidata_base_url, label, lang),
    }
}

/// Dispatches `labels` to the adapter named by `source`. Returns an empty
/// map on any failure — the caller gracefully degrades and never caches
/// emptiness as if it were authoritative.
pub fn labels(config: &AdapterConfig, source: Source, uri: &str, languages: &[String]) -> HashMap<String, String> {
    let client = common::client(config.http_timeout_secs, &config.user_agent);
    match source {
        Source::Agrovoc => agrovoc::labels(&client, &config.agrovoc_base_url, uri, languages),
        Source::Dbpedia => dbpedia::labels(&client, &config.dbpedia_data_base_url, uri, languages),
        Source::Wikidata => wikidata::labels(&client, &config.wikidata_base_url, uri, languages),
    }
}

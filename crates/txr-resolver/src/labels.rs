use std::collections::HashMap;
use std::str::FromStr;

use rayon::prelude::*;
use txr_cache::{load_key, save_key};
use txr_types::{keys::labels_key, LabelsRecord, Source};

use crate::config::ResolverConfig;

/// Cache-through multilingual label retrieval.
///
/// Empty `uri` or `languages` short-circuits to `{}` without touching the
/// filesystem or network at all.
pub fn get_labels(
    config: &ResolverConfig,
    uri: &str,
    languages: &[String],
    source: &str,
) -> HashMap<String, String> {
    if uri.is_empty() || languages.is_empty() {
        return HashMap::new();
    }
    let Ok(source) = Source::from_str(source) else {
        return HashMap::new();
    };
    get_labels_source(config, uri, languages, source)
}

fn project(labels: &HashMap<String, String>, languages: &[String]) -> HashMap<String, String> {
    languages
        .iter()
        .filter_map(|lang| labels.get(lang).map(|v| (lang.clone(), v.clone())))
        .collect()
}

fn get_labels_source(
    config: &ResolverConfig,
    uri: &str,
    languages: &[String],
    source: Source,
) -> HashMap<String, String> {
    let key = labels_key(source, uri);

    if let Some(cached) = load_key::<LabelsRecord>(&config.cache_dir, &key, config.cache_ttl_secs) {
        return project(&cached.labels, languages);
    }

    let fetched = txr_adapters::labels(&config.adapters, source, uri, languages);
    if !fetched.is_empty() {
        let record = LabelsRecord {
            uri: uri.to_string(),
            source: source.as_str().to_string(),
            labels: fetched.clone(),
            cached_at: None,
        };
        save_key(&config.cache_dir, &key, &record);
    }
    project(&fetched, languages)
}

/// Independent [`get_labels`] per URI. Correctness must not depend on
/// ordering, so the batch runs each URI's lookup in parallel.
pub fn get_labels_batch(
    config: &ResolverConfig,
    uris: &[String],
    languages: &[String],
    source: &str,
) -> HashMap<String, HashMap<String, String>> {
    let Ok(source) = Source::from_str(source) else {
        return uris.iter().map(|u| (u.clone(), HashMap::new())).collect();
    };
    uris.par_iter()
        .map(|uri| (uri.clone(), get_labels_source(config, uri, languages, source)))
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use txr_adapters::AdapterConfig;

    use super::*;

    fn config(cache_dir: std::path::PathBuf) -> ResolverConfig {
        ResolverConfig {
            cache_dir,
            cache_ttl_secs: 60.0,
            adapters: AdapterConfig {
                agrovoc_base_url: "http://127.0.0.1:1".to_string(),
                dbpedia_lookup_base_url: "http://127.0.0.1:1".to_string(),
                dbpedia_data_base_url: "http://127.0.0.1:1".to_string(),
                wikidata_base_url: "http://127.0.0.1:1".to_string(),
                http_timeout_secs: 0.2,
                user_agent: "txr-test/0 (SKOS lookup service)".to_string(),
            },
        }
    }

    #[test]
    fn empty_uri_short_circuits() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path().to_path_buf());
        let result = get_labels(&cfg, "", &["en".to_string()], "agrovoc");
        assert!(result.is_empty());
    }

    #[test]
    fn empty_languages_short_circuits() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path().to_path_buf());
        let result = get_labels(&cfg, "http://example/c1", &[], "agrovoc");
        assert!(result.is_empty());
    }

    #[test]
    fn projects_only_requested_languages() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path().to_path_buf());
        let mut labels = HashMap::new();
        labels.insert("en".to_string(), "Potatoes".to_string());
        labels.insert("fr".to_string(), "Pommes de terre".to_string());
        let record = LabelsRecord {
            uri: "http://example/c1".to_string(),
            source: "agrovoc".to_string(),
            labels,
            cached_at: None,
        };
        let key = labels_key(Source::Agrovoc, "http://example/c1");
        save_key(&cfg.cache_dir, &key, &record);

        let result = get_labels(
            &cfg,
            "http://example/c1",
            &["en".to_string(), "de".to_string()],
            "agrovoc",
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("en").unwrap(), "Potatoes");
    }

    #[test]
    fn batch_is_independent_per_uri() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path().to_path_buf());
        let mut labels = HashMap::new();
        labels.insert("en".to_string(), "Potatoes".to_string());
        let record = LabelsRecord {
            uri: "http://example/c1".to_string(),
            source: "agrovoc".to_string(),
            labels,
            cached_at: None,
        };
        let key = labels_key(Source::Agrovoc, "http://example/c1");
        save_key(&cfg.cache_dir, &key, &record);

        let result = get_labels_batch(
            &cfg,
            &["http://example/c1".to_string(), "http://example/c2".to_string()],
            &["en".to_string()],
            "agrovoc",
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result["http://example/c1"].get("en").unwrap(), "Potatoes");
        assert!(result["http://example/c2"].is_empty());
    }
}

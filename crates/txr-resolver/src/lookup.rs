use std::str::FromStr;

use txr_cache::{add_negative, is_negative, load_key, save_key};
use txr_types::{keys::concept_key, ConceptRecord, Source};

use crate::config::ResolverConfig;

/// Cache-through concept lookup:
///
/// 1. positive cache → 2. negative cache → 3. upstream search.
/// A transient upstream failure touches neither cache. A single call makes
/// at most one upstream attempt and writes at most one cache file.
pub fn lookup(config: &ResolverConfig, label: &str, lang: &str, source: &str) -> Option<ConceptRecord> {
    let Ok(source) = Source::from_str(source) else {
        tracing::debug!(source, "unknown source in lookup, treating as absent");
        return None;
    };
    lookup_source(config, label, lang, source)
}

pub(crate) fn lookup_source(
    config: &ResolverConfig,
    label: &str,
    lang: &str,
    source: Source,
) -> Option<ConceptRecord> {
    let key = concept_key(source, lang, label);

    if let Some(mut record) = load_key::<ConceptRecord>(&config.cache_dir, &key, config.cache_ttl_secs) {
        if record.is_present() {
            record.drop_empty_broader();
            return Some(record);
        }
    }

    if is_negative(&config.cache_dir, &key, config.cache_ttl_secs) {
        return None;
    }

    let (result, transient_failure) = txr_adapters::search(&config.adapters, source, label, lang);
    if transient_failure {
        return None;
    }

    match result {
        Some(record) => Some(save_key(&config.cache_dir, &key, &record)),
        None => {
            add_negative(&config.cache_dir, &key);
            None
        }
    }
}

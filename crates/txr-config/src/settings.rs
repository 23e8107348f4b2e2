use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Cache TTL: 60 days, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: f64 = 60.0 * 60.0 * 24.0 * 60.0;
pub const DEFAULT_HTTP_TIMEOUT_SECS: f64 = 10.0;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Settings {
    pub cache_dir: String,
    pub cache_ttl_secs: f64,
    pub http_timeout_secs: f64,
    pub agrovoc_base_url: String,
    pub dbpedia_lookup_base_url: String,
    pub dbpedia_data_base_url: String,
    pub wikidata_base_url: String,
    pub bind_addr: String,
    pub app_name: String,
    pub app_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: "./cache".to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            agrovoc_base_url: "https://agrovoc.fao.org/browse/rest/v1".to_string(),
            dbpedia_lookup_base_url: "https://lookup.dbpedia.org/api/search".to_string(),
            dbpedia_data_base_url: "https://dbpedia.org/data".to_string(),
            wikidata_base_url: "https://www.wikidata.org".to_string(),
            bind_addr: "0.0.0.0:8083".to_string(),
            app_name: "txr".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from environment variables prefixed `TXR_` (e.g. `TXR_CACHE_DIR`),
    /// falling back to the defaults above for anything unset.
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let s = Config::builder()
            .set_default("cache_dir", defaults.cache_dir.clone())?
            .set_default("cache_ttl_secs", defaults.cache_ttl_secs)?
            .set_default("http_timeout_secs", defaults.http_timeout_secs)?
            .set_default("agrovoc_base_url", defaults.agrovoc_base_url.clone())?
            .set_default(
                "dbpedia_lookup_base_url",
                defaults.dbpedia_lookup_base_url.clone(),
            )?
            .set_default(
                "dbpedia_data_base_url",
                defaults.dbpedia_data_base_url.clone(),
            )?
            .set_default("wikidata_base_url", defaults.wikidata_base_url.clone())?
            .set_default("bind_addr", defaults.bind_addr.clone())?
            .set_default("app_name", defaults.app_name.clone())?
            .set_default("app_version", defaults.app_version.clone())?
            .add_source(Environment::default().prefix("txr").try_parsing(true))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    pub fn user_agent(&self) -> String {
        format!("{}/{} (SKOS lookup service)", self.app_name, self.app_version)
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing_subscriber::filter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use txr_config::globals::SETTINGS;
use txr_config::Settings;
use txr_resolver::ResolverConfig;

mod serve;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP lookup proxy.
    Serve,
    /// Print a non-recursive scan of the on-disk cache.
    CacheStats,
    /// Resolve one label against one source, populating the cache on a miss.
    Warm {
        label: String,
        #[arg(default_value = "en")]
        lang: String,
        #[arg(default_value = "agrovoc")]
        source: String,
    },
}

fn resolver_config(settings: &Settings) -> ResolverConfig {
    ResolverConfig {
        cache_dir: PathBuf::from(&settings.cache_dir),
        cache_ttl_secs: settings.cache_ttl_secs,
        adapters: txr_adapters::AdapterConfig {
            agrovoc_base_url: settings.agrovoc_base_url.clone(),
            dbpedia_lookup_base_url: settings.dbpedia_lookup_base_url.clone(),
            dbpedia_data_base_url: settings.dbpedia_data_base_url.clone(),
            wikidata_base_url: settings.wikidata_base_url.clone(),
            http_timeout_secs: settings.http_timeout_secs,
            user_agent: settings.user_agent(),
        },
    }
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = cli.verbose.tracing_level_filter();
    let filter = filter::Targets::new()
        .with_target("txr", level)
        .with_target("txr_cache", level)
        .with_target("txr_adapters", level)
        .with_target("txr_resolver", level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().without_time().compact())
        .with(filter)
        .init();

    let settings = Settings::new()?;
    let _ = SETTINGS.set(settings.clone());

    match cli.command {
        Commands::Serve => serve::serve(resolver_config(&settings), &settings.bind_addr)?,
        Commands::CacheStats => {
            let stats = txr_cache::cache_stats(&PathBuf::from(&settings.cache_dir));
            tracing::info!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Warm { label, lang, source } => {
            let config = resolver_config(&settings);
            match txr_resolver::lookup(&config, &label, &lang, &source) {
                Some(record) => tracing::info!("{}", serde_json::to_string_pretty(&record)?),
                None => tracing::info!(label, lang, source, "not found"),
            }
        }
    }
    Ok(())
}

//! Per-source upstream adapters (AGROVOC, DBpedia, Wikidata): search, broader
//! fetch, and multilingual label fetch, each normalising its source's wire
//! shape into the shared [`txr_types::ConceptRecord`].

pub mod agrovoc;
pub mod common;
pub mod dbpedia;
pub mod dispatch;
pub mod error;
pub mod wikidata;

pub use dispatch::{search, labels, AdapterConfig};
pub use error::AdapterError;

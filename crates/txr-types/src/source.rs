use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three upstream taxonomies the resolver knows how to query.
///
/// Unknown source strings are not an error to throw — an unrecognised source
/// must surface as absent-with-transient-failure so callers degrade
/// gracefully instead of the whole request failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Agrovoc,
    Dbpedia,
    Wikidata,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Agrovoc => "agrovoc",
            Source::Dbpedia => "dbpedia",
            Source::Wikidata => "wikidata",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownSource;

impl fmt::Display for UnknownSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown source")
    }
}

impl std::error::Error for UnknownSource {}

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agrovoc" => Ok(Source::Agrovoc),
            "dbpedia" => Ok(Source::Dbpedia),
            "wikidata" => Ok(Source::Wikidata),
            _ => Err(UnknownSource),
        }
    }
}

pub mod concept;
pub mod keys;
pub mod root_remap;
pub mod source;

pub use concept::{
    BroaderEntry, Cached, ConceptRecord, LabelsRecord, NegativeCacheFile, NegativeEntry,
};
pub use source::{Source, UnknownSource};

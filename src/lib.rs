pub mod absorber;
pub mod canonicalize;
pub mod config;
pub mod dedup;
pub mod error;
pub mod filter;
pub mod fuzzy_matcher;
pub mod ingestion;
pub mod label_map;
pub mod normalizer;
pub mod summary;

pub use canonicalize::{Canonicalization, Canonicalizer, LabeledRow};
pub use config::{CanonConfig, SynonymRule};
pub use error::{CanonError, Result};
pub use label_map::LabelMap;

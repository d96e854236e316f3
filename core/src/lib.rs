//! In-memory document base: an inverted index plus a TF-IDF vector space model,
//! grown one committed document at a time and ranked by cosine similarity.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod corpus;
pub mod docbase;
pub mod error;
pub mod features;
pub mod index;
pub mod search;
pub mod shared;
pub mod transaction;
pub mod vector;
pub mod vsm;

pub use analysis::{Analysis, Analyzer, DocumentReport, Language, LanguageRegistry, Source};
pub use batch::{discover_sources, ingest_all, BatchReport, IngestOutcome};
pub use config::DocBaseConfig;
pub use corpus::{DocId, DocumentRecord};
pub use docbase::{DocBase, FullReport};
pub use error::{Error, Result};
pub use features::{FeatureEntry, IdfWeighting};
pub use index::{IndexEntry, Occurrence};
pub use search::SearchHit;
pub use shared::SharedDocBase;
pub use transaction::Transaction;

use std::path::PathBuf;

use thiserror::Error;

use crate::corpus::DocId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid transaction state: {0}")]
    InvalidState(&'static str),

    #[error("query yields no terms after analysis")]
    EmptyQuery,

    #[error("cosine similarity is undefined for a zero vector")]
    DegenerateVector,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("document {0} is already indexed")]
    AlreadyIndexed(DocId),
}

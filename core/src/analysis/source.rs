use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Where a document's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A text file on disk; the path is the display name.
    File(PathBuf),
    /// Text supplied directly, e.g. a query or an uploaded document.
    RawText { name: String, text: String },
}

impl Source {
    pub fn file<P: AsRef<Path>>(path: P) -> Self { Source::File(path.as_ref().to_path_buf()) }

    pub fn raw<N: Into<String>, T: Into<String>>(name: N, text: T) -> Self {
        Source::RawText { name: name.into(), text: text.into() }
    }

    pub fn name(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::RawText { name, .. } => name.clone(),
        }
    }

    /// Files are decoded as UTF-8, replacing invalid sequences.
    pub fn extract_raw_text(&self) -> Result<String> {
        match self {
            Source::File(path) => match fs::read(path) {
                Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
                Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound(path.clone())),
                Err(source) => Err(Error::Io { path: path.clone(), source }),
            },
            Source::RawText { text, .. } => Ok(text.clone()),
        }
    }
}

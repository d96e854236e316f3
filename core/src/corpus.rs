use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::fmt;

/// Content-addressed document identifier: hex SHA-1 of the raw text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn from_content(text: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(text.as_bytes());
        DocId(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<String> for DocId {
    fn from(s: String) -> Self { DocId(s) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocId,
    pub raw_text: String,
    /// Language the document was processed with (after fallback).
    pub lang: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

#[derive(Debug, Default, Clone)]
pub struct CorpusStore {
    docs: BTreeMap<DocId, DocumentRecord>,
}

impl CorpusStore {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, record: DocumentRecord) {
        self.docs.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &DocId) -> Option<&DocumentRecord> { self.docs.get(id) }

    pub fn contains(&self, id: &DocId) -> bool { self.docs.contains_key(id) }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> { self.docs.values() }

    /// Min, max and mean raw-text length in characters; `None` for an empty corpus.
    pub fn length_stats(&self) -> Option<LengthStats> {
        let lengths: Vec<usize> = self.docs.values().map(|d| d.raw_text.chars().count()).collect();
        let min = *lengths.iter().min()?;
        let max = *lengths.iter().max()?;
        let mean = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
        Some(LengthStats { min, max, mean })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> DocumentRecord {
        DocumentRecord { id: DocId::from_content(text), raw_text: text.into(), lang: "en".into(), name: text.into() }
    }

    #[test]
    fn doc_id_is_sha1_hex() {
        let id = DocId::from_content("abc");
        assert_eq!(id.as_str(), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn identical_content_collides() {
        assert_eq!(DocId::from_content("same"), DocId::from_content("same"));
        assert_ne!(DocId::from_content("same"), DocId::from_content("other"));
    }

    #[test]
    fn length_stats_use_mean() {
        let mut store = CorpusStore::new();
        assert!(store.length_stats().is_none());
        store.insert(record("ab"));
        store.insert(record("abcd"));
        store.insert(record("abcdefghi"));
        let stats = store.length_stats().unwrap();
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 9);
        assert!((stats.mean - 5.0).abs() < 1e-12);
    }
}

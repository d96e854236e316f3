use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::corpus::DocId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub doc_id: DocId,
    pub positions: Vec<usize>, // token positions, ascending
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub term: String,
    pub occurrences: Vec<Occurrence>, // in commit order
}

#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    entries: HashMap<String, IndexEntry>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Merge one document's position lists: append for known terms, insert for new ones.
    pub fn merge<'a, I>(&mut self, doc_id: &DocId, staged: I)
    where
        I: IntoIterator<Item = (&'a str, &'a [usize])>,
    {
        for (term, positions) in staged {
            let occurrence = Occurrence { doc_id: doc_id.clone(), positions: positions.to_vec() };
            self.entries
                .entry(term.to_string())
                .or_insert_with(|| IndexEntry { term: term.to_string(), occurrences: Vec::new() })
                .occurrences
                .push(occurrence);
        }
    }

    pub fn get(&self, term: &str) -> Option<&IndexEntry> { self.entries.get(term) }

    pub fn contains(&self, term: &str) -> bool { self.entries.contains_key(term) }

    pub fn term_count(&self) -> usize { self.entries.len() }

    pub fn terms(&self) -> impl Iterator<Item = &str> { self.entries.keys().map(String::as_str) }
}

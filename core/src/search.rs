use serde::Serialize;
use std::cmp::Ordering;

use crate::corpus::{CorpusStore, DocId};
use crate::vector::{cosine_similarity, norm};
use crate::vsm::VectorSpace;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Cosine similarity, in (0, 1].
    pub similarity: f64,
    pub name: String,
    pub doc_id: DocId,
}

/// Score `query` against every stored vector. Non-positive and undefined
/// (zero-vector) similarities are dropped. Ordered by similarity descending,
/// then name, then document id.
pub(crate) fn rank(query: &[f64], space: &VectorSpace, corpus: &CorpusStore) -> Vec<SearchHit> {
    if norm(query) == 0.0 {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for (doc_id, vector) in space.vectors() {
        let Ok(similarity) = cosine_similarity(query, vector) else {
            tracing::trace!(%doc_id, "skipping zero vector");
            continue;
        };
        if similarity <= 0.0 {
            continue;
        }
        let name = corpus.get(doc_id).map(|d| d.name.clone()).unwrap_or_default();
        hits.push(SearchHit { similarity: similarity.min(1.0), name, doc_id: doc_id.clone() });
    }
    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
    hits
}

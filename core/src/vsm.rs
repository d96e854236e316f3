//! Vector space model: a stable term -> dimension layout and one dense tf-idf
//! vector per document, always as long as the layout.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::corpus::DocId;
use crate::features::FeatureTable;

/// Term -> dimension index. Indices are handed out once, in order, and never reused.
#[derive(Debug, Default, Clone)]
pub struct DimensionMap {
    index: HashMap<String, usize>,
    terms: Vec<String>,
}

impl DimensionMap {
    pub fn new() -> Self { Self::default() }

    /// Returns the dimension of `term`, assigning the next one if it is unknown.
    pub fn assign(&mut self, term: &str) -> usize {
        if let Some(&dim) = self.index.get(term) {
            return dim;
        }
        let dim = self.terms.len();
        self.index.insert(term.to_string(), dim);
        self.terms.push(term.to_string());
        dim
    }

    pub fn get(&self, term: &str) -> Option<usize> { self.index.get(term).copied() }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Terms in dimension order.
    pub fn terms(&self) -> &[String] { &self.terms }
}

#[derive(Debug, Default, Clone)]
pub struct VectorSpace {
    dimensions: DimensionMap,
    vectors: BTreeMap<DocId, Vec<f64>>,
}

impl VectorSpace {
    pub fn new() -> Self { Self::default() }

    pub fn dimensions(&self) -> &DimensionMap { &self.dimensions }

    pub fn vector(&self, doc_id: &DocId) -> Option<&[f64]> { self.vectors.get(doc_id).map(Vec::as_slice) }

    pub fn vectors(&self) -> impl Iterator<Item = (&DocId, &[f64])> {
        self.vectors.iter().map(|(id, v)| (id, v.as_slice()))
    }

    pub fn snapshot(&self) -> BTreeMap<DocId, Vec<f64>> { self.vectors.clone() }

    /// Give each new term the next dimension and back-fill every stored vector with its coordinate.
    pub fn extend(&mut self, new_terms: &[String], features: &FeatureTable) {
        for term in new_terms {
            let dim = self.dimensions.assign(term);
            let entry = features.get(term);
            for (doc_id, vector) in self.vectors.iter_mut() {
                debug_assert_eq!(vector.len(), dim);
                vector.push(entry.map_or(0.0, |e| e.weight(doc_id)));
            }
        }
    }

    /// Rewrite the non-zero coordinates of every stored vector with the current idf.
    pub fn refresh(&mut self, features: &FeatureTable) {
        for (dim, term) in self.dimensions.terms().iter().enumerate() {
            let Some(entry) = features.get(term) else { continue };
            for (doc_id, tf) in &entry.tf {
                if let Some(vector) = self.vectors.get_mut(doc_id) {
                    vector[dim] = entry.idf * tf;
                }
            }
        }
    }

    /// Build `doc_id`'s vector over the full layout, in dimension order.
    pub fn materialize(&mut self, doc_id: &DocId, features: &FeatureTable) {
        let vector: Vec<f64> = self
            .dimensions
            .terms()
            .iter()
            .map(|term| features.get(term).map_or(0.0, |e| e.weight(doc_id)))
            .collect();
        self.vectors.insert(doc_id.clone(), vector);
    }

    /// Binary indicator over the existing layout; unknown terms are dropped.
    pub fn query_vector<'a, I>(&self, tokens: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: HashSet<&str> = tokens.into_iter().collect();
        self.dimensions
            .terms()
            .iter()
            .map(|term| if present.contains(term.as_str()) { 1.0 } else { 0.0 })
            .collect()
    }
}

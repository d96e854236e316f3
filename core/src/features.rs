//! Feature table: per-term idf, document frequency and per-document term frequency.
//!
//! idf values live only here. A commit first plans the new weights against the
//! pre-commit table ([`FeatureTable::plan_update`]) and only then installs them
//! ([`FeatureTable::apply`]), so the classification of every term reads the
//! statistics of the corpus as it was before the document arrived.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::corpus::DocId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfWeighting {
    /// `log10(N / df)`
    Classic,
    /// `log10((N + 1) / df)`; strictly positive for every indexed term.
    #[default]
    Smoothed,
}

impl IdfWeighting {
    /// idf of a term found in `doc_freq` of `n_docs` documents.
    pub fn idf(self, n_docs: usize, doc_freq: u32) -> f64 {
        let df = f64::from(doc_freq.max(1));
        let n = n_docs as f64;
        match self {
            IdfWeighting::Classic => (n / df).log10(),
            IdfWeighting::Smoothed => ((n + 1.0) / df).log10(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub idf: f64,
    pub doc_freq: u32,
    /// Relative term frequency per document containing the term.
    pub tf: BTreeMap<DocId, f64>,
}

impl FeatureEntry {
    /// `idf * tf` for `doc_id`, or 0 when the document lacks the term.
    pub fn weight(&self, doc_id: &DocId) -> f64 {
        self.tf.get(doc_id).map_or(0.0, |tf| self.idf * tf)
    }
}

/// Terms of an incoming document classified against the current vocabulary.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TermPartition {
    /// In the document, not in the corpus. Discovery order.
    pub new: Vec<String>,
    /// In the corpus, absent from the document.
    pub vanished: Vec<String>,
    /// In both.
    pub shared: Vec<String>,
}

/// Post-commit statistics computed without touching the table.
#[derive(Debug, Clone)]
pub struct FeatureUpdate {
    doc_id: DocId,
    partition: TermPartition,
    doc_tf: Vec<(String, f64)>,
    weights: HashMap<String, (f64, u32)>,
}

impl FeatureUpdate {
    pub fn partition(&self) -> &TermPartition { &self.partition }

    pub fn new_terms(&self) -> &[String] { &self.partition.new }

    /// Planned (idf, doc_freq) for `term`.
    pub fn weight_of(&self, term: &str) -> Option<(f64, u32)> { self.weights.get(term).copied() }
}

#[derive(Debug, Default, Clone)]
pub struct FeatureTable {
    entries: HashMap<String, FeatureEntry>,
}

impl FeatureTable {
    pub fn new() -> Self { Self::default() }

    /// Classify `doc_tf` (term, tf) against the vocabulary and compute the idf every
    /// term will carry once the corpus grows from `n_before` to `n_before + 1` documents.
    pub fn plan_update(
        &self,
        n_before: usize,
        doc_id: &DocId,
        doc_tf: &[(String, f64)],
        weighting: IdfWeighting,
    ) -> FeatureUpdate {
        let n_after = n_before + 1;
        let incoming: HashSet<&str> = doc_tf.iter().map(|(t, _)| t.as_str()).collect();
        let mut partition = TermPartition::default();
        let mut weights = HashMap::with_capacity(self.entries.len() + doc_tf.len());

        for (term, _) in doc_tf {
            match self.entries.get(term) {
                None => {
                    partition.new.push(term.clone());
                    weights.insert(term.clone(), (weighting.idf(n_after, 1), 1));
                }
                Some(entry) => {
                    partition.shared.push(term.clone());
                    let df = entry.doc_freq + 1;
                    weights.insert(term.clone(), (weighting.idf(n_after, df), df));
                }
            }
        }
        for (term, entry) in &self.entries {
            if !incoming.contains(term.as_str()) {
                partition.vanished.push(term.clone());
                weights.insert(term.clone(), (weighting.idf(n_after, entry.doc_freq), entry.doc_freq));
            }
        }
        partition.vanished.sort();

        FeatureUpdate { doc_id: doc_id.clone(), partition, doc_tf: doc_tf.to_vec(), weights }
    }

    pub fn apply(&mut self, update: FeatureUpdate) {
        let FeatureUpdate { doc_id, doc_tf, weights, .. } = update;
        for (term, tf) in doc_tf {
            self.entries
                .entry(term)
                .or_insert_with(|| FeatureEntry { idf: 0.0, doc_freq: 0, tf: BTreeMap::new() })
                .tf
                .insert(doc_id.clone(), tf);
        }
        for (term, (idf, doc_freq)) in weights {
            if let Some(entry) = self.entries.get_mut(&term) {
                entry.idf = idf;
                entry.doc_freq = doc_freq;
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<&FeatureEntry> { self.entries.get(term) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureEntry)> { self.entries.iter() }

    /// Owned copy, independent of the table.
    pub fn snapshot(&self) -> HashMap<String, FeatureEntry> { self.entries.clone() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tf(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(t, f)| (t.to_string(), *f)).collect()
    }

    #[test]
    fn smoothed_and_classic_idf() {
        assert!((IdfWeighting::Smoothed.idf(1, 1) - 2f64.log10()).abs() < 1e-12);
        assert_eq!(IdfWeighting::Classic.idf(1, 1), 0.0);
        assert!((IdfWeighting::Classic.idf(10, 2) - 5f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn plan_partitions_terms() {
        let mut table = FeatureTable::new();
        let d1 = DocId::from_content("d1");
        let plan = table.plan_update(0, &d1, &tf(&[("cat", 0.5), ("sat", 0.5)]), IdfWeighting::Smoothed);
        assert_eq!(plan.new_terms(), &["cat".to_string(), "sat".to_string()]);
        table.apply(plan);

        let d2 = DocId::from_content("d2");
        let plan = table.plan_update(1, &d2, &tf(&[("dog", 0.5), ("sat", 0.5)]), IdfWeighting::Smoothed);
        assert_eq!(plan.partition().new, vec!["dog".to_string()]);
        assert_eq!(plan.partition().shared, vec!["sat".to_string()]);
        assert_eq!(plan.partition().vanished, vec!["cat".to_string()]);
        assert_eq!(plan.weight_of("sat").map(|(_, df)| df), Some(2));
    }

    #[test]
    fn planning_does_not_mutate() {
        let mut table = FeatureTable::new();
        let d1 = DocId::from_content("d1");
        table.apply(table.plan_update(0, &d1, &tf(&[("cat", 1.0)]), IdfWeighting::Smoothed));
        let before = table.snapshot();
        let d2 = DocId::from_content("d2");
        let _ = table.plan_update(1, &d2, &tf(&[("cat", 1.0)]), IdfWeighting::Smoothed);
        assert_eq!(table.snapshot(), before);
    }

    #[test]
    fn vanished_terms_keep_tf_and_doc_freq() {
        let mut table = FeatureTable::new();
        let d1 = DocId::from_content("d1");
        table.apply(table.plan_update(0, &d1, &tf(&[("cat", 1.0)]), IdfWeighting::Classic));
        let d2 = DocId::from_content("d2");
        table.apply(table.plan_update(1, &d2, &tf(&[("dog", 1.0)]), IdfWeighting::Classic));

        let cat = table.get("cat").unwrap();
        assert_eq!(cat.doc_freq, 1);
        assert_eq!(cat.tf.len(), 1);
        assert!((cat.idf - 2f64.log10()).abs() < 1e-12);
        assert_eq!(cat.weight(&d2), 0.0);
    }
}

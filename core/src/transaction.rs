use std::collections::HashMap;

use crate::corpus::{DocId, DocumentRecord};
use crate::{Error, Result};

/// Staging area for a single document. Nothing staged here is visible to the
/// document base until the transaction is handed to [`crate::DocBase::commit`];
/// dropping it discards everything.
#[derive(Debug, Default)]
pub struct Transaction {
    document: Option<DocumentRecord>,
    // term -> positions; `order` keeps first-seen order for deterministic dimensions
    positions: HashMap<String, Vec<usize>>,
    order: Vec<String>,
    token_count: usize,
    features: Option<Vec<(String, f64)>>,
}

impl Transaction {
    pub fn new() -> Self { Self::default() }

    pub fn stage(&mut self, doc_id: DocId, raw_text: String, lang: String, name: String) -> Result<()> {
        if self.document.is_some() {
            return Err(Error::InvalidState("a document is already staged"));
        }
        self.document = Some(DocumentRecord { id: doc_id, raw_text, lang, name });
        Ok(())
    }

    /// Record the position of every token. Positions continue across calls.
    pub fn add_terms<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        if self.document.is_none() {
            return Err(Error::InvalidState("terms added before a document was staged"));
        }
        for token in tokens {
            let term = token.as_ref();
            let pos = self.token_count;
            self.token_count += 1;
            match self.positions.get_mut(term) {
                Some(list) => list.push(pos),
                None => {
                    self.positions.insert(term.to_string(), vec![pos]);
                    self.order.push(term.to_string());
                }
            }
        }
        // stale until recomputed
        self.features = None;
        Ok(())
    }

    /// Relative term frequency (occurrences / staged token count) of every staged term.
    pub fn compute_features(&mut self) -> Result<&[(String, f64)]> {
        if self.document.is_none() {
            return Err(Error::InvalidState("features computed before a document was staged"));
        }
        let total = self.token_count as f64;
        let features = self
            .order
            .iter()
            .map(|term| {
                let count = self.positions.get(term).map_or(0, Vec::len);
                (term.clone(), count as f64 / total)
            })
            .collect();
        Ok(self.features.insert(features).as_slice())
    }

    pub fn document(&self) -> Option<&DocumentRecord> { self.document.as_ref() }

    pub fn token_count(&self) -> usize { self.token_count }

    /// Staged terms with their positions, in first-seen order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.order.iter().map(move |t| (t.as_str(), self.positions.get(t).map_or(&[][..], Vec::as_slice)))
    }

    /// Features from the last `compute_features`, or `None` if absent or stale.
    pub fn features(&self) -> Option<&[(String, f64)]> { self.features.as_deref() }

    pub(crate) fn into_parts(self) -> Result<(DocumentRecord, Vec<(String, Vec<usize>)>, Vec<(String, f64)>)> {
        let Transaction { document, mut positions, order, features, .. } = self;
        let document = document.ok_or(Error::InvalidState("commit without a staged document"))?;
        let features = features.ok_or(Error::InvalidState("commit before features were computed"))?;
        let terms = order
            .into_iter()
            .map(|t| {
                let p = positions.remove(&t).unwrap_or_default();
                (t, p)
            })
            .collect();
        Ok((document, terms, features))
    }
}

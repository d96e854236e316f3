use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

use crate::analysis::{Analyzer, DocumentReport, Source};
use crate::corpus::DocId;
use crate::docbase::{query_tokens, stage, DocBase};
use crate::search::SearchHit;
use crate::Result;

/// A [`DocBase`] shared between threads.
///
/// Text analysis runs without any lock. A commit holds the write lock for its
/// whole duration, so readers see the corpus either before or after a
/// document, never in between.
#[derive(Clone)]
pub struct SharedDocBase {
    inner: Arc<RwLock<DocBase>>,
    analyzer: Arc<Analyzer>,
}

impl SharedDocBase {
    pub fn new(docbase: DocBase) -> Self {
        let analyzer = docbase.analyzer();
        Self { inner: Arc::new(RwLock::new(docbase)), analyzer }
    }

    pub fn add_document(&self, source: &Source) -> Result<(DocId, DocumentReport)> {
        let analysis = self.analyzer.analyze(source)?;
        let report = analysis.report();
        let tx = stage(analysis)?;
        let doc_id = self.inner.write().commit(tx)?;
        Ok((doc_id, report))
    }

    pub fn analyze_document(&self, source: &Source) -> Result<(String, DocumentReport)> {
        let analysis = self.analyzer.analyze(source)?;
        let report = analysis.report();
        Ok((analysis.name, report))
    }

    pub fn search(&self, text: &str) -> Result<Vec<SearchHit>> {
        let tokens = query_tokens(&self.analyzer, text)?;
        Ok(self.inner.read().search_tokens(&tokens))
    }

    /// Read access for reporting; blocks commits while held.
    pub fn read(&self) -> RwLockReadGuard<'_, DocBase> { self.inner.read() }
}

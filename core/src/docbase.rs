//! The document base: corpus store, inverted index, feature table and vector
//! space, kept mutually consistent by [`DocBase::commit`].

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::analysis::{Analysis, Analyzer, DocumentReport, Source};
use crate::config::DocBaseConfig;
use crate::corpus::{CorpusStore, DocId, DocumentRecord};
use crate::features::{FeatureEntry, FeatureTable};
use crate::index::{IndexEntry, InvertedIndex};
use crate::search::{rank, SearchHit};
use crate::transaction::Transaction;
use crate::vsm::VectorSpace;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport {
    pub documents: usize,
    pub terms: usize,
    /// Raw-text length statistics in characters; `None` while the corpus is empty.
    pub min_content_length: Option<usize>,
    pub max_content_length: Option<usize>,
    pub mean_content_length: Option<f64>,
}

/// Stage an analyzed document: identity, token positions and term frequencies.
pub fn stage(analysis: Analysis) -> Result<Transaction> {
    let Analysis { name, raw_text, lang, tokens, .. } = analysis;
    let mut tx = Transaction::new();
    tx.stage(DocId::from_content(&raw_text), raw_text, lang.code().to_string(), name)?;
    tx.add_terms(tokens.as_slice())?;
    tx.compute_features()?;
    Ok(tx)
}

#[derive(Debug)]
pub struct DocBase {
    config: DocBaseConfig,
    analyzer: Arc<Analyzer>,
    corpus: CorpusStore,
    index: InvertedIndex,
    features: FeatureTable,
    space: VectorSpace,
}

impl DocBase {
    /// Fails with a configuration error when no language module can be resolved.
    pub fn new(config: DocBaseConfig) -> Result<Self> {
        let analyzer = Analyzer::new(config.registry()?, config.default_lang.clone())?;
        Ok(Self::with_analyzer(config, analyzer))
    }

    pub fn with_analyzer(config: DocBaseConfig, analyzer: Analyzer) -> Self {
        Self {
            config,
            analyzer: Arc::new(analyzer),
            corpus: CorpusStore::new(),
            index: InvertedIndex::new(),
            features: FeatureTable::new(),
            space: VectorSpace::new(),
        }
    }

    pub fn config(&self) -> &DocBaseConfig { &self.config }

    pub fn analyzer(&self) -> Arc<Analyzer> { Arc::clone(&self.analyzer) }

    /// Merge a staged document into every structure.
    ///
    /// All idf values and the vector layout changes are computed against the
    /// pre-commit state first; the structures are only written once nothing
    /// else can fail, so an error leaves the document base untouched.
    pub fn commit(&mut self, tx: Transaction) -> Result<DocId> {
        let (record, terms, doc_tf) = tx.into_parts()?;
        if self.corpus.contains(&record.id) {
            return Err(Error::AlreadyIndexed(record.id));
        }
        let doc_id = record.id.clone();
        let n_before = self.corpus.len();
        let update = self.features.plan_update(n_before, &doc_id, &doc_tf, self.config.idf);
        let new_terms = update.new_terms().to_vec();
        tracing::debug!(
            %doc_id,
            new = update.partition().new.len(),
            shared = update.partition().shared.len(),
            vanished = update.partition().vanished.len(),
            "planned commit"
        );

        self.features.apply(update);
        self.corpus.insert(record);
        self.index.merge(&doc_id, terms.iter().map(|(t, p)| (t.as_str(), p.as_slice())));
        self.space.extend(&new_terms, &self.features);
        self.space.refresh(&self.features);
        self.space.materialize(&doc_id, &self.features);

        tracing::debug!(%doc_id, documents = self.corpus.len(), dimensions = self.space.dimensions().len(), "committed document");
        Ok(doc_id)
    }

    pub fn add_document(&mut self, source: &Source) -> Result<(DocId, DocumentReport)> {
        let analysis = self.analyzer.analyze(source)?;
        let report = analysis.report();
        let doc_id = self.commit(stage(analysis)?)?;
        Ok((doc_id, report))
    }

    /// Analysis preview; nothing is committed.
    pub fn analyze_document(&self, source: &Source) -> Result<(String, DocumentReport)> {
        let analysis = self.analyzer.analyze(source)?;
        let report = analysis.report();
        Ok((analysis.name, report))
    }

    /// Query tokens after the linguistic pipeline; `EmptyQuery` when none survive.
    pub fn query_tokens(&self, text: &str) -> Result<Vec<String>> {
        query_tokens(&self.analyzer, text)
    }

    /// Binary indicator vector of the query over the current vocabulary.
    pub fn prepare_query(&self, text: &str) -> Result<Vec<f64>> {
        let tokens = self.query_tokens(text)?;
        Ok(self.space.query_vector(tokens.iter().map(String::as_str)))
    }

    pub fn search(&self, text: &str) -> Result<Vec<SearchHit>> {
        let tokens = self.query_tokens(text)?;
        Ok(self.search_tokens(&tokens))
    }

    pub fn search_top(&self, text: &str, k: usize) -> Result<Vec<SearchHit>> {
        let mut hits = self.search(text)?;
        hits.truncate(k);
        Ok(hits)
    }

    /// Rank already-analyzed query tokens.
    pub fn search_tokens(&self, tokens: &[String]) -> Vec<SearchHit> {
        let query = self.space.query_vector(tokens.iter().map(String::as_str));
        rank(&query, &self.space, &self.corpus)
    }

    pub fn document_count(&self) -> usize { self.corpus.len() }

    pub fn term_count(&self) -> usize { self.index.term_count() }

    pub fn dimension_count(&self) -> usize { self.space.dimensions().len() }

    /// Vocabulary in dimension order.
    pub fn dimensions(&self) -> Vec<String> { self.space.dimensions().terms().to_vec() }

    pub fn document(&self, doc_id: &DocId) -> Option<&DocumentRecord> { self.corpus.get(doc_id) }

    pub fn index_entry(&self, term: &str) -> Option<&IndexEntry> { self.index.get(term) }

    /// Owned copy of the feature table.
    pub fn features(&self) -> HashMap<String, FeatureEntry> { self.features.snapshot() }

    /// Owned copy of every document vector.
    pub fn vectors(&self) -> BTreeMap<DocId, Vec<f64>> { self.space.snapshot() }

    pub fn full_report(&self) -> FullReport {
        let stats = self.corpus.length_stats();
        FullReport {
            documents: self.document_count(),
            terms: self.term_count(),
            min_content_length: stats.map(|s| s.min),
            max_content_length: stats.map(|s| s.max),
            mean_content_length: stats.map(|s| s.mean),
        }
    }
}

pub(crate) fn query_tokens(analyzer: &Analyzer, text: &str) -> Result<Vec<String>> {
    let analysis = analyzer.analyze(&Source::raw("query", text))?;
    if analysis.tokens.is_empty() {
        return Err(Error::EmptyQuery);
    }
    Ok(analysis.tokens)
}

//! Ingesting many sources at once, one explicit outcome per source.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analysis::{DocumentReport, Source};
use crate::corpus::DocId;
use crate::docbase::DocBase;
use crate::shared::SharedDocBase;
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    Added { source: String, doc_id: DocId, report: DocumentReport },
    Skipped { source: String, reason: String },
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchReport {
    pub added: usize,
    pub skipped: usize,
    pub outcomes: Vec<IngestOutcome>,
}

impl BatchReport {
    fn record(&mut self, source: &Source, result: Result<(DocId, DocumentReport)>) {
        let source = source.name();
        match result {
            Ok((doc_id, report)) => {
                self.added += 1;
                self.outcomes.push(IngestOutcome::Added { source, doc_id, report });
            }
            Err(e) => {
                match &e {
                    Error::NotFound(_) | Error::AlreadyIndexed(_) => tracing::warn!(%source, error = %e, "skipping source"),
                    _ => tracing::error!(%source, error = %e, "failed to ingest source"),
                }
                self.skipped += 1;
                self.outcomes.push(IngestOutcome::Skipped { source, reason: e.to_string() });
            }
        }
    }
}

/// Anything that can take one document at a time.
pub trait Ingest {
    fn ingest(&mut self, source: &Source) -> Result<(DocId, DocumentReport)>;
}

impl Ingest for DocBase {
    fn ingest(&mut self, source: &Source) -> Result<(DocId, DocumentReport)> { self.add_document(source) }
}

impl Ingest for SharedDocBase {
    fn ingest(&mut self, source: &Source) -> Result<(DocId, DocumentReport)> { self.add_document(source) }
}

/// Add every source in order. A failing source is recorded and skipped; the
/// documents already committed are unaffected.
pub fn ingest_all<D, I>(target: &mut D, sources: I) -> BatchReport
where
    D: Ingest,
    I: IntoIterator<Item = Source>,
{
    let mut batch = BatchReport::default();
    for source in sources {
        let result = target.ingest(&source);
        batch.record(&source, result);
    }
    tracing::info!(added = batch.added, skipped = batch.skipped, "batch ingestion complete");
    batch
}

/// Files under `dir` whose extension is in `extensions` (all files when empty), sorted by path.
pub fn discover_sources<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> Result<Vec<Source>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            extensions.is_empty()
                || p.extension().and_then(|s| s.to_str()).is_some_and(|ext| extensions.contains(&ext))
        })
        .collect();
    files.sort();
    Ok(files.into_iter().map(Source::File).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocBaseConfig;
    use std::fs;

    #[test]
    fn missing_sources_are_skipped_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "Cats chase mice").unwrap();
        fs::write(dir.path().join("b.txt"), "Dogs chase cats").unwrap();

        let mut db = DocBase::new(DocBaseConfig::default()).unwrap();
        let sources = vec![
            Source::file(dir.path().join("a.txt")),
            Source::file(dir.path().join("missing.txt")),
            Source::file(dir.path().join("b.txt")),
            Source::file(dir.path().join("a.txt")),
        ];
        let batch = ingest_all(&mut db, sources);

        assert_eq!(batch.added, 2);
        assert_eq!(batch.skipped, 2);
        assert_eq!(db.document_count(), 2);
        assert!(matches!(batch.outcomes[1], IngestOutcome::Skipped { .. }));
        assert!(matches!(batch.outcomes[3], IngestOutcome::Skipped { .. }));
    }

    #[test]
    fn discovers_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("nested/a.txt"), "a").unwrap();
        fs::write(dir.path().join("skip.bin"), "x").unwrap();

        let sources = discover_sources(dir.path(), &["txt"]).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0], Source::file(dir.path().join("b.txt")));
        assert!(discover_sources(dir.path().join("nope"), &[]).is_err());
    }
}

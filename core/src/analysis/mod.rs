//! Text extraction, language selection and the per-language token pipeline.

pub mod detect;
pub mod language;
pub mod source;
pub mod tokenizer;

use serde::Serialize;

pub use detect::{LanguageDetector, StopwordDetector, UNDETERMINED};
pub use language::{Language, LanguageRegistry};
pub use source::Source;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentReport {
    pub detected_lang: String,
    pub processed_lang: String,
    /// Raw text length in characters.
    pub input_size: usize,
    /// Tokens left after the pipeline.
    pub term_count: usize,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub name: String,
    pub raw_text: String,
    pub detected_lang: String,
    pub lang: Language,
    pub tokens: Vec<String>,
}

impl Analysis {
    pub fn report(&self) -> DocumentReport {
        DocumentReport {
            detected_lang: self.detected_lang.clone(),
            processed_lang: self.lang.code().to_string(),
            input_size: self.raw_text.chars().count(),
            term_count: self.tokens.len(),
        }
    }
}

/// Runs a source through extraction, detection and the resolved language pipeline.
pub struct Analyzer {
    registry: LanguageRegistry,
    default_lang: String,
    detector: Box<dyn LanguageDetector>,
}

impl Analyzer {
    /// Fails when the fallback chain cannot resolve any enabled language.
    pub fn new(registry: LanguageRegistry, default_lang: impl Into<String>) -> Result<Self> {
        let default_lang = default_lang.into();
        registry.resolve(&default_lang, &default_lang)?;
        // detection spans every known language; the registry decides what is processable
        Ok(Self { registry, default_lang, detector: Box::new(StopwordDetector::default()) })
    }

    pub fn with_detector(mut self, detector: Box<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn default_lang(&self) -> &str { &self.default_lang }

    pub fn analyze(&self, source: &Source) -> Result<Analysis> {
        let raw_text = source.extract_raw_text()?;
        let detected_lang = self.detector.detect(&raw_text);
        let lang = self.registry.resolve(&detected_lang, &self.default_lang)?;
        let tokens = lang.analyze(&raw_text);
        tracing::debug!(source = %source.name(), %detected_lang, %lang, tokens = tokens.len(), "analyzed source");
        Ok(Analysis { name: source.name(), raw_text, detected_lang, lang, tokens })
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("registry", &self.registry)
            .field("default_lang", &self.default_lang)
            .finish_non_exhaustive()
    }
}

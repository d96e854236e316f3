use rust_stemmers::Stemmer;
use std::collections::HashSet;
use std::fmt;

use super::tokenizer::{
    filter_numerals, filter_punctuation, filter_stopwords, stem, tokenize_with_elisions, tokenize_word_punct,
    ENGLISH_STEMMER, ENGLISH_STOPWORDS, FRENCH_STEMMER, FRENCH_STOPWORDS,
};
use crate::{Error, Result};

/// Last resort of the fallback chain.
pub const ULTIMATE_FALLBACK: &str = "en";

/// Language modules with a tokenizer, a stop-word list and a stemmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    French,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::French];

    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "eng" | "english" => Some(Language::English),
            "fr" | "fra" | "fre" | "french" => Some(Language::French),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }

    pub fn stopwords(self) -> &'static HashSet<&'static str> {
        match self {
            Language::English => &ENGLISH_STOPWORDS,
            Language::French => &FRENCH_STOPWORDS,
        }
    }

    fn stemmer(self) -> &'static Stemmer {
        match self {
            Language::English => &ENGLISH_STEMMER,
            Language::French => &FRENCH_STEMMER,
        }
    }

    pub fn tokenize(self, text: &str) -> Vec<String> {
        match self {
            Language::English => tokenize_word_punct(text),
            Language::French => tokenize_with_elisions(text),
        }
    }

    /// Full pipeline: tokenize, drop punctuation, stop words and numerals, then stem.
    pub fn analyze(self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let tokens = filter_punctuation(tokens);
        let tokens = filter_stopwords(tokens, self.stopwords());
        let tokens = filter_numerals(tokens);
        stem(tokens, self.stemmer())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.code()) }
}

/// The language modules enabled for this process.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    enabled: Vec<Language>,
}

impl LanguageRegistry {
    /// Fails if a code names no known language module.
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self> {
        let mut enabled = Vec::new();
        for code in codes {
            let lang = Language::from_code(code.as_ref())
                .ok_or_else(|| Error::Configuration(format!("unknown language module '{}'", code.as_ref())))?;
            if !enabled.contains(&lang) {
                enabled.push(lang);
            }
        }
        Ok(Self { enabled })
    }

    pub fn enabled(&self) -> &[Language] { &self.enabled }

    pub fn get(&self, code: &str) -> Option<Language> {
        Language::from_code(code).filter(|lang| self.enabled.contains(lang))
    }

    /// `requested -> default -> "en"`; a configuration error when none is enabled.
    pub fn resolve(&self, requested: &str, default: &str) -> Result<Language> {
        if let Some(lang) = self.get(requested) {
            return Ok(lang);
        }
        if let Some(lang) = self.get(default) {
            tracing::debug!(requested, fallback = default, "language module unavailable, using default");
            return Ok(lang);
        }
        self.get(ULTIMATE_FALLBACK).ok_or_else(|| {
            Error::Configuration(format!(
                "no language module for '{requested}', default '{default}' or '{ULTIMATE_FALLBACK}'"
            ))
        })
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self { Self { enabled: Language::ALL.to_vec() } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_pipeline() {
        let toks = Language::English.analyze("The cat sat, in 2024, on the mat!");
        assert_eq!(toks, vec!["cat", "sat", "mat"]);
        let toks = Language::English.analyze("Running runners run");
        assert!(toks.iter().all(|t| t == "run" || t == "runner"));
    }

    #[test]
    fn french_pipeline_drops_elisions() {
        let toks = Language::French.analyze("L'enfant mange une pomme");
        assert!(!toks.iter().any(|t| t == "l" || t == "une"));
        assert!(toks.iter().any(|t| t.starts_with("enfant")));
    }

    #[test]
    fn fallback_chain() {
        let registry = LanguageRegistry::from_codes(&["en", "fr"]).unwrap();
        assert_eq!(registry.resolve("fr", "en").unwrap(), Language::French);
        assert_eq!(registry.resolve("de", "fr").unwrap(), Language::French);
        assert_eq!(registry.resolve("de", "es").unwrap(), Language::English);
    }

    #[test]
    fn unresolvable_language_is_a_configuration_error() {
        let registry = LanguageRegistry::from_codes(&["fr"]).unwrap();
        assert!(matches!(registry.resolve("de", "es"), Err(Error::Configuration(_))));
        assert!(matches!(LanguageRegistry::from_codes(&["xx"]), Err(Error::Configuration(_))));
    }
}

use super::language::Language;
use super::tokenizer::tokenize_with_elisions;

/// Identifies the language of a text, returning a language code.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> String;
}

/// Code reported when no candidate language has any evidence in the text.
pub const UNDETERMINED: &str = "und";

/// Picks the candidate language whose stop words occur most often in the text.
/// Texts with no stop-word hit are [`UNDETERMINED`].
#[derive(Debug, Clone)]
pub struct StopwordDetector {
    candidates: Vec<Language>,
}

impl StopwordDetector {
    pub fn new(candidates: Vec<Language>) -> Self { Self { candidates } }
}

impl Default for StopwordDetector {
    /// Every known language, enabled or not.
    fn default() -> Self { Self::new(Language::ALL.to_vec()) }
}

impl LanguageDetector for StopwordDetector {
    fn detect(&self, text: &str) -> String {
        let tokens = tokenize_with_elisions(text);
        let mut best: Option<(Language, usize)> = None;
        for &lang in &self.candidates {
            let stopwords = lang.stopwords();
            let hits = tokens
                .iter()
                .filter(|t| stopwords.contains(t.as_str()) || stopwords.contains(t.trim_end_matches('\'')))
                .count();
            // first candidate wins ties
            if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
                best = Some((lang, hits));
            }
        }
        best.map_or_else(|| UNDETERMINED.to_string(), |(lang, _)| lang.code().to_string())
    }
}

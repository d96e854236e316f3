use docbase_core::analysis::tokenizer::tokenize_word_punct;
use docbase_core::{Analyzer, Language, LanguageRegistry, Source};

#[test]
fn it_normalizes_and_stems() {
    let words = Language::English.analyze("Running Runners RUN! The café's menu.");
    assert!(words.contains(&"run".to_string()));
    assert!(words.iter().any(|w| w.starts_with("caf")));
    assert!(!words.iter().any(|w| w == "s"));
}

#[test]
fn it_filters_stopwords() {
    let words = Language::English.analyze("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn it_normalizes_compatibility_forms() {
    // fullwidth letters fold to ASCII under NFKC
    assert_eq!(tokenize_word_punct("ＲＵＳＴ"), vec!["rust"]);
}

#[test]
fn french_documents_use_the_french_module() {
    let analyzer = Analyzer::new(LanguageRegistry::default(), "en").unwrap();
    let analysis = analyzer
        .analyze(&Source::raw("fr", "Les enfants de l'école jouent dans la cour avec les chiens"))
        .unwrap();
    assert_eq!(analysis.detected_lang, "fr");
    assert_eq!(analysis.lang, Language::French);
    assert!(!analysis.tokens.iter().any(|t| t == "les" || t == "l" || t == "la"));
}

#[test]
fn disabled_language_falls_back_to_default() {
    let registry = LanguageRegistry::from_codes(&["en"]).unwrap();
    let analyzer = Analyzer::new(registry, "en").unwrap();
    let analysis = analyzer.analyze(&Source::raw("fr", "Le chat est sur le tapis et il est content")).unwrap();
    assert_eq!(analysis.detected_lang, "fr");
    assert_eq!(analysis.lang, Language::English);
    assert_eq!(analysis.report().processed_lang, "en");
}

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

lazy_static! {
    // word runs or punctuation runs
    static ref WORD_PUNCT: Regex = Regex::new(r"(?u)\w+|[^\w\s]+").expect("valid regex");
    // elided words keep their apostrophe ("l'", "qu'") so the stop-word filter can match them
    static ref WORD_ELISION_PUNCT: Regex = Regex::new(r"(?u)\w+'|\w+|[^\w\s]").expect("valid regex");
    static ref PUNCT: Regex = Regex::new(r"(?u)^[^\w\s]").expect("valid regex");
    static ref NUMERAL: Regex = Regex::new(r"^\d+").expect("valid regex");
    static ref APOSTROPHE: Regex = Regex::new(r"(?u)^(\w+)'$").expect("valid regex");
    pub(crate) static ref ENGLISH_STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    pub(crate) static ref FRENCH_STEMMER: Stemmer = Stemmer::create(Algorithm::French);
    pub(crate) static ref ENGLISH_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves",
            // contraction fragments left by the word/punctuation split
            "s","t","d","ll","m","re","ve"
        ];
        words.iter().copied().collect()
    };
    pub(crate) static ref FRENCH_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "au","aux","avec","ce","ces","c","d","dans","de","des","du","elle","en","et","eux","il","ils","j","je","l","la","le","les",
            "leur","lui","m","ma","mais","me","même","mes","moi","mon","n","ne","nos","notre","nous","on","ou","par","pas","pour",
            "qu","que","qui","s","sa","se","ses","son","sur","t","ta","te","tes","toi","ton","tu","un","une","vos","votre","vous",
            "y","à","été","étée","étées","étés","étant","suis","es","est","sommes","êtes","sont","serai","seras","sera","serons",
            "serez","seront","serais","serait","serions","seriez","seraient","étais","était","étions","étiez","étaient","fus",
            "fut","fûmes","fûtes","furent","sois","soit","soyons","soyez","soient","fusse","fusses","fût","fussions","fussiez",
            "fussent","ayant","eu","eue","eues","eus","ai","as","avons","avez","ont","aurai","auras","aura","aurons","aurez",
            "auront","aurais","aurait","aurions","auriez","auraient","avais","avait","avions","aviez","avaient","eut","eûmes",
            "eûtes","eurent","aie","aies","ait","ayons","ayez","aient","eusse","eusses","eût","eussions","eussiez","eussent",
            "ceci","cela","celà","cet","cette","ici","ils","les","leurs","quel","quels","quelle","quelles","sans","soi"
        ];
        words.iter().copied().collect()
    };
}

fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Split NFKC-normalized, lowercased text into word and punctuation runs.
pub fn tokenize_word_punct(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    WORD_PUNCT.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

/// Like [`tokenize_word_punct`] but keeps elisions (`l'`, `qu'`) as single tokens.
pub fn tokenize_with_elisions(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    WORD_ELISION_PUNCT.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

/// Drop tokens starting with a punctuation character.
pub fn filter_punctuation(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().filter(|t| !PUNCT.is_match(t)).collect()
}

/// Drop tokens starting with a digit.
pub fn filter_numerals(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().filter(|t| !NUMERAL.is_match(t)).collect()
}

/// Strip a trailing elision apostrophe, then drop stop words.
pub fn filter_stopwords(tokens: Vec<String>, stopwords: &HashSet<&'static str>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| match APOSTROPHE.captures(&t) {
            Some(caps) => caps[1].to_string(),
            None => t,
        })
        .filter(|t| !stopwords.contains(t.as_str()))
        .collect()
}

pub fn stem(tokens: Vec<String>, stemmer: &Stemmer) -> Vec<String> {
    tokens.into_iter().map(|t| stemmer.stem(&t).into_owned()).collect()
}

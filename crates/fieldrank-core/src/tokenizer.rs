//! Query normalizer
//!
//! Splits on Unicode word boundaries and elisions, keeps alphabetic words,
//! lowercases them and drops stop-words. There is no lemmatization, so a
//! query only matches index tokens whose lemma equals the surface form.

use ahash::AHashSet;
use unicode_segmentation::UnicodeSegmentation;

/// French stop-words, the language of the reference corpus.
pub const FRENCH_STOPWORDS: &[&str] = &[
    "a", "ai", "aie", "ainsi", "alors", "au", "aucun", "aucune", "aussi", "autre", "aux",
    "avait", "avant", "avec", "avez", "avoir", "bon", "c", "ca", "car", "ce", "ceci", "cela",
    "celle", "celles", "celui", "ces", "cet", "cette", "ceux", "chaque", "chez", "ci", "comme",
    "comment", "d", "dans", "de", "des", "doit", "donc", "dont", "du", "elle", "elles", "en",
    "encore", "est", "et", "etc", "été", "être", "eu", "eux", "fait", "faire", "font", "hors",
    "ici", "il", "ils", "j", "je", "jusqu", "l", "la", "le", "les", "leur", "leurs", "lui",
    "m", "ma", "mais", "me", "même", "mes", "moi", "mon", "n", "ne", "ni", "nos", "notre",
    "nous", "on", "ont", "ou", "où", "par", "parce", "pas", "peu", "peut", "plus", "pour",
    "pourquoi", "qu", "quand", "que", "quel", "quelle", "quelles", "quels", "qui", "s", "sa",
    "sans", "se", "ses", "si", "sien", "son", "sont", "sous", "sur", "t", "ta", "te", "tes",
    "toi", "ton", "tous", "tout", "toute", "toutes", "très", "tu", "un", "une", "vos",
    "votre", "vous", "y",
];

/// Query tokenizer producing normalized tokens
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Minimum token length in characters (default: 1)
    pub min_length: usize,
    stopwords: AHashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(1, FRENCH_STOPWORDS.iter().copied())
    }
}

impl Tokenizer {
    /// Create a tokenizer with a custom minimum length and stop-word list
    pub fn new<I, S>(min_length: usize, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_length,
            stopwords: stopwords
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Normalize raw query text into tokens, preserving order and duplicates
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .flat_map(|word| word.split(['\'', '’']))
            .filter(|word| !word.is_empty() && word.chars().all(char::is_alphabetic))
            .map(str::to_lowercase)
            .filter(|word| word.chars().count() >= self.min_length)
            .filter(|word| !self.is_stopword(word))
            .collect()
    }
}

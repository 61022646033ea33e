// TF-IDF term weighting for short phrase lists (facility names).
use std::sync::OnceLock;

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::vector::SparseVector;

/// The common 318-word English stop list
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

fn stop_words() -> &'static AHashSet<&'static str> {
    static SET: OnceLock<AHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("static regex"))
}

/// Fitted vocabulary plus inverse document frequencies.
///
/// Fitting and vectorizing happen in one call ([`TfidfVectorizer::fit_transform`])
/// so the vocabulary is always exactly the one of the corpus being vectorized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Sorted terms; position = column
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    #[serde(skip)]
    index: AHashMap<String, u32>,
}

impl TfidfVectorizer {
    /// Lowercased runs of two or more word characters, stop words removed
    #[inline]
    pub fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        token_regex()
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !stop_words().contains(t))
            .map(str::to_string)
            .collect()
    }

    /// Unigrams followed by space-joined bigrams
    pub fn analyze(text: &str) -> Vec<String> {
        let tokens = Self::tokenize(text);
        let mut terms = Vec::with_capacity(tokens.len() * 2);
        terms.extend(tokens.iter().cloned());
        terms.extend(tokens.windows(2).map(|w| format!("{} {}", w[0], w[1])));
        terms
    }

    fn term_counts(text: &str) -> AHashMap<String, u32> {
        let mut counts: AHashMap<String, u32> = AHashMap::new();
        for term in Self::analyze(text) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }

    /// Fit on `docs` and emit one L2-normalized weighted row per document.
    /// A document with no surviving terms gets an all-zero row.
    pub fn fit_transform<S: AsRef<str> + Sync>(docs: &[S]) -> (Self, Vec<SparseVector>) {
        let counts: Vec<AHashMap<String, u32>> = docs
            .par_iter()
            .map(|d| Self::term_counts(d.as_ref()))
            .collect();

        // Everything below needs the whole corpus
        let mut df: AHashMap<&str, u32> = AHashMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let mut vocabulary: Vec<String> = df.keys().map(|t| t.to_string()).collect();
        vocabulary.sort();

        let n = docs.len() as f64;
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|t| {
                let d = f64::from(df.get(t.as_str()).copied().unwrap_or(0));
                ((1.0 + n) / (1.0 + d)).ln() + 1.0
            })
            .collect();

        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();

        let vectorizer = Self {
            vocabulary,
            idf,
            index,
        };

        let rows = counts
            .par_iter()
            .map(|c| vectorizer.weigh(c))
            .collect();

        (vectorizer, rows)
    }

    fn weigh(&self, counts: &AHashMap<String, u32>) -> SparseVector {
        let pairs = counts
            .iter()
            .filter_map(|(term, &tf)| {
                self.index
                    .get(term)
                    .map(|&col| (col, f64::from(tf) * self.idf[col as usize]))
            })
            .collect();
        let mut row = SparseVector::from_pairs(self.vocabulary.len(), pairs);
        row.normalize();
        row
    }

    /// Vectorize a new document against the fitted vocabulary; unseen terms are ignored
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&Self::term_counts(text))
    }

    #[inline]
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    #[inline]
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Rebuild the term lookup after deserialization
    pub fn reindex(&mut self) {
        self.index = self
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
    }

    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).map(|&c| c as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = TfidfVectorizer::tokenize("Swimming Pool & a Gym for the Kids, 24x7 Security");
        assert_eq!(tokens, vec!["swimming", "pool", "gym", "kids", "24x7", "security"]);
    }

    #[test]
    fn test_analyze_bigrams_skip_removed_words() {
        let terms = TfidfVectorizer::analyze("Club House and Gym");
        assert_eq!(
            terms,
            vec!["club", "house", "gym", "club house", "house gym"]
        );
    }

    #[test]
    fn test_vocabulary_sorted_and_idf_smoothed() {
        let docs = ["gym pool", "gym"];
        let (v, rows) = TfidfVectorizer::fit_transform(&docs);
        assert_eq!(v.vocabulary(), &["gym", "gym pool", "pool"]);

        // gym in both docs: ln(3/3) + 1; pool in one: ln(3/2) + 1
        assert!((v.idf()[0] - 1.0).abs() < 1e-12);
        assert!((v.idf()[2] - (1.5f64.ln() + 1.0)).abs() < 1e-12);

        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert!((row.norm() - 1.0).abs() < 1e-12);
        }
        // second doc only has "gym"
        assert_eq!(rows[1].indices(), &[0]);
    }

    #[test]
    fn test_empty_document_is_zero_row() {
        let docs = ["lift", "", "the and of"];
        let (v, rows) = TfidfVectorizer::fit_transform(&docs);
        assert_eq!(v.len(), 1);
        assert!(!rows[0].is_zero());
        assert!(rows[1].is_zero());
        assert!(rows[2].is_zero());
        assert_eq!(rows[1].dim(), 1);
    }

    #[test]
    fn test_transform_ignores_unseen_terms() {
        let (v, _) = TfidfVectorizer::fit_transform(&["power backup", "lift"]);
        let row = v.transform("Lift Helipad");
        assert_eq!(row.nnz(), 1);
        assert_eq!(row.indices()[0] as usize, v.column_of("lift").unwrap());
    }

    #[test]
    fn test_reindex_after_roundtrip() {
        let (v, _) = TfidfVectorizer::fit_transform(&["gym pool"]);
        let json = serde_json::to_string(&v).unwrap();
        let mut back: TfidfVectorizer = serde_json::from_str(&json).unwrap();
        assert!(back.column_of("gym").is_none());
        back.reindex();
        assert_eq!(back.column_of("gym"), v.column_of("gym"));
    }
}

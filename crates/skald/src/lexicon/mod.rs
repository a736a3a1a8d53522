//! # Lexicon — Word Validation and Prefix Generation
//!
//! Gameplay asks three questions of the word store: is this a real word, is
//! it a banned word, and what prefix should the player build words from next.
//! The [`Lexicon`] answers them with two [`Trie`]s (dictionary and NSFW list)
//! and a list of hand-picked prefixes.
//!
//! Word lists are JSON documents with a single array:
//!
//! ```text
//! {"words":    ["apple", "apricot", ...]}
//! {"prefixes": ["ap", "str", ...]}
//! {"nsfw":     [...]}
//! ```
//!
//! Entries are trimmed, stray quote characters stripped, and empties dropped.
//! Dictionary and NSFW words are lowercased; prefixes are kept as written.

mod trie;

pub use trie::Trie;

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::asset::read_json_file;
use crate::error::EngineResult;

/// Words a generated prefix must start, by default.
pub const DEFAULT_MIN_WORDS: usize = 20;
/// Sampling attempts before prefix generation falls back.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

pub struct Lexicon {
    trie: Trie,
    nsfw: Trie,
    prefixes: Vec<String>,
    rng: StdRng,
    min_words: usize,
    max_attempts: usize,
}

impl Lexicon {
    /// An empty lexicon seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// An empty lexicon with a deterministic generator.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            trie: Trie::new(),
            nsfw: Trie::new(),
            prefixes: Vec::new(),
            rng,
            min_words: DEFAULT_MIN_WORDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the match threshold and attempt budget used by
    /// [`generate_prefix_from_random_word`](Self::generate_prefix_from_random_word).
    pub fn with_prefix_rules(mut self, min_words: usize, max_attempts: usize) -> Self {
        self.min_words = min_words;
        self.max_attempts = max_attempts.max(1);
        self
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Load `{"words": [...]}` into the dictionary. Returns the number of
    /// entries read.
    pub fn load_dictionary(&mut self, path: impl AsRef<Path>) -> EngineResult<usize> {
        let doc: serde_json::Value = read_json_file(path)?;
        Ok(self.add_dictionary_from_value(&doc))
    }

    pub fn load_prefixes(&mut self, path: impl AsRef<Path>) -> EngineResult<usize> {
        let doc: serde_json::Value = read_json_file(path)?;
        Ok(self.add_prefixes_from_value(&doc))
    }

    pub fn load_nsfw(&mut self, path: impl AsRef<Path>) -> EngineResult<usize> {
        let doc: serde_json::Value = read_json_file(path)?;
        Ok(self.add_nsfw_from_value(&doc))
    }

    pub fn add_dictionary_from_value(&mut self, doc: &serde_json::Value) -> usize {
        let words = word_list(doc, "words");
        for w in &words {
            self.trie.insert(&w.to_lowercase());
        }
        words.len()
    }

    pub fn add_prefixes_from_value(&mut self, doc: &serde_json::Value) -> usize {
        let prefixes = word_list(doc, "prefixes");
        let n = prefixes.len();
        self.prefixes.extend(prefixes);
        n
    }

    pub fn add_nsfw_from_value(&mut self, doc: &serde_json::Value) -> usize {
        let words = word_list(doc, "nsfw");
        for w in &words {
            self.nsfw.insert(&w.to_lowercase());
        }
        words.len()
    }

    pub fn add_word(&mut self, word: &str) {
        self.trie.insert(&word.trim().to_lowercase());
    }

    pub fn add_nsfw_word(&mut self, word: &str) {
        self.nsfw.insert(&word.trim().to_lowercase());
    }

    pub fn add_prefix(&mut self, prefix: &str) {
        self.prefixes.push(prefix.to_string());
    }

    /// Drop every loaded word, banned word, and prefix.
    pub fn clear(&mut self) {
        self.trie.clear();
        self.nsfw.clear();
        self.prefixes.clear();
    }

    pub fn clear_dictionary(&mut self) {
        self.trie.clear();
    }

    pub fn clear_prefixes(&mut self) {
        self.prefixes.clear();
    }

    pub fn clear_nsfw(&mut self) {
        self.nsfw.clear();
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Is `word` in the dictionary? Case and surrounding whitespace are ignored.
    pub fn check_user_word(&self, word: &str) -> bool {
        self.trie.search(&normalize(word))
    }

    pub fn is_nsfw_word(&self, word: &str) -> bool {
        self.nsfw.search(&normalize(word))
    }

    pub fn dictionary(&self) -> &Trie {
        &self.trie
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// A uniformly chosen entry from the prefix list.
    pub fn random_prefix(&mut self) -> Option<&str> {
        self.prefixes.choose(&mut self.rng).map(String::as_str)
    }

    /// Do at least `min` dictionary words start with `prefix`? Stops counting
    /// as soon as the answer is known.
    pub fn check_prefix_has_minimum_words(&self, prefix: &str, min: usize) -> bool {
        if self.trie.is_empty() {
            return false;
        }
        count_prefix_matches(self.trie.words(), prefix, min) >= min
    }

    /// Pick a prefix that at least `min_words` dictionary words start with.
    ///
    /// Each attempt samples a word of two or more letters and cuts it to
    /// `length` characters, or to a uniform length in `1..=length` when
    /// `randomize` is set. After `max_attempts` misses the candidate with the
    /// most matches seen so far is returned instead. An empty dictionary (or
    /// one with no eligible words) yields `""`.
    pub fn generate_prefix_from_random_word(&mut self, length: usize, randomize: bool) -> String {
        let length = length.max(1);
        let eligible: Vec<&String> = self
            .trie
            .words()
            .iter()
            .filter(|w| w.chars().count() >= 2)
            .collect();
        if eligible.is_empty() {
            return String::new();
        }

        let mut best: Option<(usize, String)> = None;
        for _ in 0..self.max_attempts {
            let Some(word) = eligible.choose(&mut self.rng) else {
                break;
            };
            let wanted = if randomize {
                self.rng.gen_range(1..=length)
            } else {
                length
            };
            let candidate: String = word.chars().take(wanted).collect();

            let matches = count_prefix_matches(self.trie.words(), &candidate, self.min_words);
            if matches >= self.min_words {
                return candidate;
            }
            if best.as_ref().is_none_or(|(n, _)| matches > *n) {
                best = Some((matches, candidate));
            }
        }

        let (matches, candidate) = best.unwrap_or_default();
        log::warn!(
            "No prefix of length {length} reached {} words after {} attempts; using '{candidate}' ({matches} words)",
            self.min_words,
            self.max_attempts
        );
        candidate
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of alphabetic characters in `word`.
pub fn count_letters(word: &str) -> usize {
    word.chars().filter(|c| c.is_alphabetic()).count()
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Words starting with `prefix`, counting no further than `cap`.
fn count_prefix_matches(words: &[String], prefix: &str, cap: usize) -> usize {
    words
        .iter()
        .filter(|w| w.starts_with(prefix))
        .take(cap)
        .count()
}

/// String entries of `doc[key]`, cleaned. A missing or non-array key yields
/// an empty list with a warning.
fn word_list(doc: &serde_json::Value, key: &str) -> Vec<String> {
    let Some(items) = doc.get(key).and_then(|v| v.as_array()) else {
        log::warn!("Word list has no \"{key}\" array");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.trim().trim_matches('"').trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lexicon_with(words: &[&str]) -> Lexicon {
        let mut lex = Lexicon::with_seed(7);
        lex.add_dictionary_from_value(&json!({ "words": words }));
        lex
    }

    #[test]
    fn word_lists_are_cleaned() {
        let mut lex = Lexicon::with_seed(1);
        let n = lex.add_dictionary_from_value(&json!({
            "words": ["  Apple ", "\"Pear\"", "", "   ", 42, "kiwi"]
        }));
        assert_eq!(n, 3);
        assert!(lex.check_user_word("apple"));
        assert!(lex.check_user_word("PEAR "));
        assert!(lex.check_user_word("Kiwi"));
        assert!(!lex.check_user_word(""));
    }

    #[test]
    fn prefixes_keep_case() {
        let mut lex = Lexicon::with_seed(1);
        lex.add_prefixes_from_value(&json!({"prefixes": [" Str ", "ap"]}));
        assert_eq!(lex.prefixes(), ["Str", "ap"]);
        let p = lex.random_prefix().unwrap().to_string();
        assert!(p == "Str" || p == "ap");
    }

    #[test]
    fn random_prefix_on_empty_list() {
        let mut lex = Lexicon::with_seed(1);
        assert_eq!(lex.random_prefix(), None);
    }

    #[test]
    fn nsfw_is_separate_from_dictionary() {
        let mut lex = lexicon_with(&["hello"]);
        lex.add_nsfw_from_value(&json!({"nsfw": ["Darn"]}));
        assert!(lex.is_nsfw_word("  DARN"));
        assert!(!lex.check_user_word("darn"));
        assert!(!lex.is_nsfw_word("hello"));
    }

    #[test]
    fn missing_key_loads_nothing() {
        let mut lex = Lexicon::with_seed(1);
        assert_eq!(lex.add_dictionary_from_value(&json!({"prefixes": ["a"]})), 0);
        assert!(lex.dictionary().is_empty());
    }

    #[test]
    fn minimum_words_check() {
        let lex = lexicon_with(&["cat", "car", "cart", "dog"]);
        assert!(lex.check_prefix_has_minimum_words("ca", 3));
        assert!(!lex.check_prefix_has_minimum_words("ca", 4));
        assert!(!Lexicon::with_seed(0).check_prefix_has_minimum_words("", 0));
    }

    #[test]
    fn generated_prefix_meets_threshold() {
        let mut words: Vec<String> = (0..25).map(|i| format!("pre{i:02}x")).collect();
        words.extend(["zebra".to_string(), "zone".to_string()]);
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut lex = lexicon_with(&refs);

        for _ in 0..20 {
            let p = lex.generate_prefix_from_random_word(3, false);
            assert_eq!(p, "pre");
        }
    }

    #[test]
    fn randomized_length_stays_in_range() {
        let words: Vec<String> = (0..30).map(|i| format!("stem{i:02}")).collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut lex = lexicon_with(&refs);
        for _ in 0..50 {
            let p = lex.generate_prefix_from_random_word(4, true);
            assert!((1..=4).contains(&p.chars().count()), "bad prefix {p}");
            assert!("stem".starts_with(&p));
        }
    }

    #[test]
    fn unsatisfiable_corpus_terminates_with_fallback() {
        // No 3-letter prefix is shared by 20 words.
        let mut lex = lexicon_with(&["abcde", "abcxy", "bcdef", "cdefg"]).with_prefix_rules(20, 50);
        let p = lex.generate_prefix_from_random_word(3, false);
        assert_eq!(p.chars().count(), 3);
        assert!(lex.dictionary().words().iter().any(|w| w.starts_with(&p)));
    }

    #[test]
    fn short_words_are_never_sampled() {
        let mut lex = lexicon_with(&["a", "b", "i"]);
        assert_eq!(lex.generate_prefix_from_random_word(2, false), "");
        assert_eq!(Lexicon::with_seed(3).generate_prefix_from_random_word(2, true), "");
    }

    #[test]
    fn prefix_is_clamped_to_word_length() {
        let mut lex = lexicon_with(&["ox"]).with_prefix_rules(1, 10);
        assert_eq!(lex.generate_prefix_from_random_word(5, false), "ox");
    }

    #[test]
    fn letters_are_counted() {
        assert_eq!(count_letters("it's 2 late!"), 7);
        assert_eq!(count_letters(""), 0);
    }
}

//! Prefix tree over `char`s.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    end_of_word: bool,
}

/// A word store answering exact and prefix queries in O(length).
///
/// Besides the tree, every inserted word is kept in a flat list so callers can
/// sample or scan whole words without walking nodes.
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    words: Vec<String>,
    word_set: HashSet<String>,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: &str) {
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }
        node.end_of_word = true;

        if self.word_set.insert(word.to_string()) {
            self.words.push(word.to_string());
        }
    }

    /// True only for words inserted verbatim, not for bare prefixes.
    pub fn search(&self, word: &str) -> bool {
        self.walk(word).is_some_and(|node| node.end_of_word)
    }

    /// True if some inserted word begins with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return !self.words.is_empty();
        }
        self.walk(prefix).is_some()
    }

    fn walk(&self, s: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in s.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Every inserted word, in first-insertion order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.word_set.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_of_a_word_is_not_a_word() {
        let mut trie = Trie::new();
        trie.insert("carpet");
        assert!(trie.search("carpet"));
        assert!(!trie.search("car"));
        assert!(trie.starts_with("car"));
        assert!(!trie.starts_with("cat"));
    }

    #[test]
    fn empty_prefix_needs_a_word() {
        let mut trie = Trie::new();
        assert!(!trie.starts_with(""));
        trie.insert("a");
        assert!(trie.starts_with(""));
        trie.clear();
        assert!(!trie.starts_with(""));
    }

    #[test]
    fn insertion_order_does_not_matter() {
        for order in [["car", "carpet"], ["carpet", "car"]] {
            let mut trie = Trie::new();
            for w in order {
                trie.insert(w);
            }
            assert!(trie.search("car"));
            assert!(trie.search("carpet"));
            assert!(!trie.search("carp"));
        }
    }

    #[test]
    fn every_prefix_is_found() {
        let mut trie = Trie::new();
        let words = ["alpha", "alps", "beta", "żółw"];
        for w in words {
            trie.insert(w);
        }
        for w in words {
            let chars: Vec<char> = w.chars().collect();
            for n in 1..=chars.len() {
                let prefix: String = chars[..n].iter().collect();
                assert!(trie.starts_with(&prefix), "missing prefix {prefix}");
            }
        }
    }

    #[test]
    fn duplicates_are_stored_once() {
        let mut trie = Trie::new();
        trie.insert("echo");
        trie.insert("echo");
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.words(), ["echo"]);
    }

    #[test]
    fn empty_string() {
        let mut trie = Trie::new();
        assert!(trie.starts_with(""));
        assert!(!trie.search(""));
        trie.insert("");
        assert!(trie.search(""));
    }
}

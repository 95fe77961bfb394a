//! A trie keyed by token sequences, used to resolve multi-token concept and
//! verb names by longest prefix.

use crate::token::{Token, TokenString};
use ahash::AHashMap;

struct TrieNode<V> {
    value: Option<V>,
    /// Set when the stored surface form is a plural, so that noun phrase
    /// scanning can infer grammatical number from the form that matched.
    is_plural: bool,
    children: AHashMap<Token, TrieNode<V>>,
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        TrieNode {
            value: None,
            is_plural: false,
            children: AHashMap::new(),
        }
    }
}

/// The result of a successful longest-prefix lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieMatch<'a, V> {
    /// The stored value.
    pub value: &'a V,
    /// How many input tokens the match consumed.
    pub length: usize,
    /// Whether the matched surface form was annotated as plural.
    pub is_plural: bool,
}

/// Maps token sequences to values of type `V`.
pub struct Trie<V> {
    root: TrieNode<V>,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Trie { root: TrieNode::default() }
    }
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: &TokenString, value: V) {
        let node = self.node_mut(key);
        node.value = Some(value);
    }

    /// Stores `value` under `key` and marks the stored form as plural.
    pub fn insert_plural(&mut self, key: &TokenString, value: V) {
        let node = self.node_mut(key);
        node.value = Some(value);
        node.is_plural = true;
    }

    /// Marks an existing entry's surface form as plural. Does nothing if the
    /// key is absent.
    pub fn annotate_plural(&mut self, key: &TokenString) {
        let mut node = &mut self.root;
        for token in key.tokens() {
            match node.children.get_mut(token) {
                Some(child) => node = child,
                None => return,
            }
        }
        if node.value.is_some() {
            node.is_plural = true;
        }
    }

    /// Removes the entry stored under `key`, returning its value. Interior
    /// nodes are left in place; they are cheap and reused on re-insertion.
    pub fn remove(&mut self, key: &TokenString) -> Option<V> {
        let mut node = &mut self.root;
        for token in key.tokens() {
            node = node.children.get_mut(token)?;
        }
        node.is_plural = false;
        node.value.take()
    }

    /// Exact lookup.
    pub fn get(&self, key: &TokenString) -> Option<&V> {
        let mut node = &self.root;
        for token in key.tokens() {
            node = node.children.get(token)?;
        }
        node.value.as_ref()
    }

    /// Finds the longest entry that is a prefix of `input`, scanning from the
    /// front of the slice. This is what a parser cursor calls with the
    /// remainder of its input.
    pub fn longest_match<'a>(&'a self, input: &[Token]) -> Option<TrieMatch<'a, V>> {
        let mut node = &self.root;
        let mut best = None;
        for (i, token) in input.iter().enumerate() {
            match node.children.get(token) {
                Some(child) => node = child,
                None => break,
            }
            if let Some(value) = &node.value {
                best = Some(TrieMatch {
                    value,
                    length: i + 1,
                    is_plural: node.is_plural,
                });
            }
        }
        best
    }

    fn node_mut(&mut self, key: &TokenString) -> &mut TrieNode<V> {
        let mut node = &mut self.root;
        for token in key.tokens() {
            node = node.children.entry(token.clone()).or_default();
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(phrase: &str) -> TokenString {
        TokenString::from_phrase(phrase)
    }

    #[test]
    fn insert_and_get() {
        let mut trie = Trie::new();
        trie.insert(&key("cat"), 1);
        trie.insert(&key("polar bear"), 2);
        assert_eq!(trie.get(&key("cat")), Some(&1));
        assert_eq!(trie.get(&key("polar bear")), Some(&2));
        assert_eq!(trie.get(&key("polar")), None);
    }

    #[test]
    fn longest_prefix_wins() {
        let mut trie = Trie::new();
        trie.insert(&key("work"), 1);
        trie.insert(&key("work for"), 2);
        let input = key("work for one employer");
        let m = trie.longest_match(input.tokens()).unwrap();
        assert_eq!((m.value, m.length), (&2, 2));
    }

    #[test]
    fn falls_back_to_shorter_prefix() {
        let mut trie = Trie::new();
        trie.insert(&key("work"), 1);
        trie.insert(&key("work for"), 2);
        let input = key("work hard");
        let m = trie.longest_match(input.tokens()).unwrap();
        assert_eq!((m.value, m.length), (&1, 1));
    }

    #[test]
    fn plural_annotation_round_trips() {
        let mut trie = Trie::new();
        trie.insert(&key("cat"), 1);
        trie.insert_plural(&key("cats"), 1);
        let input = key("cats are nice");
        let m = trie.longest_match(input.tokens()).unwrap();
        assert!(m.is_plural);
        let input = key("cat is nice");
        let m = trie.longest_match(input.tokens()).unwrap();
        assert!(!m.is_plural);
    }

    #[test]
    fn remove_clears_entry() {
        let mut trie = Trie::new();
        trie.insert(&key("cat"), 1);
        assert_eq!(trie.remove(&key("cat")), Some(1));
        assert_eq!(trie.get(&key("cat")), None);
        assert_eq!(trie.remove(&key("cat")), None);
    }
}

//! Individuals: the runtime objects that populate an invention.

use super::concept::{CommonNounId, MonadicLiteral};
use crate::token::TokenString;

/// The individuals instantiated for one part slot of a container.
#[derive(Debug, Clone)]
pub struct PartInstance {
    /// The part's declared (singular) name.
    pub name: TokenString,
    /// Indices of the child individuals, in creation order.
    pub members: Vec<usize>,
}

/// A runtime object participating in an invention.
///
/// Individuals are identified by their index in the owning collection (the
/// ontology's permanent list, or a generation's working list); that index is
/// monotonic in creation order and doubles as the total order the generator
/// relies on for symmetric-relation deduplication.
#[derive(Debug, Clone)]
pub struct Individual {
    pub name: TokenString,
    /// The kinds asserted of this individual. Invariant: never contains a
    /// kind strictly dominated by another kind in the list.
    pub kinds: Vec<CommonNounId>,
    pub modifiers: Vec<MonadicLiteral>,
    /// For a part-individual, the owning individual's index.
    pub container: Option<usize>,
    /// For a part-individual, the (singular) name of the part slot it fills.
    pub container_part: Option<TokenString>,
    /// The instantiated parts of this individual, one entry per part slot.
    pub parts: Vec<PartInstance>,
    /// True for individuals created within one generation; false for the
    /// permanent individuals behind proper nouns.
    pub ephemeral: bool,
}

impl Individual {
    pub fn new(name: TokenString, ephemeral: bool) -> Self {
        Individual {
            name,
            kinds: Vec::new(),
            modifiers: Vec::new(),
            container: None,
            container_part: None,
            parts: Vec::new(),
            ephemeral,
        }
    }

    pub fn is_named(&self, tokens: &TokenString) -> bool {
        self.name == *tokens
    }

    /// Adds a kind, maintaining the normalization invariant: the list never
    /// keeps a kind strictly dominated by another. `dominates(a, b)` must
    /// return whether `a` is `b` or a super-kind of `b`.
    pub fn add_kind<F>(&mut self, kind: CommonNounId, dominates: F)
    where
        F: Fn(CommonNounId, CommonNounId) -> bool,
    {
        // An existing kind at or below the new one makes it redundant.
        if self.kinds.iter().any(|&k| dominates(kind, k)) {
            return;
        }
        self.kinds.retain(|&k| !dominates(k, kind));
        self.kinds.push(kind);
    }

    pub fn part_instance(&self, name: &TokenString) -> Option<&PartInstance> {
        self.parts.iter().find(|p| p.name == *name)
    }
}

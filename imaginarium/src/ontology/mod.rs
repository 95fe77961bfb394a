//! The ontology: an arena owning every concept, the name tries, and the
//! permanent individuals, together with the rules attached to them.

pub mod concept;
pub mod individual;

pub use concept::{
    Adjective, AdjectiveId, AlternativeSet, CommonNoun, CommonNounId, ConditionalModifier,
    IntervalRule, KindAndModifiers, MenuRule, MonadicId, MonadicLiteral, Part, Property,
    PropertyType, ProperNoun, ProperNounId, ReferentFamily, SuperkindEdge, TestDecl, Verb,
    VerbForm, VerbId, VerbShape, UNBOUNDED,
};
pub use individual::{Individual, PartInstance};

use crate::morphology::{self, Number};
use crate::token::TokenString;
use crate::trie::Trie;
use ahash::AHashMap;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for ontology mutation.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// A new referent's name is already owned by a referent of a different
    /// type, under some inflection.
    #[error("'{name}' is already a {existing}, so it can't be a {attempted}")]
    NameCollision {
        name: TokenString,
        existing: ReferentFamily,
        attempted: ReferentFamily,
    },

    /// A locked ontology refused to introduce a new referent.
    #[error("'{name}' is not a known {family}, and no new terms can be defined here")]
    UnknownReferent {
        name: TokenString,
        family: ReferentFamily,
    },

    /// Declaring the super-kind would create a cycle in the kind lattice.
    #[error("'{sub}' cannot be a kind of '{superkind}': that would make each a kind of the other")]
    KindCycle {
        sub: TokenString,
        superkind: TokenString,
    },

    #[error(transparent)]
    Morphology(#[from] morphology::MorphologyError),
}

/// A resolved referent of any family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referent {
    CommonNoun(CommonNounId),
    Adjective(AdjectiveId),
    Verb(VerbId),
    ProperNoun(ProperNounId),
}

/// The set of all concepts, individuals and rules authored so far, plus the
/// tries that resolve their names.
#[derive(Default)]
pub struct Ontology {
    nouns: Vec<CommonNoun>,
    adjectives: Vec<Adjective>,
    verbs: Vec<Verb>,
    proper_nouns: Vec<ProperNoun>,
    /// Permanent individuals, bound by proper nouns and reused across
    /// generations.
    individuals: Vec<Individual>,
    monadic_trie: Trie<MonadicId>,
    verb_trie: Trie<(VerbId, VerbForm)>,
    /// Every registered surface form, for cross-family collision checks.
    names: AHashMap<TokenString, ReferentFamily>,
    tests: Vec<TestDecl>,
    locked: bool,

    /// Optional directory probed for per-referent `.gen` files and list
    /// `.txt` files.
    pub definitions_directory: Option<PathBuf>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    /// Button-label to command-text bindings, for an interactive driver.
    pub buttons: Vec<(String, String)>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    /// When locked, statements may attach new facts to existing referents
    /// but may not introduce new ones.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Tears down every concept, individual and rule.
    pub fn erase_concepts(&mut self) {
        let definitions_directory = self.definitions_directory.take();
        *self = Ontology {
            definitions_directory,
            ..Ontology::default()
        };
    }

    // --- Access by id ---

    pub fn noun(&self, id: CommonNounId) -> &CommonNoun {
        &self.nouns[id.index()]
    }

    pub(crate) fn noun_mut(&mut self, id: CommonNounId) -> &mut CommonNoun {
        &mut self.nouns[id.index()]
    }

    pub fn adjective(&self, id: AdjectiveId) -> &Adjective {
        &self.adjectives[id.index()]
    }

    pub(crate) fn adjective_mut(&mut self, id: AdjectiveId) -> &mut Adjective {
        &mut self.adjectives[id.index()]
    }

    pub fn verb(&self, id: VerbId) -> &Verb {
        &self.verbs[id.index()]
    }

    pub(crate) fn verb_mut(&mut self, id: VerbId) -> &mut Verb {
        &mut self.verbs[id.index()]
    }

    pub fn proper_noun(&self, id: ProperNounId) -> &ProperNoun {
        &self.proper_nouns[id.index()]
    }

    pub fn permanent_individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn tests(&self) -> &[TestDecl] {
        &self.tests
    }

    pub(crate) fn add_test(&mut self, test: TestDecl) {
        self.tests.push(test);
    }

    pub fn noun_ids(&self) -> impl Iterator<Item = CommonNounId> {
        (0..self.nouns.len() as u32).map(CommonNounId)
    }

    pub fn verb_ids(&self) -> impl Iterator<Item = VerbId> {
        (0..self.verbs.len() as u32).map(VerbId)
    }

    // --- Name lookup ---

    /// The monadic-concept trie, for noun/adjective phrase scanning.
    pub fn monadic_trie(&self) -> &Trie<MonadicId> {
        &self.monadic_trie
    }

    /// The verb trie; every inflection maps to the same verb.
    pub fn verb_trie(&self) -> &Trie<(VerbId, VerbForm)> {
        &self.verb_trie
    }

    pub fn find_monadic(&self, name: &TokenString) -> Option<MonadicId> {
        self.monadic_trie.get(name).copied()
    }

    pub fn find_common_noun(&self, name: &TokenString) -> Option<CommonNounId> {
        match self.find_monadic(name) {
            Some(MonadicId::Noun(id)) => Some(id),
            _ => None,
        }
    }

    pub fn find_adjective(&self, name: &TokenString) -> Option<AdjectiveId> {
        match self.find_monadic(name) {
            Some(MonadicId::Adjective(id)) => Some(id),
            _ => None,
        }
    }

    pub fn find_verb(&self, name: &TokenString) -> Option<VerbId> {
        self.verb_trie.get(name).map(|&(id, _)| id)
    }

    pub fn find_proper_noun(&self, name: &TokenString) -> Option<ProperNounId> {
        self.proper_nouns
            .iter()
            .position(|p| p.name == *name)
            .map(|i| ProperNounId(i as u32))
    }

    /// Resolves a name to whatever referent owns it, probing the proper
    /// nouns, then the monadic-concept trie, then the verb trie.
    pub fn referent(&self, name: &TokenString) -> Option<Referent> {
        if let Some(id) = self.find_proper_noun(name) {
            return Some(Referent::ProperNoun(id));
        }
        match self.find_monadic(name) {
            Some(MonadicId::Noun(id)) => return Some(Referent::CommonNoun(id)),
            Some(MonadicId::Adjective(id)) => return Some(Referent::Adjective(id)),
            None => {}
        }
        self.find_verb(name).map(Referent::Verb)
    }

    fn check_collision(
        &self,
        name: &TokenString,
        attempted: ReferentFamily,
    ) -> Result<(), OntologyError> {
        match self.names.get(name) {
            Some(&existing) if existing != attempted => Err(OntologyError::NameCollision {
                name: name.clone(),
                existing,
                attempted,
            }),
            _ => Ok(()),
        }
    }

    fn register_name(&mut self, name: &TokenString, family: ReferentFamily) {
        self.names.insert(name.clone(), family);
    }

    // --- Common nouns ---

    /// Finds or creates the common noun named by `name`, given in the stated
    /// grammatical number (or a best guess when `None`). The missing
    /// inflection is computed by morphology, and both surface forms go into
    /// the monadic trie, the plural annotated as such.
    pub fn add_common_noun(
        &mut self,
        name: &TokenString,
        number: Option<Number>,
    ) -> Result<CommonNounId, OntologyError> {
        if let Some(existing) = self.find_monadic(name) {
            return match existing {
                MonadicId::Noun(id) => Ok(id),
                MonadicId::Adjective(_) => Err(OntologyError::NameCollision {
                    name: name.clone(),
                    existing: ReferentFamily::Adjective,
                    attempted: ReferentFamily::CommonNoun,
                }),
            };
        }
        self.check_collision(name, ReferentFamily::CommonNoun)?;
        if self.locked {
            return Err(OntologyError::UnknownReferent {
                name: name.clone(),
                family: ReferentFamily::CommonNoun,
            });
        }
        let number = number.unwrap_or(if morphology::noun_appears_plural(name) {
            Number::Plural
        } else {
            Number::Singular
        });
        let (singular, plural) = match number {
            Number::Singular => (name.clone(), morphology::plural_of_noun(name)?),
            Number::Plural => (morphology::singular_of_noun(name)?, name.clone()),
        };
        let id = CommonNounId(self.nouns.len() as u32);
        self.monadic_trie.insert(&singular, MonadicId::Noun(id));
        if plural != singular {
            self.monadic_trie.insert_plural(&plural, MonadicId::Noun(id));
        }
        self.register_name(&singular, ReferentFamily::CommonNoun);
        self.register_name(&plural, ReferentFamily::CommonNoun);
        self.nouns.push(CommonNoun::new(singular, plural));
        Ok(id)
    }

    /// Overrides a noun's plural form ("the plural of fish is fish").
    pub fn set_plural(&mut self, id: CommonNounId, plural: TokenString) {
        let old = self.nouns[id.index()].plural.clone();
        if old != self.nouns[id.index()].singular {
            self.monadic_trie.remove(&old);
        }
        self.monadic_trie.insert_plural(&plural, MonadicId::Noun(id));
        self.register_name(&plural, ReferentFamily::CommonNoun);
        self.nouns[id.index()].plural = plural;
    }

    /// Overrides a noun's singular form.
    pub fn set_singular(&mut self, id: CommonNounId, singular: TokenString) {
        let old = self.nouns[id.index()].singular.clone();
        if old != self.nouns[id.index()].plural {
            self.monadic_trie.remove(&old);
        }
        self.monadic_trie.insert(&singular, MonadicId::Noun(id));
        self.register_name(&singular, ReferentFamily::CommonNoun);
        self.nouns[id.index()].singular = singular;
    }

    // --- Adjectives ---

    pub fn add_adjective(&mut self, name: &TokenString) -> Result<AdjectiveId, OntologyError> {
        if let Some(existing) = self.find_monadic(name) {
            return match existing {
                MonadicId::Adjective(id) => Ok(id),
                MonadicId::Noun(_) => Err(OntologyError::NameCollision {
                    name: name.clone(),
                    existing: ReferentFamily::CommonNoun,
                    attempted: ReferentFamily::Adjective,
                }),
            };
        }
        self.check_collision(name, ReferentFamily::Adjective)?;
        if self.locked {
            return Err(OntologyError::UnknownReferent {
                name: name.clone(),
                family: ReferentFamily::Adjective,
            });
        }
        let id = AdjectiveId(self.adjectives.len() as u32);
        self.monadic_trie.insert(name, MonadicId::Adjective(id));
        self.register_name(name, ReferentFamily::Adjective);
        self.adjectives.push(Adjective::new(name.clone()));
        Ok(id)
    }

    /// Notes that `adjective` is worth mentioning for individuals of `noun`.
    pub fn add_relevant_adjective(&mut self, noun: CommonNounId, adjective: AdjectiveId) {
        let list = &mut self.nouns[noun.index()].relevant_adjectives;
        if !list.contains(&adjective) {
            list.push(adjective);
        }
    }

    // --- Verbs ---

    /// Finds or creates a verb from its base (plural) form. Creation
    /// canonically installs every inflection into the verb trie: the base,
    /// the third-person singular, all plausible gerunds, and the passive
    /// participle.
    pub fn add_verb(&mut self, base: &TokenString) -> Result<VerbId, OntologyError> {
        if let Some(&(id, _)) = self.verb_trie.get(base) {
            return Ok(id);
        }
        self.check_collision(base, ReferentFamily::Verb)?;
        if self.locked {
            return Err(OntologyError::UnknownReferent {
                name: base.clone(),
                family: ReferentFamily::Verb,
            });
        }
        let third_person = morphology::singular_of_verb(base)?;
        let passive = morphology::passive_participle(base)?;
        let gerunds = morphology::gerunds_of_verb(base);
        let id = VerbId(self.verbs.len() as u32);
        self.verb_trie.insert(base, (id, VerbForm::Base));
        self.verb_trie.insert(&third_person, (id, VerbForm::ThirdPerson));
        self.verb_trie.insert(&passive, (id, VerbForm::PassiveParticiple));
        self.register_name(base, ReferentFamily::Verb);
        self.register_name(&third_person, ReferentFamily::Verb);
        self.register_name(&passive, ReferentFamily::Verb);
        for gerund in &gerunds {
            self.verb_trie.insert(gerund, (id, VerbForm::Gerund));
            self.register_name(gerund, ReferentFamily::Verb);
        }
        let mut verb = Verb::new(base.clone(), third_person, passive);
        verb.gerunds = gerunds;
        self.verbs.push(verb);
        Ok(id)
    }

    /// Finds or creates a verb named by a gerund ("flirting is a way of
    /// interacting" introduces both sides in gerund form).
    pub fn add_verb_from_gerund(&mut self, gerund: &TokenString) -> Result<VerbId, OntologyError> {
        if let Some(&(id, _)) = self.verb_trie.get(gerund) {
            return Ok(id);
        }
        let base = morphology::base_forms_of_gerund(gerund)
            .into_iter()
            .next()
            .ok_or_else(|| {
                OntologyError::from(morphology::MorphologyError::CannotInflect(
                    gerund.first().cloned().unwrap_or_else(|| "".into()),
                ))
            })?;
        self.add_verb(&base)
    }

    /// Adds an admissible (subject, object) shape to a verb.
    ///
    /// A new shape whose kinds dominate an existing unmodified shape's
    /// kinds replaces it; a new shape dominated by an existing unmodified
    /// shape is dropped. A modified shape is never deleted; anything else
    /// is appended.
    pub fn add_verb_shape(&mut self, verb: VerbId, shape: VerbShape) {
        let generalizes = |general: &VerbShape, specific: &VerbShape, ont: &Self| {
            ont.dominates(general.subject.kind, specific.subject.kind)
                && ont.dominates(general.object.kind, specific.object.kind)
        };
        let unmodified =
            |s: &VerbShape| s.subject.modifiers.is_empty() && s.object.modifiers.is_empty();
        let shapes = std::mem::take(&mut self.verbs[verb.index()].shapes);
        let mut kept: Vec<VerbShape> = Vec::with_capacity(shapes.len() + 1);
        let mut new_is_subsumed = false;
        for existing in shapes {
            // Only an unmodified existing shape can be folded either way;
            // the new shape's side is decided by kind dominance alone.
            if unmodified(&existing) && generalizes(&shape, &existing, self) {
                // The new shape replaces this one.
                continue;
            }
            if unmodified(&existing) && generalizes(&existing, &shape, self) {
                new_is_subsumed = true;
            }
            kept.push(existing);
        }
        if !new_is_subsumed {
            kept.push(shape);
        }
        self.verbs[verb.index()].shapes = kept;
    }

    /// Whether the verb or any super-species ancestor is reflexive.
    pub fn ancestor_is_reflexive(&self, verb: VerbId) -> bool {
        self.any_verb_ancestor(verb, |v| v.is_reflexive)
    }

    /// Whether the verb or any super-species ancestor is anti-reflexive.
    pub fn ancestor_is_anti_reflexive(&self, verb: VerbId) -> bool {
        self.any_verb_ancestor(verb, |v| v.is_anti_reflexive)
    }

    fn any_verb_ancestor<F: Fn(&Verb) -> bool>(&self, verb: VerbId, predicate: F) -> bool {
        let mut stack = vec![verb];
        let mut seen = vec![false; self.verbs.len()];
        while let Some(v) = stack.pop() {
            if seen[v.index()] {
                continue;
            }
            seen[v.index()] = true;
            if predicate(self.verb(v)) {
                return true;
            }
            stack.extend(self.verb(v).superspecies.iter().copied());
        }
        false
    }

    // --- The kind lattice ---

    /// Declares `sub` to be a kind of `superkind`, with a relative frequency
    /// annotating the edge. Idempotent; rejects cycles.
    pub fn declare_superkind(
        &mut self,
        sub: CommonNounId,
        superkind: CommonNounId,
        frequency: f32,
    ) -> Result<(), OntologyError> {
        if sub == superkind || self.dominates(sub, superkind) {
            return Err(OntologyError::KindCycle {
                sub: self.noun(sub).singular.clone(),
                superkind: self.noun(superkind).singular.clone(),
            });
        }
        if let Some(edge) = self.nouns[sub.index()]
            .superkinds
            .iter_mut()
            .find(|e| e.parent == superkind)
        {
            edge.frequency = frequency;
            return Ok(());
        }
        self.nouns[sub.index()]
            .superkinds
            .push(SuperkindEdge { parent: superkind, frequency });
        self.nouns[superkind.index()].subkinds.push(sub);
        Ok(())
    }

    /// Whether `ancestor` is `descendant` or dominates it in the lattice.
    pub fn dominates(&self, ancestor: CommonNounId, descendant: CommonNounId) -> bool {
        if ancestor == descendant {
            return true;
        }
        let mut stack = vec![descendant];
        let mut seen = vec![false; self.nouns.len()];
        while let Some(k) = stack.pop() {
            if seen[k.index()] {
                continue;
            }
            seen[k.index()] = true;
            for edge in &self.noun(k).superkinds {
                if edge.parent == ancestor {
                    return true;
                }
                stack.push(edge.parent);
            }
        }
        false
    }

    /// The kind and all kinds dominating it, nearest first.
    pub fn with_ancestors(&self, kind: CommonNounId) -> Vec<CommonNounId> {
        let mut result = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(kind);
        while let Some(k) = queue.pop_front() {
            if result.contains(&k) {
                continue;
            }
            result.push(k);
            for edge in &self.noun(k).superkinds {
                queue.push_back(edge.parent);
            }
        }
        result
    }

    /// The nearest common ancestor of `a` and `b`, or `None` if the two
    /// kinds share no super-kind.
    pub fn least_upper_bound(&self, a: CommonNounId, b: CommonNounId) -> Option<CommonNounId> {
        let ancestors_of_a = self.with_ancestors(a);
        self.with_ancestors(b)
            .into_iter()
            .find(|k| ancestors_of_a.contains(k))
    }

    // --- Individuals and proper nouns ---

    /// Creates (or extends) the permanent individual behind a proper noun.
    pub fn add_proper_noun(
        &mut self,
        name: &TokenString,
        kinds: &[CommonNounId],
    ) -> Result<ProperNounId, OntologyError> {
        if let Some(id) = self.find_proper_noun(name) {
            let index = self.proper_noun(id).individual;
            for &kind in kinds {
                let dominates = |a, b| self.dominates(a, b);
                let mut individual = self.individuals[index].clone();
                individual.add_kind(kind, dominates);
                self.individuals[index] = individual;
            }
            return Ok(id);
        }
        self.check_collision(name, ReferentFamily::ProperNoun)?;
        if self.locked {
            return Err(OntologyError::UnknownReferent {
                name: name.clone(),
                family: ReferentFamily::ProperNoun,
            });
        }
        let index = self.individuals.len();
        let mut individual = Individual::new(name.clone(), false);
        for &kind in kinds {
            let dominates = |a, b| self.dominates(a, b);
            individual.add_kind(kind, dominates);
        }
        self.individuals.push(individual);
        let id = ProperNounId(self.proper_nouns.len() as u32);
        self.proper_nouns.push(ProperNoun { name: name.clone(), individual: index });
        self.register_name(name, ReferentFamily::ProperNoun);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(phrase: &str) -> TokenString {
        TokenString::from_phrase(phrase)
    }

    fn noun(ontology: &mut Ontology, name: &str) -> CommonNounId {
        ontology
            .add_common_noun(&ts(name), Some(Number::Singular))
            .unwrap()
    }

    #[test]
    fn common_nouns_are_idempotent_and_inflected() {
        let mut ontology = Ontology::new();
        let cat = noun(&mut ontology, "cat");
        assert_eq!(ontology.add_common_noun(&ts("cats"), None).unwrap(), cat);
        assert_eq!(ontology.find_common_noun(&ts("cats")), Some(cat));
        assert_eq!(ontology.noun(cat).plural, ts("cats"));
    }

    #[test]
    fn name_collision_across_families() {
        let mut ontology = Ontology::new();
        noun(&mut ontology, "cat");
        let err = ontology.add_adjective(&ts("cat")).unwrap_err();
        assert!(matches!(err, OntologyError::NameCollision { .. }));
    }

    #[test]
    fn locked_ontology_rejects_new_referents() {
        let mut ontology = Ontology::new();
        let cat = noun(&mut ontology, "cat");
        ontology.lock();
        let err = ontology.add_common_noun(&ts("dog"), None).unwrap_err();
        assert!(matches!(err, OntologyError::UnknownReferent { .. }));
        // Existing referents still resolve.
        assert_eq!(ontology.add_common_noun(&ts("cat"), None).unwrap(), cat);
    }

    #[test]
    fn superkind_cycles_are_rejected() {
        let mut ontology = Ontology::new();
        let cat = noun(&mut ontology, "cat");
        let animal = noun(&mut ontology, "animal");
        ontology.declare_superkind(cat, animal, 1.0).unwrap();
        let err = ontology.declare_superkind(animal, cat, 1.0).unwrap_err();
        assert!(matches!(err, OntologyError::KindCycle { .. }));
    }

    #[test]
    fn least_upper_bound_over_the_lattice() {
        let mut ontology = Ontology::new();
        let animal = noun(&mut ontology, "animal");
        let cat = noun(&mut ontology, "cat");
        let dog = noun(&mut ontology, "dog");
        let persian = noun(&mut ontology, "persian");
        ontology.declare_superkind(cat, animal, 1.0).unwrap();
        ontology.declare_superkind(dog, animal, 1.0).unwrap();
        ontology.declare_superkind(persian, cat, 1.0).unwrap();
        assert_eq!(ontology.least_upper_bound(persian, dog), Some(animal));
        assert_eq!(ontology.least_upper_bound(persian, cat), Some(cat));
        let lonely = noun(&mut ontology, "rock");
        assert_eq!(ontology.least_upper_bound(lonely, cat), None);
    }

    #[test]
    fn verb_creation_installs_all_inflections() {
        let mut ontology = Ontology::new();
        let love = ontology.add_verb(&ts("love")).unwrap();
        assert_eq!(ontology.find_verb(&ts("loves")), Some(love));
        assert_eq!(ontology.find_verb(&ts("loving")), Some(love));
        assert_eq!(ontology.find_verb(&ts("loved")), Some(love));
        assert_eq!(ontology.add_verb_from_gerund(&ts("loving")).unwrap(), love);
    }

    #[test]
    fn verb_shape_subsumption() {
        let mut ontology = Ontology::new();
        let animal = noun(&mut ontology, "animal");
        let cat = noun(&mut ontology, "cat");
        ontology.declare_superkind(cat, animal, 1.0).unwrap();
        let chase = ontology.add_verb(&ts("chase")).unwrap();
        ontology.add_verb_shape(
            chase,
            VerbShape {
                subject: KindAndModifiers::bare(cat),
                object: KindAndModifiers::bare(cat),
            },
        );
        // The more general shape replaces the specific one.
        ontology.add_verb_shape(
            chase,
            VerbShape {
                subject: KindAndModifiers::bare(animal),
                object: KindAndModifiers::bare(animal),
            },
        );
        assert_eq!(ontology.verb(chase).shapes.len(), 1);
        assert_eq!(ontology.verb(chase).shapes[0].subject.kind, animal);
        // A shape subsumed by what's already there is dropped.
        ontology.add_verb_shape(
            chase,
            VerbShape {
                subject: KindAndModifiers::bare(cat),
                object: KindAndModifiers::bare(cat),
            },
        );
        assert_eq!(ontology.verb(chase).shapes.len(), 1);
        // A modified shape whose kinds dominate an unmodified one still
        // replaces it; only the existing shape's modifiers gate folding.
        let hungry = ontology.add_adjective(&ts("hungry")).unwrap();
        ontology.add_verb_shape(
            chase,
            VerbShape {
                subject: KindAndModifiers::bare(animal),
                object: KindAndModifiers {
                    kind: animal,
                    modifiers: vec![MonadicLiteral::positive(MonadicId::Adjective(hungry))],
                },
            },
        );
        assert_eq!(ontology.verb(chase).shapes.len(), 1);
        assert!(!ontology.verb(chase).shapes[0].object.modifiers.is_empty());
        // A modified shape is never deleted, so a later unmodified shape
        // with narrower kinds is appended alongside it.
        ontology.add_verb_shape(
            chase,
            VerbShape {
                subject: KindAndModifiers::bare(cat),
                object: KindAndModifiers::bare(cat),
            },
        );
        assert_eq!(ontology.verb(chase).shapes.len(), 2);
    }

    #[test]
    fn proper_nouns_bind_permanent_individuals() {
        let mut ontology = Ontology::new();
        let cat = noun(&mut ontology, "cat");
        let id = ontology.add_proper_noun(&ts("felix"), &[cat]).unwrap();
        let individual = &ontology.permanent_individuals()[ontology.proper_noun(id).individual];
        assert!(!individual.ephemeral);
        assert_eq!(individual.kinds, vec![cat]);
    }

    #[test]
    fn referent_resolution_order() {
        let mut ontology = Ontology::new();
        let cat = noun(&mut ontology, "cat");
        let love = ontology.add_verb(&ts("love")).unwrap();
        let felix = ontology.add_proper_noun(&ts("felix"), &[cat]).unwrap();
        assert_eq!(ontology.referent(&ts("cat")), Some(Referent::CommonNoun(cat)));
        assert_eq!(ontology.referent(&ts("loves")), Some(Referent::Verb(love)));
        assert_eq!(ontology.referent(&ts("felix")), Some(Referent::ProperNoun(felix)));
        assert_eq!(ontology.referent(&ts("dog")), None);
    }

    #[test]
    fn erase_concepts_clears_everything() {
        let mut ontology = Ontology::new();
        noun(&mut ontology, "cat");
        ontology.add_verb(&ts("love")).unwrap();
        ontology.erase_concepts();
        assert_eq!(ontology.referent(&ts("cat")), None);
        assert_eq!(ontology.referent(&ts("love")), None);
        assert!(ontology.permanent_individuals().is_empty());
    }

    #[test]
    fn kind_list_stays_normalized() {
        let mut ontology = Ontology::new();
        let animal = noun(&mut ontology, "animal");
        let cat = noun(&mut ontology, "cat");
        ontology.declare_superkind(cat, animal, 1.0).unwrap();
        let id = ontology.add_proper_noun(&ts("felix"), &[animal]).unwrap();
        ontology.add_proper_noun(&ts("felix"), &[cat]).unwrap();
        let individual = &ontology.permanent_individuals()[ontology.proper_noun(id).individual];
        assert_eq!(individual.kinds, vec![cat]);
    }
}

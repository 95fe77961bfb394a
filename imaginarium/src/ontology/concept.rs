//! The concept types stored in the ontology arena.
//!
//! Every cross-reference between concepts is an opaque id into the owning
//! [`Ontology`](super::Ontology); lookups are functions on the ontology, not
//! methods on detached references.

use crate::token::TokenString;
use std::fmt;

/// An upper bound at or above this sentinel means "no upper bound". It is
/// kept far below `u32::MAX` so that sums of bounds cannot overflow inside
/// cardinality encodings.
pub const UNBOUNDED: u32 = 1 << 20;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

id_type!(
    /// Identifies a [`CommonNoun`] in its ontology.
    CommonNounId
);
id_type!(
    /// Identifies an [`Adjective`] in its ontology.
    AdjectiveId
);
id_type!(
    /// Identifies a [`Verb`] in its ontology.
    VerbId
);
id_type!(
    /// Identifies a [`ProperNoun`] in its ontology.
    ProperNounId
);

/// A unary predicate over individuals: either a kind or an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MonadicId {
    Noun(CommonNounId),
    Adjective(AdjectiveId),
}

/// A signed monadic concept. This is the only thing constraints ever store
/// for monadic facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonadicLiteral {
    pub concept: MonadicId,
    pub positive: bool,
}

impl MonadicLiteral {
    pub fn positive(concept: MonadicId) -> Self {
        MonadicLiteral { concept, positive: true }
    }

    pub fn negative(concept: MonadicId) -> Self {
        MonadicLiteral { concept, positive: false }
    }
}

/// Which referent family a name belongs to. Used for collision diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentFamily {
    CommonNoun,
    Adjective,
    Verb,
    ProperNoun,
}

impl fmt::Display for ReferentFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ReferentFamily::CommonNoun => "common noun",
            ReferentFamily::Adjective => "adjective",
            ReferentFamily::Verb => "verb",
            ReferentFamily::ProperNoun => "proper noun",
        };
        write!(f, "{}", name)
    }
}

/// An edge from a sub-kind up to one of its super-kinds. The relative
/// frequency annotates the edge, not either node; it biases which sub-kind
/// the generator picks when the parent requires exactly one.
#[derive(Debug, Clone)]
pub struct SuperkindEdge {
    pub parent: CommonNounId,
    pub frequency: f32,
}

/// A bounded-cardinality disjunction over signed adjectives, attached to a
/// kind: "between `min_count` and `max_count` of these hold".
#[derive(Debug, Clone)]
pub struct AlternativeSet {
    pub alternatives: Vec<MonadicLiteral>,
    pub frequencies: Vec<f32>,
    pub min_count: u32,
    pub max_count: u32,
    /// When set and every alternative is a single-use positive adjective,
    /// the generator seeds one member true per individual instead of leaving
    /// the choice entirely to the solver.
    pub allow_pre_initialization: bool,
}

/// "If all `conditions` hold of an individual of this kind, then `modifier`
/// holds of it."
#[derive(Debug, Clone)]
pub struct ConditionalModifier {
    pub conditions: Vec<MonadicLiteral>,
    pub modifier: MonadicLiteral,
}

/// A containment slot on a kind. During instance expansion every part yields
/// `count` fresh individuals of `kind`, each tagged with `modifiers`.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: TokenString,
    pub count: u32,
    pub kind: CommonNounId,
    pub modifiers: Vec<MonadicLiteral>,
}

/// A menu rule: when `conditions` hold of the individual, the menu is
/// restricted to `entries`.
#[derive(Debug, Clone)]
pub struct MenuRule {
    pub conditions: Vec<MonadicLiteral>,
    pub entries: Vec<String>,
}

/// An interval rule: when `conditions` hold, the value is confined to
/// `low..=high`.
#[derive(Debug, Clone)]
pub struct IntervalRule {
    pub conditions: Vec<MonadicLiteral>,
    pub low: f64,
    pub high: f64,
}

/// The type of a property: a finite menu of strings or a continuous
/// interval, either one refinable by conditional rules.
#[derive(Debug, Clone)]
pub enum PropertyType {
    Menu {
        entries: Vec<String>,
        rules: Vec<MenuRule>,
    },
    Interval {
        low: f64,
        high: f64,
        rules: Vec<IntervalRule>,
    },
}

/// A per-individual typed attribute of a kind. A property literally named
/// "name" is treated specially by description generation.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: TokenString,
    pub kind: PropertyType,
}

/// A kind: a node in the multi-parent classification lattice.
#[derive(Debug, Clone)]
pub struct CommonNoun {
    pub singular: TokenString,
    pub plural: TokenString,
    pub superkinds: Vec<SuperkindEdge>,
    pub subkinds: Vec<CommonNounId>,
    /// Adjectives worth mentioning when describing individuals of this kind.
    pub relevant_adjectives: Vec<AdjectiveId>,
    pub alternative_sets: Vec<AlternativeSet>,
    pub implied_adjectives: Vec<ConditionalModifier>,
    pub parts: Vec<Part>,
    pub properties: Vec<Property>,
    pub name_template: Option<String>,
    pub description_template: Option<String>,
    pub suppress_description: bool,
    /// Density hint for the solver; `None` means inherit the default.
    pub initial_probability: Option<f32>,
}

impl CommonNoun {
    pub(crate) fn new(singular: TokenString, plural: TokenString) -> Self {
        CommonNoun {
            singular,
            plural,
            superkinds: Vec::new(),
            subkinds: Vec::new(),
            relevant_adjectives: Vec::new(),
            alternative_sets: Vec::new(),
            implied_adjectives: Vec::new(),
            parts: Vec::new(),
            properties: Vec::new(),
            name_template: None,
            description_template: None,
            suppress_description: false,
            initial_probability: None,
        }
    }

    pub fn is_named(&self, tokens: &TokenString) -> bool {
        self.singular == *tokens || self.plural == *tokens
    }

    pub fn part_named(&self, name: &TokenString) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == *name)
    }

    pub fn property_named(&self, name: &TokenString) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == *name)
    }
}

/// A binary attribute, present or negated on an individual.
#[derive(Debug, Clone)]
pub struct Adjective {
    pub name: TokenString,
    /// Silent adjectives are suppressed from generated prose.
    pub is_silent: bool,
    /// How many alternative sets mention this adjective.
    pub reference_count: u32,
}

impl Adjective {
    pub(crate) fn new(name: TokenString) -> Self {
        Adjective {
            name,
            is_silent: false,
            reference_count: 0,
        }
    }

    pub fn is_named(&self, tokens: &TokenString) -> bool {
        self.name == *tokens
    }
}

/// One admissible (subject, object) shape of a verb.
#[derive(Debug, Clone)]
pub struct VerbShape {
    pub subject: KindAndModifiers,
    pub object: KindAndModifiers,
}

/// A kind together with required modifiers, as one side of a verb shape.
#[derive(Debug, Clone)]
pub struct KindAndModifiers {
    pub kind: CommonNounId,
    pub modifiers: Vec<MonadicLiteral>,
}

impl KindAndModifiers {
    pub fn bare(kind: CommonNounId) -> Self {
        KindAndModifiers { kind, modifiers: Vec::new() }
    }
}

/// The conjugation a verb surface form was stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbForm {
    Base,
    ThirdPerson,
    Gerund,
    PassiveParticiple,
}

/// A binary relation between individuals.
#[derive(Debug, Clone)]
pub struct Verb {
    /// The base (plural) surface form; setting it installs all inflections
    /// into the verb trie.
    pub base: TokenString,
    pub third_person: TokenString,
    pub gerunds: Vec<TokenString>,
    pub passive: TokenString,
    pub shapes: Vec<VerbShape>,
    pub is_reflexive: bool,
    pub is_anti_reflexive: bool,
    pub is_symmetric: bool,
    pub is_anti_symmetric: bool,
    pub subject_lower: u32,
    pub subject_upper: u32,
    pub object_lower: u32,
    pub object_upper: u32,
    /// Initial Boolean bias for relation literals, in (0, 1).
    pub density: f32,
    pub generalizations: Vec<VerbId>,
    pub mutual_exclusions: Vec<VerbId>,
    pub superspecies: Vec<VerbId>,
    pub subspecies: Vec<VerbId>,
}

impl Verb {
    pub(crate) fn new(base: TokenString, third_person: TokenString, passive: TokenString) -> Self {
        Verb {
            base,
            third_person,
            gerunds: Vec::new(),
            passive,
            shapes: Vec::new(),
            is_reflexive: false,
            is_anti_reflexive: false,
            is_symmetric: false,
            is_anti_symmetric: false,
            subject_lower: 0,
            subject_upper: UNBOUNDED,
            object_lower: 0,
            object_upper: UNBOUNDED,
            density: 0.5,
            generalizations: Vec::new(),
            mutual_exclusions: Vec::new(),
            superspecies: Vec::new(),
            subspecies: Vec::new(),
        }
    }

    pub fn is_named(&self, tokens: &TokenString) -> bool {
        self.base == *tokens
            || self.third_person == *tokens
            || self.passive == *tokens
            || self.gerunds.contains(tokens)
    }
}

/// A name permanently bound to a single individual.
#[derive(Debug, Clone)]
pub struct ProperNoun {
    pub name: TokenString,
    /// Index into the ontology's permanent individual list.
    pub individual: usize,
}

/// A declared existence test: "NP should (not) exist."
#[derive(Debug, Clone)]
pub struct TestDecl {
    pub kind: CommonNounId,
    pub modifiers: Vec<MonadicLiteral>,
    pub should_exist: bool,
    pub success_message: String,
    pub failure_message: String,
}

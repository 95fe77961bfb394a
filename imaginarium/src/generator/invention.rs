//! The post-solve query layer: an invention wraps a solver solution and
//! answers "holds of" and "relates to", names individuals, and renders
//! their descriptions from templates.

use super::{PropertyBinding, PropertyVariable};
use crate::ontology::{AdjectiveId, CommonNounId, Individual, Ontology, VerbId};
use crate::solver::{Literal, Solution};
use ahash::AHashMap;
use indexmap::IndexMap;
use std::cell::RefCell;

/// The value a property took in one invention.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PropertyValue::Text(s) => write!(f, "{}", s),
            PropertyValue::Number(x) => {
                if x.fract().abs() < 1e-9 {
                    write!(f, "{}", *x as i64)
                } else {
                    write!(f, "{:.2}", x)
                }
            }
        }
    }
}

/// A generated model: the individuals, the truth assignment, and the
/// variable maps needed to query it. Name and description caches live here,
/// never on individuals, so one individual valued by two inventions cannot
/// see a stale cache.
pub struct Invention<'o> {
    ontology: &'o Ontology,
    individuals: Vec<Individual>,
    solution: Solution,
    isa: IndexMap<(usize, CommonNounId), Literal>,
    adjectives: IndexMap<(usize, AdjectiveId), Literal>,
    holds: IndexMap<(VerbId, usize, usize), Literal>,
    properties: Vec<PropertyBinding>,
    name_cache: RefCell<AHashMap<usize, String>>,
    naming_in_progress: RefCell<Vec<usize>>,
}

impl<'o> Invention<'o> {
    pub(super) fn new(
        ontology: &'o Ontology,
        individuals: Vec<Individual>,
        solution: Solution,
        isa: IndexMap<(usize, CommonNounId), Literal>,
        adjectives: IndexMap<(usize, AdjectiveId), Literal>,
        holds: IndexMap<(VerbId, usize, usize), Literal>,
        properties: Vec<PropertyBinding>,
    ) -> Self {
        Invention {
            ontology,
            individuals,
            solution,
            isa,
            adjectives,
            holds,
            properties,
            name_cache: RefCell::new(AHashMap::new()),
            naming_in_progress: RefCell::new(Vec::new()),
        }
    }

    pub fn ontology(&self) -> &Ontology {
        self.ontology
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn individual(&self, index: usize) -> &Individual {
        &self.individuals[index]
    }

    /// Whether the individual is of the kind in this invention. The static
    /// can-be-a filter applies before the solution is consulted.
    pub fn is_a(&self, individual: usize, kind: CommonNounId) -> bool {
        let possible = self.individuals[individual].kinds.iter().any(|&declared| {
            self.ontology.dominates(kind, declared) || self.ontology.dominates(declared, kind)
        });
        if !possible {
            return false;
        }
        match self.isa.get(&(individual, kind)) {
            Some(&lit) => self.solution.holds(lit),
            None => false,
        }
    }

    /// Whether the relation holds between the two individuals.
    pub fn holds(&self, verb: VerbId, subject: usize, object: usize) -> bool {
        match self.holds.get(&(verb, subject, object)) {
            Some(&lit) => self.solution.holds(lit),
            None => false,
        }
    }

    /// Every `(verb, subject, object)` true in the solution, in a
    /// deterministic order, with the two directions of a symmetric relation
    /// collapsed into the pair whose subject id is the smaller.
    pub fn relationships(&self) -> Vec<(VerbId, usize, usize)> {
        let mut result = Vec::new();
        for (&(verb, subject, object), &lit) in &self.holds {
            if !self.solution.holds(lit) {
                continue;
            }
            if subject > object
                && self.ontology.verb(verb).is_symmetric
                && self.holds(verb, object, subject)
            {
                continue;
            }
            result.push((verb, subject, object));
        }
        result
    }

    /// The kinds true of the individual that are not dominated by another
    /// also-true kind.
    pub fn most_specific_kinds(&self, individual: usize) -> Vec<CommonNounId> {
        let true_kinds: Vec<CommonNounId> = self
            .isa
            .keys()
            .filter(|&&(i, _)| i == individual)
            .map(|&(_, kind)| kind)
            .filter(|&kind| self.is_a(individual, kind))
            .collect();
        true_kinds
            .iter()
            .copied()
            .filter(|&kind| {
                !true_kinds
                    .iter()
                    .any(|&other| other != kind && self.ontology.dominates(kind, other))
            })
            .collect()
    }

    /// The adjectives worth mentioning: true of the individual and not
    /// silenced.
    pub fn adjectives_describing(&self, individual: usize) -> Vec<AdjectiveId> {
        self.adjectives
            .iter()
            .filter(|&(&(i, _), &lit)| i == individual && self.solution.holds(lit))
            .map(|(&(_, adjective), _)| adjective)
            .filter(|&adjective| !self.ontology.adjective(adjective).is_silent)
            .collect()
    }

    /// The value the named property took for the individual, if any binding
    /// of it was live in the solution.
    pub fn property_value(&self, individual: usize, name: &str) -> Option<PropertyValue> {
        let wanted = crate::token::TokenString::from_phrase(name);
        for binding in &self.properties {
            if binding.individual != individual {
                continue;
            }
            let property =
                &self.ontology.noun(binding.kind).properties[binding.property_index];
            if property.name != wanted {
                continue;
            }
            match binding.variable {
                PropertyVariable::Menu(id) => {
                    if let Some(value) = self.solution.menu_value(id) {
                        return Some(PropertyValue::Text(value.to_owned()));
                    }
                }
                PropertyVariable::Interval(id) => {
                    if let Some(value) = self.solution.interval_value(id) {
                        return Some(PropertyValue::Number(value));
                    }
                }
            }
        }
        None
    }

    /// All live property values for an individual, paired with the
    /// property's name, in binding order.
    fn live_properties(&self, individual: usize) -> Vec<(String, PropertyValue)> {
        let mut result = Vec::new();
        for binding in &self.properties {
            if binding.individual != individual {
                continue;
            }
            let property =
                &self.ontology.noun(binding.kind).properties[binding.property_index];
            let value = match binding.variable {
                PropertyVariable::Menu(id) => self
                    .solution
                    .menu_value(id)
                    .map(|v| PropertyValue::Text(v.to_owned())),
                PropertyVariable::Interval(id) => {
                    self.solution.interval_value(id).map(PropertyValue::Number)
                }
            };
            if let Some(value) = value {
                result.push((property.name.to_string(), value));
            }
        }
        result
    }

    // --- Naming ---

    /// The individual's display name. Precedence: a property literally
    /// called "name"; a name template found walking up the kind lattice;
    /// "`container`'s `part`" for part individuals; the raw name tokens.
    pub fn name_string(&self, individual: usize) -> String {
        if let Some(cached) = self.name_cache.borrow().get(&individual) {
            return cached.clone();
        }
        // Recursion guard: a name template that (indirectly) names the same
        // individual falls back to the raw tokens.
        if self.naming_in_progress.borrow().contains(&individual) {
            return self.individuals[individual].name.to_string();
        }
        self.naming_in_progress.borrow_mut().push(individual);
        let name = self.compute_name(individual);
        self.naming_in_progress.borrow_mut().pop();
        self.name_cache.borrow_mut().insert(individual, name.clone());
        name
    }

    fn compute_name(&self, individual: usize) -> String {
        if let Some(PropertyValue::Text(value)) = self.property_value(individual, "name") {
            return value;
        }
        for kind in self.most_specific_kinds(individual) {
            for ancestor in self.ontology.with_ancestors(kind) {
                if let Some(template) = &self.ontology.noun(ancestor).name_template {
                    return self.render_template(individual, ancestor, template);
                }
            }
        }
        if let (Some(container), Some(part)) = (
            self.individuals[individual].container,
            self.individuals[individual].container_part.as_ref(),
        ) {
            return format!("{}'s {}", self.name_string(container), part);
        }
        self.individuals[individual].name.to_string()
    }

    // --- Descriptions ---

    /// Renders the individual's description: the most specific kind with a
    /// description template wins, otherwise the default rendering.
    pub fn description(&self, individual: usize) -> String {
        let specific = self.most_specific_kinds(individual);
        for &kind in &specific {
            for ancestor in self.ontology.with_ancestors(kind) {
                if let Some(template) = &self.ontology.noun(ancestor).description_template {
                    return self.render_template(individual, ancestor, template);
                }
            }
        }
        self.default_description(individual, specific.first().copied())
    }

    fn default_description(&self, individual: usize, kind: Option<CommonNounId>) -> String {
        let mut text = self.name_string(individual);
        text.push_str(" is a");
        for adjective in self.adjectives_describing(individual) {
            text.push(' ');
            text.push_str(&self.ontology.adjective(adjective).name.to_string());
        }
        if let Some(kind) = kind {
            text.push(' ');
            text.push_str(&self.ontology.noun(kind).singular.to_string());
        }
        text.push_str(&self.all_properties_text(individual));
        text
    }

    fn all_properties_text(&self, individual: usize) -> String {
        let mut clauses = Vec::new();
        for (name, value) in self.live_properties(individual) {
            // A "name" property already appears as the individual's name.
            if name == "name" {
                continue;
            }
            clauses.push(format!("{} {}", name, value));
        }
        if clauses.is_empty() {
            String::new()
        } else {
            format!(" with {}", clauses.join(" and "))
        }
    }

    /// Interprets a description or name template against the individual and
    /// the kind the template was found on. Directives are written in square
    /// brackets; anything else is literal text. Space is elided around `-`.
    fn render_template(&self, individual: usize, kind: CommonNounId, template: &str) -> String {
        let mut pieces: Vec<String> = Vec::new();
        for word in template.split_whitespace() {
            let piece = match directive_of(word) {
                Some(directive) => self.render_directive(individual, kind, &directive, word),
                None => word.to_owned(),
            };
            if !piece.is_empty() {
                pieces.push(piece);
            }
        }
        let mut text = String::new();
        for (index, piece) in pieces.iter().enumerate() {
            if index > 0 && piece != "-" && pieces[index - 1] != "-" {
                text.push(' ');
            }
            text.push_str(piece);
        }
        text
    }

    fn render_directive(
        &self,
        individual: usize,
        _kind: CommonNounId,
        directive: &str,
        raw: &str,
    ) -> String {
        match directive {
            "container" => self.individuals[individual]
                .container
                .map(|c| self.name_string(c))
                .unwrap_or_default(),
            "containerandpart" => {
                match (
                    self.individuals[individual].container,
                    self.individuals[individual].container_part.as_ref(),
                ) {
                    (Some(container), Some(part)) => {
                        format!("{}'s {}", self.name_string(container), part)
                    }
                    _ => String::new(),
                }
            }
            "namestring" => self.name_string(individual),
            "propernameifdefined" => {
                let ind = &self.individuals[individual];
                if ind.ephemeral {
                    String::new()
                } else {
                    ind.name.to_string()
                }
            }
            "modifiers" => self
                .adjectives_describing(individual)
                .iter()
                .map(|&a| self.ontology.adjective(a).name.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            "noun" => self
                .most_specific_kinds(individual)
                .first()
                .map(|&k| self.ontology.noun(k).singular.to_string())
                .unwrap_or_default(),
            "allproperties" => self.all_properties_text(individual).trim_start().to_owned(),
            name => {
                // A property of the selected kind, or a part of the
                // individual.
                if let Some(value) = self.property_value(individual, name) {
                    return value.to_string();
                }
                let part_name = crate::token::TokenString::from_phrase(name);
                if let Some(instance) = self.individuals[individual].part_instance(&part_name) {
                    return instance
                        .members
                        .iter()
                        .map(|&m| self.name_string(m))
                        .collect::<Vec<_>>()
                        .join(" and ");
                }
                raw.to_owned()
            }
        }
    }
}

/// Extracts the lowercased directive name from a `[Directive]` template
/// word, if it is one.
fn directive_of(word: &str) -> Option<String> {
    let inner = word.strip_prefix('[')?.strip_suffix(']')?;
    Some(inner.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_are_recognized_case_insensitively() {
        assert_eq!(directive_of("[NameString]").as_deref(), Some("namestring"));
        assert_eq!(directive_of("[color]").as_deref(), Some("color"));
        assert_eq!(directive_of("plain"), None);
    }

    #[test]
    fn number_values_print_compactly() {
        assert_eq!(PropertyValue::Number(3.0).to_string(), "3");
        assert_eq!(PropertyValue::Number(3.25).to_string(), "3.25");
        assert_eq!(PropertyValue::Text("red".to_owned()).to_string(), "red");
    }
}

//! The generator: expands a requested kind into concrete individuals, maps
//! every ontology rule onto the Boolean problem, and runs the solver.

mod invention;

pub use invention::{Invention, PropertyValue};

use crate::ontology::{
    AdjectiveId, CommonNounId, Individual, MonadicId, MonadicLiteral, Ontology, PartInstance,
    VerbId, UNBOUNDED,
};
use crate::solver::{IntervalVarId, Literal, MenuVarId, Problem, SolverOptions};
use crate::token::TokenString;
use ahash::AHashSet;
use indexmap::IndexMap;
use thiserror::Error;

/// The error type for generation. Solver timeouts are not errors; they
/// surface as `Ok(None)` from [`Generator::generate`].
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A cardinality bound can never be met with the individuals that exist.
    #[error(
        "'{verb}' requires at least {required} '{counted_kind}' for every '{per_kind}', \
         but only {available} could exist"
    )]
    Contradiction {
        verb: TokenString,
        per_kind: TokenString,
        counted_kind: TokenString,
        required: u32,
        available: usize,
    },
}

/// Options for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    pub solver: SolverOptions,
}

/// A property variable bound to one individual.
pub(crate) struct PropertyBinding {
    pub individual: usize,
    pub kind: CommonNounId,
    pub property_index: usize,
    pub variable: PropertyVariable,
}

pub(crate) enum PropertyVariable {
    Menu(MenuVarId),
    Interval(IntervalVarId),
}

/// Builds the Boolean problem for one invention: a root kind, required
/// modifiers, and a count of individuals to create.
pub struct Generator<'o> {
    ontology: &'o Ontology,
    problem: Problem,
    individuals: Vec<Individual>,
    isa: IndexMap<(usize, CommonNounId), Literal>,
    adjectives: IndexMap<(usize, AdjectiveId), Literal>,
    holds: IndexMap<(VerbId, usize, usize), Literal>,
    properties: Vec<PropertyBinding>,
    /// Unit clauses already emitted this rebuild.
    asserted: AHashSet<Literal>,
    /// (individual, kind) pairs whose rules have already been emitted.
    kinds_formalized: AHashSet<(usize, CommonNounId)>,
}

impl<'o> Generator<'o> {
    /// Expands the individuals and emits every constraint. Fails fast with
    /// [`GeneratorError::Contradiction`] when a bound is statically
    /// impossible.
    pub fn new(
        ontology: &'o Ontology,
        root: CommonNounId,
        modifiers: &[MonadicLiteral],
        count: usize,
    ) -> Result<Self, GeneratorError> {
        let mut generator = Generator {
            ontology,
            problem: Problem::new(),
            individuals: Vec::new(),
            isa: IndexMap::new(),
            adjectives: IndexMap::new(),
            holds: IndexMap::new(),
            properties: Vec::new(),
            asserted: AHashSet::new(),
            kinds_formalized: AHashSet::new(),
        };
        generator.expand(root, modifiers, count);
        generator.emit()?;
        Ok(generator)
    }

    /// Runs the solver; `None` means no invention could be found within the
    /// retry and timeout budget.
    pub fn generate(self, options: &GeneratorOptions) -> Option<Invention<'o>> {
        let solution = self.problem.solve(&options.solver)?;
        Some(Invention::new(
            self.ontology,
            self.individuals,
            solution,
            self.isa,
            self.adjectives,
            self.holds,
            self.properties,
        ))
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    // --- Instance expansion ---

    fn expand(&mut self, root: CommonNounId, modifiers: &[MonadicLiteral], count: usize) {
        let singular = &self.ontology.noun(root).singular;
        for ordinal in 0..count {
            let name = if count == 1 {
                TokenString::from_phrase(&format!("the {}", singular))
            } else {
                TokenString::from_phrase(&format!("{}{}", singular, ordinal))
            };
            let mut individual = Individual::new(name, true);
            individual.kinds.push(root);
            individual.modifiers = modifiers.to_vec();
            self.individuals.push(individual);
        }
        // Parts expand breadth-first, so a container's index always precedes
        // its parts'.
        let mut next = 0;
        while next < self.individuals.len() {
            self.expand_parts_of(next);
            next += 1;
        }
        for permanent in self.ontology.permanent_individuals() {
            self.individuals.push(permanent.clone());
            self.expand_parts_of(self.individuals.len() - 1);
        }
    }

    /// Instantiates every part of every kind (including super-kinds) of the
    /// individual at `index`.
    fn expand_parts_of(&mut self, index: usize) {
        let kinds = self.individuals[index].kinds.clone();
        for kind in kinds {
            for ancestor in self.ontology.with_ancestors(kind) {
                for part in self.ontology.noun(ancestor).parts.clone() {
                    if self.individuals[index].part_instance(&part.name).is_some() {
                        continue;
                    }
                    let mut members = Vec::with_capacity(part.count as usize);
                    for _ in 0..part.count {
                        let mut child = Individual::new(part.name.clone(), true);
                        child.kinds.push(part.kind);
                        child.modifiers = part.modifiers.clone();
                        child.container = Some(index);
                        child.container_part = Some(part.name.clone());
                        members.push(self.individuals.len());
                        self.individuals.push(child);
                    }
                    self.individuals[index]
                        .parts
                        .push(PartInstance { name: part.name.clone(), members });
                }
            }
        }
    }

    // --- Variables ---

    fn isa_literal(&mut self, individual: usize, kind: CommonNounId) -> Literal {
        if let Some(&lit) = self.isa.get(&(individual, kind)) {
            return lit;
        }
        let bias = self.ontology.noun(kind).initial_probability.unwrap_or(0.5);
        let lit = self.problem.new_variable(bias);
        self.isa.insert((individual, kind), lit);
        lit
    }

    fn adjective_literal(&mut self, individual: usize, adjective: AdjectiveId) -> Literal {
        if let Some(&lit) = self.adjectives.get(&(individual, adjective)) {
            return lit;
        }
        let lit = self.problem.new_variable(0.5);
        self.adjectives.insert((individual, adjective), lit);
        lit
    }

    fn monadic_literal(&mut self, individual: usize, literal: &MonadicLiteral) -> Literal {
        let var = match literal.concept {
            MonadicId::Noun(kind) => {
                let lit = self.isa_literal(individual, kind);
                self.formalize(individual, kind);
                lit
            }
            MonadicId::Adjective(adjective) => self.adjective_literal(individual, adjective),
        };
        if literal.positive {
            var
        } else {
            -var
        }
    }

    fn holds_literal(&mut self, verb: VerbId, subject: usize, object: usize) -> Literal {
        if let Some(&lit) = self.holds.get(&(verb, subject, object)) {
            return lit;
        }
        let density = self.ontology.verb(verb).density;
        let lit = self.problem.new_variable(density);
        self.holds.insert((verb, subject, object), lit);
        lit
    }

    fn assert_unit(&mut self, literal: Literal) {
        if self.asserted.insert(literal) {
            self.problem.assert_unit(literal);
        }
    }

    /// Whether `individual` could possibly be of `kind`: the kind is at,
    /// above or below one of the individual's declared kinds.
    fn can_be_a(&self, individual: usize, kind: CommonNounId) -> bool {
        self.individuals[individual].kinds.iter().any(|&declared| {
            self.ontology.dominates(kind, declared) || self.ontology.dominates(declared, kind)
        })
    }

    // --- Constraint emission ---

    fn emit(&mut self) -> Result<(), GeneratorError> {
        for individual in 0..self.individuals.len() {
            let kinds = self.individuals[individual].kinds.clone();
            for kind in kinds {
                let lit = self.isa_literal(individual, kind);
                self.assert_unit(lit);
                self.formalize(individual, kind);
            }
            let modifiers = self.individuals[individual].modifiers.clone();
            for literal in modifiers {
                let lit = self.monadic_literal(individual, &literal);
                self.assert_unit(lit);
            }
        }
        self.emit_verbs()
    }

    /// Emits the rules attached to `kind` for one individual: the kind
    /// lattice edges, implied adjectives, alternative sets, properties, and
    /// sub-kind exclusivity. Idempotent per (individual, kind).
    fn formalize(&mut self, individual: usize, kind: CommonNounId) {
        if !self.kinds_formalized.insert((individual, kind)) {
            return;
        }
        let isa = self.isa_literal(individual, kind);
        let declared = self.individuals[individual].kinds.contains(&kind);

        let superkinds: Vec<CommonNounId> = self
            .ontology
            .noun(kind)
            .superkinds
            .iter()
            .map(|edge| edge.parent)
            .collect();
        for parent in superkinds {
            let parent_isa = self.isa_literal(individual, parent);
            self.problem.implies(isa, parent_isa);
            self.formalize(individual, parent);
        }

        let implied = self.ontology.noun(kind).implied_adjectives.clone();
        for rule in implied {
            let mut clause = vec![-isa];
            for condition in &rule.conditions {
                let lit = self.monadic_literal(individual, condition);
                clause.push(-lit);
            }
            let consequent = self.monadic_literal(individual, &rule.modifier);
            clause.push(consequent);
            self.problem.assert(&clause);
        }

        let sets = self.ontology.noun(kind).alternative_sets.clone();
        for set in sets {
            let literals: Vec<Literal> = set
                .alternatives
                .iter()
                .map(|l| self.monadic_literal(individual, l))
                .collect();
            self.problem
                .quantify_if(isa, set.min_count, set.max_count, &literals);
            if set.alternatives.len() <= 2 {
                for &lit in &literals {
                    self.problem.initialize(lit, 0.0);
                }
            }
            let single_use = set.alternatives.iter().all(|l| {
                l.positive
                    && matches!(l.concept, MonadicId::Adjective(id)
                        if self.ontology.adjective(id).reference_count <= 1)
            });
            if set.allow_pre_initialization && single_use && declared {
                self.problem.pre_initialize(&literals, &set.frequencies);
            }
        }

        let property_count = self.ontology.noun(kind).properties.len();
        for property_index in 0..property_count {
            self.bind_property(individual, kind, property_index, isa);
        }

        let subkinds: Vec<CommonNounId> = self
            .ontology
            .noun(kind)
            .subkinds
            .iter()
            .copied()
            .filter(|&sub| self.can_be_a(individual, sub))
            .collect();
        if !subkinds.is_empty() {
            let mut literals = Vec::with_capacity(subkinds.len());
            let mut frequencies = Vec::with_capacity(subkinds.len());
            for &sub in &subkinds {
                let sub_isa = self.isa_literal(individual, sub);
                self.problem.initialize(sub_isa, 0.0);
                literals.push(sub_isa);
                frequencies.push(
                    self.ontology
                        .noun(sub)
                        .superkinds
                        .iter()
                        .find(|edge| edge.parent == kind)
                        .map_or(1.0, |edge| edge.frequency),
                );
            }
            self.problem.quantify_if(isa, 1, 1, &literals);
            if declared {
                self.problem.pre_initialize(&literals, &frequencies);
            }
            for &sub in &subkinds {
                self.formalize(individual, sub);
            }
        }
    }

    fn bind_property(
        &mut self,
        individual: usize,
        kind: CommonNounId,
        property_index: usize,
        isa: Literal,
    ) {
        use crate::ontology::PropertyType;

        let property = self.ontology.noun(kind).properties[property_index].clone();
        let variable = match &property.kind {
            PropertyType::Menu { entries, rules } => {
                let solver_rules = rules
                    .iter()
                    .map(|rule| {
                        let conditions = rule
                            .conditions
                            .iter()
                            .map(|c| self.monadic_literal(individual, c))
                            .collect();
                        (conditions, rule.entries.clone())
                    })
                    .collect();
                PropertyVariable::Menu(self.problem.new_menu(isa, entries.clone(), solver_rules))
            }
            PropertyType::Interval { low, high, rules } => {
                let solver_rules = rules
                    .iter()
                    .map(|rule| {
                        let conditions: Vec<Literal> = rule
                            .conditions
                            .iter()
                            .map(|c| self.monadic_literal(individual, c))
                            .collect();
                        (conditions, rule.low, rule.high)
                    })
                    .collect();
                PropertyVariable::Interval(
                    self.problem.new_interval(isa, *low, *high, solver_rules),
                )
            }
        };
        self.properties.push(PropertyBinding {
            individual,
            kind,
            property_index,
            variable,
        });
    }

    /// The verb's own admissible shapes, or the nearest super-species' when
    /// it declares none of its own.
    fn effective_shapes(&self, verb: VerbId) -> Vec<crate::ontology::VerbShape> {
        let mut current = vec![verb];
        let mut seen = AHashSet::new();
        while !current.is_empty() {
            let mut next = Vec::new();
            for v in current {
                if !seen.insert(v) {
                    continue;
                }
                let shapes = &self.ontology.verb(v).shapes;
                if !shapes.is_empty() {
                    return shapes.clone();
                }
                next.extend(self.ontology.verb(v).superspecies.iter().copied());
            }
            current = next;
        }
        Vec::new()
    }

    fn emit_verbs(&mut self) -> Result<(), GeneratorError> {
        // First pass: create every admissible Holds variable and tie it to
        // the kind-and-modifier conditions on both sides.
        for verb in self.ontology.verb_ids() {
            for shape in self.effective_shapes(verb) {
                for subject in 0..self.individuals.len() {
                    if !self.can_be_a(subject, shape.subject.kind) {
                        continue;
                    }
                    for object in 0..self.individuals.len() {
                        if !self.can_be_a(object, shape.object.kind) {
                            continue;
                        }
                        let holds = self.holds_literal(verb, subject, object);
                        let subject_isa = self.isa_literal(subject, shape.subject.kind);
                        self.formalize(subject, shape.subject.kind);
                        self.problem.implies(holds, subject_isa);
                        let object_isa = self.isa_literal(object, shape.object.kind);
                        self.formalize(object, shape.object.kind);
                        self.problem.implies(holds, object_isa);
                        for modifier in shape.subject.modifiers.clone() {
                            let lit = self.monadic_literal(subject, &modifier);
                            self.problem.implies(holds, lit);
                        }
                        for modifier in shape.object.modifiers.clone() {
                            let lit = self.monadic_literal(object, &modifier);
                            self.problem.implies(holds, lit);
                        }
                    }
                }
            }
        }

        for verb in self.ontology.verb_ids() {
            self.emit_verb_cardinality(verb)?;
            self.emit_verb_algebra(verb);
        }
        Ok(())
    }

    fn emit_verb_cardinality(&mut self, verb: VerbId) -> Result<(), GeneratorError> {
        let v = self.ontology.verb(verb).clone();
        for shape in self.effective_shapes(verb) {
            if v.object_lower > 0 || v.object_upper < UNBOUNDED {
                for subject in 0..self.individuals.len() {
                    if !self.can_be_a(subject, shape.subject.kind) {
                        continue;
                    }
                    let domain: Vec<Literal> = self
                        .holds
                        .iter()
                        .filter(|&(&(hv, hs, _), _)| hv == verb && hs == subject)
                        .map(|(_, &lit)| lit)
                        .collect();
                    if (domain.len() as u32) < v.object_lower {
                        return Err(GeneratorError::Contradiction {
                            verb: v.base.clone(),
                            per_kind: self.ontology.noun(shape.subject.kind).singular.clone(),
                            counted_kind: self.ontology.noun(shape.object.kind).singular.clone(),
                            required: v.object_lower,
                            available: domain.len(),
                        });
                    }
                    let guard = self.isa_literal(subject, shape.subject.kind);
                    self.problem
                        .quantify_if(guard, v.object_lower, v.object_upper, &domain);
                }
            }
            if v.subject_lower > 0 || v.subject_upper < UNBOUNDED {
                for object in 0..self.individuals.len() {
                    if !self.can_be_a(object, shape.object.kind) {
                        continue;
                    }
                    let domain: Vec<Literal> = self
                        .holds
                        .iter()
                        .filter(|&(&(hv, _, ho), _)| hv == verb && ho == object)
                        .map(|(_, &lit)| lit)
                        .collect();
                    if (domain.len() as u32) < v.subject_lower {
                        return Err(GeneratorError::Contradiction {
                            verb: v.base.clone(),
                            per_kind: self.ontology.noun(shape.object.kind).singular.clone(),
                            counted_kind: self.ontology.noun(shape.subject.kind).singular.clone(),
                            required: v.subject_lower,
                            available: domain.len(),
                        });
                    }
                    let guard = self.isa_literal(object, shape.object.kind);
                    self.problem
                        .quantify_if(guard, v.subject_lower, v.subject_upper, &domain);
                }
            }
        }
        Ok(())
    }

    fn emit_verb_algebra(&mut self, verb: VerbId) {
        let v = self.ontology.verb(verb).clone();

        if self.ontology.ancestor_is_anti_reflexive(verb) {
            for individual in 0..self.individuals.len() {
                if let Some(&lit) = self.holds.get(&(verb, individual, individual)) {
                    self.assert_unit(-lit);
                }
            }
        }

        if self.ontology.ancestor_is_reflexive(verb) {
            for shape in self.effective_shapes(verb) {
                for individual in 0..self.individuals.len() {
                    if !self.can_be_a(individual, shape.subject.kind)
                        || !self.can_be_a(individual, shape.object.kind)
                    {
                        continue;
                    }
                    let holds = self.holds_literal(verb, individual, individual);
                    let isa = self.isa_literal(individual, shape.subject.kind);
                    self.problem.implies(isa, holds);
                }
            }
        }

        if v.is_symmetric {
            let pairs: Vec<(usize, usize)> = self
                .holds
                .keys()
                .filter(|&&(hv, s, o)| hv == verb && s < o)
                .map(|&(_, s, o)| (s, o))
                .collect();
            for (s, o) in pairs {
                let forward = self.holds[&(verb, s, o)];
                if let Some(&backward) = self.holds.get(&(verb, o, s)) {
                    self.problem.implies(forward, backward);
                    self.problem.implies(backward, forward);
                }
            }
        }

        if v.is_anti_symmetric {
            let pairs: Vec<(usize, usize)> = self
                .holds
                .keys()
                .filter(|&&(hv, s, o)| hv == verb && s < o)
                .map(|&(_, s, o)| (s, o))
                .collect();
            for (s, o) in pairs {
                if let (Some(&forward), Some(&backward)) =
                    (self.holds.get(&(verb, s, o)), self.holds.get(&(verb, o, s)))
                {
                    self.problem.at_most(1, &[forward, backward]);
                }
            }
        }

        for general in &v.generalizations {
            let pairs: Vec<(usize, usize)> = self
                .holds
                .keys()
                .filter(|&&(hv, _, _)| hv == verb)
                .map(|&(_, s, o)| (s, o))
                .collect();
            for (s, o) in pairs {
                let specific = self.holds[&(verb, s, o)];
                let generalized = self.holds_literal(*general, s, o);
                self.problem.implies(specific, generalized);
            }
        }

        for exclusion in &v.mutual_exclusions {
            // Each exclusion is recorded on both verbs; emit it once.
            if *exclusion < verb {
                continue;
            }
            let pairs: Vec<(usize, usize)> = self
                .holds
                .keys()
                .filter(|&&(hv, _, _)| hv == verb)
                .map(|&(_, s, o)| (s, o))
                .collect();
            for (s, o) in pairs {
                if let Some(&other) = self.holds.get(&(*exclusion, s, o)) {
                    let this = self.holds[&(verb, s, o)];
                    self.problem.at_most(1, &[this, other]);
                }
            }
        }

        for superspecies in &v.superspecies {
            let pairs: Vec<(usize, usize)> = self
                .holds
                .keys()
                .filter(|&&(hv, _, _)| hv == verb)
                .map(|&(_, s, o)| (s, o))
                .collect();
            for (s, o) in pairs {
                let sub = self.holds[&(verb, s, o)];
                let sup = self.holds_literal(*superspecies, s, o);
                self.problem.implies(sub, sup);
            }
        }

        if !v.subspecies.is_empty() {
            let pairs: Vec<(usize, usize)> = self
                .holds
                .keys()
                .filter(|&&(hv, _, _)| hv == verb)
                .map(|&(_, s, o)| (s, o))
                .collect();
            for (s, o) in pairs {
                let sup = self.holds[&(verb, s, o)];
                let mut alternatives = Vec::new();
                for sub in &v.subspecies {
                    alternatives.push(self.holds_literal(*sub, s, o));
                    // A symmetric sub-species can realize the super-species
                    // relation in either direction.
                    if self.ontology.verb(*sub).is_symmetric && s != o {
                        alternatives.push(self.holds_literal(*sub, o, s));
                    }
                }
                self.problem.quantify_if(sup, 1, 1, &alternatives);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::Number;
    use crate::token::TokenString;

    fn ts(phrase: &str) -> TokenString {
        TokenString::from_phrase(phrase)
    }

    #[test]
    fn expansion_names_individuals() {
        let mut ontology = Ontology::new();
        let cat = ontology
            .add_common_noun(&ts("cat"), Some(Number::Singular))
            .unwrap();
        let generator = Generator::new(&ontology, cat, &[], 1).unwrap();
        assert_eq!(generator.individuals().len(), 1);
        assert_eq!(generator.individuals()[0].name, ts("the cat"));

        let generator = Generator::new(&ontology, cat, &[], 3).unwrap();
        let names: Vec<String> = generator
            .individuals()
            .iter()
            .map(|i| i.name.to_string())
            .collect();
        assert_eq!(names, ["cat0", "cat1", "cat2"]);
    }

    #[test]
    fn parts_expand_recursively() {
        let mut ontology = Ontology::new();
        let body = ontology
            .add_common_noun(&ts("body"), Some(Number::Singular))
            .unwrap();
        let arm = ontology
            .add_common_noun(&ts("arm"), Some(Number::Singular))
            .unwrap();
        let hand = ontology
            .add_common_noun(&ts("hand"), Some(Number::Singular))
            .unwrap();
        ontology.noun_mut(body).parts.push(crate::ontology::Part {
            name: ts("arm"),
            count: 2,
            kind: arm,
            modifiers: Vec::new(),
        });
        ontology.noun_mut(arm).parts.push(crate::ontology::Part {
            name: ts("hand"),
            count: 1,
            kind: hand,
            modifiers: Vec::new(),
        });
        let generator = Generator::new(&ontology, body, &[], 1).unwrap();
        // One body, two arms, one hand per arm.
        assert_eq!(generator.individuals().len(), 5);
        let root = &generator.individuals()[0];
        assert_eq!(root.parts[0].members.len(), 2);
        let first_arm = &generator.individuals()[root.parts[0].members[0]];
        assert_eq!(first_arm.container, Some(0));
        assert_eq!(first_arm.parts[0].members.len(), 1);
    }

    #[test]
    fn contradiction_is_detected_statically() {
        let mut ontology = Ontology::new();
        let cat = ontology
            .add_common_noun(&ts("cat"), Some(Number::Singular))
            .unwrap();
        let love = ontology.add_verb(&ts("love")).unwrap();
        ontology.add_verb_shape(
            love,
            crate::ontology::VerbShape {
                subject: crate::ontology::KindAndModifiers::bare(cat),
                object: crate::ontology::KindAndModifiers::bare(cat),
            },
        );
        ontology.verb_mut(love).object_lower = 5;
        let result = Generator::new(&ontology, cat, &[], 2);
        assert!(matches!(result, Err(GeneratorError::Contradiction { .. })));
    }
}

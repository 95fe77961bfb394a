//! The Boolean problem the generator compiles an ontology into, and the
//! stochastic search that solves it.
//!
//! Variables carry initial probability biases; constraints are guarded
//! cardinality bounds over literal lists ("if `condition`, then between
//! `min` and `max` of `literals` are true"). Plain clauses, implications and
//! exactly-one groups are all expressed this way. Finite-domain ("menu")
//! variables and real-interval variables ride along and are valued after the
//! Boolean assignment is fixed.
//!
//! The search is biased random initialization followed by local repair:
//! pick a violated constraint, flip the literal that does the least new
//! damage (or a random eligible one, with some noise), until nothing is
//! violated or the flip budget runs out. Each retry reseeds.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// A signed variable index: `+v` for the variable, `-v` for its negation.
/// Variable numbering starts at 1.
pub type Literal = i32;

/// The variable a literal speaks about.
pub fn variable_of(literal: Literal) -> usize {
    literal.unsigned_abs() as usize
}

/// Identifies a menu variable in its problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuVarId(usize);

/// Identifies an interval variable in its problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalVarId(usize);

/// A guarded cardinality constraint: when `condition` holds (or always, if
/// `None`), between `min` and `max` of `literals` must be true.
#[derive(Debug, Clone)]
struct Constraint {
    condition: Option<Literal>,
    min: u32,
    max: u32,
    literals: Vec<Literal>,
}

/// An exactly-one group seeded by weighted choice during initialization.
#[derive(Debug, Clone)]
struct PreInitGroup {
    literals: Vec<Literal>,
    weights: Vec<f32>,
}

/// A menu rule at the solver level: conditions are literals now.
#[derive(Debug, Clone)]
struct MenuVar {
    condition: Literal,
    entries: Vec<String>,
    rules: Vec<(Vec<Literal>, Vec<String>)>,
}

/// An interval rule at the solver level.
#[derive(Debug, Clone)]
struct IntervalVar {
    condition: Literal,
    low: f64,
    high: f64,
    rules: Vec<(Vec<Literal>, f64, f64)>,
}

/// Options controlling the solve loop.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// How many independently-seeded attempts to make.
    pub retries: u32,
    /// Wall-clock budget across all attempts.
    pub timeout: Duration,
    /// Flip budget per attempt.
    pub max_flips: u32,
    /// Probability of a random (rather than greedy) repair flip.
    pub noise: f32,
    /// Fixed seed for reproducible generation; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            retries: 20,
            timeout: Duration::from_secs(5),
            max_flips: 50_000,
            noise: 0.1,
            seed: None,
        }
    }
}

/// A Boolean problem under construction.
#[derive(Debug, Default)]
pub struct Problem {
    /// Initial probability of each variable, indexed from 1 (slot 0 unused).
    biases: Vec<f32>,
    constraints: Vec<Constraint>,
    preinit_groups: Vec<PreInitGroup>,
    menus: Vec<MenuVar>,
    intervals: Vec<IntervalVar>,
}

impl Problem {
    pub fn new() -> Self {
        Problem {
            biases: vec![0.0],
            ..Problem::default()
        }
    }

    pub fn num_variables(&self) -> usize {
        self.biases.len().saturating_sub(1)
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Allocates a fresh variable with the given initial probability, and
    /// returns its positive literal.
    pub fn new_variable(&mut self, bias: f32) -> Literal {
        let v = self.biases.len() as Literal;
        self.biases.push(bias.clamp(0.0, 1.0));
        v
    }

    /// Overrides a literal's initial probability: `initialize(-v, p)` makes
    /// the variable false with probability `p` at startup.
    pub fn initialize(&mut self, literal: Literal, probability: f32) {
        let p = probability.clamp(0.0, 1.0);
        let v = variable_of(literal);
        self.biases[v] = if literal > 0 { p } else { 1.0 - p };
    }

    /// Asserts that at least one of `literals` is true (a plain clause).
    pub fn assert(&mut self, literals: &[Literal]) {
        let n = literals.len() as u32;
        self.constraints.push(Constraint {
            condition: None,
            min: 1,
            max: n,
            literals: literals.to_vec(),
        });
    }

    /// Asserts `antecedent -> consequent`.
    pub fn implies(&mut self, antecedent: Literal, consequent: Literal) {
        self.assert(&[-antecedent, consequent]);
    }

    /// Asserts that `literal` is true.
    pub fn assert_unit(&mut self, literal: Literal) {
        self.assert(&[literal]);
    }

    pub fn at_least(&mut self, n: u32, literals: &[Literal]) {
        self.between(n, literals.len() as u32, literals);
    }

    pub fn at_most(&mut self, n: u32, literals: &[Literal]) {
        self.between(0, n, literals);
    }

    pub fn exactly(&mut self, n: u32, literals: &[Literal]) {
        self.between(n, n, literals);
    }

    /// Asserts that exactly one of `literals` is true.
    pub fn unique(&mut self, literals: &[Literal]) {
        self.exactly(1, literals);
    }

    pub fn between(&mut self, min: u32, max: u32, literals: &[Literal]) {
        let capped = max.min(literals.len() as u32);
        self.constraints.push(Constraint {
            condition: None,
            min,
            max: capped,
            literals: literals.to_vec(),
        });
    }

    /// Asserts that when `condition` is true, between `min` and `max` of
    /// `literals` are true.
    pub fn quantify_if(&mut self, condition: Literal, min: u32, max: u32, literals: &[Literal]) {
        let capped = max.min(literals.len() as u32);
        self.constraints.push(Constraint {
            condition: Some(condition),
            min,
            max: capped,
            literals: literals.to_vec(),
        });
    }

    /// Registers an exactly-one group whose member is picked by weighted
    /// choice during initialization, so the solver starts from a satisfying
    /// seed for it.
    pub fn pre_initialize(&mut self, literals: &[Literal], weights: &[f32]) {
        debug_assert_eq!(literals.len(), weights.len());
        self.preinit_groups.push(PreInitGroup {
            literals: literals.to_vec(),
            weights: weights.to_vec(),
        });
    }

    /// Allocates a menu variable: meaningful only when `condition` is true,
    /// valued from the first rule whose conditions all hold, else from
    /// `entries`.
    pub fn new_menu(
        &mut self,
        condition: Literal,
        entries: Vec<String>,
        rules: Vec<(Vec<Literal>, Vec<String>)>,
    ) -> MenuVarId {
        self.menus.push(MenuVar { condition, entries, rules });
        MenuVarId(self.menus.len() - 1)
    }

    /// Allocates an interval variable: meaningful only when `condition` is
    /// true, valued uniformly from the intersection of `low..=high` with
    /// every rule whose conditions hold.
    pub fn new_interval(
        &mut self,
        condition: Literal,
        low: f64,
        high: f64,
        rules: Vec<(Vec<Literal>, f64, f64)>,
    ) -> IntervalVarId {
        self.intervals.push(IntervalVar { condition, low, high, rules });
        IntervalVarId(self.intervals.len() - 1)
    }

    /// Runs the search. Returns `None` when every retry was exhausted
    /// without finding a satisfying assignment, or the timeout elapsed.
    pub fn solve(&self, options: &SolverOptions) -> Option<Solution> {
        let deadline = Instant::now() + options.timeout;
        let mut seed_rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        for _ in 0..options.retries.max(1) {
            if Instant::now() >= deadline {
                return None;
            }
            let mut rng = StdRng::seed_from_u64(seed_rng.gen());
            if let Some(values) = self.attempt(&mut rng, options, deadline) {
                return Some(self.value_solution(values, &mut rng));
            }
        }
        None
    }

    fn attempt(
        &self,
        rng: &mut StdRng,
        options: &SolverOptions,
        deadline: Instant,
    ) -> Option<Vec<bool>> {
        let mut values = vec![false; self.biases.len()];
        for v in 1..self.biases.len() {
            values[v] = rng.gen::<f32>() < self.biases[v];
        }
        for group in &self.preinit_groups {
            let total: f32 = group.weights.iter().sum();
            let mut pick = rng.gen::<f32>() * total.max(f32::MIN_POSITIVE);
            let mut chosen = group.literals.len() - 1;
            for (i, &w) in group.weights.iter().enumerate() {
                if pick < w {
                    chosen = i;
                    break;
                }
                pick -= w;
            }
            for (i, &lit) in group.literals.iter().enumerate() {
                values[variable_of(lit)] = (lit > 0) == (i == chosen);
            }
        }

        let mut violated: Vec<usize> = (0..self.constraints.len())
            .filter(|&c| !self.satisfied(c, &values))
            .collect();

        for flip in 0..options.max_flips {
            if violated.is_empty() {
                return Some(values);
            }
            if flip % 256 == 0 && Instant::now() >= deadline {
                return None;
            }
            let constraint = &self.constraints[violated[rng.gen_range(0..violated.len())]];
            let candidates = self.repair_candidates(constraint, &values);
            if candidates.is_empty() {
                continue;
            }
            let variable = if rng.gen::<f32>() < options.noise {
                candidates[rng.gen_range(0..candidates.len())]
            } else {
                // Greedy: the flip that leaves the fewest violations.
                let mut best = candidates[0];
                let mut best_damage = usize::MAX;
                for &candidate in &candidates {
                    values[candidate] = !values[candidate];
                    let damage = self.violation_count(&values);
                    values[candidate] = !values[candidate];
                    if damage < best_damage {
                        best_damage = damage;
                        best = candidate;
                    }
                }
                best
            };
            values[variable] = !values[variable];
            violated = (0..self.constraints.len())
                .filter(|&c| !self.satisfied(c, &values))
                .collect();
        }
        None
    }

    fn true_count(&self, constraint: &Constraint, values: &[bool]) -> u32 {
        constraint
            .literals
            .iter()
            .filter(|&&lit| values[variable_of(lit)] == (lit > 0))
            .count() as u32
    }

    fn satisfied(&self, index: usize, values: &[bool]) -> bool {
        let constraint = &self.constraints[index];
        if let Some(condition) = constraint.condition {
            if values[variable_of(condition)] != (condition > 0) {
                return true;
            }
        }
        let count = self.true_count(constraint, values);
        count >= constraint.min && count <= constraint.max
    }

    /// Variables whose flip could move a violated constraint toward
    /// satisfaction: members on the needed side, plus the guard variable.
    fn repair_candidates(&self, constraint: &Constraint, values: &[bool]) -> Vec<usize> {
        let mut candidates = Vec::new();
        if let Some(condition) = constraint.condition {
            candidates.push(variable_of(condition));
        }
        let count = self.true_count(constraint, values);
        for &lit in &constraint.literals {
            let lit_true = values[variable_of(lit)] == (lit > 0);
            if count < constraint.min && !lit_true {
                candidates.push(variable_of(lit));
            } else if count > constraint.max && lit_true {
                candidates.push(variable_of(lit));
            }
        }
        candidates
    }

    fn violation_count(&self, values: &[bool]) -> usize {
        (0..self.constraints.len())
            .filter(|&c| !self.satisfied(c, values))
            .count()
    }

    fn value_solution(&self, values: Vec<bool>, rng: &mut StdRng) -> Solution {
        let holds = |lit: Literal| values[variable_of(lit)] == (lit > 0);
        let conditions_hold =
            |conditions: &[Literal]| conditions.iter().all(|&c| values[variable_of(c)] == (c > 0));

        let menu_values = self
            .menus
            .iter()
            .map(|menu| {
                if !holds(menu.condition) {
                    return None;
                }
                let entries = menu
                    .rules
                    .iter()
                    .find(|(conditions, _)| conditions_hold(conditions))
                    .map(|(_, entries)| entries)
                    .unwrap_or(&menu.entries);
                if entries.is_empty() {
                    None
                } else {
                    Some(entries[rng.gen_range(0..entries.len())].clone())
                }
            })
            .collect();

        let interval_values = self
            .intervals
            .iter()
            .map(|interval| {
                if !holds(interval.condition) {
                    return None;
                }
                let mut low = interval.low;
                let mut high = interval.high;
                for (conditions, rule_low, rule_high) in &interval.rules {
                    if conditions_hold(conditions) {
                        low = low.max(*rule_low);
                        high = high.min(*rule_high);
                    }
                }
                if low > high {
                    None
                } else if low == high {
                    Some(low)
                } else {
                    Some(rng.gen_range(low..=high))
                }
            })
            .collect();

        Solution { values, menu_values, interval_values }
    }
}

/// A satisfying assignment, queried by the invention layer.
#[derive(Debug, Clone)]
pub struct Solution {
    values: Vec<bool>,
    menu_values: Vec<Option<String>>,
    interval_values: Vec<Option<f64>>,
}

impl Solution {
    /// Whether the literal holds under this assignment.
    pub fn holds(&self, literal: Literal) -> bool {
        self.values[variable_of(literal)] == (literal > 0)
    }

    /// The chosen entry of a menu variable, if its guard held.
    pub fn menu_value(&self, id: MenuVarId) -> Option<&str> {
        self.menu_values[id.0].as_deref()
    }

    /// The sampled value of an interval variable, if its guard held.
    pub fn interval_value(&self, id: IntervalVarId) -> Option<f64> {
        self.interval_values[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SolverOptions {
        SolverOptions {
            seed: Some(0x5eed),
            ..SolverOptions::default()
        }
    }

    #[test]
    fn unit_clauses() {
        let mut problem = Problem::new();
        let a = problem.new_variable(0.5);
        let b = problem.new_variable(0.5);
        problem.assert_unit(a);
        problem.assert_unit(-b);
        let solution = problem.solve(&options()).unwrap();
        assert!(solution.holds(a));
        assert!(!solution.holds(b));
    }

    #[test]
    fn implication_chain() {
        let mut problem = Problem::new();
        let a = problem.new_variable(0.5);
        let b = problem.new_variable(0.5);
        let c = problem.new_variable(0.5);
        problem.assert_unit(a);
        problem.implies(a, b);
        problem.implies(b, c);
        let solution = problem.solve(&options()).unwrap();
        assert!(solution.holds(c));
    }

    #[test]
    fn exactly_one() {
        let mut problem = Problem::new();
        let vars: Vec<Literal> = (0..5).map(|_| problem.new_variable(0.5)).collect();
        problem.unique(&vars);
        let solution = problem.solve(&options()).unwrap();
        let true_count = vars.iter().filter(|&&v| solution.holds(v)).count();
        assert_eq!(true_count, 1);
    }

    #[test]
    fn guarded_cardinality() {
        let mut problem = Problem::new();
        let guard = problem.new_variable(0.5);
        let vars: Vec<Literal> = (0..6).map(|_| problem.new_variable(0.1)).collect();
        problem.assert_unit(guard);
        problem.quantify_if(guard, 4, 5, &vars);
        let solution = problem.solve(&options()).unwrap();
        let true_count = vars.iter().filter(|&&v| solution.holds(v)).count();
        assert!((4..=5).contains(&true_count), "got {}", true_count);
    }

    #[test]
    fn unsatisfiable_returns_none() {
        let mut problem = Problem::new();
        let a = problem.new_variable(0.5);
        problem.assert_unit(a);
        problem.assert_unit(-a);
        let fast = SolverOptions {
            retries: 3,
            max_flips: 500,
            timeout: Duration::from_millis(200),
            ..options()
        };
        assert!(problem.solve(&fast).is_none());
    }

    #[test]
    fn preinit_respects_weights() {
        let mut problem = Problem::new();
        let vars: Vec<Literal> = (0..3).map(|_| problem.new_variable(0.0)).collect();
        problem.unique(&vars);
        problem.pre_initialize(&vars, &[10.0, 1.0, 1.0]);
        let mut first_count = 0;
        for seed in 0..200 {
            let opts = SolverOptions { seed: Some(seed), ..SolverOptions::default() };
            let solution = problem.solve(&opts).unwrap();
            if solution.holds(vars[0]) {
                first_count += 1;
            }
        }
        // Expectation is 10/12 of 200; anything above half is decisive.
        assert!(first_count > 120, "got {}", first_count);
    }

    #[test]
    fn interval_variables_sample_within_bounds() {
        let mut problem = Problem::new();
        let guard = problem.new_variable(0.5);
        problem.assert_unit(guard);
        let id = problem.new_interval(guard, 1.0, 10.0, vec![(vec![guard], 2.0, 5.0)]);
        let solution = problem.solve(&options()).unwrap();
        let value = solution.interval_value(id).unwrap();
        assert!((2.0..=5.0).contains(&value));
    }

    #[test]
    fn menu_variables_pick_from_the_tightest_rule() {
        let mut problem = Problem::new();
        let guard = problem.new_variable(0.5);
        let special = problem.new_variable(0.5);
        problem.assert_unit(guard);
        problem.assert_unit(special);
        let id = problem.new_menu(
            guard,
            vec!["red".to_owned(), "blue".to_owned()],
            vec![(vec![special], vec!["gold".to_owned()])],
        );
        let solution = problem.solve(&options()).unwrap();
        assert_eq!(solution.menu_value(id), Some("gold"));
    }
}

//! End-to-end generation scenarios: author an ontology from statements,
//! generate an invention, and check every stated constraint against it.

use imaginarium::{
    generate, load_statements, GeneratorOptions, Invention, Ontology, SolverOptions, TokenString,
};
use std::time::Duration;

fn options(seed: u64) -> GeneratorOptions {
    GeneratorOptions {
        solver: SolverOptions {
            retries: 500,
            timeout: Duration::from_secs(30),
            max_flips: 20_000,
            noise: 0.2,
            seed: Some(seed),
        },
    }
}

fn noun(ontology: &Ontology, name: &str) -> imaginarium::ontology::CommonNounId {
    ontology
        .find_common_noun(&TokenString::from_phrase(name))
        .unwrap_or_else(|| panic!("no noun '{}'", name))
}

fn verb(ontology: &Ontology, name: &str) -> imaginarium::ontology::VerbId {
    ontology
        .find_verb(&TokenString::from_phrase(name))
        .unwrap_or_else(|| panic!("no verb '{}'", name))
}

fn generate_or_panic<'o>(
    ontology: &'o Ontology,
    kind: &str,
    count: usize,
    seed: u64,
) -> Invention<'o> {
    generate(ontology, kind, count, &options(seed))
        .expect("generation failed")
        .expect("no invention found")
}

#[test]
fn cats_and_subkinds() {
    let ontology = load_statements(
        "a cat is a kind of person.\n\
         a persian is a kind of cat.\n\
         a tabby is a kind of cat.\n\
         a siamese is a kind of cat.",
    )
    .unwrap();
    let invention = generate_or_panic(&ontology, "cat", 1, 1);
    assert_eq!(invention.individuals().len(), 1);

    let cat = noun(&ontology, "cat");
    let person = noun(&ontology, "person");
    assert!(invention.is_a(0, cat));
    // Kind closure: every super-kind holds too.
    assert!(invention.is_a(0, person));
    // Sub-kind exclusivity: exactly one of the three.
    let sub_count = ["persian", "tabby", "siamese"]
        .iter()
        .filter(|name| invention.is_a(0, noun(&ontology, name)))
        .count();
    assert_eq!(sub_count, 1);
}

#[test]
fn relative_frequencies_bias_subkind_choice() {
    let ontology = load_statements(
        "a cat is a kind of person.\n\
         persian, tabby (10), and siamese are kinds of cat.",
    )
    .unwrap();
    let tabby = noun(&ontology, "tabby");
    let mut tabbies = 0;
    for seed in 0..1000 {
        let invention = generate_or_panic(&ontology, "cat", 1, seed);
        if invention.is_a(0, tabby) {
            tabbies += 1;
        }
    }
    // Expectation is 10/12 of 1000.
    assert!((700..1000).contains(&tabbies), "got {} tabbies", tabbies);
}

#[test]
fn reflexive_verbs_hold_of_every_individual() {
    let ontology = load_statements("people must love themselves.").unwrap();
    let invention = generate_or_panic(&ontology, "person", 10, 2);
    let love = verb(&ontology, "love");
    for i in 0..10 {
        assert!(invention.holds(love, i, i), "individual {} fails", i);
    }
}

#[test]
fn verb_cardinality_bounds_are_met() {
    let ontology = load_statements(
        "employee and employer are kinds of person.\n\
         an employee must work for one employer.\n\
         an employer must be worked for by at least two employees.",
    )
    .unwrap();
    let invention = generate_or_panic(&ontology, "person", 4, 3);
    let employee = noun(&ontology, "employee");
    let employer = noun(&ontology, "employer");
    let work_for = verb(&ontology, "work for");

    let n = invention.individuals().len();
    for i in 0..n {
        if invention.is_a(i, employee) {
            let employers: Vec<usize> = (0..n)
                .filter(|&j| invention.holds(work_for, i, j))
                .collect();
            assert_eq!(employers.len(), 1, "employee {} has {:?}", i, employers);
            assert!(invention.is_a(employers[0], employer));
        }
        if invention.is_a(i, employer) {
            let workers = (0..n)
                .filter(|&j| invention.holds(work_for, j, i))
                .count();
            assert!(workers >= 2, "employer {} has only {} workers", i, workers);
        }
    }
}

#[test]
fn parts_are_named_after_their_container() {
    let ontology = load_statements(
        "A face has eyes.\n\
         A face has a mouth.\n\
         A face has a nose.\n\
         A face has hair.",
    )
    .unwrap();
    let invention = generate_or_panic(&ontology, "face", 1, 4);
    // The face plus its four parts.
    assert_eq!(invention.individuals().len(), 5);
    let names: Vec<String> = (1..5).map(|i| invention.name_string(i)).collect();
    assert_eq!(
        names,
        [
            "the face's eye",
            "the face's mouth",
            "the face's nose",
            "the face's hair"
        ]
    );
}

#[test]
fn overlapping_alternative_sets_respect_their_bounds() {
    let ontology = load_statements(
        "x, y, and z are kinds of thing.\n\
         a x is between 4 and 5 of b, c, d, e, f, or g.\n\
         a y is between 1 and 2 of b, c, d, e, f, or g.\n\
         a z is any 3 of b, c, d, e, f, or g.",
    )
    .unwrap();
    let invention = generate_or_panic(&ontology, "thing", 100, 5);
    let adjectives: Vec<_> = ["b", "c", "d", "e", "f", "g"]
        .iter()
        .map(|name| {
            ontology
                .find_adjective(&TokenString::from_phrase(name))
                .unwrap()
        })
        .collect();
    let x = noun(&ontology, "x");
    let y = noun(&ontology, "y");
    let z = noun(&ontology, "z");
    for i in 0..100 {
        let described = invention.adjectives_describing(i);
        let count = adjectives.iter().filter(|a| described.contains(a)).count();
        let expected: std::ops::RangeInclusive<usize> = if invention.is_a(i, x) {
            4..=5
        } else if invention.is_a(i, y) {
            1..=2
        } else {
            assert!(invention.is_a(i, z));
            3..=3
        };
        assert!(
            expected.contains(&count),
            "individual {} has {} adjectives, wanted {:?}",
            i,
            count,
            expected
        );
    }
}

#[test]
fn symmetric_relations_are_deduplicated() {
    let ontology = load_statements(
        "people can marry each other.\n\
         marrying is common.",
    )
    .unwrap();
    let invention = generate_or_panic(&ontology, "person", 4, 6);
    let marry = verb(&ontology, "marry");
    for (v, s, o) in invention.relationships() {
        if v == marry {
            assert!(s <= o, "symmetric pair ({}, {}) not deduplicated", s, o);
            // Symmetry: both directions agree.
            assert_eq!(invention.holds(marry, s, o), invention.holds(marry, o, s));
        }
    }
}

#[test]
fn generalizations_propagate() {
    let ontology = load_statements(
        "cats can love other cats.\n\
         cats can like other cats.\n\
         loving implies liking.\n\
         loving is common.",
    )
    .unwrap();
    let invention = generate_or_panic(&ontology, "cat", 3, 7);
    let love = verb(&ontology, "love");
    let like = verb(&ontology, "like");
    for s in 0..3 {
        for o in 0..3 {
            if invention.holds(love, s, o) {
                assert!(invention.holds(like, s, o));
            }
        }
    }
}

#[test]
fn mutual_exclusions_are_enforced() {
    let ontology = load_statements(
        "cats can love other cats.\n\
         cats can hate other cats.\n\
         loving is common.\n\
         hating is common.\n\
         loving and hating are mutually exclusive.",
    )
    .unwrap();
    let invention = generate_or_panic(&ontology, "cat", 4, 8);
    let love = verb(&ontology, "love");
    let hate = verb(&ontology, "hate");
    for s in 0..4 {
        for o in 0..4 {
            assert!(
                !(invention.holds(love, s, o) && invention.holds(hate, s, o)),
                "{} both loves and hates {}",
                s,
                o
            );
        }
    }
}

#[test]
fn permanent_individuals_join_every_generation() {
    let ontology = load_statements(
        "a cat is a kind of person.\n\
         felix is a cat.",
    )
    .unwrap();
    let invention = generate_or_panic(&ontology, "cat", 2, 9);
    // Two ephemeral cats plus felix.
    assert_eq!(invention.individuals().len(), 3);
    let felix = invention
        .individuals()
        .iter()
        .position(|i| !i.ephemeral)
        .unwrap();
    let cat = noun(&ontology, "cat");
    assert!(invention.is_a(felix, cat));
    assert_eq!(invention.name_string(felix), "felix");
}

#[test]
fn descriptions_use_templates_and_defaults() {
    let ontology = load_statements(
        "a cat is a kind of person.\n\
         cats are black, white, or orange.\n\
         cats are described as \"a most distinguished [Modifiers] [Noun]\".",
    )
    .unwrap();
    let invention = generate_or_panic(&ontology, "cat", 1, 10);
    let description = invention.description(0);
    assert!(
        description.starts_with("a most distinguished"),
        "got '{}'",
        description
    );
    assert!(description.ends_with("cat"), "got '{}'", description);
}

#[test]
fn implied_adjectives_apply_to_matching_individuals() {
    let ontology = load_statements(
        "a cat is a kind of person.\n\
         a siamese is a kind of cat.\n\
         a tabby is a kind of cat.\n\
         siamese cats are grumpy.",
    )
    .unwrap();
    let siamese = noun(&ontology, "siamese");
    let grumpy = ontology
        .find_adjective(&TokenString::from_phrase("grumpy"))
        .unwrap();
    // Generate until both a siamese and a non-siamese have been seen.
    let mut saw_siamese = false;
    let mut saw_other = false;
    for seed in 0..50 {
        let invention = generate_or_panic(&ontology, "cat", 1, seed);
        if invention.is_a(0, siamese) {
            saw_siamese = true;
            assert!(
                invention.adjectives_describing(0).contains(&grumpy),
                "siamese cat is not grumpy"
            );
        } else {
            saw_other = true;
        }
        if saw_siamese && saw_other {
            break;
        }
    }
    assert!(saw_siamese && saw_other, "subkind choice never varied");
}

#[test]
fn contradictions_are_static_errors() {
    let ontology = load_statements(
        "employee and employer are kinds of person.\n\
         an employee must work for at least 10 employers.",
    )
    .unwrap();
    let result = generate(&ontology, "person", 2, &options(11));
    assert!(matches!(
        result,
        Err(imaginarium::Error::Generator(
            imaginarium::GeneratorError::Contradiction { .. }
        ))
    ));
}

#[test]
fn declared_tests_run() {
    let ontology = load_statements(
        "a cat is a kind of person.\n\
         cats should exist.",
    )
    .unwrap();
    let results = imaginarium::run_declared_tests(&ontology, &options(12));
    assert_eq!(results.len(), 1);
    assert!(results[0].0, "{}", results[0].1);
}

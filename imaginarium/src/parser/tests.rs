//! In addition to the parser tests, this module contains some parsing
//! helpers that other modules' tests use to build ontologies from statement
//! text.
#![cfg(test)]

use super::*;
use crate::ontology::{MonadicId, PropertyType, UNBOUNDED};
use crate::token::TokenString;

const ERROR_MESSAGE: &str = "parser error during test";

/// Parses a sequence of statements into a fresh ontology. Panics on any
/// error.
pub(crate) fn parse_statements(statements: &[&str]) -> Ontology {
    let mut ontology = Ontology::new();
    let mut parser = Parser::new(&mut ontology);
    for statement in statements {
        parser.parse_and_execute(statement).expect(ERROR_MESSAGE);
    }
    ontology
}

/// Parses statements expecting the last one to fail; returns the error.
fn parse_statements_err(statements: &[&str]) -> ParserError {
    let mut ontology = Ontology::new();
    let mut parser = Parser::new(&mut ontology);
    let (last, setup) = statements.split_last().unwrap();
    for statement in setup {
        parser.parse_and_execute(statement).expect(ERROR_MESSAGE);
    }
    parser
        .parse_and_execute(last)
        .expect_err("expected an error")
}

fn ts(phrase: &str) -> TokenString {
    TokenString::from_phrase(phrase)
}

#[test]
fn kind_declarations_build_the_lattice() {
    let ontology = parse_statements(&[
        "a cat is a kind of person.",
        "a persian is a kind of cat.",
    ]);
    let cat = ontology.find_common_noun(&ts("cat")).unwrap();
    let person = ontology.find_common_noun(&ts("person")).unwrap();
    let persian = ontology.find_common_noun(&ts("persian")).unwrap();
    assert!(ontology.dominates(person, cat));
    assert!(ontology.dominates(person, persian));
    assert_eq!(ontology.noun(cat).subkinds, vec![persian]);
    // Inflections land in the trie.
    assert_eq!(ontology.find_common_noun(&ts("cats")), Some(cat));
    assert_eq!(ontology.find_common_noun(&ts("people")), Some(person));
}

#[test]
fn plural_kind_list_with_frequencies() {
    let ontology = parse_statements(&[
        "a cat is a kind of person.",
        "persian, tabby (10), and siamese are kinds of cat.",
    ]);
    let cat = ontology.find_common_noun(&ts("cat")).unwrap();
    assert_eq!(ontology.noun(cat).subkinds.len(), 3);
    let tabby = ontology.find_common_noun(&ts("tabby")).unwrap();
    let edge = &ontology.noun(tabby).superkinds[0];
    assert_eq!(edge.parent, cat);
    assert_eq!(edge.frequency, 10.0);
    let persian = ontology.find_common_noun(&ts("persian")).unwrap();
    assert_eq!(ontology.noun(persian).superkinds[0].frequency, 1.0);
}

#[test]
fn plural_override() {
    let ontology = parse_statements(&["the plural of fish is fish."]);
    let fish = ontology.find_common_noun(&ts("fish")).unwrap();
    assert_eq!(ontology.noun(fish).plural, ts("fish"));
    assert_eq!(ontology.noun(fish).singular, ts("fish"));
}

#[test]
fn required_alternatives() {
    let ontology = parse_statements(&[
        "a cat is a kind of person.",
        "cats are black, white, or orange.",
    ]);
    let cat = ontology.find_common_noun(&ts("cat")).unwrap();
    let sets = &ontology.noun(cat).alternative_sets;
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].alternatives.len(), 3);
    assert_eq!((sets[0].min_count, sets[0].max_count), (1, 1));
    assert!(sets[0].allow_pre_initialization);
    assert!(ontology.find_adjective(&ts("black")).is_some());
    assert_eq!(ontology.noun(cat).relevant_adjectives.len(), 3);
}

#[test]
fn optional_and_counted_alternatives() {
    let ontology = parse_statements(&[
        "cats can be fluffy.",
        "a cat is any 2 of big, fast, or loud.",
        "a cat is between 1 and 2 of cuddly, distant, or aloof.",
        "a cat can be at most 1 of hungry or sleepy.",
    ]);
    let cat = ontology.find_common_noun(&ts("cat")).unwrap();
    let sets = &ontology.noun(cat).alternative_sets;
    assert_eq!(sets.len(), 4);
    assert_eq!((sets[0].min_count, sets[0].max_count), (0, 1));
    assert_eq!((sets[1].min_count, sets[1].max_count), (2, 2));
    assert_eq!((sets[2].min_count, sets[2].max_count), (1, 2));
    assert_eq!((sets[3].min_count, sets[3].max_count), (0, 1));
    assert!(!sets[1].allow_pre_initialization);
}

#[test]
fn implied_adjectives_carry_conditions() {
    let ontology = parse_statements(&[
        "a cat is a kind of person.",
        "a siamese is a kind of cat.",
        "siamese cats are grumpy.",
    ]);
    let cat = ontology.find_common_noun(&ts("cat")).unwrap();
    let siamese = ontology.find_common_noun(&ts("siamese")).unwrap();
    let implied = &ontology.noun(cat).implied_adjectives;
    assert_eq!(implied.len(), 1);
    assert_eq!(implied[0].conditions.len(), 1);
    assert_eq!(implied[0].conditions[0].concept, MonadicId::Noun(siamese));
    assert!(implied[0].modifier.positive);
}

#[test]
fn negated_implied_adjective() {
    let ontology = parse_statements(&["cats can be happy.", "cats are not sad."]);
    let cat = ontology.find_common_noun(&ts("cat")).unwrap();
    let implied = &ontology.noun(cat).implied_adjectives;
    assert_eq!(implied.len(), 1);
    assert!(!implied[0].modifier.positive);
}

#[test]
fn parts_with_defaults_and_names() {
    let ontology = parse_statements(&[
        "a face has eyes.",
        "a face has a mouth.",
        "a person has 2 legs called their pins.",
    ]);
    let face = ontology.find_common_noun(&ts("face")).unwrap();
    let parts = &ontology.noun(face).parts;
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].name, ts("eye"));
    assert_eq!(parts[0].count, 1);
    assert_eq!(parts[1].name, ts("mouth"));
    let person = ontology.find_common_noun(&ts("person")).unwrap();
    let legs = &ontology.noun(person).parts[0];
    assert_eq!(legs.count, 2);
    assert_eq!(legs.name, ts("pin"));
}

#[test]
fn interval_properties() {
    let ontology = parse_statements(&["cats have weight between 5 and 15."]);
    let cat = ontology.find_common_noun(&ts("cat")).unwrap();
    let property = &ontology.noun(cat).properties[0];
    assert_eq!(property.name, ts("weight"));
    match &property.kind {
        PropertyType::Interval { low, high, rules } => {
            assert_eq!((*low, *high), (5.0, 15.0));
            assert!(rules.is_empty());
        }
        PropertyType::Menu { .. } => panic!("expected an interval"),
    }
}

#[test]
fn verb_cardinality_statements() {
    let ontology = parse_statements(&[
        "employee and employer are kinds of person.",
        "an employee must work for one employer.",
        "an employer must be worked for by at least two employees.",
    ]);
    let work_for = ontology.find_verb(&ts("work for")).unwrap();
    let verb = ontology.verb(work_for);
    assert_eq!((verb.object_lower, verb.object_upper), (1, 1));
    assert_eq!((verb.subject_lower, verb.subject_upper), (2, UNBOUNDED));
    assert_eq!(verb.shapes.len(), 1);
    let employee = ontology.find_common_noun(&ts("employee")).unwrap();
    let employer = ontology.find_common_noun(&ts("employer")).unwrap();
    assert_eq!(verb.shapes[0].subject.kind, employee);
    assert_eq!(verb.shapes[0].object.kind, employer);
    // All inflections resolve to the same verb.
    assert_eq!(ontology.find_verb(&ts("works for")), Some(work_for));
    assert_eq!(ontology.find_verb(&ts("working for")), Some(work_for));
    assert_eq!(ontology.find_verb(&ts("worked for")), Some(work_for));
}

#[test]
fn reflexivity_and_symmetry() {
    let ontology = parse_statements(&[
        "people must love themselves.",
        "people can marry each other.",
        "people cannot fire themselves.",
        "people cannot outrank each other.",
    ]);
    let love = ontology.find_verb(&ts("love")).unwrap();
    assert!(ontology.verb(love).is_reflexive);
    let marry = ontology.find_verb(&ts("marry")).unwrap();
    assert!(ontology.verb(marry).is_symmetric);
    let fire = ontology.find_verb(&ts("fire")).unwrap();
    assert!(ontology.verb(fire).is_anti_reflexive);
    let outrank = ontology.find_verb(&ts("outrank")).unwrap();
    assert!(ontology.verb(outrank).is_anti_symmetric);
}

#[test]
fn other_quantifier_sets_anti_reflexive() {
    let ontology = parse_statements(&[
        "a cat is a kind of person.",
        "cats can love other cats.",
        "dogs can love many dogs.",
    ]);
    let love = ontology.find_verb(&ts("love")).unwrap();
    assert!(ontology.verb(love).is_anti_reflexive);
    // "many" must not set the flag; check with a fresh verb.
    let ontology = parse_statements(&["dogs can chase many dogs."]);
    let chase = ontology.find_verb(&ts("chase")).unwrap();
    assert!(!ontology.verb(chase).is_anti_reflexive);
}

#[test]
fn verb_algebra_statements() {
    let ontology = parse_statements(&[
        "cats can love other cats.",
        "cats can hate other cats.",
        "loving is rare.",
        "hating is common.",
        "loving and hating are mutually exclusive.",
        "loving implies knowing.",
        "flirting is a way of interacting.",
    ]);
    let love = ontology.find_verb(&ts("love")).unwrap();
    let hate = ontology.find_verb(&ts("hate")).unwrap();
    assert_eq!(ontology.verb(love).density, 0.05);
    assert_eq!(ontology.verb(hate).density, 0.95);
    assert!(ontology.verb(love).mutual_exclusions.contains(&hate));
    assert!(ontology.verb(hate).mutual_exclusions.contains(&love));
    let know = ontology.find_verb(&ts("know")).unwrap();
    assert_eq!(ontology.verb(love).generalizations, vec![know]);
    let flirt = ontology.find_verb(&ts("flirt")).unwrap();
    let interact = ontology.find_verb(&ts("interact")).unwrap();
    assert_eq!(ontology.verb(flirt).superspecies, vec![interact]);
    assert_eq!(ontology.verb(interact).subspecies, vec![flirt]);
}

#[test]
fn templates_and_silencing() {
    let ontology = parse_statements(&[
        "a cat is a kind of person.",
        "cats are identified as \"[Modifiers] cat\".",
        "cats are described as \"a [Noun] of distinction\".",
        "cats can be boring.",
        "do not mention being boring.",
        "do not print cats.",
    ]);
    let cat = ontology.find_common_noun(&ts("cat")).unwrap();
    assert_eq!(
        ontology.noun(cat).name_template.as_deref(),
        Some("[Modifiers] cat")
    );
    assert_eq!(
        ontology.noun(cat).description_template.as_deref(),
        Some("a [Noun] of distinction")
    );
    let boring = ontology.find_adjective(&ts("boring")).unwrap();
    assert!(ontology.adjective(boring).is_silent);
    assert!(ontology.noun(cat).suppress_description);
}

#[test]
fn proper_nouns_and_tests() {
    let ontology = parse_statements(&[
        "a cat is a kind of person.",
        "felix is a cat.",
        "cats should exist.",
        "dogs should not exist.",
    ]);
    let felix = ontology.find_proper_noun(&ts("felix")).unwrap();
    let cat = ontology.find_common_noun(&ts("cat")).unwrap();
    let individual = &ontology.permanent_individuals()[ontology.proper_noun(felix).individual];
    assert_eq!(individual.kinds, vec![cat]);
    assert_eq!(ontology.tests().len(), 2);
    assert!(ontology.tests()[0].should_exist);
    assert!(!ontology.tests()[1].should_exist);
}

#[test]
fn metadata_and_buttons() {
    let ontology = parse_statements(&[
        "author: A. N. Author",
        "description: a small test world.",
        "pressing \"again\" means \"generate cat\".",
    ]);
    assert_eq!(ontology.author.as_deref(), Some("A. N. Author"));
    assert!(ontology.description.is_some());
    assert_eq!(
        ontology.buttons,
        vec![("again".to_owned(), "generate cat".to_owned())]
    );
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let ontology = parse_statements(&[
        "# a comment",
        "// another",
        "",
        "a cat is a kind of person. # trailing",
    ]);
    assert!(ontology.find_common_noun(&ts("cat")).is_some());
}

#[test]
fn unknown_sentences_are_reported() {
    let error = parse_statements_err(&["colorless green ideas sleep furiously"]);
    assert!(matches!(error, ParserError::UnknownSentencePattern(_)));
}

#[test]
fn committed_patterns_report_grammatical_errors() {
    let error = parse_statements_err(&["a cat is a kind of"]);
    match error {
        ParserError::Grammatical { pattern, .. } => {
            assert_eq!(pattern, "N is a kind of N");
        }
        other => panic!("expected a grammatical error, got {:?}", other),
    }
}

#[test]
fn number_disagreement_is_rejected() {
    // "cats is ..." never matches an is-pattern, and there is no other
    // reading of the sentence.
    let error = parse_statements_err(&["a cat is a kind of person.", "cats is grumpy."]);
    assert!(matches!(error, ParserError::UnknownSentencePattern(_)));
}

#[test]
fn name_collisions_are_rejected() {
    let error = parse_statements_err(&[
        "a cat is a kind of person.",
        "people can be cat.",
    ]);
    assert!(matches!(
        error,
        ParserError::Ontology(OntologyError::NameCollision { .. })
    ));
}

#[test]
fn locked_ontologies_reject_new_referents_only() {
    let mut ontology = Ontology::new();
    {
        let mut parser = Parser::new(&mut ontology);
        parser
            .parse_and_execute("a cat is a kind of person.")
            .unwrap();
        parser.parse_and_execute("cats can be big or small.").unwrap();
    }
    ontology.lock();
    let mut parser = Parser::new(&mut ontology);
    let error = parser
        .parse_and_execute("a dog is a kind of person.")
        .expect_err("expected an error");
    assert!(matches!(
        error,
        ParserError::Ontology(OntologyError::UnknownReferent { .. })
    ));
    // Attaching facts to existing referents still works.
    parser.parse_and_execute("cats are big or small.").unwrap();
}

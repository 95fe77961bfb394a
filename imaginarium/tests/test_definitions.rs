//! Definition-directory loading: `.gen` files, per-referent files, list
//! files, and error collection.

use imaginarium::{GeneratorOptions, Ontology, Parser, SolverOptions, TokenString};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Creates a fresh scratch directory for one test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("imaginarium-test-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn options() -> GeneratorOptions {
    GeneratorOptions {
        solver: SolverOptions {
            retries: 100,
            timeout: Duration::from_secs(10),
            seed: Some(99),
            ..SolverOptions::default()
        },
    }
}

#[test]
fn gen_files_load_in_directory_order() {
    let dir = scratch_dir("order");
    fs::write(dir.join("01-kinds.gen"), "a cat is a kind of person.\n").unwrap();
    fs::write(
        dir.join("02-colors.gen"),
        "# colors\ncats are black, white, or orange.\n",
    )
    .unwrap();
    let ontology = imaginarium::load_definitions(&dir).unwrap();
    let cat = ontology
        .find_common_noun(&TokenString::from_phrase("cat"))
        .unwrap();
    assert_eq!(ontology.noun(cat).alternative_sets.len(), 1);
}

#[test]
fn referent_definition_files_load_on_first_use() {
    let dir = scratch_dir("referent");
    fs::write(dir.join("main.gen"), "a cat is a kind of animal.\n").unwrap();
    // Probed when "cat" is first introduced.
    fs::write(dir.join("cat.gen"), "cats can be fluffy.\n").unwrap();
    let ontology = imaginarium::load_definitions(&dir).unwrap();
    let cat = ontology
        .find_common_noun(&TokenString::from_phrase("cat"))
        .unwrap();
    assert_eq!(ontology.noun(cat).alternative_sets.len(), 1);
}

#[test]
fn list_properties_read_from_text_files() {
    let dir = scratch_dir("lists");
    fs::write(dir.join("names.txt"), "Alice\nBob\n\n  Carol  \n").unwrap();
    fs::write(dir.join("world.gen"), "cats have names from names.\n").unwrap();
    let ontology = imaginarium::load_definitions(&dir).unwrap();
    let invention = imaginarium::generate(&ontology, "cat", 1, &options())
        .unwrap()
        .unwrap();
    let name = invention.name_string(0);
    assert!(
        ["Alice", "Bob", "Carol"].contains(&name.as_str()),
        "got '{}'",
        name
    );
    let value = invention.property_value(0, "name").unwrap();
    assert_eq!(value.to_string(), name);
}

#[test]
fn missing_list_files_are_errors() {
    let dir = scratch_dir("missing-list");
    fs::write(dir.join("world.gen"), "cats have names from nowhere.\n").unwrap();
    let mut ontology = Ontology::new();
    ontology.definitions_directory = Some(dir);
    let mut parser = Parser::new(&mut ontology);
    let mut errors = Vec::new();
    parser.load_definitions(Some(&mut errors)).unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("nowhere"));
}

#[test]
fn load_errors_carry_file_and_line() {
    let dir = scratch_dir("errors");
    fs::write(
        dir.join("world.gen"),
        "a cat is a kind of person.\ncats cats cats cats\ncats can be calico.\n",
    )
    .unwrap();
    let mut ontology = Ontology::new();
    ontology.definitions_directory = Some(dir);
    let mut parser = Parser::new(&mut ontology);
    let mut errors = Vec::new();
    parser.load_definitions(Some(&mut errors)).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 2);
    // Later statements still load.
    assert!(parser
        .ontology()
        .find_adjective(&TokenString::from_phrase("calico"))
        .is_some());
}

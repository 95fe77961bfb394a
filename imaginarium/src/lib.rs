#![deny(clippy::self_named_module_files)]
#![warn(clippy::branches_sharing_code)]
#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_into_iter_loop)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::from_iter_instead_of_collect)]
#![warn(clippy::get_unwrap)]
#![warn(clippy::if_not_else)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::inconsistent_struct_constructor)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::items_after_statements)]
#![warn(clippy::manual_assert)]
#![warn(clippy::manual_ok_or)]
#![warn(clippy::map_unwrap_or)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::str_to_string)]
#![warn(clippy::unnested_or_patterns)]
#![warn(clippy::unused_self)]

//! Imaginarium: a constraint-based procedural content generator.
//!
//! A designer authors an ontology in a restricted subset of English: kinds
//! of things, attributes, binary relations with cardinalities, parts,
//! properties, and logical constraints among them. The library compiles the
//! ontology into a Boolean problem and, on demand, produces an *invention*:
//! a set of individuals satisfying every stated constraint, each with an
//! English description.

pub mod generator;
pub mod morphology;
pub mod ontology;
pub mod parser;
pub mod solver;
pub mod token;
pub mod trie;

pub use generator::{Generator, GeneratorError, GeneratorOptions, Invention, PropertyValue};
pub use ontology::{Ontology, OntologyError};
pub use parser::{LoadError, Parser, ParserError};
pub use solver::SolverOptions;
pub use token::{Token, TokenString};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type ImaginariumResult<T> = Result<T, Error>;

/// The top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parser(#[from] ParserError),

    /// One statement of a definition file failed; carries the file, line
    /// and offending input.
    #[error("{0}")]
    DefinitionLoad(LoadError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("'{0}' is not a known kind")]
    UnknownKind(String),
}

/// Builds an ontology from a definitions directory: every `.gen` file in
/// it is loaded in directory order. Errors abort the load; use
/// [`Parser::load_definitions`] directly to collect them instead.
pub fn load_definitions(directory: impl Into<PathBuf>) -> ImaginariumResult<Ontology> {
    let mut ontology = Ontology::new();
    ontology.definitions_directory = Some(directory.into());
    let mut parser = Parser::new(&mut ontology);
    parser.load_definitions(None)?;
    Ok(ontology)
}

/// Builds an ontology from statements given directly, one per line.
pub fn load_statements(text: &str) -> ImaginariumResult<Ontology> {
    let mut ontology = Ontology::new();
    let mut parser = Parser::new(&mut ontology);
    for line in text.lines() {
        parser.parse_and_execute(line)?;
    }
    Ok(ontology)
}

/// Generates an invention: `count` individuals of the named kind, plus
/// their parts and every permanent individual. Returns `Ok(None)` when the
/// solver exhausted its retries without finding a model.
pub fn generate<'o>(
    ontology: &'o Ontology,
    kind: &str,
    count: usize,
    options: &GeneratorOptions,
) -> ImaginariumResult<Option<Invention<'o>>> {
    let name = TokenString::from_phrase(kind);
    let id = ontology
        .find_common_noun(&name)
        .ok_or_else(|| Error::UnknownKind(kind.to_owned()))?;
    let generator = Generator::new(ontology, id, &[], count)?;
    Ok(generator.generate(options))
}

/// Runs every test declared with "should exist" / "should not exist"
/// statements. Returns (passed, message) per test, in declaration order.
pub fn run_declared_tests(
    ontology: &Ontology,
    options: &GeneratorOptions,
) -> Vec<(bool, String)> {
    ontology
        .tests()
        .iter()
        .map(|test| {
            let exists = match Generator::new(ontology, test.kind, &test.modifiers, 1) {
                Ok(generator) => generator.generate(options).is_some(),
                Err(_) => false,
            };
            let passed = exists == test.should_exist;
            let message = if passed {
                test.success_message.clone()
            } else {
                test.failure_message.clone()
            };
            (passed, message)
        })
        .collect()
}

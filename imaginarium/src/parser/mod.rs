//! The pattern-directed statement parser.
//!
//! Statements stream in one line at a time; each is matched against the
//! standard patterns in declared order and the first match's action mutates
//! the ontology. Everything the parser knows about source positions lives
//! here too, so definition-file loading can report file, line and offending
//! input.

mod cursor;
mod error;
mod patterns;
#[cfg(test)]
mod tests;

pub use error::{LoadError, ParserError};

use crate::morphology;
use crate::ontology::{
    AdjectiveId, AlternativeSet, CommonNounId, ConditionalModifier, IntervalRule, KindAndModifiers,
    MenuRule, MonadicId, MonadicLiteral, Ontology, OntologyError, Part, Property, PropertyType,
    ReferentFamily, TestDecl, VerbForm, VerbId, VerbShape,
};
use crate::token::TokenString;
use ahash::AHashSet;
use cursor::{AdjectivePhrase, Cursor, MatchFailure, NounPhrase, NpHead, VerbPhrase, VerbRef};
use patterns::{BoundSide, Statement, PATTERNS};
use std::fs;
use std::path::{Path, PathBuf};

/// Strips a `#` or `//` line comment, ignoring markers inside double quotes.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let bytes = line.as_bytes();
    for i in 0..bytes.len() {
        match bytes[i] {
            b'"' => in_quotes = !in_quotes,
            b'#' if !in_quotes => return &line[..i],
            b'/' if !in_quotes && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Normalizes a statement: comment stripped, whitespace and the trailing
/// period removed.
fn clean_statement(line: &str) -> &str {
    strip_comment(line).trim().trim_end_matches('.').trim_end()
}

/// A parser bound to one ontology, carrying the source position it is
/// reading from and the definition files it has already pulled in.
pub struct Parser<'o> {
    ontology: &'o mut Ontology,
    current_file: Option<PathBuf>,
    current_line: u32,
    loaded_files: AHashSet<PathBuf>,
    /// Errors collected from nested (per-referent) definition loads.
    pub load_errors: Vec<LoadError>,
}

impl<'o> Parser<'o> {
    pub fn new(ontology: &'o mut Ontology) -> Self {
        Parser {
            ontology,
            current_file: None,
            current_line: 0,
            loaded_files: AHashSet::new(),
            load_errors: Vec::new(),
        }
    }

    pub fn ontology(&self) -> &Ontology {
        self.ontology
    }

    /// Parses one statement and executes its action against the ontology.
    pub fn parse_and_execute(&mut self, text: &str) -> Result<(), ParserError> {
        let cleaned = clean_statement(text);
        if cleaned.is_empty() {
            return Ok(());
        }
        if let Some(rest) = metadata_text(cleaned, "author") {
            self.ontology.author = Some(rest);
            return Ok(());
        }
        if let Some(rest) = metadata_text(cleaned, "description") {
            self.ontology.description = Some(rest);
            return Ok(());
        }
        if let Some(rest) = metadata_text(cleaned, "instructions") {
            self.ontology.instructions = Some(rest);
            return Ok(());
        }

        let (tokens, strings) = TokenString::tokenize_statement(cleaned);
        if tokens.is_empty() {
            return Ok(());
        }
        for pattern in PATTERNS {
            let mut cursor = Cursor::new(cleaned, tokens.tokens(), &strings, pattern.name);
            match (pattern.matcher)(&mut cursor, self.ontology) {
                Ok(statement) => return self.execute(statement),
                Err(MatchFailure::Backtrack) => {}
                Err(MatchFailure::Committed(error)) => return Err(error),
            }
        }
        Err(ParserError::UnknownSentencePattern(cleaned.to_owned()))
    }

    // --- File loading ---

    /// Loads every `.gen` file in the ontology's definitions directory, in
    /// directory order. With `collected` set, per-line errors are gathered
    /// there instead of aborting the load.
    pub fn load_definitions(
        &mut self,
        mut collected: Option<&mut Vec<LoadError>>,
    ) -> Result<(), crate::Error> {
        let Some(directory) = self.ontology.definitions_directory.clone() else {
            return Ok(());
        };
        let mut paths: Vec<PathBuf> = fs::read_dir(&directory)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "gen"))
            .collect();
        paths.sort();
        for path in paths {
            self.load_file(&path, collected.as_mut().map(|sink| &mut **sink))?;
        }
        Ok(())
    }

    /// Loads one definition file, statement per line.
    pub fn load_file(
        &mut self,
        path: &Path,
        mut collected: Option<&mut Vec<LoadError>>,
    ) -> Result<(), crate::Error> {
        if !self.loaded_files.insert(path.to_owned()) {
            return Ok(());
        }
        let contents = fs::read_to_string(path)?;
        let previous_file = self.current_file.replace(path.to_owned());
        let previous_line = self.current_line;
        let mut result = Ok(());
        for (index, line) in contents.lines().enumerate() {
            self.current_line = index as u32 + 1;
            if let Err(error) = self.parse_and_execute(line) {
                let load_error = LoadError {
                    file: Some(path.to_owned()),
                    line: self.current_line,
                    input: clean_statement(line).to_owned(),
                    error,
                };
                log::warn!("{}", load_error);
                match collected.as_mut() {
                    Some(sink) => sink.push(load_error),
                    None => {
                        result = Err(crate::Error::DefinitionLoad(load_error));
                        break;
                    }
                }
            }
        }
        self.current_file = previous_file;
        self.current_line = previous_line;
        result
    }

    /// Probes the definitions directory for `<referent name>.gen` when a
    /// referent is first introduced. A missing file is expected and only
    /// logged at debug level; errors inside a present file are collected on
    /// the parser and logged.
    fn load_referent_definitions(&mut self, name: &TokenString) {
        let Some(directory) = self.ontology.definitions_directory.clone() else {
            return;
        };
        let path = directory.join(format!("{}.gen", name));
        if !path.is_file() {
            log::debug!("no definition file for '{}'", name);
            return;
        }
        let mut collected = Vec::new();
        if let Err(error) = self.load_file(&path, Some(&mut collected)) {
            log::warn!("failed loading '{}': {}", path.display(), error);
        }
        self.load_errors.append(&mut collected);
    }

    /// Reads a one-value-per-line list file for a menu property.
    fn read_list_file(&self, name: &TokenString) -> Result<Vec<String>, ParserError> {
        let path = match &self.ontology.definitions_directory {
            Some(directory) => directory.join(format!("{}.txt", name)),
            None => PathBuf::from(format!("{}.txt", name)),
        };
        let contents = fs::read_to_string(&path)
            .map_err(|source| ParserError::ListFile { path: path.clone(), source })?;
        let values: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        if values.is_empty() {
            return Err(ParserError::EmptyList(path));
        }
        Ok(values)
    }

    // --- Referring-expression resolution ---

    /// Resolves a noun phrase's head to a common noun, creating it (and
    /// probing for its definition file) when new.
    fn resolve_noun(&mut self, np: &NounPhrase) -> Result<CommonNounId, ParserError> {
        match &np.head {
            NpHead::Known(MonadicId::Noun(id)) => Ok(*id),
            NpHead::Known(MonadicId::Adjective(id)) => {
                Err(ParserError::Ontology(OntologyError::NameCollision {
                    name: self.ontology.adjective(*id).name.clone(),
                    existing: ReferentFamily::Adjective,
                    attempted: ReferentFamily::CommonNoun,
                }))
            }
            NpHead::New(tokens) => {
                let id = self.ontology.add_common_noun(tokens, np.number())?;
                let singular = self.ontology.noun(id).singular.clone();
                self.load_referent_definitions(&singular);
                Ok(id)
            }
        }
    }

    fn resolve_modifiers(&self, np: &NounPhrase) -> Vec<MonadicLiteral> {
        np.modifiers
            .iter()
            .map(|m| MonadicLiteral { concept: m.concept, positive: m.positive })
            .collect()
    }

    /// Resolves an adjective phrase, creating the adjective when new.
    fn resolve_adjective(&mut self, ap: &AdjectivePhrase) -> Result<AdjectiveId, ParserError> {
        match &ap.adjective {
            cursor::ApRef::Known(id) => Ok(*id),
            cursor::ApRef::New(tokens) => Ok(self.ontology.add_adjective(tokens)?),
        }
    }

    /// Resolves a verb segment, creating the verb from the scanned surface
    /// form when new.
    fn resolve_verb(&mut self, vp: &VerbPhrase) -> Result<VerbId, ParserError> {
        match &vp.verb {
            VerbRef::Known(id, _) => Ok(*id),
            VerbRef::New(tokens) => match vp.form() {
                VerbForm::Gerund => Ok(self.ontology.add_verb_from_gerund(tokens)?),
                VerbForm::ThirdPerson => {
                    let base = morphology::plural_of_verb(tokens)?;
                    Ok(self.ontology.add_verb(&base)?)
                }
                _ => Ok(self.ontology.add_verb(tokens)?),
            },
        }
    }

    /// Resolves a verb scanned in passive position ("be chased by"): a new
    /// surface form is a passive participle and has to be inverted to its
    /// base before the verb can be created.
    fn resolve_passive_verb(&mut self, vp: &VerbPhrase) -> Result<VerbId, ParserError> {
        match &vp.verb {
            VerbRef::Known(id, _) => Ok(*id),
            VerbRef::New(tokens) => {
                let candidates = morphology::base_forms_of_passive(tokens);
                let base = candidates
                    .iter()
                    .find(|base| {
                        morphology::passive_participle(base)
                            .is_ok_and(|formed| formed == *tokens)
                    })
                    .or_else(|| candidates.first())
                    .cloned()
                    .unwrap_or_else(|| tokens.clone());
                Ok(self.ontology.add_verb(&base)?)
            }
        }
    }

    // --- Statement execution ---

    fn execute(&mut self, statement: Statement) -> Result<(), ParserError> {
        match statement {
            Statement::DeclareKind { subs, superkind } => {
                let parent = self.resolve_noun(&superkind)?;
                for sub in subs {
                    let child = self.resolve_noun(&sub)?;
                    let frequency = sub.relative_frequency.unwrap_or(1.0);
                    self.ontology.declare_superkind(child, parent, frequency)?;
                }
                Ok(())
            }
            Statement::DeclareProperName { name, kind } => {
                let kind = self.resolve_noun(&kind)?;
                self.ontology.add_proper_noun(&name, &[kind])?;
                Ok(())
            }
            Statement::SetPlural { noun, form } => {
                let id = self.resolve_noun(&noun)?;
                self.ontology.set_plural(id, form);
                Ok(())
            }
            Statement::SetSingular { noun, form } => {
                let id = self.resolve_noun(&noun)?;
                self.ontology.set_singular(id, form);
                Ok(())
            }
            Statement::Alternatives {
                subject,
                alternatives,
                min,
                max,
                allow_pre_initialization,
            } => {
                let kind = self.resolve_noun(&subject)?;
                let mut literals = Vec::with_capacity(alternatives.len());
                let mut frequencies = Vec::with_capacity(alternatives.len());
                for ap in &alternatives {
                    let adjective = self.resolve_adjective(ap)?;
                    self.ontology.adjective_mut(adjective).reference_count += 1;
                    self.ontology.add_relevant_adjective(kind, adjective);
                    literals.push(MonadicLiteral {
                        concept: MonadicId::Adjective(adjective),
                        positive: !ap.negated,
                    });
                    frequencies.push(ap.frequency.unwrap_or(1.0));
                }
                self.ontology.noun_mut(kind).alternative_sets.push(AlternativeSet {
                    alternatives: literals,
                    frequencies,
                    min_count: min,
                    max_count: max,
                    allow_pre_initialization,
                });
                Ok(())
            }
            Statement::ImpliedAdjective { subject, adjective } => {
                let kind = self.resolve_noun(&subject)?;
                let conditions = self.resolve_modifiers(&subject);
                let id = self.resolve_adjective(&adjective)?;
                self.ontology.add_relevant_adjective(kind, id);
                self.ontology.noun_mut(kind).implied_adjectives.push(ConditionalModifier {
                    conditions,
                    modifier: MonadicLiteral {
                        concept: MonadicId::Adjective(id),
                        positive: !adjective.negated,
                    },
                });
                Ok(())
            }
            Statement::IdentifiedAs { subject, template } => {
                let kind = self.resolve_noun(&subject)?;
                self.ontology.noun_mut(kind).name_template = Some(template);
                Ok(())
            }
            Statement::DescribedAs { subject, template } => {
                let kind = self.resolve_noun(&subject)?;
                self.ontology.noun_mut(kind).description_template = Some(template);
                Ok(())
            }
            Statement::DoNotMention { adjective } => {
                let id = self.resolve_adjective(&adjective)?;
                self.ontology.adjective_mut(id).is_silent = true;
                Ok(())
            }
            Statement::DoNotPrint { subject } => {
                let kind = self.resolve_noun(&subject)?;
                self.ontology.noun_mut(kind).suppress_description = true;
                Ok(())
            }
            Statement::DeclarePart { subject, count, kind, name } => {
                let owner = self.resolve_noun(&subject)?;
                let part_kind = self.resolve_noun(&kind)?;
                let modifiers = self.resolve_modifiers(&kind);
                let count = count.or(kind.explicit_count()).unwrap_or(1);
                let name = match name {
                    Some(given) => morphology::singular_of_noun(&given).unwrap_or(given),
                    None => self.ontology.noun(part_kind).singular.clone(),
                };
                let noun = self.ontology.noun_mut(owner);
                noun.parts.retain(|p| p.name != name);
                noun.parts.push(Part { name, count, kind: part_kind, modifiers });
                Ok(())
            }
            Statement::DeclareIntervalProperty { subject, property, low, high } => {
                let kind = self.resolve_noun(&subject)?;
                let conditions = self.resolve_modifiers(&subject);
                let name = property_name(&property);
                let noun = self.ontology.noun_mut(kind);
                match noun.properties.iter().position(|p| p.name == name) {
                    Some(i) => match &mut noun.properties[i].kind {
                        PropertyType::Interval { low: l, high: h, rules } => {
                            if conditions.is_empty() {
                                *l = low;
                                *h = high;
                            } else {
                                rules.push(IntervalRule { conditions, low, high });
                            }
                        }
                        PropertyType::Menu { .. } => {
                            // Re-typing a menu property as an interval
                            // replaces it.
                            noun.properties[i] = interval_property(name, low, high, conditions);
                        }
                    },
                    None => {
                        noun.properties.push(interval_property(name, low, high, conditions));
                    }
                }
                Ok(())
            }
            Statement::DeclareMenuProperty { subject, property, list } => {
                let entries = self.read_list_file(&list)?;
                let kind = self.resolve_noun(&subject)?;
                let conditions = self.resolve_modifiers(&subject);
                let name = property_name(&property);
                let noun = self.ontology.noun_mut(kind);
                match noun.properties.iter().position(|p| p.name == name) {
                    Some(i) => match &mut noun.properties[i].kind {
                        PropertyType::Menu { entries: base, rules } => {
                            if conditions.is_empty() {
                                *base = entries;
                            } else {
                                rules.push(MenuRule { conditions, entries });
                            }
                        }
                        PropertyType::Interval { .. } => {
                            noun.properties[i] = menu_property(name, entries, conditions);
                        }
                    },
                    None => {
                        noun.properties.push(menu_property(name, entries, conditions));
                    }
                }
                Ok(())
            }
            Statement::VerbBounds { subject, verb, object, side, lower, upper, is_other } => {
                let verb = match side {
                    BoundSide::Object => self.resolve_verb(&verb)?,
                    BoundSide::Subject => self.resolve_passive_verb(&verb)?,
                };
                let subject_kind = KindAndModifiers {
                    kind: self.resolve_noun(&subject)?,
                    modifiers: self.resolve_modifiers(&subject),
                };
                let object_kind = KindAndModifiers {
                    kind: self.resolve_noun(&object)?,
                    modifiers: self.resolve_modifiers(&object),
                };
                let shape = match side {
                    BoundSide::Object => VerbShape { subject: subject_kind, object: object_kind },
                    // In the passive form the sentence subject is the verb's
                    // object.
                    BoundSide::Subject => VerbShape { subject: object_kind, object: subject_kind },
                };
                self.ontology.add_verb_shape(verb, shape);
                let v = self.ontology.verb_mut(verb);
                match side {
                    BoundSide::Object => {
                        if let Some(n) = lower {
                            v.object_lower = n;
                        }
                        if let Some(n) = upper {
                            v.object_upper = n;
                        }
                    }
                    BoundSide::Subject => {
                        if let Some(n) = lower {
                            v.subject_lower = n;
                        }
                        if let Some(n) = upper {
                            v.subject_upper = n;
                        }
                    }
                }
                if is_other {
                    v.is_anti_reflexive = true;
                }
                Ok(())
            }
            Statement::VerbReflexive { subject, verb, anti } => {
                let verb = self.resolve_verb(&verb)?;
                let kind = KindAndModifiers {
                    kind: self.resolve_noun(&subject)?,
                    modifiers: self.resolve_modifiers(&subject),
                };
                self.ontology.add_verb_shape(
                    verb,
                    VerbShape { subject: kind.clone(), object: kind },
                );
                let v = self.ontology.verb_mut(verb);
                if anti {
                    v.is_anti_reflexive = true;
                } else {
                    v.is_reflexive = true;
                }
                Ok(())
            }
            Statement::VerbSymmetric { subject, verb, anti } => {
                let verb = self.resolve_verb(&verb)?;
                let kind = KindAndModifiers {
                    kind: self.resolve_noun(&subject)?,
                    modifiers: self.resolve_modifiers(&subject),
                };
                self.ontology.add_verb_shape(
                    verb,
                    VerbShape { subject: kind.clone(), object: kind },
                );
                let v = self.ontology.verb_mut(verb);
                if anti {
                    v.is_anti_symmetric = true;
                } else {
                    v.is_symmetric = true;
                }
                Ok(())
            }
            Statement::VerbDensity { verb, density } => {
                let verb = self.resolve_verb(&verb)?;
                self.ontology.verb_mut(verb).density = density;
                Ok(())
            }
            Statement::VerbMutualExclusion { left, right } => {
                let left = self.resolve_verb(&left)?;
                let right = self.resolve_verb(&right)?;
                self.ontology.verb_mut(left).mutual_exclusions.push(right);
                self.ontology.verb_mut(right).mutual_exclusions.push(left);
                Ok(())
            }
            Statement::VerbImplies { sub, general } => {
                let sub = self.resolve_verb(&sub)?;
                let general = self.resolve_verb(&general)?;
                self.ontology.verb_mut(sub).generalizations.push(general);
                Ok(())
            }
            Statement::VerbWayOf { sub, superspecies } => {
                let sub = self.resolve_verb(&sub)?;
                let superspecies = self.resolve_verb(&superspecies)?;
                self.ontology.verb_mut(sub).superspecies.push(superspecies);
                self.ontology.verb_mut(superspecies).subspecies.push(sub);
                Ok(())
            }
            Statement::ShouldExist { subject, should, every_kind } => {
                let kind = self.resolve_noun(&subject)?;
                let modifiers = self.resolve_modifiers(&subject);
                let kinds = if every_kind {
                    self.ontology.noun(kind).subkinds.clone()
                } else {
                    vec![kind]
                };
                for kind in kinds {
                    let text = self.ontology.noun(kind).singular.clone();
                    let (success, failure) = if should {
                        (
                            format!("a {} exists, as it should", text),
                            format!("no {} could be generated", text),
                        )
                    } else {
                        (
                            format!("no {} exists, as it should be", text),
                            format!("a {} was generated, but none should exist", text),
                        )
                    };
                    self.ontology.add_test(TestDecl {
                        kind,
                        modifiers: modifiers.clone(),
                        should_exist: should,
                        success_message: success,
                        failure_message: failure,
                    });
                }
                Ok(())
            }
            Statement::Button { label, command } => {
                self.ontology.buttons.push((label, command));
                Ok(())
            }
        }
    }
}

/// `author:` / `description:` / `instructions:` metadata, with the raw
/// (case-preserving) text after the colon.
fn metadata_text(line: &str, key: &str) -> Option<String> {
    let lower = line.to_lowercase();
    let rest = lower.strip_prefix(key)?;
    let rest = rest.trim_start();
    if !rest.starts_with(':') {
        return None;
    }
    let colon = line.find(':').unwrap_or(0);
    Some(line[colon + 1..].trim().to_owned())
}

/// The canonical (singular) name of a property from its noun phrase.
fn property_name(np: &NounPhrase) -> TokenString {
    let text = np.text();
    morphology::singular_of_noun(&text).unwrap_or(text)
}

fn interval_property(
    name: TokenString,
    low: f64,
    high: f64,
    conditions: Vec<MonadicLiteral>,
) -> Property {
    let rules = if conditions.is_empty() {
        Vec::new()
    } else {
        vec![IntervalRule { conditions, low, high }]
    };
    Property {
        name,
        kind: PropertyType::Interval { low, high, rules },
    }
}

fn menu_property(
    name: TokenString,
    entries: Vec<String>,
    conditions: Vec<MonadicLiteral>,
) -> Property {
    let rules = if conditions.is_empty() {
        Vec::new()
    } else {
        vec![MenuRule { conditions, entries: entries.clone() }]
    };
    Property {
        name,
        kind: PropertyType::Menu { entries, rules },
    }
}

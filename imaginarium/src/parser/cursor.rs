//! The token cursor and the segment scanners built on it.
//!
//! All matching is predicate-driven over a saved/restored position; there is
//! no lookahead buffer. A segment failure normally asks the dispatcher to
//! backtrack and try the next pattern, but once a pattern crosses its cut
//! the same failure becomes a committed grammatical error carrying the
//! segment's own diagnostic.

use super::error::ParserError;
use crate::morphology::{self, Number};
use crate::ontology::{AdjectiveId, MonadicId, Ontology, VerbForm, VerbId};
use crate::token::{Token, TokenString};

/// Why a segment did not match.
pub(super) enum MatchFailure {
    /// Silent: the dispatcher should try the next pattern.
    Backtrack,
    /// The pattern had committed; this failure is the diagnostic.
    Committed(ParserError),
}

pub(super) type MatchResult<T> = Result<T, MatchFailure>;

/// Digit words accepted wherever an integer is.
const DIGIT_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

fn digit_word(word: &str) -> Option<u32> {
    DIGIT_WORDS
        .iter()
        .position(|&w| w == word)
        .map(|i| i as u32 + 1)
}

/// Words an NP head never contains; scanning a new noun stops here.
fn np_stop(word: &str) -> bool {
    morphology::is_copula(word)
        || matches!(
            word,
            "can" | "cannot"
                | "must"
                | "should"
                | "have"
                | "has"
                | "and"
                | "or"
                | "called"
                | "between"
                | "from"
                | "of"
                | "exist"
                | ","
                | "("
                | ")"
                | "\""
                | "-"
                | "'"
                | ":"
        )
}

/// Words that end a raw adjective run.
fn ap_stop(word: &str) -> bool {
    morphology::is_copula(word)
        || matches!(word, "and" | "or" | "," | "(" | ")" | "\"" | "'" | ":")
}

/// Words that begin a quantifier, and therefore end a verb run.
fn quantifier_start(word: &str) -> bool {
    digit_word(word).is_some()
        || matches!(
            word,
            "many" | "other" | "another" | "each" | "themselves" | "all" | "some" | "no" | "at"
                | "up" | "between"
        )
        || word.parse::<u32>().is_ok()
}

/// The determiner that opened a noun phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Determiner {
    /// `a` / `an`.
    Singular,
    /// `all`.
    All,
    /// A digit word or integer literal.
    Count(u32),
}

/// A quantifier segment, as in "can love *many other* cats". The `is_other`
/// flag is the sole signal distinguishing "other cats" (anti-reflexive)
/// from "many cats" (not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Quantifier {
    pub count: Option<u32>,
    pub is_other: bool,
    pub plural: bool,
}

/// One signed modifier scanned inside a noun phrase. Modifiers are always
/// concepts the ontology already knows.
#[derive(Debug, Clone, Copy)]
pub(super) struct NpModifier {
    pub positive: bool,
    pub concept: MonadicId,
}

/// The head of a noun phrase: a known monadic concept, or a fresh name.
#[derive(Debug, Clone)]
pub(super) enum NpHead {
    Known(MonadicId),
    New(TokenString),
}

/// A scanned noun phrase.
#[derive(Debug, Clone)]
pub(super) struct NounPhrase {
    pub determiner: Option<Determiner>,
    pub modifiers: Vec<NpModifier>,
    pub head: NpHead,
    /// The head's surface form, for diagnostics and new-noun creation.
    pub head_text: TokenString,
    /// Number evidence from the trie (the matched form was plural) when the
    /// determiner is silent on it.
    trie_plural: Option<bool>,
    pub relative_frequency: Option<f32>,
}

impl NounPhrase {
    /// Explicit count, from a numeric determiner.
    pub fn explicit_count(&self) -> Option<u32> {
        match self.determiner {
            Some(Determiner::Count(n)) => Some(n),
            _ => None,
        }
    }

    /// Grammatical number: determiner first, then the trie's annotation of
    /// the matched form, then morphology's guess. `None` when unknown, to be
    /// resolved by a feature check against the other end of the sentence.
    pub fn number(&self) -> Option<Number> {
        match self.determiner {
            Some(Determiner::Singular) => return Some(Number::Singular),
            Some(Determiner::All) | Some(Determiner::Count(_)) => return Some(Number::Plural),
            None => {}
        }
        match self.trie_plural {
            Some(true) => Some(Number::Plural),
            Some(false) => Some(Number::Singular),
            None => {
                if morphology::noun_appears_plural(&self.head_text) {
                    Some(Number::Plural)
                } else {
                    None
                }
            }
        }
    }

    pub fn is_modified(&self) -> bool {
        !self.modifiers.is_empty()
    }

    /// Surface text of the whole phrase, for messages.
    pub fn text(&self) -> TokenString {
        self.head_text.clone()
    }
}

/// The adjective in an adjective phrase: known, or a fresh name.
#[derive(Debug, Clone)]
pub(super) enum ApRef {
    Known(AdjectiveId),
    New(TokenString),
}

/// A scanned adjective phrase: optional negation, one adjective, optional
/// relative frequency.
#[derive(Debug, Clone)]
pub(super) struct AdjectivePhrase {
    pub negated: bool,
    pub adjective: ApRef,
    pub text: TokenString,
    pub frequency: Option<f32>,
}

/// The verb in a verb segment: known (with the conjugation its surface form
/// was stored under), or a fresh name.
#[derive(Debug, Clone)]
pub(super) enum VerbRef {
    Known(VerbId, VerbForm),
    New(TokenString),
}

/// A scanned verb segment.
#[derive(Debug, Clone)]
pub(super) struct VerbPhrase {
    pub verb: VerbRef,
    pub text: TokenString,
}

impl VerbPhrase {
    /// The conjugation of the surface form, guessed by morphology for new
    /// verbs.
    pub fn form(&self) -> VerbForm {
        match &self.verb {
            VerbRef::Known(_, form) => *form,
            VerbRef::New(text) => match text.first() {
                Some(first) if first.as_str().ends_with("ing") => VerbForm::Gerund,
                Some(first)
                    if first.as_str().ends_with('s') && !first.as_str().ends_with("ss") =>
                {
                    VerbForm::ThirdPerson
                }
                _ => VerbForm::Base,
            },
        }
    }
}

/// Which conjunction joined a scanned list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Conjunction {
    And,
    Or,
}

/// A monotonic index over one statement's tokens, with explicit
/// save/restore and the cut flag.
pub(super) struct Cursor<'a> {
    sentence: &'a str,
    tokens: &'a [Token],
    strings: &'a [String],
    pos: usize,
    pattern: &'static str,
    committed: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(
        sentence: &'a str,
        tokens: &'a [Token],
        strings: &'a [String],
        pattern: &'static str,
    ) -> Self {
        Cursor {
            sentence,
            tokens,
            strings,
            pos: 0,
            pattern,
            committed: false,
        }
    }

    pub fn save(&self) -> usize {
        self.pos
    }

    pub fn restore(&mut self, saved: usize) {
        self.pos = saved;
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Crossing the cut: from here on, failures are diagnostics rather than
    /// backtracks.
    pub fn cut(&mut self) {
        self.committed = true;
    }

    /// Builds the failure appropriate to the cursor's state.
    pub fn fail(&self, expected: impl Into<String>) -> MatchFailure {
        if self.committed {
            let found = if self.at_end() {
                "end of sentence".to_owned()
            } else {
                self.tokens[self.pos..]
                    .iter()
                    .map(Token::as_str)
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            MatchFailure::Committed(ParserError::Grammatical {
                sentence: self.sentence.to_owned(),
                pattern: self.pattern,
                expected: expected.into(),
                found,
            })
        } else {
            MatchFailure::Backtrack
        }
    }

    /// The statement must be fully consumed for a pattern to accept it.
    pub fn expect_end(&self) -> MatchResult<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.fail("end of sentence"))
        }
    }

    // --- Closed-class segments ---

    /// Matches one literal word.
    pub fn literal(&mut self, word: &str) -> MatchResult<()> {
        match self.peek() {
            Some(token) if token.as_str() == word => {
                self.advance();
                Ok(())
            }
            _ => Err(self.fail(format!("'{}'", word))),
        }
    }

    /// Matches a run of literal words.
    pub fn literals(&mut self, words: &[&str]) -> MatchResult<()> {
        let saved = self.save();
        for word in words {
            if let Err(e) = self.literal(word) {
                self.restore(saved);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Consumes one literal word if present.
    pub fn opt_literal(&mut self, word: &str) -> bool {
        matches!(self.peek(), Some(token) if token.as_str() == word) && {
            self.advance();
            true
        }
    }

    /// Matches an unsigned integer, written in digits or as a digit word.
    pub fn integer(&mut self) -> MatchResult<u32> {
        match self.peek() {
            Some(token) => {
                if let Some(n) = token.as_integer().or_else(|| digit_word(token.as_str())) {
                    self.advance();
                    Ok(n)
                } else {
                    Err(self.fail("a number"))
                }
            }
            None => Err(self.fail("a number")),
        }
    }

    /// Matches a floating point literal (integers qualify).
    pub fn float(&mut self) -> MatchResult<f64> {
        match self.peek() {
            Some(token) => {
                if let Some(x) = token.as_float() {
                    self.advance();
                    Ok(x)
                } else {
                    Err(self.fail("a number"))
                }
            }
            None => Err(self.fail("a number")),
        }
    }

    /// Matches a double-quoted span and returns its raw text.
    pub fn quoted_text(&mut self) -> MatchResult<String> {
        match self.peek() {
            Some(token) if token.as_str() == "\"" => {
                let index = self.tokens[..self.pos]
                    .iter()
                    .filter(|t| t.as_str() == "\"")
                    .count();
                self.advance();
                match self.strings.get(index) {
                    Some(s) => Ok(s.clone()),
                    None => Err(self.fail("quoted text")),
                }
            }
            _ => Err(self.fail("quoted text")),
        }
    }

    /// Consumes everything to the end of the statement as free text.
    pub fn rest_as_tokens(&mut self) -> TokenString {
        let rest: TokenString = self.tokens[self.pos..].iter().cloned().collect();
        self.pos = self.tokens.len();
        rest
    }

    /// Matches a quantifier: an optional "other"/"another", and a count,
    /// "many", or nothing more.
    pub fn quantifier(&mut self) -> MatchResult<Quantifier> {
        let saved = self.save();
        let mut is_other = false;
        let mut count = None;
        let mut plural = true;
        if self.opt_literal("another") {
            is_other = true;
            count = Some(1);
            plural = false;
        } else {
            if self.opt_literal("many") {
                if self.opt_literal("other") {
                    is_other = true;
                }
            } else if let Ok(n) = self.integer() {
                count = Some(n);
                plural = n != 1;
                if self.opt_literal("other") {
                    is_other = true;
                }
            } else if self.opt_literal("other") {
                is_other = true;
            } else {
                self.restore(saved);
                return Err(self.fail("a quantifier"));
            }
        }
        Ok(Quantifier { count, is_other, plural })
    }

    // --- Open-class segments ---

    /// Scans an optional negation prefix: `not`, `non`, or `non-`.
    fn negation(&mut self) -> bool {
        if self.opt_literal("not") {
            return true;
        }
        if self.opt_literal("non") {
            self.opt_literal("-");
            return true;
        }
        false
    }

    /// Scans an optional trailing relative frequency: `( number )`.
    fn relative_frequency(&mut self) -> Option<f32> {
        let saved = self.save();
        if !self.opt_literal("(") {
            return None;
        }
        let value = match self.float() {
            Ok(x) => x as f32,
            Err(_) => {
                self.restore(saved);
                return None;
            }
        };
        if !self.opt_literal(")") {
            self.restore(saved);
            return None;
        }
        Some(value)
    }

    /// Scans a noun phrase: optional determiner, a run of known monadic
    /// concepts (the last of which becomes the head, the rest modifiers),
    /// or a raw token run as a fresh head, and an optional relative
    /// frequency. `in_list` suppresses comma consumption between modifiers,
    /// since the commas then belong to the enclosing list.
    pub fn noun_phrase(&mut self, ontology: &Ontology, in_list: bool) -> MatchResult<NounPhrase> {
        let saved = self.save();
        let determiner = self.determiner();

        let mut items: Vec<(bool, MonadicId, bool)> = Vec::new();
        loop {
            let item_start = self.save();
            let negated = self.negation();
            match ontology.monadic_trie().longest_match(&self.tokens[self.pos..]) {
                Some(found) => {
                    self.pos += found.length;
                    items.push((!negated, *found.value, found.is_plural));
                    if !in_list && self.peek().is_some_and(|t| t.as_str() == ",") {
                        let comma = self.save();
                        self.advance();
                        // Only swallow the comma if another concept follows.
                        if ontology
                            .monadic_trie()
                            .longest_match(&self.tokens[self.pos..])
                            .is_none()
                        {
                            self.restore(comma);
                            break;
                        }
                    }
                }
                None => {
                    self.restore(item_start);
                    break;
                }
            }
        }

        // A raw run introduces a new head; otherwise the last known concept
        // is the head.
        let raw_start = self.save();
        let mut raw = TokenString::new();
        while let Some(token) = self.peek() {
            if np_stop(token.as_str()) || token.is_punctuation() {
                break;
            }
            raw.push(token.clone());
            self.advance();
        }

        let phrase = if raw.is_empty() {
            self.restore(raw_start);
            match items.pop() {
                Some((positive, head, trie_plural)) => {
                    if !positive {
                        // A negated head makes no sense; give the tokens back.
                        self.restore(saved);
                        return Err(self.fail("a noun"));
                    }
                    let head_text = match head {
                        MonadicId::Noun(id) => {
                            if trie_plural {
                                ontology.noun(id).plural.clone()
                            } else {
                                ontology.noun(id).singular.clone()
                            }
                        }
                        MonadicId::Adjective(id) => ontology.adjective(id).name.clone(),
                    };
                    NounPhrase {
                        determiner,
                        modifiers: items
                            .iter()
                            .map(|&(positive, concept, _)| NpModifier { positive, concept })
                            .collect(),
                        head: NpHead::Known(head),
                        head_text,
                        trie_plural: Some(trie_plural),
                        relative_frequency: None,
                    }
                }
                None => {
                    self.restore(saved);
                    return Err(self.fail("a noun"));
                }
            }
        } else {
            NounPhrase {
                determiner,
                modifiers: items
                    .iter()
                    .map(|&(positive, concept, _)| NpModifier { positive, concept })
                    .collect(),
                head: NpHead::New(raw.clone()),
                head_text: raw,
                trie_plural: None,
                relative_frequency: None,
            }
        };

        let mut phrase = phrase;
        phrase.relative_frequency = self.relative_frequency();
        Ok(phrase)
    }

    fn determiner(&mut self) -> Option<Determiner> {
        match self.peek().map(Token::as_str) {
            Some("a") | Some("an") => {
                self.advance();
                Some(Determiner::Singular)
            }
            Some("all") => {
                self.advance();
                Some(Determiner::All)
            }
            Some(word) => {
                if let Some(n) = word.parse::<u32>().ok().or_else(|| digit_word(word)) {
                    // A bare number heading an NP is a count determiner.
                    self.advance();
                    Some(Determiner::Count(n))
                } else {
                    None
                }
            }
            None => None,
        }
    }

    /// Scans an adjective phrase: optional negation, one adjective (known by
    /// trie lookup, or a raw run introducing a new one), optional frequency.
    pub fn adjective_phrase(&mut self, ontology: &Ontology) -> MatchResult<AdjectivePhrase> {
        let saved = self.save();
        let negated = self.negation();
        match ontology.monadic_trie().longest_match(&self.tokens[self.pos..]) {
            Some(found) => {
                if let MonadicId::Adjective(id) = *found.value {
                    self.pos += found.length;
                    let text = ontology.adjective(id).name.clone();
                    return Ok(AdjectivePhrase {
                        negated,
                        adjective: ApRef::Known(id),
                        text,
                        frequency: self.relative_frequency(),
                    });
                }
                // A known noun here is not an adjective; let the raw scan
                // below decide whether anything adjective-shaped remains.
            }
            None => {}
        }
        let mut raw = TokenString::new();
        while let Some(token) = self.peek() {
            if ap_stop(token.as_str()) || token.is_punctuation() {
                break;
            }
            raw.push(token.clone());
            self.advance();
        }
        if raw.is_empty() {
            self.restore(saved);
            return Err(self.fail("an adjective"));
        }
        Ok(AdjectivePhrase {
            negated,
            adjective: ApRef::New(raw.clone()),
            text: raw,
            frequency: self.relative_frequency(),
        })
    }

    /// Scans a verb segment: a token run free of copulas, quantifier starts
    /// and known monadic concepts, resolved through the verb trie under any
    /// inflection. An unresolved run introduces a new verb.
    pub fn verb(&mut self, ontology: &Ontology) -> MatchResult<VerbPhrase> {
        let mut length = 0;
        while let Some(token) = self.tokens.get(self.pos + length) {
            let word = token.as_str();
            if morphology::is_copula(word)
                || quantifier_start(word)
                || token.is_punctuation()
                || matches!(word, "themselves" | "each" | "and" | "or" | "by")
            {
                break;
            }
            if ontology
                .monadic_trie()
                .longest_match(&self.tokens[self.pos + length..])
                .is_some()
            {
                break;
            }
            length += 1;
        }
        if length == 0 {
            return Err(self.fail("a verb"));
        }
        let run = &self.tokens[self.pos..self.pos + length];
        if let Some(found) = ontology.verb_trie().longest_match(run) {
            let &(id, form) = found.value;
            self.pos += found.length;
            let text: TokenString = run[..found.length].iter().cloned().collect();
            return Ok(VerbPhrase { verb: VerbRef::Known(id, form), text });
        }
        self.pos += length;
        let text: TokenString = run.iter().cloned().collect();
        Ok(VerbPhrase { verb: VerbRef::New(text.clone()), text })
    }

    /// Scans a comma/conjunction-separated list of noun phrases.
    pub fn noun_phrase_list(
        &mut self,
        ontology: &Ontology,
    ) -> MatchResult<(Vec<NounPhrase>, Conjunction)> {
        self.list(|cursor| cursor.noun_phrase(ontology, true))
    }

    /// Scans a comma/conjunction-separated list of adjective phrases.
    pub fn adjective_phrase_list(
        &mut self,
        ontology: &Ontology,
    ) -> MatchResult<(Vec<AdjectivePhrase>, Conjunction)> {
        self.list(|cursor| cursor.adjective_phrase(ontology))
    }

    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> MatchResult<T>,
    ) -> MatchResult<(Vec<T>, Conjunction)> {
        let mut items = vec![item(self)?];
        let mut conjunction = Conjunction::And;
        loop {
            let saved = self.save();
            let had_comma = self.opt_literal(",");
            if self.opt_literal("and") {
                conjunction = Conjunction::And;
            } else if self.opt_literal("or") {
                conjunction = Conjunction::Or;
            } else if !had_comma {
                break;
            }
            match item(self) {
                Ok(next) => items.push(next),
                Err(MatchFailure::Backtrack) => {
                    self.restore(saved);
                    break;
                }
                Err(committed) => return Err(committed),
            }
        }
        Ok((items, conjunction))
    }
}

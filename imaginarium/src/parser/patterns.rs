//! The standard sentence patterns.
//!
//! Each pattern is a matcher over a fresh cursor; the first one to accept
//! the whole statement wins, in the order they are declared here. Matchers
//! produce a [`Statement`], which the executor then applies to the
//! ontology. A matcher that crosses its cut reports failures as committed
//! grammatical errors instead of backtracking.

use super::cursor::{
    AdjectivePhrase, Conjunction, Cursor, Determiner, MatchResult, NounPhrase, NpHead, VerbPhrase,
};
use crate::morphology::Number;
use crate::ontology::Ontology;
use crate::token::TokenString;

/// Which side of a verb a cardinality bound constrains: `Object` counts
/// objects per subject, `Subject` counts subjects per object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BoundSide {
    Subject,
    Object,
}

/// A parsed statement, ready to be executed against the ontology.
#[derive(Debug)]
pub(super) enum Statement {
    DeclareKind {
        subs: Vec<NounPhrase>,
        superkind: NounPhrase,
    },
    DeclareProperName {
        name: TokenString,
        kind: NounPhrase,
    },
    SetPlural {
        noun: NounPhrase,
        form: TokenString,
    },
    SetSingular {
        noun: NounPhrase,
        form: TokenString,
    },
    Alternatives {
        subject: NounPhrase,
        alternatives: Vec<AdjectivePhrase>,
        min: u32,
        max: u32,
        allow_pre_initialization: bool,
    },
    ImpliedAdjective {
        subject: NounPhrase,
        adjective: AdjectivePhrase,
    },
    IdentifiedAs {
        subject: NounPhrase,
        template: String,
    },
    DescribedAs {
        subject: NounPhrase,
        template: String,
    },
    DoNotMention {
        adjective: AdjectivePhrase,
    },
    DoNotPrint {
        subject: NounPhrase,
    },
    DeclarePart {
        subject: NounPhrase,
        count: Option<u32>,
        kind: NounPhrase,
        name: Option<TokenString>,
    },
    DeclareIntervalProperty {
        subject: NounPhrase,
        property: NounPhrase,
        low: f64,
        high: f64,
    },
    DeclareMenuProperty {
        subject: NounPhrase,
        property: NounPhrase,
        list: TokenString,
    },
    VerbBounds {
        subject: NounPhrase,
        verb: VerbPhrase,
        object: NounPhrase,
        side: BoundSide,
        lower: Option<u32>,
        upper: Option<u32>,
        is_other: bool,
    },
    VerbReflexive {
        subject: NounPhrase,
        verb: VerbPhrase,
        anti: bool,
    },
    VerbSymmetric {
        subject: NounPhrase,
        verb: VerbPhrase,
        anti: bool,
    },
    VerbDensity {
        verb: VerbPhrase,
        density: f32,
    },
    VerbMutualExclusion {
        left: VerbPhrase,
        right: VerbPhrase,
    },
    VerbImplies {
        sub: VerbPhrase,
        general: VerbPhrase,
    },
    VerbWayOf {
        sub: VerbPhrase,
        superspecies: VerbPhrase,
    },
    ShouldExist {
        subject: NounPhrase,
        should: bool,
        every_kind: bool,
    },
    Button {
        label: String,
        command: String,
    },
}

pub(super) struct Pattern {
    pub name: &'static str,
    pub matcher: fn(&mut Cursor, &Ontology) -> MatchResult<Statement>,
}

/// The pattern repertoire, tried first to last.
pub(super) const PATTERNS: &[Pattern] = &[
    Pattern { name: "pressing \"X\" means \"Y\"", matcher: pressing },
    Pattern { name: "the plural of N is F", matcher: plural_of },
    Pattern { name: "the singular of N is F", matcher: singular_of },
    Pattern { name: "every kind of N should exist", matcher: every_kind_should_exist },
    Pattern { name: "do not mention being A", matcher: do_not_mention },
    Pattern { name: "do not print N", matcher: do_not_print },
    Pattern { name: "N is a kind of N", matcher: kind_of_singular },
    Pattern { name: "Ns are kinds of N", matcher: kinds_of_plural },
    Pattern { name: "N is identified as \"T\"", matcher: identified_as },
    Pattern { name: "N is described as \"T\"", matcher: described_as },
    Pattern { name: "N is any K of As", matcher: alternatives_any },
    Pattern { name: "N is between K and L of As", matcher: alternatives_between },
    Pattern { name: "N can be at most K of As", matcher: alternatives_at_most },
    Pattern { name: "N can be V'ed by Q Ns", matcher: passive_verb_bounds },
    Pattern { name: "N must V themselves", matcher: reflexive },
    Pattern { name: "N can V each other", matcher: each_other },
    Pattern { name: "N can V up to K Ns", matcher: active_verb_bounds },
    Pattern { name: "N can V Q Ns", matcher: quantified_verb },
    Pattern { name: "N can be As", matcher: optional_alternatives },
    Pattern { name: "V'ing is rare", matcher: verb_density },
    Pattern { name: "V'ing and V'ing are mutually exclusive", matcher: verb_mutual_exclusion },
    Pattern { name: "V'ing implies V'ing", matcher: verb_implies },
    Pattern { name: "V'ing is a way of V'ing", matcher: verb_way_of },
    Pattern { name: "N has K Ns called their P", matcher: has_parts_or_properties },
    Pattern { name: "N should exist", matcher: should_exist },
    Pattern { name: "X is a N", matcher: proper_name },
    Pattern { name: "N is A, A, or A", matcher: required_alternatives },
    Pattern { name: "N is A", matcher: implied_adjective },
];

/// Matches `is`/`are` and enforces subject-verb number agreement, as far as
/// the subject's number is known.
fn copula(cursor: &mut Cursor, subject: &NounPhrase) -> MatchResult<()> {
    if cursor.opt_literal("is") {
        if subject.number() == Some(Number::Plural) {
            return Err(cursor.fail("a singular subject before 'is'"));
        }
        Ok(())
    } else if cursor.opt_literal("are") {
        if subject.number() == Some(Number::Singular) {
            return Err(cursor.fail("a plural subject before 'are'"));
        }
        Ok(())
    } else {
        Err(cursor.fail("'is' or 'are'"))
    }
}

fn unmodified(cursor: &Cursor, np: &NounPhrase) -> MatchResult<()> {
    if np.is_modified() {
        Err(cursor.fail("an unmodified noun"))
    } else {
        Ok(())
    }
}

/// The object of a kind-of statement must be explicitly singular.
fn singular_object(cursor: &Cursor, np: &NounPhrase) -> MatchResult<()> {
    if np.number() == Some(Number::Plural) {
        Err(cursor.fail("a singular kind name"))
    } else {
        Ok(())
    }
}

fn pressing(cursor: &mut Cursor, _ontology: &Ontology) -> MatchResult<Statement> {
    cursor.literal("pressing")?;
    cursor.cut();
    let label = cursor.quoted_text()?;
    cursor.literal("means")?;
    let command = cursor.quoted_text()?;
    cursor.expect_end()?;
    Ok(Statement::Button { label, command })
}

fn plural_of(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    cursor.literals(&["the", "plural", "of"])?;
    cursor.cut();
    let noun = cursor.noun_phrase(ontology, false)?;
    unmodified(cursor, &noun)?;
    cursor.literal("is")?;
    let form = cursor.rest_as_tokens();
    if form.is_empty() {
        return Err(cursor.fail("the plural form"));
    }
    Ok(Statement::SetPlural { noun, form })
}

fn singular_of(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    cursor.literals(&["the", "singular", "of"])?;
    cursor.cut();
    let noun = cursor.noun_phrase(ontology, false)?;
    unmodified(cursor, &noun)?;
    cursor.literal("is")?;
    let form = cursor.rest_as_tokens();
    if form.is_empty() {
        return Err(cursor.fail("the singular form"));
    }
    Ok(Statement::SetSingular { noun, form })
}

fn every_kind_should_exist(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    cursor.literals(&["every", "kind", "of"])?;
    cursor.cut();
    let subject = cursor.noun_phrase(ontology, false)?;
    cursor.literals(&["should", "exist"])?;
    cursor.expect_end()?;
    Ok(Statement::ShouldExist { subject, should: true, every_kind: true })
}

fn do_not_mention(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    cursor.literals(&["do", "not", "mention", "being"])?;
    cursor.cut();
    let adjective = cursor.adjective_phrase(ontology)?;
    cursor.expect_end()?;
    Ok(Statement::DoNotMention { adjective })
}

fn do_not_print(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    cursor.literals(&["do", "not", "print"])?;
    cursor.cut();
    let subject = cursor.noun_phrase(ontology, false)?;
    cursor.expect_end()?;
    Ok(Statement::DoNotPrint { subject })
}

fn kind_of_singular(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let sub = cursor.noun_phrase(ontology, false)?;
    cursor.literals(&["is", "a", "kind", "of"])?;
    cursor.cut();
    unmodified(cursor, &sub)?;
    if sub.number() == Some(Number::Plural) {
        return Err(cursor.fail("a singular subject before 'is a kind of'"));
    }
    let superkind = cursor.noun_phrase(ontology, false)?;
    singular_object(cursor, &superkind)?;
    unmodified(cursor, &superkind)?;
    cursor.expect_end()?;
    Ok(Statement::DeclareKind { subs: vec![sub], superkind })
}

fn kinds_of_plural(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let (subs, _) = cursor.noun_phrase_list(ontology)?;
    cursor.literals(&["are", "kinds", "of"])?;
    cursor.cut();
    for sub in &subs {
        unmodified(cursor, sub)?;
    }
    let superkind = cursor.noun_phrase(ontology, false)?;
    singular_object(cursor, &superkind)?;
    unmodified(cursor, &superkind)?;
    cursor.expect_end()?;
    Ok(Statement::DeclareKind { subs, superkind })
}

fn identified_as(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    copula(cursor, &subject)?;
    cursor.literals(&["identified", "as"])?;
    cursor.cut();
    let template = cursor.quoted_text()?;
    cursor.expect_end()?;
    Ok(Statement::IdentifiedAs { subject, template })
}

fn described_as(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    copula(cursor, &subject)?;
    cursor.literals(&["described", "as"])?;
    cursor.cut();
    let template = cursor.quoted_text()?;
    cursor.expect_end()?;
    Ok(Statement::DescribedAs { subject, template })
}

fn alternatives_any(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    copula(cursor, &subject)?;
    cursor.literal("any")?;
    let count = cursor.integer()?;
    cursor.literal("of")?;
    cursor.cut();
    unmodified(cursor, &subject)?;
    let (alternatives, _) = cursor.adjective_phrase_list(ontology)?;
    cursor.expect_end()?;
    Ok(Statement::Alternatives {
        subject,
        alternatives,
        min: count,
        max: count,
        allow_pre_initialization: false,
    })
}

fn alternatives_between(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    copula(cursor, &subject)?;
    cursor.literal("between")?;
    let min = cursor.integer()?;
    cursor.literal("and")?;
    let max = cursor.integer()?;
    cursor.literal("of")?;
    cursor.cut();
    unmodified(cursor, &subject)?;
    let (alternatives, _) = cursor.adjective_phrase_list(ontology)?;
    cursor.expect_end()?;
    Ok(Statement::Alternatives {
        subject,
        alternatives,
        min,
        max,
        allow_pre_initialization: false,
    })
}

fn alternatives_at_most(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    cursor.literals(&["can", "be", "at", "most"])?;
    let max = cursor.integer()?;
    cursor.literal("of")?;
    cursor.cut();
    unmodified(cursor, &subject)?;
    let (alternatives, _) = cursor.adjective_phrase_list(ontology)?;
    cursor.expect_end()?;
    Ok(Statement::Alternatives {
        subject,
        alternatives,
        min: 0,
        max,
        allow_pre_initialization: false,
    })
}

fn optional_alternatives(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    cursor.literals(&["can", "be"])?;
    let (alternatives, _) = cursor.adjective_phrase_list(ontology)?;
    cursor.expect_end()?;
    Ok(Statement::Alternatives {
        subject,
        alternatives,
        min: 0,
        max: 1,
        allow_pre_initialization: false,
    })
}

fn required_alternatives(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    copula(cursor, &subject)?;
    let (alternatives, conjunction) = cursor.adjective_phrase_list(ontology)?;
    cursor.expect_end()?;
    if alternatives.len() < 2 || conjunction != Conjunction::Or {
        return Err(cursor.fail("a list of alternative adjectives"));
    }
    Ok(Statement::Alternatives {
        subject,
        alternatives,
        min: 1,
        max: 1,
        allow_pre_initialization: true,
    })
}

fn implied_adjective(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    copula(cursor, &subject)?;
    cursor.opt_literal("always");
    let adjective = cursor.adjective_phrase(ontology)?;
    cursor.expect_end()?;
    Ok(Statement::ImpliedAdjective { subject, adjective })
}

fn proper_name(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    // A proper name has no determiner, no modifiers, and is not already a
    // monadic concept.
    if subject.determiner.is_some() || subject.is_modified() {
        return Err(cursor.fail("a proper name"));
    }
    let name = match &subject.head {
        NpHead::New(tokens) => tokens.clone(),
        NpHead::Known(_) => return Err(cursor.fail("a proper name")),
    };
    cursor.literal("is")?;
    let kind = cursor.noun_phrase(ontology, false)?;
    if kind.determiner != Some(Determiner::Singular) {
        return Err(cursor.fail("'a' before the kind"));
    }
    cursor.expect_end()?;
    Ok(Statement::DeclareProperName { name, kind })
}

fn reflexive(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    let anti = if cursor.opt_literal("cannot") {
        true
    } else if cursor.opt_literal("must") {
        false
    } else {
        return Err(cursor.fail("'cannot' or 'must'"));
    };
    let verb = cursor.verb(ontology)?;
    base_form(cursor, &verb)?;
    cursor.literal("themselves")?;
    cursor.expect_end()?;
    Ok(Statement::VerbReflexive { subject, verb, anti })
}

fn each_other(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    let anti = if cursor.opt_literal("cannot") {
        true
    } else if cursor.opt_literal("can") || cursor.opt_literal("must") {
        false
    } else {
        return Err(cursor.fail("'can', 'cannot' or 'must'"));
    };
    let verb = cursor.verb(ontology)?;
    base_form(cursor, &verb)?;
    cursor.literals(&["each", "other"])?;
    cursor.expect_end()?;
    Ok(Statement::VerbSymmetric { subject, verb, anti })
}

fn active_verb_bounds(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    if !cursor.opt_literal("must") && !cursor.opt_literal("can") {
        return Err(cursor.fail("'can' or 'must'"));
    }
    let verb = cursor.verb(ontology)?;
    base_form(cursor, &verb)?;
    let (lower, upper) = verb_bound_keywords(cursor)?;
    cursor.cut();
    let object = cursor.noun_phrase(ontology, false)?;
    cursor.expect_end()?;
    Ok(Statement::VerbBounds {
        subject,
        verb,
        object,
        side: BoundSide::Object,
        lower,
        upper,
        is_other: false,
    })
}

fn passive_verb_bounds(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    let (must, forbidden) = if cursor.opt_literal("must") {
        (true, false)
    } else if cursor.opt_literal("can") {
        (false, false)
    } else if cursor.opt_literal("cannot") {
        (false, true)
    } else {
        return Err(cursor.fail("'can', 'cannot' or 'must'"));
    };
    cursor.literal("be")?;
    let verb = cursor.verb(ontology)?;
    passive_form(cursor, &verb)?;
    cursor.literal("by")?;
    cursor.cut();
    let (lower, upper) = if forbidden {
        (None, Some(0))
    } else {
        match verb_bound_keywords(cursor) {
            Ok(bounds) => bounds,
            // A plain passive shape: "cats can be chased by dogs", or a
            // bare requirement: "cats must be fed by people".
            Err(_) if !must => (None, None),
            Err(_) => (Some(1), None),
        }
    };
    let object = cursor.noun_phrase(ontology, false)?;
    cursor.expect_end()?;
    Ok(Statement::VerbBounds {
        subject,
        verb,
        object,
        side: BoundSide::Subject,
        lower,
        upper,
        is_other: false,
    })
}

/// The `up to K` / `at most K` / `at least K` / `between K and L` bound
/// keywords shared by the active and passive forms.
fn verb_bound_keywords(cursor: &mut Cursor) -> MatchResult<(Option<u32>, Option<u32>)> {
    let saved = cursor.save();
    if cursor.literals(&["up", "to"]).is_ok() || cursor.literals(&["at", "most"]).is_ok() {
        let n = cursor.integer()?;
        return Ok((None, Some(n)));
    }
    if cursor.literals(&["at", "least"]).is_ok() {
        let n = cursor.integer()?;
        return Ok((Some(n), None));
    }
    if cursor.literal("between").is_ok() {
        let low = cursor.integer()?;
        cursor.literal("and")?;
        let high = cursor.integer()?;
        return Ok((Some(low), Some(high)));
    }
    cursor.restore(saved);
    Err(cursor.fail("a bound like 'at least' or 'up to'"))
}

/// A verb after `can`/`must` has to be in its base form.
fn base_form(cursor: &Cursor, verb: &VerbPhrase) -> MatchResult<()> {
    match verb.form() {
        crate::ontology::VerbForm::Base => Ok(()),
        _ => Err(cursor.fail("the verb in its base form")),
    }
}

/// A verb used as the subject of an algebraic statement has to be a gerund.
fn gerund_form(cursor: &Cursor, verb: &VerbPhrase) -> MatchResult<()> {
    match verb.form() {
        crate::ontology::VerbForm::Gerund => Ok(()),
        _ => Err(cursor.fail("the verb as a gerund")),
    }
}

/// A verb after `be` must not be an active conjugation. A fresh surface
/// form is allowed through; the executor inverts it as a participle.
fn passive_form(cursor: &Cursor, verb: &VerbPhrase) -> MatchResult<()> {
    match verb.form() {
        crate::ontology::VerbForm::Gerund | crate::ontology::VerbForm::ThirdPerson => {
            Err(cursor.fail("the verb as a passive participle"))
        }
        _ => Ok(()),
    }
}

fn quantified_verb(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    let must = if cursor.opt_literal("must") {
        true
    } else if cursor.opt_literal("can") {
        false
    } else {
        return Err(cursor.fail("'can' or 'must'"));
    };
    let verb = cursor.verb(ontology)?;
    base_form(cursor, &verb)?;
    let quantifier = cursor.quantifier()?;
    let object = cursor.noun_phrase(ontology, false)?;
    cursor.expect_end()?;
    // Quantifier agreement: a singular quantifier wants a singular object.
    if let Some(number) = object.number() {
        let plural = number == Number::Plural;
        if quantifier.plural != plural {
            return Err(cursor.fail("an object agreeing with its quantifier"));
        }
    }
    let (lower, upper) = match (must, quantifier.count) {
        (true, Some(n)) => (Some(n), Some(n)),
        (false, Some(n)) => (None, Some(n)),
        (true, None) => (Some(1), None),
        (false, None) => (None, None),
    };
    Ok(Statement::VerbBounds {
        subject,
        verb,
        object,
        side: BoundSide::Object,
        lower,
        upper,
        is_other: quantifier.is_other,
    })
}

fn verb_density(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let verb = cursor.verb(ontology)?;
    gerund_form(cursor, &verb)?;
    cursor.literal("is")?;
    let density = if cursor.opt_literal("rare") {
        0.05
    } else if cursor.opt_literal("common") {
        0.95
    } else {
        return Err(cursor.fail("'rare' or 'common'"));
    };
    cursor.expect_end()?;
    Ok(Statement::VerbDensity { verb, density })
}

fn verb_mutual_exclusion(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let left = cursor.verb(ontology)?;
    gerund_form(cursor, &left)?;
    cursor.literal("and")?;
    let right = cursor.verb(ontology)?;
    gerund_form(cursor, &right)?;
    cursor.literals(&["are", "mutually", "exclusive"])?;
    cursor.expect_end()?;
    Ok(Statement::VerbMutualExclusion { left, right })
}

fn verb_implies(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let sub = cursor.verb(ontology)?;
    gerund_form(cursor, &sub)?;
    cursor.literal("implies")?;
    cursor.cut();
    let general = cursor.verb(ontology)?;
    gerund_form(cursor, &general)?;
    cursor.expect_end()?;
    Ok(Statement::VerbImplies { sub, general })
}

fn verb_way_of(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let sub = cursor.verb(ontology)?;
    gerund_form(cursor, &sub)?;
    cursor.literals(&["is", "a", "way", "of"])?;
    cursor.cut();
    let superspecies = cursor.verb(ontology)?;
    gerund_form(cursor, &superspecies)?;
    cursor.expect_end()?;
    Ok(Statement::VerbWayOf { sub, superspecies })
}

fn has_parts_or_properties(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    if !cursor.opt_literal("has") && !cursor.opt_literal("have") {
        return Err(cursor.fail("'has' or 'have'"));
    }
    let saved = cursor.save();
    let count = cursor.integer().ok();
    let object = match cursor.noun_phrase(ontology, false) {
        Ok(np) => np,
        Err(e) => {
            cursor.restore(saved);
            return Err(e);
        }
    };
    if cursor.literals(&["called", "their"]).is_ok()
        || cursor.literals(&["called", "its"]).is_ok()
    {
        cursor.cut();
        let name = cursor.rest_as_tokens();
        if name.is_empty() {
            return Err(cursor.fail("a part name"));
        }
        return Ok(Statement::DeclarePart { subject, count, kind: object, name: Some(name) });
    }
    if cursor.literal("between").is_ok() {
        cursor.cut();
        let low = cursor.float()?;
        cursor.literal("and")?;
        let high = cursor.float()?;
        cursor.expect_end()?;
        return Ok(Statement::DeclareIntervalProperty { subject, property: object, low, high });
    }
    if cursor.literal("from").is_ok() {
        cursor.cut();
        let list = cursor.rest_as_tokens();
        if list.is_empty() {
            return Err(cursor.fail("a list name"));
        }
        return Ok(Statement::DeclareMenuProperty { subject, property: object, list });
    }
    cursor.expect_end()?;
    Ok(Statement::DeclarePart { subject, count, kind: object, name: None })
}

fn should_exist(cursor: &mut Cursor, ontology: &Ontology) -> MatchResult<Statement> {
    let subject = cursor.noun_phrase(ontology, false)?;
    cursor.literal("should")?;
    let should = !cursor.opt_literal("not");
    cursor.literal("exist")?;
    cursor.expect_end()?;
    Ok(Statement::ShouldExist { subject, should, every_kind: false })
}

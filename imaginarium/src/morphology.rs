//! English inflection: singular/plural nouns, verb conjugation, gerunds and
//! passive participles.
//!
//! Regular forms come from ordered rewrite-rule tables; irregular forms from
//! a dictionary consulted first. Multi-token phrases inflect their head word
//! (the last token for nouns, the first for verbs), so "polar bear" and
//! "work for" both come out right.

use crate::token::{Token, TokenString};
use thiserror::Error;

/// Grammatical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Number {
    Singular,
    Plural,
}

/// The error type for morphology.
#[derive(Debug, Error)]
pub enum MorphologyError {
    /// A one-word noun that none of the rewrite rules apply to.
    #[error("don't know how to inflect '{0}'")]
    CannotInflect(Token),
}

/// Irregular singular/plural noun pairs, consulted before the regular rules
/// in both directions.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("die", "dice"),
    ("ox", "oxen"),
    ("sheep", "sheep"),
    ("fish", "fish"),
    ("deer", "deer"),
    ("hair", "hair"),
    ("species", "species"),
    ("offspring", "offspring"),
];

/// Irregular base/passive-participle verb pairs.
const IRREGULAR_PARTICIPLES: &[(&str, &str)] = &[
    ("eat", "eaten"),
    ("write", "written"),
    ("take", "taken"),
    ("give", "given"),
    ("know", "known"),
    ("see", "seen"),
    ("make", "made"),
    ("have", "had"),
    ("hold", "held"),
    ("wear", "worn"),
    ("teach", "taught"),
    ("catch", "caught"),
    ("buy", "bought"),
    ("sell", "sold"),
    ("find", "found"),
];

/// Copular verb forms. A verb phrase never contains one of these unless it is
/// itself built on the copula ("is married to").
pub const COPULAS: &[&str] = &["is", "are", "be", "being", "been", "was", "were"];

/// The closed list of prepositions that may trail a verb phrase.
pub const PREPOSITIONS: &[&str] = &[
    "to", "of", "for", "with", "by", "on", "in", "at", "from", "about", "over", "under",
];

/// Returns `true` if `word` is a copular form.
pub fn is_copula(word: &str) -> bool {
    COPULAS.contains(&word)
}

/// Returns `true` if `word` is in the closed preposition list.
pub fn is_preposition(word: &str) -> bool {
    PREPOSITIONS.contains(&word)
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Pluralizes a single word using the irregular dictionary, then the first
/// matching rewrite rule.
fn pluralize_word(word: &str) -> String {
    for (sing, plur) in IRREGULAR_NOUNS {
        if *sing == word {
            return (*plur).to_owned();
        }
    }
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        format!("{}es", word)
    } else if n >= 2 && chars[n - 1] == 'y' && !is_vowel(chars[n - 2]) {
        format!("{}ies", &word[..word.len() - 1])
    } else if word.ends_with("fe") {
        format!("{}ves", &word[..word.len() - 2])
    } else if word.ends_with('f') && !word.ends_with("ff") {
        format!("{}ves", &word[..word.len() - 1])
    } else {
        format!("{}s", word)
    }
}

/// Singularizes a single word, failing when no rule applies.
fn singularize_word(word: &str) -> Result<String, MorphologyError> {
    for (sing, plur) in IRREGULAR_NOUNS {
        if *plur == word {
            return Ok((*sing).to_owned());
        }
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return Ok(format!("{}y", stem));
        }
    }
    if let Some(stem) = word.strip_suffix("ves") {
        if !stem.is_empty() {
            return Ok(format!("{}f", stem));
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if stem.ends_with('s')
            || stem.ends_with('x')
            || stem.ends_with('z')
            || stem.ends_with("ch")
            || stem.ends_with("sh")
        {
            return Ok(stem.to_owned());
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if !stem.is_empty() && !stem.ends_with('s') {
            return Ok(stem.to_owned());
        }
    }
    Err(MorphologyError::CannotInflect(Token::new(word)))
}

/// The plural of a noun phrase: the head (last) word is pluralized.
pub fn plural_of_noun(singular: &TokenString) -> Result<TokenString, MorphologyError> {
    let last = singular
        .last()
        .ok_or_else(|| MorphologyError::CannotInflect(Token::new("")))?;
    let plural = pluralize_word(last.as_str());
    Ok(singular.with_replaced(singular.len() - 1, Token::new(&plural)))
}

/// The singular of a noun phrase: the head (last) word is singularized.
pub fn singular_of_noun(plural: &TokenString) -> Result<TokenString, MorphologyError> {
    let last = plural
        .last()
        .ok_or_else(|| MorphologyError::CannotInflect(Token::new("")))?;
    let singular = singularize_word(last.as_str())?;
    Ok(plural.with_replaced(plural.len() - 1, Token::new(&singular)))
}

/// Guesses whether a noun phrase's surface form is plural. This is only a
/// guess; the parser prefers determiners and trie annotations when it has
/// them.
pub fn noun_appears_plural(tokens: &TokenString) -> bool {
    let Some(last) = tokens.last() else {
        return false;
    };
    let word = last.as_str();
    for (_, plur) in IRREGULAR_NOUNS {
        if *plur == word {
            return true;
        }
    }
    for (sing, _) in IRREGULAR_NOUNS {
        if *sing == word {
            return false;
        }
    }
    word.ends_with('s') && !word.ends_with("ss")
}

/// The third-person singular of a verb phrase ("love" -> "loves",
/// "work for" -> "works for"). If the phrase contains a copula it is the
/// copula that inflects; otherwise the head (first) word takes the noun
/// plural rules, which coincide with verb -s inflection.
pub fn singular_of_verb(plural: &TokenString) -> Result<TokenString, MorphologyError> {
    if let Some(i) = copula_position(plural) {
        return Ok(plural.with_replaced(i, Token::new("is")));
    }
    let first = plural
        .first()
        .ok_or_else(|| MorphologyError::CannotInflect(Token::new("")))?;
    let inflected = pluralize_word(first.as_str());
    Ok(plural.with_replaced(0, Token::new(&inflected)))
}

/// The base (plural) form of a verb phrase ("loves" -> "love").
pub fn plural_of_verb(singular: &TokenString) -> Result<TokenString, MorphologyError> {
    if let Some(i) = copula_position(singular) {
        return Ok(singular.with_replaced(i, Token::new("are")));
    }
    let first = singular
        .first()
        .ok_or_else(|| MorphologyError::CannotInflect(Token::new("")))?;
    let base = singularize_word(first.as_str())?;
    Ok(singular.with_replaced(0, Token::new(&base)))
}

fn copula_position(phrase: &TokenString) -> Option<usize> {
    phrase
        .tokens()
        .iter()
        .position(|t| is_copula(t.as_str()))
}

/// All plausible gerund surface forms of a base verb phrase. Every one of
/// them is stored in the verb trie, so an author writing "hopping" or
/// "hoping" hits the same verb either way.
pub fn gerunds_of_verb(base: &TokenString) -> Vec<TokenString> {
    let Some(first) = base.first() else {
        return Vec::new();
    };
    let word = first.as_str();
    let mut stems = Vec::new();
    stems.push(format!("{}ing", word));
    if let Some(stem) = word.strip_suffix('e') {
        if !stem.is_empty() {
            stems.push(format!("{}ing", stem));
        }
    }
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if n >= 2 && !is_vowel(chars[n - 1]) && is_vowel(chars[n - 2]) && chars[n - 1] != 'w'
        && chars[n - 1] != 'x' && chars[n - 1] != 'y'
    {
        stems.push(format!("{}{}ing", word, chars[n - 1]));
    }
    stems.sort();
    stems.dedup();
    stems
        .into_iter()
        .map(|stem| base.with_replaced(0, Token::new(&stem)))
        .collect()
}

/// The passive participle of a base verb phrase ("love" -> "loved",
/// "eat" -> "eaten").
pub fn passive_participle(base: &TokenString) -> Result<TokenString, MorphologyError> {
    let first = base
        .first()
        .ok_or_else(|| MorphologyError::CannotInflect(Token::new("")))?;
    let word = first.as_str();
    let participle = 'found: {
        for (b, p) in IRREGULAR_PARTICIPLES {
            if *b == word {
                break 'found (*p).to_owned();
            }
        }
        let chars: Vec<char> = word.chars().collect();
        let n = chars.len();
        if word.ends_with('e') {
            format!("{}d", word)
        } else if n >= 2 && chars[n - 1] == 'y' && !is_vowel(chars[n - 2]) {
            format!("{}ied", &word[..word.len() - 1])
        } else if n >= 2
            && !is_vowel(chars[n - 1])
            && is_vowel(chars[n - 2])
            && (n < 3 || !is_vowel(chars[n - 3]))
            && chars[n - 1] != 'w'
            && chars[n - 1] != 'x'
            && chars[n - 1] != 'y'
        {
            format!("{}{}ed", word, chars[n - 1])
        } else {
            format!("{}ed", word)
        }
    };
    Ok(base.with_replaced(0, Token::new(&participle)))
}

/// Inverts a gerund back to candidate base forms, best guess first.
/// "getting married to" yields "get married to" (the doubled consonant is
/// stripped); "loving" yields "love" then "lov" (a final e is restored when
/// the stem ends consonant-vowel-consonant).
pub fn base_forms_of_gerund(gerund: &TokenString) -> Vec<TokenString> {
    let Some(first) = gerund.first() else {
        return Vec::new();
    };
    let Some(stem) = first.as_str().strip_suffix("ing") else {
        return Vec::new();
    };
    if stem.is_empty() {
        return Vec::new();
    }
    let mut candidates = Vec::new();
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n >= 2 && chars[n - 1] == chars[n - 2] && !is_vowel(chars[n - 1]) {
        candidates.push(stem[..stem.len() - 1].to_owned());
    } else if n >= 3
        && !is_vowel(chars[n - 1])
        && is_vowel(chars[n - 2])
        && !is_vowel(chars[n - 3])
        && chars[n - 1] != 'w'
        && chars[n - 1] != 'x'
        && chars[n - 1] != 'y'
    {
        candidates.push(format!("{}e", stem));
    }
    candidates.push(stem.to_owned());
    candidates
        .into_iter()
        .map(|c| gerund.with_replaced(0, Token::new(&c)))
        .collect()
}

/// Inverts a passive participle back to candidate base forms, best guess
/// first: the irregular table, then "married" -> "marry",
/// "hopped" -> "hop", "loved" -> "love" / "lov", "worked" -> "work".
pub fn base_forms_of_passive(participle: &TokenString) -> Vec<TokenString> {
    let Some(first) = participle.first() else {
        return Vec::new();
    };
    let word = first.as_str();
    for (base, formed) in IRREGULAR_PARTICIPLES {
        if *formed == word {
            return vec![participle.with_replaced(0, Token::new(base))];
        }
    }
    let mut candidates = Vec::new();
    if let Some(stem) = word.strip_suffix("ied") {
        if !stem.is_empty() {
            candidates.push(format!("{}y", stem));
        }
    } else if let Some(stem) = word.strip_suffix("ed") {
        if !stem.is_empty() {
            let chars: Vec<char> = stem.chars().collect();
            let n = chars.len();
            if n >= 2 && chars[n - 1] == chars[n - 2] && !is_vowel(chars[n - 1]) {
                candidates.push(stem[..stem.len() - 1].to_owned());
            } else if n >= 3
                && !is_vowel(chars[n - 1])
                && is_vowel(chars[n - 2])
                && !is_vowel(chars[n - 3])
                && chars[n - 1] != 'w'
                && chars[n - 1] != 'x'
                && chars[n - 1] != 'y'
            {
                candidates.push(format!("{}e", stem));
            }
            candidates.push(stem.to_owned());
            candidates.push(format!("{}e", stem));
        }
    }
    let mut seen = Vec::new();
    for candidate in candidates {
        if !seen.contains(&candidate) {
            seen.push(candidate);
        }
    }
    seen.into_iter()
        .map(|c| participle.with_replaced(0, Token::new(&c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(phrase: &str) -> TokenString {
        TokenString::from_phrase(phrase)
    }

    #[test]
    fn regular_plurals() {
        for (sing, plur) in [
            ("cat", "cats"),
            ("kiss", "kisses"),
            ("box", "boxes"),
            ("church", "churches"),
            ("city", "cities"),
            ("knife", "knives"),
            ("wolf", "wolves"),
        ] {
            assert_eq!(plural_of_noun(&ts(sing)).unwrap(), ts(plur));
        }
    }

    #[test]
    fn irregular_plurals() {
        assert_eq!(plural_of_noun(&ts("person")).unwrap(), ts("people"));
        assert_eq!(singular_of_noun(&ts("people")).unwrap(), ts("person"));
        assert_eq!(plural_of_noun(&ts("hair")).unwrap(), ts("hair"));
    }

    #[test]
    fn regular_round_trip() {
        for word in ["cat", "city", "church", "box", "employer", "face"] {
            let sing = ts(word);
            let plur = plural_of_noun(&sing).unwrap();
            assert_eq!(singular_of_noun(&plur).unwrap(), sing, "{}", word);
        }
    }

    #[test]
    fn multi_token_nouns_inflect_the_head() {
        assert_eq!(plural_of_noun(&ts("polar bear")).unwrap(), ts("polar bears"));
        assert_eq!(singular_of_noun(&ts("polar bears")).unwrap(), ts("polar bear"));
    }

    #[test]
    fn singularize_fails_on_unknown() {
        assert!(singular_of_noun(&ts("sheeple")).is_err());
    }

    #[test]
    fn verb_conjugation() {
        assert_eq!(singular_of_verb(&ts("love")).unwrap(), ts("loves"));
        assert_eq!(singular_of_verb(&ts("work for")).unwrap(), ts("works for"));
        assert_eq!(plural_of_verb(&ts("works for")).unwrap(), ts("work for"));
        assert_eq!(
            singular_of_verb(&ts("are married to")).unwrap(),
            ts("is married to")
        );
    }

    #[test]
    fn gerund_enumeration() {
        let gerunds = gerunds_of_verb(&ts("love"));
        assert!(gerunds.contains(&ts("loving")));
        let gerunds = gerunds_of_verb(&ts("hop"));
        assert!(gerunds.contains(&ts("hopping")));
        let gerunds = gerunds_of_verb(&ts("work for"));
        assert!(gerunds.contains(&ts("working for")));
    }

    #[test]
    fn passive_participles() {
        assert_eq!(passive_participle(&ts("love")).unwrap(), ts("loved"));
        assert_eq!(passive_participle(&ts("eat")).unwrap(), ts("eaten"));
        assert_eq!(passive_participle(&ts("marry")).unwrap(), ts("married"));
        assert_eq!(passive_participle(&ts("work for")).unwrap(), ts("worked for"));
    }

    #[test]
    fn passive_inversion() {
        assert!(base_forms_of_passive(&ts("worked for")).contains(&ts("work for")));
        assert!(base_forms_of_passive(&ts("married to")).contains(&ts("marry to")));
        assert!(base_forms_of_passive(&ts("chased")).contains(&ts("chase")));
        assert!(base_forms_of_passive(&ts("eaten")).contains(&ts("eat")));
        assert_eq!(base_forms_of_passive(&ts("chase")), vec![]);
    }

    #[test]
    fn gerund_inversion() {
        let bases = base_forms_of_gerund(&ts("getting married to"));
        assert!(bases.contains(&ts("get married to")));
        let bases = base_forms_of_gerund(&ts("loving"));
        assert!(bases.contains(&ts("love")));
        let bases = base_forms_of_gerund(&ts("working for"));
        assert!(bases.contains(&ts("work for")));
    }
}

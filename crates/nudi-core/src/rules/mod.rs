//! Rule tables: the immutable, validated data both pipelines run on.
//!
//! A table is loaded from a JSON document (see `config`), one per
//! direction. Defaults for both directions are embedded in the binary.

mod config;
mod token_table;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::reverse::matcher::{BuiltinMatcher, ClusterMatcher, PatternKind, RegexMatcher};
use crate::unicode::{ANUSVARA, VIRAMA, VISARGA, ZWJ, ZWNJ};

use config::{meta_char, one_char, parse_config, RuleTableConfig};
pub use token_table::TokenTable;

pub const DEFAULT_FORWARD_JSON: &str = include_str!("default_forward.json");
pub const DEFAULT_REVERSE_JSON: &str = include_str!("default_reverse.json");

/// Upper bound for `meta.maxTokenLength`.
pub const MAX_TOKEN_LENGTH_CAP: usize = 16;
const DEFAULT_MAX_TOKEN_LENGTH: usize = 4;

const DEFAULT_LEGACY_VIRAMA: char = '\u{00EF}';
const DEFAULT_LEGACY_ARKAVATTU: char = '\u{00F0}';

/// Characters that attach to the previous cluster when a table does not
/// list its own.
const DEFAULT_PREV_VALUE_CHARS: [char; 17] = [
    '\u{0CBE}', '\u{0CBF}', '\u{0CC0}', '\u{0CC1}', '\u{0CC2}', '\u{0CC3}', '\u{0CC4}', '\u{0CC6}',
    '\u{0CC7}', '\u{0CC8}', '\u{0CCA}', '\u{0CCB}', '\u{0CCC}', VIRAMA, ANUSVARA, VISARGA, ZWJ,
];

#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("JSON parse error: {0}")]
    Parse(String),
    #[error("missing mandatory section: {0}")]
    MissingSection(&'static str),
    #[error("{field}: expected a single character, got {value:?}")]
    MultiCharEntry { field: &'static str, value: String },
    #[error("invalid pattern {name}: {reason}")]
    InvalidPattern { name: &'static str, reason: String },
    #[error("{0} rule table already initialized")]
    AlreadyInitialized(Direction),
}

/// Conversion direction. Each direction has its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Legacy visual ASCII → Unicode.
    #[serde(alias = "a2u")]
    Forward,
    /// Unicode → legacy visual ASCII.
    #[serde(alias = "u2a")]
    Reverse,
}

impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }

    /// The embedded default table for this direction.
    pub fn default_json(self) -> &'static str {
        match self {
            Direction::Forward => DEFAULT_FORWARD_JSON,
            Direction::Reverse => DEFAULT_REVERSE_JSON,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" | "a2u" => Ok(Direction::Forward),
            "reverse" | "u2a" => Ok(Direction::Reverse),
            other => Err(format!("unknown direction {other:?} (expected forward or reverse)")),
        }
    }
}

/// The three code points conjunct formation revolves around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joiners {
    pub zwj: char,
    pub zwnj: char,
    pub virama: char,
}

/// Pipeline switches. Set from the direction, never by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    pub insert_zwnj_after_virama: bool,
    pub insert_zwj_after_virama: bool,
    pub post_process_clusters: bool,
}

impl Toggles {
    fn for_direction(direction: Direction) -> Self {
        let forward = direction == Direction::Forward;
        Self {
            insert_zwnj_after_virama: forward,
            insert_zwj_after_virama: forward,
            post_process_clusters: forward,
        }
    }
}

/// A legacy glyph whose output depends on the character emitted before it.
#[derive(Debug, Clone, Default)]
pub struct BrokenCase {
    /// Used when no context applies (reverse direction only).
    pub fallback_value: String,
    /// Previous character → its replacement.
    pub context_map: HashMap<char, char>,
}

#[derive(Debug, Default)]
pub struct DigitMaps {
    pub legacy_to_kannada: HashMap<char, String>,
    pub kannada_to_legacy: HashMap<char, char>,
}

/// The four cluster shapes the reverse pipeline rewrites.
#[derive(Debug)]
pub struct ReversePatterns {
    pub vowel_plus_mark: Box<dyn ClusterMatcher>,
    pub consonant_plus_vowel: Box<dyn ClusterMatcher>,
    pub vattakshara_chain: Box<dyn ClusterMatcher>,
    pub reph_without_joiner: Box<dyn ClusterMatcher>,
}

#[derive(Debug)]
pub struct RuleTable {
    pub direction: Direction,
    pub max_token_length: usize,
    pub joiners: Joiners,
    pub legacy_virama: char,
    pub legacy_arkavattu: char,
    pub legacy_consonant_starts: HashSet<char>,
    pub legacy_join_before_no_space: HashSet<char>,
    pub tokens: TokenTable,
    pub dependent_vowels: HashSet<char>,
    pub ignore_list: HashSet<char>,
    pub vattakshara: HashMap<String, String>,
    pub arkavattu: HashMap<String, String>,
    pub broken_cases: HashMap<String, BrokenCase>,
    pub post_fixups: Vec<(String, String)>,
    pub prev_value_chars: HashSet<char>,
    pub unicode_vowels: HashSet<String>,
    pub digits: DigitMaps,
    pub patterns: ReversePatterns,
    pub toggles: Toggles,
}

impl RuleTable {
    /// Parse and validate a JSON rule table for `direction`.
    pub fn from_json(json: &str, direction: Direction) -> Result<Self, RuleTableError> {
        let cfg = parse_config(json)?;
        let table = Self::from_config(cfg, direction)?;
        debug!(
            direction = direction.name(),
            tokens = table.tokens.len(),
            vattakshara = table.vattakshara.len(),
            broken_cases = table.broken_cases.len(),
            post_fixups = table.post_fixups.len(),
            "rule table loaded"
        );
        Ok(table)
    }

    /// Load the embedded default table for `direction`.
    pub fn embedded(direction: Direction) -> Result<Self, RuleTableError> {
        Self::from_json(direction.default_json(), direction)
    }

    fn from_config(cfg: RuleTableConfig, direction: Direction) -> Result<Self, RuleTableError> {
        let meta = cfg.meta.ok_or(RuleTableError::MissingSection("meta"))?;
        let mapping = cfg
            .token_mapping
            .ok_or(RuleTableError::MissingSection("tokenMapping"))?;

        let max_token_length = match usize::try_from(meta.max_token_length) {
            Ok(0) | Err(_) => DEFAULT_MAX_TOKEN_LENGTH,
            Ok(n) => n.min(MAX_TOKEN_LENGTH_CAP),
        };

        let joiners = Joiners {
            zwj: meta_char("meta.zwj", meta.zwj.as_deref(), ZWJ)?,
            zwnj: meta_char("meta.zwnj", meta.zwnj.as_deref(), ZWNJ)?,
            virama: meta_char("meta.virama", meta.virama.as_deref(), VIRAMA)?,
        };
        let legacy_virama = meta_char(
            "meta.legacyViramaChar",
            meta.legacy_virama_char.as_deref(),
            DEFAULT_LEGACY_VIRAMA,
        )?;
        let legacy_arkavattu = meta_char(
            "meta.legacyArkavattuChar",
            meta.legacy_arkavattu_char.as_deref(),
            DEFAULT_LEGACY_ARKAVATTU,
        )?;

        let mut broken_cases = HashMap::with_capacity(cfg.broken_cases.len());
        for (marker, bc) in cfg.broken_cases {
            let mut context_map = HashMap::with_capacity(bc.context_map.len());
            for (from, to) in &bc.context_map {
                if from.is_empty() || to.is_empty() {
                    tracing::warn!(marker, "skipping empty brokenCases context entry");
                    continue;
                }
                context_map.insert(
                    one_char("brokenCases.contextMap", from)?,
                    one_char("brokenCases.contextMap", to)?,
                );
            }
            broken_cases.insert(
                marker,
                BrokenCase {
                    fallback_value: bc.value,
                    context_map,
                },
            );
        }

        let post_fixups = cfg
            .post_fixups
            .into_iter()
            .filter(|f| !f.from.is_empty())
            .map(|f| (f.from, f.to))
            .collect();

        let mut prev_value_chars: HashSet<char> = cfg
            .unicode_prev_value_chars
            .to_chars("unicodePrevValueChars")?
            .into_iter()
            .collect();
        if prev_value_chars.is_empty() {
            prev_value_chars = DEFAULT_PREV_VALUE_CHARS.into_iter().collect();
        }

        Ok(Self {
            direction,
            max_token_length,
            joiners,
            legacy_virama,
            legacy_arkavattu,
            legacy_consonant_starts: char_set(
                &cfg.legacy_consonant_start_chars,
                "legacyConsonantStartChars",
            )?,
            legacy_join_before_no_space: char_set(
                &cfg.legacy_join_before_no_space_chars,
                "legacyJoinBeforeNoSpaceChars",
            )?,
            tokens: TokenTable::new(mapping),
            dependent_vowels: char_set(&cfg.dependent_vowels, "dependentVowels")?,
            ignore_list: char_set(&cfg.ignore_list, "ignoreList")?,
            vattakshara: cfg.vattakshara_table,
            arkavattu: cfg.arkavattu_table,
            broken_cases,
            post_fixups,
            prev_value_chars,
            unicode_vowels: cfg.unicode_vowels.into_iter().collect(),
            digits: DigitMaps {
                legacy_to_kannada: legacy_digit_map(&cfg.numbers_mapping)?,
                kannada_to_legacy: kannada_digit_map(&cfg.kannada_digits, &cfg.legacy_digits)?,
            },
            patterns: ReversePatterns {
                vowel_plus_mark: matcher(
                    PatternKind::VowelPlusMark,
                    cfg.reverse_regex.vowel_plus_mark.as_deref(),
                )?,
                consonant_plus_vowel: matcher(
                    PatternKind::ConsonantPlusVowel,
                    cfg.reverse_regex.consonant_plus_vowel.as_deref(),
                )?,
                vattakshara_chain: matcher(
                    PatternKind::VattaksharaChain,
                    cfg.reverse_regex.vattakshara_chain.as_deref(),
                )?,
                reph_without_joiner: matcher(
                    PatternKind::RephWithoutJoiner,
                    cfg.reverse_regex.reph_without_joiner.as_deref(),
                )?,
            },
            toggles: Toggles::for_direction(direction),
        })
    }

    /// The mapped value of `s`, or `s` itself when unmapped.
    pub fn map_or_self<'a>(&'a self, s: &'a str) -> &'a str {
        self.tokens.get(s).unwrap_or(s)
    }

    pub fn is_dependent_vowel(&self, c: char) -> bool {
        self.dependent_vowels.contains(&c)
    }
}

fn char_set(
    list: &config::CharList,
    field: &'static str,
) -> Result<HashSet<char>, RuleTableError> {
    Ok(list.to_chars(field)?.into_iter().collect())
}

fn legacy_digit_map(
    raw: &HashMap<String, String>,
) -> Result<HashMap<char, String>, RuleTableError> {
    let mut map = HashMap::with_capacity(raw.len());
    for (digit, kannada) in raw {
        map.insert(one_char("numbersMapping", digit)?, kannada.clone());
    }
    Ok(map)
}

fn kannada_digit_map(
    kannada: &[String],
    legacy: &[String],
) -> Result<HashMap<char, char>, RuleTableError> {
    if kannada.len() != legacy.len() {
        tracing::warn!(
            kannada = kannada.len(),
            legacy = legacy.len(),
            "kannadaDigits/legacyDigits length mismatch, digit remap disabled"
        );
        return Ok(HashMap::new());
    }
    let mut map = HashMap::with_capacity(kannada.len());
    for (k, l) in kannada.iter().zip(legacy) {
        if k.is_empty() || l.is_empty() {
            continue;
        }
        map.insert(one_char("kannadaDigits", k)?, one_char("legacyDigits", l)?);
    }
    Ok(map)
}

/// A configured pattern compiles to a regex matcher; an absent or blank one
/// selects the built-in matcher for that shape.
fn matcher(
    kind: PatternKind,
    pattern: Option<&str>,
) -> Result<Box<dyn ClusterMatcher>, RuleTableError> {
    match pattern {
        Some(p) if !p.trim().is_empty() => {
            let m = RegexMatcher::new(kind, p).map_err(|e| RuleTableError::InvalidPattern {
                name: kind.name(),
                reason: e.to_string(),
            })?;
            Ok(Box::new(m))
        }
        _ => Ok(Box::new(BuiltinMatcher::new(kind))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"meta": {"maxTokenLength": 3}, "tokenMapping": {"a": "ಅ"}}"#;

    #[test]
    fn load_embedded_forward() {
        let t = RuleTable::embedded(Direction::Forward).unwrap();
        assert_eq!(t.direction, Direction::Forward);
        assert!(t.tokens.len() > 100, "got {}", t.tokens.len());
        assert_eq!(t.legacy_virama, 'ï');
        assert_eq!(t.joiners.virama, VIRAMA);
        assert_eq!(t.vattakshara.get("Û").map(String::as_str), Some("ತ"));
        assert_eq!(t.arkavattu.get("ð").map(String::as_str), Some("ರ"));
        assert!(t.toggles.insert_zwj_after_virama);
        assert!(t.toggles.insert_zwnj_after_virama);
        assert!(t.toggles.post_process_clusters);
    }

    #[test]
    fn load_embedded_reverse() {
        let t = RuleTable::embedded(Direction::Reverse).unwrap();
        assert_eq!(t.direction, Direction::Reverse);
        assert!(t.tokens.len() > 400, "got {}", t.tokens.len());
        assert_eq!(t.legacy_arkavattu, 'ð');
        assert_eq!(t.digits.kannada_to_legacy.get(&'೭'), Some(&'7'));
        assert!(t.unicode_vowels.contains("ಅ"));
        assert!(!t.toggles.insert_zwj_after_virama);
        assert!(!t.toggles.insert_zwnj_after_virama);
        assert!(!t.toggles.post_process_clusters);
    }

    #[test]
    fn missing_meta_is_fatal() {
        let err = RuleTable::from_json(r#"{"tokenMapping": {}}"#, Direction::Forward).unwrap_err();
        assert!(matches!(err, RuleTableError::MissingSection("meta")));
    }

    #[test]
    fn missing_token_mapping_is_fatal() {
        let err = RuleTable::from_json(r#"{"meta": {}}"#, Direction::Reverse).unwrap_err();
        assert!(matches!(err, RuleTableError::MissingSection("tokenMapping")));
    }

    #[test]
    fn optional_sections_default_empty() {
        let t = RuleTable::from_json(MINIMAL, Direction::Forward).unwrap();
        assert!(t.vattakshara.is_empty());
        assert!(t.arkavattu.is_empty());
        assert!(t.broken_cases.is_empty());
        assert!(t.post_fixups.is_empty());
        assert!(t.ignore_list.is_empty());
        assert!(t.digits.legacy_to_kannada.is_empty());
        assert_eq!(t.joiners.zwj, ZWJ);
        assert_eq!(t.joiners.zwnj, ZWNJ);
        assert_eq!(t.legacy_virama, DEFAULT_LEGACY_VIRAMA);
        // Falls back to the built-in attach set.
        assert!(t.prev_value_chars.contains(&VIRAMA));
        assert!(t.prev_value_chars.contains(&ZWJ));
    }

    #[test]
    fn max_token_length_is_clamped() {
        let json = r#"{"meta": {"maxTokenLength": 99}, "tokenMapping": {}}"#;
        let t = RuleTable::from_json(json, Direction::Forward).unwrap();
        assert_eq!(t.max_token_length, MAX_TOKEN_LENGTH_CAP);

        let json = r#"{"meta": {"maxTokenLength": -2}, "tokenMapping": {}}"#;
        let t = RuleTable::from_json(json, Direction::Forward).unwrap();
        assert_eq!(t.max_token_length, DEFAULT_MAX_TOKEN_LENGTH);

        let t = RuleTable::from_json(MINIMAL, Direction::Forward).unwrap();
        assert_eq!(t.max_token_length, 3);
    }

    #[test]
    fn classification_sets_are_deduplicated() {
        let json = r#"{"meta": {}, "tokenMapping": {},
            "dependentVowels": ["ಾ", "ಾ", "ಿ"], "legacyConsonantStartChars": "PPv"}"#;
        let t = RuleTable::from_json(json, Direction::Forward).unwrap();
        assert_eq!(t.dependent_vowels.len(), 2);
        assert_eq!(t.legacy_consonant_starts.len(), 2);
    }

    #[test]
    fn multi_char_meta_is_rejected() {
        let json = r#"{"meta": {"virama": "್್"}, "tokenMapping": {}}"#;
        let err = RuleTable::from_json(json, Direction::Forward).unwrap_err();
        assert!(matches!(err, RuleTableError::MultiCharEntry { field: "meta.virama", .. }));
    }

    #[test]
    fn broken_cases_are_parsed() {
        let json = r#"{"meta": {}, "tokenMapping": {},
            "brokenCases": {"Ã": {"value": "ೀ", "contextMap": {"ಿ": "ೀ", "ೆ": "ೇ"}}}}"#;
        let t = RuleTable::from_json(json, Direction::Forward).unwrap();
        let bc = &t.broken_cases["Ã"];
        assert_eq!(bc.fallback_value, "ೀ");
        assert_eq!(bc.context_map.get(&'ಿ'), Some(&'ೀ'));
        assert_eq!(bc.context_map.get(&'ೆ'), Some(&'ೇ'));
    }

    #[test]
    fn post_fixups_keep_order_and_drop_empty_from() {
        let json = r#"{"meta": {}, "tokenMapping": {}, "postFixups": [
            {"from": "b", "to": "c"}, {"from": "", "to": "x"}, {"from": "a", "to": "b"}]}"#;
        let t = RuleTable::from_json(json, Direction::Forward).unwrap();
        assert_eq!(
            t.post_fixups,
            vec![
                ("b".to_string(), "c".to_string()),
                ("a".to_string(), "b".to_string())
            ]
        );
    }

    #[test]
    fn mismatched_digit_arrays_disable_remap() {
        let json = r#"{"meta": {}, "tokenMapping": {},
            "kannadaDigits": ["೦", "೧"], "legacyDigits": ["0"]}"#;
        let t = RuleTable::from_json(json, Direction::Reverse).unwrap();
        assert!(t.digits.kannada_to_legacy.is_empty());
    }

    #[test]
    fn invalid_regex_is_config_error() {
        let json = r#"{"meta": {}, "tokenMapping": {},
            "reverseRegex": {"vowelPlusMark": "(?<v>[unclosed"}}"#;
        let err = RuleTable::from_json(json, Direction::Reverse).unwrap_err();
        assert!(matches!(
            err,
            RuleTableError::InvalidPattern { name: "vowelPlusMark", .. }
        ));
    }

    #[test]
    fn reverse_patterns_wired_by_kind() {
        let t = RuleTable::from_json(
            r#"{"meta": {}, "tokenMapping": {},
                "reverseRegex": {"vattaksharaChain": "(?<base>[\\x{0C95}-\\x{0CB9}])(?<chain>\\x{0CCD}[\\x{0C95}-\\x{0CB9}])"}}"#,
            Direction::Reverse,
        )
        .unwrap();
        let p = &t.patterns;
        assert_eq!(p.vowel_plus_mark.kind(), PatternKind::VowelPlusMark);
        assert_eq!(p.consonant_plus_vowel.kind(), PatternKind::ConsonantPlusVowel);
        assert_eq!(p.vattakshara_chain.kind(), PatternKind::VattaksharaChain);
        assert_eq!(p.reph_without_joiner.kind(), PatternKind::RephWithoutJoiner);
    }

    #[test]
    fn map_or_self() {
        let t = RuleTable::from_json(MINIMAL, Direction::Forward).unwrap();
        assert_eq!(t.map_or_self("a"), "ಅ");
        assert_eq!(t.map_or_self("z"), "z");
    }

    #[test]
    fn direction_from_str() {
        assert_eq!("forward".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!("u2a".parse::<Direction>().unwrap(), Direction::Reverse);
        assert!("sideways".parse::<Direction>().is_err());
    }
}

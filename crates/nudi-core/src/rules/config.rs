//! Serde model of a rule-table JSON document.
//!
//! Everything except `meta` and `tokenMapping` is optional and defaults to
//! empty; unknown fields are ignored.

use std::collections::HashMap;

use serde::Deserialize;

use super::RuleTableError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RuleTableConfig {
    pub meta: Option<MetaConfig>,
    pub token_mapping: Option<HashMap<String, String>>,
    #[serde(default)]
    pub legacy_consonant_start_chars: CharList,
    #[serde(default)]
    pub legacy_join_before_no_space_chars: CharList,
    #[serde(default)]
    pub dependent_vowels: CharList,
    #[serde(default)]
    pub ignore_list: CharList,
    #[serde(default)]
    pub vattakshara_table: HashMap<String, String>,
    #[serde(default)]
    pub arkavattu_table: HashMap<String, String>,
    #[serde(default)]
    pub broken_cases: HashMap<String, BrokenCaseConfig>,
    #[serde(default)]
    pub post_fixups: Vec<PostFixupConfig>,
    #[serde(default)]
    pub numbers_mapping: HashMap<String, String>,
    #[serde(default)]
    pub unicode_prev_value_chars: CharList,
    #[serde(default)]
    pub unicode_vowels: Vec<String>,
    #[serde(default)]
    pub kannada_digits: Vec<String>,
    #[serde(default)]
    pub legacy_digits: Vec<String>,
    #[serde(default)]
    pub reverse_regex: ReverseRegexConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MetaConfig {
    #[serde(default)]
    pub max_token_length: i64,
    pub zwj: Option<String>,
    pub zwnj: Option<String>,
    pub virama: Option<String>,
    pub legacy_virama_char: Option<String>,
    pub legacy_arkavattu_char: Option<String>,
}

/// A set of single characters, written either as one string
/// (`"ÌÍÎ"`) or as an array of one-character strings (`["Ì", "Í"]`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CharList {
    Text(String),
    List(Vec<String>),
}

impl Default for CharList {
    fn default() -> Self {
        CharList::List(Vec::new())
    }
}

impl CharList {
    /// Flatten into individual characters. Array entries must be exactly one
    /// character; empty entries are skipped.
    pub fn to_chars(&self, field: &'static str) -> Result<Vec<char>, RuleTableError> {
        match self {
            CharList::Text(s) => Ok(s.chars().collect()),
            CharList::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if item.is_empty() {
                        tracing::warn!(field, "skipping empty entry");
                        continue;
                    }
                    out.push(one_char(field, item)?);
                }
                Ok(out)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BrokenCaseConfig {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub context_map: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PostFixupConfig {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ReverseRegexConfig {
    pub vowel_plus_mark: Option<String>,
    pub consonant_plus_vowel: Option<String>,
    pub vattakshara_chain: Option<String>,
    pub reph_without_joiner: Option<String>,
}

pub(super) fn parse_config(json: &str) -> Result<RuleTableConfig, RuleTableError> {
    serde_json::from_str(json).map_err(|e| RuleTableError::Parse(e.to_string()))
}

/// Require `value` to be exactly one character.
pub(super) fn one_char(field: &'static str, value: &str) -> Result<char, RuleTableError> {
    crate::unicode::single_char(value).ok_or_else(|| RuleTableError::MultiCharEntry {
        field,
        value: value.to_string(),
    })
}

/// A one-character `meta` field, falling back to `default` when absent or
/// empty.
pub(super) fn meta_char(
    field: &'static str,
    value: Option<&str>,
    default: char,
) -> Result<char, RuleTableError> {
    match value {
        None | Some("") => Ok(default),
        Some(s) => one_char(field, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_list_from_string() {
        let cfg: RuleTableConfig =
            parse_config(r#"{"meta": {}, "tokenMapping": {}, "ignoreList": "ab"}"#).unwrap();
        assert_eq!(cfg.ignore_list.to_chars("ignoreList").unwrap(), vec!['a', 'b']);
    }

    #[test]
    fn char_list_from_array_skips_empty() {
        let cfg: RuleTableConfig = parse_config(
            r#"{"meta": {}, "tokenMapping": {}, "dependentVowels": ["ಾ", "", "ಿ"]}"#,
        )
        .unwrap();
        assert_eq!(
            cfg.dependent_vowels.to_chars("dependentVowels").unwrap(),
            vec!['ಾ', 'ಿ']
        );
    }

    #[test]
    fn char_list_rejects_multi_char_entry() {
        let cfg: RuleTableConfig =
            parse_config(r#"{"meta": {}, "tokenMapping": {}, "ignoreList": ["ab"]}"#).unwrap();
        let err = cfg.ignore_list.to_chars("ignoreList").unwrap_err();
        assert!(matches!(
            err,
            RuleTableError::MultiCharEntry { field: "ignoreList", .. }
        ));
    }

    #[test]
    fn missing_optional_sections_default_to_empty() {
        let cfg = parse_config(r#"{"meta": {"maxTokenLength": 3}, "tokenMapping": {"a": "b"}}"#)
            .unwrap();
        assert!(cfg.vattakshara_table.is_empty());
        assert!(cfg.broken_cases.is_empty());
        assert!(cfg.post_fixups.is_empty());
        assert!(cfg.ignore_list.to_chars("ignoreList").unwrap().is_empty());
        assert!(cfg.reverse_regex.vowel_plus_mark.is_none());
    }

    #[test]
    fn meta_char_defaults() {
        assert_eq!(meta_char("zwj", None, '\u{200D}').unwrap(), '\u{200D}');
        assert_eq!(meta_char("zwj", Some(""), '\u{200D}').unwrap(), '\u{200D}');
        assert_eq!(meta_char("virama", Some("x"), '\u{0CCD}').unwrap(), 'x');
        assert!(meta_char("virama", Some("xy"), '\u{0CCD}').is_err());
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = parse_config("{not json").unwrap_err();
        assert!(matches!(err, RuleTableError::Parse(_)));
    }
}

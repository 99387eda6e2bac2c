//! Passes over the assembled legacy output.

use std::collections::{HashMap, HashSet};

use crate::rules::{BrokenCase, RuleTable};
use crate::unicode::is_dependent_vowel;

pub fn remove_zwnj(text: &str, zwnj: char) -> String {
    text.chars().filter(|&c| c != zwnj).collect()
}

pub fn remap_digits(text: &str, digits: &HashMap<char, char>) -> String {
    if digits.is_empty() {
        return text.to_string();
    }
    text.chars()
        .map(|c| digits.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Each broken-case marker rewrites the character before it through its
/// context map and disappears; without a match its fallback value is
/// emitted instead.
pub fn apply_broken_cases(text: &str, cases: &HashMap<String, BrokenCase>) -> String {
    if cases.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        let Some(bc) = cases.get(&*c.encode_utf8(&mut buf)) else {
            out.push(c);
            continue;
        };
        let rewritten = out
            .chars()
            .next_back()
            .and_then(|prev| bc.context_map.get(&prev));
        match rewritten {
            Some(&r) => {
                out.pop();
                out.push(r);
            }
            None => out.push_str(&bc.fallback_value),
        }
    }
    out
}

/// Ordered literal replacements over the whole output.
pub fn apply_fixups(text: &str, fixups: &[(String, String)]) -> String {
    fixups
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
}

/// Legacy sign glyphs: the one-character mappings of the Unicode dependent
/// vowel signs, minus the legacy virama and arkavattu glyphs.
pub fn legacy_sign_glyphs(table: &RuleTable) -> HashSet<char> {
    ('\u{0CBE}'..='\u{0CCC}')
        .filter(|&c| is_dependent_vowel(c))
        .filter_map(|c| {
            let mut buf = [0u8; 4];
            let mapped = table.tokens.get(c.encode_utf8(&mut buf))?;
            crate::unicode::single_char(mapped)
        })
        .filter(|&g| g != table.legacy_virama && g != table.legacy_arkavattu)
        .collect()
}

/// Legacy fonts draw a sign before up to three subscript glyphs. Rotate a
/// sign glyph behind the run of 3, 2 or 1 vatta glyphs that follows it.
pub fn reorder_signs(text: &str, signs: &HashSet<char>, vatta: &HashSet<char>) -> String {
    if signs.is_empty() {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ' ' || !signs.contains(&chars[i]) {
            i += 1;
            continue;
        }
        let run = chars[i + 1..]
            .iter()
            .take(3)
            .take_while(|c| vatta.contains(c))
            .count();
        if run > 0 {
            chars[i..=i + run].rotate_left(1);
            i += run;
        }
        i += 1;
    }
    chars.into_iter().collect()
}

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::unicode::{is_kannada_consonant, is_kannada_or_joiner};

/// Apply `f` to every maximal run of Kannada-or-joiner characters, copying
/// everything between runs unchanged.
fn map_kannada_runs(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run_start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match (is_kannada_or_joiner(c), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                out.push_str(&f(&text[start..i]));
                run_start = None;
                out.push(c);
            }
            (false, None) => out.push(c),
            (true, Some(_)) => {}
        }
    }
    if let Some(start) = run_start {
        out.push_str(&f(&text[start..]));
    }
    out
}

/// Move a dependent vowel sign that precedes a virama + consonant chain to
/// the end of that chain, within each Kannada run.
pub fn post_process_clusters(text: &str, dependent_vowels: &HashSet<char>, virama: char) -> String {
    map_kannada_runs(text, |run| reorder_run(run, dependent_vowels, virama))
}

fn reorder_run(run: &str, dependent_vowels: &HashSet<char>, virama: char) -> String {
    let chars: Vec<char> = run.chars().collect();
    let mut out = String::with_capacity(run.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if !dependent_vowels.contains(&c) || chars.get(i + 1) != Some(&virama) {
            out.push(c);
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j + 1 < chars.len() && chars[j] == virama && is_kannada_consonant(chars[j + 1]) {
            out.push(virama);
            out.push(chars[j + 1]);
            j += 2;
        }
        out.push(c);
        i = j;
    }
    out
}

/// Ordered literal replacements, applied inside Kannada runs only.
pub fn apply_run_fixups(text: &str, fixups: &[(String, String)]) -> String {
    if fixups.is_empty() {
        return text.to_string();
    }
    map_kannada_runs(text, |run| {
        fixups
            .iter()
            .fold(run.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    })
}

/// Canonical composition (NFC).
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}

use std::collections::HashSet;

use crate::unicode::is_ascii_word_char;

fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Remove `ws` wherever it directly follows `marker`, in one left-to-right
/// pass.
fn drop_after(input: &str, marker: char, ws: char) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == marker && chars.peek() == Some(&ws) {
            chars.next();
        }
    }
    out
}

/// Drop whitespace the legacy fonts leave behind.
///
/// Two passes over the text: every virama + space, then every virama +
/// tab, loses its whitespace. So "ï \t" collapses fully but "ï\t " keeps
/// the space. When `join_before` is non-empty, a space or tab directly
/// before any of its characters is removed as well.
pub fn pre_normalize(input: &str, legacy_virama: char, join_before: &HashSet<char>) -> String {
    let out = drop_after(input, legacy_virama, ' ');
    let out = drop_after(&out, legacy_virama, '\t');

    if join_before.is_empty() {
        return out;
    }

    let mut joined = String::with_capacity(out.len());
    let mut chars = out.chars().peekable();
    while let Some(c) = chars.next() {
        let next_joins = chars.peek().is_some_and(|n| join_before.contains(n));
        if is_space_or_tab(c) && next_joins {
            continue;
        }
        joined.push(c);
    }
    joined
}

/// Insert `zwnj` between the legacy virama and a following consonant-start
/// glyph, so an explicit halant does not fuse into a conjunct. Plain ASCII
/// word characters after the virama are left alone.
pub fn pre_insert_zwnj(
    input: &str,
    legacy_virama: char,
    consonant_starts: &HashSet<char>,
    zwnj: char,
) -> String {
    if !input.contains(legacy_virama) {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len() + 16);
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c != legacy_virama {
            continue;
        }
        if let Some(&next) = chars.peek() {
            if !is_ascii_word_char(next) && consonant_starts.contains(&next) {
                out.push(zwnj);
            }
        }
    }
    out
}

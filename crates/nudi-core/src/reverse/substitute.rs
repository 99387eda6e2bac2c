use tracing::debug_span;

use super::matcher::replace_all;
use crate::rules::RuleTable;
use crate::unicode::is_anusvara_or_visarga;
use crate::ConvertError;

/// Convert one Unicode cluster to legacy tokens.
///
/// Tried in order: direct mapping, independent vowel, vowel + mark, reph
/// without joiner, vattakshara chain, consonant + sign. Whatever is left
/// unmatched goes through the direct mapping or is kept as is.
pub fn rearrange_and_replace(cluster: &str, table: &RuleTable) -> Result<String, ConvertError> {
    if cluster.is_empty() {
        return Ok(String::new());
    }
    if let Some(direct) = table.tokens.get(cluster) {
        return Ok(direct.to_string());
    }
    if table.unicode_vowels.contains(cluster) {
        return Ok(table.map_or_self(cluster).to_string());
    }

    let _span = debug_span!("rearrange_and_replace", len = cluster.len()).entered();
    let patterns = &table.patterns;

    let text = replace_all(patterns.vowel_plus_mark.as_ref(), cluster, |m| {
        format!("{}{}", table.map_or_self(m.v), table.map_or_self(m.av))
    })?;

    let text = replace_all(patterns.reph_without_joiner.as_ref(), &text, |m| {
        let base = m
            .base_vatta_cons
            .strip_prefix(table.joiners.zwj)
            .unwrap_or(m.base_vatta_cons);
        substitute_ascii(
            table,
            base,
            m.dv,
            m.rest_chain,
            Some(table.legacy_arkavattu),
        )
    })?;

    let text = replace_all(patterns.vattakshara_chain.as_ref(), &text, |m| {
        substitute_ascii(table, m.base, m.dv, m.chain, None)
    })?;

    let text = replace_all(patterns.consonant_plus_vowel.as_ref(), &text, |m| {
        substitute_ascii(table, m.base, m.dv, "", None)
    })?;

    Ok(table.map_or_self(&text).to_string())
}

/// Assemble the legacy form of base consonant + conjunct chain + signs.
///
/// The first sign joins the base lookup unless it is an anusvara/visarga,
/// which instead goes after the chain. A second sign is appended last,
/// followed by `append` if given.
pub fn substitute_ascii(
    table: &RuleTable,
    base: &str,
    signs: &str,
    chain: &str,
    append: Option<char>,
) -> String {
    let mut out = String::new();
    let mut sign_chars = signs.chars();
    let first = sign_chars.next();
    let second = sign_chars.next();
    let first_is_mark = first.is_some_and(is_anusvara_or_visarga);

    match first {
        Some(dv) if !first_is_mark => {
            let mut key = String::with_capacity(base.len() + dv.len_utf8());
            key.push_str(base);
            key.push(dv);
            out.push_str(&map_owned(table, key));
        }
        _ => out.push_str(table.map_or_self(base)),
    }

    let zwj = table.joiners.zwj;
    let virama = table.joiners.virama;
    let chars: Vec<char> = chain.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == virama && i + 1 < chars.len() {
            let mut next = chars[i + 1];
            let mut has_zwj = false;
            if next == zwj && i + 2 < chars.len() {
                has_zwj = true;
                next = chars[i + 2];
                i += 1;
            }
            out.push_str(&map_vattakshara_or_fallback(table, next, has_zwj));
            i += 1;
        }
        i += 1;
    }

    if let Some(mark) = first.filter(|_| first_is_mark) {
        out.push_str(&map_char(table, mark));
    }
    if let Some(dv) = second {
        out.push_str(&map_char(table, dv));
    }
    if let Some(c) = append {
        out.push(c);
    }
    out
}

/// Legacy glyph for a consonant in conjunct position.
///
/// Looks up virama + ZWJ + consonant (when the chain had a ZWJ), then
/// virama + consonant, then the vattakshara table keyed by the bare
/// consonant, then the consonant itself.
pub fn map_vattakshara_or_fallback(table: &RuleTable, consonant: char, has_zwj: bool) -> String {
    let virama = table.joiners.virama;
    if has_zwj {
        let key: String = [virama, table.joiners.zwj, consonant].iter().collect();
        if let Some(m) = table.tokens.get(&key) {
            return m.to_string();
        }
    }
    let key: String = [virama, consonant].iter().collect();
    if let Some(m) = table.tokens.get(&key) {
        return m.to_string();
    }
    let mut buf = [0u8; 4];
    let bare: &str = consonant.encode_utf8(&mut buf);
    if let Some(v) = table.vattakshara.get(bare) {
        return v.clone();
    }
    table.map_or_self(bare).to_string()
}

fn map_char(table: &RuleTable, c: char) -> String {
    let mut buf = [0u8; 4];
    table.map_or_self(c.encode_utf8(&mut buf)).to_string()
}

fn map_owned(table: &RuleTable, key: String) -> String {
    match table.tokens.get(&key) {
        Some(m) => m.to_string(),
        None => key,
    }
}

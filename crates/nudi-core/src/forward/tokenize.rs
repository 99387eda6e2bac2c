use tracing::debug_span;

use crate::rules::{BrokenCase, RuleTable};
use crate::unicode::single_char;

/// Longest-match tokenization of legacy text into Unicode tokens.
///
/// At each position the longest `tokenMapping` key wins. A single glyph
/// with no mapping goes through the special-case tables (arkavattu,
/// vattakshara, broken case), then the digit map and the legacy virama;
/// anything else is copied. Tokens stay separate in the returned list
/// because the special cases rewrite the tokens emitted before them.
pub fn tokenize(text: &str, table: &RuleTable) -> Vec<String> {
    let _span = debug_span!("tokenize", len = text.len()).entered();

    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let n_chars = bounds.len() - 1;
    let virama = table.joiners.virama;

    let mut out: Vec<String> = Vec::with_capacity(n_chars);
    let mut i = 0;
    while i < n_chars {
        let c = match text[bounds[i]..].chars().next() {
            Some(c) => c,
            None => break,
        };

        if table.ignore_list.contains(&c) {
            out.push(c.to_string());
            i += 1;
            continue;
        }

        let longest = table.max_token_length.min(n_chars - i);
        let hit = (1..=longest).rev().find_map(|len| {
            if !table.tokens.has_len(len) {
                return None;
            }
            let key = &text[bounds[i]..bounds[i + len]];
            table.tokens.get_with_len(key, len).map(|m| (len, m))
        });

        match hit {
            Some((len, mapped)) => {
                let after_virama = out.last().is_some_and(|t| t.ends_with(virama));
                if table.toggles.insert_zwj_after_virama && after_virama {
                    out.push(table.joiners.zwj.to_string());
                }
                out.push(mapped.to_string());
                i += len;
            }
            None => {
                push_unmapped(&mut out, c, table);
                i += 1;
            }
        }
    }
    out
}

fn push_unmapped(out: &mut Vec<String>, c: char, table: &RuleTable) {
    let mut buf = [0u8; 4];
    let key: &str = c.encode_utf8(&mut buf);

    if let Some(ra) = table.arkavattu.get(key) {
        push_arkavattu(out, ra, table);
    } else if let Some(base) = table.vattakshara.get(key) {
        push_vattakshara(out, base, table);
    } else if let Some(bc) = table.broken_cases.get(key) {
        apply_broken_case(out, bc, table);
    } else if let Some(digit) = table.digits.legacy_to_kannada.get(&c) {
        out.push(digit.clone());
    } else if c == table.legacy_virama {
        out.push(table.joiners.virama.to_string());
    } else {
        out.push(c.to_string());
    }
}

fn is_single_dependent_vowel(token: &str, table: &RuleTable) -> bool {
    single_char(token).is_some_and(|c| table.is_dependent_vowel(c))
}

/// The reph glyph follows its consonant visually but precedes it in
/// Unicode: ra + virama goes in front of the last consonant token (and in
/// front of its sign, if the last token is a lone sign).
fn push_arkavattu(out: &mut Vec<String>, ra: &str, table: &RuleTable) {
    let virama = table.joiners.virama.to_string();
    let ends_in_sign = out
        .last()
        .is_some_and(|t| is_single_dependent_vowel(t, table));
    let insert_at = match out.len() {
        0 => 0,
        1 if ends_in_sign => 1,
        n if ends_in_sign => n - 2,
        n => n - 1,
    };
    out.splice(insert_at..insert_at, [ra.to_string(), virama]);
}

/// Conjunct consonant: virama + base, moved in front of a lone trailing
/// sign since legacy fonts draw the sign before the subscript form.
fn push_vattakshara(out: &mut Vec<String>, base: &str, table: &RuleTable) {
    let virama = table.joiners.virama.to_string();
    let sign = out
        .last()
        .filter(|t| is_single_dependent_vowel(t, table))
        .cloned();
    match sign {
        Some(sign) => {
            out.pop();
            out.extend([virama, base.to_string(), sign]);
        }
        None => out.extend([virama, base.to_string()]),
    }
}

/// Rewrite the previous sign through the marker's context map; with no
/// applicable context the marker is dropped.
fn apply_broken_case(out: &mut [String], bc: &BrokenCase, table: &RuleTable) {
    let Some(last) = out.last_mut() else {
        return;
    };
    let replacement = single_char(last)
        .filter(|&c| table.is_dependent_vowel(c))
        .and_then(|c| bc.context_map.get(&c));
    if let Some(&r) = replacement {
        *last = r.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Direction;

    fn forward_table() -> RuleTable {
        RuleTable::embedded(Direction::Forward).unwrap()
    }

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text, &forward_table())
    }

    #[test]
    fn longest_match_wins() {
        // ª alone is ವ and Ä alone is ು; together they are ಮ.
        assert_eq!(tokens("ªÀÄ"), vec!["ಮ"]);
        assert_eq!(tokens("ªÀ"), vec!["ವ"]);
        assert_eq!(tokens("ªÄ"), vec!["ವ", "ು"]);
    }

    #[test]
    fn inherent_vowel_marker_is_silent() {
        assert_eq!(tokens("PÀ").concat(), "ಕ");
        assert_eq!(tokens("PÁ").concat(), "ಕಾ");
    }

    #[test]
    fn zwj_after_virama_token() {
        assert_eq!(tokens("PïvÀ"), vec!["ಕ", "್", "\u{200D}", "ತ"]);
    }

    #[test]
    fn vattakshara_after_consonant() {
        assert_eq!(tokens("PÀÛ").concat(), "ಕ್ತ");
    }

    #[test]
    fn vattakshara_swaps_behind_sign() {
        assert_eq!(tokens("PÉÛ"), vec!["ಕ", "್", "ತ", "ೆ"]);
    }

    #[test]
    fn vattakshara_with_nothing_before() {
        assert_eq!(tokens("Û").concat(), "್ತ");
    }

    #[test]
    fn arkavattu_goes_before_consonant() {
        assert_eq!(tokens("PÀð").concat(), "ರ್ಕ");
        assert_eq!(tokens("PÁð").concat(), "ರ್ಕಾ");
        assert_eq!(tokens("ð").concat(), "ರ್");
    }

    #[test]
    fn arkavattu_after_lone_sign() {
        assert_eq!(tokens("Áð").concat(), "ಾರ್");
    }

    #[test]
    fn broken_case_rewrites_sign() {
        assert_eq!(tokens("PüÃ").concat(), "ಕೀ");
        assert_eq!(tokens("PÉÃ").concat(), "ಕೇ");
    }

    #[test]
    fn broken_case_without_context_is_dropped() {
        assert_eq!(tokens("PÀÃ").concat(), "ಕ");
        assert_eq!(tokens("Ã").concat(), "");
    }

    #[test]
    fn legacy_virama_maps_to_virama() {
        assert_eq!(tokens("ï"), vec!["್"]);
    }

    #[test]
    fn unmapped_passthrough() {
        assert_eq!(tokens("123 ~"), vec!["1", "2", "3", " ", "~"]);
    }

    #[test]
    fn ignore_list_kept_verbatim() {
        assert_eq!(tokens("P\u{00AD}À"), vec!["ಕ", "\u{00AD}", ""]);
    }
}

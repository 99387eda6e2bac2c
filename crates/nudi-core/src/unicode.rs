//! Character-level Unicode classification for Kannada text.

pub const ZWJ: char = '\u{200D}';
pub const ZWNJ: char = '\u{200C}';
pub const VIRAMA: char = '\u{0CCD}';
pub const ANUSVARA: char = '\u{0C82}';
pub const VISARGA: char = '\u{0C83}';
pub const RA: char = '\u{0CB0}';

/// Check the full Kannada block (U+0C80..U+0CFF) plus the two zero-width
/// joiners. Conjunct runs are delimited with this predicate, so a ZWJ/ZWNJ
/// between two Kannada letters never splits a run.
pub fn is_kannada_or_joiner(c: char) -> bool {
    ('\u{0C80}'..='\u{0CFF}').contains(&c) || c == ZWNJ || c == ZWJ
}

/// Consonant letters KA..HA, plus the archaic FA (U+0CDE).
pub fn is_kannada_consonant(c: char) -> bool {
    ('\u{0C95}'..='\u{0CB9}').contains(&c) || c == '\u{0CDE}'
}

/// Dependent vowel signs (matras) U+0CBE..U+0CCC.
///
/// Virama, anusvara and visarga are combining marks too but are not vowel
/// signs; the two unassigned codepoints in the range (U+0CC5, U+0CC9) are
/// excluded.
pub fn is_dependent_vowel(c: char) -> bool {
    ('\u{0CBE}'..='\u{0CCC}').contains(&c) && c != '\u{0CC5}' && c != '\u{0CC9}'
}

/// A vowel sign or one of the two trailing marks, i.e. anything that may
/// follow a consonant inside a syllable (`[ಾ-ೌಂಃ]`).
pub fn is_sign_or_mark(c: char) -> bool {
    ('\u{0CBE}'..='\u{0CCC}').contains(&c) || is_anusvara_or_visarga(c)
}

pub fn is_anusvara_or_visarga(c: char) -> bool {
    c == ANUSVARA || c == VISARGA
}

/// Independent vowel letters that can carry an anusvara/visarga
/// (`[ಅ-ಔೠ]`).
pub fn is_independent_vowel(c: char) -> bool {
    ('\u{0C85}'..='\u{0C94}').contains(&c) || c == '\u{0CE0}'
}

/// Returns the only character of `s`, or `None` if `s` is empty or longer.
pub fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Plain ASCII letter, digit, `_` or `-`: characters of embedded Latin text
/// that must never be glued to a preceding legacy virama.
pub fn is_ascii_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

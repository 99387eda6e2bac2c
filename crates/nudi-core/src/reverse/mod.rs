//! Unicode Kannada → legacy visual ASCII.
//!
//! Words (split on U+0020) are cut into clusters, each cluster is rewritten
//! into legacy tokens, then the whole output goes through the broken-case,
//! fixup and sign-reorder passes.

mod finish;
pub mod matcher;
mod segment;
mod substitute;


use tracing::debug_span;

use crate::rules::RuleTable;
use crate::ConvertError;

pub use finish::{
    apply_broken_cases, apply_fixups, legacy_sign_glyphs, remap_digits, remove_zwnj,
    reorder_signs,
};
pub use segment::split_clusters;
pub use substitute::{map_vattakshara_or_fallback, rearrange_and_replace, substitute_ascii};

/// Convert Unicode text to legacy glyphs with `table`.
pub fn convert(text: &str, table: &RuleTable) -> Result<String, ConvertError> {
    run(text, table, |_, _| {})
}

/// Convert one space-free word: clusters, substitution, ZWNJ removal and
/// digit remap.
pub fn convert_word(word: &str, table: &RuleTable) -> Result<String, ConvertError> {
    let mut out = String::with_capacity(word.len() * 2);
    for cluster in split_clusters(word, &table.prev_value_chars) {
        out.push_str(&rearrange_and_replace(&cluster, table)?);
    }
    let out = remove_zwnj(&out, table.joiners.zwnj);
    Ok(remap_digits(&out, &table.digits.kannada_to_legacy))
}

/// Run the pipeline, reporting each stage's output to `stage`.
pub(crate) fn run(
    text: &str,
    table: &RuleTable,
    mut stage: impl FnMut(&'static str, &str),
) -> Result<String, ConvertError> {
    let _span = debug_span!("convert_reverse", len = text.len()).entered();
    if text.is_empty() {
        return Ok(String::new());
    }

    let mut words = Vec::new();
    for word in text.split(' ') {
        words.push(convert_word(word, table)?);
    }
    let text = words.join(" ");
    stage("words", &text);

    let text = apply_broken_cases(&text, &table.broken_cases);
    stage("broken_cases", &text);

    let text = apply_fixups(&text, &table.post_fixups);
    stage("post_fixups", &text);

    let signs = legacy_sign_glyphs(table);
    let text = reorder_signs(&text, &signs, &table.legacy_consonant_starts);
    stage("reorder_signs", &text);
    Ok(text)
}

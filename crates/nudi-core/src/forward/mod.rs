//! Legacy visual ASCII → Unicode Kannada.
//!
//! pre-normalize → ZWNJ pre-insertion → longest-match tokenizer → cluster
//! reorder → run-scoped fixups → NFC.

mod cluster;
mod prenormalize;
mod tokenize;


use tracing::debug_span;

use crate::rules::RuleTable;

pub use cluster::{apply_run_fixups, nfc, post_process_clusters};
pub use prenormalize::{pre_insert_zwnj, pre_normalize};
pub use tokenize::tokenize;

/// Convert legacy text to Unicode with `table`.
pub fn convert(text: &str, table: &RuleTable) -> String {
    run(text, table, |_, _| {})
}

/// Run the pipeline, reporting each stage's output to `stage`.
pub(crate) fn run(text: &str, table: &RuleTable, mut stage: impl FnMut(&'static str, &str)) -> String {
    let _span = debug_span!("convert_forward", len = text.len()).entered();
    if text.is_empty() {
        return String::new();
    }

    let text = pre_normalize(
        text,
        table.legacy_virama,
        &table.legacy_join_before_no_space,
    );
    stage("pre_normalize", &text);

    let text = if table.toggles.insert_zwnj_after_virama {
        let t = pre_insert_zwnj(
            &text,
            table.legacy_virama,
            &table.legacy_consonant_starts,
            table.joiners.zwnj,
        );
        stage("pre_insert_zwnj", &t);
        t
    } else {
        text
    };

    let text = tokenize(&text, table).concat();
    stage("tokenize", &text);

    let text = if table.toggles.post_process_clusters {
        let t = post_process_clusters(&text, &table.dependent_vowels, table.joiners.virama);
        stage("post_process_clusters", &t);
        t
    } else {
        text
    };

    let text = apply_run_fixups(&text, &table.post_fixups);
    stage("post_fixups", &text);

    let text = nfc(&text);
    stage("nfc", &text);
    text
}

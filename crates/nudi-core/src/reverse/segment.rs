use std::collections::HashSet;

use crate::unicode::{is_kannada_consonant, is_kannada_or_joiner, VIRAMA, ZWJ};

/// Split a word into clusters: a code point joins the previous cluster when
/// it is one of `attach` (signs, virama, marks, ZWJ) or a consonant right
/// after a virama (optionally followed by ZWJ).
pub fn split_clusters(word: &str, attach: &HashSet<char>) -> Vec<String> {
    let mut clusters: Vec<String> = Vec::new();
    for c in word.chars() {
        let joins = is_kannada_or_joiner(c)
            && clusters.last().is_some_and(|prev| {
                attach.contains(&c) || (is_kannada_consonant(c) && ends_in_virama(prev))
            });
        match clusters.last_mut() {
            Some(prev) if joins => prev.push(c),
            _ => clusters.push(c.to_string()),
        }
    }
    clusters
}

fn ends_in_virama(cluster: &str) -> bool {
    let mut rev = cluster.chars().rev();
    match rev.next() {
        Some(VIRAMA) => true,
        Some(ZWJ) => rev.next() == Some(VIRAMA),
        _ => false,
    }
}

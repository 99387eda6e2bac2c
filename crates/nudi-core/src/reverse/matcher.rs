//! Cluster-shaped pattern matchers for the reverse pipeline.
//!
//! Each of the four shapes has a hand-written matcher over Kannada code
//! points. A rule table may override any of them with a regular expression
//! using the same named groups; both sit behind [`ClusterMatcher`].

use std::fmt;

use regex::Regex;

use crate::unicode::{
    is_anusvara_or_visarga, is_independent_vowel, is_kannada_consonant, is_sign_or_mark, RA,
    VIRAMA, ZWJ,
};
use crate::ConvertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// `v` independent vowel + `av` anusvara/visarga.
    VowelPlusMark,
    /// `base` consonant + `dv` one or two signs, not followed by virama/ZWJ.
    ConsonantPlusVowel,
    /// `base` consonant + `chain` of virama(+ZWJ)+consonant + `dv` signs.
    VattaksharaChain,
    /// ra + virama + virama + `baseVattaCons` + `restChain` + `dv`.
    RephWithoutJoiner,
}

impl PatternKind {
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::VowelPlusMark => "vowelPlusMark",
            PatternKind::ConsonantPlusVowel => "consonantPlusVowel",
            PatternKind::VattaksharaChain => "vattaksharaChain",
            PatternKind::RephWithoutJoiner => "rephWithoutJoiner",
        }
    }

    /// Groups a match must have produced for the substitution to make sense.
    fn required_groups(self) -> &'static [&'static str] {
        match self {
            PatternKind::VowelPlusMark => &["v", "av"],
            PatternKind::ConsonantPlusVowel => &["base", "dv"],
            PatternKind::VattaksharaChain => &["base", "chain"],
            PatternKind::RephWithoutJoiner => &["baseVattaCons"],
        }
    }
}

/// Named groups of one match. Groups the shape does not use stay empty.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClusterMatch<'t> {
    pub v: &'t str,
    pub av: &'t str,
    pub base: &'t str,
    pub dv: &'t str,
    pub chain: &'t str,
    pub base_vatta_cons: &'t str,
    pub rest_chain: &'t str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found<'t> {
    pub start: usize,
    pub end: usize,
    pub groups: ClusterMatch<'t>,
}

pub trait ClusterMatcher: fmt::Debug + Send + Sync {
    fn kind(&self) -> PatternKind;

    /// Leftmost match starting at or after byte offset `start`.
    fn find_at<'t>(&self, text: &'t str, start: usize)
        -> Result<Option<Found<'t>>, ConvertError>;
}

/// Replace every non-overlapping match of `matcher` in `text` with the
/// output of `replace`.
pub fn replace_all<F>(
    matcher: &dyn ClusterMatcher,
    text: &str,
    mut replace: F,
) -> Result<String, ConvertError>
where
    F: FnMut(&ClusterMatch<'_>) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;
    while pos <= text.len() {
        let Some(found) = matcher.find_at(text, pos)? else {
            break;
        };
        tracing::trace!(
            pattern = matcher.kind().name(),
            start = found.start,
            end = found.end,
            "cluster pattern matched"
        );
        out.push_str(&text[last..found.start]);
        out.push_str(&replace(&found.groups));
        last = found.end;
        pos = if found.end > found.start {
            found.end
        } else {
            // Empty match: step over one character so the scan terminates.
            match text[found.end..].chars().next() {
                Some(c) => found.end + c.len_utf8(),
                None => break,
            }
        };
    }
    out.push_str(&text[last..]);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Built-in matchers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct BuiltinMatcher {
    kind: PatternKind,
}

impl BuiltinMatcher {
    pub fn new(kind: PatternKind) -> Self {
        Self { kind }
    }

    fn match_here<'t>(&self, text: &'t str, at: usize) -> Option<Found<'t>> {
        match self.kind {
            PatternKind::VowelPlusMark => vowel_plus_mark(text, at),
            PatternKind::ConsonantPlusVowel => consonant_plus_vowel(text, at),
            PatternKind::VattaksharaChain => vattakshara_chain(text, at),
            PatternKind::RephWithoutJoiner => reph_without_joiner(text, at),
        }
    }
}

impl ClusterMatcher for BuiltinMatcher {
    fn kind(&self) -> PatternKind {
        self.kind
    }

    fn find_at<'t>(
        &self,
        text: &'t str,
        start: usize,
    ) -> Result<Option<Found<'t>>, ConvertError> {
        let Some(tail) = text.get(start..) else {
            return Ok(None);
        };
        for (offset, _) in tail.char_indices() {
            if let Some(found) = self.match_here(text, start + offset) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

/// The char at byte offset `pos` and the offset just past it.
fn peek(text: &str, pos: usize) -> Option<(char, usize)> {
    let c = text.get(pos..)?.chars().next()?;
    Some((c, pos + c.len_utf8()))
}

fn take_if(text: &str, pos: usize, pred: impl Fn(char) -> bool) -> Option<usize> {
    peek(text, pos).and_then(|(c, next)| pred(c).then_some(next))
}

/// End offsets after taking 0, 1 and 2 signs/marks from `pos`.
fn sign_ends(text: &str, pos: usize) -> Vec<usize> {
    let mut ends = vec![pos];
    let mut p = pos;
    while ends.len() < 3 {
        match take_if(text, p, is_sign_or_mark) {
            Some(next) => {
                ends.push(next);
                p = next;
            }
            None => break,
        }
    }
    ends
}

/// One `virama ZWJ? consonant` link.
fn chain_link(text: &str, pos: usize) -> Option<usize> {
    let p = take_if(text, pos, |c| c == VIRAMA)?;
    let p = take_if(text, p, |c| c == ZWJ).unwrap_or(p);
    take_if(text, p, is_kannada_consonant)
}

/// As many chain links as possible from `pos`.
fn chain_end(text: &str, pos: usize) -> usize {
    let mut p = pos;
    while let Some(next) = chain_link(text, p) {
        p = next;
    }
    p
}

fn vowel_plus_mark(text: &str, at: usize) -> Option<Found<'_>> {
    let v_end = take_if(text, at, is_independent_vowel)?;
    let end = take_if(text, v_end, is_anusvara_or_visarga)?;
    Some(Found {
        start: at,
        end,
        groups: ClusterMatch {
            v: &text[at..v_end],
            av: &text[v_end..end],
            ..Default::default()
        },
    })
}

fn consonant_plus_vowel(text: &str, at: usize) -> Option<Found<'_>> {
    let base_end = take_if(text, at, is_kannada_consonant)?;
    let ends = sign_ends(text, base_end);
    // Prefer two signs, but a match may not run into a virama or joiner.
    for &end in ends.iter().skip(1).rev() {
        let blocked = peek(text, end).is_some_and(|(c, _)| c == VIRAMA || c == ZWJ);
        if !blocked {
            return Some(Found {
                start: at,
                end,
                groups: ClusterMatch {
                    base: &text[at..base_end],
                    dv: &text[base_end..end],
                    ..Default::default()
                },
            });
        }
    }
    None
}

fn vattakshara_chain(text: &str, at: usize) -> Option<Found<'_>> {
    let base_end = take_if(text, at, is_kannada_consonant)?;
    let chain_stop = chain_end(text, base_end);
    if chain_stop == base_end {
        return None;
    }
    let end = sign_ends(text, chain_stop).last().copied().unwrap_or(chain_stop);
    Some(Found {
        start: at,
        end,
        groups: ClusterMatch {
            base: &text[at..base_end],
            chain: &text[base_end..chain_stop],
            dv: &text[chain_stop..end],
            ..Default::default()
        },
    })
}

fn reph_without_joiner(text: &str, at: usize) -> Option<Found<'_>> {
    let p = take_if(text, at, |c| c == RA)?;
    let p = take_if(text, p, |c| c == VIRAMA)?;
    let cons_start = take_if(text, p, |c| c == VIRAMA)?;
    let p = take_if(text, cons_start, |c| c == ZWJ).unwrap_or(cons_start);
    let cons_end = take_if(text, p, is_kannada_consonant)?;
    let rest_end = chain_end(text, cons_end);
    let end = sign_ends(text, rest_end).last().copied().unwrap_or(rest_end);
    Some(Found {
        start: at,
        end,
        groups: ClusterMatch {
            base_vatta_cons: &text[cons_start..cons_end],
            rest_chain: &text[cons_end..rest_end],
            dv: &text[rest_end..end],
            ..Default::default()
        },
    })
}

// ---------------------------------------------------------------------------
// Regex-backed matcher
// ---------------------------------------------------------------------------

/// A table-supplied pattern. Named groups follow the built-in shapes:
/// `v`, `av`, `base`, `dv`, `chain`, `baseVattaCons`, `restChain`.
#[derive(Debug)]
pub struct RegexMatcher {
    kind: PatternKind,
    re: Regex,
}

impl RegexMatcher {
    pub fn new(kind: PatternKind, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            kind,
            re: Regex::new(pattern)?,
        })
    }
}

impl ClusterMatcher for RegexMatcher {
    fn kind(&self) -> PatternKind {
        self.kind
    }

    fn find_at<'t>(
        &self,
        text: &'t str,
        start: usize,
    ) -> Result<Option<Found<'t>>, ConvertError> {
        if start > text.len() {
            return Ok(None);
        }
        let Some(caps) = self.re.captures_at(text, start) else {
            return Ok(None);
        };
        for &group in self.kind.required_groups() {
            if caps.name(group).is_none() {
                return Err(ConvertError::MissingCapture {
                    pattern: self.kind.name(),
                    group,
                });
            }
        }
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());
        let Some(whole) = caps.get(0) else {
            return Ok(None);
        };
        Ok(Some(Found {
            start: whole.start(),
            end: whole.end(),
            groups: ClusterMatch {
                v: group("v"),
                av: group("av"),
                base: group("base"),
                dv: group("dv"),
                chain: group("chain"),
                base_vatta_cons: group("baseVattaCons"),
                rest_chain: group("restChain"),
            },
        }))
    }
}

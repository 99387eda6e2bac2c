use std::collections::BTreeMap;
use std::process;

use serde::{Deserialize, Serialize};

use nudi_core::{Direction, Transliterator};

use super::{read_file, CliError};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Deserialize)]
pub struct AccuracyCorpus {
    pub cases: Vec<AccuracyCase>,
}

#[derive(Debug, Deserialize)]
pub struct AccuracyCase {
    pub input: String,
    pub expected: String,
    pub direction: Direction,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccuracyResult {
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub direction: Direction,
    pub status: AccuracyStatus,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyStatus {
    Pass,
    Fail,
    Skip,
}

#[derive(Debug, Serialize)]
pub struct AccuracySummary {
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
    pub pass_rate: String,
}

#[derive(Debug, Serialize)]
pub struct AccuracyReport {
    pub results: Vec<AccuracyResult>,
    pub summary: AccuracySummary,
}

/// Case filters from the command line.
#[derive(Debug, Default)]
pub struct CaseFilter {
    pub tag: Option<String>,
    pub category: Option<String>,
}

impl CaseFilter {
    fn matches(&self, case: &AccuracyCase) -> bool {
        if let Some(ref t) = self.tag {
            if !case.tags.contains(t) {
                return false;
            }
        }
        if let Some(ref cat) = self.category {
            if case.category != *cat {
                return false;
            }
        }
        true
    }
}

pub fn parse_corpus(content: &str, path: &str) -> Result<AccuracyCorpus, CliError> {
    toml::from_str(content).map_err(|source| CliError::Corpus {
        path: path.to_string(),
        source,
    })
}

/// Run every case `filter` selects. A conversion error counts as a failure.
pub fn run_corpus(t: &Transliterator, corpus: &AccuracyCorpus, filter: &CaseFilter) -> AccuracyReport {
    let mut results = Vec::new();
    for case in corpus.cases.iter().filter(|c| filter.matches(c)) {
        let mut result = AccuracyResult {
            input: case.input.clone(),
            expected: case.expected.clone(),
            actual: String::new(),
            direction: case.direction,
            status: AccuracyStatus::Skip,
            category: case.category.clone(),
            error: None,
            note: case.note.clone(),
        };
        if !case.skip {
            match t.try_convert(case.direction, &case.input) {
                Ok(actual) => {
                    result.status = if actual == case.expected {
                        AccuracyStatus::Pass
                    } else {
                        AccuracyStatus::Fail
                    };
                    result.actual = actual;
                }
                Err(e) => {
                    result.status = AccuracyStatus::Fail;
                    result.error = Some(e.to_string());
                }
            }
        }
        results.push(result);
    }

    let count = |status| results.iter().filter(|r| r.status == status).count();
    let pass = count(AccuracyStatus::Pass);
    let fail = count(AccuracyStatus::Fail);
    let skip = count(AccuracyStatus::Skip);
    let total = results.len();
    let tested = total - skip;
    let rate = if tested > 0 {
        pass as f64 / tested as f64 * 100.0
    } else {
        0.0
    };
    AccuracyReport {
        summary: AccuracySummary {
            total,
            pass,
            fail,
            skip,
            pass_rate: format!("{:.1}%", rate),
        },
        results,
    }
}

/// Render a report grouped by category. Passing cases only with `verbose`.
pub fn format_report(report: &AccuracyReport, verbose: bool) -> String {
    let mut out = String::new();
    let mut grouped: BTreeMap<&str, Vec<&AccuracyResult>> = BTreeMap::new();
    for r in &report.results {
        grouped.entry(&r.category).or_default().push(r);
    }

    for (cat, group) in &grouped {
        out.push_str(&format!("\n=== {} ({} cases) ===\n", cat, group.len()));
        for r in group {
            match r.status {
                AccuracyStatus::Pass => {
                    if verbose {
                        out.push_str(&format!(
                            "  \u{2713} [{}] {} \u{2192} {}\n",
                            r.direction, r.input, r.expected
                        ));
                    }
                }
                AccuracyStatus::Fail => {
                    let got = r.error.as_deref().unwrap_or(&r.actual);
                    out.push_str(&format!(
                        "  \u{2717} [{}] {} \u{2192} {} (got: {})\n",
                        r.direction, r.input, r.expected, got
                    ));
                }
                AccuracyStatus::Skip => {
                    let reason = r.note.as_deref().unwrap_or("known failure");
                    out.push_str(&format!("  - [{}] {} [skip: {}]\n", r.direction, r.input, reason));
                }
            }
        }
    }

    let s = &report.summary;
    out.push_str("\n=== Summary ===\n");
    out.push_str(&format!("  Total:     {}\n", s.total));
    out.push_str(&format!("  Pass:      {:>3}\n", s.pass));
    out.push_str(&format!("  Fail:      {:>3}\n", s.fail));
    out.push_str(&format!("  Skip:      {:>3}\n", s.skip));
    out.push_str(&format!(
        "  Pass rate: {} ({}/{})\n",
        s.pass_rate,
        s.pass,
        s.total - s.skip
    ));
    out
}

pub struct AccuracyOptions<'a> {
    pub filter: CaseFilter,
    pub forward_rules: Option<&'a str>,
    pub reverse_rules: Option<&'a str>,
    pub verbose: bool,
    pub json: bool,
}

pub fn accuracy_cmd(corpus_file: &str, opts: AccuracyOptions<'_>) {
    let content = die!(read_file(corpus_file), "Error reading corpus: {}");
    let corpus = die!(parse_corpus(&content, corpus_file), "Failed to parse corpus TOML: {}");

    let t = Transliterator::new();
    for (direction, rules) in [
        (Direction::Forward, opts.forward_rules),
        (Direction::Reverse, opts.reverse_rules),
    ] {
        if let Some(path) = rules {
            let json = die!(read_file(path), "Error reading rules: {}");
            die!(t.init_custom(direction, json), "Error loading {path}: {}");
        }
    }

    let report = run_corpus(&t, &corpus, &opts.filter);
    if report.results.is_empty() {
        eprintln!("No cases match the given filters");
        process::exit(1);
    }

    if opts.json {
        let out = die!(serde_json::to_string_pretty(&report), "JSON serialization failed: {}");
        println!("{out}");
    } else {
        print!("{}", format_report(&report, opts.verbose));
    }

    if report.summary.fail > 0 {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = r#"
[[cases]]
input = "PÀ£ÀßqÀ"
expected = "ಕನ್ನಡ"
direction = "forward"
category = "word"
tags = ["basic"]

[[cases]]
input = "ಕನ್ನಡ"
expected = "PÀ£ÀßqÀ"
direction = "u2a"
category = "word"
tags = ["basic"]

[[cases]]
input = "PÀ"
expected = "ಖ"
direction = "forward"
category = "consonant"

[[cases]]
input = "ಕ್ತೆ"
expected = "?"
direction = "reverse"
category = "conjunct"
skip = true
note = "pending"
"#;

    fn corpus() -> AccuracyCorpus {
        parse_corpus(CORPUS, "inline").unwrap()
    }

    #[test]
    fn test_run_all_cases() {
        let report = run_corpus(&Transliterator::new(), &corpus(), &CaseFilter::default());
        assert_eq!(report.summary.total, 4);
        assert_eq!(report.summary.pass, 2);
        assert_eq!(report.summary.fail, 1);
        assert_eq!(report.summary.skip, 1);
        assert_eq!(report.summary.pass_rate, "66.7%");
        assert_eq!(report.results[2].actual, "ಕ");
        assert_eq!(report.results[3].actual, "");
    }

    #[test]
    fn test_filter_by_tag_and_category() {
        let t = Transliterator::new();
        let by_tag = CaseFilter {
            tag: Some("basic".to_string()),
            category: None,
        };
        assert_eq!(run_corpus(&t, &corpus(), &by_tag).summary.total, 2);

        let by_category = CaseFilter {
            tag: None,
            category: Some("consonant".to_string()),
        };
        let report = run_corpus(&t, &corpus(), &by_category);
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.fail, 1);
    }

    #[test]
    fn test_format_report() {
        let report = run_corpus(&Transliterator::new(), &corpus(), &CaseFilter::default());
        let quiet = format_report(&report, false);
        assert!(quiet.contains("=== consonant (1 cases) ==="));
        assert!(quiet.contains("(got: ಕ)"));
        assert!(quiet.contains("[skip: pending]"));
        assert!(!quiet.contains('\u{2713}'));
        assert!(format_report(&report, true).contains('\u{2713}'));
    }

    #[test]
    fn test_report_json() {
        let report = run_corpus(&Transliterator::new(), &corpus(), &CaseFilter::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["status"], "pass");
        assert_eq!(json["results"][1]["direction"], "reverse");
        assert_eq!(json["results"][3]["status"], "skip");
        assert!(json["results"][0].get("error").is_none());
    }

    #[test]
    fn test_bad_direction_rejected() {
        let bad = r#"
[[cases]]
input = "a"
expected = "b"
direction = "sideways"
category = "x"
"#;
        assert!(matches!(
            parse_corpus(bad, "bad.toml"),
            Err(CliError::Corpus { .. })
        ));
    }

    #[test]
    fn test_sample_corpus_parses() {
        let content = include_str!("../../corpus/accuracy.toml");
        let corpus = parse_corpus(content, "accuracy.toml").unwrap();
        assert!(!corpus.cases.is_empty());
    }
}

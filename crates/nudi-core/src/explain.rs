use serde::Serialize;

use crate::rules::{Direction, RuleTable};
use crate::{forward, reverse, ConvertError};

/// Every intermediate result of one conversion.
#[derive(Debug, Serialize)]
pub struct ExplainResult {
    pub direction: String,
    pub input: String,
    pub stages: Vec<ExplainStage>,
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct ExplainStage {
    pub name: &'static str,
    pub text: String,
}

pub fn explain_forward(text: &str, table: &RuleTable) -> ExplainResult {
    let mut stages = Vec::new();
    let output = forward::run(text, table, |name, t| {
        stages.push(ExplainStage {
            name,
            text: t.to_string(),
        })
    });
    ExplainResult {
        direction: Direction::Forward.name().to_string(),
        input: text.to_string(),
        stages,
        output,
    }
}

pub fn explain_reverse(text: &str, table: &RuleTable) -> Result<ExplainResult, ConvertError> {
    let mut stages = Vec::new();
    let output = reverse::run(text, table, |name, t| {
        stages.push(ExplainStage {
            name,
            text: t.to_string(),
        })
    })?;
    Ok(ExplainResult {
        direction: Direction::Reverse.name().to_string(),
        input: text.to_string(),
        stages,
        output,
    })
}

/// Format an ExplainResult as human-readable text, one stage per line
/// followed by its code points.
pub fn format_text(result: &ExplainResult) -> String {
    use unicode_width::UnicodeWidthStr;

    let mut out = String::new();
    out.push_str(&format!(
        "=== {} \"{}\" ({} chars) ===\n",
        result.direction,
        result.input,
        result.input.chars().count(),
    ));

    let pad_width = result
        .stages
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0);
    for stage in &result.stages {
        out.push_str(&format!(
            "  {:<pad$}  {}\n",
            stage.name,
            stage.text,
            pad = pad_width
        ));
        let width = UnicodeWidthStr::width(stage.text.as_str());
        let codepoints: Vec<String> = stage
            .text
            .chars()
            .map(|c| format!("{:04X}", c as u32))
            .collect();
        out.push_str(&format!(
            "  {:<pad$}  [{}] width={}\n",
            "",
            codepoints.join(" "),
            width,
            pad = pad_width
        ));
    }
    out.push_str(&format!("-> {}\n", result.output));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_forward_stages() {
        let table = RuleTable::embedded(Direction::Forward).unwrap();
        let result = explain_forward("QÛ", &table);
        let names: Vec<&str> = result.stages.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "pre_normalize",
                "pre_insert_zwnj",
                "tokenize",
                "post_process_clusters",
                "post_fixups",
                "nfc"
            ]
        );
        assert_eq!(result.stages[2].text, "ಕಿ್ತ");
        assert_eq!(result.output, "ಕ್ತಿ");
        assert_eq!(result.output, forward::convert("QÛ", &table));
    }

    #[test]
    fn test_explain_reverse_stages() {
        let table = RuleTable::embedded(Direction::Reverse).unwrap();
        let result = explain_reverse("ಕ್ತೆ", &table).unwrap();
        assert_eq!(result.stages[0].name, "words");
        assert_eq!(result.stages[0].text, "PÉÛ");
        assert_eq!(result.output, "PÛÉ");
    }

    #[test]
    fn test_explain_empty() {
        let table = RuleTable::embedded(Direction::Forward).unwrap();
        let result = explain_forward("", &table);
        assert!(result.stages.is_empty());
        assert_eq!(result.output, "");
    }

    #[test]
    fn test_format_text() {
        let table = RuleTable::embedded(Direction::Forward).unwrap();
        let text = format_text(&explain_forward("PÀ", &table));
        assert!(text.starts_with("=== forward \"PÀ\" (2 chars) ==="));
        assert!(text.contains("tokenize"));
        assert!(text.contains("0C95"));
        assert!(text.ends_with("-> ಕ\n"));
    }

    #[test]
    fn test_serialize_json() {
        let table = RuleTable::embedded(Direction::Forward).unwrap();
        let json = serde_json::to_value(explain_forward("PÀ", &table)).unwrap();
        assert_eq!(json["direction"], "forward");
        assert_eq!(json["output"], "ಕ");
        assert!(json["stages"].as_array().unwrap().len() >= 5);
    }
}

use std::fs;
use std::process;

use nudi_core::explain::{explain_forward, explain_reverse, format_text};
use nudi_core::{Direction, Transliterator};

use super::{read_file, transliterator, CliError};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Character counts of one file conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub input_chars: usize,
    pub output_chars: usize,
}

pub fn convert_cmd(direction: Direction, text: &str, rules: Option<&str>) {
    let t = die!(transliterator(direction, rules), "Error loading rules: {}");
    let out = die!(t.try_convert(direction, text), "Error: {}");
    println!("{out}");
}

/// Convert the whole content of `input` and write it to `output`.
pub fn convert_file(
    t: &Transliterator,
    direction: Direction,
    input: &str,
    output: &str,
) -> Result<FileStats, CliError> {
    let content = read_file(input)?;
    let converted = t.try_convert(direction, &content)?;
    fs::write(output, &converted).map_err(|source| CliError::Io {
        path: output.to_string(),
        source,
    })?;
    Ok(FileStats {
        input_chars: content.chars().count(),
        output_chars: converted.chars().count(),
    })
}

pub fn file_cmd(direction: Direction, input: &str, output: &str, rules: Option<&str>) {
    let t = die!(transliterator(direction, rules), "Error loading rules: {}");
    let stats = die!(convert_file(&t, direction, input, output), "Error: {}");
    eprintln!(
        "{direction}: {input} ({} chars) -> {output} ({} chars)",
        stats.input_chars, stats.output_chars
    );
}

pub fn explain_cmd(direction: Direction, text: &str, rules: Option<&str>, json: bool) {
    let t = die!(transliterator(direction, rules), "Error loading rules: {}");
    let table = die!(t.table(direction), "Error loading rules: {}");
    let result = match direction {
        Direction::Forward => explain_forward(text, table),
        Direction::Reverse => die!(explain_reverse(text, table), "Error: {}"),
    };
    if json {
        let out = die!(serde_json::to_string_pretty(&result), "JSON serialization failed: {}");
        println!("{out}");
    } else {
        print!("{}", format_text(&result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_str(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_convert_file_forward() {
        let dir = tempfile::tempdir().unwrap();
        let input = path_str(&dir, "in.txt");
        let output = path_str(&dir, "out.txt");
        fs::write(&input, "PÀ£ÀßqÀ\nPÀ£ÀßqÀ").unwrap();

        let t = Transliterator::new();
        let stats = convert_file(&t, Direction::Forward, &input, &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "ಕನ್ನಡ\nಕನ್ನಡ");
        assert_eq!(stats.input_chars, 15);
        assert_eq!(stats.output_chars, 11);
    }

    #[test]
    fn test_convert_file_reverse() {
        let dir = tempfile::tempdir().unwrap();
        let input = path_str(&dir, "in.txt");
        let output = path_str(&dir, "out.txt");
        fs::write(&input, "ಕನ್ನಡ ೧೨").unwrap();

        let t = Transliterator::new();
        convert_file(&t, Direction::Reverse, &input, &output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "PÀ£ÀßqÀ 12");
    }

    #[test]
    fn test_convert_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let t = Transliterator::new();
        let err = convert_file(
            &t,
            Direction::Forward,
            &path_str(&dir, "missing.txt"),
            &path_str(&dir, "out.txt"),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
        assert!(!dir.path().join("out.txt").exists());
    }

    #[test]
    fn test_custom_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let rules = path_str(&dir, "rules.json");
        fs::write(&rules, r#"{"meta": {}, "tokenMapping": {"k": "ಕ"}}"#).unwrap();

        let t = transliterator(Direction::Forward, Some(&rules)).unwrap();
        assert_eq!(t.convert_forward("kx"), "ಕx");
    }

    #[test]
    fn test_invalid_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let rules = path_str(&dir, "rules.json");
        fs::write(&rules, "{not json").unwrap();

        let err = transliterator(Direction::Reverse, Some(&rules)).unwrap_err();
        assert!(matches!(err, CliError::Rules { .. }));
    }
}

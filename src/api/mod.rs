//! UniFFI export layer for host applications (keyboards, editor shells).
//!
//! The free functions use the process-wide rule tables; `NudiConverter`
//! carries its own.

mod converter;
mod types;

pub use converter::NudiConverter;
pub use types::{NudiDirection, NudiError, NudiExplain, NudiStage};

use std::path::Path;

use nudi_core::explain::{explain_forward, explain_reverse};
use nudi_core::rules::RuleTable;
use nudi_core::{Direction, Transliterator};

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn convert_forward(text: String) -> String {
    nudi_core::convert_forward(&text)
}

#[uniffi::export]
fn convert_reverse(text: String) -> String {
    nudi_core::convert_reverse(&text)
}

#[uniffi::export]
fn rules_load_config(direction: NudiDirection, path: String) -> Result<(), NudiError> {
    let json = read_config(&path)?;
    nudi_core::init_custom(direction.into(), json)
        .map_err(|e| NudiError::InvalidData { msg: e.to_string() })?;
    Ok(())
}

#[uniffi::export]
fn rules_default_config(direction: NudiDirection) -> String {
    Direction::from(direction).default_json().to_string()
}

#[uniffi::export]
fn explain(direction: NudiDirection, text: String) -> Result<NudiExplain, NudiError> {
    let direction: Direction = direction.into();
    let table = Transliterator::global()
        .table(direction)
        .map_err(|e| NudiError::InvalidData { msg: e.to_string() })?;
    explain_with(direction, table, &text)
}

#[uniffi::export]
fn init_tracing(log_dir: String) -> Result<(), NudiError> {
    crate::trace_init::init_tracing(Path::new(&log_dir)).map_err(|e| NudiError::Io {
        msg: format!("{log_dir}: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_config(path: &str) -> Result<String, NudiError> {
    std::fs::read_to_string(path).map_err(|e| NudiError::Io {
        msg: format!("{path}: {e}"),
    })
}

fn explain_with(
    direction: Direction,
    table: &RuleTable,
    text: &str,
) -> Result<NudiExplain, NudiError> {
    let result = match direction {
        Direction::Forward => explain_forward(text, table),
        Direction::Reverse => explain_reverse(text, table)
            .map_err(|e| NudiError::InvalidData { msg: e.to_string() })?,
    };
    Ok(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        assert_eq!(engine_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_free_functions() {
        assert_eq!(convert_forward("PÀ£ÀßqÀ".to_string()), "ಕನ್ನಡ");
        assert_eq!(convert_reverse("ಕನ್ನಡ".to_string()), "PÀ£ÀßqÀ");
    }

    #[test]
    fn test_default_config_is_json() {
        let json = rules_default_config(NudiDirection::Reverse);
        assert!(RuleTable::from_json(&json, Direction::Reverse).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = rules_load_config(
            NudiDirection::Forward,
            "/nonexistent/forward.json".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, NudiError::Io { .. }));
    }

    #[test]
    fn test_converter_with_custom_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forward.json");
        std::fs::write(&path, r#"{"meta": {}, "tokenMapping": {"k": "ಕ"}}"#).unwrap();

        let conv =
            NudiConverter::new(Some(path.to_string_lossy().into_owned()), None).unwrap();
        assert_eq!(conv.convert(NudiDirection::Forward, "kk".to_string()), "ಕಕ");
        assert_eq!(conv.convert(NudiDirection::Reverse, "ಕ".to_string()), "PÀ");
    }

    #[test]
    fn test_converter_rejects_bad_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reverse.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = NudiConverter::new(None, Some(path.to_string_lossy().into_owned()));
        assert!(matches!(err, Err(NudiError::InvalidData { .. })));
    }

    #[test]
    fn test_converter_explain_reverse() {
        let conv = NudiConverter::new(None, None).unwrap();
        let e = conv
            .explain(NudiDirection::Reverse, "ಕ್ತೆ".to_string())
            .unwrap();
        assert_eq!(e.output, "PÛÉ");
    }

    #[test]
    fn test_init_tracing_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs").join("nudi");
        let path = logs.to_string_lossy().into_owned();
        init_tracing(path.clone()).unwrap();
        init_tracing(path).unwrap();
        assert_eq!(logs.is_dir(), cfg!(feature = "trace"));
    }

    #[test]
    fn test_explain_record() {
        let e = explain(NudiDirection::Forward, "QÛ".to_string()).unwrap();
        assert_eq!(e.output, "ಕ್ತಿ");
        assert!(e.stages.iter().any(|s| s.name == "tokenize"));
    }
}

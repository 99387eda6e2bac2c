pub mod accuracy_ops;
pub mod convert_ops;
pub mod rules_ops;

use std::fs;

use nudi_core::{Direction, Transliterator};

/// Failures shared by the subcommands before they reach `die!`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Rules {
        path: String,
        source: nudi_core::RuleTableError,
    },
    #[error(transparent)]
    Convert(#[from] nudi_core::ConvertError),
    #[error("{path}: {source}")]
    Corpus {
        path: String,
        source: toml::de::Error,
    },
}

pub(crate) fn read_file(path: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })
}

/// A private transliterator, with `rules` (if any) registered for `direction`.
pub fn transliterator(direction: Direction, rules: Option<&str>) -> Result<Transliterator, CliError> {
    let t = Transliterator::new();
    if let Some(path) = rules {
        let json = read_file(path)?;
        t.init_custom(direction, json)
            .map_err(|source| CliError::Rules {
                path: path.to_string(),
                source,
            })?;
    }
    Ok(t)
}

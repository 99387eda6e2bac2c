//! Conversion between legacy Nudi/Baraha visual ASCII and Unicode Kannada.
//!
//! Both directions are driven by a [`rules::RuleTable`]; [`engine`] owns
//! the lazily-loaded per-direction tables and the never-fail entry points.

pub mod engine;
pub mod explain;
pub mod forward;
pub mod reverse;
pub mod rules;
pub mod unicode;

pub use engine::{convert_forward, convert_reverse, init_custom, Transliterator};
pub use rules::{Direction, RuleTable, RuleTableError};

/// Failure inside a pipeline. Never escapes the facade in [`engine`].
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("pattern {pattern} matched without capture group {group}")]
    MissingCapture {
        pattern: &'static str,
        group: &'static str,
    },
    #[error("conversion panicked: {0}")]
    Panicked(String),
    #[error("{0} rule table unavailable")]
    Unavailable(Direction),
}

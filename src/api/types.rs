use nudi_core::explain::ExplainResult;
use nudi_core::Direction;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum NudiError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
}

// ---------------------------------------------------------------------------
// Records (value types, copied across FFI boundary)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, uniffi::Record)]
pub struct NudiStage {
    pub name: String,
    pub text: String,
}

#[derive(Clone, Debug, uniffi::Record)]
pub struct NudiExplain {
    pub input: String,
    pub stages: Vec<NudiStage>,
    pub output: String,
}

impl From<ExplainResult> for NudiExplain {
    fn from(r: ExplainResult) -> Self {
        Self {
            input: r.input,
            stages: r
                .stages
                .into_iter()
                .map(|s| NudiStage {
                    name: s.name.to_string(),
                    text: s.text,
                })
                .collect(),
            output: r.output,
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum NudiDirection {
    /// Legacy ASCII → Unicode.
    Forward,
    /// Unicode → legacy ASCII.
    Reverse,
}

impl From<NudiDirection> for Direction {
    fn from(d: NudiDirection) -> Self {
        match d {
            NudiDirection::Forward => Direction::Forward,
            NudiDirection::Reverse => Direction::Reverse,
        }
    }
}

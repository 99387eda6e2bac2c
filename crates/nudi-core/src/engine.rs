//! Conversion facade.
//!
//! - one rule table per direction, built on first use from the embedded
//!   default or from JSON registered with `init_custom` beforehand
//! - `convert_forward` / `convert_reverse` never fail: on any error (or a
//!   panic inside a pipeline) the input comes back unchanged

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{error, warn};

use crate::rules::{Direction, RuleTable, RuleTableError};
use crate::{forward, reverse, ConvertError};

/// Registration state, shared by `init_custom` and the first load so that a
/// table is never built while a registration is in flight.
#[derive(Debug, Default)]
struct Source {
    custom_json: Option<String>,
    /// Set by the first load; registration is closed from then on.
    sealed: bool,
}

#[derive(Debug, Default)]
struct Slot {
    source: Mutex<Source>,
    table: OnceLock<Result<RuleTable, RuleTableError>>,
}

impl Slot {
    const fn new() -> Self {
        Self {
            source: Mutex::new(Source {
                custom_json: None,
                sealed: false,
            }),
            table: OnceLock::new(),
        }
    }

    fn source(&self) -> MutexGuard<'_, Source> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lazily-loaded forward and reverse rule tables.
#[derive(Debug, Default)]
pub struct Transliterator {
    forward: Slot,
    reverse: Slot,
}

static GLOBAL: Transliterator = Transliterator::new();

impl Transliterator {
    pub const fn new() -> Self {
        Self {
            forward: Slot::new(),
            reverse: Slot::new(),
        }
    }

    /// The process-wide instance used by the free functions.
    pub fn global() -> &'static Transliterator {
        &GLOBAL
    }

    fn slot(&self, direction: Direction) -> &Slot {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }

    /// Register a custom JSON table for `direction` before its first use.
    pub fn init_custom(&self, direction: Direction, json: String) -> Result<(), RuleTableError> {
        let mut source = self.slot(direction).source();
        if source.sealed || source.custom_json.is_some() {
            return Err(RuleTableError::AlreadyInitialized(direction));
        }
        // Validate eagerly; a concurrent first load waits on the lock.
        RuleTable::from_json(&json, direction)?;
        source.custom_json = Some(json);
        Ok(())
    }

    /// The table for `direction`, loading it on first call.
    pub fn table(&self, direction: Direction) -> Result<&RuleTable, &RuleTableError> {
        let slot = self.slot(direction);
        slot.table
            .get_or_init(|| {
                let mut source = slot.source();
                source.sealed = true;
                let table = match source.custom_json.as_deref() {
                    Some(json) => RuleTable::from_json(json, direction),
                    None => RuleTable::embedded(direction),
                };
                if let Err(e) = &table {
                    error!(direction = direction.name(), error = %e, "rule table failed to load");
                }
                table
            })
            .as_ref()
    }

    /// Run one pipeline, turning a missing table or a panic into an error.
    pub fn try_convert(&self, direction: Direction, text: &str) -> Result<String, ConvertError> {
        let table = self
            .table(direction)
            .map_err(|_| ConvertError::Unavailable(direction))?;
        let result = catch_unwind(AssertUnwindSafe(|| match direction {
            Direction::Forward => Ok(forward::convert(text, table)),
            Direction::Reverse => reverse::convert(text, table),
        }));
        result.unwrap_or_else(|payload| Err(ConvertError::Panicked(panic_message(&*payload))))
    }

    /// Convert, returning `text` unchanged on failure.
    pub fn convert(&self, direction: Direction, text: &str) -> String {
        match self.try_convert(direction, text) {
            Ok(out) => out,
            Err(e) => {
                warn!(direction = direction.name(), error = %e, "conversion failed, returning input");
                text.to_string()
            }
        }
    }

    pub fn convert_forward(&self, text: &str) -> String {
        self.convert(Direction::Forward, text)
    }

    pub fn convert_reverse(&self, text: &str) -> String {
        self.convert(Direction::Reverse, text)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Register a custom table for the global instance.
pub fn init_custom(direction: Direction, json: String) -> Result<(), RuleTableError> {
    GLOBAL.init_custom(direction, json)
}

/// Legacy ASCII → Unicode with the global tables. Never fails.
pub fn convert_forward(text: &str) -> String {
    GLOBAL.convert_forward(text)
}

/// Unicode → legacy ASCII with the global tables. Never fails.
pub fn convert_reverse(text: &str) -> String {
    GLOBAL.convert_reverse(text)
}

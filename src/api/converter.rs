use std::sync::Arc;

use nudi_core::{Direction, Transliterator};

use super::{read_config, NudiDirection, NudiError, NudiExplain};

/// A converter with its own rule tables, independent of the global ones.
#[derive(uniffi::Object)]
pub struct NudiConverter {
    inner: Transliterator,
}

#[uniffi::export]
impl NudiConverter {
    /// Tables not given by path fall back to the embedded defaults.
    #[uniffi::constructor]
    pub fn new(
        forward_path: Option<String>,
        reverse_path: Option<String>,
    ) -> Result<Arc<Self>, NudiError> {
        let inner = Transliterator::new();
        for (direction, path) in [
            (Direction::Forward, forward_path),
            (Direction::Reverse, reverse_path),
        ] {
            if let Some(path) = path {
                let json = read_config(&path)?;
                inner
                    .init_custom(direction, json)
                    .map_err(|e| NudiError::InvalidData { msg: e.to_string() })?;
            }
        }
        Ok(Arc::new(Self { inner }))
    }

    pub fn convert(&self, direction: NudiDirection, text: String) -> String {
        self.inner.convert(direction.into(), &text)
    }

    pub fn explain(&self, direction: NudiDirection, text: String) -> Result<NudiExplain, NudiError> {
        let direction: Direction = direction.into();
        let table = self
            .inner
            .table(direction)
            .map_err(|e| NudiError::InvalidData { msg: e.to_string() })?;
        super::explain_with(direction, table, &text)
    }
}

use crate::data_io::output_trait::{ScalarWriter, WriteError};
use crate::diagnostics::ScalarMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// JSON writer for scalar mappings
///
/// Keys keep their mapping order. Non-finite values are written as `null`.
pub struct JsonScalarWriter {
    file_path: String,
    pretty: bool,
}

impl JsonScalarWriter {
    pub fn new(file_path: &Path) -> Result<Self, WriteError> {
        if file_path.as_os_str().is_empty() {
            return Err(WriteError::InvalidData("Empty output path".to_string()));
        }
        Ok(Self {
            file_path: file_path.to_string_lossy().to_string(),
            pretty: false,
        })
    }

    /// Indent the output for reading by eye
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl ScalarWriter for JsonScalarWriter {
    fn write(&mut self, scalars: &ScalarMap) -> Result<(), WriteError> {
        if scalars.is_empty() {
            return Err(WriteError::InvalidData("No scalars to write".to_string()));
        }

        let file = File::create(&self.file_path)
            .map_err(|e| WriteError::IoError(format!("Failed to create JSON file '{}': {}", self.file_path, e)))?;
        let mut out = BufWriter::new(file);

        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut out, scalars)
        } else {
            serde_json::to_writer(&mut out, scalars)
        };
        result.map_err(|e| WriteError::FormatError(e.to_string()))?;
        out.flush().map_err(|e| WriteError::IoError(e.to_string()))?;

        info!("Wrote {} scalars to {}", scalars.len(), self.file_path);
        Ok(())
    }

    fn get_output_path(&self) -> &str {
        &self.file_path
    }
}

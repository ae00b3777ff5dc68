use crate::data_io::output_trait::{ScalarWriter, WriteError};
use crate::diagnostics::ScalarMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// ASCII writer: a comment header, then one `name value` line per scalar
pub struct AsciiScalarWriter {
    file_path: String,
}

impl AsciiScalarWriter {
    pub fn new(file_path: &Path) -> Result<Self, WriteError> {
        Ok(Self {
            file_path: file_path.to_string_lossy().to_string(),
        })
    }
}

impl ScalarWriter for AsciiScalarWriter {
    fn write(&mut self, scalars: &ScalarMap) -> Result<(), WriteError> {
        if scalars.is_empty() {
            return Err(WriteError::InvalidData("No scalars to write".to_string()));
        }

        let mut file = File::create(&self.file_path)
            .map_err(|e| WriteError::IoError(format!("Failed to create ASCII file: {}", e)))?;

        writeln!(file, "# Regional mean diagnostics")
            .map_err(|e| WriteError::IoError(e.to_string()))?;
        writeln!(file, "# Columns: name value")
            .map_err(|e| WriteError::IoError(e.to_string()))?;

        for (name, value) in scalars.iter() {
            writeln!(file, "{} {}", name, value)
                .map_err(|e| WriteError::IoError(e.to_string()))?;
        }

        info!("Wrote {} scalars to ASCII file: {}", scalars.len(), self.file_path);
        Ok(())
    }

    fn get_output_path(&self) -> &str {
        &self.file_path
    }
}

use crate::diagnostics::ScalarMap;
use std::path::Path;

/// Error types for data writing operations
#[derive(Debug, Clone)]
pub enum WriteError {
    IoError(String),
    FormatError(String),
    InvalidData(String),
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteError::IoError(msg) => write!(f, "IO error: {}", msg),
            WriteError::FormatError(msg) => write!(f, "Format error: {}", msg),
            WriteError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
        }
    }
}

impl std::error::Error for WriteError {}

/// Generic trait for persisting a scalar mapping to different formats
pub trait ScalarWriter {
    /// Write the mapping, replacing any existing file
    fn write(&mut self, scalars: &ScalarMap) -> Result<(), WriteError>;

    /// Get the output file path
    fn get_output_path(&self) -> &str;
}

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Ascii,
}

impl OutputFormat {
    /// Detect output format from file extension, JSON unless the extension says otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("txt") | Some("ascii") => OutputFormat::Ascii,
            _ => OutputFormat::Json,
        }
    }

    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Ascii => "txt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Ascii => write!(f, "ascii"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "ascii" | "txt" => Ok(OutputFormat::Ascii),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Factory function to create appropriate writer for the format
pub fn create_writer(output_path: &Path, format: OutputFormat) -> Result<Box<dyn ScalarWriter>, WriteError> {
    match format {
        OutputFormat::Json => Ok(Box::new(crate::data_io::writer::JsonScalarWriter::new(output_path)?.pretty(true))),
        OutputFormat::Ascii => Ok(Box::new(crate::data_io::ascii_writer::AsciiScalarWriter::new(output_path)?)),
    }
}

/// Convenience function to auto-detect format and create writer
pub fn create_writer_auto(output_path: &Path) -> Result<Box<dyn ScalarWriter>, WriteError> {
    let format = OutputFormat::from_path(output_path);
    create_writer(output_path, format)
}

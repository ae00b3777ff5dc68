use crate::data_io::field::{FieldError, GriddedField, RawField};
use crate::time_utils::TimeError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Generic error type for data readers
#[derive(Error, Debug)]
pub enum DataReaderError {
    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("Variable not found: {0}")]
    MissingVariable(String),

    #[error("Group not found: {0}")]
    MissingGroup(String),

    #[error("Dimension not found: {dim} (variable {var})")]
    MissingDimension { var: String, dim: String },

    #[error("Variable {var} has non-singleton dimension {dim} of length {len}")]
    UnexpectedDimension { var: String, dim: String, len: usize },

    #[error("No time steps in {year} for variable {var}")]
    MissingYear { var: String, year: i32 },

    #[error("Data conversion error: {0}")]
    ConversionError(String),

    #[error("Time decoding error for {var}: {source}")]
    Time {
        var: String,
        #[source]
        source: TimeError,
    },

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("No input files: {0}")]
    NoInputFiles(String),
}

/// Metadata about a variable in the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub name: String,
    pub dimensions: Vec<String>,
    pub shape: Vec<usize>,
    pub units: Option<String>,
}

/// Source of labeled gridded fields
///
/// Implemented by the NetCDF readers and by the in-memory dataset used for
/// synthetic inputs. Every field comes back with layout [time, latitude, longitude].
pub trait DataReader {
    /// List all available variables in the dataset
    fn list_variables(&self) -> Result<Vec<String>, DataReaderError>;

    /// Get detailed information about a specific variable
    fn get_variable_info(&self, variable_name: &str) -> Result<VariableInfo, DataReaderError>;

    /// Read a variable without validating its coordinates
    fn read_raw_field(&self, variable_name: &str) -> Result<RawField, DataReaderError>;

    /// Read a variable as a validated gridded field
    fn read_field(&self, variable_name: &str) -> Result<GriddedField, DataReaderError> {
        Ok(self.read_raw_field(variable_name)?.into_field()?)
    }

    /// Check if a variable exists in the dataset
    fn has_variable(&self, variable_name: &str) -> bool {
        self.list_variables()
            .map(|vars| vars.iter().any(|v| v == variable_name))
            .unwrap_or(false)
    }

    /// Get the file path or dataset identifier
    fn get_path(&self) -> Option<PathBuf>;
}

impl<T: DataReader + ?Sized> DataReader for Box<T> {
    fn list_variables(&self) -> Result<Vec<String>, DataReaderError> {
        self.as_ref().list_variables()
    }

    fn get_variable_info(&self, variable_name: &str) -> Result<VariableInfo, DataReaderError> {
        self.as_ref().get_variable_info(variable_name)
    }

    fn read_raw_field(&self, variable_name: &str) -> Result<RawField, DataReaderError> {
        self.as_ref().read_raw_field(variable_name)
    }

    fn get_path(&self) -> Option<PathBuf> {
        self.as_ref().get_path()
    }
}

/// Open a file with format detection
///
/// Only NetCDF (classic and NetCDF-4/HDF5) is supported. Files whose magic
/// bytes are not recognised fall back to the extension check.
pub fn create_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn DataReader>, DataReaderError> {
    let path_ref = path.as_ref();

    if is_netcdf_format(path_ref)? {
        return Ok(Box::new(crate::data_io::NetCDFReader::open(path_ref)?));
    }

    match path_ref.extension().and_then(|ext| ext.to_str()) {
        Some("nc") | Some("nc4") | Some("netcdf") => {
            Ok(Box::new(crate::data_io::NetCDFReader::open(path_ref)?))
        }
        _ => Err(DataReaderError::InvalidFormat(format!(
            "Unable to detect format for file: {:?}",
            path_ref
        ))),
    }
}

/// Check if a file is in NetCDF format by examining magic bytes
///
/// - Classic NetCDF: "CDF\001" or "CDF\002" (and "CDF\005" for CDF-5)
/// - NetCDF-4 (HDF5): "\211HDF\r\n\032\n"
pub fn is_netcdf_format(path: &Path) -> Result<bool, DataReaderError> {
    if !path.exists() {
        return Err(DataReaderError::FileNotFound(path.to_string_lossy().to_string()));
    }

    if path.is_dir() {
        return Ok(false);
    }

    let mut file = File::open(path)?;
    let mut buffer = [0u8; 8];

    match file.read_exact(&mut buffer) {
        Ok(_) => {
            if buffer[0..3] == [b'C', b'D', b'F'] && matches!(buffer[3], 1 | 2 | 5) {
                return Ok(true);
            }

            if buffer == [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1a, b'\n'] {
                return Ok(true);
            }

            Ok(false)
        }
        // File too small - not NetCDF
        Err(_) => Ok(false),
    }
}

use crate::config::ConfigError;
use crate::data_io::WriteError;
use crate::io::DataReaderError;
use thiserror::Error;

/// Top-level error of a diagnostics run
#[derive(Error, Debug)]
pub enum SimObsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] DataReaderError),

    #[error("Output error: {0}")]
    Write(#[from] WriteError),
}

/// Convenience type for `Result<T, SimObsError>`.
pub type SimObsResult<T> = Result<T, SimObsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_the_layer_once() {
        let err = SimObsError::from(ConfigError::MissingKey {
            key: "postProcess".to_string(),
            file: "job.json".to_string(),
        });
        let message = format!("error: {}", err);
        assert!(message.starts_with("error: Configuration error: Need to provide postProcess"));
        assert_eq!(message.matches("error:").count(), 2);

        let err = SimObsError::from(DataReaderError::MissingVariable("toa_sw_all_mon".to_string()));
        assert_eq!(err.to_string(), "Data error: Variable not found: toa_sw_all_mon");
    }
}

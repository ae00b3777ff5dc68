//! Simulated observables from UM output
use super::catalog::{CatalogRules, RegionSet, VariableCatalog};
use super::reducer::reduce_catalog;
use super::result::{RegionalMeansResult, ScalarMap};
use crate::config::{load_post_process_options, ModelConfig};
use crate::data_io::common::{discover_files, select_most_recent};
use crate::data_io::{create_writer_auto, MultiFileReader};
use crate::errors::SimObsResult;
use crate::io::{DataReader, DataReaderError};
use std::path::PathBuf;
use tracing::{debug, info};

/// Reduces a combined block of model output in one pass
#[derive(Debug, Clone)]
pub struct ModelAdapter {
    pub rules: CatalogRules,
    pub regions: RegionSet,
}

impl Default for ModelAdapter {
    fn default() -> Self {
        Self {
            rules: CatalogRules::model(),
            regions: RegionSet::north_to_south(),
        }
    }
}

impl ModelAdapter {
    pub fn reduce(&self, reader: &dyn DataReader) -> Result<RegionalMeansResult, DataReaderError> {
        let catalog = VariableCatalog::resolve(&self.rules, reader)?;
        Ok(reduce_catalog(&catalog, &self.regions))
    }
}

/// Explicit inputs, or the sorted `*.nc` files of the model directory, limited to the most recent
pub fn model_input_files(config: &ModelConfig) -> Result<Vec<PathBuf>, DataReaderError> {
    let files = if config.inputs.is_empty() {
        discover_files(&config.model_dir, "", ".nc")?
    } else {
        config.inputs.clone()
    };
    if files.is_empty() {
        return Err(DataReaderError::NoInputFiles(format!(
            "no *.nc files in {}",
            config.model_dir.display()
        )));
    }
    Ok(select_most_recent(files, config.max_files))
}

/// Run the model pipeline described by `config` and write the result
pub fn run_model_job(config: &ModelConfig) -> SimObsResult<ScalarMap> {
    let options = load_post_process_options(&config.json_file)?;

    let files = model_input_files(config)?;
    info!("Using {} model files", files.len());
    for file in &files {
        debug!("  {}", file.display());
    }

    let reader = MultiFileReader::open(&files)?;
    let scalars = ModelAdapter::default().reduce(&reader)?.to_scalars();

    info!("start_time {}", options.start_time());
    info!("end_time {}", options.end_time());
    debug!("options are: {:?}", options);

    create_writer_auto(&config.output)?.write(&scalars)?;
    Ok(scalars)
}

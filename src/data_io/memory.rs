use super::field::RawField;
use super::utils::{LATITUDE_DIM, LONGITUDE_DIM, TIME_DIM};
use crate::io::{DataReader, DataReaderError, VariableInfo};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// In-memory dataset serving fields through the [`DataReader`] interface
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    fields: BTreeMap<String, RawField>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field keyed by its name
    pub fn insert(&mut self, field: RawField) {
        self.fields.insert(field.name.clone(), field);
    }

    pub fn with_field(mut self, field: RawField) -> Self {
        self.insert(field);
        self
    }
}

impl DataReader for MemoryDataset {
    fn list_variables(&self) -> Result<Vec<String>, DataReaderError> {
        Ok(self.fields.keys().cloned().collect())
    }

    fn get_variable_info(&self, variable_name: &str) -> Result<VariableInfo, DataReaderError> {
        let field = self
            .fields
            .get(variable_name)
            .ok_or_else(|| DataReaderError::MissingVariable(variable_name.to_string()))?;
        Ok(VariableInfo {
            name: field.name.clone(),
            dimensions: vec![TIME_DIM.to_string(), LATITUDE_DIM.to_string(), LONGITUDE_DIM.to_string()],
            shape: field.data.shape().to_vec(),
            units: field.units.clone(),
        })
    }

    fn read_raw_field(&self, variable_name: &str) -> Result<RawField, DataReaderError> {
        self.fields
            .get(variable_name)
            .cloned()
            .ok_or_else(|| DataReaderError::MissingVariable(variable_name.to_string()))
    }

    fn get_path(&self) -> Option<PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::MonthStamp;
    use ndarray::Array3;

    #[test]
    fn test_memory_dataset() {
        let dataset = MemoryDataset::new().with_field(RawField {
            name: "toa_sw_all_mon".to_string(),
            units: Some("W m-2".to_string()),
            times: vec![MonthStamp::new(2013, 1)],
            latitudes: vec![-45.0, 45.0],
            longitudes: vec![0.0],
            data: Array3::from_elem((1, 2, 1), 100.0),
        });

        assert!(dataset.has_variable("toa_sw_all_mon"));
        assert!(!dataset.has_variable("toa_lw_all_mon"));
        assert_eq!(dataset.get_variable_info("toa_sw_all_mon").unwrap().shape, vec![1, 2, 1]);
        assert!(dataset.read_field("toa_sw_all_mon").is_ok());
        assert!(matches!(
            dataset.read_field("toa_lw_all_mon"),
            Err(DataReaderError::MissingVariable(_))
        ));
    }
}

use super::common::open_netcdf_file;
use super::field::RawField;
use super::utils::{
    attribute_as_f64, attribute_as_string, is_grid_dimension, Packing, LATITUDE_DIM, LONGITUDE_DIM, TIME_DIM,
};
use crate::io::{is_netcdf_format, DataReader, DataReaderError, VariableInfo};
use crate::time_utils::{decode_cf_times, Calendar, MonthStamp};
use ndarray::{ArrayD, Axis, Ix3, IxDyn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A variable as stored on disk, unpacked to f64 with fill values masked
#[derive(Debug, Clone)]
struct RawVariable {
    name: String,
    dimensions: Vec<(String, usize)>,
    values: Vec<f64>,
    units: Option<String>,
    calendar: Option<String>,
}

impl RawVariable {
    fn load(var: &netcdf::Variable) -> Result<Self, DataReaderError> {
        let dimensions = var
            .dimensions()
            .iter()
            .map(|d| (d.name(), d.len()))
            .collect::<Vec<_>>();

        let packing = Packing {
            fill_value: numeric_attribute(var, "_FillValue")?,
            missing_value: numeric_attribute(var, "missing_value")?,
            scale_factor: numeric_attribute(var, "scale_factor")?,
            add_offset: numeric_attribute(var, "add_offset")?,
        };

        let raw_data: Vec<f64> = var.get_values(..)?;
        let values = if packing.is_identity() {
            raw_data
        } else {
            raw_data.into_iter().map(|v| packing.decode(v)).collect()
        };

        Ok(Self {
            name: var.name(),
            dimensions,
            values,
            units: string_attribute(var, "units")?,
            calendar: string_attribute(var, "calendar")?,
        })
    }
}

fn numeric_attribute(var: &netcdf::Variable, name: &str) -> Result<Option<f64>, DataReaderError> {
    match var.attribute(name) {
        Some(attr) => Ok(attribute_as_f64(&attr.value()?)),
        None => Ok(None),
    }
}

fn string_attribute(var: &netcdf::Variable, name: &str) -> Result<Option<String>, DataReaderError> {
    match var.attribute(name) {
        Some(attr) => Ok(attribute_as_string(&attr.value()?)),
        None => Ok(None),
    }
}

/// NetCDF reader producing [time, latitude, longitude] fields
///
/// Variables are looked up in `group` first (when set) and then in the root
/// group. Dimension names are mapped through `renames` onto the canonical
/// `time`/`latitude`/`longitude`; any other dimension must have length 1 and
/// is squeezed. Variables without a time dimension get one synthetic step.
#[derive(Debug, Clone)]
pub struct NetCDFReader {
    pub file_path: PathBuf,
    pub group: Option<String>,
    pub renames: HashMap<String, String>,
}

impl NetCDFReader {
    /// Open a NetCDF file for reading
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self, DataReaderError> {
        let file_path = file_path.as_ref().to_path_buf();
        if !is_netcdf_format(&file_path)? {
            return Err(DataReaderError::InvalidFormat(format!(
                "Not a NetCDF file: {}",
                file_path.display()
            )));
        }
        Ok(Self {
            file_path,
            group: None,
            renames: HashMap::new(),
        })
    }

    /// Look variables up in a named group before the root group
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Map on-disk dimension names onto canonical ones, e.g. `lat -> latitude`
    pub fn with_renames(mut self, renames: &[(&str, &str)]) -> Self {
        for (from, to) in renames {
            self.renames.insert(from.to_string(), to.to_string());
        }
        self
    }

    fn canonical_name(&self, name: &str) -> String {
        self.renames.get(name).cloned().unwrap_or_else(|| name.to_string())
    }

    fn with_variable<R, F>(&self, file: &netcdf::File, name: &str, f: F) -> Result<R, DataReaderError>
    where
        F: FnOnce(&netcdf::Variable) -> Result<R, DataReaderError>,
    {
        if let Some(group_name) = &self.group {
            let group = file
                .group(group_name)?
                .ok_or_else(|| DataReaderError::MissingGroup(group_name.clone()))?;
            if let Some(var) = group.variable(name) {
                return f(&var);
            }
        }

        let var = file
            .variable(name)
            .ok_or_else(|| DataReaderError::MissingVariable(name.to_string()))?;
        f(&var)
    }

    /// On-disk name of the dimension that maps onto `canonical`
    fn source_dimension<'a>(&self, variable: &'a RawVariable, canonical: &str) -> Option<&'a str> {
        variable
            .dimensions
            .iter()
            .map(|(name, _)| name.as_str())
            .find(|name| self.canonical_name(name) == canonical)
    }

    fn read_coordinate(
        &self,
        file: &netcdf::File,
        variable: &RawVariable,
        canonical: &str,
    ) -> Result<RawVariable, DataReaderError> {
        let dim = self
            .source_dimension(variable, canonical)
            .ok_or_else(|| DataReaderError::MissingDimension {
                var: variable.name.clone(),
                dim: canonical.to_string(),
            })?;
        self.with_variable(file, dim, RawVariable::load)
    }

    /// Coordinate values along a grid axis, the row index when the file has no coordinate variable
    fn read_axis(&self, file: &netcdf::File, variable: &RawVariable, canonical: &str) -> Result<Vec<f64>, DataReaderError> {
        match self.read_coordinate(file, variable, canonical) {
            Ok(coordinate) => Ok(coordinate.values),
            Err(DataReaderError::MissingVariable(_)) => {
                let len = self.axis_len(variable, canonical);
                Ok((0..len).map(|i| i as f64).collect())
            }
            Err(e) => Err(e),
        }
    }

    fn axis_len(&self, variable: &RawVariable, canonical: &str) -> usize {
        variable
            .dimensions
            .iter()
            .find(|(name, _)| self.canonical_name(name) == canonical)
            .map(|(_, len)| *len)
            .unwrap_or(0)
    }

    fn read_times(&self, file: &netcdf::File, variable: &RawVariable) -> Result<Vec<MonthStamp>, DataReaderError> {
        if self.source_dimension(variable, TIME_DIM).is_none() {
            return Ok(vec![MonthStamp::default()]);
        }

        let time = match self.read_coordinate(file, variable, TIME_DIM) {
            Ok(time) => time,
            Err(DataReaderError::MissingVariable(_)) => {
                return Ok(vec![MonthStamp::default(); self.axis_len(variable, TIME_DIM)]);
            }
            Err(e) => return Err(e),
        };
        let time_error = |source| DataReaderError::Time {
            var: time.name.clone(),
            source,
        };
        let units = time
            .units
            .as_deref()
            .ok_or_else(|| DataReaderError::MissingVariable(format!("{}:units", time.name)))?;
        let calendar = Calendar::parse(time.calendar.as_deref().unwrap_or("standard")).map_err(time_error)?;
        decode_cf_times(&time.values, units, calendar).map_err(time_error)
    }
}

impl DataReader for NetCDFReader {
    fn list_variables(&self) -> Result<Vec<String>, DataReaderError> {
        let file = open_netcdf_file(&self.file_path)?;
        let mut names: Vec<String> = file.variables().map(|v| v.name()).collect();
        if let Some(group_name) = &self.group {
            if let Some(group) = file.group(group_name)? {
                names.extend(group.variables().map(|v| v.name()));
            }
        }
        Ok(names)
    }

    fn get_variable_info(&self, variable_name: &str) -> Result<VariableInfo, DataReaderError> {
        let file = open_netcdf_file(&self.file_path)?;
        self.with_variable(&file, variable_name, |var| {
            Ok(VariableInfo {
                name: var.name(),
                dimensions: var
                    .dimensions()
                    .iter()
                    .map(|d| self.canonical_name(&d.name()))
                    .collect(),
                shape: var.dimensions().iter().map(|d| d.len()).collect(),
                units: string_attribute(var, "units")?,
            })
        })
    }

    fn read_raw_field(&self, variable_name: &str) -> Result<RawField, DataReaderError> {
        let file = open_netcdf_file(&self.file_path)?;
        let variable = self.with_variable(&file, variable_name, RawVariable::load)?;
        debug!(
            "Read {} {:?} from {}",
            variable_name,
            variable.dimensions,
            self.file_path.display()
        );

        let latitudes = self.read_axis(&file, &variable, LATITUDE_DIM)?;
        let longitudes = self.read_axis(&file, &variable, LONGITUDE_DIM)?;
        let times = self.read_times(&file, &variable)?;

        let canonical: Vec<String> = variable
            .dimensions
            .iter()
            .map(|(name, _)| self.canonical_name(name))
            .collect();
        let shape: Vec<usize> = variable.dimensions.iter().map(|(_, len)| *len).collect();

        let mut array = ArrayD::from_shape_vec(IxDyn(&shape), variable.values)
            .map_err(|e| DataReaderError::ConversionError(format!("{}: {}", variable_name, e)))?;

        // Squeeze singleton axes that are not part of the grid, last axis first
        let mut kept = Vec::new();
        for axis in (0..canonical.len()).rev() {
            if is_grid_dimension(&canonical[axis]) {
                kept.push(canonical[axis].as_str());
            } else if shape[axis] == 1 {
                array = array.index_axis_move(Axis(axis), 0);
            } else {
                return Err(DataReaderError::UnexpectedDimension {
                    var: variable_name.to_string(),
                    dim: variable.dimensions[axis].0.clone(),
                    len: shape[axis],
                });
            }
        }
        kept.reverse();

        if !kept.contains(&TIME_DIM) {
            array = array.insert_axis(Axis(0));
            kept.insert(0, TIME_DIM);
        }
        if kept.len() != 3 {
            return Err(DataReaderError::ConversionError(format!(
                "{}: expected one each of time/latitude/longitude, got {:?}",
                variable_name, kept
            )));
        }

        let order = [TIME_DIM, LATITUDE_DIM, LONGITUDE_DIM]
            .iter()
            .map(|want| {
                kept.iter()
                    .position(|name| name == want)
                    .ok_or_else(|| DataReaderError::MissingDimension {
                        var: variable_name.to_string(),
                        dim: want.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data = array
            .permuted_axes(IxDyn(&order))
            .into_dimensionality::<Ix3>()
            .map_err(|e| DataReaderError::ConversionError(format!("{}: {}", variable_name, e)))?
            .as_standard_layout()
            .into_owned();

        Ok(RawField {
            name: variable_name.to_string(),
            units: variable.units,
            times,
            latitudes,
            longitudes,
            data,
        })
    }

    fn get_path(&self) -> Option<PathBuf> {
        Some(self.file_path.clone())
    }
}

/// Several NetCDF files read as one dataset concatenated along time
#[derive(Debug, Clone)]
pub struct MultiFileReader {
    pub readers: Vec<NetCDFReader>,
}

impl MultiFileReader {
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self, DataReaderError> {
        if paths.is_empty() {
            return Err(DataReaderError::NoInputFiles(
                "multi-file dataset needs at least one file".to_string(),
            ));
        }
        let readers = paths
            .iter()
            .map(NetCDFReader::open)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { readers })
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }
}

impl DataReader for MultiFileReader {
    fn list_variables(&self) -> Result<Vec<String>, DataReaderError> {
        match self.readers.first() {
            Some(reader) => reader.list_variables(),
            None => Ok(Vec::new()),
        }
    }

    fn get_variable_info(&self, variable_name: &str) -> Result<VariableInfo, DataReaderError> {
        let mut info = self
            .readers
            .first()
            .ok_or_else(|| DataReaderError::NoInputFiles("empty multi-file dataset".to_string()))?
            .get_variable_info(variable_name)?;

        let time_axis = info.dimensions.iter().position(|d| d == TIME_DIM);
        if let Some(axis) = time_axis {
            info.shape[axis] = self
                .readers
                .iter()
                .map(|reader| reader.get_variable_info(variable_name).map(|i| i.shape[axis]))
                .sum::<Result<usize, _>>()?;
        }
        Ok(info)
    }

    fn read_raw_field(&self, variable_name: &str) -> Result<RawField, DataReaderError> {
        let parts = self
            .readers
            .iter()
            .map(|reader| reader.read_raw_field(variable_name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RawField::concat_time(parts)?)
    }

    fn get_path(&self) -> Option<PathBuf> {
        self.readers.first().map(|reader| reader.file_path.clone())
    }
}

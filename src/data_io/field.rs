use crate::time_utils::MonthStamp;
use ndarray::{concatenate, Array3, ArrayView3, Axis};
use std::ops::Range;
use thiserror::Error;

/// Errors raised while validating or combining gridded fields
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Field {name}: data shape {data:?} does not match coordinates (time={time}, latitude={lat}, longitude={lon})")]
    ShapeMismatch {
        name: String,
        data: Vec<usize>,
        time: usize,
        lat: usize,
        lon: usize,
    },

    #[error("Field {0}: latitude coordinate is not strictly monotonic")]
    NonMonotonicLatitude(String),

    #[error("Field {name}: latitude {value} outside [-90, 90]")]
    LatitudeOutOfRange { name: String, value: f64 },

    #[error("Fields {left} and {right} are not on the same grid")]
    GridMismatch { left: String, right: String },

    #[error("Cannot concatenate an empty list of fields")]
    EmptyConcat,

    #[error("Field {name}: expected {expected} latitude values, got {actual}")]
    CoordinateLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Direction of the latitude coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatitudeOrder {
    /// South to north, e.g. -89.5 .. 89.5
    Ascending,
    /// North to south, e.g. 90 .. -90
    Descending,
}

impl LatitudeOrder {
    /// Infer orientation from a coordinate, `None` if it is not strictly monotonic
    pub fn detect(latitudes: &[f64]) -> Option<Self> {
        if latitudes.len() < 2 {
            return Some(LatitudeOrder::Ascending);
        }
        if latitudes.windows(2).all(|pair| pair[0] < pair[1]) {
            Some(LatitudeOrder::Ascending)
        } else if latitudes.windows(2).all(|pair| pair[0] > pair[1]) {
            Some(LatitudeOrder::Descending)
        } else {
            None
        }
    }
}

/// Unvalidated labeled array as produced by a reader, layout [time, latitude, longitude]
#[derive(Debug, Clone)]
pub struct RawField {
    pub name: String,
    pub units: Option<String>,
    pub times: Vec<MonthStamp>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub data: Array3<f64>,
}

impl RawField {
    /// Concatenate fields along time. Latitude and longitude must agree.
    pub fn concat_time(fields: Vec<RawField>) -> Result<RawField, FieldError> {
        let mut fields = fields.into_iter();
        let first = fields.next().ok_or(FieldError::EmptyConcat)?;
        let rest: Vec<RawField> = fields.collect();
        if rest.is_empty() {
            return Ok(first);
        }

        for other in &rest {
            if other.latitudes != first.latitudes || other.longitudes != first.longitudes {
                return Err(FieldError::GridMismatch {
                    left: first.name.clone(),
                    right: other.name.clone(),
                });
            }
        }

        let views: Vec<ArrayView3<f64>> = std::iter::once(first.data.view())
            .chain(rest.iter().map(|field| field.data.view()))
            .collect();
        let data = concatenate(Axis(0), &views).map_err(|_| FieldError::GridMismatch {
            left: first.name.clone(),
            right: first.name.clone(),
        })?;

        let mut times = first.times.clone();
        for other in &rest {
            times.extend_from_slice(&other.times);
        }

        Ok(RawField {
            name: first.name,
            units: first.units,
            times,
            latitudes: first.latitudes,
            longitudes: first.longitudes,
            data,
        })
    }

    /// Validate into a [`GriddedField`]
    pub fn into_field(self) -> Result<GriddedField, FieldError> {
        GriddedField::new(
            self.name,
            self.units,
            self.times,
            self.latitudes,
            self.longitudes,
            self.data,
        )
    }
}

/// A physical quantity on a regular [time, latitude, longitude] grid
///
/// Latitudes are strictly monotonic and inside [-90, 90]; the orientation is
/// recorded at construction. Missing samples are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddedField {
    name: String,
    units: Option<String>,
    times: Vec<MonthStamp>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    orientation: LatitudeOrder,
    data: Array3<f64>,
}

impl GriddedField {
    pub fn new(
        name: impl Into<String>,
        units: Option<String>,
        times: Vec<MonthStamp>,
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
        data: Array3<f64>,
    ) -> Result<Self, FieldError> {
        let name = name.into();
        let (nt, nj, ni) = data.dim();
        if nt != times.len() || nj != latitudes.len() || ni != longitudes.len() {
            return Err(FieldError::ShapeMismatch {
                name,
                data: data.shape().to_vec(),
                time: times.len(),
                lat: latitudes.len(),
                lon: longitudes.len(),
            });
        }

        if let Some(&value) = latitudes.iter().find(|lat| !(-90.0..=90.0).contains(*lat)) {
            return Err(FieldError::LatitudeOutOfRange { name, value });
        }

        let orientation =
            LatitudeOrder::detect(&latitudes).ok_or_else(|| FieldError::NonMonotonicLatitude(name.clone()))?;

        Ok(Self {
            name,
            units,
            times,
            latitudes,
            longitudes,
            orientation,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn times(&self) -> &[MonthStamp] {
        &self.times
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    pub fn orientation(&self) -> LatitudeOrder {
        self.orientation
    }

    pub fn data(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// Contiguous latitude rows with `lo <= lat <= hi`
    ///
    /// The bounds may come in either order; they are laid along the field's
    /// orientation before the rows are searched.
    pub fn latitude_rows(&self, a: f64, b: f64) -> Range<usize> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lats = &self.latitudes;
        match self.orientation {
            LatitudeOrder::Ascending => lats.partition_point(|&lat| lat < lo)..lats.partition_point(|&lat| lat <= hi),
            LatitudeOrder::Descending => lats.partition_point(|&lat| lat > hi)..lats.partition_point(|&lat| lat >= lo),
        }
    }

    /// Time steps belonging to one calendar year
    pub fn select_year(&self, year: i32) -> GriddedField {
        let indices: Vec<usize> = self
            .times
            .iter()
            .enumerate()
            .filter(|(_, stamp)| stamp.year == year)
            .map(|(index, _)| index)
            .collect();

        GriddedField {
            name: self.name.clone(),
            units: self.units.clone(),
            times: indices.iter().map(|&index| self.times[index]).collect(),
            latitudes: self.latitudes.clone(),
            longitudes: self.longitudes.clone(),
            orientation: self.orientation,
            data: self.data.select(Axis(0), &indices),
        }
    }

    /// Combine two fields on the same grid cell by cell
    pub fn zip_with<F>(&self, other: &GriddedField, name: impl Into<String>, f: F) -> Result<GriddedField, FieldError>
    where
        F: Fn(f64, f64) -> f64,
    {
        if !self.same_grid(other) {
            return Err(FieldError::GridMismatch {
                left: self.name.clone(),
                right: other.name.clone(),
            });
        }

        let mut data = self.data.clone();
        data.zip_mut_with(&other.data, |left, &right| *left = f(*left, right));

        Ok(GriddedField {
            name: name.into(),
            units: self.units.clone(),
            times: self.times.clone(),
            latitudes: self.latitudes.clone(),
            longitudes: self.longitudes.clone(),
            orientation: self.orientation,
            data,
        })
    }

    /// Drop the validation, e.g. to serve the field from a [`crate::data_io::MemoryDataset`]
    pub fn into_raw(self) -> RawField {
        RawField {
            name: self.name,
            units: self.units,
            times: self.times,
            latitudes: self.latitudes,
            longitudes: self.longitudes,
            data: self.data,
        }
    }

    pub fn same_grid(&self, other: &GriddedField) -> bool {
        self.latitudes == other.latitudes
            && self.longitudes == other.longitudes
            && self.times == other.times
    }
}

/// Regular latitude centres spanning -90..90 in ascending order
pub fn regular_latitudes(rows: usize) -> Vec<f64> {
    let step = 180.0 / rows as f64;
    (0..rows).map(|i| -90.0 + (i as f64 + 0.5) * step).collect()
}

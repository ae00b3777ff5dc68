//! Satellite observations: MODIS cloud properties with CERES EBAF fluxes
use super::catalog::{CatalogRules, FieldRule, RegionSet, VariableCatalog};
use super::reducer::reduce_catalog;
use super::result::{AnnualAggregate, ScalarMap};
use crate::config::ObservationalConfig;
use crate::data_io::common::{cloud_product_files, month_from_product_name};
use crate::data_io::utils::{CERES_COORDINATE_RENAMES, MODIS_REFF_GROUP, MODIS_REFF_MEAN};
use crate::data_io::{create_writer_auto, regular_latitudes, GriddedField, MemoryDataset, NetCDFReader, RawField};
use crate::errors::SimObsResult;
use crate::io::{DataReader, DataReaderError};
use crate::time_utils::{month_stamps, MonthStamp};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Months a cloud product year must contribute, one file each
pub const MONTHS_PER_YEAR: usize = 12;

/// Source of the per-year cloud field
pub trait YearlySource {
    /// One year of the cloud field, one time step per month, latitudes on -90..90
    fn load_year(&self, year: i32) -> Result<RawField, DataReaderError>;
}

/// Monthly cloud product files `<dir>/<prefix>.A<year>*.nc`
#[derive(Debug, Clone)]
pub struct CloudProductLoader {
    pub dir: PathBuf,
    pub prefix: String,
    pub group: String,
    pub variable: String,
}

impl CloudProductLoader {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            group: MODIS_REFF_GROUP.to_string(),
            variable: MODIS_REFF_MEAN.to_string(),
        }
    }

    fn read_month(&self, path: &Path, month: MonthStamp) -> Result<RawField, DataReaderError> {
        let reader = NetCDFReader::open(path)?.with_group(self.group.as_str());
        let mut raw = reader.read_raw_field(&self.variable)?;
        if raw.times.len() != 1 {
            return Err(DataReaderError::UnexpectedDimension {
                var: self.variable.clone(),
                dim: "time".to_string(),
                len: raw.times.len(),
            });
        }
        raw.times = vec![month];
        Ok(raw)
    }
}

impl YearlySource for CloudProductLoader {
    fn load_year(&self, year: i32) -> Result<RawField, DataReaderError> {
        let files = cloud_product_files(&self.dir, &self.prefix, year)?;
        if files.is_empty() {
            return Err(DataReaderError::NoInputFiles(format!(
                "no {}.A{}*.nc files in {}",
                self.prefix,
                year,
                self.dir.display()
            )));
        }
        if files.len() != MONTHS_PER_YEAR {
            return Err(DataReaderError::InvalidFormat(format!(
                "{} cloud product files for {}, expected {}",
                files.len(),
                year,
                MONTHS_PER_YEAR
            )));
        }

        let months = files
            .iter()
            .enumerate()
            .map(|(index, path)| {
                let month = month_from_product_name(path, year).unwrap_or(MonthStamp::new(year, index as u32 + 1));
                debug!("{} -> {}", path.display(), month);
                self.read_month(path, month)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut field = RawField::concat_time(months)?;
        let mut stamps = field.times.clone();
        stamps.sort();
        if stamps != month_stamps(year) {
            return Err(DataReaderError::InvalidFormat(format!(
                "cloud product files for {} do not cover each month once: {:?}",
                year, field.times
            )));
        }
        field.latitudes = regular_latitudes(field.latitudes.len());
        info!("Loaded {} months of {} for {}", field.times.len(), self.variable, year);
        Ok(field)
    }
}

/// Multi-year reference fluxes, read once and sliced per year
#[derive(Debug, Clone)]
pub struct ReferenceFields {
    fields: Vec<GriddedField>,
}

impl ReferenceFields {
    pub fn new(fields: Vec<GriddedField>) -> Self {
        Self { fields }
    }

    /// Read the named variables from a reader
    pub fn read(reader: &dyn DataReader, variables: &[&str]) -> Result<Self, DataReaderError> {
        let fields = variables
            .iter()
            .map(|name| reader.read_field(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(fields))
    }

    /// Time steps of `year` for every field. A year with no steps is an error.
    pub fn for_year(&self, year: i32) -> Result<Vec<GriddedField>, DataReaderError> {
        self.fields
            .iter()
            .map(|field| {
                let slice = field.select_year(year);
                if slice.times().is_empty() {
                    Err(DataReaderError::MissingYear {
                        var: field.name().to_string(),
                        year,
                    })
                } else {
                    Ok(slice)
                }
            })
            .collect()
    }
}

/// Per-year reduction followed by a cross-year mean
pub struct ObservationalAdapter<S: YearlySource> {
    pub cloud: S,
    pub reference: ReferenceFields,
    pub rules: CatalogRules,
    pub regions: RegionSet,
}

impl<S: YearlySource> ObservationalAdapter<S> {
    pub fn new(cloud: S, reference: ReferenceFields) -> Self {
        Self {
            cloud,
            reference,
            rules: CatalogRules::observational(),
            regions: RegionSet::standard(),
        }
    }

    /// Reduce each year of the span; aborts on the first failure
    pub fn run(&self, years: RangeInclusive<i32>) -> Result<AnnualAggregate, DataReaderError> {
        let mut aggregate = AnnualAggregate::with_capacity(years.clone().count());

        for year in years {
            let mut dataset = MemoryDataset::new().with_field(self.cloud.load_year(year)?);
            for field in self.reference.for_year(year)? {
                dataset.insert(field.into_raw());
            }

            let catalog = VariableCatalog::resolve(&self.rules, &dataset)?;
            let result = reduce_catalog(&catalog, &self.regions);
            info!("{}: net {:.4}", year, result.net());
            aggregate.push(year, result);
        }

        Ok(aggregate)
    }
}

/// Flux variables the observational rules read from the reference dataset
pub fn reference_variables(rules: &CatalogRules) -> Vec<&str> {
    [&rules.sw, &rules.lw, &rules.cssw, &rules.cslw, &rules.net]
        .into_iter()
        .flat_map(FieldRule::sources)
        .collect()
}

/// Run the observational pipeline described by `config`
///
/// Writes the mapping to `config.output` when set and returns it.
pub fn run_observational_job(config: &ObservationalConfig) -> SimObsResult<ScalarMap> {
    info!(
        "Observational means {}..={} from {} and {}",
        config.start_year,
        config.end_year,
        config.cloud_dir.display(),
        config.reference.display()
    );

    let rules = CatalogRules::observational();
    let reader = NetCDFReader::open(&config.reference)?.with_renames(CERES_COORDINATE_RENAMES);
    let reference = ReferenceFields::read(&reader, &reference_variables(&rules))?;

    let adapter = ObservationalAdapter {
        cloud: CloudProductLoader::new(&config.cloud_dir, config.cloud_prefix.as_str()),
        reference,
        rules,
        regions: RegionSet::standard(),
    };
    let aggregate = adapter.run(config.years())?;
    let scalars = aggregate.finish().to_scalars();

    if let Some(output) = &config.output {
        create_writer_auto(output)?.write(&scalars)?;
    }
    Ok(scalars)
}

use crate::data_io::utils::MODIS_FILE_PREFIX;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key of the options object in the job file
pub const POST_PROCESS_KEY: &str = "postProcess";

/// Defaults matching the UM archive layout
pub const DEFAULT_MODEL_DIR: &str = "nc/apy";
pub const DEFAULT_MAX_FILES: usize = 5;

/// Defaults of the observational products
pub const DEFAULT_CLOUD_DIR: &str = "./CLDPROP_M3_MODIS_Aqua";
pub const DEFAULT_REFERENCE: &str = "CERES_EBAF_Ed4.1_Subset_201301-201712.nc";
pub const DEFAULT_START_YEAR: i32 = 2013;
pub const DEFAULT_END_YEAR: i32 = 2017;

/// Errors raised while reading the command line or the job file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Need to provide {key} options in {file}")]
    MissingKey { key: String, file: String },

    #[error("Cannot read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Cli(#[from] clap::Error),
}

/// The `postProcess` object of a job file
///
/// `start_time` and `end_time` are carried for logging only. Any other keys
/// are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostProcessOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Formats an optional option value, `None` when absent
pub struct OptionValue<'a>(pub Option<&'a Value>);

impl fmt::Display for OptionValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(Value::String(s)) => f.write_str(s),
            Some(value) => write!(f, "{}", value),
            None => f.write_str("None"),
        }
    }
}

impl PostProcessOptions {
    pub fn start_time(&self) -> OptionValue<'_> {
        OptionValue(self.start_time.as_ref())
    }

    pub fn end_time(&self) -> OptionValue<'_> {
        OptionValue(self.end_time.as_ref())
    }
}

/// Read the `postProcess` options from a JSON job file
pub fn load_post_process_options(path: &Path) -> Result<PostProcessOptions, ConfigError> {
    let file = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        file: file.clone(),
        source,
    })?;
    parse_post_process_options(&text, &file)
}

/// Parse job file text; `file` names the source in error messages
pub fn parse_post_process_options(text: &str, file: &str) -> Result<PostProcessOptions, ConfigError> {
    let json_error = |source| ConfigError::Json {
        file: file.to_string(),
        source,
    };
    let mut document: Value = serde_json::from_str(text).map_err(json_error)?;
    let options = document
        .get_mut(POST_PROCESS_KEY)
        .map(Value::take)
        .ok_or_else(|| ConfigError::MissingKey {
            key: POST_PROCESS_KEY.to_string(),
            file: file.to_string(),
        })?;
    serde_json::from_value(options).map_err(json_error)
}

/// Options of the model binary
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    /// Job file holding the `postProcess` options
    pub json_file: PathBuf,
    /// Result file, format from its extension
    pub output: PathBuf,
    /// Explicit model files; discovered in `model_dir` when empty
    pub inputs: Vec<PathBuf>,
    pub model_dir: PathBuf,
    /// How many of the most recent files to reduce
    pub max_files: usize,
    pub verbose: u8,
}

impl ModelConfig {
    pub fn new(json_file: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            json_file: json_file.into(),
            output: output.into(),
            inputs: Vec::new(),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            max_files: DEFAULT_MAX_FILES,
            verbose: 0,
        }
    }

    pub fn command() -> Command {
        Command::new("sim_obs")
            .version(clap::crate_version!())
            .about("Post processing of UM data to provide simulated obs")
            .arg(
                Arg::new("JSON_FILE")
                    .help("Name of JSON file")
                    .value_parser(value_parser!(PathBuf))
                    .required(true),
            )
            .arg(
                Arg::new("OUTPUT")
                    .help("Name of output file")
                    .value_parser(value_parser!(PathBuf))
                    .required(true),
            )
            .arg(
                Arg::new("input")
                    .short('i')
                    .long("input")
                    .value_name("FILE")
                    .help("Name of input file")
                    .num_args(0..)
                    .action(ArgAction::Append)
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("model-dir")
                    .long("model-dir")
                    .value_name("DIR")
                    .help("Directory searched for *.nc files when no input is given")
                    .value_parser(value_parser!(PathBuf))
                    .default_value(DEFAULT_MODEL_DIR),
            )
            .arg(
                Arg::new("max-files")
                    .long("max-files")
                    .value_name("COUNT")
                    .help("Number of most recent files to use")
                    .value_parser(value_parser!(usize))
                    .default_value("5"),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Provide verbose output")
                    .action(ArgAction::Count),
            )
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Result<Self, ConfigError> {
        Self::from_arg_matches(&Self::command().try_get_matches()?)
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_arg_matches(&Self::command().try_get_matches_from(args)?)
    }

    pub fn from_arg_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let config = Self {
            json_file: required_path(matches, "JSON_FILE")?,
            output: required_path(matches, "OUTPUT")?,
            inputs: matches
                .get_many::<PathBuf>("input")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            model_dir: required_path(matches, "model-dir")?,
            max_files: matches.get_one::<usize>("max-files").copied().unwrap_or(DEFAULT_MAX_FILES),
            verbose: matches.get_count("verbose"),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_files == 0 {
            return Err(ConfigError::InvalidArgument("max-files must be at least 1".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::InvalidArgument("output path is empty".to_string()));
        }
        Ok(())
    }
}

/// Options of the observational binary
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationalConfig {
    pub cloud_dir: PathBuf,
    pub cloud_prefix: String,
    pub reference: PathBuf,
    pub start_year: i32,
    pub end_year: i32,
    /// Also persist the mapping here
    pub output: Option<PathBuf>,
    pub verbose: u8,
}

impl Default for ObservationalConfig {
    fn default() -> Self {
        Self {
            cloud_dir: PathBuf::from(DEFAULT_CLOUD_DIR),
            cloud_prefix: MODIS_FILE_PREFIX.to_string(),
            reference: PathBuf::from(DEFAULT_REFERENCE),
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            output: None,
            verbose: 0,
        }
    }
}

impl ObservationalConfig {
    pub fn command() -> Command {
        Command::new("obs_means")
            .version(clap::crate_version!())
            .about("Regional annual means of MODIS and CERES observations")
            .arg(
                Arg::new("cloud-dir")
                    .long("cloud-dir")
                    .value_name("DIR")
                    .help("Directory of monthly cloud product files")
                    .value_parser(value_parser!(PathBuf))
                    .default_value(DEFAULT_CLOUD_DIR),
            )
            .arg(
                Arg::new("cloud-prefix")
                    .long("cloud-prefix")
                    .value_name("PREFIX")
                    .help("File name prefix of the cloud product")
                    .default_value(MODIS_FILE_PREFIX),
            )
            .arg(
                Arg::new("reference")
                    .long("reference")
                    .value_name("FILE")
                    .help("Multi-year radiation flux dataset")
                    .value_parser(value_parser!(PathBuf))
                    .default_value(DEFAULT_REFERENCE),
            )
            .arg(
                Arg::new("start-year")
                    .long("start-year")
                    .value_name("YEAR")
                    .help("First year, inclusive")
                    .value_parser(value_parser!(i32))
                    .default_value("2013"),
            )
            .arg(
                Arg::new("end-year")
                    .long("end-year")
                    .value_name("YEAR")
                    .help("Last year, inclusive")
                    .value_parser(value_parser!(i32))
                    .default_value("2017"),
            )
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("FILE")
                    .help("Also write the means to this file")
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Provide verbose output")
                    .action(ArgAction::Count),
            )
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Result<Self, ConfigError> {
        Self::from_arg_matches(&Self::command().try_get_matches()?)
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_arg_matches(&Self::command().try_get_matches_from(args)?)
    }

    pub fn from_arg_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            cloud_dir: required_path(matches, "cloud-dir")?,
            cloud_prefix: matches
                .get_one::<String>("cloud-prefix")
                .cloned()
                .unwrap_or(defaults.cloud_prefix),
            reference: required_path(matches, "reference")?,
            start_year: matches.get_one::<i32>("start-year").copied().unwrap_or(defaults.start_year),
            end_year: matches.get_one::<i32>("end-year").copied().unwrap_or(defaults.end_year),
            output: matches.get_one::<PathBuf>("output").cloned(),
            verbose: matches.get_count("verbose"),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_year > self.end_year {
            return Err(ConfigError::InvalidArgument(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        if self.cloud_prefix.is_empty() {
            return Err(ConfigError::InvalidArgument("cloud prefix is empty".to_string()));
        }
        Ok(())
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start_year..=self.end_year
    }
}

fn required_path(matches: &ArgMatches, id: &str) -> Result<PathBuf, ConfigError> {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .ok_or_else(|| ConfigError::InvalidArgument(format!("missing {}", id)))
}

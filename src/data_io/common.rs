/// File discovery and opening shared by the data loaders
use crate::io::DataReaderError;
use crate::time_utils::{month_from_day_of_year, MonthStamp};
use std::path::{Path, PathBuf};

/// Files in `dir` whose names start with `prefix` and end with `suffix`, sorted by name
pub fn discover_files(dir: &Path, prefix: &str, suffix: &str) -> Result<Vec<PathBuf>, DataReaderError> {
    if !dir.is_dir() {
        return Err(DataReaderError::FileNotFound(dir.to_string_lossy().to_string()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(prefix) && name.ends_with(suffix))
            .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Monthly cloud product files of one year: `<prefix>.A<year>*.nc`
pub fn cloud_product_files(dir: &Path, prefix: &str, year: i32) -> Result<Vec<PathBuf>, DataReaderError> {
    discover_files(dir, &format!("{}.A{}", prefix, year), ".nc")
}

/// Keep the last `count` entries of an ordered file list
pub fn select_most_recent(mut files: Vec<PathBuf>, count: usize) -> Vec<PathBuf> {
    if files.len() > count {
        files.drain(..files.len() - count);
    }
    files
}

/// Month encoded in a product file name of the form `...A<year><day-of-year>...`
pub fn month_from_product_name(path: &Path, year: i32) -> Option<MonthStamp> {
    let name = path.file_name()?.to_str()?;
    let token = format!("A{}", year);
    let start = name.find(&token)? + token.len();
    let digits: String = name[start..].chars().take_while(|c| c.is_ascii_digit()).take(3).collect();
    if digits.len() != 3 {
        return None;
    }
    month_from_day_of_year(year, digits.parse().ok()?)
}

/// Open NetCDF file and validate it exists
pub fn open_netcdf_file(path: &Path) -> Result<netcdf::File, DataReaderError> {
    if !path.exists() {
        return Err(DataReaderError::FileNotFound(path.to_string_lossy().to_string()));
    }

    Ok(netcdf::open(path)?)
}

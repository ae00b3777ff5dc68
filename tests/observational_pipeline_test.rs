mod common;

use common::{ceres_times, write_ceres_file, write_cloud_file, write_cloud_year, FILL_VALUE};
use simobs_rust::config::ObservationalConfig;
use simobs_rust::data_io::regular_latitudes;
use simobs_rust::diagnostics::{run_observational_job, CloudProductLoader, YearlySource};
use simobs_rust::io::DataReaderError;
use simobs_rust::time_utils::{month_stamps, MonthStamp};
use simobs_rust::SimObsError;
use std::path::Path;
use tempfile::tempdir;

const ROWS: usize = 6;
const COLS: usize = 4;

fn observational_config(dir: &Path, first: i32, last: i32) -> ObservationalConfig {
    ObservationalConfig {
        cloud_dir: dir.join("CLDPROP_M3_MODIS_Aqua"),
        reference: dir.join("CERES_EBAF_Ed4.1_Subset.nc"),
        start_year: first,
        end_year: last,
        ..ObservationalConfig::default()
    }
}

fn ceres_longitudes() -> Vec<f64> {
    (0..COLS).map(|i| 45.0 + 90.0 * i as f64).collect()
}

#[test]
fn test_single_year_identity() {
    let dir = tempdir().unwrap();
    let mut config = observational_config(dir.path(), 2013, 2013);
    config.output = Some(dir.path().join("obs.json"));
    std::fs::create_dir_all(&config.cloud_dir).unwrap();

    write_cloud_year(&config.cloud_dir, 2013, 12, ROWS, COLS, 1150.0);
    write_ceres_file(
        &config.reference,
        &regular_latitudes(ROWS),
        &ceres_longitudes(),
        &ceres_times(2013, 2),
        &|_| 240.0,
    );

    let scalars = run_observational_job(&config).unwrap();
    assert_eq!(scalars.len(), 16);
    for region in ["NHex", "trop", "SHex"] {
        let reff = scalars.get(&format!("reff{}", region)).unwrap();
        assert!((reff - 11.5).abs() < 1e-9, "reff{} = {}", region, reff);
        assert_eq!(scalars.get(&format!("SW{}", region)), Some(240.0));
        assert_eq!(scalars.get(&format!("CSLW{}", region)), Some(240.0));
    }
    assert_eq!(scalars.get("net"), Some(240.0));

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(config.output.as_ref().unwrap()).unwrap()).unwrap();
    assert_eq!(parsed.as_object().unwrap().len(), 16);
}

#[test]
fn test_cross_year_mean_uses_each_year_slice() {
    let dir = tempdir().unwrap();
    let config = observational_config(dir.path(), 2013, 2014);
    std::fs::create_dir_all(&config.cloud_dir).unwrap();

    write_cloud_year(&config.cloud_dir, 2013, 12, ROWS, COLS, 1000.0);
    write_cloud_year(&config.cloud_dir, 2014, 12, ROWS, COLS, 1400.0);
    // 100 W m-2 throughout 2013, 300 throughout 2014
    write_ceres_file(
        &config.reference,
        &regular_latitudes(ROWS),
        &ceres_longitudes(),
        &ceres_times(2013, 2),
        &|t| if t < 12 { 100.0 } else { 300.0 },
    );

    let scalars = run_observational_job(&config).unwrap();
    let reff = scalars.get("refftrop").unwrap();
    assert!((reff - 12.0).abs() < 1e-9);
    assert!((scalars.get("LWSHex").unwrap() - 200.0).abs() < 1e-9);
    assert!((scalars.get("net").unwrap() - 200.0).abs() < 1e-9);
}

#[test]
fn test_fill_values_are_skipped() {
    let dir = tempdir().unwrap();
    let cloud_dir = dir.path().join("cloud");
    std::fs::create_dir_all(&cloud_dir).unwrap();
    write_cloud_year(&cloud_dir, 2013, 12, ROWS, COLS, 900.0);

    // Northern half missing in January
    write_cloud_file(
        &cloud_dir.join("CLDPROP_M3_MODIS_Aqua.A2013001.061.nc"),
        ROWS,
        COLS,
        &|j, _| if j >= ROWS / 2 { FILL_VALUE } else { 900.0 },
    );

    let loader = CloudProductLoader::new(&cloud_dir, "CLDPROP_M3_MODIS_Aqua");
    let field = loader.load_year(2013).unwrap();
    assert_eq!(field.times, month_stamps(2013));
    assert_eq!(field.latitudes, regular_latitudes(ROWS));
    assert!(field.data[[0, ROWS - 1, 0]].is_nan());
    assert!((field.data[[0, 0, 0]] - 9.0).abs() < 1e-9);
    assert!((field.data[[1, ROWS - 1, 0]] - 9.0).abs() < 1e-9);
}

#[test]
fn test_months_without_day_token_are_sequential() {
    let dir = tempdir().unwrap();
    for tag in "abcdefghijkl".chars() {
        let name = format!("CLDPROP_M3_MODIS_Aqua.A2015.{}.nc", tag);
        write_cloud_file(&dir.path().join(name), ROWS, COLS, &|_, _| 1000.0);
    }
    let field = CloudProductLoader::new(dir.path(), "CLDPROP_M3_MODIS_Aqua").load_year(2015).unwrap();
    assert_eq!(field.times, month_stamps(2015));
    assert_eq!(field.times[1], MonthStamp::new(2015, 2));
}

#[test]
fn test_partial_year_aborts() {
    let dir = tempdir().unwrap();
    write_cloud_year(dir.path(), 2014, 6, ROWS, COLS, 1000.0);
    let result = CloudProductLoader::new(dir.path(), "CLDPROP_M3_MODIS_Aqua").load_year(2014);
    assert!(matches!(result, Err(DataReaderError::InvalidFormat(_))));
}

#[test]
fn test_duplicate_month_aborts() {
    let dir = tempdir().unwrap();
    // January twice from two processing versions, December missing
    write_cloud_year(dir.path(), 2013, 11, ROWS, COLS, 1000.0);
    write_cloud_file(
        &dir.path().join("CLDPROP_M3_MODIS_Aqua.A2013001.062.nc"),
        ROWS,
        COLS,
        &|_, _| 1000.0,
    );
    let result = CloudProductLoader::new(dir.path(), "CLDPROP_M3_MODIS_Aqua").load_year(2013);
    assert!(matches!(result, Err(DataReaderError::InvalidFormat(_))));
}

#[test]
fn test_missing_cloud_year_aborts() {
    let dir = tempdir().unwrap();
    let config = observational_config(dir.path(), 2013, 2014);
    std::fs::create_dir_all(&config.cloud_dir).unwrap();
    write_cloud_year(&config.cloud_dir, 2013, 12, ROWS, COLS, 1000.0);
    write_ceres_file(
        &config.reference,
        &regular_latitudes(ROWS),
        &ceres_longitudes(),
        &ceres_times(2013, 2),
        &|_| 1.0,
    );

    assert!(matches!(
        run_observational_job(&config),
        Err(SimObsError::Data(DataReaderError::NoInputFiles(_)))
    ));
}

#[test]
fn test_more_than_twelve_files_aborts() {
    let dir = tempdir().unwrap();
    write_cloud_year(dir.path(), 2013, 12, ROWS, COLS, 1000.0);
    write_cloud_file(
        &dir.path().join("CLDPROP_M3_MODIS_Aqua.A2013365.extra.nc"),
        ROWS,
        COLS,
        &|_, _| 1000.0,
    );
    let result = CloudProductLoader::new(dir.path(), "CLDPROP_M3_MODIS_Aqua").load_year(2013);
    assert!(matches!(result, Err(DataReaderError::InvalidFormat(_))));
}

#[test]
fn test_missing_reference_file() {
    let dir = tempdir().unwrap();
    let config = observational_config(dir.path(), 2013, 2013);
    assert!(matches!(
        run_observational_job(&config),
        Err(SimObsError::Data(DataReaderError::FileNotFound(_)))
    ));
}

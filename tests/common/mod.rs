#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// A flux or diagnostic variable filled from a (time, lat, lon) -> value function
pub struct VarSpec<'a> {
    pub name: &'a str,
    pub value: &'a dyn Fn(usize, usize, usize) -> f64,
}

pub fn constant(name: &str, value: f64) -> (String, f64) {
    (name.to_string(), value)
}

/// Grid and time axis of a synthetic file
pub struct GridSpec<'a> {
    pub lat_dim: &'a str,
    pub lon_dim: &'a str,
    pub latitudes: &'a [f64],
    pub longitudes: &'a [f64],
    pub times: &'a [f64],
    pub time_units: &'a str,
    pub calendar: &'a str,
}

/// Write a NetCDF file with coordinate variables and [time, lat, lon] fields
pub fn write_gridded_file(path: &Path, grid: &GridSpec, vars: &[VarSpec]) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("time", grid.times.len()).unwrap();
    file.add_dimension(grid.lat_dim, grid.latitudes.len()).unwrap();
    file.add_dimension(grid.lon_dim, grid.longitudes.len()).unwrap();
    file.add_attribute("title", "synthetic test data").unwrap();

    {
        let mut var = file.add_variable::<f64>("time", &["time"]).unwrap();
        var.put_attribute("units", grid.time_units).unwrap();
        var.put_attribute("calendar", grid.calendar).unwrap();
        var.put_values(grid.times, ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f64>(grid.lat_dim, &[grid.lat_dim]).unwrap();
        var.put_attribute("units", "degrees_north").unwrap();
        var.put_values(grid.latitudes, ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f64>(grid.lon_dim, &[grid.lon_dim]).unwrap();
        var.put_attribute("units", "degrees_east").unwrap();
        var.put_values(grid.longitudes, ..).unwrap();
    }

    let (nt, nj, ni) = (grid.times.len(), grid.latitudes.len(), grid.longitudes.len());
    for spec in vars {
        let mut data = Vec::with_capacity(nt * nj * ni);
        for t in 0..nt {
            for j in 0..nj {
                for i in 0..ni {
                    data.push((spec.value)(t, j, i));
                }
            }
        }
        let mut var = file
            .add_variable::<f64>(spec.name, &["time", grid.lat_dim, grid.lon_dim])
            .unwrap();
        var.put_attribute("units", "W m-2").unwrap();
        var.put_values(&data, ..).unwrap();
    }
}

pub const UM_LATITUDES: [f64; 2] = [45.0, -45.0];
pub const UM_LONGITUDES: [f64; 2] = [0.0, 180.0];

/// One month of UM output on a 2x2 north-to-south grid, 360-day calendar
pub fn write_um_file(path: &Path, month_index: usize, values: &[(String, f64)]) {
    let time = [month_index as f64 * 30.0 + 15.0];
    let grid = GridSpec {
        lat_dim: "latitude",
        lon_dim: "longitude",
        latitudes: &UM_LATITUDES,
        longitudes: &UM_LONGITUDES,
        times: &time,
        time_units: "days since 1990-01-01 00:00:00",
        calendar: "360_day",
    };
    let closures: Vec<Box<dyn Fn(usize, usize, usize) -> f64>> = values
        .iter()
        .map(|(_, value)| {
            let value = *value;
            Box::new(move |_: usize, _: usize, _: usize| value) as Box<dyn Fn(usize, usize, usize) -> f64>
        })
        .collect();
    let specs: Vec<VarSpec> = values
        .iter()
        .zip(closures.iter())
        .map(|((name, _), value)| VarSpec {
            name: name.as_str(),
            value: value.as_ref(),
        })
        .collect();
    write_gridded_file(path, &grid, &specs);
}

/// The standard UM test values: net = 500 - 200 - 250 = 50, reff = 12 / 2 = 6
pub fn um_values() -> Vec<(String, f64)> {
    vec![
        constant("UM_m01s01i245_vn405.0", 12.0),
        constant("UM_m01s01i246_vn405.0", 2.0),
        constant("toa_incoming_shortwave_flux", 500.0),
        constant("toa_outgoing_shortwave_flux", 200.0),
        constant("toa_outgoing_shortwave_flux_assuming_clear_sky", 100.0),
        constant("toa_outgoing_longwave_flux", 250.0),
        constant("toa_outgoing_longwave_flux_assuming_clear_sky", 270.0),
    ]
}

pub const FILL_VALUE: f64 = -9999.0;
pub const REFF_SCALE: f64 = 0.01;

/// Day of year of the first of each month in a non-leap year
pub const MONTH_STARTS: [u32; 12] = [1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// One monthly cloud product file: `Mean` in the effective radius group,
/// packed with a scale factor, latitude given as a bare dimension
pub fn write_cloud_file(path: &Path, rows: usize, cols: usize, raw: &dyn Fn(usize, usize) -> f64) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("latitude", rows).unwrap();
    file.add_dimension("longitude", cols).unwrap();
    {
        let longitudes: Vec<f64> = (0..cols).map(|i| -180.0 + (i as f64 + 0.5) * 360.0 / cols as f64).collect();
        let mut var = file.add_variable::<f64>("longitude", &["longitude"]).unwrap();
        var.put_values(&longitudes, ..).unwrap();
    }

    let mut group = file.add_group("Cloud_Effective_Radius_Liquid").unwrap();
    let mut data = Vec::with_capacity(rows * cols);
    for j in 0..rows {
        for i in 0..cols {
            data.push(raw(j, i));
        }
    }
    let mut var = group.add_variable::<f64>("Mean", &["latitude", "longitude"]).unwrap();
    var.put_attribute("_FillValue", FILL_VALUE).unwrap();
    var.put_attribute("scale_factor", REFF_SCALE).unwrap();
    var.put_attribute("add_offset", 0.0f64).unwrap();
    var.put_attribute("units", "micron").unwrap();
    var.put_values(&data, ..).unwrap();
}

/// Cloud product files for the given months of a year, named with the day-of-year token
pub fn write_cloud_year(dir: &Path, year: i32, months: usize, rows: usize, cols: usize, raw: f64) -> Vec<PathBuf> {
    (0..months)
        .map(|m| {
            let path = dir.join(format!("CLDPROP_M3_MODIS_Aqua.A{}{:03}.061.nc", year, MONTH_STARTS[m]));
            write_cloud_file(&path, rows, cols, &|_, _| raw);
            path
        })
        .collect()
}

/// Days since 2000-03-01 of the 15th of each month from `first_year` for `years` years
pub fn ceres_times(first_year: i32, years: i32) -> Vec<f64> {
    let origin = chrono::NaiveDate::from_ymd_opt(2000, 3, 1).unwrap();
    (0..years * 12)
        .map(|k| {
            let date = chrono::NaiveDate::from_ymd_opt(first_year + k / 12, (k % 12) as u32 + 1, 15).unwrap();
            (date - origin).num_days() as f64
        })
        .collect()
}

/// Multi-year reference fluxes on `lat`/`lon` coordinates
pub fn write_ceres_file(path: &Path, latitudes: &[f64], longitudes: &[f64], times: &[f64], value: &dyn Fn(usize) -> f64) {
    let grid = GridSpec {
        lat_dim: "lat",
        lon_dim: "lon",
        latitudes,
        longitudes,
        times,
        time_units: "days since 2000-03-01 00:00:00",
        calendar: "gregorian",
    };
    let flux = |t: usize, _: usize, _: usize| value(t);
    let specs: Vec<VarSpec> = [
        "toa_sw_all_mon",
        "toa_lw_all_mon",
        "toa_net_all_mon",
        "toa_sw_clr_t_mon",
        "toa_lw_clr_t_mon",
    ]
    .iter()
    .map(|name| VarSpec { name: *name, value: &flux })
    .collect();
    write_gridded_file(path, &grid, &specs);
}

pub fn write_job_file(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

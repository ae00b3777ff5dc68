use super::catalog::{RegionSet, RegionSelector, Variable, VariableCatalog};
use super::result::RegionalMeansResult;
use crate::data_io::GriddedField;
use crate::math::{cos_lat_weights, lat_weighted_mean};
use ndarray::s;
use tracing::debug;

/// cos(latitude)-weighted mean over the rows inside `selector`, jointly over time and longitude
///
/// Latitude bounds are inclusive and may be given in either direction; rows
/// are located along the field's declared orientation. An empty band or one
/// with only missing samples gives NaN.
pub fn regional_mean(field: &GriddedField, selector: &RegionSelector) -> f64 {
    let (lo, hi) = selector.bounds();
    let rows = field.latitude_rows(lo, hi);
    let weights = cos_lat_weights(&field.latitudes()[rows.clone()]);
    let block = field.data();
    let mean = lat_weighted_mean(block.slice(s![.., rows.clone(), ..]), weights.view());
    debug!(
        "{} {}: rows {:?} -> {}",
        field.name(),
        selector.region.key(),
        rows,
        mean
    );
    mean
}

/// cos(latitude)-weighted mean over the whole field
pub fn global_mean(field: &GriddedField) -> f64 {
    let weights = cos_lat_weights(field.latitudes());
    lat_weighted_mean(field.data(), weights.view())
}

/// Reduce every catalog variable over each region, plus the global mean of `net`
pub fn reduce_catalog(catalog: &VariableCatalog, regions: &RegionSet) -> RegionalMeansResult {
    let mut regional = [[f64::NAN; 3]; 5];
    for variable in Variable::ALL {
        let field = catalog.field(variable);
        for (slot, selector) in regional[variable.index()].iter_mut().zip(regions.iter()) {
            *slot = regional_mean(field, selector);
        }
    }
    RegionalMeansResult::new(regional, global_mean(catalog.net()))
}

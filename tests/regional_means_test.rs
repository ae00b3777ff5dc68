use ndarray::Array3;
use simobs_rust::data_io::{regular_latitudes, GriddedField, MemoryDataset, RawField};
use simobs_rust::diagnostics::{
    global_mean, reduce_catalog, regional_mean, CatalogRules, Region, RegionSelector, RegionSet, Variable,
    VariableCatalog,
};
use simobs_rust::time_utils::MonthStamp;

fn field_on(latitudes: Vec<f64>, nt: usize, ni: usize, value: impl Fn(usize, usize, usize) -> f64) -> GriddedField {
    let nj = latitudes.len();
    let times = (0..nt).map(|m| MonthStamp::new(2014, m as u32 % 12 + 1)).collect();
    let longitudes = (0..ni).map(|i| i as f64 * 360.0 / ni as f64).collect();
    let data = Array3::from_shape_fn((nt, nj, ni), |(t, j, i)| value(t, j, i));
    GriddedField::new("test", None, times, latitudes, longitudes, data).unwrap()
}

#[test]
fn test_constant_field_invariance() {
    for rows in [2, 6, 180] {
        let field = field_on(regular_latitudes(rows), 3, 4, |_, _, _| 287.3);
        for selector in RegionSet::standard().iter() {
            let mean = regional_mean(&field, selector);
            if mean.is_nan() {
                continue;
            }
            assert_eq!(mean, 287.3);
        }
        assert_eq!(global_mean(&field), 287.3);
    }
}

#[test]
fn test_cosine_weighting_hand_computed() {
    // Two rows inside NHex: 30 and 60 degrees, weights cos 30 and 0.5
    let latitudes = vec![0.0, 30.0, 60.0];
    let field = field_on(latitudes, 1, 1, |_, j, _| [0.0, 2.0, 4.0][j]);
    let w30 = 30f64.to_radians().cos();
    let expected = (2.0 * w30 + 4.0 * 0.5) / (w30 + 0.5);
    let mean = regional_mean(&field, &RegionSelector::standard(Region::NHex));
    assert!((mean - expected).abs() < 1e-12);
}

#[test]
fn test_joint_mean_over_time_and_longitude() {
    // Joint mean, not a mean of per-step means: NaNs change the sample count per step
    let mut field_values = Array3::from_elem((2, 1, 2), 1.0);
    field_values[[1, 0, 0]] = 4.0;
    field_values[[1, 0, 1]] = f64::NAN;
    let field = GriddedField::new(
        "joint",
        None,
        vec![MonthStamp::new(2014, 1), MonthStamp::new(2014, 2)],
        vec![0.0],
        vec![0.0, 180.0],
        field_values,
    )
    .unwrap();
    let mean = regional_mean(&field, &RegionSelector::standard(Region::Trop));
    assert!((mean - 2.0).abs() < 1e-12);
}

#[test]
fn test_band_edges_are_inclusive() {
    let latitudes = vec![-90.0, -30.0, 30.0, 90.0];
    let field = field_on(latitudes, 1, 1, |_, j, _| j as f64);
    // Only -30 and 30 fall in the tropics; cos weights are equal
    assert!((regional_mean(&field, &RegionSelector::standard(Region::Trop)) - 1.5).abs() < 1e-12);
}

#[test]
fn test_descending_latitudes_match_ascending() {
    let ascending = field_on(regular_latitudes(12), 2, 3, |t, j, i| (t + 2 * j + 3 * i) as f64);
    let descending_lats: Vec<f64> = regular_latitudes(12).into_iter().rev().collect();
    let descending = field_on(descending_lats, 2, 3, |t, j, i| (t + 2 * (11 - j) + 3 * i) as f64);

    for region in Region::ALL {
        let a = regional_mean(&ascending, &RegionSelector::standard(region));
        let (lo, hi) = region.bounds();
        let b = regional_mean(&descending, &RegionSelector::new(region, hi, lo));
        assert!((a - b).abs() < 1e-9, "{:?}: {} vs {}", region, a, b);
    }
}

#[test]
fn test_reduction_is_idempotent() {
    let raw = |name: &str, value: f64| RawField {
        name: name.to_string(),
        units: None,
        times: vec![MonthStamp::new(2013, 1), MonthStamp::new(2013, 2)],
        latitudes: regular_latitudes(6),
        longitudes: vec![0.0, 120.0, 240.0],
        data: Array3::from_shape_fn((2, 6, 3), |(t, j, i)| value + (t * 18 + j * 3 + i) as f64),
    };
    let dataset = MemoryDataset::new()
        .with_field(raw("Mean", 10.0))
        .with_field(raw("toa_sw_all_mon", 100.0))
        .with_field(raw("toa_lw_all_mon", 240.0))
        .with_field(raw("toa_sw_clr_t_mon", 50.0))
        .with_field(raw("toa_lw_clr_t_mon", 260.0))
        .with_field(raw("toa_net_all_mon", 1.0));

    let catalog = VariableCatalog::resolve(&CatalogRules::observational(), &dataset).unwrap();
    let first = reduce_catalog(&catalog, &RegionSet::standard());
    let second = reduce_catalog(&catalog, &RegionSet::standard());
    assert_eq!(first, second);
    assert_eq!(first.get(Variable::Sw, Region::NHex), regional_mean(catalog.field(Variable::Sw), &RegionSelector::standard(Region::NHex)));
    assert_eq!(first.net(), global_mean(catalog.net()));
}

#[test]
fn test_all_missing_band_is_nan() {
    let field = field_on(regular_latitudes(6), 1, 2, |_, j, _| if j < 2 { f64::NAN } else { 1.0 });
    assert!(regional_mean(&field, &RegionSelector::standard(Region::SHex)).is_nan());
    assert_eq!(regional_mean(&field, &RegionSelector::standard(Region::NHex)), 1.0);
}

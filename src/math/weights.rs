use ndarray::{Array1, ArrayView1, ArrayView3, Axis};

/// Area weight of each latitude row, cos(latitude)
pub fn cos_lat_weights(latitudes: &[f64]) -> Array1<f64> {
    latitudes.iter().map(|lat| lat.to_radians().cos()).collect()
}

/// Joint weighted mean of a [time, latitude, longitude] block
///
/// `weights` holds one value per latitude row and is broadcast across time and
/// longitude. NaN samples are skipped along with their weight. Returns NaN when
/// no valid sample remains or the weights sum to zero.
///
/// Sums are accumulated relative to the first valid sample, so a constant
/// block reduces to exactly that constant.
pub fn lat_weighted_mean(data: ArrayView3<f64>, weights: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(data.len_of(Axis(1)), weights.len());

    let mut shift: Option<f64> = None;
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;

    for step in data.outer_iter() {
        for (row, &weight) in step.outer_iter().zip(weights.iter()) {
            for &value in row.iter() {
                if value.is_nan() {
                    continue;
                }
                let origin = *shift.get_or_insert(value);
                weighted_sum += weight * (value - origin);
                weight_sum += weight;
            }
        }
    }

    match shift {
        Some(origin) if weight_sum != 0.0 => origin + weighted_sum / weight_sum,
        _ => f64::NAN,
    }
}

/// Plain arithmetic mean, NaN for an empty slice
pub fn arithmetic_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

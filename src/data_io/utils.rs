//! Variable and coordinate names used by the supported products
use netcdf::AttributeValue;

/// Canonical dimension names every field is mapped onto
pub const TIME_DIM: &str = "time";
pub const LATITUDE_DIM: &str = "latitude";
pub const LONGITUDE_DIM: &str = "longitude";

/// Coordinate renames applied to the CERES EBAF reference dataset
pub const CERES_COORDINATE_RENAMES: &[(&str, &str)] = &[("lat", LATITUDE_DIM), ("lon", LONGITUDE_DIM)];

/// MODIS CLDPROP monthly product
pub const MODIS_FILE_PREFIX: &str = "CLDPROP_M3_MODIS_Aqua";
pub const MODIS_REFF_GROUP: &str = "Cloud_Effective_Radius_Liquid";
pub const MODIS_REFF_MEAN: &str = "Mean";

/// CERES EBAF TOA fluxes
pub const CERES_SW_ALL: &str = "toa_sw_all_mon";
pub const CERES_LW_ALL: &str = "toa_lw_all_mon";
pub const CERES_NET_ALL: &str = "toa_net_all_mon";
pub const CERES_SW_CLEAR: &str = "toa_sw_clr_t_mon";
pub const CERES_LW_CLEAR: &str = "toa_lw_clr_t_mon";

/// UM STASH diagnostics: weighted liquid effective radius and its weight
pub const UM_REFF_WEIGHTED: &str = "UM_m01s01i245_vn405.0";
pub const UM_REFF_WEIGHT: &str = "UM_m01s01i246_vn405.0";

/// UM TOA fluxes
pub const UM_SW_IN: &str = "toa_incoming_shortwave_flux";
pub const UM_SW_OUT: &str = "toa_outgoing_shortwave_flux";
pub const UM_SW_OUT_CLEAR: &str = "toa_outgoing_shortwave_flux_assuming_clear_sky";
pub const UM_LW_OUT: &str = "toa_outgoing_longwave_flux";
pub const UM_LW_OUT_CLEAR: &str = "toa_outgoing_longwave_flux_assuming_clear_sky";

/// Check if a canonical dimension name is one of the grid axes
pub fn is_grid_dimension(name: &str) -> bool {
    matches!(name, TIME_DIM | LATITUDE_DIM | LONGITUDE_DIM)
}

/// Numeric value of a scalar (or first element of a vector) attribute
pub fn attribute_as_f64(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Uchar(v) => Some(*v as f64),
        AttributeValue::Schar(v) => Some(*v as f64),
        AttributeValue::Ushort(v) => Some(*v as f64),
        AttributeValue::Short(v) => Some(*v as f64),
        AttributeValue::Uint(v) => Some(*v as f64),
        AttributeValue::Int(v) => Some(*v as f64),
        AttributeValue::Ulonglong(v) => Some(*v as f64),
        AttributeValue::Longlong(v) => Some(*v as f64),
        AttributeValue::Float(v) => Some(*v as f64),
        AttributeValue::Double(v) => Some(*v),
        AttributeValue::Shorts(v) => v.first().map(|x| *x as f64),
        AttributeValue::Ints(v) => v.first().map(|x| *x as f64),
        AttributeValue::Floats(v) => v.first().map(|x| *x as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        _ => None,
    }
}

/// Text value of a string attribute
pub fn attribute_as_string(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::Str(s) => Some(s.clone()),
        AttributeValue::Strs(v) => v.first().cloned(),
        _ => None,
    }
}

/// CF packing and masking attributes of a variable
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Packing {
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
}

impl Packing {
    /// Mask fill values to NaN, then unpack `value * scale_factor + add_offset`
    pub fn decode(&self, value: f64) -> f64 {
        if self.fill_value == Some(value) || self.missing_value == Some(value) || value.is_nan() {
            return f64::NAN;
        }
        value * self.scale_factor.unwrap_or(1.0) + self.add_offset.unwrap_or(0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Packing::default()
    }
}

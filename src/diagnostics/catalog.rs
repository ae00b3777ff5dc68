use crate::data_io::utils::{
    CERES_LW_ALL, CERES_LW_CLEAR, CERES_NET_ALL, CERES_SW_ALL, CERES_SW_CLEAR, MODIS_REFF_MEAN, UM_LW_OUT,
    UM_LW_OUT_CLEAR, UM_REFF_WEIGHT, UM_REFF_WEIGHTED, UM_SW_IN, UM_SW_OUT, UM_SW_OUT_CLEAR,
};
use crate::data_io::GriddedField;
use crate::io::{DataReader, DataReaderError};
use std::fmt;
use tracing::debug;

/// Quantities reduced per region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Liquid cloud droplet effective radius
    Reff,
    /// All-sky outgoing shortwave at TOA
    Sw,
    /// All-sky outgoing longwave at TOA
    Lw,
    /// Clear-sky outgoing shortwave at TOA
    Cssw,
    /// Clear-sky outgoing longwave at TOA
    Cslw,
}

impl Variable {
    pub const ALL: [Variable; 5] = [Variable::Reff, Variable::Sw, Variable::Lw, Variable::Cssw, Variable::Cslw];

    /// Prefix used in output keys
    pub fn key(&self) -> &'static str {
        match self {
            Variable::Reff => "reff",
            Variable::Sw => "SW",
            Variable::Lw => "LW",
            Variable::Cssw => "CSSW",
            Variable::Cslw => "CSLW",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Variable::Reff => 0,
            Variable::Sw => 1,
            Variable::Lw => 2,
            Variable::Cssw => 3,
            Variable::Cslw => 4,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The three latitude bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Northern extratropics, 30..90
    NHex,
    /// Tropics, -30..30
    Trop,
    /// Southern extratropics, -90..-30
    SHex,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::NHex, Region::Trop, Region::SHex];

    /// Suffix used in output keys
    pub fn key(&self) -> &'static str {
        match self {
            Region::NHex => "NHex",
            Region::Trop => "trop",
            Region::SHex => "SHex",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Region::NHex => 0,
            Region::Trop => 1,
            Region::SHex => 2,
        }
    }

    /// Inclusive latitude bounds, south edge first
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Region::NHex => (30.0, 90.0),
            Region::Trop => (-30.0, 30.0),
            Region::SHex => (-90.0, -30.0),
        }
    }
}

/// Named inclusive latitude interval
///
/// The bounds may be stored in either direction; [`RegionSelector::bounds`]
/// always returns them as `(lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSelector {
    pub region: Region,
    a: f64,
    b: f64,
}

impl RegionSelector {
    pub fn new(region: Region, a: f64, b: f64) -> Self {
        Self { region, a, b }
    }

    pub fn standard(region: Region) -> Self {
        let (lo, hi) = region.bounds();
        Self::new(region, lo, hi)
    }

    pub fn bounds(&self) -> (f64, f64) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// Selectors in output order NHex, trop, SHex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSet {
    pub selectors: [RegionSelector; 3],
}

impl RegionSet {
    pub fn standard() -> Self {
        Self {
            selectors: Region::ALL.map(RegionSelector::standard),
        }
    }

    /// Model output runs north to south; the bounds are given in that direction
    pub fn north_to_south() -> Self {
        Self {
            selectors: Region::ALL.map(|region| {
                let (lo, hi) = region.bounds();
                RegionSelector::new(region, hi, lo)
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionSelector> {
        self.selectors.iter()
    }
}

impl Default for RegionSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// How a catalog entry is derived from source variables
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    Direct(String),
    Ratio {
        numerator: String,
        denominator: String,
    },
    Difference {
        minuend: String,
        subtrahends: Vec<String>,
    },
}

impl FieldRule {
    pub fn direct(name: &str) -> Self {
        FieldRule::Direct(name.to_string())
    }

    pub fn ratio(numerator: &str, denominator: &str) -> Self {
        FieldRule::Ratio {
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    pub fn difference(minuend: &str, subtrahends: &[&str]) -> Self {
        FieldRule::Difference {
            minuend: minuend.to_string(),
            subtrahends: subtrahends.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Source variables the rule reads
    pub fn sources(&self) -> Vec<&str> {
        match self {
            FieldRule::Direct(name) => vec![name.as_str()],
            FieldRule::Ratio { numerator, denominator } => vec![numerator.as_str(), denominator.as_str()],
            FieldRule::Difference { minuend, subtrahends } => std::iter::once(minuend.as_str())
                .chain(subtrahends.iter().map(|s| s.as_str()))
                .collect(),
        }
    }

    /// Read the source variables and derive the field, named `name`
    pub fn resolve(&self, name: &str, reader: &dyn DataReader) -> Result<GriddedField, DataReaderError> {
        debug!("Resolving {} from {:?}", name, self.sources());
        match self {
            FieldRule::Direct(source) => reader.read_field(source),
            FieldRule::Ratio { numerator, denominator } => {
                let top = reader.read_field(numerator)?;
                let bottom = reader.read_field(denominator)?;
                Ok(top.zip_with(&bottom, name, |a, b| a / b)?)
            }
            FieldRule::Difference { minuend, subtrahends } => {
                let mut result = reader.read_field(minuend)?;
                for subtrahend in subtrahends {
                    let other = reader.read_field(subtrahend)?;
                    result = result.zip_with(&other, name, |a, b| a - b)?;
                }
                Ok(result)
            }
        }
    }
}

/// Per-family rule table for the six catalog entries
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRules {
    pub reff: FieldRule,
    pub sw: FieldRule,
    pub lw: FieldRule,
    pub cssw: FieldRule,
    pub cslw: FieldRule,
    pub net: FieldRule,
}

impl CatalogRules {
    /// MODIS effective radius with CERES EBAF fluxes
    pub fn observational() -> Self {
        Self {
            reff: FieldRule::direct(MODIS_REFF_MEAN),
            sw: FieldRule::direct(CERES_SW_ALL),
            lw: FieldRule::direct(CERES_LW_ALL),
            cssw: FieldRule::direct(CERES_SW_CLEAR),
            cslw: FieldRule::direct(CERES_LW_CLEAR),
            net: FieldRule::direct(CERES_NET_ALL),
        }
    }

    /// UM output, effective radius from the weighted diagnostic and its weight
    pub fn model() -> Self {
        Self {
            reff: FieldRule::ratio(UM_REFF_WEIGHTED, UM_REFF_WEIGHT),
            sw: FieldRule::direct(UM_SW_OUT),
            lw: FieldRule::direct(UM_LW_OUT),
            cssw: FieldRule::direct(UM_SW_OUT_CLEAR),
            cslw: FieldRule::direct(UM_LW_OUT_CLEAR),
            net: FieldRule::difference(UM_SW_IN, &[UM_SW_OUT, UM_LW_OUT]),
        }
    }

    pub fn rule(&self, variable: Variable) -> &FieldRule {
        match variable {
            Variable::Reff => &self.reff,
            Variable::Sw => &self.sw,
            Variable::Lw => &self.lw,
            Variable::Cssw => &self.cssw,
            Variable::Cslw => &self.cslw,
        }
    }
}

/// Resolved fields, ready for reduction
#[derive(Debug, Clone)]
pub struct VariableCatalog {
    fields: [GriddedField; 5],
    net: GriddedField,
}

impl VariableCatalog {
    /// Fields in [`Variable::ALL`] order plus `net`
    pub fn new(fields: [GriddedField; 5], net: GriddedField) -> Self {
        Self { fields, net }
    }

    /// Resolve every rule against a reader. Fails on the first missing source.
    pub fn resolve(rules: &CatalogRules, reader: &dyn DataReader) -> Result<Self, DataReaderError> {
        let [reff, sw, lw, cssw, cslw] = Variable::ALL;
        let fields = [
            rules.rule(reff).resolve(reff.key(), reader)?,
            rules.rule(sw).resolve(sw.key(), reader)?,
            rules.rule(lw).resolve(lw.key(), reader)?,
            rules.rule(cssw).resolve(cssw.key(), reader)?,
            rules.rule(cslw).resolve(cslw.key(), reader)?,
        ];
        let net = rules.net.resolve("net", reader)?;
        Ok(Self::new(fields, net))
    }

    pub fn field(&self, variable: Variable) -> &GriddedField {
        &self.fields[variable.index()]
    }

    pub fn net(&self) -> &GriddedField {
        &self.net
    }
}

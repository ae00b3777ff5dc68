use super::catalog::{Region, Variable};
use crate::math::arithmetic_mean;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Key of the global net flux scalar
pub const NET_KEY: &str = "net";

/// Regional means of the five catalog variables plus global net
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionalMeansResult {
    regional: [[f64; 3]; 5],
    net: f64,
}

impl RegionalMeansResult {
    /// `regional` is indexed by [`Variable::index`] then [`Region::index`]
    pub fn new(regional: [[f64; 3]; 5], net: f64) -> Self {
        Self { regional, net }
    }

    pub fn get(&self, variable: Variable, region: Region) -> f64 {
        self.regional[variable.index()][region.index()]
    }

    pub fn net(&self) -> f64 {
        self.net
    }

    /// Flatten into the 16 output keys
    pub fn to_scalars(&self) -> ScalarMap {
        let mut scalars = ScalarMap::with_capacity(16);
        for variable in Variable::ALL {
            for region in Region::ALL {
                scalars.push(format!("{}{}", variable.key(), region.key()), self.get(variable, region));
            }
        }
        scalars.push(NET_KEY, self.net);
        scalars
    }
}

/// Ordered `name -> value` mapping
///
/// Serialises as a JSON object in insertion order. NaN becomes `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarMap {
    entries: Vec<(String, f64)>,
}

impl ScalarMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.entries.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| *value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ScalarMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for ScalarMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// Per-year results, reduced once at the end by an unweighted mean
#[derive(Debug, Clone, Default)]
pub struct AnnualAggregate {
    years: Vec<(i32, RegionalMeansResult)>,
}

impl AnnualAggregate {
    pub fn with_capacity(years: usize) -> Self {
        Self {
            years: Vec::with_capacity(years),
        }
    }

    pub fn push(&mut self, year: i32, result: RegionalMeansResult) {
        self.years.push((year, result));
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.iter().map(|(year, _)| *year)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Mean of each scalar across years. An empty aggregate gives all-NaN.
    pub fn finish(&self) -> RegionalMeansResult {
        let mut regional = [[f64::NAN; 3]; 5];
        for variable in Variable::ALL {
            for region in Region::ALL {
                let values: Vec<f64> = self.years.iter().map(|(_, r)| r.get(variable, region)).collect();
                regional[variable.index()][region.index()] = arithmetic_mean(&values);
            }
        }
        let nets: Vec<f64> = self.years.iter().map(|(_, r)| r.net()).collect();
        RegionalMeansResult::new(regional, arithmetic_mean(&nets))
    }
}

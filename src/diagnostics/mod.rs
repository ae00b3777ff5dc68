pub mod catalog;
pub mod model;
pub mod observational;
pub mod reducer;
pub mod result;

pub use catalog::{CatalogRules, FieldRule, Region, RegionSelector, RegionSet, Variable, VariableCatalog};
pub use model::{model_input_files, run_model_job, ModelAdapter};
pub use observational::{run_observational_job, CloudProductLoader, ObservationalAdapter, ReferenceFields, YearlySource};
pub use reducer::{global_mean, reduce_catalog, regional_mean};
pub use result::{AnnualAggregate, RegionalMeansResult, ScalarMap};

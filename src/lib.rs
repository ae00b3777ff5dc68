pub mod config;
pub mod data_io;
pub mod diagnostics;
pub mod errors;
pub mod io;
pub mod logging;
pub mod math;
pub mod time_utils;

pub use errors::{SimObsError, SimObsResult};
pub use time_utils::*;

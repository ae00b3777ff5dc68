pub mod ascii_writer;
pub mod common;
pub mod field;
pub mod memory;
pub mod output_trait;
pub mod reader;
pub mod utils;
pub mod writer;

pub use ascii_writer::AsciiScalarWriter;
pub use field::{regular_latitudes, FieldError, GriddedField, LatitudeOrder, RawField};
pub use memory::MemoryDataset;
pub use output_trait::{create_writer, create_writer_auto, OutputFormat, ScalarWriter, WriteError};
pub use reader::*;
pub use writer::JsonScalarWriter;

//! Input parsing and the raw data model.

mod dataset;
mod parser;
mod source;
mod value;

pub use dataset::{cell, Dataset, Row};
pub use parser::{Parser, ParserConfig};
pub use source::{SourceFormat, SourceMetadata};
pub use value::{RawValue, ValueKey};

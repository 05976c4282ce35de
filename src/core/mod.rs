pub mod converters;
pub mod dispatch;
pub mod engine;

pub use crate::domain::model::{
    Artifact, ConversionRequest, DataSource, Destination, Format, ResultSet, Row, Value,
};
pub use crate::domain::ports::{Converter, DocumentSink, Source, Storage};
pub use crate::utils::error::Result;

pub mod csv;
pub mod json;
pub mod mongodb;
pub mod sql;

pub use csv::CsvConverter;
pub use json::JsonConverter;
pub use mongodb::MongodbConverter;
pub use sql::SqlConverter;

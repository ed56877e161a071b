//! Format handlers

mod csv;
mod json;
mod xml;

pub use self::csv::CsvHandler;
pub use self::json::JsonHandler;
pub use self::xml::{TEXT_KEY, XmlHandler};

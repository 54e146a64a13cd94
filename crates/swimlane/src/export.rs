pub mod xml;

use thiserror::Error;

use crate::definitions::Definitions;

// A single Exporter trait for every output format of a compiled document
pub trait Exporter {
    fn export_definitions(&self, definitions: &Definitions) -> Result<String, Error>;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to write XML: {0}")]
    Write(String),

    #[error("output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

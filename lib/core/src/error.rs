use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("Landmark not recognized: {0}")]
    LandmarkNotFound(String),

    #[error("Catalog build precondition failed: {0}")]
    BuildPrecondition(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for lookups against a name the catalog does not know.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PropertyNotFound(_) | Error::LandmarkNotFound(_))
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TareError {
    #[error("Key `{path}` doesn't match any entry in settings")]
    KeyNotFound { path: String },
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Check for setting `{path}` failed: got {value}, expected {expected}")]
    Validation {
        path: String,
        value: String,
        expected: String,
    },
    #[error("Obligatory setting `{path}` was not supplied")]
    MissingObligatory { path: String },
    #[error("Cannot traverse `{path}`: not a settings section")]
    Structure { path: String },
    #[error("Parse error for `{path}`: {message}")]
    Parse { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, TareError>;

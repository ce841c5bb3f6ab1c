use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown field type '{0}'")]
    InvalidFieldType(String),
    #[error("unknown validation type '{0}'")]
    InvalidValidationType(String),
    #[error("invalid required flag '{0}' (expected 'y' or empty)")]
    InvalidRequiredFlag(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

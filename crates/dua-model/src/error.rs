use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid {kind} id: {value:?}")]
    InvalidId { kind: &'static str, value: String },
    #[error("unknown dua field: {0}")]
    UnknownField(String),
    #[error("field selection is empty")]
    EmptySelection,
}

pub type Result<T> = std::result::Result<T, ModelError>;

use thiserror::Error;

use crate::TypeTag;

/// An attribute descriptor whose type tag, value map and value range disagree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("attribute key must not be empty")]
    EmptyKey,
    #[error("attribute {key}: Enum requires a value_map")]
    MissingValueMap { key: String },
    #[error("attribute {key}: value_map must not be empty")]
    EmptyValueMap { key: String },
    #[error("attribute {key}: Number requires a value_range")]
    MissingValueRange { key: String },
    #[error("attribute {key}: {type_tag} must not carry a value_map")]
    UnexpectedValueMap { key: String, type_tag: TypeTag },
    #[error("attribute {key}: {type_tag} must not carry a value_range")]
    UnexpectedValueRange { key: String, type_tag: TypeTag },
    #[error("attribute {key}: invalid value_range {range:?}: {reason}")]
    InvalidRange {
        key: String,
        range: String,
        reason: &'static str,
    },
    #[error("attribute {key}: step must be a positive number, got {step}")]
    InvalidStep { key: String, step: f64 },
    #[error("attribute {key}: label {label:?} is mapped from more than one raw value")]
    DuplicateLabel { key: String, label: String },
    #[error("duplicate attribute key: {key}")]
    DuplicateKey { key: String },
}

/// A raw value rejected by the schema it was checked against.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("{key}: {value:?} is not one of the mapped values")]
    NotInValueMap { key: String, value: String },
    #[error("{key}: {value:?} is not a number")]
    NotANumber { key: String, value: String },
    #[error("{key}: {value} is outside {range}")]
    OutOfRange {
        key: String,
        value: f64,
        range: String,
    },
    #[error("{key}: {value} is not a multiple of step {step} from {min}")]
    OffStep {
        key: String,
        value: f64,
        step: f64,
        min: f64,
    },
    #[error("{key}: {value:?} is not a boolean")]
    NotABoolean { key: String, value: String },
}

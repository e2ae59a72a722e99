use attribute_schema::ValidationError;
use thiserror::Error;

use crate::ParserVariant;

/// No rule matched the device; carries the device type that was passed in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported device type: {device_type}")]
pub struct UnsupportedDeviceError {
    pub device_type: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("parser table {variant} is malformed: {message}")]
    MalformedTable {
        variant: ParserVariant,
        message: String,
    },
    #[error("parser table {variant}: {source}")]
    InvalidTable {
        variant: ParserVariant,
        #[source]
        source: ValidationError,
    },
    #[error("duplicate registry entry ({device_type:?}, {feature_code:?})")]
    DuplicateEntry {
        device_type: String,
        feature_code: String,
    },
}

/// Failure of the crate-level [`crate::resolve`] helper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedDeviceError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

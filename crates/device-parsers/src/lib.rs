//! device-parsers: attribute tables for appliance families and the resolver that
//! picks one from a device's reported type and feature codes
//!
//! Tables are YAML documents compiled into the crate, one per [`ParserVariant`].
//! A [`ParserRegistry`] indexes them by `(device_type, feature_code)` and falls back
//! through special cases, legacy families and a generic parser before giving up with
//! [`UnsupportedDeviceError`].

mod error;
pub use error::{RegistryError, ResolveError, UnsupportedDeviceError};

mod variant;
pub use variant::ParserVariant;

mod parser;
pub use parser::{DeviceParser, ParserTable};

mod rules;
pub use rules::{FallbackRules, LegacyRoute, RegistryConfig, RegistryEntry};

mod registry;
pub use registry::{ParserRegistry, Resolution, ResolutionPath};

mod loader;
pub use loader::{load_parser_file, load_registry, load_registry_config};

mod metrics;
pub use metrics::{MetricsHub, ResolverMetrics};

mod decode;
pub use decode::{label_telemetry, TelemetryRecord};

mod encode;
pub use encode::{build_write_command, WriteCommand};

pub use attribute_schema::{
    AttributeSchema, AttributeSpec, AttributeValue, ReadWrite, TypeTag, ValidationError,
    ValueError, ValueRange,
};

/// Resolve against the process-wide builtin registry.
pub fn resolve(
    device_type: &str,
    feature_code: &str,
) -> Result<&'static DeviceParser, ResolveError> {
    let registry = ParserRegistry::builtin()?;
    Ok(registry.resolve(device_type, feature_code)?)
}

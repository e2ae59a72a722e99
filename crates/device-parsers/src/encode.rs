use anyhow::Context;
use attribute_schema::TypeTag;
use serde::Serialize;

use crate::DeviceParser;

/// A validated key/value pair ready for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteCommand {
    pub key: String,
    pub value: String,
}

/// Validate a user-supplied value for `key`. Enum attributes accept either the raw
/// value or its label; the command always carries the raw value.
pub fn build_write_command(
    parser: &DeviceParser,
    key: &str,
    value: &str,
) -> anyhow::Result<WriteCommand> {
    let schema = parser
        .attribute(key)
        .with_context(|| format!("attribute not found: {key}"))?;
    if !schema.is_writable() {
        anyhow::bail!("attribute is read-only: {key}");
    }

    let raw = match schema.type_tag() {
        TypeTag::Enum if schema.label(value).is_none() => {
            schema.raw_for_label(value).unwrap_or(value)
        }
        _ => value,
    };
    schema.check_write_value(raw)?;

    Ok(WriteCommand {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParserRegistry, RegistryConfig};

    fn dishwasher() -> DeviceParser {
        let reg = ParserRegistry::from_config(RegistryConfig::builtin()).unwrap();
        reg.resolve("015", "50.2f").unwrap().clone()
    }

    #[test]
    fn test_enum_by_raw_or_label() {
        let parser = dishwasher();
        let by_raw = build_write_command(&parser, "selected_program", "3").unwrap();
        let by_label = build_write_command(&parser, "selected_program", "Intensive").unwrap();
        assert_eq!(by_raw, by_label);
        assert_eq!(by_raw.value, "3");
    }

    #[test]
    fn test_number_range() {
        let parser = dishwasher();
        assert!(build_write_command(&parser, "delay_start", "12").is_ok());
        assert!(build_write_command(&parser, "delay_start", "25").is_err());
        let err = build_write_command(&parser, "delay_start", "12.5").unwrap_err();
        assert!(err.to_string().contains("step"));
    }

    #[test]
    fn test_read_only_and_unknown() {
        let parser = dishwasher();
        let err = build_write_command(&parser, "door", "1").unwrap_err();
        assert!(err.to_string().contains("read-only"));
        let err = build_write_command(&parser, "spin_speed", "1").unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(build_write_command(&parser, "power", "Standby").is_err());
    }
}

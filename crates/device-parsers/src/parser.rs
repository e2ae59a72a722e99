use attribute_schema::{AttributeSchema, AttributeSpec, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ParserVariant, RegistryError};

/// Parser table as written in YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserTable {
    pub device_type: String,
    #[serde(default)]
    pub feature_code: String,
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
}

/// Attribute schemas for one device family, keyed by attribute key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceParser {
    device_type: String,
    feature_code: String,
    attributes: BTreeMap<String, AttributeSchema>,
}

impl DeviceParser {
    pub fn new(
        device_type: impl Into<String>,
        feature_code: impl Into<String>,
        attributes: impl IntoIterator<Item = AttributeSchema>,
    ) -> Result<Self, ValidationError> {
        let mut map = BTreeMap::new();
        for attr in attributes {
            let key = attr.key().to_string();
            if map.insert(key.clone(), attr).is_some() {
                return Err(ValidationError::DuplicateKey { key });
            }
        }
        Ok(Self {
            device_type: device_type.into(),
            feature_code: feature_code.into(),
            attributes: map,
        })
    }

    pub fn from_table(table: ParserTable) -> Result<Self, ValidationError> {
        let attributes = table
            .attributes
            .into_iter()
            .map(AttributeSchema::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(table.device_type, table.feature_code, attributes)
    }

    /// Parse and validate a YAML table.
    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let table: ParserTable = serde_yaml::from_str(raw)?;
        Ok(Self::from_table(table)?)
    }

    /// Build the table bundled for `variant`.
    pub fn builtin(variant: ParserVariant) -> Result<Self, RegistryError> {
        let table: ParserTable = serde_yaml::from_str(variant.table_source()).map_err(|e| {
            RegistryError::MalformedTable {
                variant,
                message: e.to_string(),
            }
        })?;
        Self::from_table(table).map_err(|source| RegistryError::InvalidTable { variant, source })
    }

    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    pub fn feature_code(&self) -> &str {
        &self.feature_code
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeSchema> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeSchema> {
        self.attributes.get(key)
    }

    /// Attributes a user may set.
    pub fn writable(&self) -> impl Iterator<Item = &AttributeSchema> {
        self.attributes.values().filter(|a| a.is_writable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attribute_schema::{ReadWrite, TypeTag};

    #[test]
    fn test_builtin_tables_load() {
        for v in ParserVariant::ALL {
            let parser = DeviceParser::builtin(v).unwrap();
            assert!(!parser.attributes().is_empty(), "{v} has no attributes");
        }
    }

    #[test]
    fn test_dishwasher_table() {
        let parser = DeviceParser::builtin(ParserVariant::Dishwasher015502f).unwrap();
        assert_eq!(parser.device_type(), "015");
        assert_eq!(parser.feature_code(), "50.2f");
        assert_eq!(parser.attributes().len(), 13);

        let door = parser.attribute("door").unwrap();
        assert_eq!(door.type_tag(), TypeTag::Enum);
        assert_eq!(door.read_write(), ReadWrite::Read);
        assert_eq!(door.label("0"), Some("Closed"));
        assert_eq!(door.label("1"), Some("Open"));

        let writable: Vec<&str> = parser.writable().map(|a| a.key()).collect();
        assert_eq!(
            writable,
            vec![
                "delay_start",
                "extra_rinse",
                "power",
                "selected_program",
                "temperature"
            ]
        );
    }

    #[test]
    fn test_duplicate_attribute_key() {
        let raw = r#"
device_type: "099"
attributes:
  - key: t_power
    name: Power
    type: Enum
    value_map: {"0": "Off", "1": "On"}
  - key: t_power
    name: Power Again
    type: Enum
    value_map: {"0": "Off", "1": "On"}
"#;
        let err = DeviceParser::from_yaml_str(raw).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::DuplicateKey {
                key: "t_power".to_string()
            })
        );
    }

    #[test]
    fn test_feature_code_defaults_to_empty() {
        let raw = r#"
device_type: "099"
attributes:
  - key: f_temp_in
    name: Indoor Temperature
    type: Number
    value_range: "-20~60"
"#;
        let parser = DeviceParser::from_yaml_str(raw).unwrap();
        assert_eq!(parser.feature_code(), "");
        assert_eq!(parser.writable().count(), 0);
    }
}

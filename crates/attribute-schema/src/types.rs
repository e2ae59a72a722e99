use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::ValidationError;

/// Data type of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Enum,
    Number,
    Boolean,
    String,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeTag::Enum => "Enum",
            TypeTag::Number => "Number",
            TypeTag::Boolean => "Boolean",
            TypeTag::String => "String",
        };
        f.write_str(s)
    }
}

/// Whether an attribute is only reported by the device or also user-settable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadWrite {
    #[default]
    #[serde(rename = "R")]
    Read,
    #[serde(rename = "RW")]
    ReadWrite,
}

impl fmt::Display for ReadWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadWrite::Read => f.write_str("R"),
            ReadWrite::ReadWrite => f.write_str("RW"),
        }
    }
}

/// Inclusive numeric bound, written `min~max` in attribute tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Bounds must be finite and ordered.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if min.is_finite() && max.is_finite() && min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl FromStr for ValueRange {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = s.split_once('~').ok_or("expected min~max")?;
        let min = lo.trim().parse::<f64>().map_err(|_| "min is not a number")?;
        let max = hi.trim().parse::<f64>().map_err(|_| "max is not a number")?;
        Self::new(min, max).ok_or("bounds must be finite with min <= max")
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.min, self.max)
    }
}

fn default_step() -> f64 {
    1.0
}

/// Attribute descriptor as written in a parser table, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_map: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_range: Option<String>,
    #[serde(default)]
    pub read_write: ReadWrite,
}

/// A validated, read-only attribute descriptor.
///
/// Enum schemas always carry a non-empty value map and Number schemas always carry a
/// range; Boolean and String schemas carry neither. Deserializing goes through the
/// same checks as [`AttributeSchema::try_from`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AttributeSpec", into = "AttributeSpec")]
pub struct AttributeSchema {
    key: String,
    name: String,
    type_tag: TypeTag,
    step: f64,
    value_map: Option<BTreeMap<String, String>>,
    value_range: Option<ValueRange>,
    read_write: ReadWrite,
}

impl AttributeSchema {
    /// Enum attribute from `(raw value, label)` pairs.
    pub fn enumeration<I, R, L>(
        key: impl Into<String>,
        name: impl Into<String>,
        read_write: ReadWrite,
        values: I,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (R, L)>,
        R: Into<String>,
        L: Into<String>,
    {
        Self::try_from(AttributeSpec {
            key: key.into(),
            name: name.into(),
            type_tag: TypeTag::Enum,
            step: default_step(),
            value_map: Some(
                values
                    .into_iter()
                    .map(|(r, l)| (r.into(), l.into()))
                    .collect(),
            ),
            value_range: None,
            read_write,
        })
    }

    /// Number attribute bounded by a `min~max` range.
    pub fn number(
        key: impl Into<String>,
        name: impl Into<String>,
        read_write: ReadWrite,
        range: &str,
        step: f64,
    ) -> Result<Self, ValidationError> {
        Self::try_from(AttributeSpec {
            key: key.into(),
            name: name.into(),
            type_tag: TypeTag::Number,
            step,
            value_map: None,
            value_range: Some(range.to_string()),
            read_write,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn value_map(&self) -> Option<&BTreeMap<String, String>> {
        self.value_map.as_ref()
    }

    pub fn value_range(&self) -> Option<ValueRange> {
        self.value_range
    }

    pub fn read_write(&self) -> ReadWrite {
        self.read_write
    }

    pub fn is_writable(&self) -> bool {
        self.read_write == ReadWrite::ReadWrite
    }

    /// Display label for a raw enum value.
    pub fn label(&self, raw: &str) -> Option<&str> {
        self.value_map.as_ref()?.get(raw).map(String::as_str)
    }

    /// Raw enum value carrying `label`.
    pub fn raw_for_label(&self, label: &str) -> Option<&str> {
        self.value_map
            .as_ref()?
            .iter()
            .find(|(_, l)| l.as_str() == label)
            .map(|(raw, _)| raw.as_str())
    }
}

impl TryFrom<AttributeSpec> for AttributeSchema {
    type Error = ValidationError;

    fn try_from(spec: AttributeSpec) -> Result<Self, Self::Error> {
        if spec.key.is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        let key = spec.key;
        let type_tag = spec.type_tag;

        let (value_map, value_range) = match type_tag {
            TypeTag::Enum => {
                if spec.value_range.is_some() {
                    return Err(ValidationError::UnexpectedValueRange { key, type_tag });
                }
                let map = match spec.value_map {
                    Some(map) => map,
                    None => return Err(ValidationError::MissingValueMap { key }),
                };
                if map.is_empty() {
                    return Err(ValidationError::EmptyValueMap { key });
                }
                check_unique_labels(&key, &map)?;
                (Some(map), None)
            }
            TypeTag::Number => {
                if spec.value_map.is_some() {
                    return Err(ValidationError::UnexpectedValueMap { key, type_tag });
                }
                let text = match spec.value_range {
                    Some(text) => text,
                    None => return Err(ValidationError::MissingValueRange { key }),
                };
                let range = match text.parse::<ValueRange>() {
                    Ok(range) => range,
                    Err(reason) => {
                        return Err(ValidationError::InvalidRange {
                            key,
                            range: text,
                            reason,
                        })
                    }
                };
                if !(spec.step.is_finite() && spec.step > 0.0) {
                    return Err(ValidationError::InvalidStep {
                        key,
                        step: spec.step,
                    });
                }
                (None, Some(range))
            }
            TypeTag::Boolean | TypeTag::String => {
                if spec.value_map.is_some() {
                    return Err(ValidationError::UnexpectedValueMap { key, type_tag });
                }
                if spec.value_range.is_some() {
                    return Err(ValidationError::UnexpectedValueRange { key, type_tag });
                }
                (None, None)
            }
        };

        Ok(Self {
            key,
            name: spec.name,
            type_tag,
            step: spec.step,
            value_map,
            value_range,
            read_write: spec.read_write,
        })
    }
}

impl From<AttributeSchema> for AttributeSpec {
    fn from(schema: AttributeSchema) -> Self {
        Self {
            key: schema.key,
            name: schema.name,
            type_tag: schema.type_tag,
            step: schema.step,
            value_map: schema.value_map,
            value_range: schema.value_range.map(|r| r.to_string()),
            read_write: schema.read_write,
        }
    }
}

fn check_unique_labels(key: &str, map: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for label in map.values() {
        if !seen.insert(label.as_str()) {
            return Err(ValidationError::DuplicateLabel {
                key: key.to_string(),
                label: label.clone(),
            });
        }
    }
    Ok(())
}

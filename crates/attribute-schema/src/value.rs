use core::fmt;
use serde::Serialize;

use crate::{AttributeSchema, TypeTag, ValueError};

/// Tolerance when checking that a number lands on the schema's step grid.
const STEP_EPSILON: f64 = 1e-9;

/// A raw value that passed its schema, in typed form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Label { raw: String, label: String },
    Number(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Label { raw, label } => write!(f, "{label} ({raw})"),
            AttributeValue::Number(v) => write!(f, "{v}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl AttributeSchema {
    /// Check a reported value against this schema. Numbers only need to fall inside
    /// the range; devices report sensor readings finer than `step`.
    pub fn check_value(&self, raw: &str) -> Result<AttributeValue, ValueError> {
        match self.type_tag() {
            TypeTag::Enum => match self.label(raw) {
                Some(label) => Ok(AttributeValue::Label {
                    raw: raw.to_string(),
                    label: label.to_string(),
                }),
                None => Err(ValueError::NotInValueMap {
                    key: self.key().to_string(),
                    value: raw.to_string(),
                }),
            },
            TypeTag::Number => {
                let value = raw.parse::<f64>().map_err(|_| ValueError::NotANumber {
                    key: self.key().to_string(),
                    value: raw.to_string(),
                })?;
                if let Some(range) = self.value_range() {
                    if !range.contains(value) {
                        return Err(ValueError::OutOfRange {
                            key: self.key().to_string(),
                            value,
                            range: range.to_string(),
                        });
                    }
                }
                Ok(AttributeValue::Number(value))
            }
            TypeTag::Boolean => match raw {
                "1" | "true" => Ok(AttributeValue::Bool(true)),
                "0" | "false" => Ok(AttributeValue::Bool(false)),
                _ => Err(ValueError::NotABoolean {
                    key: self.key().to_string(),
                    value: raw.to_string(),
                }),
            },
            TypeTag::String => Ok(AttributeValue::Text(raw.to_string())),
        }
    }

    /// Like [`check_value`](Self::check_value), and a number must also land on the
    /// `step` grid counted from the range minimum.
    pub fn check_write_value(&self, raw: &str) -> Result<AttributeValue, ValueError> {
        let value = self.check_value(raw)?;
        if let (AttributeValue::Number(n), Some(range)) = (&value, self.value_range()) {
            let steps = (n - range.min()) / self.step();
            if (steps - steps.round()).abs() > STEP_EPSILON {
                return Err(ValueError::OffStep {
                    key: self.key().to_string(),
                    value: *n,
                    step: self.step(),
                    min: range.min(),
                });
            }
        }
        Ok(value)
    }
}

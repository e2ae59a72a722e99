use attribute_schema::AttributeValue;
use serde::Serialize;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tracing::debug;

use crate::DeviceParser;

/// Raw telemetry checked against a parser's schemas.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    pub device_type: String,
    pub feature_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    pub fields: BTreeMap<String, AttributeValue>,
    /// Key to rejection reason.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rejected: BTreeMap<String, String>,
    /// Keys the parser has no schema for.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmapped: Vec<String>,
}

pub fn label_telemetry<I, K, V>(
    parser: &DeviceParser,
    raw: I,
    ts: Option<OffsetDateTime>,
) -> TelemetryRecord
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut fields = BTreeMap::new();
    let mut rejected = BTreeMap::new();
    let mut unmapped = Vec::new();

    for (key, value) in raw {
        let key = key.as_ref();
        let Some(schema) = parser.attribute(key) else {
            unmapped.push(key.to_string());
            continue;
        };
        match schema.check_value(value.as_ref()) {
            Ok(v) => {
                fields.insert(key.to_string(), v);
            }
            Err(e) => {
                debug!(device_type = parser.device_type(), error = %e, "telemetry value rejected");
                rejected.insert(key.to_string(), e.to_string());
            }
        }
    }
    unmapped.sort();

    TelemetryRecord {
        device_type: parser.device_type().to_string(),
        feature_code: parser.feature_code().to_string(),
        ts: ts.and_then(|t| {
            t.format(&time::format_description::well_known::Rfc3339)
                .ok()
        }),
        fields,
        rejected,
        unmapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParserRegistry, RegistryConfig};
    use std::collections::HashMap;

    #[test]
    fn test_label_dishwasher_status() {
        let reg = ParserRegistry::from_config(RegistryConfig::builtin()).unwrap();
        let parser = reg.resolve("015", "50.2f").unwrap();

        let raw: HashMap<String, String> = [
            ("door", "1"),
            ("remaining_time", "42"),
            ("salt_level", "9"),
            ("wifi_rssi", "-60"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let rec = label_telemetry(parser, &raw, None);
        assert_eq!(rec.device_type, "015");
        assert_eq!(
            rec.fields.get("door"),
            Some(&AttributeValue::Label {
                raw: "1".to_string(),
                label: "Open".to_string()
            })
        );
        assert_eq!(
            rec.fields.get("remaining_time"),
            Some(&AttributeValue::Number(42.0))
        );
        assert!(rec.rejected.contains_key("salt_level"));
        assert_eq!(rec.unmapped, vec!["wifi_rssi".to_string()]);
        assert!(rec.ts.is_none());
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let reg = ParserRegistry::from_config(RegistryConfig::builtin()).unwrap();
        let parser = reg.resolve("007", "").unwrap();
        let rec = label_telemetry(parser, [("f_humidity", "55")], Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(rec.ts.as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(rec.fields.len(), 1);
    }

    #[test]
    fn test_sensor_readings_finer_than_step() {
        let reg = ParserRegistry::from_config(RegistryConfig::builtin()).unwrap();
        let parser = reg.resolve("007", "").unwrap();
        let rec = label_telemetry(parser, [("f_humidity", "55.5"), ("t_humidity", "55.5")], None);
        assert_eq!(rec.fields.get("f_humidity"), Some(&AttributeValue::Number(55.5)));
        assert!(rec.rejected.is_empty());
    }
}

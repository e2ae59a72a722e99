use serde::{Deserialize, Serialize};

use crate::ParserVariant;

/// `(device_type, feature_code)` routed to a parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub device_type: String,
    #[serde(default)]
    pub feature_code: String,
    pub parser: ParserVariant,
}

impl RegistryEntry {
    pub fn new(
        device_type: impl Into<String>,
        feature_code: impl Into<String>,
        parser: ParserVariant,
    ) -> Self {
        Self {
            device_type: device_type.into(),
            feature_code: feature_code.into(),
            parser,
        }
    }
}

/// Family that predates feature codes and always gets the same parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRoute {
    pub device_type: String,
    pub parser: ParserVariant,
}

/// Rules consulted, in field order, when no exact entry matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackRules {
    /// Pairs pinned to a parser even if their exact entry is missing.
    #[serde(default)]
    pub special_cases: Vec<RegistryEntry>,
    #[serde(default)]
    pub legacy: Vec<LegacyRoute>,
    /// Families served by `generic` when nothing more specific matched.
    #[serde(default)]
    pub generic_whitelist: Vec<String>,
    pub generic: ParserVariant,
}

impl FallbackRules {
    pub fn builtin() -> Self {
        Self {
            // 015/50.2f must never reach the generic parser.
            special_cases: vec![RegistryEntry::new(
                "015",
                "50.2f",
                ParserVariant::Dishwasher015502f,
            )],
            legacy: vec![LegacyRoute {
                device_type: "007".to_string(),
                parser: ParserVariant::Humidity007,
            }],
            generic_whitelist: ["009", "008", "006", "015", "016", "025"]
                .into_iter()
                .map(String::from)
                .collect(),
            generic: ParserVariant::Bean,
        }
    }
}

impl Default for FallbackRules {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Exact-match entries plus fallback rules; the input to a registry build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub entries: Vec<RegistryEntry>,
    #[serde(default)]
    pub rules: FallbackRules,
}

impl RegistryConfig {
    /// Five registered pairs. The 009/199 and 008/399 tables are bundled but
    /// unregistered; those devices reach the generic parser unless a config file
    /// routes them.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                RegistryEntry::new("035", "699", ParserVariant::SplitWater035699),
                RegistryEntry::new("006", "299", ParserVariant::Split006299),
                RegistryEntry::new("007", "", ParserVariant::Humidity007),
                RegistryEntry::new("015", "50.2f", ParserVariant::Dishwasher015502f),
                RegistryEntry::new("025", "", ParserVariant::WashingMachine025),
            ],
            rules: FallbackRules::builtin(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::{
    DeviceParser, FallbackRules, ParserVariant, RegistryConfig, RegistryEntry, RegistryError,
    UnsupportedDeviceError,
};

/// Which rule selected the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionPath {
    Exact,
    SpecialCase,
    Legacy,
    Generic,
}

impl ResolutionPath {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionPath::Exact => "exact",
            ResolutionPath::SpecialCase => "special_case",
            ResolutionPath::Legacy => "legacy",
            ResolutionPath::Generic => "generic",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub variant: ParserVariant,
    pub path: ResolutionPath,
    pub parser: &'a DeviceParser,
}

/// Immutable lookup from device identifiers to parsers.
///
/// Resolution order, first match wins:
/// 1. exact `(device_type, feature_code)` entry
/// 2. special-case pair from [`FallbackRules::special_cases`]
/// 3. legacy family from [`FallbackRules::legacy`], feature code ignored
/// 4. whitelisted family, served by [`FallbackRules::generic`]
///
/// Identifiers are compared byte for byte; an empty feature code is an ordinary key.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    // indexed by ParserVariant::index
    parsers: Vec<DeviceParser>,
    exact: HashMap<String, HashMap<String, ParserVariant>>,
    entries: Vec<RegistryEntry>,
    rules: FallbackRules,
}

impl ParserRegistry {
    /// Load every bundled table and index `config`. Fails on the first bad table or
    /// repeated entry.
    pub fn from_config(config: RegistryConfig) -> Result<Self, RegistryError> {
        let parsers = ParserVariant::ALL
            .into_iter()
            .map(DeviceParser::builtin)
            .collect::<Result<Vec<_>, _>>()?;

        let mut exact: HashMap<String, HashMap<String, ParserVariant>> = HashMap::new();
        for entry in &config.entries {
            let codes = exact.entry(entry.device_type.clone()).or_default();
            if codes.insert(entry.feature_code.clone(), entry.parser).is_some() {
                return Err(RegistryError::DuplicateEntry {
                    device_type: entry.device_type.clone(),
                    feature_code: entry.feature_code.clone(),
                });
            }
        }

        debug!(
            entries = config.entries.len(),
            parsers = parsers.len(),
            "parser registry built"
        );
        Ok(Self {
            parsers,
            exact,
            entries: config.entries,
            rules: config.rules,
        })
    }

    /// Process-wide registry built from [`RegistryConfig::builtin`] on first use.
    pub fn builtin() -> Result<&'static ParserRegistry, RegistryError> {
        static BUILTIN: OnceLock<Result<ParserRegistry, RegistryError>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| Self::from_config(RegistryConfig::builtin()))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn parser(&self, variant: ParserVariant) -> &DeviceParser {
        &self.parsers[variant.index()]
    }

    pub fn parsers(&self) -> impl Iterator<Item = (ParserVariant, &DeviceParser)> {
        ParserVariant::ALL.into_iter().zip(self.parsers.iter())
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn rules(&self) -> &FallbackRules {
        &self.rules
    }

    pub fn resolve(
        &self,
        device_type: &str,
        feature_code: &str,
    ) -> Result<&DeviceParser, UnsupportedDeviceError> {
        self.resolve_with_path(device_type, feature_code)
            .map(|r| r.parser)
    }

    pub fn resolve_variant(
        &self,
        device_type: &str,
        feature_code: &str,
    ) -> Result<ParserVariant, UnsupportedDeviceError> {
        self.route(device_type, feature_code).map(|(v, _)| v)
    }

    pub fn resolve_with_path(
        &self,
        device_type: &str,
        feature_code: &str,
    ) -> Result<Resolution<'_>, UnsupportedDeviceError> {
        let (variant, path) = self.route(device_type, feature_code)?;
        Ok(Resolution {
            variant,
            path,
            parser: self.parser(variant),
        })
    }

    fn route(
        &self,
        device_type: &str,
        feature_code: &str,
    ) -> Result<(ParserVariant, ResolutionPath), UnsupportedDeviceError> {
        if let Some(&variant) = self
            .exact
            .get(device_type)
            .and_then(|codes| codes.get(feature_code))
        {
            debug!(device_type, feature_code, parser = %variant, "exact parser match");
            return Ok((variant, ResolutionPath::Exact));
        }

        if let Some(entry) = self
            .rules
            .special_cases
            .iter()
            .find(|e| e.device_type == device_type && e.feature_code == feature_code)
        {
            info!(device_type, feature_code, parser = %entry.parser, "special-case parser");
            return Ok((entry.parser, ResolutionPath::SpecialCase));
        }

        if let Some(route) = self
            .rules
            .legacy
            .iter()
            .find(|r| r.device_type == device_type)
        {
            info!(
                device_type,
                feature_code,
                parser = %route.parser,
                "legacy parser, feature code ignored"
            );
            return Ok((route.parser, ResolutionPath::Legacy));
        }

        if self.rules.generic_whitelist.iter().any(|t| t == device_type) {
            info!(
                device_type,
                feature_code,
                parser = %self.rules.generic,
                "no dedicated parser, using generic"
            );
            return Ok((self.rules.generic, ResolutionPath::Generic));
        }

        warn!(device_type, feature_code, "unsupported device type");
        Err(UnsupportedDeviceError {
            device_type: device_type.to_string(),
        })
    }
}

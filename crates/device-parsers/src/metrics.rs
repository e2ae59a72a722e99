use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::{ParserRegistry, Resolution, TelemetryRecord, UnsupportedDeviceError};

#[derive(Clone)]
pub struct ResolverMetrics {
    pub resolutions: IntCounterVec,
    pub parsers_loaded: IntGauge,
    pub values_labelled: IntCounter,
    pub values_rejected: IntCounter,
}

#[derive(Clone)]
pub struct MetricsHub {
    pub registry: Registry,
    pub resolver: ResolverMetrics,
}

impl MetricsHub {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();
        let resolutions = IntCounterVec::new(
            Opts::new("hxp_resolutions_total", "Parser resolutions by rule"),
            &["path"],
        )
        .map_err(|e| format!("metrics init error: {e}"))?;
        let parsers_loaded = IntGauge::new("hxp_parsers_loaded", "Number of parser tables loaded")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let values_labelled =
            IntCounter::new("hxp_values_labelled_total", "Raw values accepted by a schema")
                .map_err(|e| format!("metrics init error: {e}"))?;
        let values_rejected =
            IntCounter::new("hxp_values_rejected_total", "Raw values rejected by a schema")
                .map_err(|e| format!("metrics init error: {e}"))?;
        let resolver = ResolverMetrics {
            resolutions,
            parsers_loaded,
            values_labelled,
            values_rejected,
        };
        let _ = registry.register(Box::new(resolver.resolutions.clone()));
        let _ = registry.register(Box::new(resolver.parsers_loaded.clone()));
        let _ = registry.register(Box::new(resolver.values_labelled.clone()));
        let _ = registry.register(Box::new(resolver.values_rejected.clone()));
        Ok(Self { registry, resolver })
    }

    pub fn record_resolution(&self, outcome: &Result<Resolution<'_>, UnsupportedDeviceError>) {
        let path = match outcome {
            Ok(r) => r.path.as_str(),
            Err(_) => "unsupported",
        };
        self.resolver.resolutions.with_label_values(&[path]).inc();
    }

    pub fn record_registry(&self, registry: &ParserRegistry) {
        self.resolver
            .parsers_loaded
            .set(registry.parsers().count() as i64);
    }

    pub fn record_telemetry(&self, record: &TelemetryRecord) {
        self.resolver
            .values_labelled
            .inc_by(record.fields.len() as u64);
        self.resolver
            .values_rejected
            .inc_by(record.rejected.len() as u64);
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{label_telemetry, RegistryConfig};

    #[test]
    fn test_resolution_counters() {
        let hub = MetricsHub::new().unwrap();
        let reg = ParserRegistry::from_config(RegistryConfig::builtin()).unwrap();
        hub.record_resolution(&reg.resolve_with_path("015", "50.2f"));
        hub.record_resolution(&reg.resolve_with_path("006", "1"));
        hub.record_resolution(&reg.resolve_with_path("999", "x"));

        let res = &hub.resolver.resolutions;
        assert_eq!(res.with_label_values(&["exact"]).get(), 1);
        assert_eq!(res.with_label_values(&["generic"]).get(), 1);
        assert_eq!(res.with_label_values(&["unsupported"]).get(), 1);

        hub.record_registry(&reg);
        assert_eq!(hub.resolver.parsers_loaded.get(), 8);

        let parser = reg.resolve("006", "299").unwrap();
        let rec = label_telemetry(parser, [("t_temp", "24"), ("t_fan_speed", "4")], None);
        hub.record_telemetry(&rec);
        assert_eq!(hub.resolver.values_labelled.get(), 1);
        assert_eq!(hub.resolver.values_rejected.get(), 1);

        let text = hub.encode_text();
        assert!(text.contains("hxp_resolutions_total"));
    }
}

use device_parsers::{
    load_registry_config, resolve, ParserRegistry, ParserVariant, RegistryConfig,
    ResolutionPath, ResolveError, TypeTag,
};
use std::collections::BTreeMap;

fn registry() -> ParserRegistry {
    ParserRegistry::from_config(RegistryConfig::builtin()).unwrap()
}

#[test]
fn registered_keys_resolve_to_their_parsers() {
    let reg = registry();
    for entry in reg.entries() {
        let r = reg
            .resolve_with_path(&entry.device_type, &entry.feature_code)
            .unwrap();
        assert_eq!(r.path, ResolutionPath::Exact);
        assert_eq!(r.variant, entry.parser);
        assert_eq!(r.parser.device_type(), entry.device_type);
        assert_eq!(r.parser.feature_code(), entry.feature_code);
    }
}

#[test]
fn resolution_is_deterministic() {
    let reg = registry();
    let other = registry();
    for (t, f) in [("015", "50.2f"), ("007", "zz"), ("016", "1"), ("006", "299")] {
        let a = reg.resolve(t, f).unwrap();
        let b = reg.resolve(t, f).unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a, other.resolve(t, f).unwrap());
    }
}

#[test]
fn sentinel_pair_survives_missing_entry() {
    let mut config = RegistryConfig::builtin();
    config
        .entries
        .retain(|e| !(e.device_type == "015" && e.feature_code == "50.2f"));
    let reg = ParserRegistry::from_config(config).unwrap();
    assert_eq!(
        reg.resolve_variant("015", "50.2f").unwrap(),
        ParserVariant::Dishwasher015502f
    );
}

#[test]
fn legacy_family_ignores_feature_code() {
    let reg = registry();
    for route in &reg.rules().legacy {
        for code in ["", "1", "50.2f", "anything at all"] {
            assert_eq!(
                reg.resolve_variant(&route.device_type, code).unwrap(),
                route.parser
            );
        }
    }
}

#[test]
fn whitelisted_families_fall_back_to_generic() {
    let reg = registry();
    let rules = reg.rules();
    for t in &rules.generic_whitelist {
        if rules.legacy.iter().any(|r| &r.device_type == t) {
            continue;
        }
        let r = reg.resolve_with_path(t, "no-such-code").unwrap();
        assert_eq!(r.path, ResolutionPath::Generic);
        assert_eq!(r.variant, rules.generic);
    }
}

#[test]
fn unknown_family_is_unsupported() {
    let reg = registry();
    for t in ["999", "", "0x15", "010"] {
        let err = reg.resolve(t, "x").unwrap_err();
        assert_eq!(err.device_type, t);
    }
}

#[test]
fn bundled_schemas_hold_their_invariants() {
    let reg = registry();
    for (variant, parser) in reg.parsers() {
        for (key, schema) in parser.attributes() {
            assert_eq!(key, schema.key(), "{variant}");
            match schema.type_tag() {
                TypeTag::Enum => {
                    let map = schema.value_map().unwrap();
                    assert!(!map.is_empty(), "{variant}/{key}");
                    assert!(schema.value_range().is_none(), "{variant}/{key}");
                }
                TypeTag::Number => {
                    let range = schema.value_range().unwrap();
                    assert!(range.min() <= range.max(), "{variant}/{key}");
                    assert!(schema.value_map().is_none(), "{variant}/{key}");
                    assert!(schema.step() > 0.0, "{variant}/{key}");
                }
                TypeTag::Boolean | TypeTag::String => {
                    assert!(schema.value_map().is_none());
                    assert!(schema.value_range().is_none());
                }
            }
        }
    }
}

#[test]
fn enum_values_label_uniquely() {
    let reg = registry();
    for (_, parser) in reg.parsers() {
        for schema in parser.attributes().values() {
            let Some(map) = schema.value_map() else {
                continue;
            };
            let labels: BTreeMap<&str, &str> =
                map.iter().map(|(r, l)| (l.as_str(), r.as_str())).collect();
            assert_eq!(labels.len(), map.len(), "{}", schema.key());
            for (raw, label) in map {
                assert_eq!(schema.label(raw), Some(label.as_str()));
                assert_eq!(schema.raw_for_label(label), Some(raw.as_str()));
                assert!(schema.check_value(raw).is_ok());
            }
        }
    }
}

#[test]
fn concrete_scenarios() {
    let humidity = resolve("007", "").unwrap();
    assert_eq!(humidity.device_type(), "007");
    assert!(humidity.attribute("t_humidity").is_some());

    let dishwasher = resolve("015", "50.2f").unwrap();
    let door = dishwasher.attribute("door").unwrap();
    assert_eq!(door.type_tag(), TypeTag::Enum);
    let expected: BTreeMap<String, String> = [("0", "Closed"), ("1", "Open")]
        .into_iter()
        .map(|(r, l)| (r.to_string(), l.to_string()))
        .collect();
    assert_eq!(door.value_map(), Some(&expected));

    match resolve("999", "x") {
        Err(ResolveError::Unsupported(e)) => assert_eq!(e.device_type, "999"),
        other => panic!("expected unsupported device, got {other:?}"),
    }
}

#[test]
fn example_config_matches_builtin() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/registry.example.yaml");
    let config = load_registry_config(path).unwrap();
    assert_eq!(config, RegistryConfig::builtin());
}

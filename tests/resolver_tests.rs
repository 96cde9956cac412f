//! Integration tests for properties resolution precedence.

use migrate_settings::{
    ConfigError, ConfigResolver, Field, FieldSet, FieldValue, PropertiesSource, Registry,
    ResolutionPolicy, resolve,
};

/// Registry with `dropFirst` (boolean, default false) and `changeLogFile` (no default).
fn scenario_registry() -> Registry {
    let mut registry = Registry::from_fields(vec![
        Field::boolean("dropFirst", FieldSet::Configurable).with_default(false),
        Field::text("changeLogFile", FieldSet::Configurable),
    ])
    .expect("Failed to build registry");
    registry.set("changeLogFile", "a.xml").unwrap();
    registry
}

fn props(entries: &[(&str, &str)]) -> PropertiesSource {
    entries.iter().copied().collect()
}

#[test]
fn equal_to_default_is_overridden_but_no_default_is_kept() {
    let mut registry = scenario_registry();
    let source = props(&[("dropFirst", "true"), ("changeLogFile", "b.xml")]);

    resolve(&mut registry, &source, ResolutionPolicy::new(false)).unwrap();

    assert!(registry.flag("dropFirst").unwrap());
    assert_eq!(registry.text("changeLogFile").unwrap(), Some("a.xml"));
}

#[test]
fn override_policy_applies_every_key() {
    let mut registry = scenario_registry();
    let source = props(&[("dropFirst", "true"), ("changeLogFile", "b.xml")]);

    resolve(&mut registry, &source, ResolutionPolicy::new(true)).unwrap();

    assert!(registry.flag("dropFirst").unwrap());
    assert_eq!(registry.text("changeLogFile").unwrap(), Some("b.xml"));
}

#[test]
fn unknown_key_fails_with_name() {
    let mut registry = scenario_registry();
    let err = resolve(
        &mut registry,
        &props(&[("unknownKey", "x")]),
        ResolutionPolicy::default(),
    )
    .unwrap_err();

    match err {
        ConfigError::UnknownField(key) => assert_eq!(key, "unknownKey"),
        other => panic!("expected UnknownField, got {:?}", other),
    }
}

#[test]
fn unset_field_without_default_takes_properties_value_under_either_policy() {
    for properties_override in [false, true] {
        let mut registry = Registry::standard();
        resolve(
            &mut registry,
            &props(&[("url", "jdbc:h2:mem:test")]),
            ResolutionPolicy::new(properties_override),
        )
        .unwrap();
        assert_eq!(registry.text("url").unwrap(), Some("jdbc:h2:mem:test"));
    }
}

#[test]
fn user_override_is_kept_without_policy_and_replaced_with_it() {
    let mut kept = Registry::standard();
    kept.set("contexts", "prod").unwrap();
    resolve(&mut kept, &props(&[("contexts", "test")]), ResolutionPolicy::new(false)).unwrap();
    assert_eq!(kept.text("contexts").unwrap(), Some("prod"));

    let mut replaced = Registry::standard();
    replaced.set("contexts", "prod").unwrap();
    resolve(&mut replaced, &props(&[("contexts", "test")]), ResolutionPolicy::new(true)).unwrap();
    assert_eq!(replaced.text("contexts").unwrap(), Some("test"));
}

#[test]
fn boolean_values_parse_leniently() {
    let cases = [
        ("true", true),
        ("TRUE", true),
        ("True", true),
        ("yes", false),
        ("", false),
        ("1", false),
    ];
    for (raw, expected) in cases {
        let mut registry = Registry::standard();
        resolve(
            &mut registry,
            &props(&[("dropFirst", raw)]),
            ResolutionPolicy::default(),
        )
        .unwrap();
        assert_eq!(registry.flag("dropFirst").unwrap(), expected, "raw value {:?}", raw);
    }
}

#[test]
fn failure_leaves_earlier_keys_applied() {
    let mut registry = Registry::standard();
    // Keys resolve in order: "contexts" sorts before "dropFrist".
    let source = props(&[("contexts", "test"), ("dropFrist", "true")]);

    let err = resolve(&mut registry, &source, ResolutionPolicy::default()).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownField(ref k) if k == "dropFrist"));

    // No rollback of keys processed before the failure.
    assert_eq!(registry.text("contexts").unwrap(), Some("test"));
    assert!(!registry.flag("dropFirst").unwrap());
}

#[test]
fn failure_stops_later_keys() {
    let mut registry = Registry::standard();
    let source = props(&[("aaa", "x"), ("url", "jdbc:h2:mem:never")]);

    assert!(resolve(&mut registry, &source, ResolutionPolicy::default()).is_err());
    assert_eq!(registry.text("url").unwrap(), None);
}

#[test]
fn base_and_configurable_defaults_both_participate() {
    let mut registry = Registry::standard();
    registry.set("promptOnNonLocalDatabase", false).unwrap();

    let source = props(&[("promptOnNonLocalDatabase", "true"), ("dropFirst", "true")]);
    ConfigResolver::new(ResolutionPolicy::default())
        .resolve(&mut registry, &source)
        .unwrap();

    // false differs from the registered default true, so it is the user's choice.
    assert!(!registry.flag("promptOnNonLocalDatabase").unwrap());
    assert!(registry.flag("dropFirst").unwrap());
}

#[test]
fn empty_source_changes_nothing() {
    let mut registry = Registry::standard();
    let before: Vec<Option<FieldValue>> = registry.iter().map(|f| f.current.clone()).collect();

    resolve(&mut registry, &PropertiesSource::new(), ResolutionPolicy::new(true)).unwrap();

    let after: Vec<Option<FieldValue>> = registry.iter().map(|f| f.current.clone()).collect();
    assert_eq!(before, after);
}

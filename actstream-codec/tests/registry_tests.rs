use actstream_codec::{Codec, CodecConfig, TypeRegistry, ValueType};
use actstream_model::{Builder, EntityKind, Value};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::thread;

// ── Built-in tables ──────────────────────────────────────────────

#[test]
fn default_registry_knows_builtin_kinds_and_properties() {
    let registry = TypeRegistry::new();
    assert!(registry.has_entity_kind("note"));
    assert!(registry.has_entity_kind("PERSON"));
    assert!(registry.has_entity_kind("collection"));
    assert!(matches!(registry.property_type("published"), Some(ValueType::DateTime)));
    assert!(matches!(registry.property_type("verb"), Some(ValueType::Verb)));
    assert!(matches!(
        registry.property_type("location"),
        Some(ValueType::Kind(EntityKind::Place))
    ));
    assert!(registry.property_type("content").is_none());
}

#[test]
fn empty_registry_has_nothing() {
    let registry = TypeRegistry::empty();
    assert!(!registry.has_entity_kind("note"));
    assert!(registry.property_type("published").is_none());

    let codec = Codec::with_registry(Arc::new(registry), CodecConfig::default());
    let e = codec
        .read(r#"{"objectType":"note","published":"not checked"}"#)
        .unwrap();
    assert_eq!(e.kind(), &EntityKind::Object);
    assert_eq!(e.get_str("published"), Some("not checked"));
}

// ── Extension ────────────────────────────────────────────────────

#[test]
fn custom_property_type_round_trips() {
    let codec = Codec::new();
    codec.register_property_type(
        "bar",
        ValueType::scalar("bar-code", |raw| {
            let text = raw.as_str().ok_or("bar must be a string")?;
            Ok(Value::typed("bar-code", json!(text.to_uppercase())))
        }),
    );
    codec.register_serializer("bar-code", |value| {
        let text = value
            .as_typed()
            .and_then(|t| t.payload().as_str())
            .ok_or("bad bar-code")?;
        Ok(json!(text.to_lowercase()))
    });

    let e = codec.read(r#"{"bar":"x"}"#).unwrap();
    let bar = e.get("bar").and_then(Value::as_typed).unwrap();
    assert_eq!(bar.type_name(), "bar-code");
    assert_eq!(bar.payload(), &json!("X"));

    assert_eq!(codec.write(&e).unwrap(), r#"{"bar":"x"}"#);
}

#[test]
fn custom_scalar_rejection_is_a_coercion_error() {
    let codec = Codec::new();
    codec.register_property_type(
        "bar",
        ValueType::scalar("bar-code", |_| Err("never valid".to_string())),
    );
    assert!(codec.read(r#"{"bar":"x"}"#).is_err());
}

#[test]
fn custom_entity_kind_receives_raw_discriminator() {
    let codec = Codec::new();
    codec.register_entity_kind("recipe", |raw| {
        Ok(Builder::external("recipe").set("variant", raw))
    });

    let e = codec.read(r#"{"objectType":"Recipe","title":"soup"}"#).unwrap();
    assert_eq!(e.kind(), &EntityKind::External("recipe".into()));
    assert_eq!(e.get_str("variant"), Some("Recipe"));
    assert_eq!(e.get_str("title"), Some("soup"));
}

#[test]
fn external_kind_round_trips() {
    let codec = Codec::new();
    codec.registry().register_external_kind("x-recipe");

    let text = r#"{"objectType":"x-recipe","title":"soup"}"#;
    let e = codec.read(text).unwrap();
    assert_eq!(e.kind(), &EntityKind::External("x-recipe".into()));
    assert_eq!(codec.write(&e).unwrap(), text);
}

#[test]
fn registered_kind_hint_applies_to_nested_objects() {
    let codec = Codec::new();
    codec.register_property_type("author", ValueType::Kind(EntityKind::Person));

    let e = codec.read(r#"{"author":{"displayName":"Ann"}}"#).unwrap();
    assert_eq!(e.get_entity("author").unwrap().kind(), &EntityKind::Person);
}

#[test]
fn registration_is_last_write_wins() {
    let codec = Codec::new();
    codec.register_entity_kind("note", |_| Ok(Builder::external("first")));
    codec.register_entity_kind("note", |_| Ok(Builder::external("second")));

    let e = codec.read(r#"{"objectType":"note"}"#).unwrap();
    assert_eq!(e.kind(), &EntityKind::External("second".into()));
}

#[test]
fn registries_are_independent() {
    let a = Codec::new();
    let b = Codec::new();
    a.register_property_type("rank", ValueType::DateTime);
    assert!(a.registry().property_type("rank").is_some());
    assert!(b.registry().property_type("rank").is_none());
}

#[test]
fn shared_registry_sees_later_registrations() {
    let registry = Arc::new(TypeRegistry::new());
    let a = Codec::with_registry(registry.clone(), CodecConfig::default());
    let b = Codec::with_registry(registry, CodecConfig::default());

    a.registry().register_external_kind("x-shared");
    let e = b.read(r#"{"objectType":"x-shared"}"#).unwrap();
    assert_eq!(e.kind(), &EntityKind::External("x-shared".into()));
}

#[test]
fn writer_uses_registry_snapshot_from_creation() {
    let codec = Codec::with_config(CodecConfig {
        close_sink: false,
        ..Default::default()
    });
    let mut writer = codec.collection_writer(Vec::new());
    codec.register_serializer("string", |_| Ok(json!("changed")));
    writer
        .write_header(&Builder::generic(None).set("title", "kept").build())
        .unwrap();
    writer.close().unwrap();

    let bytes = writer.into_inner().unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"title":"kept","items":[]}"#);

    let later = Builder::generic(None).set("title", "kept").build();
    assert_eq!(codec.to_value(&later).unwrap(), json!({"title": "changed"}));
}

// ── Concurrency ──────────────────────────────────────────────────

#[test]
fn concurrent_decodes_while_registering() {
    let codec = Arc::new(Codec::new());
    let readers: Vec<_> = (0..4)
        .map(|i| {
            let codec = Arc::clone(&codec);
            thread::spawn(move || {
                for j in 0..200 {
                    let text = format!(r#"{{"objectType":"note","content":"{i}-{j}","published":"2011-02-10T15:04:55Z"}}"#);
                    let e = codec.read(&text).unwrap();
                    assert_eq!(e.kind(), &EntityKind::Note);
                    assert!(e.published().is_some());
                }
            })
        })
        .collect();

    for n in 0..50 {
        codec.registry().register_external_kind(&format!("x-kind-{n}"));
    }
    for reader in readers {
        reader.join().unwrap();
    }
    assert!(codec.registry().has_entity_kind("x-kind-49"));
}

//! Tests for the streaming collection writer.

use actstream_codec::{Codec, CodecConfig, CodecError, StreamState};
use actstream_model::{Entity, EntityKind, Value};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::{self, Write};

fn header() -> Entity {
    Entity::builder(EntityKind::Collection)
        .set("displayName", "My Feed")
        .set("totalItems", 3)
        .build()
}

fn note(i: usize) -> Entity {
    Entity::builder(EntityKind::Note)
        .set("id", format!("urn:note:{i}"))
        .set("content", format!("note {i}"))
        .build()
}

/// Batch-encodes the same collection the streaming writer should produce.
fn batch(codec: &Codec, items: &[Entity]) -> serde_json::Value {
    let collection = header()
        .into_builder()
        .set("items", items.iter().cloned().map(Value::from).collect::<Vec<_>>())
        .build();
    codec.to_value(&collection).unwrap()
}

fn stream(codec: &Codec, items: &[Entity]) -> serde_json::Value {
    let mut buf = Vec::new();
    let mut writer = codec.collection_writer(&mut buf);
    writer.write_header(&header()).unwrap();
    writer.write_items(items).unwrap();
    writer.close().unwrap();
    assert_eq!(writer.state(), StreamState::Closed);
    assert_eq!(writer.items_written(), items.len());
    drop(writer);
    serde_json::from_slice(&buf).unwrap()
}

// ── Well-formed use ──────────────────────────────────────────────

#[test]
fn stream_matches_batch_for_zero_one_and_many_items() {
    let codec = Codec::new();
    for n in [0, 1, 1000] {
        let items: Vec<_> = (0..n).map(note).collect();
        assert_eq!(stream(&codec, &items), batch(&codec, &items), "n = {n}");
    }
}

#[test]
fn empty_collection_bytes() {
    let codec = Codec::new();
    let mut buf = Vec::new();
    let mut writer = codec.collection_writer(&mut buf);
    let header = Entity::builder(EntityKind::Collection)
        .with_object_type(None)
        .build();
    writer.write_header(&header).unwrap();
    writer.close().unwrap();
    drop(writer);
    assert_eq!(String::from_utf8(buf).unwrap(), r#"{"items":[]}"#);
}

#[test]
fn header_items_property_is_ignored() {
    let codec = Codec::new();
    let with_items = header().into_builder().set("items", vec![note(9)]).build();

    let mut buf = Vec::new();
    let mut writer = codec.collection_writer(&mut buf);
    writer.write_header(&with_items).unwrap();
    writer.write_item(&note(1)).unwrap();
    writer.close().unwrap();
    drop(writer);

    let doc: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(doc["items"], json!([{"objectType":"note","id":"urn:note:1","content":"note 1"}]));
}

#[test]
fn header_discriminator_is_written() {
    let codec = Codec::new();
    let mut buf = Vec::new();
    let mut writer = codec.collection_writer(&mut buf);
    writer
        .write_header(&Entity::builder(EntityKind::Collection).build())
        .unwrap();
    writer.close().unwrap();
    drop(writer);
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        r#"{"objectType":"collection","items":[]}"#
    );
}

#[test]
fn streamed_output_reads_back_as_collection() {
    let codec = Codec::new();
    let items: Vec<_> = (0..3).map(note).collect();
    let doc = stream(&codec, &items);
    let collection = codec.read_value(&doc).unwrap();
    assert_eq!(collection.kind(), &EntityKind::Collection);
    assert_eq!(collection.items().unwrap().len(), 3);
}

// ── Sink handling ────────────────────────────────────────────────

#[test]
fn close_releases_sink_by_default() {
    let codec = Codec::new();
    let mut writer = codec.collection_writer(Vec::new());
    writer.write_header(&header()).unwrap();
    writer.close().unwrap();
    assert!(writer.into_inner().is_none());
}

#[test]
fn sink_can_be_kept_after_close() {
    let codec = Codec::with_config(CodecConfig {
        close_sink: false,
        ..Default::default()
    });
    let mut writer = codec.collection_writer(Vec::new());
    writer.write_header(&header()).unwrap();
    writer.write_item(&note(0)).unwrap();
    writer.close().unwrap();

    let bytes = writer.into_inner().unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc["items"].as_array().unwrap().len(), 1);
}

struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_errors_fail_the_writer() {
    let codec = Codec::new();
    let mut writer = codec.collection_writer(FailingSink);
    let err = writer.write_header(&header()).unwrap_err();
    assert!(matches!(err, CodecError::Io(_)));
    assert_eq!(writer.state(), StreamState::Failed);
}

// ── Misuse ───────────────────────────────────────────────────────

#[test]
fn item_before_header_is_rejected_without_output() {
    let codec = Codec::new();
    let mut buf = Vec::new();
    let mut writer = codec.collection_writer(&mut buf);

    let err = writer.write_item(&note(0)).unwrap_err();
    assert!(matches!(
        err,
        CodecError::StreamState {
            state: StreamState::Created,
            ..
        }
    ));
    assert_eq!(writer.state(), StreamState::Failed);
    assert!(writer.write_header(&header()).is_err());
    drop(writer);
    assert!(buf.is_empty());
}

#[test]
fn writes_after_close_are_rejected() {
    let codec = Codec::with_config(CodecConfig {
        close_sink: false,
        ..Default::default()
    });
    let mut writer = codec.collection_writer(Vec::new());
    writer.write_header(&header()).unwrap();
    writer.close().unwrap();

    let err = writer.write_item(&note(0)).unwrap_err();
    assert!(matches!(
        err,
        CodecError::StreamState {
            state: StreamState::Closed,
            ..
        }
    ));
    assert!(writer.close().is_err());

    let bytes = writer.into_inner().unwrap();
    assert!(bytes.ends_with(b"]}"));
    assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_ok());
}

#[test]
fn header_twice_is_rejected() {
    let codec = Codec::new();
    let mut writer = codec.collection_writer(Vec::new());
    writer.write_header(&header()).unwrap();
    let err = writer.write_header(&header()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot write header while the collection writer is header-written"
    );
}

#[test]
fn close_before_header_is_rejected() {
    let codec = Codec::new();
    let mut writer = codec.collection_writer(Vec::new());
    assert!(writer.close().is_err());
}

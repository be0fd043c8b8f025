//! Streaming collection writer.
//!
//! Emits `{<header properties>, "items":[<item>, <item>, ...]}` one piece at a
//! time so an unbounded collection never has to be held in memory. Every
//! piece is encoded into a buffer first and only then written to the sink, so
//! a failed encode or an out-of-sequence call leaves nothing half-written.

use crate::encode::Encoder;
use crate::error::{CodecError, CodecResult};
use crate::registry::Tables;
use actstream_model::Entity;
use serde_json::Value as JsonValue;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// The property the streamed items are written under.
pub const ITEMS: &str = "items";

/// Where a [`CollectionWriter`] is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Created,
    HeaderWritten,
    ItemWritten,
    Closed,
    /// An out-of-sequence call or a sink error ended the writer.
    Failed,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamState::Created => "created",
            StreamState::HeaderWritten => "header-written",
            StreamState::ItemWritten => "item-written",
            StreamState::Closed => "closed",
            StreamState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Writes one collection document incrementally to a byte sink.
///
/// `Created → HeaderWritten → ItemWritten* → Closed`. A writer is meant for a
/// single producer; it holds the sink and the open-array state.
pub struct CollectionWriter<W: Write> {
    sink: Option<W>,
    state: StreamState,
    tables: Arc<Tables>,
    close_sink: bool,
    items_written: usize,
}

impl<W: Write> CollectionWriter<W> {
    pub(crate) fn new(sink: W, tables: Arc<Tables>, close_sink: bool) -> Self {
        Self {
            sink: Some(sink),
            state: StreamState::Created,
            tables,
            close_sink,
            items_written: 0,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Writes the opening brace, the header's properties and opens the items
    /// array. An `items` property on the header is ignored.
    pub fn write_header(&mut self, header: &Entity) -> CodecResult<()> {
        self.require_state(&[StreamState::Created], "write header")?;

        let object = Encoder::new(&self.tables).encode_entity_except(header, Some(ITEMS))?;
        let mut buf = Vec::with_capacity(64);
        buf.push(b'{');
        for (name, value) in &object {
            serde_json::to_writer(&mut buf, name)?;
            buf.push(b':');
            serde_json::to_writer(&mut buf, value)?;
            buf.push(b',');
        }
        serde_json::to_writer(&mut buf, ITEMS)?;
        buf.extend_from_slice(b":[");

        self.emit(&buf)?;
        self.state = StreamState::HeaderWritten;
        debug!(properties = object.len(), "Collection header written");
        Ok(())
    }

    /// Encodes and writes one item into the open items array.
    pub fn write_item(&mut self, item: &Entity) -> CodecResult<()> {
        self.require_state(
            &[StreamState::HeaderWritten, StreamState::ItemWritten],
            "write item",
        )?;

        let object = Encoder::new(&self.tables).encode_entity(item)?;
        let mut buf = Vec::with_capacity(128);
        if self.state == StreamState::ItemWritten {
            buf.push(b',');
        }
        serde_json::to_writer(&mut buf, &JsonValue::Object(object))?;

        self.emit(&buf)?;
        self.state = StreamState::ItemWritten;
        self.items_written += 1;
        Ok(())
    }

    /// Writes every item from an iterator.
    pub fn write_items<'e, I>(&mut self, items: I) -> CodecResult<()>
    where
        I: IntoIterator<Item = &'e Entity>,
    {
        for item in items {
            self.write_item(item)?;
        }
        Ok(())
    }

    /// Closes the items array and the outer object, then flushes. Releases
    /// the sink when the codec is configured to close it.
    pub fn close(&mut self) -> CodecResult<()> {
        self.require_state(&[StreamState::HeaderWritten, StreamState::ItemWritten], "close")?;

        self.emit(b"]}")?;
        if let Some(sink) = self.sink.as_mut() {
            if let Err(err) = sink.flush() {
                self.state = StreamState::Failed;
                return Err(err.into());
            }
        }
        self.state = StreamState::Closed;
        if self.close_sink {
            self.sink = None;
        }
        debug!(items = self.items_written, "Collection closed");
        Ok(())
    }

    /// Returns the sink if it has not been released.
    pub fn into_inner(self) -> Option<W> {
        self.sink
    }

    /// Rejects a call made in the wrong state. The writer is unusable after.
    fn require_state(
        &mut self,
        allowed: &[StreamState],
        operation: &'static str,
    ) -> CodecResult<()> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        let state = self.state;
        self.state = StreamState::Failed;
        Err(CodecError::StreamState { state, operation })
    }

    fn emit(&mut self, bytes: &[u8]) -> CodecResult<()> {
        let Some(sink) = self.sink.as_mut() else {
            self.state = StreamState::Failed;
            return Err(CodecError::StreamState {
                state: StreamState::Closed,
                operation: "write",
            });
        };
        if let Err(err) = sink.write_all(bytes) {
            self.state = StreamState::Failed;
            return Err(err.into());
        }
        Ok(())
    }
}

impl<W: Write> fmt::Debug for CollectionWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionWriter")
            .field("state", &self.state)
            .field("items_written", &self.items_written)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

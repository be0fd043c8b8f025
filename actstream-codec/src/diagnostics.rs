use actstream_model::Entity;
use std::fmt;

/// What the decoder recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A registered factory rejected its object; the generic builder was used.
    FactoryRejected,
    /// A scalar did not parse as its declared type and was kept untyped.
    CoercionFallback,
    /// An `objectType` that is not a string was ignored.
    IgnoredDiscriminator,
}

/// A recovered failure observed during one decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// JSON pointer to the offending value (`""` for the document root).
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.message)
    }
}

/// A decoded entity together with everything the decoder recovered from.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub entity: Entity,
    pub diagnostics: Vec<Diagnostic>,
}

impl Decoded {
    /// True if the decode needed no recovery at all.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

//! Extraction of the target path from a hook payload.
//!
//! The host sends `{"tool_input": {"file_path": ...}}` for Write/Edit, but
//! older callers and manual invocations put `file_path` at the top level.

use serde_json::Value;

/// A location in the payload where a file path may live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// `tool_input.file_path`
    ToolInput,
    /// `file_path`
    TopLevel,
}

/// Sources tried in order; the first non-empty string wins.
pub const PATH_SOURCES: &[PathSource] = &[PathSource::ToolInput, PathSource::TopLevel];

impl PathSource {
    pub fn extract<'a>(&self, payload: &'a Value) -> Option<&'a str> {
        let value = match self {
            PathSource::ToolInput => payload.get("tool_input")?.get("file_path")?,
            PathSource::TopLevel => payload.get("file_path")?,
        };
        value.as_str().filter(|s| !s.is_empty())
    }
}

/// The file a tool call intends to write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteIntent {
    pub file_path: String,
}

impl WriteIntent {
    /// Pull the path out of `payload`, trying `sources` in order.
    /// Missing or non-string fields yield an empty path.
    pub fn from_payload(payload: &Value, sources: &[PathSource]) -> Self {
        let file_path = sources
            .iter()
            .find_map(|s| s.extract(payload))
            .unwrap_or_default()
            .to_string();
        Self { file_path }
    }

    /// Parse raw hook input. `None` when the input is not JSON at all.
    pub fn parse(input: &str) -> Option<Self> {
        let payload: Value = serde_json::from_str(input).ok()?;
        Some(Self::from_payload(&payload, PATH_SOURCES))
    }
}

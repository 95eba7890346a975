//! Hook table types, serialized in the shape settings.json expects.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Lifecycle events the host tool fires hooks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// Agent finished responding
    Stop,
    /// Before a tool call runs; a hook exiting 2 blocks it
    PreToolUse,
    /// After a tool call completes
    PostToolUse,
    /// Host notification (idle prompt, permission request)
    Notification,
}

impl HookEvent {
    /// Key used in settings.json.
    pub fn as_str(self) -> &'static str {
        match self {
            HookEvent::Stop => "Stop",
            HookEvent::PreToolUse => "PreToolUse",
            HookEvent::PostToolUse => "PostToolUse",
            HookEvent::Notification => "Notification",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Command,
}

/// A single command run by the host when a matcher block fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub command: String,
    /// Seconds before the host kills the command.
    pub timeout: u32,
}

impl HookAction {
    pub fn command(command: impl Into<String>, timeout: u32) -> Self {
        Self {
            kind: ActionKind::Command,
            command: command.into(),
            timeout,
        }
    }
}

/// Actions run in order for invocations matching `matcher`.
/// No matcher means every invocation of the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatcherBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    pub hooks: Vec<HookAction>,
}

/// Ordered event → matcher blocks mapping.
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookTable {
    entries: Vec<(HookEvent, Vec<MatcherBlock>)>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block to `event`, creating the entry if needed.
    pub fn push(&mut self, event: HookEvent, block: MatcherBlock) {
        match self.entries.iter_mut().find(|(e, _)| *e == event) {
            Some((_, blocks)) => blocks.push(block),
            None => self.entries.push((event, vec![block])),
        }
    }

    pub fn get(&self, event: HookEvent) -> Option<&[MatcherBlock]> {
        self.entries
            .iter()
            .find(|(e, _)| *e == event)
            .map(|(_, blocks)| blocks.as_slice())
    }

    pub fn events(&self) -> impl Iterator<Item = HookEvent> + '_ {
        self.entries.iter().map(|(e, _)| *e)
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("hook table has string keys and plain values")
    }
}

impl Serialize for HookTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (event, blocks) in &self.entries {
            map.serialize_entry(event.as_str(), blocks)?;
        }
        map.end()
    }
}

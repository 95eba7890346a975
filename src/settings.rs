//! Reconciliation of the hook table into the host's settings.json.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{DeployError, Result};
use crate::fs::FileSystem;
use crate::hooks::HookTable;

/// The host's settings document: an open-ended JSON object.
pub type SettingsDocument = Map<String, Value>;

pub const HOOKS_KEY: &str = "hooks";
pub const PLUGINS_KEY: &str = "enabledPlugins";

/// Plugin enabled when settings.json has no `enabledPlugins` yet.
pub const DEFAULT_PLUGIN: &str = "claude-supermemory@supermemory-plugins";

/// Overlays a hook table and default plugins onto a settings document.
#[derive(Debug, Clone)]
pub struct SettingsMerger {
    default_plugins: Vec<String>,
}

impl Default for SettingsMerger {
    fn default() -> Self {
        Self::new([DEFAULT_PLUGIN])
    }
}

impl SettingsMerger {
    pub fn new<I>(default_plugins: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            default_plugins: default_plugins.into_iter().map(Into::into).collect(),
        }
    }

    /// `hooks` is replaced wholesale; `enabledPlugins` is only set when
    /// absent; every other key passes through untouched and keeps its
    /// position.
    pub fn merge(&self, mut doc: SettingsDocument, table: &HookTable) -> SettingsDocument {
        doc.insert(HOOKS_KEY.into(), table.to_value());
        if !doc.contains_key(PLUGINS_KEY) {
            let plugins: Map<String, Value> = self
                .default_plugins
                .iter()
                .map(|id| (id.clone(), Value::Bool(true)))
                .collect();
            doc.insert(PLUGINS_KEY.into(), Value::Object(plugins));
        }
        doc
    }
}

/// Merge with the built-in default plugin set.
pub fn merge_hook_config(doc: SettingsDocument, table: &HookTable) -> SettingsDocument {
    SettingsMerger::default().merge(doc, table)
}

/// Parse settings text. Anything other than a JSON object is rejected.
pub fn parse_settings(path: &Path, text: &str) -> Result<SettingsDocument> {
    let value: Value = serde_json::from_str(text).map_err(|source| DeployError::CorruptSettings {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(doc) => Ok(doc),
        _ => Err(DeployError::SettingsNotObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Load settings from `path`. A missing file is an empty document; a
/// present but unparsable one is an error.
pub fn load_settings(fs: &dyn FileSystem, path: &Path) -> Result<SettingsDocument> {
    if !fs.exists(path) {
        log::debug!("{} absent, starting from empty settings", path.display());
        return Ok(SettingsDocument::new());
    }
    let text = fs.read_to_string(path).map_err(DeployError::io(path))?;
    parse_settings(path, &text)
}

/// Serialize with two-space indentation and replace `path` atomically.
pub fn save_settings(fs: &dyn FileSystem, path: &Path, doc: &SettingsDocument) -> Result<()> {
    let mut text = serde_json::to_string_pretty(doc).map_err(|e| DeployError::Io {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    text.push('\n');
    fs.write_atomic(path, &text).map_err(DeployError::io(path))
}

/// Load, merge, and write back in one read-modify-write cycle.
pub fn update_settings_file(
    fs: &dyn FileSystem,
    path: &Path,
    merger: &SettingsMerger,
    table: &HookTable,
) -> Result<SettingsDocument> {
    let doc = merger.merge(load_settings(fs, path)?, table);
    save_settings(fs, path, &doc)?;
    Ok(doc)
}

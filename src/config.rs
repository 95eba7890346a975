use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PathsConfig {
    /// Target directory of the host tool (`~` is expanded on use).
    #[serde(default)]
    pub claude_dir: String,
    /// Root of the bundle being deployed.
    #[serde(default)]
    pub source_dir: String,
}

/// Sensitive-file policy consumed by [`Classifier`](crate::guard::Classifier).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GuardConfig {
    #[serde(default)]
    pub blocked_names: Vec<String>,
    #[serde(default)]
    pub env_marker: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PluginsConfig {
    /// Plugin ids enabled by default when settings.json has no `enabledPlugins`.
    #[serde(default)]
    pub enabled: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    paths: PathsOverlay,
    #[serde(default)]
    guard: GuardOverlay,
    #[serde(default)]
    plugins: PluginsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct PathsOverlay {
    claude_dir: Option<String>,
    source_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GuardOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    blocked_names: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
    env_marker: Option<String>,
    #[serde(default)]
    remove_blocked_names: Vec<String>,
    #[serde(default)]
    remove_keywords: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct PluginsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    enabled: Vec<String>,
    #[serde(default)]
    remove_enabled: Vec<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/cc-deploy/config.toml (if exists)
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/cc-deploy/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/cc-deploy/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("cc-deploy: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let p = overlay.paths;
        if let Some(v) = p.claude_dir {
            self.paths.claude_dir = v;
        }
        if let Some(v) = p.source_dir {
            self.paths.source_dir = v;
        }

        let g = overlay.guard;
        merge_list(
            &mut self.guard.blocked_names,
            g.blocked_names,
            &g.remove_blocked_names,
            g.replace,
        );
        merge_list(
            &mut self.guard.keywords,
            g.keywords,
            &g.remove_keywords,
            g.replace,
        );
        if let Some(v) = g.env_marker {
            self.guard.env_marker = v;
        }

        let pl = overlay.plugins;
        merge_list(
            &mut self.plugins.enabled,
            pl.enabled,
            &pl.remove_enabled,
            pl.replace,
        );
    }

    /// The target directory with `~` expanded.
    pub fn claude_dir(&self) -> PathBuf {
        expand(&self.paths.claude_dir)
    }

    /// The bundle root with `~` expanded.
    pub fn source_dir(&self) -> PathBuf {
        expand(&self.paths.source_dir)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

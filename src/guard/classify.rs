//! Basename matching against a sensitive-file policy.

use std::collections::HashSet;

use crate::config::GuardConfig;
use crate::guard::Classification;

/// Decides whether a path names a file that must never be written.
///
/// Two rules, checked in order on the lowercased basename:
/// 1. exact match against `blocked_names`;
/// 2. contains `env_marker` AND at least one of `keywords`.
///
/// An empty `env_marker` turns the second rule off.
///
/// The policy is fixed at construction; `classify` is pure.
#[derive(Debug, Clone)]
pub struct Classifier {
    blocked_names: HashSet<String>,
    env_marker: Option<String>,
    keywords: Vec<String>,
}

impl Classifier {
    pub fn new<N, K>(blocked_names: N, env_marker: &str, keywords: K) -> Self
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self {
            blocked_names: blocked_names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
            env_marker: Some(env_marker.to_lowercase()).filter(|m| !m.is_empty()),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(&config.blocked_names, &config.env_marker, &config.keywords)
    }

    pub fn classify(&self, file_path: &str) -> Classification {
        let name = basename(file_path).to_lowercase();
        if name.is_empty() {
            return Classification::Allowed;
        }

        if self.blocked_names.contains(&name) {
            return Classification::Blocked(format!(
                "Refusing to write to sensitive file: {file_path}"
            ));
        }

        if let Some(marker) = &self.env_marker
            && name.contains(marker.as_str())
            && self.keywords.iter().any(|k| name.contains(k.as_str()))
        {
            return Classification::Blocked(format!(
                "Refusing to write to potential secrets file: {file_path}"
            ));
        }

        Classification::Allowed
    }
}

/// Final path segment; both separators are honored so Windows paths
/// sent by the host classify the same as POSIX ones.
fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

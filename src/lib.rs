//! cc-deploy: deploys a Claude Code configuration bundle and guards secret files.
//!
//! Two subsystems carry the decision logic:
//!
//! - the sensitive-file guard, a PreToolUse hook that classifies the target
//!   of every Write/Edit call and blocks secrets ([`guard::Classification::Blocked`]);
//! - the hook-configuration merge, which builds the event → action table and
//!   reconciles it into `settings.json` without disturbing unrelated keys.
//!
//! # Architecture
//!
//! - **[`guard`]** — Classifier, payload extraction, allow/deny verdicts.
//! - **[`hooks`]** — Hook table types and the canonical table builder.
//! - **[`settings`]** — settings.json load / merge / atomic save.
//! - **[`deploy`]** — Bundle copy steps, project template selection, status.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — Guard decision log and CLI diagnostics.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Deployment steps over the filesystem and prompt ports.
pub mod deploy;
/// Errors surfaced by deployment.
pub mod error;
/// Filesystem port.
pub mod fs;
/// Sensitive-file classification and the hook-side verdict.
pub mod guard;
/// Hook table model and builder.
pub mod hooks;
/// Decision and CLI logging.
pub mod logging;
/// Interactive prompt port.
pub mod prompt;
/// settings.json reconciliation.
pub mod settings;

pub use error::{DeployError, Result};

use guard::{Classification, Classifier};

/// Classify a path against the default policy.
///
/// This is the main entry point for tests and simple usage.
/// The guard binary builds its [`Classifier`] from the loaded user config instead.
pub fn classify(file_path: &str) -> Classification {
    let config = config::Config::default_config();
    Classifier::from_config(&config.guard).classify(file_path)
}

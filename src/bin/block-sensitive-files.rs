//! PreToolUse hook: block writes to sensitive files (.env, credentials, keys).
//!
//! Reads the hook payload from stdin. Exit 0 lets the write proceed; exit 2
//! blocks it and the reason on stderr is shown to the agent. Anything that
//! cannot be read or parsed is let through.

use std::io::Read;

use cc_deploy::config::Config;
use cc_deploy::guard::{self, Classifier};
use cc_deploy::logging;

fn main() {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        std::process::exit(0);
    }

    logging::init_guard_log();
    let config = Config::load();
    let classifier = Classifier::from_config(&config.guard);

    let (intent, verdict) = guard::check_payload(&classifier, &input);
    logging::log_decision(&intent, &verdict);

    if let Some(message) = verdict.diagnostic() {
        eprintln!("{message}");
    }
    std::process::exit(verdict.exit_code());
}

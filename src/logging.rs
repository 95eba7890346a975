use crate::guard::{Verdict, WriteIntent};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

/// Route guard decisions to ~/.local/share/cc-deploy/guard.log.
/// Best-effort: failures are silently ignored (logging must never block the hook).
pub fn init_guard_log() {
    let Some(home) = std::env::var_os("HOME") else {
        return;
    };
    let log_dir = std::path::Path::new(&home).join(".local/share/cc-deploy");
    let _ = std::fs::create_dir_all(&log_dir);

    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("guard.log"))
    else {
        return;
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(LevelFilter::Info, config, file);
}

/// Diagnostics for the deploy CLI go to stderr; progress output stays on stdout.
pub fn init_cli_log(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        ConfigBuilder::new().build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// Record one guard decision as a single tab-separated line.
pub fn log_decision(intent: &WriteIntent, verdict: &Verdict) {
    let path: String = intent.file_path.chars().take(200).collect();
    let reason = match verdict {
        Verdict::Allow => "",
        Verdict::Deny(reason) => reason.as_str(),
    };
    log::info!("{}\t{path}\t{}", verdict.label(), reason.replace('\n', "; "));
}

pub mod types;

pub use types::{ActionKind, HookAction, HookEvent, HookTable, MatcherBlock};

use std::path::Path;

/// File name of the guard binary inside the hooks directory.
pub const GUARD_BIN: &str = "block-sensitive-files";

/// Matcher for the tools that write files.
const WRITE_TOOLS: &str = "Write|Edit";

#[cfg(windows)]
const BELL_COMMAND: &str = "powershell -Command \"[System.Console]::Beep(1000, 300)\"";
#[cfg(not(windows))]
const BELL_COMMAND: &str = "printf '\\a'";

/// Render the hooks directory the way it should appear in settings.json:
/// the home prefix becomes `$HOME` so the file survives a home move, and
/// separators are normalized to `/`.
pub fn portable_hooks_home(hooks_dir: &Path, home: Option<&Path>) -> String {
    let mut rendered = hooks_dir.to_string_lossy().into_owned();
    if let Some(home) = home
        && let Ok(rest) = hooks_dir.strip_prefix(home)
    {
        rendered = Path::new("$HOME").join(rest).to_string_lossy().into_owned();
    }
    rendered.replace('\\', "/")
}

/// Build the canonical hook table for hooks installed under `hooks_home`.
///
/// Pure: the same `hooks_home` always yields the same table. The taskmaster
/// completion check lives with the skills, which sit next to the hooks
/// directory.
pub fn build_hook_table(hooks_home: &str) -> HookTable {
    let hooks_home = hooks_home.trim_end_matches('/');
    let claude_home = hooks_home
        .rsplit_once('/')
        .map(|(parent, _)| parent)
        .unwrap_or(".");
    let exe = std::env::consts::EXE_SUFFIX;

    let mut table = HookTable::new();
    table.push(
        HookEvent::Stop,
        MatcherBlock {
            matcher: None,
            hooks: vec![
                HookAction::command(
                    format!("{claude_home}/skills/taskmaster/hooks/check-completion.sh"),
                    10,
                ),
                HookAction::command(format!("bash {hooks_home}/session-checkpoint.sh"), 10),
            ],
        },
    );
    table.push(
        HookEvent::PreToolUse,
        MatcherBlock {
            matcher: Some(WRITE_TOOLS.into()),
            hooks: vec![HookAction::command(
                format!("{hooks_home}/{GUARD_BIN}{exe}"),
                5,
            )],
        },
    );
    table.push(
        HookEvent::PostToolUse,
        MatcherBlock {
            matcher: Some(WRITE_TOOLS.into()),
            hooks: vec![HookAction::command(
                format!("bash {hooks_home}/syntax-check.sh"),
                15,
            )],
        },
    );
    table.push(
        HookEvent::Notification,
        MatcherBlock {
            matcher: Some("idle_prompt".into()),
            hooks: vec![HookAction::command(BELL_COMMAND, 5)],
        },
    );
    table
}

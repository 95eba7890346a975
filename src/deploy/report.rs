//! What each deployment step did, rendered for the terminal.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoulReport {
    pub deployed: PathBuf,
    /// Where the previous CLAUDE.md was copied, if there was one.
    pub backup: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HooksReport {
    /// File names copied into the hooks directory.
    pub files: Vec<String>,
    pub settings: PathBuf,
}

/// Result of one step of a full deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepReport {
    Soul(SoulReport),
    Skills(Vec<String>),
    Agents(Vec<String>),
    Commands(Vec<String>),
    Hooks(HooksReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOutcome {
    Skipped,
    Deployed { template: String, dest: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreFile {
    pub label: &'static str,
    pub path: PathBuf,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStatus {
    pub name: String,
    pub deployed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub core: Vec<CoreFile>,
    /// `None` when the target skills directory does not exist.
    pub skills: Option<Vec<ItemStatus>>,
    pub agents: Vec<ItemStatus>,
    pub commands: Vec<ItemStatus>,
    pub hooks: Vec<ItemStatus>,
}

/// Print a banner the way every step announces itself.
pub fn header(msg: &str) -> String {
    let rule = "=".repeat(60);
    format!("\n{rule}\n  {msg}\n{rule}")
}

/// One line per deployed item plus a total.
pub fn item_list(items: &[String], noun: &str) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!("  ✓ {item}\n"));
    }
    out.push_str(&format!("\n  Total: {} {noun} deployed", items.len()));
    out
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[ItemStatus]) -> fmt::Result {
    for item in items {
        let mark = if item.deployed { "✓" } else { "✗ NOT DEPLOYED" };
        writeln!(f, "  {mark} {}", item.name)?;
    }
    Ok(())
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n  Core files:")?;
        for file in &self.core {
            let mark = if file.present { "✓" } else { "✗ MISSING" };
            writeln!(f, "  {mark} {}: {}", file.label, file.path.display())?;
        }

        writeln!(f, "\n  Skills:")?;
        match &self.skills {
            Some(skills) => write_items(f, skills)?,
            None => writeln!(f, "  ✗ Skills directory does not exist")?,
        }

        writeln!(f, "\n  Agents:")?;
        write_items(f, &self.agents)?;
        writeln!(f, "\n  Commands:")?;
        write_items(f, &self.commands)?;
        writeln!(f, "\n  Hooks:")?;
        write_items(f, &self.hooks)
    }
}

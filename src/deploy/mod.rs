//! Copies the bundle into the target directory and wires up hooks.
//!
//! All filesystem access goes through [`FileSystem`] and all interaction
//! through [`Prompt`], so each step can run against a scratch directory.

pub mod report;

pub use report::{
    CoreFile, HooksReport, ItemStatus, ProjectOutcome, SoulReport, StatusReport, StepReport,
};

use std::path::{Path, PathBuf};

use crate::error::{DeployError, Result};
use crate::fs::FileSystem;
use crate::hooks::{self, GUARD_BIN};
use crate::prompt::Prompt;
use crate::settings::{self, SettingsMerger};

/// Install commands for the MCP servers the bundle expects.
pub const MCP_INSTRUCTIONS: &str = r#"
  Run these commands to install MCP servers:

  # 1. MotherDuck/DuckDB (direct DB queries in conversation)
  pip install uv  # if not installed
  claude mcp add --scope user duckdb --transport stdio -- uvx mcp-server-motherduck \
    --db-path :memory: --read-write --allow-switch-databases

  # 2. Memory Graph (structured cross-session knowledge)
  claude mcp add --scope user memory --transport stdio -- \
    npx -y @modelcontextprotocol/server-memory

  # 3. Fetch (web content, paper retrieval)
  claude mcp add --scope user fetch --transport stdio -- \
    npx -y @modelcontextprotocol/server-fetch

  # 4. Context7 (live library documentation)
  # Run in Claude Code: /plugin install context7
"#;

/// Source bundle and target directory locations.
#[derive(Debug, Clone)]
pub struct Layout {
    pub source: PathBuf,
    pub claude: PathBuf,
}

impl Layout {
    pub fn new(source: impl Into<PathBuf>, claude: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            claude: claude.into(),
        }
    }

    pub fn global_claude_src(&self) -> PathBuf {
        self.source.join("claude_md/global_CLAUDE.md")
    }

    pub fn global_claude_dst(&self) -> PathBuf {
        self.claude.join("CLAUDE.md")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.source.join("claude_md/templates")
    }

    pub fn src(&self, section: &str) -> PathBuf {
        self.source.join(section)
    }

    pub fn dst(&self, section: &str) -> PathBuf {
        self.claude.join(section)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.claude.join("settings.json")
    }
}

/// One deployment step of a full run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Soul,
    Skills,
    Agents,
    Commands,
    Hooks,
}

/// Order of a full deployment.
pub const ALL_STEPS: &[Step] = &[
    Step::Soul,
    Step::Skills,
    Step::Agents,
    Step::Commands,
    Step::Hooks,
];

pub struct Deployer<'a> {
    fs: &'a dyn FileSystem,
    layout: Layout,
    merger: SettingsMerger,
    home: Option<PathBuf>,
    guard_binary: Option<PathBuf>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

impl<'a> Deployer<'a> {
    pub fn new(fs: &'a dyn FileSystem, layout: Layout) -> Self {
        Self {
            fs,
            layout,
            merger: SettingsMerger::default(),
            home: None,
            guard_binary: None,
        }
    }

    pub fn with_merger(mut self, merger: SettingsMerger) -> Self {
        self.merger = merger;
        self
    }

    /// Home directory replaced by `$HOME` in hook commands.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Guard executable to install into the hooks directory.
    pub fn with_guard_binary(mut self, path: Option<PathBuf>) -> Self {
        self.guard_binary = path;
        self
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !self.fs.is_dir(dir) {
            return Err(DeployError::MissingSource {
                path: dir.to_path_buf(),
            });
        }
        self.fs.list_dir(dir).map_err(DeployError::io(dir))
    }

    fn mkdir(&self, dir: &Path) -> Result<()> {
        self.fs.create_dir_all(dir).map_err(DeployError::io(dir))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        log::debug!("copy {} -> {}", from.display(), to.display());
        self.fs.copy_file(from, to).map_err(DeployError::io(to))
    }

    /// Copy the global CLAUDE.md, backing up any existing one first.
    pub fn deploy_soul(&self) -> Result<SoulReport> {
        let src = self.layout.global_claude_src();
        let dst = self.layout.global_claude_dst();
        if !self.fs.is_file(&src) {
            return Err(DeployError::MissingSource { path: src });
        }
        self.mkdir(&self.layout.claude)?;

        let backup = if self.fs.exists(&dst) {
            let backup = dst.with_extension("md.backup");
            self.copy(&dst, &backup)?;
            Some(backup)
        } else {
            None
        };

        self.copy(&src, &dst)?;
        Ok(SoulReport {
            deployed: dst,
            backup,
        })
    }

    /// Replace each skill directory that carries a SKILL.md.
    pub fn deploy_skills(&self) -> Result<Vec<String>> {
        let src = self.layout.src("skills");
        let dst = self.layout.dst("skills");
        let entries = self.list(&src)?;
        self.mkdir(&dst)?;

        let mut deployed = Vec::new();
        for dir in entries {
            if !self.fs.is_dir(&dir) || !self.fs.is_file(&dir.join("SKILL.md")) {
                continue;
            }
            let name = file_name(&dir);
            let target = dst.join(&name);
            self.fs
                .copy_dir(&dir, &target)
                .map_err(DeployError::io(&target))?;
            deployed.push(name);
        }
        Ok(deployed)
    }

    pub fn deploy_agents(&self) -> Result<Vec<String>> {
        self.deploy_markdown("agents")
    }

    pub fn deploy_commands(&self) -> Result<Vec<String>> {
        self.deploy_markdown("commands")
    }

    fn deploy_markdown(&self, section: &str) -> Result<Vec<String>> {
        let src = self.layout.src(section);
        let dst = self.layout.dst(section);
        let entries = self.list(&src)?;
        self.mkdir(&dst)?;

        let mut deployed = Vec::new();
        for file in entries {
            if !self.fs.is_file(&file) || !has_extension(&file, "md") {
                continue;
            }
            let name = file_name(&file);
            self.copy(&file, &dst.join(&name))?;
            deployed.push(name);
        }
        Ok(deployed)
    }

    /// Copy hook scripts, install the guard, and rewrite settings.json.
    ///
    /// The step aborts before settings.json is touched when the guard
    /// executable is not in the hooks directory afterwards, or when an
    /// existing settings.json cannot be parsed.
    pub fn deploy_hooks(&self) -> Result<HooksReport> {
        let src = self.layout.src("hooks");
        let dst = self.layout.dst("hooks");
        let entries = self.list(&src)?;
        self.mkdir(&dst)?;

        let mut files = Vec::new();
        for file in entries {
            if !self.fs.is_file(&file) {
                continue;
            }
            let name = file_name(&file);
            let target = dst.join(&name);
            self.copy(&file, &target)?;
            if has_extension(&file, "sh") {
                self.fs
                    .set_executable(&target)
                    .map_err(DeployError::io(&target))?;
            }
            files.push(name);
        }

        let guard_name = format!("{GUARD_BIN}{}", std::env::consts::EXE_SUFFIX);
        let guard_target = dst.join(&guard_name);
        if let Some(guard) = &self.guard_binary
            && self.fs.is_file(guard)
        {
            self.copy(guard, &guard_target)?;
            self.fs
                .set_executable(&guard_target)
                .map_err(DeployError::io(&guard_target))?;
            if !files.contains(&guard_name) {
                files.push(guard_name);
            }
        }
        // Never register a PreToolUse command with nothing behind it.
        if !self.fs.is_file(&guard_target) {
            return Err(DeployError::MissingSource { path: guard_target });
        }

        let hooks_home = hooks::portable_hooks_home(&dst, self.home.as_deref());
        let table = hooks::build_hook_table(&hooks_home);
        let settings_path = self.layout.settings_path();
        settings::update_settings_file(self.fs, &settings_path, &self.merger, &table)?;
        log::info!("hooks registered in {}", settings_path.display());

        Ok(HooksReport {
            files,
            settings: settings_path,
        })
    }

    pub fn deploy_step(&self, step: Step) -> Result<StepReport> {
        Ok(match step {
            Step::Soul => StepReport::Soul(self.deploy_soul()?),
            Step::Skills => StepReport::Skills(self.deploy_skills()?),
            Step::Agents => StepReport::Agents(self.deploy_agents()?),
            Step::Commands => StepReport::Commands(self.deploy_commands()?),
            Step::Hooks => StepReport::Hooks(self.deploy_hooks()?),
        })
    }

    /// Run every step in [`ALL_STEPS`] order, handing each report to
    /// `on_step` as it completes. Stops at the first failing step.
    pub fn deploy_all(&self, mut on_step: impl FnMut(&StepReport)) -> Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(ALL_STEPS.len());
        for &step in ALL_STEPS {
            let report = self.deploy_step(step)?;
            on_step(&report);
            reports.push(report);
        }
        Ok(reports)
    }

    /// Let the user pick a project CLAUDE.md template and copy it into `target`.
    pub fn deploy_project(&self, target: &Path, prompt: &mut dyn Prompt) -> Result<ProjectOutcome> {
        if !self.fs.is_dir(target) {
            return Err(DeployError::TargetMissing {
                path: target.to_path_buf(),
            });
        }

        let templates_dir = self.layout.templates_dir();
        let templates: Vec<PathBuf> = if self.fs.is_dir(&templates_dir) {
            self.fs
                .list_dir(&templates_dir)
                .map_err(DeployError::io(&templates_dir))?
                .into_iter()
                .filter(|p| has_extension(p, "md"))
                .collect()
        } else {
            Vec::new()
        };

        let mut message = String::from("\n  Available templates:\n");
        for (i, t) in templates.iter().enumerate() {
            let stem = t.file_stem().unwrap_or_default().to_string_lossy();
            message.push_str(&format!("  {}. {stem}\n", i + 1));
        }
        message.push_str("\n  Select template number (or press Enter to skip): ");

        let choice = prompt.ask(&message).map_err(DeployError::io("<stdin>"))?;
        if choice.is_empty() {
            return Ok(ProjectOutcome::Skipped);
        }

        let template = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| templates.get(i))
            .ok_or_else(|| DeployError::InvalidSelection(choice.clone()))?;

        let dest = target.join("CLAUDE.md");
        if self.fs.exists(&dest) {
            let answer = prompt
                .ask(&format!(
                    "  WARNING: CLAUDE.md already exists at {}. Overwrite? (y/N): ",
                    dest.display()
                ))
                .map_err(DeployError::io("<stdin>"))?;
            if answer.to_lowercase() != "y" {
                return Ok(ProjectOutcome::Skipped);
            }
        }

        self.copy(template, &dest)?;
        Ok(ProjectOutcome::Deployed {
            template: file_name(template),
            dest,
        })
    }

    /// Compare the bundle against what is installed.
    pub fn status(&self) -> StatusReport {
        let core = vec![
            CoreFile {
                label: "Global CLAUDE.md",
                path: self.layout.global_claude_dst(),
                present: self.fs.exists(&self.layout.global_claude_dst()),
            },
            CoreFile {
                label: "settings.json",
                path: self.layout.settings_path(),
                present: self.fs.exists(&self.layout.settings_path()),
            },
        ];

        let skills_dst = self.layout.dst("skills");
        let skills = self.fs.is_dir(&skills_dst).then(|| {
            self.items("skills", |p| self.fs.is_dir(p))
        });

        StatusReport {
            core,
            skills,
            agents: self.items("agents", |p| self.fs.is_file(p) && has_extension(p, "md")),
            commands: self.items("commands", |p| self.fs.is_file(p) && has_extension(p, "md")),
            hooks: self.items("hooks", |p| self.fs.is_file(p)),
        }
    }

    /// Source entries of `section` accepted by `keep`, with whether each
    /// exists in the target. A missing source section yields nothing.
    fn items(&self, section: &str, keep: impl Fn(&Path) -> bool) -> Vec<ItemStatus> {
        let src = self.layout.src(section);
        let dst = self.layout.dst(section);
        let Ok(entries) = self.fs.list_dir(&src) else {
            return Vec::new();
        };
        entries
            .into_iter()
            .filter(|p| keep(p.as_path()))
            .map(|p| {
                let name = file_name(&p);
                let deployed = self.fs.exists(&dst.join(&name));
                ItemStatus { name, deployed }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFs;
    use std::collections::VecDeque;
    use std::fs;

    struct Scripted(VecDeque<&'static str>);

    impl Prompt for Scripted {
        fn ask(&mut self, _message: &str) -> std::io::Result<String> {
            Ok(self.0.pop_front().unwrap_or_default().to_string())
        }
    }

    fn scripted(answers: &[&'static str]) -> Scripted {
        Scripted(answers.iter().copied().collect())
    }

    fn bundle() -> (tempfile::TempDir, Layout) {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bundle");
        for sub in [
            "claude_md/templates",
            "skills/alpha",
            "skills/not-a-skill",
            "agents",
            "commands",
            "hooks",
        ] {
            fs::create_dir_all(src.join(sub)).unwrap();
        }
        fs::write(src.join("claude_md/global_CLAUDE.md"), "global").unwrap();
        fs::write(src.join("claude_md/templates/python.md"), "py").unwrap();
        fs::write(src.join("claude_md/templates/rust.md"), "rs").unwrap();
        fs::write(src.join("skills/alpha/SKILL.md"), "skill").unwrap();
        fs::write(src.join("skills/not-a-skill/README.md"), "x").unwrap();
        fs::write(src.join("agents/reviewer.md"), "a").unwrap();
        fs::write(src.join("agents/notes.txt"), "skip").unwrap();
        fs::write(src.join("commands/ship.md"), "c").unwrap();
        fs::write(src.join("hooks/syntax-check.sh"), "#!/bin/sh\n").unwrap();
        fs::write(dir.path().join("guard-build"), "bin").unwrap();
        let layout = Layout::new(src, dir.path().join("home/.claude"));
        (dir, layout)
    }

    /// Deployer with the scratch guard build from [`bundle`] attached.
    fn guarded<'a>(dir: &tempfile::TempDir, layout: &Layout) -> Deployer<'a> {
        Deployer::new(&RealFs, layout.clone())
            .with_guard_binary(Some(dir.path().join("guard-build")))
    }

    fn guard_name() -> String {
        format!("{GUARD_BIN}{}", std::env::consts::EXE_SUFFIX)
    }

    #[test]
    fn soul_backs_up_existing() {
        let (_dir, layout) = bundle();
        let deployer = Deployer::new(&RealFs, layout.clone());
        let first = deployer.deploy_soul().unwrap();
        assert!(first.backup.is_none());

        fs::write(layout.global_claude_dst(), "edited").unwrap();
        let second = deployer.deploy_soul().unwrap();
        let backup = second.backup.unwrap();
        assert!(backup.ends_with("CLAUDE.md.backup"));
        assert_eq!(fs::read_to_string(backup).unwrap(), "edited");
        assert_eq!(fs::read_to_string(second.deployed).unwrap(), "global");
    }

    #[test]
    fn soul_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().join("nope"), dir.path().join(".claude"));
        let err = Deployer::new(&RealFs, layout).deploy_soul();
        assert!(matches!(err, Err(DeployError::MissingSource { .. })));
    }

    #[test]
    fn skills_only_with_skill_md() {
        let (_dir, layout) = bundle();
        let deployed = Deployer::new(&RealFs, layout.clone()).deploy_skills().unwrap();
        assert_eq!(deployed, ["alpha"]);
        assert!(layout.dst("skills/alpha/SKILL.md").exists());
        assert!(!layout.dst("skills/not-a-skill").exists());
    }

    #[test]
    fn markdown_sections() {
        let (_dir, layout) = bundle();
        let deployer = Deployer::new(&RealFs, layout.clone());
        assert_eq!(deployer.deploy_agents().unwrap(), ["reviewer.md"]);
        assert_eq!(deployer.deploy_commands().unwrap(), ["ship.md"]);
        assert!(!layout.dst("agents/notes.txt").exists());
    }

    #[test]
    fn hooks_write_settings_with_home_placeholder() {
        let (dir, layout) = bundle();
        let home = dir.path().join("home");
        let report = guarded(&dir, &layout)
            .with_home(Some(home))
            .deploy_hooks()
            .unwrap();
        assert_eq!(report.files, ["syntax-check.sh".to_string(), guard_name()]);

        let text = fs::read_to_string(&report.settings).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            doc["hooks"]["PostToolUse"][0]["hooks"][0]["command"],
            "bash $HOME/.claude/hooks/syntax-check.sh"
        );
        assert_eq!(
            doc["enabledPlugins"]["claude-supermemory@supermemory-plugins"],
            true
        );
    }

    #[cfg(unix)]
    #[test]
    fn hooks_shell_scripts_executable() {
        use std::os::unix::fs::PermissionsExt;
        let (dir, layout) = bundle();
        guarded(&dir, &layout).deploy_hooks().unwrap();
        let mode = fs::metadata(layout.dst("hooks/syntax-check.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn hooks_install_guard_binary() {
        let (dir, layout) = bundle();
        let report = guarded(&dir, &layout).deploy_hooks().unwrap();
        assert!(report.files.contains(&guard_name()));
        assert_eq!(
            fs::read_to_string(layout.dst("hooks").join(guard_name())).unwrap(),
            "bin"
        );
    }

    #[test]
    fn hooks_refuse_without_guard_binary() {
        let (dir, layout) = bundle();
        for deployer in [
            Deployer::new(&RealFs, layout.clone()),
            Deployer::new(&RealFs, layout.clone())
                .with_guard_binary(Some(dir.path().join("not-built"))),
        ] {
            match deployer.deploy_hooks() {
                Err(DeployError::MissingSource { path }) => {
                    assert_eq!(path, layout.dst("hooks").join(guard_name()));
                }
                other => panic!("expected MissingSource, got {other:?}"),
            }
            assert!(!layout.settings_path().exists());
        }
    }

    #[test]
    fn hooks_keep_previously_installed_guard() {
        let (dir, layout) = bundle();
        guarded(&dir, &layout).deploy_hooks().unwrap();
        let report = Deployer::new(&RealFs, layout.clone()).deploy_hooks().unwrap();
        assert_eq!(report.files, ["syntax-check.sh"]);
        assert!(layout.settings_path().exists());
    }

    #[test]
    fn hooks_abort_on_corrupt_settings() {
        let (dir, layout) = bundle();
        fs::create_dir_all(&layout.claude).unwrap();
        fs::write(layout.settings_path(), "{oops").unwrap();
        let err = guarded(&dir, &layout).deploy_hooks();
        assert!(matches!(err, Err(DeployError::CorruptSettings { .. })));
        assert_eq!(fs::read_to_string(layout.settings_path()).unwrap(), "{oops");
    }

    #[cfg(unix)]
    #[test]
    fn skills_with_symlinked_dir() {
        let (dir, layout) = bundle();
        let shared = dir.path().join("shared-refs");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("guide.md"), "guide").unwrap();
        std::os::unix::fs::symlink(&shared, layout.src("skills/alpha/refs")).unwrap();

        let deployed = Deployer::new(&RealFs, layout.clone()).deploy_skills().unwrap();
        assert_eq!(deployed, ["alpha"]);
        assert_eq!(
            fs::read_to_string(layout.dst("skills/alpha/refs/guide.md")).unwrap(),
            "guide"
        );
    }

    #[test]
    fn all_runs_steps_in_order() {
        let (dir, layout) = bundle();
        let mut seen = Vec::new();
        let reports = guarded(&dir, &layout)
            .deploy_all(|r| seen.push(std::mem::discriminant(r)))
            .unwrap();
        assert_eq!(reports.len(), ALL_STEPS.len());
        assert!(matches!(reports[0], StepReport::Soul(_)));
        assert_eq!(reports[1], StepReport::Skills(vec!["alpha".into()]));
        assert!(matches!(reports[4], StepReport::Hooks(_)));
        assert_eq!(seen.len(), ALL_STEPS.len());
        assert!(layout.settings_path().exists());
    }

    #[test]
    fn all_stops_at_first_error() {
        let (dir, layout) = bundle();
        fs::remove_file(layout.global_claude_src()).unwrap();
        let mut seen = 0;
        let err = guarded(&dir, &layout).deploy_all(|_| seen += 1);
        assert!(matches!(err, Err(DeployError::MissingSource { .. })));
        assert_eq!(seen, 0);
        assert!(!layout.dst("skills").exists());
        assert!(!layout.settings_path().exists());
    }

    #[test]
    fn all_stops_before_hooks_without_guard() {
        let (_dir, layout) = bundle();
        let mut seen = Vec::new();
        let err = Deployer::new(&RealFs, layout.clone()).deploy_all(|r| seen.push(r.clone()));
        assert!(matches!(err, Err(DeployError::MissingSource { .. })));
        assert_eq!(seen.len(), 4);
        assert!(layout.dst("commands/ship.md").exists());
        assert!(!layout.settings_path().exists());
    }

    #[test]
    fn project_select_and_overwrite() {
        let (dir, layout) = bundle();
        let target = dir.path().join("proj");
        fs::create_dir_all(&target).unwrap();
        let deployer = Deployer::new(&RealFs, layout);

        let outcome = deployer.deploy_project(&target, &mut scripted(&["2"])).unwrap();
        assert_eq!(
            outcome,
            ProjectOutcome::Deployed {
                template: "rust.md".into(),
                dest: target.join("CLAUDE.md"),
            }
        );

        // Existing file, user declines
        let outcome = deployer
            .deploy_project(&target, &mut scripted(&["1", "n"]))
            .unwrap();
        assert_eq!(outcome, ProjectOutcome::Skipped);
        assert_eq!(fs::read_to_string(target.join("CLAUDE.md")).unwrap(), "rs");

        // Existing file, user accepts
        deployer
            .deploy_project(&target, &mut scripted(&["1", "Y"]))
            .unwrap();
        assert_eq!(fs::read_to_string(target.join("CLAUDE.md")).unwrap(), "py");
    }

    #[test]
    fn project_skip_and_invalid() {
        let (dir, layout) = bundle();
        let target = dir.path().join("proj");
        fs::create_dir_all(&target).unwrap();
        let deployer = Deployer::new(&RealFs, layout);

        assert_eq!(
            deployer.deploy_project(&target, &mut scripted(&[""])).unwrap(),
            ProjectOutcome::Skipped
        );
        for bad in ["0", "3", "two"] {
            assert!(matches!(
                deployer.deploy_project(&target, &mut scripted(&[bad])),
                Err(DeployError::InvalidSelection(_))
            ));
        }
        assert!(matches!(
            deployer.deploy_project(&dir.path().join("missing"), &mut scripted(&[])),
            Err(DeployError::TargetMissing { .. })
        ));
    }

    #[test]
    fn status_reflects_deployment() {
        let (_dir, layout) = bundle();
        let deployer = Deployer::new(&RealFs, layout);
        let before = deployer.status();
        assert!(before.skills.is_none());
        assert!(before.core.iter().all(|c| !c.present));
        assert!(before.agents.iter().all(|a| !a.deployed));

        deployer.deploy_skills().unwrap();
        deployer.deploy_agents().unwrap();
        let after = deployer.status();
        let skills = after.skills.unwrap();
        assert!(skills.iter().any(|s| s.name == "alpha" && s.deployed));
        assert!(skills.iter().any(|s| s.name == "not-a-skill" && !s.deployed));
        assert_eq!(
            after.agents,
            [ItemStatus {
                name: "reviewer.md".into(),
                deployed: true
            }]
        );
    }
}

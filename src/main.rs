//! cc-deploy: deploys directives, skills, agents, commands, and hooks into
//! the Claude Code configuration directory.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cc_deploy::config::Config;
use cc_deploy::deploy::{
    Deployer, Layout, MCP_INSTRUCTIONS, ProjectOutcome, Step, StepReport, report,
};
use cc_deploy::fs::RealFs;
use cc_deploy::hooks::GUARD_BIN;
use cc_deploy::logging;
use cc_deploy::prompt::StdinPrompt;
use cc_deploy::settings::SettingsMerger;

#[derive(Parser)]
#[command(name = "cc-deploy", version, about)]
struct Cli {
    /// Bundle root (defaults to `paths.source_dir` from config)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Target directory (defaults to `paths.claude_dir` from config)
    #[arg(long, global = true)]
    claude_dir: Option<PathBuf>,

    /// Debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Full deployment: soul, skills, agents, commands, hooks, MCP commands
    All,
    /// Deploy the global CLAUDE.md
    Soul,
    /// Deploy every skill package
    Skills,
    /// Deploy agent definitions
    Agents,
    /// Deploy command templates
    Commands,
    /// Deploy hook scripts and register them in settings.json
    Hooks,
    /// Print MCP server install commands
    Mcp,
    /// Copy a project CLAUDE.md template into PATH
    Project { path: PathBuf },
    /// Show what is deployed
    Status,
}

/// Guard binary shipped alongside this executable, if present.
fn sibling_guard() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let guard = exe.with_file_name(format!("{GUARD_BIN}{}", std::env::consts::EXE_SUFFIX));
    guard.is_file().then_some(guard)
}

/// Banner plus what the step did.
fn print_step(step: &StepReport) {
    match step {
        StepReport::Soul(soul) => {
            println!("{}", report::header("Deploying Global CLAUDE.md"));
            if let Some(backup) = &soul.backup {
                println!("  Backed up existing: {}", backup.display());
            }
            println!("  ✓ Deployed: {}", soul.deployed.display());
        }
        StepReport::Skills(items) => {
            println!("{}", report::header("Deploying Skills"));
            println!("{}", report::item_list(items, "skills"));
        }
        StepReport::Agents(items) => {
            println!("{}", report::header("Deploying Agents"));
            println!("{}", report::item_list(items, "agents"));
        }
        StepReport::Commands(items) => {
            println!("{}", report::header("Deploying Commands"));
            println!("{}", report::item_list(items, "commands"));
        }
        StepReport::Hooks(hooks) => {
            println!("{}", report::header("Deploying Hooks"));
            for file in &hooks.files {
                println!("  ✓ {file}");
            }
            println!("\n  ✓ Updated: {}", hooks.settings.display());
        }
    }
}

fn run(deployer: &Deployer, command: Command) -> cc_deploy::Result<()> {
    let step = match command {
        Command::Soul => Step::Soul,
        Command::Skills => Step::Skills,
        Command::Agents => Step::Agents,
        Command::Commands => Step::Commands,
        Command::Hooks => Step::Hooks,
        Command::All => {
            println!("{}", report::header("Full Deployment"));
            deployer.deploy_all(print_step)?;
            println!("{}", report::header("MCP Server Installation Commands"));
            println!("{MCP_INSTRUCTIONS}");
            println!("{}", report::header("Deployment Complete"));
            println!("\n  Restart Claude Code for all changes to take effect.");
            println!("  Run 'cc-deploy status' to verify.");
            println!("  Run MCP install commands shown above.");
            return Ok(());
        }
        Command::Mcp => {
            println!("{}", report::header("MCP Server Installation Commands"));
            println!("{MCP_INSTRUCTIONS}");
            return Ok(());
        }
        Command::Project { path } => {
            println!(
                "{}",
                report::header(&format!("Deploying Project CLAUDE.md to {}", path.display()))
            );
            match deployer.deploy_project(&path, &mut StdinPrompt)? {
                ProjectOutcome::Skipped => println!("  Skipped."),
                ProjectOutcome::Deployed { template, dest } => {
                    println!("  ✓ Deployed {template} → {}", dest.display());
                    println!("  Remember to customize CLAUDE.md for your specific project!");
                }
            }
            return Ok(());
        }
        Command::Status => {
            println!("{}", report::header("Deployment Status"));
            print!("{}", deployer.status());
            return Ok(());
        }
    };
    print_step(&deployer.deploy_step(step)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init_cli_log(cli.verbose);

    let config = Config::load();
    let layout = Layout::new(
        cli.source.unwrap_or_else(|| config.source_dir()),
        cli.claude_dir.unwrap_or_else(|| config.claude_dir()),
    );
    log::debug!(
        "source {} -> target {}",
        layout.source.display(),
        layout.claude.display()
    );

    let deployer = Deployer::new(&RealFs, layout)
        .with_merger(SettingsMerger::new(config.plugins.enabled.iter().cloned()))
        .with_home(std::env::var_os("HOME").map(PathBuf::from))
        .with_guard_binary(sibling_guard());

    if let Err(e) = run(&deployer, cli.command) {
        eprintln!("cc-deploy: {e}");
        std::process::exit(1);
    }
}

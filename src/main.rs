use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

use gitvis::alias::{self, AliasInstaller};
use gitvis::config::{ColorMode, Config};
use gitvis::convention;
use gitvis::error::WorkflowError;
use gitvis::git::{CommandRunner, GraphScope};
use gitvis::interactive::{InteractiveSession, StdinPrompter};
use gitvis::subprocess::SubprocessManager;
use gitvis::workflow::{WorkflowAction, WorkflowOrchestrator, WorkflowReport};

/// Conventional-commit git workflows with the branch graph after every change
#[derive(Parser)]
#[command(name = "gitvis", version)]
#[command(about = "Conventional-commit git workflows with the branch graph after every change", long_about = None)]
struct Cli {
    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Run as if started in <DIR>
    #[arg(short = 'C', value_name = "DIR", global = true)]
    directory: Option<PathBuf>,

    /// Never color the graph
    #[arg(long, global = true)]
    no_color: bool,

    /// Commits per rendered graph (0 for no limit)
    #[arg(short = 'n', long, global = true)]
    lines: Option<i64>,

    /// Print the workflow report as JSON instead of framed graphs
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage everything, commit and push the current branch
    Commit {
        /// Conventional commit message, e.g. "feat(auth): add login"
        #[arg(short, long)]
        message: String,
    },
    /// Create a branch and switch to it
    Branch { name: String },
    /// Create a branch, then commit and push to it
    CommitBranch {
        name: String,
        #[arg(short, long)]
        message: String,
    },
    /// Merge a branch into the current one
    Merge { branch: String },
    /// Fetch all remotes
    Fetch,
    /// Switch to an existing local branch
    Switch { name: String },
    /// Pull the current branch from the configured remote
    Pull,
    /// Delete a local branch
    DeleteBranch {
        name: String,
        /// Delete it on the remote too
        #[arg(long)]
        remote: bool,
    },
    /// Add the configured remote, or change its URL
    Remote { url: String },
    /// Show the branch graph
    Graph {
        /// Include remote-tracking branches
        #[arg(long)]
        all: bool,
    },
    /// List local and remote branches
    Branches,
    /// Install the graph aliases into git configuration
    Setup {
        /// Replace aliases that already exist with a different definition
        #[arg(long)]
        force: bool,
    },
    /// Check a commit message against the convention without committing
    CheckMessage {
        #[arg(required_unless_present = "file")]
        message: Option<String>,
        /// Read the message from a file, e.g. from a commit-msg hook
        #[arg(long, conflicts_with = "message")]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("gitvis started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let repo = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let mut config = Config::load(&repo).context("Failed to load configuration")?;
    if cli.no_color {
        config.color = ColorMode::Never;
    }
    if let Some(lines) = cli.lines {
        config.graph_lines = lines;
    }
    debug!("Resolved configuration: {:?}", config);

    let settings = config.workflow_settings();
    colored::control::set_override(settings.render.color);

    let runner: Arc<dyn CommandRunner> = Arc::new(
        SubprocessManager::production().git(&repo, config.command_timeout()),
    );
    let orchestrator = WorkflowOrchestrator::new(Arc::clone(&runner)).with_settings(settings);

    let action = match cli.command {
        None => {
            let aliases = AliasInstaller::new(runner, config.alias_scope)
                .commit_template(alias::find_commit_template(&repo));
            let prompter = StdinPrompter::new();
            InteractiveSession::new(&orchestrator, &aliases, &prompter, std::io::stdout())
                .run()
                .await?;
            return Ok(0);
        }
        Some(Commands::Branches) => {
            return match orchestrator.branches().await {
                Ok(listing) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&listing)?);
                    Ok(0)
                }
                Ok(listing) => {
                    print!("{listing}");
                    Ok(0)
                }
                Err(e) => {
                    eprintln!("{e}");
                    Ok(e.exit_status())
                }
            };
        }
        Some(Commands::Setup { force }) => {
            let installer = AliasInstaller::new(runner, config.alias_scope)
                .force(force)
                .commit_template(alias::find_commit_template(&repo));
            return match installer.install().await {
                Ok(outcomes) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&outcomes)?);
                    Ok(0)
                }
                Ok(outcomes) => {
                    for outcome in outcomes {
                        println!("{outcome}");
                    }
                    Ok(0)
                }
                Err(failure) => {
                    eprintln!("{failure}");
                    Ok(1)
                }
            };
        }
        Some(Commands::CheckMessage { message, file }) => {
            let raw = match (message, file) {
                (Some(message), _) => message,
                (None, Some(path)) => strip_comment_lines(
                    &std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                ),
                (None, None) => anyhow::bail!("A message or --file is required"),
            };
            return Ok(check_message(&raw, config.subject_max_len));
        }
        Some(Commands::Commit { message }) => WorkflowAction::QuickCommitAndPush { message },
        Some(Commands::Branch { name }) => WorkflowAction::CreateBranchAndSwitch { branch: name },
        Some(Commands::CommitBranch { name, message }) => WorkflowAction::CommitToNewBranch {
            branch: name,
            message,
        },
        Some(Commands::Merge { branch }) => WorkflowAction::MergeBranch { branch },
        Some(Commands::Fetch) => WorkflowAction::Fetch,
        Some(Commands::Switch { name }) => WorkflowAction::SwitchBranch { branch: name },
        Some(Commands::Pull) => WorkflowAction::Pull,
        Some(Commands::DeleteBranch { name, remote }) => WorkflowAction::DeleteBranch {
            branch: name,
            remote,
        },
        Some(Commands::Remote { url }) => WorkflowAction::SetupRemote { url },
        Some(Commands::Graph { all }) => WorkflowAction::ShowGraph {
            scope: if all { GraphScope::All } else { GraphScope::Local },
        },
    };

    let report = orchestrator.execute(action).await;
    present(&report, cli.json)?;
    Ok(report.error.as_ref().map_or(0, WorkflowError::exit_status))
}

/// Graphs to stdout, the failure (if any) to stderr
fn present(report: &WorkflowReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for snapshot in &report.snapshots {
            println!("{snapshot}");
        }
    }
    if let Some(error) = &report.error {
        eprintln!("{error}");
    }
    Ok(())
}

fn check_message(raw: &str, max_subject_len: usize) -> i32 {
    match convention::commit::validate_with_limit(raw, max_subject_len) {
        Ok(message) => {
            println!("ok: {}", message.header());
            0
        }
        Err(e) => {
            let error = WorkflowError::from(e);
            eprintln!("{error}");
            error.exit_status()
        }
    }
}

/// Drop the `#` lines git adds to commit message templates
fn strip_comment_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

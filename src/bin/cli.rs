use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use actions_gate::github::{GithubClient, HistoryQuery, RepoRef};
use actions_gate::prelude::*;

#[derive(Parser)]
#[command(name = "actions-gate")]
#[command(about = "Gate GitHub Actions workflow runs on their run history", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a gate.yaml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether the current invocation should run and print the
    /// verdict as shell export lines on stdout
    ShouldExecute {
        #[command(flatten)]
        target: TargetArgs,

        /// Run number of the current invocation
        #[arg(long)]
        run_number: i64,

        /// How many recent runs to inspect
        #[arg(long)]
        history_window: Option<usize>,
    },

    /// Block until a previous run has completed and its settle window
    /// has elapsed
    ShouldComplete {
        #[command(flatten)]
        target: TargetArgs,

        /// Id of the previous run to wait on
        #[arg(long)]
        past_run_id: i64,

        /// Seconds between status checks
        #[arg(long)]
        poll_interval: Option<u64>,

        /// Seconds to wait after the run's last update
        #[arg(long)]
        settle: Option<u64>,

        /// Give up after this many seconds instead of waiting forever
        #[arg(long)]
        deadline: Option<u64>,
    },
}

/// Flags shared by both modes, overriding the config file field by field.
#[derive(Args)]
struct TargetArgs {
    /// Repository owner (user or organization)
    #[arg(long)]
    owner: Option<String>,

    /// Repository name
    #[arg(long)]
    repo: Option<String>,

    /// Workflow file name under .github/workflows/
    #[arg(long)]
    workflow_file: Option<String>,

    /// Branch whose run history is consulted
    #[arg(long)]
    branch: Option<String>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "actions_gate=debug"
    } else {
        "actions_gate=info"
    };

    // stdout is reserved for the export lines; everything else goes to
    // stderr so `eval "$(actions-gate should-execute ...)"` stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gate failed");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::ShouldExecute {
            target,
            run_number,
            history_window,
        } => {
            let mut config = resolve_config(cli.config.as_deref(), &target)?;
            if let Some(window) = history_window {
                config.history_window = window;
            }
            should_execute(config, run_number).await
        }
        Commands::ShouldComplete {
            target,
            past_run_id,
            poll_interval,
            settle,
            deadline,
        } => {
            let mut config = resolve_config(cli.config.as_deref(), &target)?;
            if let Some(secs) = poll_interval {
                config.poll_interval_secs = secs;
            }
            if let Some(secs) = settle {
                config.settle_secs = secs;
            }
            if let Some(secs) = deadline {
                config.deadline_secs = Some(secs);
            }
            should_complete(config, past_run_id).await
        }
    }
}

fn resolve_config(path: Option<&Path>, target: &TargetArgs) -> anyhow::Result<GateConfig> {
    let mut config = match path {
        Some(path) => GateConfig::load(path)?,
        None => GateConfig::default(),
    };

    if let Some(owner) = &target.owner {
        config.owner = Some(owner.clone());
    }
    if let Some(repo) = &target.repo {
        config.repo = Some(repo.clone());
    }
    if let Some(workflow_file) = &target.workflow_file {
        config.workflow_file = Some(workflow_file.clone());
    }
    if let Some(branch) = &target.branch {
        config.branch = branch.clone();
    }

    Ok(config)
}

/// Decide and print. A failed fetch or an empty history must not break
/// the surrounding pipeline, so those are logged and the safe default
/// verdict is exported instead of aborting.
async fn should_execute(config: GateConfig, run_number: i64) -> anyhow::Result<()> {
    let repo = config.repo_ref()?;
    let query = config.history_query()?;
    let client = GithubClient::from_env()?;

    let decision = match evaluate_current(&client, &repo, &query, run_number).await {
        Ok(decision) => decision,
        Err(e) => {
            tracing::error!(
                owner = %repo.owner,
                repo = %repo.repo,
                workflow_file = %query.workflow_file,
                error = %e,
                "could not decide; exporting the do-nothing verdict"
            );
            GateDecision::default()
        }
    };

    for line in decision.export_lines() {
        println!("{line}");
    }
    Ok(())
}

async fn evaluate_current(
    client: &GithubClient,
    repo: &RepoRef,
    query: &HistoryQuery,
    run_number: i64,
) -> Result<GateDecision, GateError> {
    let history = client.list_runs(repo, query).await?;
    ExecutionGate::evaluate(&history, run_number, query.per_page)
}

/// Wait for the predecessor run, then return silently; exit code 0 is
/// the whole contract of this mode. Any fetch error is fatal.
async fn should_complete(config: GateConfig, past_run_id: i64) -> anyhow::Result<()> {
    let repo = config.repo_ref()?;
    let client = GithubClient::from_env()?;

    let mut waiter = CompletionWaiter::new(config.poll_interval(), config.settle_duration());
    if let Some(deadline) = config.deadline() {
        waiter = waiter.with_deadline(deadline);
    }

    waiter.await_completion(&client, &repo, past_run_id).await?;
    Ok(())
}

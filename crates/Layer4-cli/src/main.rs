//! ctxbench CLI - Main entry point

mod docs;
mod runner;
mod summary;

use clap::{Args as ClapArgs, Parser, Subcommand};
use ctxbench_foundation::{run_timestamp, ArtifactStore, BenchConfig, Error};
use ctxbench_provider::{ChatClient, PcNodeClient};
use ctxbench_scenario::{render_markdown, translate_to_english, DataAnalyzer};
use runner::{RunOptions, TestRunner};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ctxbench - PC Node context sharing benchmark
#[derive(Parser, Debug)]
#[command(name = "ctxbench")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Options for the default `run` command
    #[command(flatten)]
    run: RunArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the single- and multi-agent comparisons (default)
    Run(RunArgs),
    /// Re-run the analyzer on saved stage artifacts
    Analyze {
        /// Single-agent stage artifact (JSON)
        #[arg(long)]
        single: PathBuf,

        /// Multi-agent stage artifact (JSON)
        #[arg(long)]
        multi: PathBuf,

        /// Write the reports into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (for the token price)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Probe the service health endpoint
    Health {
        /// Service root URL
        #[arg(long)]
        base_url: Option<String>,

        /// Config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug, Clone, Default)]
struct RunArgs {
    /// Skip the single-agent comparison
    #[arg(long)]
    skip_single: bool,

    /// Skip the multi-agent comparison
    #[arg(long)]
    skip_multi: bool,

    /// Run only the first N turns of each script
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "3")]
    quick: Option<usize>,

    /// Config file (JSON); the built-in scripts are used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service root URL (overrides config and PC_NODE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for result artifacts
    #[arg(long, default_value = "test_results")]
    results_dir: PathBuf,

    /// Also publish charts and reports into this docs directory
    #[arg(long)]
    docs_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    tokio::select! {
        result = dispatch(args) => match result {
            Ok(code) => code,
            Err(e) => {
                eprintln!("\n❌ Unexpected error: {:#}", e);
                if let Some(hint) = error_hint(&e) {
                    eprintln!("   💡 {}", hint);
                }
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\n⚠️  Test interrupted by user");
            ExitCode::from(130)
        }
    }
}

/// Follow-up advice for errors the user can act on
fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    let err = err.downcast_ref::<Error>()?;
    if err.is_user_facing() {
        Some("Check the --config file and command-line options")
    } else if err.is_transport() {
        Some("Check that PC Node is reachable (try `ctxbench health`)")
    } else {
        None
    }
}

async fn dispatch(args: Args) -> anyhow::Result<ExitCode> {
    match args.command {
        Some(Command::Run(run)) => run_cmd(run).await,
        Some(Command::Analyze {
            single,
            multi,
            output,
            config,
        }) => analyze_cmd(&single, &multi, output.as_deref(), config.as_deref()),
        Some(Command::Health { base_url, config }) => health_cmd(base_url, config.as_deref()).await,
        None => run_cmd(args.run).await,
    }
}

/// Load the config and apply overrides (env first, then flags)
fn load_config(
    path: Option<&Path>,
    base_url: Option<String>,
    quick: Option<usize>,
) -> anyhow::Result<BenchConfig> {
    let mut config = BenchConfig::load_or_builtin(path)?.apply_env_overrides();

    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    if let Some(rounds) = quick {
        println!("⚡ Quick test mode enabled - using {} conversation rounds", rounds);
        config = config.quick(rounds);
    }

    config.validate()?;
    Ok(config)
}

async fn run_cmd(args: RunArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref(), args.base_url, args.quick)?;
    tracing::info!("Target service: {}", config.test_config.base_url);

    let client: Arc<dyn ChatClient> =
        Arc::new(PcNodeClient::from_config(&config.test_config).map_err(Error::from)?);
    let options = RunOptions {
        skip_single: args.skip_single,
        skip_multi: args.skip_multi,
        results_dir: args.results_dir,
        docs_dir: args.docs_dir,
    };

    let runner = TestRunner::new(client, config, options);
    let results = runner.run_all_tests().await?;
    summary::print_final_summary(&results, runner.results_dir());

    if results.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn analyze_cmd(
    single: &Path,
    multi: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let config = BenchConfig::load_or_builtin(config)?;
    let single: serde_json::Value = ArtifactStore::load_json(single)?;
    let multi: serde_json::Value = ArtifactStore::load_json(multi)?;

    let analysis =
        DataAnalyzer::new(config.test_config.cost_per_1k_tokens).analyze_artifacts(&single, &multi);
    let report = render_markdown(&analysis);

    match output {
        Some(dir) => {
            let store = ArtifactStore::new(dir);
            let timestamp = run_timestamp();
            store.save_json(&format!("analysis_{}.json", timestamp), &analysis)?;
            let zh = store.save_text(&format!("analysis_report_{}.md", timestamp), &report)?;
            let en = store.save_text(
                &format!("analysis_report_{}.en.md", timestamp),
                &translate_to_english(&report),
            )?;
            println!("✅ Reports saved to {} and {}", zh.display(), en.display());
        }
        None => println!("{}", report),
    }

    summary::print_key_indicators(&analysis);
    Ok(ExitCode::SUCCESS)
}

async fn health_cmd(base_url: Option<String>, config: Option<&Path>) -> anyhow::Result<ExitCode> {
    let config = load_config(config, base_url, None)?;
    let client = PcNodeClient::from_config(&config.test_config).map_err(Error::from)?;

    if client.health_check().await {
        println!("✅ PC Node is healthy: {}", client.base_url());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("❌ PC Node is not healthy: {}", client.base_url());
        Ok(ExitCode::FAILURE)
    }
}

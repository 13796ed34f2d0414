use std::path::PathBuf;

use ai_llm_service::telemetry;
use anyhow::Context;
use clap::Parser;
use policy_reviewer::advisor::FixSuggester;
use policy_reviewer::{
    DEFAULT_OUTPUT_FILE, DEFAULT_PLAN_FILE, DEFAULT_VIOLATIONS_FILE, ReviewInputs, run_review,
    write_comment,
};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Targets rendered by the log layer.
const LOG_TARGETS: &[&str] = &["policy_review_agent", "policy_reviewer", "ai_llm_service"];

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,policy_reviewer=info";

/// Turns OPA policy violations and a Terraform plan into a pull-request comment.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Policy engine result document.
    #[arg(long, env = "OPA_VIOLATIONS_FILE", default_value = DEFAULT_VIOLATIONS_FILE)]
    violations: PathBuf,

    /// Terraform plan in JSON form.
    #[arg(long, env = "TF_PLAN_FILE", default_value = DEFAULT_PLAN_FILE)]
    plan: PathBuf,

    /// Directory with the `.tf` files (not searched recursively).
    #[arg(long, env = "TF_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,

    /// Where the rendered comment is written.
    #[arg(long, env = "PR_COMMENT_FILE", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Skip AI fix suggestions even when an API key is configured.
    #[arg(long)]
    no_ai: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal in CI.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = telemetry::env_filter_with_level(DEFAULT_LOG_FILTER, Level::INFO);
    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry::layer(LOG_TARGETS))
        .try_init()
        .context("installing tracing subscriber")?;

    if let Err(e) = dotenv
        && !e.not_found()
    {
        warn!(error = %e, "ignoring unreadable .env file");
    }

    let suggester = if cli.no_ai {
        info!("AI fix suggestions disabled by --no-ai");
        FixSuggester::Disabled
    } else {
        FixSuggester::from_env()
    };

    let inputs = ReviewInputs {
        violations_path: cli.violations,
        plan_path: cli.plan,
        config_dir: cli.config_dir,
    };

    let body = run_review(&inputs, &suggester).await;
    println!("{body}");

    write_comment(&cli.output, &body)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    Ok(())
}

mod ai;
mod cli;
mod config;
mod error;
mod github;
mod orchestrator;
mod report;

use ai::client::LocalClient;
use ai::prompt::TokenBudget;
use clap::Parser;
use cli::Cli;
use config::Config;
use error::{GitlogError, Result};
use orchestrator::Orchestrator;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::default()
    };
    let config = apply_cli_overrides(config, &cli);

    let date = match cli.resolved_date() {
        Ok(date) => date,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let token = match cli.github_token.clone().or_else(|| config.github_token.clone()) {
        Some(token) => token,
        None => {
            eprintln!("Error: {}", GitlogError::MissingToken);
            eprintln!("Pass --github-token or set the GITHUB_TOKEN environment variable.");
            std::process::exit(1);
        }
    };

    println!(
        "Aggregating pushed commits for {}...",
        date.format("%Y-%m-%d")
    );

    let orchestrator = Orchestrator::new(&config, token)?;
    let groups = orchestrator.collect_commits(date).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::print_summary(&mut out, &groups, date)?;

    if cli.ai_summary {
        writeln!(out, "\nAI Summaries:")?;

        let summarizer = LocalClient::new(
            config.inference_base.clone(),
            config.inference_model.clone(),
            config.max_output_tokens,
            TokenBudget::new(config.context_window_tokens, config.summary_budget_tokens),
        )?;

        orchestrator
            .run_ai_summaries(&groups, date, &summarizer, &mut out)
            .await?;
    }

    Ok(())
}

fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    if cli.no_cache {
        config.cache_enabled = false;
    }
    config
}

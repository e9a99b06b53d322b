use crate::error::{GitlogError, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitlog-summary")]
#[command(author, version)]
#[command(
    about = "Aggregate your pushed GitHub commits for a day, with optional AI summaries",
    long_about = "gitlog-summary aggregates all commits you authored across every GitHub \
                  repository visible to your token for a given calendar day, and can \
                  optionally summarize the commit diffs with a locally running LLM."
)]
pub struct Cli {
    /// Date for which to aggregate pushed commits (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// GitHub token for API access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Include an AI-generated summary of commit diffs
    #[arg(long)]
    pub ai_summary: bool,

    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable the commit listing cache
    #[arg(long)]
    pub no_cache: bool,
}

impl Cli {
    /// The date to aggregate: parsed from `--date` or today's local date
    pub fn resolved_date(&self) -> Result<NaiveDate> {
        match &self.date {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| GitlogError::InvalidDate(s.clone())),
            None => Ok(Local::now().date_naive()),
        }
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::compare;
use crate::config::Config;
use crate::discover;
use crate::github::{preflight_check, GhClient};

#[derive(Parser)]
#[command(
    name = "repotwin",
    about = "Compare repositories for code similarity and discover look-alike projects",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two repositories with the external similarity tool
    Compare {
        /// First repository URL
        url1: String,

        /// Second repository URL
        url2: String,
    },

    /// Find repositories similar to a reference repository
    Similar {
        /// Reference repository URL (e.g., https://github.com/owner/repo)
        url: String,

        /// Maximum number of candidates to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

pub fn compare(url1: &str, url2: &str) -> Result<()> {
    // Safe default: missing/invalid config falls back to defaults
    let config = Config::load().unwrap_or_default();

    println!("{}", "Comparing repositories...".green().bold());
    println!("  {} {}", "Left:".bold(), url1);
    println!("  {} {}", "Right:".bold(), url2);

    let comparison = compare::compare(url1, url2, config)?;

    println!(
        "  {} {} files across {} language group(s)",
        "✓".green(),
        comparison.files_compared,
        comparison.languages.len()
    );
    println!("\n{}", comparison.summary());
    println!("  {} {}", "Report:".bold(), comparison.result_url.cyan());

    Ok(())
}

pub fn similar(url: &str, limit: Option<usize>, json_output: bool) -> Result<()> {
    preflight_check()?;

    // Safe default: missing/invalid config falls back to defaults
    let mut config = Config::load().unwrap_or_default();
    if let Some(limit) = limit {
        config.max_results = limit;
    }

    if !json_output {
        println!("{}", "Searching for similar repositories...".green().bold());
    }

    let host = GhClient::new();
    let candidates = discover::discover(url, &host, &config)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    if candidates.is_empty() {
        println!("{} No similar repositories found", "!".yellow());
        return Ok(());
    }

    println!(
        "{} {} candidate(s):\n",
        "✓".green(),
        candidates.len()
    );

    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "{:>2}. {} {} {}",
            i + 1,
            candidate.full_name.white().bold(),
            format!("★ {}", candidate.stars).yellow(),
            format!("similarity {:.2}", candidate.score).cyan()
        );
        if let Some(ref description) = candidate.description {
            println!("    {}", description.dimmed());
        }
        println!("    {}", candidate.url.dimmed());
    }

    Ok(())
}

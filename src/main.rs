use anyhow::Result;
use clap::Parser as ClapParser;
use repotwin::cli::{self, Cli, Commands};

fn main() -> Result<()> {
    let cli_args = Cli::parse();

    match cli_args.command {
        Commands::Compare { url1, url2 } => {
            cli::compare(&url1, &url2)?;
        }
        Commands::Similar { url, limit, json } => {
            cli::similar(&url, limit, json)?;
        }
    }

    Ok(())
}

mod fetch;
mod orchestrator;
mod runner;
mod workspace;

pub use fetch::clone_into;
pub use orchestrator::{extract_result_url, Comparison, Orchestrator};
pub use runner::{merge_outputs, MossRunner, ToolInvocation};
pub use workspace::Workspace;

use crate::config::Config;
use crate::error::Result;

/// Compare two repositories with the given configuration.
pub fn compare(url1: &str, url2: &str, config: Config) -> Result<Comparison> {
    Orchestrator::new(config).compare(url1, url2)
}

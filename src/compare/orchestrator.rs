//! Comparison orchestrator - drives fetch, classify, and the tool runner.

use std::path::Path;

use super::fetch;
use super::runner::MossRunner;
use super::workspace::Workspace;
use crate::classify::{self, group_by_language, ClassifiedFile};
use crate::config::Config;
use crate::error::{Error, Result};

/// Outcome of a two-repository comparison.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub job_id: String,
    /// Validated result-locator URL extracted from the merged tool output.
    pub result_url: String,
    /// Number of files pooled across both repositories.
    pub files_compared: usize,
    /// Language tags that had at least one file.
    pub languages: Vec<String>,
}

impl Comparison {
    pub fn summary(&self) -> String {
        format!(
            "Comparison {} completed over {} files ({}). Result URL: {}",
            self.job_id,
            self.files_compared,
            self.languages.join(", "),
            self.result_url
        )
    }
}

pub struct Orchestrator {
    config: Config,
    runner: MossRunner,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        let runner = MossRunner::from_config(&config);
        Self { config, runner }
    }

    /// Compare two repositories end to end.
    ///
    /// Both workspaces are released on every exit path: they are owned by this
    /// stack frame and cleaned up on drop, whether a fetch fails, the merged
    /// output is invalid, or the comparison succeeds.
    pub fn compare(&self, url1: &str, url2: &str) -> Result<Comparison> {
        let job_id = generate_job_id();

        let ws1 = Workspace::acquire(&format!("{}-a", job_id))?;
        let ws2 = Workspace::acquire(&format!("{}-b", job_id))?;

        // The two fetch+classify legs are independent; pooling joins them.
        let (left, right) = rayon::join(
            || fetch_and_classify(url1, ws1.path()),
            || fetch_and_classify(url2, ws2.path()),
        );

        let mut files = left?;
        files.extend(right?);
        let files_compared = files.len();

        // Cross-repository comparison requires both sides' files to flow
        // through the same per-language invocation.
        let groups = group_by_language(files);
        let languages: Vec<String> = groups.keys().map(|k| k.to_string()).collect();

        let merged = self.runner.run(&groups, &job_id);
        let result_url = extract_result_url(&merged, &self.config.result_prefix)?;

        Ok(Comparison {
            job_id,
            result_url,
            files_compared,
            languages,
        })
    }
}

fn fetch_and_classify(url: &str, workspace: &Path) -> Result<Vec<ClassifiedFile>> {
    fetch::clone_into(url, workspace)?;
    Ok(classify::classify(workspace))
}

/// Extract the result locator from merged tool output: the last non-blank
/// line, which must start with the expected result-service prefix.
pub fn extract_result_url(output: &str, prefix: &str) -> Result<String> {
    output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| line.starts_with(prefix))
        .map(String::from)
        .ok_or_else(|| Error::InvalidResult {
            prefix: prefix.to_string(),
        })
}

pub(crate) fn generate_job_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let duration = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();

    let timestamp = duration.as_secs();
    let nanos = duration.subsec_nanos();

    // Use nanoseconds for uniqueness within the same second
    let random: u16 = ((nanos / 1000) % 65536) as u16;

    format!("rt-{:x}-{:04x}", timestamp, random)
}

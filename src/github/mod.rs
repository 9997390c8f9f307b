//! Code-host metadata provider, backed by the `gh` CLI.

use base64::Engine as _;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::process::Command;

use crate::error::{Error, Result};

/// Repository metadata as returned by the code host.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Keyword search restricted by language, star count, and page size.
/// Forks are always allowed.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keywords: String,
    pub language: String,
    pub min_stars: u32,
    pub per_page: u32,
}

/// Seam to the code-host API. Implemented by [`GhClient`] in production and
/// by in-memory fakes in tests.
pub trait RepoHost: Send + Sync {
    fn repo(&self, owner: &str, name: &str) -> Result<RepoInfo>;

    /// Language breakdown in bytes, keyed by language name.
    fn languages(&self, owner: &str, name: &str) -> Result<BTreeMap<String, u64>>;

    /// Decoded README text.
    fn readme(&self, owner: &str, name: &str) -> Result<String>;

    /// Search results sorted by stars descending.
    fn search(&self, query: &SearchQuery) -> Result<Vec<RepoInfo>>;
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepoInfo>,
}

#[derive(Deserialize)]
struct ReadmeResponse {
    content: String,
    #[serde(default)]
    encoding: String,
}

/// Metadata provider shelling out to the `gh` CLI.
#[derive(Debug, Default)]
pub struct GhClient;

impl GhClient {
    pub fn new() -> Self {
        Self
    }

    fn api(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new("gh")
            .arg("api")
            .args(args)
            .output()
            .map_err(|e| Error::Discovery(format!("failed to run gh: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let msg = stderr.trim().lines().next().unwrap_or("request failed");
            return Err(Error::Discovery(format!(
                "gh api {} failed: {}",
                args.first().unwrap_or(&""),
                msg
            )));
        }

        Ok(output.stdout)
    }
}

impl RepoHost for GhClient {
    fn repo(&self, owner: &str, name: &str) -> Result<RepoInfo> {
        let endpoint = format!("repos/{}/{}", owner, name);
        let bytes = self.api(&[endpoint.as_str()])?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::Discovery(format!("malformed repository metadata: {}", e)))
    }

    fn languages(&self, owner: &str, name: &str) -> Result<BTreeMap<String, u64>> {
        let endpoint = format!("repos/{}/{}/languages", owner, name);
        let bytes = self.api(&[endpoint.as_str()])?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::Discovery(format!("malformed language breakdown: {}", e)))
    }

    fn readme(&self, owner: &str, name: &str) -> Result<String> {
        let repo = format!("{}/{}", owner, name);
        let endpoint = format!("repos/{}/readme", repo);
        let bytes = self
            .api(&[endpoint.as_str()])
            .map_err(|e| Error::CandidateFetch {
                repo: repo.clone(),
                reason: e.to_string(),
            })?;

        let response: ReadmeResponse =
            serde_json::from_slice(&bytes).map_err(|e| Error::CandidateFetch {
                repo: repo.clone(),
                reason: format!("malformed README response: {}", e),
            })?;

        decode_readme(&response.content, &response.encoding).map_err(|reason| {
            Error::CandidateFetch {
                repo,
                reason,
            }
        })
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<RepoInfo>> {
        let q = format!("q={}", build_search_q(query));
        let per_page = format!("per_page={}", query.per_page);
        let bytes = self.api(&[
            "-X",
            "GET",
            "search/repositories",
            "-f",
            q.as_str(),
            "-f",
            "sort=stars",
            "-f",
            "order=desc",
            "-F",
            per_page.as_str(),
        ])?;

        let response: SearchResponse = serde_json::from_slice(&bytes)
            .map_err(|e| Error::Discovery(format!("malformed search response: {}", e)))?;
        Ok(response.items)
    }
}

/// Build the qualified search string for the code host's repository search.
fn build_search_q(query: &SearchQuery) -> String {
    format!(
        "{} language:{} stars:>={} fork:true",
        query.keywords, query.language, query.min_stars
    )
}

/// Decode README content from the provider's transfer encoding. The host
/// returns base64 with embedded newlines.
fn decode_readme(content: &str, encoding: &str) -> std::result::Result<String, String> {
    if encoding != "base64" {
        return Ok(content.to_string());
    }

    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| format!("invalid base64 content: {}", e))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Verify the `gh` CLI is installed and authenticated.
pub fn preflight_check() -> anyhow::Result<()> {
    let version = Command::new("gh").arg("--version").output();
    if version.map(|o| !o.status.success()).unwrap_or(true) {
        anyhow::bail!("gh CLI not found. Install it from https://cli.github.com");
    }

    let auth = Command::new("gh").args(["auth", "status"]).output();
    if auth.map(|o| !o.status.success()).unwrap_or(true) {
        anyhow::bail!("gh CLI is not authenticated. Run 'gh auth login' first");
    }

    Ok(())
}

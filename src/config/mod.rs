use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Command used to run the similarity tool (e.g. "perl")
    #[serde(default = "default_moss_command")]
    pub moss_command: String,

    /// Similarity tool script passed as the command's first argument
    #[serde(default = "default_moss_script")]
    pub moss_script: String,

    /// Required prefix of a valid result-locator URL in tool output
    #[serde(default = "default_result_prefix")]
    pub result_prefix: String,

    /// Minimum star count for discovery search results
    #[serde(default = "default_min_stars")]
    pub min_stars: u32,

    /// Search page size (the code host caps this at 100)
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,

    /// Maximum number of candidates returned by discovery
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Keyword tokens must be strictly longer than this to enter the query
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            moss_command: default_moss_command(),
            moss_script: default_moss_script(),
            result_prefix: default_result_prefix(),
            min_stars: default_min_stars(),
            search_page_size: default_search_page_size(),
            max_results: default_max_results(),
            min_keyword_len: default_min_keyword_len(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("."))
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(".repotwinrc.json");
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Page size clamped to the code host's hard maximum.
    pub fn page_size(&self) -> u32 {
        self.search_page_size.min(100)
    }
}

fn default_moss_command() -> String {
    "perl".to_string()
}

fn default_moss_script() -> String {
    "moss.pl".to_string()
}

fn default_result_prefix() -> String {
    "http://moss.stanford.edu/results/".to_string()
}

fn default_min_stars() -> u32 {
    10
}

fn default_search_page_size() -> u32 {
    100
}

fn default_max_results() -> usize {
    10
}

fn default_min_keyword_len() -> usize {
    3
}

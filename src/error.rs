//! Error taxonomy for the comparison and discovery pipelines.
//!
//! Fatal errors (`Workspace`, `Fetch`, `InvalidResult`, `Discovery`) abort the
//! enclosing job after workspace cleanup. Per-unit errors (`Tool`,
//! `CandidateFetch`) are logged by the caller and the unit is dropped from the
//! aggregate result.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Workspace directory could not be created.
    #[error("failed to create workspace {dir}: {source}")]
    Workspace {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Clone of a repository failed. Fatal to the comparison job.
    #[error("failed to clone {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A single language group's tool invocation failed. Recoverable: the
    /// group is dropped from the merged output.
    #[error("similarity tool failed for language '{language}': {reason}")]
    Tool { language: String, reason: String },

    /// Merged tool output contained no valid result locator.
    #[error("no result URL found in tool output (expected a line starting with {prefix})")]
    InvalidResult { prefix: String },

    /// Metadata or search request failed. Fatal to discovery.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// A single candidate's README fetch failed. Recoverable: the candidate
    /// is omitted from the ranking.
    #[error("failed to fetch README for {repo}: {reason}")]
    CandidateFetch { repo: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

//! repotwin - compare repositories for code similarity and discover
//! look-alike projects.
//!
//! The `compare` module clones two repositories into throwaway workspaces,
//! pools their files by similarity-tool language tag, runs the external tool
//! once per group, and extracts the result locator from the merged output.
//! The `discover` module finds repositories similar to a reference repo by
//! combining code-host metadata search with README text similarity.

pub mod classify;
pub mod cli;
pub mod compare;
pub mod config;
pub mod discover;
pub mod error;
pub mod github;

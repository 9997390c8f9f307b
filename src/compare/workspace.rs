//! Workspace management for isolated comparison jobs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// An exclusively-owned temporary directory holding one fetched repository.
///
/// The directory is removed recursively when the workspace is dropped, so
/// cleanup runs on every exit path of the owning job, including early returns
/// and unwinding. Removal failures are logged, never propagated: they must not
/// mask the job's primary outcome.
pub struct Workspace {
    root: PathBuf,
    cleanup_on_drop: bool,
}

impl Workspace {
    /// Create a workspace directory under the system temp dir.
    pub fn acquire(label: &str) -> Result<Self> {
        let root = std::env::temp_dir().join(format!("repotwin-{}", label));
        fs::create_dir_all(&root).map_err(|source| Error::Workspace {
            dir: root.clone(),
            source,
        })?;

        Ok(Self {
            root,
            cleanup_on_drop: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Disable cleanup on drop (for debugging)
    #[allow(dead_code)]
    pub fn keep_on_drop(&mut self) {
        self.cleanup_on_drop = false;
    }

    /// Remove the workspace directory now.
    pub fn cleanup(&self) {
        if let Err(e) = fs::remove_dir_all(&self.root) {
            eprintln!(
                "Warning: failed to clean up workspace {}: {}",
                self.root.display(),
                e
            );
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.cleanup_on_drop {
            self.cleanup();
        }
    }
}

//! Shallow git clone of a remote repository into a workspace directory.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Clone `url` into `dest`. Any non-zero exit is a fetch failure; there is no
/// retry, a failed fetch aborts the enclosing comparison.
pub fn clone_into(url: &str, dest: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--single-branch"])
        .arg(url)
        .arg(dest)
        .output()
        .map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: format!("failed to run git: {}", e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Fetch {
            url: url.to_string(),
            reason: stderr.trim().to_string(),
        });
    }

    Ok(())
}

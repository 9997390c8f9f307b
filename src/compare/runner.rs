//! Similarity tool runner: one invocation per language group, in parallel.

use colored::Colorize;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

use crate::config::Config;
use crate::error::{Error, Result};

/// Outcome of one language group's tool invocation.
pub struct ToolInvocation {
    pub language: String,
    pub result: Result<String>,
}

/// Invokes the external similarity tool (MOSS) once per language group.
pub struct MossRunner {
    command: String,
    script: String,
}

impl MossRunner {
    pub fn new(command: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            script: script.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.moss_command, &config.moss_script)
    }

    /// Run the tool over every non-empty group concurrently and merge the
    /// successful outputs. A failed group is logged and dropped; it never
    /// aborts the other groups or the job.
    pub fn run(&self, groups: &BTreeMap<&'static str, Vec<PathBuf>>, label: &str) -> String {
        let invocations: Vec<ToolInvocation> = groups
            .par_iter()
            .filter(|(_, files)| !files.is_empty())
            .map(|(language, files)| ToolInvocation {
                language: language.to_string(),
                result: self.run_group(language, label, files),
            })
            .collect();

        merge_outputs(invocations)
    }

    fn run_group(&self, language: &str, label: &str, files: &[PathBuf]) -> Result<String> {
        let mut cmd = Command::new(&self.command);
        cmd.arg(&self.script).args(["-l", language, "-c", label]);
        for file in files {
            cmd.arg(file);
        }

        let output = cmd.output().map_err(|e| Error::Tool {
            language: language.to_string(),
            reason: format!("failed to run {}: {}", self.command, e),
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(Error::Tool {
                language: language.to_string(),
                reason: format!(
                    "exit code {:?}: {}",
                    output.status.code(),
                    stderr.trim()
                ),
            });
        }

        // The tool reports its own errors on stderr even with exit code 0.
        if !stderr.trim().is_empty() {
            return Err(Error::Tool {
                language: language.to_string(),
                reason: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Newline-join the successful invocations' output in group order. Failures
/// are logged to stderr and excluded from the merge.
pub fn merge_outputs(invocations: Vec<ToolInvocation>) -> String {
    let mut merged = Vec::new();

    for invocation in invocations {
        match invocation.result {
            Ok(output) => {
                let trimmed = output.trim_end();
                if !trimmed.is_empty() {
                    merged.push(trimmed.to_string());
                }
            }
            Err(e) => {
                eprintln!("{} {}", "Warning:".yellow(), e);
            }
        }
    }

    merged.join("\n")
}

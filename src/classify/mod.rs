//! File classification: walk a fetched repository, keep textual source files,
//! and assign each one the similarity-tool language tag for its extension.

use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Tag assigned to textual files whose extension has no dedicated language.
pub const FALLBACK_LANGUAGE: &str = "ascii";

/// A regular file that participates in a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFile {
    pub path: PathBuf,
    /// Language tag understood by the similarity tool's `-l` flag.
    pub language: &'static str,
}

/// Extensions considered textual. Anything else is dropped silently.
const TEXT_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "java", "c", "h", "cpp", "cc", "cxx", "hpp",
    "hh", "cs", "rb", "go", "rs", "pl", "pm", "php", "swift", "kt", "scala", "hs", "ml", "vb",
    "sql", "html", "css", "txt", "md",
];

/// Extension to similarity-tool language tag. Textual extensions missing here
/// fall back to [`FALLBACK_LANGUAGE`].
fn language_for(extension: &str) -> Option<&'static str> {
    let tag = match extension {
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => "javascript",
        "py" => "python",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => "cc",
        "cs" => "csharp",
        "pl" | "pm" => "perl",
        "hs" => "haskell",
        "ml" => "ml",
        "vb" => "vb",
        _ => return None,
    };
    Some(tag)
}

fn is_textual(extension: &str) -> bool {
    TEXT_EXTENSIONS.contains(&extension)
}

/// Classify every textual file under `root`.
///
/// Hidden entries and `node_modules` directories are pruned at traversal time,
/// so their subtrees are never descended into. Unreadable entries are skipped.
/// Output order follows directory traversal and is not guaranteed stable
/// across filesystems; callers must not rely on it.
pub fn classify(root: &Path) -> Vec<ClassifiedFile> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(true)
        .filter_entry(|entry| entry.file_name() != "node_modules")
        .build();

    walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|entry| {
            let ext = entry.path().extension()?.to_str()?.to_lowercase();
            if !is_textual(&ext) {
                return None;
            }
            Some(ClassifiedFile {
                path: entry.path().to_path_buf(),
                language: language_for(&ext).unwrap_or(FALLBACK_LANGUAGE),
            })
        })
        .collect()
}

/// Pool a comparison's combined file set into per-language groups.
///
/// The `BTreeMap` keeps group processing in tag order, which makes the merged
/// tool output deterministic for a given input.
pub fn group_by_language(files: Vec<ClassifiedFile>) -> BTreeMap<&'static str, Vec<PathBuf>> {
    let mut groups: BTreeMap<&'static str, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        groups.entry(file.language).or_default().push(file.path);
    }
    groups
}

//! Similar-repository discovery: keyword search plus README similarity.

use colored::Colorize;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::{RepoHost, RepoInfo, SearchQuery};

/// A repository plausibly similar to the reference, with its computed
/// documentation-similarity score.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Candidate {
    pub name: String,
    pub full_name: String,
    pub url: String,
    pub description: Option<String>,
    pub stars: u64,
    pub language: Option<String>,
    pub topics: Vec<String>,
    /// Normalized README similarity against the reference, in [0, 1].
    pub score: f64,
}

/// Discover repositories similar to the one at `url`, ranked by
/// `(score desc, stars desc)` and truncated to `config.max_results`.
pub fn discover(url: &str, host: &dyn RepoHost, config: &Config) -> Result<Vec<Candidate>> {
    let (owner, name) = parse_owner_repo(url)?;

    let reference = host.repo(&owner, &name)?;
    let breakdown = host.languages(&owner, &name)?;
    let primary_language = primary_language(&breakdown).ok_or_else(|| {
        Error::Discovery(format!("{}/{} has no language data", owner, name))
    })?;

    let keywords = keyword_query(
        &reference.name,
        reference.description.as_deref(),
        &reference.topics,
        config.min_keyword_len,
    );

    let results = host.search(&SearchQuery {
        keywords,
        language: primary_language,
        min_stars: config.min_stars,
        per_page: config.page_size(),
    })?;

    let reference_readme = host
        .readme(&owner, &name)
        .map_err(|e| Error::Discovery(format!("reference README unavailable: {}", e)))?;

    // Per-candidate README fetch and scoring is independent; a failed fetch
    // drops that candidate, never the batch.
    let mut candidates: Vec<Candidate> = results
        .par_iter()
        .filter(|repo| !repo.full_name.eq_ignore_ascii_case(&reference.full_name))
        .filter_map(|repo| {
            let (c_owner, c_name) = repo.full_name.split_once('/')?;
            match host.readme(c_owner, c_name) {
                Ok(doc) => Some(score_candidate(repo, &reference_readme, &doc)),
                Err(e) => {
                    eprintln!("{} {}", "Warning:".yellow(), e);
                    None
                }
            }
        })
        .collect();

    rank(&mut candidates);
    candidates.truncate(config.max_results);
    Ok(candidates)
}

fn score_candidate(repo: &RepoInfo, reference_readme: &str, candidate_readme: &str) -> Candidate {
    Candidate {
        name: repo.name.clone(),
        full_name: repo.full_name.clone(),
        url: repo.html_url.clone(),
        description: repo.description.clone(),
        stars: repo.stargazers_count,
        language: repo.language.clone(),
        topics: repo.topics.clone(),
        score: strsim::sorensen_dice(reference_readme, candidate_readme),
    }
}

/// Sort by similarity score descending, breaking ties by stars descending.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.stars.cmp(&a.stars))
    });
}

/// Take owner and repository name from the URL's final two path segments.
pub fn parse_owner_repo(url: &str) -> Result<(String, String)> {
    let mut segments = url
        .trim_end_matches('/')
        .rsplit('/')
        .filter(|s| !s.is_empty());

    let name = segments.next().map(|s| s.trim_end_matches(".git"));
    let owner = segments.next();

    match (owner, name) {
        (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(Error::Discovery(format!(
            "cannot parse owner/repo from URL: {}",
            url
        ))),
    }
}

/// Highest-byte-count language in the breakdown.
fn primary_language(breakdown: &BTreeMap<String, u64>) -> Option<String> {
    breakdown
        .iter()
        .max_by_key(|(_, bytes)| **bytes)
        .map(|(language, _)| language.clone())
}

/// Build the keyword query: repository name split on hyphens, description
/// split on whitespace, plus topics; tokens longer than `min_len`, lowercased,
/// de-duplicated in first-seen order.
fn keyword_query(
    name: &str,
    description: Option<&str>,
    topics: &[String],
    min_len: usize,
) -> String {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    let tokens = name
        .split('-')
        .chain(description.unwrap_or_default().split_whitespace())
        .chain(topics.iter().map(String::as_str));

    for token in tokens {
        if token.len() <= min_len {
            continue;
        }
        let lowered = token.to_lowercase();
        if seen.insert(lowered.clone()) {
            keywords.push(lowered);
        }
    }

    keywords.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(full_name: &str, stars: u64, score: f64) -> Candidate {
        Candidate {
            name: full_name.split('/').next_back().unwrap().to_string(),
            full_name: full_name.to_string(),
            url: format!("https://github.com/{}", full_name),
            description: None,
            stars,
            language: None,
            topics: vec![],
            score,
        }
    }

    #[test]
    fn parses_plain_url() {
        let (owner, name) = parse_owner_repo("https://github.com/octo/widget").unwrap();
        assert_eq!(owner, "octo");
        assert_eq!(name, "widget");
    }

    #[test]
    fn parses_url_with_trailing_slash_and_git_suffix() {
        let (owner, name) = parse_owner_repo("https://github.com/octo/widget.git/").unwrap();
        assert_eq!(owner, "octo");
        assert_eq!(name, "widget");
    }

    #[test]
    fn rejects_url_without_two_segments() {
        assert!(parse_owner_repo("widget").is_err());
        assert!(parse_owner_repo("").is_err());
    }

    #[test]
    fn primary_language_is_highest_byte_count() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert("Python".to_string(), 120_000u64);
        breakdown.insert("JavaScript".to_string(), 4_000u64);
        breakdown.insert("Shell".to_string(), 900u64);
        assert_eq!(primary_language(&breakdown).unwrap(), "Python");
    }

    #[test]
    fn primary_language_empty_breakdown_is_none() {
        assert!(primary_language(&BTreeMap::new()).is_none());
    }

    #[test]
    fn keyword_query_filters_lowercases_and_dedupes() {
        let topics = vec!["CLI".to_string(), "parser".to_string()];
        let query = keyword_query(
            "Fancy-Parser-kit",
            Some("A fast Parser for the CLI age"),
            &topics,
            3,
        );
        // "kit", "A", "for", "the", "age", "CLI" are filtered (len <= 3);
        // "parser" appears once despite three sources.
        assert_eq!(query, "fancy parser fast");
    }

    #[test]
    fn keyword_query_empty_inputs() {
        assert_eq!(keyword_query("ab", None, &[], 3), "");
    }

    #[test]
    fn rank_breaks_score_ties_by_stars() {
        let mut candidates = vec![
            candidate("a/fifty", 50, 0.9),
            candidate("b/eighty", 80, 0.9),
        ];
        rank(&mut candidates);
        assert_eq!(candidates[0].full_name, "b/eighty");
        assert_eq!(candidates[1].full_name, "a/fifty");
    }

    #[test]
    fn rank_prefers_similarity_over_stars() {
        let mut candidates = vec![
            candidate("a/popular", 1000, 0.80),
            candidate("b/close", 10, 0.95),
        ];
        rank(&mut candidates);
        assert_eq!(candidates[0].full_name, "b/close");
        assert_eq!(candidates[1].full_name, "a/popular");
    }
}

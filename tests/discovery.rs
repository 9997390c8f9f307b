//! End-to-end discovery tests against an in-memory code host.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use repotwin::config::Config;
use repotwin::discover::discover;
use repotwin::error::{Error, Result};
use repotwin::github::{RepoHost, RepoInfo, SearchQuery};

const REFERENCE_README: &str = "A command line argument parser for python projects. \
Supports subcommands, flags, and generated help text.";

const UNRELATED_README: &str = "Сборка прошивки для тостера. \
Настройка циклов выпечки, разогрева и разморозки.";

fn repo(full_name: &str, stars: u64, description: &str) -> RepoInfo {
    RepoInfo {
        name: full_name.split('/').next_back().unwrap().to_string(),
        full_name: full_name.to_string(),
        html_url: format!("https://github.com/{}", full_name),
        description: Some(description.to_string()),
        stargazers_count: stars,
        language: Some("Python".to_string()),
        topics: vec!["cli".to_string(), "parser".to_string()],
    }
}

/// In-memory code host. Readme fetches for repos absent from `readmes` fail.
struct FakeHost {
    reference: RepoInfo,
    languages: BTreeMap<String, u64>,
    search_results: Vec<RepoInfo>,
    readmes: HashMap<String, String>,
    last_query: Mutex<Option<SearchQuery>>,
}

impl FakeHost {
    fn new(reference: RepoInfo, search_results: Vec<RepoInfo>) -> Self {
        let mut languages = BTreeMap::new();
        languages.insert("Python".to_string(), 90_000u64);
        languages.insert("Shell".to_string(), 1_200u64);

        let mut readmes = HashMap::new();
        readmes.insert(reference.full_name.clone(), REFERENCE_README.to_string());

        Self {
            reference,
            languages,
            search_results,
            readmes,
            last_query: Mutex::new(None),
        }
    }

    fn with_readme(mut self, full_name: &str, readme: &str) -> Self {
        self.readmes.insert(full_name.to_string(), readme.to_string());
        self
    }
}

impl RepoHost for FakeHost {
    fn repo(&self, owner: &str, name: &str) -> Result<RepoInfo> {
        let full_name = format!("{}/{}", owner, name);
        if full_name == self.reference.full_name {
            Ok(self.reference.clone())
        } else {
            Err(Error::Discovery(format!("unknown repo {}", full_name)))
        }
    }

    fn languages(&self, _owner: &str, _name: &str) -> Result<BTreeMap<String, u64>> {
        Ok(self.languages.clone())
    }

    fn readme(&self, owner: &str, name: &str) -> Result<String> {
        let full_name = format!("{}/{}", owner, name);
        self.readmes
            .get(&full_name)
            .cloned()
            .ok_or_else(|| Error::CandidateFetch {
                repo: full_name,
                reason: "404".to_string(),
            })
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<RepoInfo>> {
        *self.last_query.lock().unwrap() = Some(query.clone());
        Ok(self.search_results.clone())
    }
}

#[test]
fn ranks_identical_readme_first_and_unrelated_last() {
    let reference = repo("octo/arg-parser", 500, "A CLI argument parser");
    let twin = repo("alice/argkit", 120, "Another argument parser");
    let stranger = repo("bob/toaster", 4_000, "Toaster firmware");

    let host = FakeHost::new(reference, vec![twin, stranger])
        .with_readme("alice/argkit", REFERENCE_README)
        .with_readme("bob/toaster", UNRELATED_README);

    let candidates = discover(
        "https://github.com/octo/arg-parser",
        &host,
        &Config::default(),
    )
    .unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].full_name, "alice/argkit");
    assert!(candidates[0].score > 0.9, "score was {}", candidates[0].score);
    assert_eq!(candidates[1].full_name, "bob/toaster");
    assert!(candidates[1].score < 0.3, "score was {}", candidates[1].score);
}

#[test]
fn excludes_the_reference_repository_itself() {
    let reference = repo("octo/arg-parser", 500, "A CLI argument parser");
    let self_hit = repo("octo/arg-parser", 500, "A CLI argument parser");
    let other = repo("alice/argkit", 120, "Another argument parser");

    let host = FakeHost::new(reference, vec![self_hit, other])
        .with_readme("alice/argkit", REFERENCE_README);

    let candidates = discover(
        "https://github.com/octo/arg-parser",
        &host,
        &Config::default(),
    )
    .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].full_name, "alice/argkit");
}

#[test]
fn candidate_readme_failure_degrades_by_omission() {
    let reference = repo("octo/arg-parser", 500, "A CLI argument parser");
    let readable = repo("alice/argkit", 120, "Another argument parser");
    // No README registered for this one: fetch fails, candidate is dropped.
    let unreadable = repo("carol/ghost", 900, "Mystery repo");

    let host = FakeHost::new(reference, vec![readable, unreadable])
        .with_readme("alice/argkit", REFERENCE_README);

    let candidates = discover(
        "https://github.com/octo/arg-parser",
        &host,
        &Config::default(),
    )
    .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].full_name, "alice/argkit");
}

#[test]
fn truncates_to_configured_maximum() {
    let reference = repo("octo/arg-parser", 500, "A CLI argument parser");
    let mut results = Vec::new();
    let mut host = FakeHost::new(reference.clone(), vec![]);
    for i in 0..15 {
        let full_name = format!("user{}/repo{}", i, i);
        results.push(repo(&full_name, 10 + i as u64, "An argument parser"));
        host = host.with_readme(&full_name, REFERENCE_README);
    }
    host.search_results = results;

    let candidates = discover(
        "https://github.com/octo/arg-parser",
        &host,
        &Config::default(),
    )
    .unwrap();

    assert_eq!(candidates.len(), 10);
    // Scores are all equal, so stars break ties: highest-star candidates kept.
    assert!(candidates.iter().all(|c| c.stars >= 15));
}

#[test]
fn search_is_restricted_to_primary_language_and_star_floor() {
    let reference = repo("octo/arg-parser", 500, "A robust argument parser");
    let host = FakeHost::new(reference, vec![]);

    discover(
        "https://github.com/octo/arg-parser",
        &host,
        &Config::default(),
    )
    .unwrap();

    let query = host.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.language, "Python");
    assert_eq!(query.min_stars, 10);
    assert_eq!(query.per_page, 100);
    assert!(query.keywords.contains("parser"));
    assert!(query.keywords.contains("robust"));
    // Tokens of length <= 3 never reach the query.
    assert!(!query.keywords.split(' ').any(|t| t.len() <= 3));
}

#[test]
fn malformed_reference_url_is_discovery_error() {
    let reference = repo("octo/arg-parser", 500, "A CLI argument parser");
    let host = FakeHost::new(reference, vec![]);

    let err = discover("not-a-url", &host, &Config::default()).unwrap_err();
    assert!(matches!(err, Error::Discovery(_)));
}

//! Seeding the frontier
//!
//! Seeds come from `[[seed]]` entries in the configuration or from a flat
//! file with one URL per line, optionally followed by a priority:
//!
//! ```text
//! # furniture
//! https://example.com/models/ 0
//! https://example.com/archive/chairs.zip
//! ```

use crate::config::Config;
use crate::storage::{EnqueueOutcome, Frontier};
use crate::url::{normalize_url, priority_for};
use crate::{ConfigError, ConfigResult};
use std::fs;
use std::path::Path;

/// A URL to start crawling from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub url: String,
    /// Explicit priority; `None` uses the suffix rule
    pub priority: Option<i64>,
}

impl Seed {
    pub fn new(url: impl Into<String>, priority: Option<i64>) -> Self {
        Self {
            url: url.into(),
            priority,
        }
    }
}

/// Collects the `[[seed]]` entries of a configuration
pub fn seeds_from_config(config: &Config) -> Vec<Seed> {
    config
        .seeds
        .iter()
        .map(|entry| Seed::new(entry.url.clone(), entry.priority))
        .collect()
}

/// Reads a seed file
pub fn load_seed_file(path: &Path) -> ConfigResult<Vec<Seed>> {
    let content = fs::read_to_string(path)?;
    parse_seed_list(&content)
}

/// Parses seed file content
///
/// Blank lines and lines starting with `#` are skipped. A second
/// whitespace-separated field must be an integer priority.
pub fn parse_seed_list(content: &str) -> ConfigResult<Vec<Seed>> {
    let mut seeds = Vec::new();

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(url) = fields.next() else {
            continue;
        };

        let priority = match fields.next() {
            Some(value) => Some(value.parse::<i64>().map_err(|_| {
                ConfigError::Validation(format!(
                    "seed line {}: priority {:?} is not an integer",
                    number + 1,
                    value
                ))
            })?),
            None => None,
        };

        if fields.next().is_some() {
            return Err(ConfigError::Validation(format!(
                "seed line {}: expected `url [priority]`",
                number + 1
            )));
        }

        seeds.push(Seed::new(url, priority));
    }

    Ok(seeds)
}

/// Normalizes seeds and feeds them to the frontier
///
/// Invalid URLs are logged and skipped. Returns how many seeds were new;
/// known URLs are bumped like any other rediscovery.
pub fn seed_frontier(frontier: &Frontier, seeds: &[Seed]) -> crate::Result<usize> {
    let mut inserted = 0;

    for seed in seeds {
        let url = match normalize_url(&seed.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping seed {}: {}", seed.url, e);
                continue;
            }
        };

        let priority = seed.priority.unwrap_or_else(|| priority_for(&url));
        if frontier.enqueue_or_bump(url.as_str(), priority)? == EnqueueOutcome::Inserted {
            inserted += 1;
        }
    }

    tracing::info!("Seeded {} new URLs ({} given)", inserted, seeds.len());
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use std::io::Write;

    fn frontier() -> Frontier {
        Frontier::new(SqliteStorage::new_in_memory().unwrap())
    }

    #[test]
    fn test_parse_seed_list() {
        let content = "\
# comment
https://example.com/models/ 0

  https://example.com/chairs.zip
";
        let seeds = parse_seed_list(content).unwrap();
        assert_eq!(
            seeds,
            vec![
                Seed::new("https://example.com/models/", Some(0)),
                Seed::new("https://example.com/chairs.zip", None),
            ]
        );
    }

    #[test]
    fn test_parse_seed_list_bad_priority() {
        let result = parse_seed_list("https://example.com/ high");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_parse_seed_list_extra_fields() {
        let result = parse_seed_list("https://example.com/ 1 2");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "https://example.com/ 3").unwrap();
        let seeds = load_seed_file(file.path()).unwrap();
        assert_eq!(seeds, vec![Seed::new("https://example.com/", Some(3))]);
    }

    #[test]
    fn test_load_missing_seed_file() {
        let result = load_seed_file(Path::new("/nonexistent/seeds.txt"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_seed_frontier_priorities() {
        let frontier = frontier();
        let seeds = vec![
            Seed::new("https://example.com/page", None),
            Seed::new("https://example.com/chair.zip", None),
            Seed::new("https://example.com/start", Some(0)),
        ];

        assert_eq!(seed_frontier(&frontier, &seeds).unwrap(), 3);

        let priority = |url: &str| frontier.get_record(url).unwrap().unwrap().priority;
        assert_eq!(priority("https://example.com/page"), 2);
        assert_eq!(priority("https://example.com/chair.zip"), 1);
        assert_eq!(priority("https://example.com/start"), 0);
        assert_eq!(
            frontier.pop_next().unwrap().as_deref(),
            Some("https://example.com/start")
        );
    }

    #[test]
    fn test_seed_frontier_skips_invalid_and_normalizes() {
        let frontier = frontier();
        let seeds = vec![
            Seed::new("not a url", None),
            Seed::new("ftp://example.com/", None),
            Seed::new("https://example.com/page#top", None),
            Seed::new("https://example.com/page", None),
        ];

        assert_eq!(seed_frontier(&frontier, &seeds).unwrap(), 1);
        let record = frontier
            .get_record("https://example.com/page")
            .unwrap()
            .unwrap();
        assert_eq!(record.links_to, 2);
    }
}

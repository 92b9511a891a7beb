//! Submission discovery - finding mission files in a directory

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// Naming conventions for submission files
pub const DEFAULT_PATTERNS: &[&str] = &[
    "mission_*.json",
    "missione_*.json",
    "task_*.json",
    "round*_mission_*.json",
    "round*_task_*.json",
    "*_mission_*.json",
    "*_task_*.json",
];

/// Match `name` against a pattern where `*` stands for any run of characters
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or("");
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    let middle: Vec<&str> = parts.collect();
    let Some((last, inner)) = middle.split_last() else {
        // No wildcard: the whole name must equal the pattern
        return rest.is_empty();
    };

    for part in inner {
        match rest.find(part) {
            Some(at) => rest = &rest[at + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

/// Files directly under `dir` whose names match `pattern`, or any of the
/// default patterns when none is given. Sorted, without duplicates.
pub fn find_mission_files(dir: &Path, pattern: Option<&str>) -> io::Result<Vec<PathBuf>> {
    let patterns: Vec<&str> = match pattern {
        Some(p) => vec![p],
        None => DEFAULT_PATTERNS.to_vec(),
    };

    let mut found = BTreeSet::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if patterns.iter().any(|p| wildcard_match(p, name)) {
            found.insert(path);
        }
    }

    tracing::debug!("Found {} submission files in {}", found.len(), dir.display());
    Ok(found.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("mission_*.json", "mission_1.json"));
        assert!(wildcard_match("round*_task_*.json", "round2_task_10.json"));
        assert!(wildcard_match("*_mission_*.json", "team_mission_3.json"));
        assert!(!wildcard_match("mission_*.json", "mission_1.txt"));
        assert!(!wildcard_match("task_*.json", "my_task_1.json"));
        assert!(wildcard_match("exact.json", "exact.json"));
        assert!(!wildcard_match("exact.json", "exact.json.bak"));
    }

    #[test]
    fn test_wildcard_overlapping_ends() {
        // Prefix and suffix may not share characters
        assert!(!wildcard_match("ab*ba", "aba"));
        assert!(wildcard_match("ab*ba", "abba"));
    }

    #[test]
    fn test_find_default_patterns() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["mission_2.json", "round1_mission_1.json", "notes.json", "task_3.txt"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        std::fs::create_dir(dir.path().join("mission_9.json")).unwrap();

        let found = find_mission_files(dir.path(), None).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["mission_2.json", "round1_mission_1.json"]);
    }

    #[test]
    fn test_find_custom_pattern() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mission_1.json"), "{}").unwrap();
        std::fs::write(dir.path().join("agent_7.json"), "{}").unwrap();

        let found = find_mission_files(dir.path(), Some("agent_*.json")).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("agent_7.json"));
    }

    #[test]
    fn test_find_missing_directory() {
        assert!(find_mission_files(Path::new("/nonexistent/galaxy"), None).is_err());
    }
}

//! Task-id resolution from values and file names

use std::path::Path;

use serde_json::Value;

/// A file-name shape carrying the task number
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilenamePattern {
    /// `<prefix><n>`, e.g. `mission_7`
    Prefix(&'static str),
    /// `round<d><infix><n>`, e.g. `round2_mission_7`
    Round(&'static str),
    /// `<n><suffix>`, e.g. `7_mission`
    Suffix(&'static str),
    /// `<n>.json` at the end of the name
    JsonStem,
}

/// Matchers tried in order against the lower-cased file name
pub const FILENAME_PATTERNS: &[FilenamePattern] = &[
    FilenamePattern::Prefix("mission_"),
    FilenamePattern::Prefix("missione_"),
    FilenamePattern::Prefix("task_"),
    FilenamePattern::Round("_mission_"),
    FilenamePattern::Round("_task_"),
    FilenamePattern::Suffix("_mission"),
    FilenamePattern::Suffix("_task"),
    FilenamePattern::JsonStem,
];

impl FilenamePattern {
    /// First numeric capture of this pattern in `name`
    pub fn capture(&self, name: &str) -> Option<u32> {
        match *self {
            FilenamePattern::Prefix(prefix) => occurrences(name, prefix)
                .find_map(|at| leading_digits(&name[at + prefix.len()..])),
            FilenamePattern::Round(infix) => occurrences(name, "round").find_map(|at| {
                let rest = &name[at + "round".len()..];
                let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                if digits == 0 {
                    return None;
                }
                rest[digits..]
                    .strip_prefix(infix)
                    .and_then(leading_digits)
            }),
            FilenamePattern::Suffix(suffix) => {
                occurrences(name, suffix).find_map(|at| trailing_digits(&name[..at]))
            }
            FilenamePattern::JsonStem => name.strip_suffix(".json").and_then(trailing_digits),
        }
    }
}

/// Task id from a file name, trying every pattern in order
pub fn task_id_from_filename(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    FILENAME_PATTERNS.iter().find_map(|p| p.capture(&name))
}

/// Interpret a document value as a task id: a positive integer, an integral
/// float, or a string holding one. `None` means the value is unusable.
pub fn parse_task_id(value: &Value) -> Option<u32> {
    let id = match value {
        Value::Number(n) => match n.as_u64() {
            Some(id) => id,
            None => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f < 0.0 {
                    return None;
                }
                f as u64
            }
        },
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(id).ok().filter(|&id| id > 0)
}

fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack.match_indices(needle).map(|(at, _)| at)
}

fn leading_digits(s: &str) -> Option<u32> {
    let end = s.bytes().take_while(u8::is_ascii_digit).count();
    s[..end].parse().ok()
}

fn trailing_digits(s: &str) -> Option<u32> {
    let start = s.len() - s.bytes().rev().take_while(u8::is_ascii_digit).count();
    s[start..].parse().ok()
}

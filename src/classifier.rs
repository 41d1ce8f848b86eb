//! Folder-name classification into output groups.
//!
//! Classification is an ordered list of named matcher rules. Each rule is a
//! pure function from a folder name to an optional group key; the first rule
//! that matches wins. Each [`GroupingMode`] selects its own rule list, so the
//! matching behavior of every mode is independently testable without touching
//! the filesystem.

use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use std::path::Path;
use tokio::fs::read_dir;

use crate::path_utils::{get_file_name_lossy, is_hidden_entry, sanitize_filename};
use crate::report::{ProgressEvent, ProgressReporter};
use crate::types::{FolderGroups, GroupingMode};

lazy_static! {
    /// Matches volume folder names such as "v1", "Vol. 2" or "volume 3".
    static ref VOLUME_REGEX: Regex =
        Regex::new(r"(?i)^(?:v|vol|volume)\.?\s*(\d+)").unwrap();
    /// Matches combined names such as "Volume 1 Chapter 3".
    static ref VOLUME_CHAPTER_REGEX: Regex =
        Regex::new(r"(?i)^volume\s+(\d+)\s+chapter\s+\d+").unwrap();
}

/// A named classification rule: folder name in, group key out.
#[derive(Debug, Clone, Copy)]
pub struct MatcherRule {
    pub name: &'static str,
    pub matcher: fn(&str) -> Option<String>,
}

/// Rule list for [`GroupingMode::Volumes`]. Strict: names that match no rule
/// are excluded from the result.
pub const VOLUME_RULES: &[MatcherRule] = &[MatcherRule {
    name: "volume",
    matcher: volume_rule,
}];

/// Rule list for [`GroupingMode::Chapters`]. Total: every folder becomes a
/// singleton group keyed by its raw name.
pub const CHAPTER_RULES: &[MatcherRule] = &[MatcherRule {
    name: "chapter",
    matcher: chapter_rule,
}];

/// Rule list for [`GroupingMode::Hybrid`], evaluated in priority order.
pub const HYBRID_RULES: &[MatcherRule] = &[
    MatcherRule {
        name: "volume-chapter",
        matcher: volume_chapter_rule,
    },
    MatcherRule {
        name: "simple-volume",
        matcher: simple_volume_rule,
    },
    MatcherRule {
        name: "standalone",
        matcher: standalone_rule,
    },
];

/// Strips leading zeros from a digit run, keeping a single zero for all-zero input.
fn normalize_number(digits: &str) -> &str {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() { "0" } else { stripped }
}

/// Maps "v1" / "Vol. 02" / "volume 3" to a short volume key like "v2".
pub fn volume_rule(name: &str) -> Option<String> {
    VOLUME_REGEX
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|number| format!("v{}", normalize_number(number.as_str())))
}

/// Maps every folder name to a singleton group keyed by the raw name.
pub fn chapter_rule(name: &str) -> Option<String> {
    Some(name.to_string())
}

/// Maps "Volume 1 Chapter 3" to the merged key "Volume 1".
pub fn volume_chapter_rule(name: &str) -> Option<String> {
    VOLUME_CHAPTER_REGEX
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|number| format!("Volume {}", normalize_number(number.as_str())))
}

/// Maps "v1" / "Vol. 02" / "volume 3" to the merged key "Volume 1".
pub fn simple_volume_rule(name: &str) -> Option<String> {
    VOLUME_REGEX
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|number| format!("Volume {}", normalize_number(number.as_str())))
}

/// Maps any remaining folder to a standalone group keyed by its sanitized name.
pub fn standalone_rule(name: &str) -> Option<String> {
    Some(sanitize_filename(name))
}

/// Classifies the immediate subdirectories of a source root into groups.
#[derive(Debug, Clone, Copy)]
pub struct PathClassifier {
    mode: GroupingMode,
}

impl PathClassifier {
    pub fn new(mode: GroupingMode) -> Self {
        Self { mode }
    }

    /// The ordered rule list for this classifier's mode.
    pub fn rules(&self) -> &'static [MatcherRule] {
        match self.mode {
            GroupingMode::Volumes => VOLUME_RULES,
            GroupingMode::Chapters => CHAPTER_RULES,
            GroupingMode::Hybrid => HYBRID_RULES,
        }
    }

    /// Applies the rule list to a single folder name.
    pub fn match_name(&self, name: &str) -> Option<String> {
        self.rules().iter().find_map(|rule| (rule.matcher)(name))
    }

    /// Builds the folder groups for `root`.
    ///
    /// Hidden entries and plain files are skipped. Folders are visited in
    /// sorted name order, which makes both the key set and the folder order
    /// within each key deterministic. An unlistable root yields an empty
    /// result and a warning event rather than an error.
    pub async fn classify(&self, root: &Path, reporter: &dyn ProgressReporter) -> FolderGroups {
        let mut groups = FolderGroups::new();

        let mut entries = match read_dir(root).await {
            Ok(entries) => entries,
            Err(e) => {
                reporter.report(ProgressEvent::Warning {
                    message: format!("cannot list source directory {}: {}", root.display(), e),
                });
                return groups;
            }
        };

        let mut folders = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if is_hidden_entry(&path) || !path.is_dir() {
                        continue;
                    }
                    folders.push((get_file_name_lossy(&path), path));
                }
                Ok(None) => break,
                Err(e) => {
                    reporter.report(ProgressEvent::Warning {
                        message: format!("error while listing {}: {}", root.display(), e),
                    });
                    break;
                }
            }
        }

        folders.par_sort_by(|a, b| a.0.cmp(&b.0));

        for (name, path) in folders {
            match self.match_name(&name) {
                Some(key) => groups.entry(key).or_default().push(path),
                None => {
                    reporter.report(ProgressEvent::Warning {
                        message: format!(
                            "folder '{}' does not match any {:?} naming rule and was excluded",
                            name, self.mode
                        ),
                    });
                }
            }
        }

        groups
    }
}

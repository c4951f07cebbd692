// ABOUTME: Per-file diff records and repo-wide totals for the working tree view

use serde::{Deserialize, Serialize};

/// Change kind, serialized as the git status letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileStatus {
    #[serde(rename = "A")]
    Added,
    #[serde(rename = "M")]
    Modified,
    #[serde(rename = "D")]
    Deleted,
    #[serde(rename = "R")]
    Renamed,
    #[serde(rename = "C")]
    Copied,
    #[serde(rename = "T")]
    TypeChanged,
    #[serde(rename = "U")]
    Unmerged,
    #[serde(rename = "X")]
    Unknown,
}

impl FileStatus {
    /// Parse a `--name-status` code such as `M` or `R087`. Only the letter
    /// matters; the similarity score is dropped.
    pub fn from_code(code: &str) -> Self {
        match code.trim().chars().next() {
            Some('A') => Self::Added,
            Some('M') => Self::Modified,
            Some('D') => Self::Deleted,
            Some('R') => Self::Renamed,
            Some('C') => Self::Copied,
            Some('T') => Self::TypeChanged,
            Some('U') => Self::Unmerged,
            _ => Self::Unknown,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::Copied => 'C',
            Self::TypeChanged => 'T',
            Self::Unmerged => 'U',
            Self::Unknown => 'X',
        }
    }

    /// Renames and copies carry a source path distinct from the entry path
    pub const fn has_source_path(self) -> bool {
        matches!(self, Self::Renamed | Self::Copied)
    }
}

/// One changed path with its before/after snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiffEntry {
    pub filename: String,
    /// Source path of a rename or copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_filename: Option<String>,
    pub status: FileStatus,
    pub binary: bool,
    #[serde(rename = "oldValue")]
    pub old_content: String,
    #[serde(rename = "newValue")]
    pub new_content: String,
    pub additions: usize,
    pub deletions: usize,
}

impl FileDiffEntry {
    /// Entry for a binary file: no content, no line counts
    pub fn binary(filename: impl Into<String>, status: FileStatus) -> Self {
        Self {
            filename: filename.into(),
            old_filename: None,
            status,
            binary: true,
            old_content: String::new(),
            new_content: String::new(),
            additions: 0,
            deletions: 0,
        }
    }

    /// Entry for a text file. The side that cannot exist for the status
    /// (baseline of an add, working copy of a delete) is forced empty.
    pub fn text(
        filename: impl Into<String>,
        status: FileStatus,
        old_content: String,
        new_content: String,
        additions: usize,
        deletions: usize,
    ) -> Self {
        Self {
            filename: filename.into(),
            old_filename: None,
            status,
            binary: false,
            old_content: if status == FileStatus::Added {
                String::new()
            } else {
                old_content
            },
            new_content: if status == FileStatus::Deleted {
                String::new()
            } else {
                new_content
            },
            additions,
            deletions,
        }
    }

    #[must_use]
    pub fn with_old_filename(mut self, old_filename: Option<String>) -> Self {
        self.old_filename = old_filename;
        self
    }
}

/// Totals over a set of entries; binary entries count as files only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub total_files: usize,
    pub total_additions: usize,
    pub total_deletions: usize,
}

impl DiffSummary {
    pub fn from_entries(entries: &[FileDiffEntry]) -> Self {
        entries
            .iter()
            .filter(|entry| !entry.binary)
            .fold(
                Self {
                    total_files: entries.len(),
                    ..Self::default()
                },
                |mut summary, entry| {
                    summary.total_additions += entry.additions;
                    summary.total_deletions += entry.deletions;
                    summary
                },
            )
    }
}

/// Full diff view of a working tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    pub files: Vec<FileDiffEntry>,
    pub summary: DiffSummary,
}

impl DiffReport {
    pub fn new(files: Vec<FileDiffEntry>) -> Self {
        let summary = DiffSummary::from_entries(&files);
        Self { files, summary }
    }
}

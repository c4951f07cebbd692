// ABOUTME: Working-tree diff aggregation with per-file snapshots and line counts
//
// Side effect: every call stages untracked files as intent-to-add (`git add -N`)
// so new files show up in `git diff`. The index records only their presence;
// no content is staged and nothing is committed.

use futures_util::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::exec::CommandExecutor;
use crate::git::repository::run_git;
use crate::models::{DiffReport, FileDiffEntry, FileStatus};

/// Files enriched concurrently by default
pub const DEFAULT_DIFF_CONCURRENCY: usize = 4;

/// One `--name-status` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedPath {
    pub status: FileStatus,
    pub path: String,
    /// Source path for renames and copies
    pub source: Option<String>,
}

impl ChangedPath {
    /// Path the baseline content lives at in HEAD
    fn baseline_path(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.path)
    }
}

/// Line-count classification from `git diff --numstat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCounts {
    /// `-\t-`: git could not count lines
    Binary,
    Text { additions: usize, deletions: usize },
}

/// Parse `git diff --name-status -z` output.
///
/// Records are NUL separated: a status code, then one path, or two for
/// renames and copies.
pub fn parse_name_status(output: &str) -> Vec<ChangedPath> {
    let mut tokens = output.split('\0').filter(|token| !token.is_empty());
    let mut changes = Vec::new();

    while let Some(code) = tokens.next() {
        let status = FileStatus::from_code(code);
        let Some(first) = tokens.next() else {
            break;
        };
        let change = if status.has_source_path() {
            let Some(second) = tokens.next() else {
                break;
            };
            ChangedPath {
                status,
                path: second.to_string(),
                source: Some(first.to_string()),
            }
        } else {
            ChangedPath {
                status,
                path: first.to_string(),
                source: None,
            }
        };
        changes.push(change);
    }
    changes
}

/// Parse the first record of `git diff --numstat`. Anything unparsable counts
/// as zero.
pub fn parse_numstat(output: &str) -> LineCounts {
    let Some(line) = output.lines().find(|line| !line.trim().is_empty()) else {
        return LineCounts::Text {
            additions: 0,
            deletions: 0,
        };
    };

    let mut fields = line.split('\t');
    match (fields.next(), fields.next()) {
        (Some("-"), Some("-")) => LineCounts::Binary,
        (Some(added), Some(deleted)) => LineCounts::Text {
            additions: added.trim().parse().unwrap_or(0),
            deletions: deleted.trim().parse().unwrap_or(0),
        },
        _ => LineCounts::Text {
            additions: 0,
            deletions: 0,
        },
    }
}

/// Builds the per-file diff view of one repository
#[derive(Clone)]
pub struct DiffAggregator {
    executor: Arc<dyn CommandExecutor>,
    concurrency: usize,
}

impl DiffAggregator {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_concurrency(executor, DEFAULT_DIFF_CONCURRENCY)
    }

    pub fn with_concurrency(executor: Arc<dyn CommandExecutor>, concurrency: usize) -> Self {
        Self {
            executor,
            concurrency: concurrency.max(1),
        }
    }

    /// Diff of the working tree at `root` against HEAD.
    ///
    /// Best effort: a failing or timed-out per-file query blanks only that
    /// field of that entry.
    pub async fn diff(&self, root: &Path) -> DiffReport {
        self.stage_intent_to_add(root).await;

        let changes = self.changed_paths(root).await;
        debug!("{} changed paths in {}", changes.len(), root.display());

        let files: Vec<FileDiffEntry> = stream::iter(changes)
            .map(|change| self.entry_for(root, change))
            .buffered(self.concurrency)
            .collect()
            .await;

        DiffReport::new(files)
    }

    async fn stage_intent_to_add(&self, root: &Path) {
        let result = run_git(self.executor.as_ref(), root, &["add", "-N", "."]).await;
        if !result.succeeded() {
            warn!(
                "Intent-to-add staging failed in {}: {}",
                root.display(),
                result.diagnostic()
            );
        }
    }

    async fn changed_paths(&self, root: &Path) -> Vec<ChangedPath> {
        let result = run_git(
            self.executor.as_ref(),
            root,
            &["diff", "--name-status", "-z"],
        )
        .await;

        if result.succeeded() {
            parse_name_status(&result.stdout)
        } else {
            warn!("Listing changed paths failed: {}", result.diagnostic());
            Vec::new()
        }
    }

    async fn entry_for(&self, root: &Path, change: ChangedPath) -> FileDiffEntry {
        let counts = self.line_counts(root, &change).await;

        let entry = match counts {
            LineCounts::Binary => FileDiffEntry::binary(&change.path, change.status),
            LineCounts::Text {
                additions,
                deletions,
            } => {
                let (old_content, new_content) = tokio::join!(
                    self.baseline_content(root, &change),
                    Self::working_content(root, &change),
                );
                FileDiffEntry::text(
                    &change.path,
                    change.status,
                    old_content,
                    new_content,
                    additions,
                    deletions,
                )
            }
        };
        entry.with_old_filename(change.source)
    }

    async fn line_counts(&self, root: &Path, change: &ChangedPath) -> LineCounts {
        let mut args = vec!["diff", "--numstat", "--"];
        if let Some(source) = change.source.as_deref() {
            args.push(source);
        }
        args.push(change.path.as_str());

        let result = run_git(self.executor.as_ref(), root, &args).await;
        if result.succeeded() {
            parse_numstat(&result.stdout)
        } else {
            debug!("numstat for {} unavailable: {}", change.path, result.diagnostic());
            LineCounts::Text {
                additions: 0,
                deletions: 0,
            }
        }
    }

    async fn baseline_content(&self, root: &Path, change: &ChangedPath) -> String {
        if change.status == FileStatus::Added {
            return String::new();
        }

        let spec = format!("HEAD:{}", change.baseline_path());
        let result = run_git(self.executor.as_ref(), root, &["show", &spec]).await;
        if result.succeeded() {
            result.stdout
        } else {
            debug!("No baseline for {}: {}", change.path, result.diagnostic());
            String::new()
        }
    }

    async fn working_content(root: &Path, change: &ChangedPath) -> String {
        if change.status == FileStatus::Deleted {
            return String::new();
        }

        match tokio::fs::read(root.join(&change.path)).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!("Working copy of {} unreadable: {}", change.path, e);
                String::new()
            }
        }
    }
}

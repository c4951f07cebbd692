// ABOUTME: Git integration through the git CLI: repository probe, branches, working-tree diff

pub mod branches;
pub mod diff_analyzer;
pub mod repository;

pub use branches::{BranchManager, UNKNOWN_BRANCH};
pub use diff_analyzer::DiffAggregator;
pub use repository::RepositoryProbe;

// ABOUTME: Branch listing model returned by the branches endpoint

use serde::{Deserialize, Serialize};

/// Current, local and remote-tracking branch names of one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSet {
    pub current: String,
    pub local: Vec<String>,
    /// Remote-tracking branches, without the `<remote>/HEAD` pointer
    pub remote: Vec<String>,
}

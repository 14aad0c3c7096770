//! User directory configuration.

use serde::{Deserialize, Serialize};

/// Username search limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Minimum query length (in characters) for username search.
    #[serde(default = "default_search_min_length")]
    pub search_min_length: usize,
    /// Maximum number of search results.
    #[serde(default = "default_search_limit")]
    pub search_limit: i64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            search_min_length: default_search_min_length(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_search_min_length() -> usize {
    2
}

fn default_search_limit() -> i64 {
    20
}

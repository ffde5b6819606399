//! Outcome counters for operations spanning many playlists

/// Result of applying one change to many playlists
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkOpSummary {
    pub success: usize,
    pub skipped: usize,
    pub skipped_condition: usize,
    pub errors: usize,
    pub error_messages: Vec<String>,
}

impl BulkOpSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn add_success(&mut self) {
        self.success += 1;
    }

    pub const fn add_skip(&mut self) {
        self.skipped += 1;
    }

    pub const fn add_skip_condition(&mut self) {
        self.skipped_condition += 1;
    }

    pub fn add_error(&mut self, msg: String) {
        self.errors += 1;
        self.error_messages.push(msg);
    }

    /// Total number of playlists visited
    #[must_use]
    pub const fn total(&self) -> usize {
        self.success + self.skipped + self.skipped_condition + self.errors
    }
}

/// Result of a pattern-based tag sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemovalSummary {
    /// Playlists whose tag set changed
    pub entities_changed: usize,
    /// Individual tag removals across all playlists
    pub tags_removed: usize,
    /// Playlists left with no tags and dropped from the index
    pub entities_cleared: usize,
}

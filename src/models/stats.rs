//! Per-run counters.

/// Counter record for a single pipeline run.
///
/// Owned exclusively by the active [`RomRenamer`](crate::services::pipeline::RomRenamer)
/// run; reset at the start of each run, never persisted.
///
/// Counting conventions:
/// - `renamed` increments once per ROM file renamed to the canonical extension
/// - `extracted` increments once per archive successfully unpacked, not per
///   ROM found inside it
/// - `moved` increments once per archive relocated to the backup directory
/// - `errors` counts genuine per-item I/O failures; collision skips and
///   unsupported-format skips are not errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub renamed: usize,
    pub extracted: usize,
    pub moved: usize,
    pub errors: usize,
}

impl RunStats {
    /// One-line summary of the run, used for host-side logging.
    pub fn summary(&self) -> String {
        format!(
            "{} renamed, {} extracted, {} moved, {} errors",
            self.renamed, self.extracted, self.moved, self.errors
        )
    }

    /// True when any per-item failure was recorded.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zeroed() {
        let stats = RunStats::default();
        assert_eq!(stats.renamed, 0);
        assert_eq!(stats.extracted, 0);
        assert_eq!(stats.moved, 0);
        assert_eq!(stats.errors, 0);
        assert!(!stats.has_errors());
    }

    #[test]
    fn test_summary() {
        let stats = RunStats {
            renamed: 2,
            extracted: 1,
            moved: 1,
            errors: 0,
        };
        assert_eq!(stats.summary(), "2 renamed, 1 extracted, 1 moved, 0 errors");
    }
}

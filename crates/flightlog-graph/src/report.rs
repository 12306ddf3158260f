//! Counters collected during derivation passes

use serde::Serialize;

/// What a derivation run read, kept and wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeriveReport {
    /// Flight-passenger links read
    pub links_scanned: usize,

    /// Distinct passenger pairs seen together on any flight
    pub pairs_seen: usize,

    /// Pairs dropped for sharing too few flights
    pub pairs_suppressed: usize,

    /// Connections written
    pub connections_written: usize,

    /// Flights read for route grouping
    pub flights_scanned: usize,

    /// Distinct routes seen
    pub routes_seen: usize,

    /// Routes dropped for being flown too rarely
    pub routes_suppressed: usize,

    /// Patterns written
    pub patterns_written: usize,

    /// Total runtime in milliseconds
    pub runtime_ms: u64,
}

impl DeriveReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a summary of the run
    pub fn summary(&self) -> String {
        let lines = [
            "Derivation Summary".to_string(),
            "==================".to_string(),
            format!("Links scanned: {}", self.links_scanned),
            format!(
                "Passenger pairs: {} seen, {} below threshold",
                self.pairs_seen, self.pairs_suppressed
            ),
            format!("Connections written: {}", self.connections_written),
            String::new(),
            format!("Flights scanned: {}", self.flights_scanned),
            format!(
                "Routes: {} seen, {} below threshold",
                self.routes_seen, self.routes_suppressed
            ),
            format!("Patterns written: {}", self.patterns_written),
            String::new(),
            format!("Total runtime: {}ms", self.runtime_ms),
        ];
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_creation() {
        let report = DeriveReport::new();
        assert_eq!(report.connections_written, 0);
        assert_eq!(report.patterns_written, 0);
    }

    #[test]
    fn test_summary() {
        let report = DeriveReport {
            links_scanned: 12,
            pairs_seen: 7,
            pairs_suppressed: 4,
            connections_written: 3,
            flights_scanned: 5,
            routes_seen: 2,
            routes_suppressed: 1,
            patterns_written: 1,
            runtime_ms: 42,
        };

        let summary = report.summary();
        assert!(summary.contains("Passenger pairs: 7 seen, 4 below threshold"));
        assert!(summary.contains("Connections written: 3"));
        assert!(summary.contains("Routes: 2 seen, 1 below threshold"));
        assert!(summary.contains("Total runtime: 42ms"));
    }
}

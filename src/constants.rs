//! # System Constants
//!
//! Fixed values that define the operational boundaries of the classification engine.

/// System-wide constants
pub mod system {
    /// Color token returned when no step table knows a status
    pub const FALLBACK_COLOR_TOKEN: &str = "gray";

    /// Label reported for a business with no tasks at all
    pub const NO_TASKS_LABEL: &str = "미등록";

    /// Business names per store round-trip when building summaries
    pub const DEFAULT_SUMMARY_CHUNK_SIZE: usize = 200;

    /// Task ids per concurrently processed deletion chunk
    pub const DEFAULT_DELETION_CHUNK_SIZE: usize = 50;
}

/// Status groupings for classification logic
pub mod status_groups {
    /// Terminal statuses across every task type, plus legacy unprefixed values.
    /// A task in one of these is never at risk or delayed.
    pub const COMPLETED_STATUSES: &[&str] = &[
        "self_document_complete",
        "subsidy_document_complete",
        "subsidy_payment",
        "etc_complete",
        "as_completed",
        "dealer_settlement",
        "outsourcing_complete",
        "document_complete",
        "payment",
        "completed",
        "complete",
    ];

    pub fn is_completed_status(status: &str) -> bool {
        COMPLETED_STATUSES.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::status_groups::*;

    #[test]
    fn test_completed_status_membership() {
        assert!(is_completed_status("subsidy_payment"));
        assert!(is_completed_status("as_completed"));
        assert!(is_completed_status("payment"));
        assert!(!is_completed_status("self_installation"));
        assert!(!is_completed_status("Subsidy_Payment"));
    }
}

//! Result types passed between pipeline stages

use ipovc_domain::{Candidate, ExtractionRecord, FieldOrigins};

/// Output of the rule engine
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    /// The rule guess
    pub record: ExtractionRecord,

    /// All candidates, ranked
    pub candidates: Vec<Candidate>,
}

/// Output of the merge resolver
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged record
    pub record: ExtractionRecord,

    /// Which producer supplied each field
    pub origins: FieldOrigins,
}

/// Final result for one document
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// The record written to the output
    pub record: ExtractionRecord,

    /// Which producer supplied each field
    pub origins: FieldOrigins,

    /// Number of candidates the scanner found (0 in full-text mode)
    pub candidate_count: usize,

    /// Whether a parsed model reply contributed to the record
    pub llm_used: bool,
}

impl ExtractionOutcome {
    pub(crate) fn from_rules(outcome: RuleOutcome) -> Self {
        Self {
            record: outcome.record,
            origins: FieldOrigins::default(),
            candidate_count: outcome.candidates.len(),
            llm_used: false,
        }
    }
}

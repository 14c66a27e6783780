use crate::model::{DriftEntry, MismatchReport};
use libdrift_types::{Finding, LibdriftData, Verdict, VerdictStatus};

/// What the comparison found, before it is flattened into findings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Reconcile(Vec<MismatchReport>),
    Revision(Vec<DriftEntry>),
}

impl Outcome {
    pub fn is_clean(&self) -> bool {
        match self {
            Outcome::Reconcile(m) => m.is_empty(),
            Outcome::Revision(d) => d.is_empty(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub outcome: Outcome,
    pub data: LibdriftData,
}

impl DomainReport {
    pub fn passed(&self) -> bool {
        self.verdict.status == VerdictStatus::Pass
    }
}

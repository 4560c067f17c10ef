use crate::sbom_generation::domain::{Signature, VersionNumber};

/// The newest stored version and, when it could be read, its signature.
#[derive(Debug, Clone)]
pub struct PriorVersion {
    pub number: VersionNumber,
    /// `None` when the stored manifest was missing or unreadable
    pub signature: Option<Signature>,
}

/// Outcome of comparing a candidate against the newest stored version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Persist the candidate under this new number
    Commit { version: VersionNumber },
    /// Discard the candidate; it equals this stored version
    Duplicate { of: VersionNumber },
}

/// VersionGate decides whether a freshly rendered manifest is new content.
pub struct VersionGate;

impl VersionGate {
    /// No prior version gives `v1`. A prior version with an equal signature
    /// gives a duplicate; anything else, including an unreadable prior
    /// manifest, gives `max + 1`.
    pub fn decide(candidate: &Signature, latest: Option<&PriorVersion>) -> GateDecision {
        match latest {
            None => GateDecision::Commit {
                version: VersionNumber::FIRST,
            },
            Some(prior) if prior.signature.as_ref() == Some(candidate) => {
                GateDecision::Duplicate { of: prior.number }
            }
            Some(prior) => GateDecision::Commit {
                version: prior.number.next(),
            },
        }
    }
}

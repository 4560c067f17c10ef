mod reconciler;
mod sbom_generator;
mod side_file_ledger;
mod version_gate;

pub use reconciler::{MatchKind, Reconciler};
pub use sbom_generator::{SbomGenerator, DEFAULT_TOOL_NAME};
pub use side_file_ledger::{interpreter_entry, SideFileLedger};
pub use version_gate::{GateDecision, PriorVersion, VersionGate};

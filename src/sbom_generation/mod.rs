/// Domain layer - extraction and reconciliation core
///
/// Pure logic only: no filesystem, network or console access happens here.
pub mod domain;
pub mod parsers;
pub mod policies;
pub mod services;

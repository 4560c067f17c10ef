/// Adapters layer - Infrastructure implementations
///
/// Concrete implementations of the outbound ports: console, filesystem,
/// document formatters and the package-index HTTP client.
pub mod outbound;

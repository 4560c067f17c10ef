/// Formatter adapters for the manifest and narrative documents
mod cyclonedx_formatter;
mod markdown_formatter;

pub use cyclonedx_formatter::{order_top_level_keys, CycloneDxFormatter, TOP_LEVEL_KEY_ORDER};
pub use markdown_formatter::MarkdownFormatter;

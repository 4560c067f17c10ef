//! Read models for rendering
//!
//! View-optimized structs that give the formatters a denormalized,
//! already-sorted picture of one generation run.

pub mod component_view;
pub mod sbom_read_model;
pub mod sbom_read_model_builder;

pub use component_view::ComponentView;
pub use sbom_read_model::{SbomMetadataView, SbomReadModel, SourceGroupView, VersionAnalysisView};
pub use sbom_read_model_builder::{RenderOptions, SbomReadModelBuilder};

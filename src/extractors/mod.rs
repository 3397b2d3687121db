// src/extractors/mod.rs
pub mod naming;
pub mod normalize;
pub mod opinion;

// Re-export key extraction types for convenience
pub use naming::DocumentName;
pub use opinion::{ExtractorConfig, OpinionExtractor};

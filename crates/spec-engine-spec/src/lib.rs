//! Spec engine core.
//!
//! This crate turns a free-text project description into a structured
//! [`SpecDraft`], resolves low-confidence fields through follow-up questions,
//! and renders the result as a markdown document with a fixed heading
//! skeleton that [`validate_spec_markdown`] enforces.

pub mod error;
pub mod model;
pub mod normalize;
pub mod parsing;
pub mod project_type;
pub mod quality;
pub mod rendering;
pub mod resolution;
pub mod strategy;

pub use error::*;
pub use model::*;
pub use normalize::*;
pub use parsing::*;
pub use project_type::*;
pub use quality::*;
pub use rendering::*;
pub use resolution::*;
pub use strategy::*;

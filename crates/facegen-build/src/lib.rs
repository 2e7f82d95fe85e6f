//! Fabrication-artifact build pipeline.
//!
//! Walks a manifest of module directories and regenerates Gerbers, BOMs,
//! schematic PDFs, faceplate SVGs, firmware images, and manuals for the
//! ones that changed since their last recorded build commit.

pub mod error;
pub mod git;
pub mod manifest;
pub mod pipeline;
pub mod runner;

pub use error::BuildError;
pub use git::GitDiff;
pub use manifest::{Manifest, Tools};
pub use pipeline::{to_snake_case, BuildOutcome, Builder};
pub use runner::{SystemRunner, ToolCommand, ToolOutput, ToolRunner};

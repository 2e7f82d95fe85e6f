//! SVG output writer, path-data builders, and the external flatten/minify
//! pipeline that turns a composed panel into fabrication-ready output.

pub mod editor;
pub mod font;
pub mod minify;
pub mod path;
pub mod postprocess;
pub mod svg;

pub use postprocess::PostOp;
pub use svg::{Defs, Document, Element, Paint, Stop};

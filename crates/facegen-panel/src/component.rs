//! The panel-component contract.
//!
//! A component owns its position (panel coordinates) and a footprint-derived
//! local offset; it emits geometry for each output layer strictly in its own
//! local frame. The panel wraps every emission in a translated group, so
//! components never see panel-global coordinates.

use facegen_export::path;
use facegen_export::{Defs, Element, PostOp};

use crate::error::PanelError;

/// Stencil-layer output: label/background elements plus any deferred work
/// the panel must hand to the external editor after serialization.
#[derive(Debug, Default)]
pub struct Stencil {
    pub elements: Vec<Element>,
    /// Editor action fragments, each `;`-terminated, run before the flatten.
    pub editor_actions: Vec<String>,
    /// File cleanups applied after the editor pass.
    pub post_ops: Vec<PostOp>,
}

impl Stencil {
    #[must_use]
    pub fn of(elements: Vec<Element>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }
}

pub trait Component {
    /// Placement in panel coordinates (relative to the panel's offset frame).
    fn position(&self) -> (f64, f64);

    /// Whether the fabrication hole is still drawn when the panel renders
    /// cosmetics. Components whose illustration covers the hole return false.
    fn cosmetic_holes(&self) -> bool {
        true
    }

    fn draw_holes(&self) -> Vec<Element> {
        Vec::new()
    }

    fn draw_drill_markers(&self) -> Vec<Element> {
        Vec::new()
    }

    /// `index` is the panel-assigned component number, used to mint
    /// deterministic element ids for deferred editor operations.
    fn draw_stencil(&self, index: usize) -> Stencil {
        let _ = index;
        Stencil::default()
    }

    fn draw_debug(&self) -> Vec<Element> {
        Vec::new()
    }

    fn draw_cosmetics(&self, defs: &mut Defs) -> Result<Vec<Element>, PanelError> {
        let _ = defs;
        Ok(Vec::new())
    }
}

/// Footprint data shared by every single-hole component: a local offset
/// (already rotated) and a hole radius.
#[derive(Debug, Clone, Copy)]
pub struct CircleFootprint {
    pub offset: (f64, f64),
    pub radius: f64,
}

impl CircleFootprint {
    #[must_use]
    pub fn new(offset: (f64, f64), radius: f64, rotation: facegen_core::Rotation) -> Self {
        Self {
            offset: rotation.apply(offset),
            radius,
        }
    }

    #[must_use]
    pub fn hole(&self) -> Vec<Element> {
        vec![Element::circle(self.offset, self.radius)]
    }

    #[must_use]
    pub fn drill_marker(&self) -> Vec<Element> {
        vec![
            Element::path(path::drill_marker(self.offset.0, self.offset.1, 1.0))
                .stroke_width(0.2),
        ]
    }
}

/// Diagonal cross at the component origin, drawn on the debug layer.
#[must_use]
pub fn origin_marker() -> Element {
    Element::path(path::x_marker(0.0, 0.0, 1.0)).stroke_width(0.1)
}

/// Small filled dot marking a datasheet pin location on the debug layer.
#[must_use]
pub fn debug_pin(point: (f64, f64)) -> Element {
    Element::circle(point, 0.25)
}

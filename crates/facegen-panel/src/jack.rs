//! Phone-jack sockets.

use facegen_core::{slip_fit, Rotation};
use facegen_export::path;
use facegen_export::{Defs, Element, PostOp, Stop};

use crate::component::{debug_pin, origin_marker, CircleFootprint, Component, Stencil};
use crate::cosmetics::washer_gradient;
use crate::error::PanelError;

/// The datasheet gives a 4.92 mm center offset for this footprint, but the
/// real through-hole pitch is 8.3 mm (0.33 in) where the footprint uses
/// 0.3 in, so the offset is scaled by the same ratio.
const JACK_OFFSET_Y: f64 = 4.516_915_66;
const JACK_NOMINAL_RADIUS: f64 = 3.0;
const QUARTER_INCH_RADIUS: f64 = 9.5 / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JackKind {
    /// Footprint-anchored 1/8" socket; hole sits below the pin origin.
    #[default]
    Standard,
    /// 1/8" socket with the offset pinned to the true hole center, for
    /// callers doing their own placement math.
    Centered,
    /// 1/4" socket; larger clearance hole, hex-nut cosmetic.
    QuarterInch,
}

#[derive(Debug, Clone)]
pub struct JackSocket {
    position: (f64, f64),
    rotation: Rotation,
    kind: JackKind,
    footprint: CircleFootprint,
    label: String,
    is_output: bool,
    font_size: Option<f64>,
    label_above: bool,
    text_offset: Option<(f64, f64)>,
}

impl JackSocket {
    #[must_use]
    pub fn new(x: f64, y: f64, label: impl Into<String>, is_output: bool) -> Self {
        Self::with_kind(x, y, label, is_output, JackKind::Standard)
    }

    #[must_use]
    pub fn centered(x: f64, y: f64, label: impl Into<String>, is_output: bool) -> Self {
        Self::with_kind(x, y, label, is_output, JackKind::Centered)
    }

    #[must_use]
    pub fn quarter_inch(x: f64, y: f64, label: impl Into<String>, is_output: bool) -> Self {
        Self::with_kind(x, y, label, is_output, JackKind::QuarterInch)
    }

    #[must_use]
    pub fn with_kind(
        x: f64,
        y: f64,
        label: impl Into<String>,
        is_output: bool,
        kind: JackKind,
    ) -> Self {
        Self {
            position: (x, y),
            rotation: Rotation::R0,
            kind,
            footprint: Self::footprint_for(kind, Rotation::R0),
            label: label.into(),
            is_output,
            font_size: None,
            label_above: false,
            text_offset: None,
        }
    }

    fn footprint_for(kind: JackKind, rotation: Rotation) -> CircleFootprint {
        match kind {
            JackKind::Standard => {
                CircleFootprint::new((0.0, JACK_OFFSET_Y), slip_fit(JACK_NOMINAL_RADIUS), rotation)
            }
            JackKind::Centered => {
                CircleFootprint::new((0.0, 0.0), slip_fit(JACK_NOMINAL_RADIUS), rotation)
            }
            // The 9.5 mm panel hole already includes the nut clearance.
            JackKind::QuarterInch => {
                CircleFootprint::new((0.0, 0.0), QUARTER_INCH_RADIUS, rotation)
            }
        }
    }

    #[must_use]
    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self.footprint = Self::footprint_for(self.kind, rotation);
        self
    }

    #[must_use]
    pub fn label_above(mut self) -> Self {
        self.label_above = true;
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn text_offset(mut self, offset: (f64, f64)) -> Self {
        self.text_offset = Some(offset);
        self
    }

    /// Hole center in panel coordinates. Used by callers drawing connecting
    /// traces between related controls.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            self.position.0 + self.footprint.offset.0,
            self.position.1 + self.footprint.offset.1,
        )
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.footprint.radius
    }

    fn resolved_text_offset(&self) -> (f64, f64) {
        if let Some(offset) = self.text_offset {
            return offset;
        }
        if self.label_above {
            (0.0, -(self.footprint.radius + 2.35))
        } else {
            (0.0, self.footprint.radius + 4.85)
        }
    }
}

impl Component for JackSocket {
    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn draw_holes(&self) -> Vec<Element> {
        self.footprint.hole()
    }

    fn draw_drill_markers(&self) -> Vec<Element> {
        self.footprint.drill_marker()
    }

    fn draw_stencil(&self, index: usize) -> Stencil {
        let (cx, cy) = self.footprint.offset;
        let hole_radius = self.footprint.radius;
        let (tx, ty) = self.resolved_text_offset();

        let path_id = format!("jack_bg_{index}");
        let text_id = format!("jack_label_{index}");

        let mut out = Stencil::default();

        if self.is_output {
            // Black capsule behind the white label, with a counter-wound
            // cutout around the hole. The editor turns the overlap into a
            // true boolean difference after serialization.
            let padding = 1.5;
            let width = 2.0 * (hole_radius + padding);
            let height = if self.label.is_empty() { width } else { 15.0 };
            let outer = path::rounded_rect(
                cx - width / 2.0,
                cy - hole_radius - padding,
                width,
                height,
                1.5,
            );
            let inner = path::circle_cutout((cx, cy), hole_radius + 0.35);
            out.elements.push(
                Element::path(format!("{outer} {inner}"))
                    .fill("#000000")
                    .id(path_id.clone()),
            );
            out.editor_actions.push(format!(
                "select-by-id:{path_id},{text_id};SelectionDiff;EditDeselect;select-by-id:{path_id};EditDeselect;"
            ));
            out.post_ops.push(PostOp::StripStyleAttr { id: path_id });
        }

        let mut text = Element::text(self.label.clone(), (cx + tx, cy + ty))
            .id(text_id)
            .attr("text-anchor", "middle");
        if let Some(size) = self.font_size {
            text = text.font_size(size);
        }
        if self.is_output {
            text = text.fill("#ffffff");
        }
        out.elements.push(text);
        out
    }

    fn draw_debug(&self) -> Vec<Element> {
        let mut elements = vec![origin_marker()];
        match self.kind {
            JackKind::Standard => {}
            JackKind::Centered => {
                for pin in [(0.0, -4.92), (0.0, 3.38), (0.0, 6.48)] {
                    elements.push(debug_pin(self.rotation.apply(pin)));
                }
            }
            JackKind::QuarterInch => {
                for pin in [
                    (4.67, 4.67),
                    (-2.4, 6.38),
                    (-6.38, 0.56),
                    (0.56, -6.38),
                    (6.38, -2.4),
                ] {
                    elements.push(debug_pin(self.rotation.apply(pin)));
                }
                elements.push(
                    Element::rect((-8.0, -8.0), (16.0, 16.0))
                        .stroke("cyan")
                        .fill("none")
                        .stroke_width(0.2),
                );
            }
        }
        elements
    }

    fn draw_cosmetics(&self, defs: &mut Defs) -> Result<Vec<Element>, PanelError> {
        let radius = self.footprint.radius;
        let offset = self.footprint.offset;
        let mut elements = Vec::new();

        let washer = washer_gradient(defs);
        if matches!(self.kind, JackKind::QuarterInch) {
            elements.push(
                Element::path(path::regular_polygon(
                    offset,
                    6,
                    radius + 1.3,
                    std::f64::consts::FRAC_PI_6,
                ))
                .fill(washer.server()),
            );
        } else {
            elements.push(
                Element::path(path::scalloped_circle(offset, radius + 0.4, radius + 0.6, 18))
                    .fill(washer.server()),
            );
        }

        let ring_thickness = 0.8;
        let ring = defs.radial_gradient(
            (0.5, 0.5),
            0.5,
            vec![
                Stop::new(1.0 - ring_thickness / radius, "black"),
                Stop::new(1.0 - ring_thickness / radius / 2.0, "white"),
                Stop::new(1.0, "#444"),
            ],
        );
        elements.push(Element::circle(offset, radius).fill(ring.server()));

        let barrel = defs.linear_gradient(
            (1.0, 0.0),
            (0.0, 1.0),
            vec![Stop::new(0.0, "black"), Stop::new(1.0, "#333")],
        );
        elements.push(Element::circle(offset, radius - ring_thickness).fill(barrel.server()));

        Ok(elements)
    }
}

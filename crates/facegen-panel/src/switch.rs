//! Panel-mount toggle switches.

use facegen_core::{from_polar, inches, slip_fit, Rotation};
use facegen_export::svg::fmt_num;
use facegen_export::{Defs, Element, Stop};

use crate::component::{origin_marker, CircleFootprint, Component, Stencil};
use crate::cosmetics::washer_gradient;
use crate::error::PanelError;

const SMALL_SWITCH_NOMINAL_RADIUS: f64 = 2.25;

#[derive(Debug, Clone)]
pub struct Switch {
    position: (f64, f64),
    /// Cosmetic lever direction only; the footprint is rotationally symmetric.
    rotation: Rotation,
    footprint: CircleFootprint,
    small: bool,
    label: Option<String>,
    left_text: Option<String>,
    right_text: Option<String>,
    font_size: Option<f64>,
}

impl Switch {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: (x, y),
            rotation: Rotation::R0,
            footprint: CircleFootprint::new((0.0, 0.0), slip_fit(inches(1.0 / 8.0)), Rotation::R0),
            small: false,
            label: None,
            left_text: None,
            right_text: None,
            font_size: None,
        }
    }

    /// Sub-miniature variant: smaller bushing, and the illustration covers
    /// the hole so it is suppressed in cosmetic mode.
    #[must_use]
    pub fn small(x: f64, y: f64) -> Self {
        let mut switch = Self::new(x, y);
        switch.footprint =
            CircleFootprint::new((0.0, 0.0), slip_fit(SMALL_SWITCH_NOMINAL_RADIUS), Rotation::R0);
        switch.small = true;
        switch
    }

    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn side_texts(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_text = Some(left.into());
        self.right_text = Some(right.into());
        self
    }

    #[must_use]
    pub fn left_text(mut self, text: impl Into<String>) -> Self {
        self.left_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn right_text(mut self, text: impl Into<String>) -> Self {
        self.right_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.footprint.radius
    }

    fn lever(&self, defs: &mut Defs) -> Element {
        let offset = self.footprint.offset;
        let angle = self.rotation.radians();
        let length = 4.0;
        let width = 2.2;
        let spread: f64 = 0.1;
        let rounding = 2.5;
        let wide_width = width + 2.0 * length * spread.sin();

        let grad_offset = match self.rotation {
            Rotation::R0 => (0.8, 0.35),
            Rotation::R90 => (0.65, 0.6),
            Rotation::R180 => (0.2, 0.35),
            Rotation::R270 => (0.65, 0.2),
        };
        let paint = defs.radial_gradient(
            grad_offset,
            0.6,
            vec![Stop::new(0.0, "#eee"), Stop::new(1.0, "#111")],
        );

        // Tapered quadrilateral from the bushing outward, with a rounded far
        // shoulder; the taper spread keeps the silhouette slightly conical.
        let half = std::f64::consts::FRAC_PI_2;
        let (sx, sy) = from_polar(offset, angle - half, width / 2.0);
        let mut d = format!("M {} {}", fmt_num(sx), fmt_num(sy));

        let (dx, dy) = ((angle - spread).cos() * length, (angle - spread).sin() * length);
        d.push_str(&format!(" l {} {}", fmt_num(dx), fmt_num(dy)));

        let (wx, wy) = ((angle + half).cos() * wide_width, (angle + half).sin() * wide_width);
        let (c1x, c1y) = ((angle - spread).cos() * rounding, (angle - spread).sin() * rounding);
        let (c2x, c2y) = (
            wx + (angle + spread).cos() * rounding,
            wy + (angle + spread).sin() * rounding,
        );
        d.push_str(&format!(
            " c {} {} {} {} {} {}",
            fmt_num(c1x),
            fmt_num(c1y),
            fmt_num(c2x),
            fmt_num(c2y),
            fmt_num(wx),
            fmt_num(wy)
        ));

        let back = angle + spread + std::f64::consts::PI;
        let (bx, by) = (back.cos() * length, back.sin() * length);
        d.push_str(&format!(" l {} {} z", fmt_num(bx), fmt_num(by)));

        Element::path(d).fill(paint.server())
    }
}

impl Component for Switch {
    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn cosmetic_holes(&self) -> bool {
        !self.small
    }

    fn draw_holes(&self) -> Vec<Element> {
        self.footprint.hole()
    }

    fn draw_drill_markers(&self) -> Vec<Element> {
        self.footprint.drill_marker()
    }

    fn draw_stencil(&self, _index: usize) -> Stencil {
        let (cx, cy) = self.footprint.offset;
        let approx_text_size = self.font_size.unwrap_or(3.0);
        let mut elements = Vec::new();

        let style_text = |el: Element, font_size: Option<f64>| {
            let el = el.attr("text-anchor", "middle");
            match font_size {
                Some(size) => el.font_size(size),
                None => el,
            }
        };

        if let Some(label) = &self.label {
            elements.push(style_text(
                Element::text(label.clone(), (cx, cy + 8.0)),
                self.font_size,
            ));
        }
        if let Some(left) = &self.left_text {
            elements.push(style_text(
                Element::text(left.clone(), (cx - 8.0, cy + approx_text_size / 2.0)),
                self.font_size,
            ));
        }
        if let Some(right) = &self.right_text {
            elements.push(style_text(
                Element::text(right.clone(), (cx + 8.0, cy + approx_text_size / 2.0)),
                self.font_size,
            ));
        }
        Stencil::of(elements)
    }

    fn draw_debug(&self) -> Vec<Element> {
        vec![origin_marker()]
    }

    fn draw_cosmetics(&self, defs: &mut Defs) -> Result<Vec<Element>, PanelError> {
        let offset = self.footprint.offset;
        let radius = self.footprint.radius;
        let mut elements = Vec::new();

        let washer = washer_gradient(defs);
        elements.push(Element::circle(offset, radius + 0.35).fill(washer.server()));

        let ring_thickness = 0.8;
        let nut = defs.radial_gradient(
            (0.5, 0.5),
            0.5,
            vec![
                Stop::new(1.0 - ring_thickness / radius, "black"),
                Stop::new(1.0 - ring_thickness / radius / 2.0, "white"),
                Stop::new(1.0, "#444"),
            ],
        );
        elements.push(Element::circle(offset, radius).fill(nut.server()));
        elements.push(Element::circle(offset, radius - ring_thickness).fill("#111"));
        elements.push(self.lever(defs));

        Ok(elements)
    }
}

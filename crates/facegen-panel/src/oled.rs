//! 0.96" OLED display: rectangular screen cutout plus four M2 mounting
//! holes, all transforming together under the panel rotation rule.

use facegen_core::{inches, Rotation};
use facegen_export::path;
use facegen_export::{Defs, Element};

use crate::component::{debug_pin, Component};
use crate::cosmetics::m2_bolt_head;
use crate::error::PanelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OledKind {
    #[default]
    I2c,
    /// SPI breakout: wider pin row, screen shifted to keep it centered.
    Spi,
}

#[derive(Debug, Clone)]
pub struct Oled {
    position: (f64, f64),
    rotation: Rotation,
    kind: OledKind,
    screen_width: f64,
    screen_height: f64,
    center_x: f64,
    screen_bottom_offset: f64,
    hole_spacing_x: f64,
    hole_spacing_y: f64,
    hole_offset_y: f64,
}

impl Oled {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_kind(x, y, OledKind::I2c)
    }

    #[must_use]
    pub fn spi(x: f64, y: f64) -> Self {
        Self::with_kind(x, y, OledKind::Spi).rotated(Rotation::R90)
    }

    #[must_use]
    pub fn with_kind(x: f64, y: f64, kind: OledKind) -> Self {
        // Screen is 0.96" diagonal at 128x64 (2:1), with a ~2mm bezel; leave
        // 1mm of faceplate overlap on each side of the glass.
        let true_height = inches(0.96) / 5.0_f64.sqrt();
        let true_width = true_height * 2.0;
        Self {
            position: (x, y),
            rotation: Rotation::R0,
            kind,
            screen_width: true_width + 2.0,
            screen_height: true_height + 2.0,
            center_x: match kind {
                OledKind::I2c => inches(0.15),
                OledKind::Spi => inches(0.3),
            },
            screen_bottom_offset: -3.4,
            hole_spacing_x: 23.5,
            hole_spacing_y: 24.0,
            hole_offset_y: -inches(0.01),
        }
    }

    #[must_use]
    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Screen rectangle origin under the current rotation. The rectangle is
    /// axis-aligned in all four orientations, so the origin and size swap
    /// rather than rotate.
    #[must_use]
    pub fn screen_offset(&self) -> (f64, f64) {
        let x = -self.screen_width / 2.0 + self.center_x;
        let y = self.screen_bottom_offset - self.screen_height;
        match self.rotation {
            Rotation::R0 => (x, y),
            Rotation::R90 => (-y - self.screen_height, x),
            Rotation::R180 => (-x - self.screen_width, -y - self.screen_height),
            Rotation::R270 => (y, -x - self.screen_width),
        }
    }

    #[must_use]
    pub fn screen_size(&self) -> (f64, f64) {
        match self.rotation {
            Rotation::R0 | Rotation::R180 => (self.screen_width, self.screen_height),
            Rotation::R90 | Rotation::R270 => (self.screen_height, self.screen_width),
        }
    }

    fn hole_locations(&self) -> Vec<(f64, f64)> {
        let hole_center_y = self.hole_offset_y - self.hole_spacing_y / 2.0;
        let mut holes = Vec::with_capacity(4);
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                holes.push(self.rotation.apply((
                    self.center_x + x * self.hole_spacing_x / 2.0,
                    hole_center_y + y * self.hole_spacing_y / 2.0,
                )));
            }
        }
        holes
    }

    fn debug_pin_count(&self) -> usize {
        match self.kind {
            OledKind::I2c => 4,
            OledKind::Spi => 7,
        }
    }
}

impl Component for Oled {
    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn draw_holes(&self) -> Vec<Element> {
        let screw_hole_d = inches(3.0 / 32.0);
        let mut elements: Vec<Element> = self
            .hole_locations()
            .into_iter()
            .map(|p| Element::circle(p, screw_hole_d / 2.0))
            .collect();
        elements.push(Element::rect(self.screen_offset(), self.screen_size()));
        elements
    }

    fn draw_drill_markers(&self) -> Vec<Element> {
        self.hole_locations()
            .into_iter()
            .map(|(x, y)| Element::path(path::drill_marker(x, y, 1.0)).stroke_width(0.2))
            .collect()
    }

    fn draw_debug(&self) -> Vec<Element> {
        let mut elements = vec![crate::component::origin_marker()];
        for i in 0..self.debug_pin_count() {
            elements.push(debug_pin(self.rotation.apply((inches(i as f64 * 0.1), 0.0))));
        }
        elements
    }

    fn draw_cosmetics(&self, defs: &mut Defs) -> Result<Vec<Element>, PanelError> {
        let offset = self.screen_offset();
        let size = self.screen_size();

        let clip_id = defs.clip_path(Element::rect(offset, size));

        let mut elements = vec![Element::rect(offset, size).fill("black")];

        // Glare highlight clipped to the glass.
        let (x, y) = offset;
        let (w, h) = size;
        elements.push(
            Element::ellipse((x + w, y), (w / 2.0, h / 2.0))
                .fill("white")
                .attr_num("opacity", 0.5)
                .attr("clip-path", format!("url(#{clip_id})")),
        );

        for p in self.hole_locations() {
            elements.extend(m2_bolt_head(defs, p));
        }
        Ok(elements)
    }
}

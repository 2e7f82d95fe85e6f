//! Panel LEDs. Press-fit, so the hole radius is the lens radius with no
//! slip-fit allowance.

use facegen_core::{inches, Rotation};
use facegen_export::{Defs, Element};

use crate::component::{debug_pin, origin_marker, CircleFootprint, Component};
use crate::cosmetics::led_cosmetic;
use crate::error::PanelError;

const LED_RADIUS: f64 = 2.55;
const SMALL_LED_RADIUS: f64 = 1.55;

#[derive(Debug, Clone)]
pub struct Led {
    position: (f64, f64),
    rotation: Rotation,
    footprint: CircleFootprint,
    color: String,
}

impl Led {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_radius(x, y, LED_RADIUS)
    }

    /// 3 mm lens variant.
    #[must_use]
    pub fn small(x: f64, y: f64) -> Self {
        Self::with_radius(x, y, SMALL_LED_RADIUS)
    }

    fn with_radius(x: f64, y: f64, radius: f64) -> Self {
        Self {
            position: (x, y),
            rotation: Rotation::R0,
            footprint: CircleFootprint::new((0.0, inches(0.05)), radius, Rotation::R0),
            color: "red".to_string(),
        }
    }

    #[must_use]
    pub fn rotated(mut self, rotation: Rotation) -> Self {
        let radius = self.footprint.radius;
        self.rotation = rotation;
        self.footprint = CircleFootprint::new((0.0, inches(0.05)), radius, rotation);
        self
    }

    #[must_use]
    pub fn colored(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

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
}

impl Component for Led {
    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn cosmetic_holes(&self) -> bool {
        false
    }

    fn draw_holes(&self) -> Vec<Element> {
        self.footprint.hole()
    }

    fn draw_drill_markers(&self) -> Vec<Element> {
        self.footprint.drill_marker()
    }

    fn draw_debug(&self) -> Vec<Element> {
        let mut elements = vec![origin_marker()];
        for pin in [(0.0, 0.0), (0.0, inches(0.1))] {
            elements.push(debug_pin(self.rotation.apply(pin)));
        }
        elements
    }

    fn draw_cosmetics(&self, defs: &mut Defs) -> Result<Vec<Element>, PanelError> {
        Ok(led_cosmetic(
            defs,
            self.footprint.offset,
            self.footprint.radius,
            &self.color,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn led_hole_has_no_allowance() {
        assert_eq!(Led::new(0.0, 0.0).radius(), LED_RADIUS);
        assert_eq!(Led::small(0.0, 0.0).radius(), SMALL_LED_RADIUS);
    }

    #[test]
    fn led_offset_sits_between_legs() {
        let led = Led::new(0.0, 0.0);
        assert_eq!(led.center(), (0.0, inches(0.05)));
        let rotated = Led::new(0.0, 0.0).rotated(Rotation::R180);
        assert_eq!(rotated.center(), (0.0, -inches(0.05)));
    }

    #[test]
    fn led_is_hidden_behind_cosmetics() {
        assert!(!Led::new(0.0, 0.0).cosmetic_holes());
    }
}

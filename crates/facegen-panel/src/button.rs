//! Push buttons: the generic footprint plus the named physical parts used
//! across the module line. The debug pins mark datasheet lead positions for
//! verifying a footprint against its drawing.

use facegen_core::{slip_fit, Rotation};
use facegen_export::{Defs, Element};

use crate::component::{debug_pin, CircleFootprint, Component};
use crate::cosmetics::button_cosmetic;
use crate::error::PanelError;

/// Which physical part this button is; selects footprint and illustration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonKind {
    /// Generic 8 mm pushbutton with a mounting washer.
    #[default]
    Generic,
    /// TL1265 illuminated tact switch; lens offset from the lead origin.
    Tl1265,
    /// TL1105SP tact switch with the SP cap.
    Tl1105Sp,
    /// D6R30 large square-body switch, yellow cap.
    D6R30,
}

#[derive(Debug, Clone)]
pub struct Button {
    position: (f64, f64),
    rotation: Rotation,
    kind: ButtonKind,
    footprint: CircleFootprint,
}

impl Button {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_kind(x, y, ButtonKind::Generic)
    }

    #[must_use]
    pub fn with_kind(x: f64, y: f64, kind: ButtonKind) -> Self {
        Self {
            position: (x, y),
            rotation: Rotation::R0,
            kind,
            footprint: Self::footprint_for(kind, Rotation::R0),
        }
    }

    fn footprint_for(kind: ButtonKind, rotation: Rotation) -> CircleFootprint {
        match kind {
            ButtonKind::Generic => CircleFootprint::new((0.0, 0.0), 4.0, rotation),
            ButtonKind::Tl1265 => CircleFootprint::new((3.0, 4.5 / 2.0), 2.55, rotation),
            ButtonKind::Tl1105Sp => CircleFootprint::new((0.0, 0.0), 5.1 / 2.0, rotation),
            ButtonKind::D6R30 => CircleFootprint::new((0.0, 0.0), slip_fit(9.0 / 2.0), rotation),
        }
    }

    #[must_use]
    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self.footprint = Self::footprint_for(self.kind, rotation);
        self
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.footprint.radius
    }
}

impl Component for Button {
    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn cosmetic_holes(&self) -> bool {
        matches!(self.kind, ButtonKind::Generic | ButtonKind::Tl1265)
    }

    fn draw_holes(&self) -> Vec<Element> {
        self.footprint.hole()
    }

    fn draw_drill_markers(&self) -> Vec<Element> {
        self.footprint.drill_marker()
    }

    fn draw_debug(&self) -> Vec<Element> {
        match self.kind {
            ButtonKind::Generic | ButtonKind::Tl1265 => Vec::new(),
            ButtonKind::Tl1105Sp => {
                let (w, h) = (6.5, 4.5);
                [(-w / 2.0, -h / 2.0), (w / 2.0, -h / 2.0), (-w / 2.0, h / 2.0), (w / 2.0, h / 2.0)]
                    .into_iter()
                    .map(|pin| debug_pin(self.rotation.apply(pin)))
                    .collect()
            }
            ButtonKind::D6R30 => {
                let spread = 2.5;
                [(-spread, -spread), (spread, -spread), (-spread, spread), (spread, spread)]
                    .into_iter()
                    .map(|pin| debug_pin(self.rotation.apply(pin)))
                    .collect()
            }
        }
    }

    fn draw_cosmetics(&self, defs: &mut Defs) -> Result<Vec<Element>, PanelError> {
        let neutral = [("#aaa", "#000"), ("#888", "#111")];
        let elements = match self.kind {
            ButtonKind::Generic | ButtonKind::Tl1265 => {
                button_cosmetic(defs, self.footprint.offset, self.footprint.radius, true, neutral)
            }
            ButtonKind::Tl1105Sp => {
                button_cosmetic(defs, self.footprint.offset, self.footprint.radius, false, neutral)
            }
            ButtonKind::D6R30 => button_cosmetic(
                defs,
                self.footprint.offset,
                self.footprint.radius,
                false,
                [("#ff0", "#550"), ("#ff9", "#dd0")],
            ),
        };
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facegen_core::HOLE_ALLOWANCE;

    #[test]
    fn footprints_match_datasheets() {
        assert_eq!(Button::new(0.0, 0.0).radius(), 4.0);
        assert_eq!(Button::with_kind(0.0, 0.0, ButtonKind::Tl1265).radius(), 2.55);
        assert_eq!(Button::with_kind(0.0, 0.0, ButtonKind::Tl1105Sp).radius(), 2.55);
        assert_eq!(
            Button::with_kind(0.0, 0.0, ButtonKind::D6R30).radius(),
            4.5 + HOLE_ALLOWANCE
        );
    }

    #[test]
    fn tl1265_offset_rotates_with_part() {
        let button = Button::with_kind(0.0, 0.0, ButtonKind::Tl1265).rotated(Rotation::R90);
        assert_eq!(button.footprint.offset, (-2.25, 3.0));
    }

    #[test]
    fn calibration_pins_only_on_verified_parts() {
        assert!(Button::new(0.0, 0.0).draw_debug().is_empty());
        assert_eq!(
            Button::with_kind(0.0, 0.0, ButtonKind::Tl1105Sp).draw_debug().len(),
            4
        );
        assert_eq!(Button::with_kind(0.0, 0.0, ButtonKind::D6R30).draw_debug().len(), 4);
    }

    #[test]
    fn cosmetic_hole_suppression_follows_kind() {
        assert!(Button::new(0.0, 0.0).cosmetic_holes());
        assert!(!Button::with_kind(0.0, 0.0, ButtonKind::Tl1105Sp).cosmetic_holes());
        assert!(!Button::with_kind(0.0, 0.0, ButtonKind::D6R30).cosmetic_holes());
    }
}

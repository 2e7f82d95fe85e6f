//! Rotary potentiometers and their cap illustrations.

use facegen_core::{inches, slip_fit, Rotation};
use facegen_export::path;
use facegen_export::{Defs, Element, Stop};
use serde::{Deserialize, Serialize};

use crate::component::{debug_pin, origin_marker, CircleFootprint, Component, Stencil};
use crate::cosmetics::{darken, lighten};
use crate::error::PanelError;

const POT_NOMINAL_RADIUS: f64 = 3.5;

/// Physical cap family. Each branch has its own geometry constants; none of
/// them affect fabrication output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotStyle {
    /// Legacy flat cap with a painted marker line.
    Old,
    RoganPt1s,
    Chromatic,
    ChromaticSmall,
    #[default]
    SifamMedium,
    /// Sifam medium skirt without the pointer line.
    SifamMediumRe,
    SifamLarge,
}

impl PotStyle {
    fn default_text_offset(self) -> f64 {
        match self {
            PotStyle::ChromaticSmall => 10.0,
            PotStyle::SifamLarge => 12.75,
            _ => 11.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotColor {
    #[default]
    White,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Magenta,
}

impl PotColor {
    /// (light, dark) gradient pair for the Sifam cap families.
    fn sifam_pair(self) -> (String, String) {
        match self {
            PotColor::White => ("#fff".into(), "#ccc".into()),
            PotColor::Red => ("#e25f62".into(), "#d23e3e".into()),
            PotColor::Green => (lighten("#54ad77", 0.18), "#379a64".into()),
            PotColor::Orange => ("#fe8f78".into(), "#f15d38".into()),
            PotColor::Yellow => ("#fae98a".into(), "#f7e150".into()),
            PotColor::Blue => (lighten("#0bbff2", 0.18), darken("#0bbff2", 0.1)),
            PotColor::Magenta => ("#ff85be".into(), "#e8538c".into()),
        }
    }

    /// Pointer contrast against the cap color.
    fn sifam_pointer(self) -> &'static str {
        match self {
            PotColor::White | PotColor::Blue | PotColor::Yellow => "#000",
            _ => "#fff",
        }
    }

    /// Flat paint for the legacy cap.
    fn old_cap(self) -> &'static str {
        match self {
            PotColor::White => "#eee",
            PotColor::Red => "#ed2222",
            PotColor::Orange => "#ff7f2a",
            PotColor::Yellow => "#f5d400",
            PotColor::Green => "#5ece1c",
            PotColor::Blue => "#3b75ff",
            PotColor::Magenta => "#d946aa",
        }
    }
}

/// Skirt/grip/cap radii for one cap family.
struct CapRadii {
    skirt: f64,
    outer: f64,
    inner: f64,
    cap: f64,
}

#[derive(Debug, Clone)]
pub struct Potentiometer {
    position: (f64, f64),
    rotation: Rotation,
    footprint: CircleFootprint,
    label: Option<String>,
    font_size: Option<f64>,
    color: PotColor,
    style: PotStyle,
    text_offset: f64,
}

impl Potentiometer {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        let style = PotStyle::default();
        Self {
            position: (x, y),
            rotation: Rotation::R0,
            footprint: Self::footprint_for(Rotation::R0),
            label: None,
            font_size: None,
            color: PotColor::default(),
            style,
            text_offset: style.default_text_offset(),
        }
    }

    fn footprint_for(rotation: Rotation) -> CircleFootprint {
        CircleFootprint::new(
            (inches(0.1), inches(-0.3)),
            slip_fit(POT_NOMINAL_RADIUS),
            rotation,
        )
    }

    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self.footprint = Self::footprint_for(rotation);
        self
    }

    #[must_use]
    pub fn colored(mut self, color: PotColor) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn styled(mut self, style: PotStyle) -> Self {
        // Re-derive the default label offset unless one was pinned.
        if self.text_offset == self.style.default_text_offset() {
            self.text_offset = style.default_text_offset();
        }
        self.style = style;
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn text_offset(mut self, offset: f64) -> Self {
        self.text_offset = offset;
        self
    }

    /// Shaft center in panel coordinates.
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

    fn draw_sifam_cap(
        &self,
        defs: &mut Defs,
        radii: &CapRadii,
        pointer: bool,
    ) -> Result<Vec<Element>, PanelError> {
        let offset = self.footprint.offset;
        let (cap_light, cap_dark) = self.color.sifam_pair();
        let pointer_color = self.color.sifam_pointer();

        let diag = (0.5_f64).sqrt();
        let mut elements = Vec::new();

        let skirt_paint = defs.linear_gradient(
            (diag, 0.0),
            (0.0, diag),
            vec![Stop::new(0.0, "#666"), Stop::new(1.0, "#191919")],
        );
        elements.push(Element::circle(offset, radii.skirt).fill(skirt_paint.server()));

        // Radial falloff so the skirt reads as a chamfer around the grip.
        let scale = radii.outer / radii.skirt;
        let falloff = defs.radial_gradient(
            (0.5, 0.5),
            0.5,
            vec![
                Stop::with_opacity(scale * 0.85, "#000", 1.0),
                Stop::with_opacity(scale * 1.15, "#000", 0.0),
            ],
        );
        elements.push(Element::circle(offset, radii.skirt).fill(falloff.server()));

        let num_lobes = 6;
        let lobe_frac = 0.7;
        let cut_frac = 0.12;
        let knob_theta = -std::f64::consts::PI * 3.0 / 4.0;
        let start_theta =
            knob_theta + ((1.0 - lobe_frac) * (2.0 * std::f64::consts::PI / num_lobes as f64)) / 2.0;

        let grip_paint = defs.linear_gradient(
            (diag, 0.0),
            (0.0, diag),
            vec![
                Stop::new(0.0, "#666"),
                Stop::new(0.04, "#686868"),
                Stop::new(1.0, "#212121"),
            ],
        );
        elements.push(
            Element::path(path::lobed_circle(
                offset,
                radii.inner,
                radii.outer,
                num_lobes,
                lobe_frac,
                cut_frac,
                start_theta,
            )?)
            .fill(grip_paint.server()),
        );

        let grip_top = defs.linear_gradient(
            (diag, 0.0),
            (0.0, diag),
            vec![Stop::new(0.0, "#777"), Stop::new(1.0, "#555555")],
        );
        elements.push(
            Element::path(path::lobed_circle(
                offset,
                radii.cap + 0.5,
                radii.cap + 0.5 + radii.outer - radii.inner,
                num_lobes,
                lobe_frac,
                cut_frac,
                start_theta,
            )?)
            .fill(grip_top.server()),
        );

        let cap_paint = defs.linear_gradient(
            (diag, 0.0),
            (0.0, diag),
            vec![Stop::new(0.0, cap_light), Stop::new(1.0, cap_dark)],
        );
        elements.push(Element::circle(offset, radii.cap).fill(cap_paint.server()));

        if pointer {
            elements.push(
                Element::line(offset, facegen_core::from_polar(offset, knob_theta, radii.cap))
                    .stroke_width(0.8)
                    .stroke(pointer_color),
            );
        }

        Ok(elements)
    }

    fn draw_chromatic_cap(
        &self,
        defs: &mut Defs,
        radii: &CapRadii,
        cap_color: Option<(&str, &str)>,
        pointer_color: Option<&str>,
    ) -> Vec<Element> {
        let offset = self.footprint.offset;
        let mut elements = Vec::new();

        let skirt = defs.linear_gradient(
            (1.0, 0.0),
            (0.0, 1.0),
            vec![Stop::new(0.0, "#555"), Stop::new(1.0, "#111")],
        );
        elements.push(Element::circle(offset, radii.skirt).fill(skirt.server()));

        let start_theta = -std::f64::consts::PI * 3.0 / 4.0;
        let knob = defs.linear_gradient(
            (1.0, 0.0),
            (0.0, 1.0),
            vec![Stop::new(0.0, "#777"), Stop::new(1.0, "#222")],
        );
        elements.push(
            Element::path(path::stepped_ring(
                offset,
                radii.outer,
                radii.inner,
                6,
                0.7,
                start_theta,
                pointer_color.is_some(),
            ))
            .fill(knob.server()),
        );

        if let Some((light, dark)) = cap_color {
            let cap = defs.linear_gradient(
                (1.0, 0.0),
                (0.0, 1.0),
                vec![Stop::new(0.0, light), Stop::new(1.0, dark)],
            );
            elements.push(Element::circle(offset, radii.cap).fill(cap.server()));
        }

        if let Some(color) = pointer_color {
            let inset = 1.6;
            let start = facegen_core::from_polar(offset, start_theta, inset);
            let end = facegen_core::from_polar(offset, start_theta, inset + 4.5);
            let (shift_x, shift_y) = (-0.3, 0.6);
            let blur = defs.blur_filter(0.3);
            elements.push(
                Element::line(
                    (start.0 + shift_x, start.1 + shift_y),
                    (end.0 + shift_x, end.1 + shift_y),
                )
                .stroke_width(1.0)
                .stroke("#000")
                .attr_num("opacity", 0.2)
                .attr("filter", blur),
            );
            elements.push(Element::line(start, end).stroke_width(1.0).stroke(color));
        }

        elements
    }

    fn draw_old_cap(&self, defs: &mut Defs) -> Vec<Element> {
        let offset = self.footprint.offset;
        let border_width = 2.0;
        let marker_width: f64 = 2.0;
        let base_radius = inches(0.25);
        let top_radius = base_radius - 0.5;

        let washer = defs.linear_gradient(
            (1.0, 0.0),
            (0.0, 1.0),
            vec![Stop::new(0.0, "white"), Stop::new(1.0, "black")],
        );
        let mut elements = vec![
            Element::circle(offset, base_radius + inches(1.0 / 16.0)).fill(washer.server()),
            Element::circle(offset, top_radius)
                .fill(self.color.old_cap())
                .stroke("black")
                .stroke_width(border_width),
        ];

        let tip_offset = (top_radius * top_radius / 2.0).sqrt();
        let tip_size = (marker_width * marker_width / 2.0).sqrt();
        let marker_tip = (offset.0 - tip_offset, offset.1 - tip_offset);
        elements.push(
            Element::line(offset, marker_tip)
                .stroke("black")
                .stroke_width(marker_width)
                .attr("stroke-linecap", "round"),
        );
        let square_offset = ((border_width / 2.0) * (border_width / 2.0) / 2.0).sqrt();
        elements.push(
            Element::rect(
                (
                    marker_tip.0 - square_offset - tip_size / 2.0,
                    marker_tip.1 - square_offset - tip_size / 2.0,
                ),
                (tip_size, tip_size),
            )
            .fill("black"),
        );
        elements
    }
}

impl Component for Potentiometer {
    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn draw_holes(&self) -> Vec<Element> {
        self.footprint.hole()
    }

    fn draw_drill_markers(&self) -> Vec<Element> {
        self.footprint.drill_marker()
    }

    fn draw_stencil(&self, _index: usize) -> Stencil {
        let Some(label) = &self.label else {
            return Stencil::default();
        };
        let (cx, cy) = self.footprint.offset;
        let mut text = Element::text(label.clone(), (cx, cy + self.text_offset))
            .attr("text-anchor", "middle");
        if let Some(size) = self.font_size {
            text = text.font_size(size);
        }
        Stencil::of(vec![text])
    }

    fn draw_debug(&self) -> Vec<Element> {
        let mut elements = vec![origin_marker()];
        for pin in [(0.0, 0.0), (inches(0.1), 0.0), (inches(0.2), 0.0)] {
            elements.push(debug_pin(self.rotation.apply(pin)));
        }
        elements
    }

    fn draw_cosmetics(&self, defs: &mut Defs) -> Result<Vec<Element>, PanelError> {
        match self.style {
            PotStyle::Old => Ok(self.draw_old_cap(defs)),
            PotStyle::SifamMedium | PotStyle::SifamMediumRe => {
                let radii = CapRadii {
                    skirt: 14.3 / 2.0,
                    outer: 11.0 / 2.0,
                    inner: 10.5 / 2.0,
                    cap: 4.0,
                };
                self.draw_sifam_cap(defs, &radii, self.style == PotStyle::SifamMedium)
            }
            PotStyle::SifamLarge => {
                let outer = 15.3 / 2.0;
                let radii = CapRadii {
                    skirt: 18.5 / 2.0,
                    outer,
                    inner: outer - 0.35,
                    cap: 11.5 / 2.0,
                };
                self.draw_sifam_cap(defs, &radii, true)
            }
            PotStyle::RoganPt1s => {
                let radii = CapRadii {
                    skirt: 14.38 / 2.0,
                    outer: 11.0 / 2.0,
                    inner: 10.0 / 2.0,
                    cap: 4.0,
                };
                Ok(self.draw_chromatic_cap(defs, &radii, Some(("#fff", "#bbb")), None))
            }
            PotStyle::Chromatic => {
                let radii = CapRadii {
                    skirt: 16.0 / 2.0,
                    outer: 11.0 / 2.0,
                    inner: 10.0 / 2.0,
                    cap: 4.0,
                };
                Ok(self.draw_chromatic_cap(defs, &radii, Some(("#fff", "#bbb")), Some("#eee")))
            }
            PotStyle::ChromaticSmall => {
                let radii = CapRadii {
                    skirt: 11.5 / 2.0,
                    outer: 11.0 / 2.0,
                    inner: 10.0 / 2.0,
                    cap: 4.0,
                };
                Ok(self.draw_chromatic_cap(defs, &radii, Some(("#fff", "#bbb")), Some("#eee")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_offset_follows_rotation() {
        let pot = Potentiometer::new(0.0, 0.0).rotated(Rotation::R90);
        // (0.1in, -0.3in) rotated a quarter turn -> (0.3in, 0.1in)
        let (cx, cy) = pot.center();
        assert_eq!(cx, inches(0.3));
        assert_eq!(cy, inches(0.1));
    }

    #[test]
    fn radius_is_slip_fit_inflated() {
        let pot = Potentiometer::new(0.0, 0.0);
        assert_eq!(pot.radius(), POT_NOMINAL_RADIUS + facegen_core::HOLE_ALLOWANCE);
    }

    #[test]
    fn text_offset_tracks_style_default() {
        assert_eq!(
            Potentiometer::new(0.0, 0.0).styled(PotStyle::SifamLarge).text_offset,
            12.75
        );
        assert_eq!(
            Potentiometer::new(0.0, 0.0)
                .styled(PotStyle::ChromaticSmall)
                .text_offset,
            10.0
        );
        // An explicit offset survives a later style change.
        let pot = Potentiometer::new(0.0, 0.0)
            .text_offset(7.0)
            .styled(PotStyle::SifamLarge);
        assert_eq!(pot.text_offset, 7.0);
    }

    #[test]
    fn unlabeled_pot_has_empty_stencil() {
        let pot = Potentiometer::new(0.0, 0.0);
        assert!(pot.draw_stencil(0).elements.is_empty());
    }

    #[test]
    fn every_style_renders_cosmetics() {
        for style in [
            PotStyle::Old,
            PotStyle::RoganPt1s,
            PotStyle::Chromatic,
            PotStyle::ChromaticSmall,
            PotStyle::SifamMedium,
            PotStyle::SifamMediumRe,
            PotStyle::SifamLarge,
        ] {
            let pot = Potentiometer::new(0.0, 0.0).styled(style);
            let mut defs = Defs::new();
            let elements = pot.draw_cosmetics(&mut defs).unwrap();
            assert!(!elements.is_empty(), "style {style:?} drew nothing");
        }
    }

    #[test]
    fn sifam_medium_re_omits_pointer() {
        let mut defs = Defs::new();
        let with = Potentiometer::new(0.0, 0.0)
            .styled(PotStyle::SifamMedium)
            .draw_cosmetics(&mut defs)
            .unwrap();
        let without = Potentiometer::new(0.0, 0.0)
            .styled(PotStyle::SifamMediumRe)
            .draw_cosmetics(&mut defs)
            .unwrap();
        assert_eq!(with.len(), without.len() + 1);
    }

    #[test]
    fn style_names_deserialize_from_yaml() {
        let style: PotStyle = serde_yaml::from_str("sifam_large").unwrap();
        assert_eq!(style, PotStyle::SifamLarge);
        assert!(serde_yaml::from_str::<PotStyle>("bespoke").is_err());
        let color: PotColor = serde_yaml::from_str("magenta").unwrap();
        assert_eq!(color, PotColor::Magenta);
    }
}

//! Shared cosmetic rendering used by several unrelated components.
//!
//! These are illustrations for the display mode only; nothing here touches
//! fabrication layers.

use facegen_export::path;
use facegen_export::{Defs, Element, Stop};

/// Diagonal white-to-black sheen used for washers and nut edges. The stops
/// sit outside 0..1 so only the middle of the ramp is visible.
pub fn washer_gradient(defs: &mut Defs) -> facegen_export::Paint {
    defs.linear_gradient(
        (1.0, 0.0),
        (0.0, 1.0),
        vec![Stop::new(-1.0, "white"), Stop::new(2.0, "black")],
    )
}

/// Shaded nut ring: dark outside, bright crest, dark center falloff.
pub fn gradient_ring(defs: &mut Defs, center: (f64, f64), radius: f64, thickness: f64) -> Element {
    let paint = defs.radial_gradient(
        (0.5, 0.5),
        0.5,
        vec![
            Stop::new(1.0 - thickness / radius, "black"),
            Stop::new(1.0 - thickness / radius / 2.0, "white"),
            Stop::new(1.0, "#444"),
        ],
    );
    Element::circle(center, radius).fill(paint.server())
}

/// Dome-lit LED: radial white core fading to the diode color, plus a tilted
/// specular highlight.
pub fn led_cosmetic(defs: &mut Defs, offset: (f64, f64), radius: f64, color: &str) -> Vec<Element> {
    let paint = defs.radial_gradient(
        (0.5, 0.5),
        0.5,
        vec![Stop::new(0.0, "white"), Stop::new(1.0, color)],
    );
    let mut elements = vec![Element::circle(offset, radius).fill(paint.server())];

    let highlight_center = (offset.0 + radius / 3.0, offset.1 - radius / 2.0);
    elements.push(
        Element::ellipse(highlight_center, (radius / 2.0, radius / 3.0))
            .fill("white")
            .attr_num("opacity", 0.8)
            .rotate_about(20.0, highlight_center),
    );
    elements
}

/// Layered push-button cap: optional washer, outer bezel, inner plunger.
/// `colors` holds the (light, dark) gradient pairs for the two disks.
pub fn button_cosmetic(
    defs: &mut Defs,
    offset: (f64, f64),
    radius: f64,
    with_washer: bool,
    colors: [(&str, &str); 2],
) -> Vec<Element> {
    let mut elements = Vec::new();
    if with_washer {
        let washer = defs.linear_gradient(
            (1.0, 0.0),
            (0.0, 1.0),
            vec![Stop::new(0.0, "#eee"), Stop::new(1.0, "#aaa")],
        );
        elements.push(Element::circle(offset, radius * 1.2).fill(washer.server()));
    }
    let outer = defs.linear_gradient(
        (1.0, 0.0),
        (0.0, 1.0),
        vec![Stop::new(0.0, colors[0].0), Stop::new(1.0, colors[0].1)],
    );
    elements.push(Element::circle(offset, radius).fill(outer.server()));
    let inner = defs.linear_gradient(
        (1.0, 0.0),
        (0.0, 1.0),
        vec![Stop::new(0.0, colors[1].1), Stop::new(1.0, colors[1].0)],
    );
    elements.push(Element::circle(offset, radius * 0.8).fill(inner.server()));
    elements
}

/// M2 socket-head bolt illustration for display mounting holes.
pub fn m2_bolt_head(defs: &mut Defs, point: (f64, f64)) -> Vec<Element> {
    let r = 3.5 / 2.0;
    let edge = washer_gradient(defs);
    let top = defs.radial_gradient(
        (0.5, 0.5),
        0.5,
        vec![
            Stop::with_opacity(0.0, "#666", 1.0),
            Stop::with_opacity(0.75, "#666", 1.0),
            Stop::with_opacity(0.85, "#666", 0.0),
            Stop::with_opacity(1.0, "#666", 0.0),
        ],
    );
    let hex = defs.linear_gradient(
        (1.0, 0.0),
        (0.0, 1.0),
        vec![Stop::new(0.0, "#111"), Stop::new(1.0, "#444")],
    );
    vec![
        Element::circle(point, r).fill(edge.server()),
        Element::circle(point, r).fill(top.server()),
        Element::path(path::regular_polygon(point, 6, 1.0, 0.0)).fill(hex.server()),
    ]
}

/// Raises the HSL lightness of a `#rrggbb` color by `amount` (0..1 scale).
#[must_use]
pub fn lighten(hex: &str, amount: f64) -> String {
    adjust_lightness(hex, amount)
}

/// Lowers the HSL lightness of a `#rrggbb` color by `amount`.
#[must_use]
pub fn darken(hex: &str, amount: f64) -> String {
    adjust_lightness(hex, -amount)
}

fn adjust_lightness(hex: &str, delta: f64) -> String {
    let Some((r, g, b)) = parse_hex(hex) else {
        return hex.to_string();
    };
    let (h, s, l) = rgb_to_hsl(r, g, b);
    let (r, g, b) = hsl_to_rgb(h, s, (l + delta).clamp(0.0, 1.0));
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    } / 6.0;
    (h, s, l)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f64| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round() as u8
    };
    (channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_raises_lightness() {
        assert_eq!(lighten("#000000", 0.5), "#808080");
        assert_eq!(darken("#ffffff", 0.5), "#808080");
    }

    #[test]
    fn round_trip_preserves_color() {
        for hex in ["#54ad77", "#0bbff2", "#e8538c"] {
            assert_eq!(lighten(hex, 0.0), hex);
        }
    }

    #[test]
    fn invalid_hex_passes_through() {
        assert_eq!(lighten("red", 0.2), "red");
    }

    #[test]
    fn led_cosmetic_is_dome_plus_highlight() {
        let mut defs = Defs::new();
        let elements = led_cosmetic(&mut defs, (0.0, 0.0), 2.55, "red");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].tag(), "circle");
        assert_eq!(elements[1].tag(), "ellipse");
    }
}

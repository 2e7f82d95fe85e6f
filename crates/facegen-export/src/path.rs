//! Path-data builders for the shapes the component library draws.
//!
//! Everything here returns the `d` attribute of an SVG `<path>`; the caller
//! wraps it in an [`crate::Element`] and styles it.

use facegen_core::from_polar;
use thiserror::Error;

use crate::svg::fmt_num;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("lobed circle requires outer radius > inner radius (got {outer} <= {inner})")]
    RadiusOrder { inner: f64, outer: f64 },
    #[error("lobe fraction {lobe} plus cut fraction {cut} leaves no room for bevels")]
    NoBevelRoom { lobe: f64, cut: f64 },
}

/// Axis-aligned rounded rectangle, drawn clockwise from the top-left corner.
#[must_use]
pub fn rounded_rect(x: f64, y: f64, w: f64, h: f64, r: f64) -> String {
    let h_edge = w - 2.0 * r;
    let v_edge = h - 2.0 * r;
    [
        format!("M {} {}", fmt_num(x), fmt_num(y + r)),
        format!("a {r} {r} 0 0 1 {r} -{r}", r = fmt_num(r)),
        format!("h {}", fmt_num(h_edge)),
        format!("a {r} {r} 0 0 1 {r} {r}", r = fmt_num(r)),
        format!("v {}", fmt_num(v_edge)),
        format!("a {r} {r} 0 0 1 -{r} {r}", r = fmt_num(r)),
        format!("h {}", fmt_num(-h_edge)),
        format!("a {r} {r} 0 0 1 -{r} -{r}", r = fmt_num(r)),
        "z".to_string(),
    ]
    .join(" ")
}

/// A full circle as a counter-wound subpath. Appended after an outer outline
/// it punches a hole under the even-odd/nonzero fill rules, which is how the
/// output-jack capsule gets its cutout before the editor's boolean pass.
#[must_use]
pub fn circle_cutout(center: (f64, f64), r: f64) -> String {
    let (cx, cy) = center;
    [
        format!("M {} {}", fmt_num(cx), fmt_num(cy - r)),
        format!("a {r} {r} 0 1 0 0 {d}", r = fmt_num(r), d = fmt_num(2.0 * r)),
        format!("a {r} {r} 0 1 0 0 {d}", r = fmt_num(r), d = fmt_num(-2.0 * r)),
        "z".to_string(),
    ]
    .join(" ")
}

/// Scalloped washer profile: alternating pairs of points on two radii.
/// `bumps` is the number of scallops around the circumference.
#[must_use]
pub fn scalloped_circle(center: (f64, f64), r1: f64, r2: f64, bumps: usize) -> String {
    let n = bumps * 4;
    let mut d = String::new();
    for i in 0..n {
        let r = if i % 4 < 2 { r1 } else { r2 };
        let theta = 2.0 * std::f64::consts::PI / n as f64 * i as f64;
        let (x, y) = from_polar(center, theta, r);
        let op = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{op} {} {} ", fmt_num(x), fmt_num(y)));
    }
    d.push('z');
    d
}

/// Knurled grip profile: `lobes` raised arcs at `outer_r` separated by cuts
/// at `inner_r`, joined by straight bevels. `lobe_frac` and `cut_frac` are
/// fractions of one lobe period; what remains is split between the two
/// bevels, and must be positive.
pub fn lobed_circle(
    center: (f64, f64),
    inner_r: f64,
    outer_r: f64,
    lobes: usize,
    lobe_frac: f64,
    cut_frac: f64,
    start_theta: f64,
) -> Result<String, PathError> {
    if outer_r <= inner_r {
        return Err(PathError::RadiusOrder {
            inner: inner_r,
            outer: outer_r,
        });
    }
    let rads_per_lobe = 2.0 * std::f64::consts::PI / lobes as f64;
    let lobe_width = lobe_frac * rads_per_lobe;
    let cut_width = cut_frac * rads_per_lobe;
    let slope_width = (rads_per_lobe - lobe_width - cut_width) / 2.0;
    if slope_width <= 0.0 {
        return Err(PathError::NoBevelRoom {
            lobe: lobe_frac,
            cut: cut_frac,
        });
    }

    let (sx, sy) = from_polar(center, start_theta, outer_r);
    let mut d = format!("M {} {}", fmt_num(sx), fmt_num(sy));

    for i in 0..lobes {
        let mut theta = start_theta + i as f64 * rads_per_lobe;

        // Lobe
        theta += lobe_width;
        let (x, y) = from_polar(center, theta, outer_r);
        d.push_str(&format!(
            " A {r} {r} 0 0 1 {} {}",
            fmt_num(x),
            fmt_num(y),
            r = fmt_num(outer_r)
        ));

        // Bevel down
        theta += slope_width;
        let (x, y) = from_polar(center, theta, inner_r);
        d.push_str(&format!(" L {} {}", fmt_num(x), fmt_num(y)));

        // Cut
        theta += cut_width;
        let (x, y) = from_polar(center, theta, inner_r);
        d.push_str(&format!(" L {} {}", fmt_num(x), fmt_num(y)));

        // Bevel back up, except where Z closes the final lobe
        if i != lobes - 1 {
            theta += slope_width;
            let (x, y) = from_polar(center, theta, outer_r);
            d.push_str(&format!(" L {} {}", fmt_num(x), fmt_num(y)));
        }
    }

    d.push_str(" Z");
    Ok(d)
}

/// Stepped knob profile: arcs at `outer_r` alternating with straight cuts at
/// `inner_r`. With `gap` set, the final cut is left open (the pointer window
/// on chromatic-style caps).
#[must_use]
pub fn stepped_ring(
    center: (f64, f64),
    outer_r: f64,
    inner_r: f64,
    lobes: usize,
    lobe_frac: f64,
    start_theta: f64,
    gap: bool,
) -> String {
    let num_steps = if gap { lobes * 2 - 1 } else { lobes * 2 };
    let lobe_width = 2.0 * std::f64::consts::PI / lobes as f64 * lobe_frac;
    let cut_width = 2.0 * std::f64::consts::PI / lobes as f64 * (1.0 - lobe_frac);

    let mut theta = start_theta + cut_width / 2.0;
    let (sx, sy) = from_polar(center, theta, outer_r);
    let mut d = format!("M {} {}", fmt_num(sx), fmt_num(sy));

    for step in 0..num_steps {
        let (dtheta, r, next_r) = if step % 2 == 0 {
            (lobe_width, outer_r, inner_r)
        } else {
            (cut_width, inner_r, outer_r)
        };
        theta += dtheta;
        let (x, y) = from_polar(center, theta, r);
        if step % 2 == 0 {
            d.push_str(&format!(
                " A {r} {r} 0 0 1 {} {}",
                fmt_num(x),
                fmt_num(y),
                r = fmt_num(r)
            ));
        } else {
            d.push_str(&format!(" L {} {}", fmt_num(x), fmt_num(y)));
        }
        if step != num_steps - 1 {
            let (x, y) = from_polar(center, theta, next_r);
            d.push_str(&format!(" L {} {}", fmt_num(x), fmt_num(y)));
        }
    }

    d.push_str(" Z");
    d
}

#[must_use]
pub fn regular_polygon(center: (f64, f64), sides: usize, r: f64, rotation: f64) -> String {
    let mut d = String::new();
    for i in 0..sides {
        let theta = 2.0 * std::f64::consts::PI * i as f64 / sides as f64 + rotation;
        let (x, y) = from_polar(center, theta, r);
        let op = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{op} {} {} ", fmt_num(x), fmt_num(y)));
    }
    d.push('z');
    d
}

/// Drilling-alignment cross centered on a hole.
#[must_use]
pub fn drill_marker(x: f64, y: f64, size: f64) -> String {
    [
        format!("M {} {}", fmt_num(x), fmt_num(y - size)),
        format!("L {} {}", fmt_num(x), fmt_num(y + size)),
        format!("M {} {}", fmt_num(x - size), fmt_num(y)),
        format!("L {} {}", fmt_num(x + size), fmt_num(y)),
    ]
    .join(" ")
}

/// Diagonal debug cross marking a component origin.
#[must_use]
pub fn x_marker(x: f64, y: f64, size: f64) -> String {
    [
        format!("M {} {}", fmt_num(x - size), fmt_num(y - size)),
        format!("L {} {}", fmt_num(x + size), fmt_num(y + size)),
        format!("M {} {}", fmt_num(x - size), fmt_num(y + size)),
        format!("L {} {}", fmt_num(x + size), fmt_num(y - size)),
    ]
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_rect_closes() {
        let d = rounded_rect(0.0, 0.0, 10.0, 15.0, 1.5);
        assert!(d.starts_with("M 0 1.5"));
        assert!(d.ends_with('z'));
        assert_eq!(d.matches('a').count(), 4);
    }

    #[test]
    fn scalloped_circle_point_count() {
        let d = scalloped_circle((0.0, 0.0), 3.4, 3.6, 18);
        // 18 bumps -> 72 vertices: one M plus 71 Ls.
        assert_eq!(d.matches('L').count(), 71);
        assert!(d.ends_with('z'));
    }

    #[test]
    fn lobed_circle_rejects_bad_geometry() {
        assert!(lobed_circle((0.0, 0.0), 5.0, 4.0, 6, 0.7, 0.12, 0.0).is_err());
        assert!(lobed_circle((0.0, 0.0), 4.0, 5.0, 6, 0.9, 0.2, 0.0).is_err());
        assert!(lobed_circle((0.0, 0.0), 4.0, 5.0, 6, 0.7, 0.12, 0.0).is_ok());
    }

    #[test]
    fn lobed_circle_has_one_arc_per_lobe() {
        let d = lobed_circle((0.0, 0.0), 5.0, 5.5, 6, 0.7, 0.12, -1.0).unwrap();
        assert_eq!(d.matches('A').count(), 6);
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn stepped_ring_gap_drops_one_step() {
        let closed = stepped_ring((0.0, 0.0), 5.5, 5.0, 6, 0.7, 0.0, false);
        let open = stepped_ring((0.0, 0.0), 5.5, 5.0, 6, 0.7, 0.0, true);
        assert_eq!(closed.matches('A').count(), 6);
        assert_eq!(open.matches('A').count(), 6);
        assert!(closed.matches('L').count() > open.matches('L').count());
    }

    #[test]
    fn drill_marker_is_two_strokes() {
        let d = drill_marker(2.0, 3.0, 1.0);
        assert_eq!(d, "M 2 2 L 2 4 M 1 3 L 3 3");
    }
}

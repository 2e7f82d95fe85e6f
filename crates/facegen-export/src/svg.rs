//! A small SVG element tree with ordered attributes and a string writer.
//!
//! The panel composer builds the whole drawing in memory and serializes it
//! once; there is no incremental output. Attribute order is preserved so
//! generated files diff cleanly between runs.

use indexmap::IndexMap;

/// Formats a float the way the rest of the toolchain expects: shortest
/// round-trip representation with a trailing `.0` stripped.
#[must_use]
pub fn fmt_num(v: f64) -> String {
    let v = if v.abs() < 1e-9 { 0.0 } else { v };
    let mut buf = ryu::Buffer::new();
    let s = buf.format(v);
    s.strip_suffix(".0").unwrap_or(s).to_string()
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// One SVG element: tag, ordered attributes, children, optional text.
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    attrs: IndexMap<String, String>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: IndexMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    #[must_use]
    pub fn group() -> Self {
        Self::new("g")
    }

    #[must_use]
    pub fn circle(center: (f64, f64), r: f64) -> Self {
        Self::new("circle")
            .attr("cx", fmt_num(center.0))
            .attr("cy", fmt_num(center.1))
            .attr("r", fmt_num(r))
    }

    #[must_use]
    pub fn ellipse(center: (f64, f64), radii: (f64, f64)) -> Self {
        Self::new("ellipse")
            .attr("cx", fmt_num(center.0))
            .attr("cy", fmt_num(center.1))
            .attr("rx", fmt_num(radii.0))
            .attr("ry", fmt_num(radii.1))
    }

    #[must_use]
    pub fn rect(insert: (f64, f64), size: (f64, f64)) -> Self {
        Self::new("rect")
            .attr("x", fmt_num(insert.0))
            .attr("y", fmt_num(insert.1))
            .attr("width", fmt_num(size.0))
            .attr("height", fmt_num(size.1))
    }

    #[must_use]
    pub fn line(start: (f64, f64), end: (f64, f64)) -> Self {
        Self::new("line")
            .attr("x1", fmt_num(start.0))
            .attr("y1", fmt_num(start.1))
            .attr("x2", fmt_num(end.0))
            .attr("y2", fmt_num(end.1))
    }

    #[must_use]
    pub fn path(d: impl Into<String>) -> Self {
        Self::new("path").attr("d", d)
    }

    #[must_use]
    pub fn text(content: impl Into<String>, insert: (f64, f64)) -> Self {
        let mut el = Self::new("text")
            .attr("x", fmt_num(insert.0))
            .attr("y", fmt_num(insert.1));
        el.text = Some(content.into());
        el
    }

    #[must_use]
    pub fn style(content: impl Into<String>) -> Self {
        let mut el = Self::new("style");
        el.text = Some(content.into());
        el
    }

    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn attr_num(self, key: impl Into<String>, value: f64) -> Self {
        self.attr(key, fmt_num(value))
    }

    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    #[must_use]
    pub fn fill(self, paint: impl Into<String>) -> Self {
        self.attr("fill", paint)
    }

    #[must_use]
    pub fn stroke(self, paint: impl Into<String>) -> Self {
        self.attr("stroke", paint)
    }

    #[must_use]
    pub fn stroke_width(self, width: f64) -> Self {
        self.attr_num("stroke-width", width)
    }

    #[must_use]
    pub fn font_size(self, size: f64) -> Self {
        self.attr_num("font-size", size)
    }

    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        self.attr(
            "transform",
            format!("translate({},{})", fmt_num(dx), fmt_num(dy)),
        )
    }

    #[must_use]
    pub fn rotate_about(self, degrees: f64, center: (f64, f64)) -> Self {
        self.attr(
            "transform",
            format!(
                "rotate({} {} {})",
                fmt_num(degrees),
                fmt_num(center.0),
                fmt_num(center.1)
            ),
        )
    }

    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            // A <style> block holds CSS, not markup-escaped character data.
            if self.tag == "style" {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        for child in &self.children {
            child.write_into(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

/// A gradient stop. Offsets outside 0..=1 are passed through unchanged;
/// renderers clamp them, which the cosmetic shading relies on.
#[derive(Debug, Clone)]
pub struct Stop {
    pub offset: f64,
    pub color: String,
    pub opacity: Option<f64>,
}

impl Stop {
    #[must_use]
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
            opacity: None,
        }
    }

    #[must_use]
    pub fn with_opacity(offset: f64, color: impl Into<String>, opacity: f64) -> Self {
        Self {
            offset,
            color: color.into(),
            opacity: Some(opacity),
        }
    }

    fn into_element(self) -> Element {
        let mut el = Element::new("stop")
            .attr("offset", fmt_num(self.offset))
            .attr("stop-color", self.color);
        if let Some(opacity) = self.opacity {
            el = el.attr("stop-opacity", fmt_num(opacity));
        }
        el
    }
}

/// Reference to a paint server registered in the defs block.
#[derive(Debug, Clone)]
pub struct Paint(String);

impl Paint {
    #[must_use]
    pub fn server(&self) -> String {
        format!("url(#{})", self.0)
    }
}

/// The `<defs>` block plus its id allocator. Components register gradients,
/// clip paths, and filters here while emitting cosmetic geometry.
#[derive(Debug, Clone, Default)]
pub struct Defs {
    items: Vec<Element>,
    next_id: u32,
}

impl Defs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    pub fn push(&mut self, element: Element) {
        self.items.push(element);
    }

    pub fn linear_gradient(&mut self, start: (f64, f64), end: (f64, f64), stops: Vec<Stop>) -> Paint {
        let id = self.alloc("grad");
        let mut el = Element::new("linearGradient")
            .id(id.clone())
            .attr("x1", fmt_num(start.0))
            .attr("y1", fmt_num(start.1))
            .attr("x2", fmt_num(end.0))
            .attr("y2", fmt_num(end.1));
        for stop in stops {
            el = el.child(stop.into_element());
        }
        self.items.push(el);
        Paint(id)
    }

    pub fn radial_gradient(&mut self, center: (f64, f64), r: f64, stops: Vec<Stop>) -> Paint {
        let id = self.alloc("grad");
        let mut el = Element::new("radialGradient")
            .id(id.clone())
            .attr("cx", fmt_num(center.0))
            .attr("cy", fmt_num(center.1))
            .attr("r", fmt_num(r));
        for stop in stops {
            el = el.child(stop.into_element());
        }
        self.items.push(el);
        Paint(id)
    }

    /// Registers a clip path and returns its id for `clip-path="url(#id)"`.
    pub fn clip_path(&mut self, content: Element) -> String {
        let id = self.alloc("clip");
        self.items.push(Element::new("clipPath").id(id.clone()).child(content));
        id
    }

    /// Registers a Gaussian blur filter and returns a `url(#id)` reference.
    pub fn blur_filter(&mut self, std_deviation: f64) -> String {
        let id = self.alloc("filter");
        self.items.push(
            Element::new("filter").id(id.clone()).child(
                Element::new("feGaussianBlur")
                    .attr("in", "SourceGraphic")
                    .attr("stdDeviation", fmt_num(std_deviation)),
            ),
        );
        format!("url(#{id})")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A complete drawing: physical size in millimeters, viewBox, defs, body.
#[derive(Debug)]
pub struct Document {
    width: f64,
    height: f64,
    viewbox: (f64, f64, f64, f64),
    pub defs: Defs,
    body: Vec<Element>,
}

impl Document {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            viewbox: (0.0, 0.0, width, height),
            defs: Defs::new(),
            body: Vec::new(),
        }
    }

    /// Physical canvas size in millimeters, independent of the viewBox.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn set_viewbox(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.viewbox = (x, y, w, h);
    }

    pub fn push(&mut self, element: Element) {
        self.body.push(element);
    }

    #[must_use]
    pub fn body(&self) -> &[Element] {
        &self.body
    }

    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\" ?>");
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" baseProfile=\"full\" width=\"{w}mm\" height=\"{h}mm\" viewBox=\"{vx} {vy} {vw} {vh}\" version=\"1.1\">",
            w = fmt_num(self.width),
            h = fmt_num(self.height),
            vx = fmt_num(self.viewbox.0),
            vy = fmt_num(self.viewbox.1),
            vw = fmt_num(self.viewbox.2),
            vh = fmt_num(self.viewbox.3),
        ));
        if !self.defs.is_empty() {
            let mut defs = String::from("<defs>");
            for item in &self.defs.items {
                item.write_into(&mut defs);
            }
            defs.push_str("</defs>");
            out.push_str(&defs);
        }
        for element in &self.body {
            element.write_into(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_strips_trailing_zero() {
        assert_eq!(fmt_num(40.3), "40.3");
        assert_eq!(fmt_num(3.0), "3");
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(1e-12), "0");
    }

    #[test]
    fn element_serializes_with_attribute_order() {
        let el = Element::circle((1.0, 2.0), 3.15).fill("black").id("hole");
        let mut out = String::new();
        el.write_into(&mut out);
        assert_eq!(out, "<circle cx=\"1\" cy=\"2\" r=\"3.15\" fill=\"black\" id=\"hole\"/>");
    }

    #[test]
    fn text_is_escaped() {
        let el = Element::text("A<B & C", (0.0, 0.0));
        let mut out = String::new();
        el.write_into(&mut out);
        assert!(out.contains("A&lt;B &amp; C"));
    }

    #[test]
    fn document_wraps_defs_and_body() {
        let mut doc = Document::new(10.0, 20.0);
        let paint = doc.defs.linear_gradient(
            (1.0, 0.0),
            (0.0, 1.0),
            vec![Stop::new(0.0, "white"), Stop::new(1.0, "black")],
        );
        doc.push(Element::circle((0.0, 0.0), 1.0).fill(paint.server()));
        let svg = doc.to_svg();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("width=\"10mm\""));
        assert!(svg.contains("viewBox=\"0 0 10 20\""));
        assert!(svg.contains("<defs><linearGradient id=\"grad1\""));
        assert!(svg.contains("fill=\"url(#grad1)\""));
    }

    #[test]
    fn gradient_ids_are_sequential() {
        let mut defs = Defs::new();
        let a = defs.linear_gradient((0.0, 0.0), (1.0, 1.0), vec![]);
        let b = defs.radial_gradient((0.5, 0.5), 0.5, vec![]);
        assert_eq!(a.server(), "url(#grad1)");
        assert_eq!(b.server(), "url(#grad2)");
    }
}

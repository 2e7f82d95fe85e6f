//! The panel container: coordinate frame, standard furniture (mounting
//! holes, title, logo, outline), the four output layers, and the save
//! pipeline that hands the serialized file to the external editor.

use std::path::{Path, PathBuf};

use facegen_core::{inches, HP_MM};
use facegen_export::editor::flatten_svg;
use facegen_export::font::{font_face_css, font_src, DEFAULT_CACHE_FILE, FONT_FALLBACK};
use facegen_export::minify::minify_in_place;
use facegen_export::postprocess::apply_post_ops;
use facegen_export::{Defs, Document, Element, PostOp};
use tracing::debug;

use crate::component::Component;
use crate::error::PanelError;

/// Brand mark drawn near the bottom of every panel, in a 100-unit-wide
/// coordinate space scaled down to the panel.
pub const LOGO_PATH: &str = "M 23.273995,0 C 10.46956,0 0,10.46956 0,23.273995 0,36.078431 10.46956,46.54799 23.273995,46.54799 c 6.2817,0 11.379649,-2.548635 15.730632,-6.245496 1.538657,-1.307338 3.076198,-2.787732 4.658303,-4.38762 l -0.0086,-5.869298 -5.989355,0.0026 c -1.483874,1.505733 -2.846746,2.828266 -4.080397,3.876451 -3.512556,2.984484 -6.049447,4.254142 -10.310608,4.254142 -8.281306,0 -14.9047822,-6.623476 -14.9047822,-14.904783 0,-8.281306 6.6234762,-14.9047823 14.9047822,-14.9047823 4.261161,0 6.798052,1.2696585 10.310608,4.2541413 1.233651,1.048185 2.596523,2.370718 4.080397,3.876452 l 5.989355,0.0026 0.0086,-5.869304 C 42.080825,9.0332294 40.543284,7.5528356 39.004627,6.2454977 34.653644,2.5486366 29.555695,0 23.273995,0 Z M 76.724807,0 C 70.443279,1.0197146e-4 65.345444,2.5487105 60.99455,6.2454977 59.387003,7.6113677 57.781031,9.1642634 56.123352,10.847502 H 68.695628 C 71.17209,9.1299217 73.43594,8.3692721 76.724807,8.369213 h 3.82e-4 c 6.200192,0 11.470469,3.712943 13.728089,9.054499 l -6.041554,-0.07531 -8.585089,-3.079684 -28.740996,3.81e-4 v 5.645584 H 24.399983 v 6.718636 h 22.685649 v 5.645592 l 28.740995,3.82e-4 8.58509,-3.079684 6.041553,-0.07531 c -2.25762,5.341544 -7.527894,9.054489 -13.728089,9.054489 h -3.82e-4 c -3.288867,-5.9e-5 -5.552715,-0.760709 -8.029179,-2.47829 H 56.123352 c 1.657679,1.68324 3.263651,3.236135 4.871198,4.602006 4.350894,3.696786 9.448729,6.245395 15.730257,6.245496 h 3.82e-4 C 89.52963,46.548 99.999184,36.07844 99.999184,23.274005 99.999176,10.46956 89.52962,0 76.725181,0 Z m -59.711596,19.295384 -2.890653,3.978611 2.890653,3.978612 4.677319,-1.51971 v -4.917803 z";

/// Fixed Eurorack panel height in millimeters.
pub const PANEL_HEIGHT: f64 = 128.5;

const MOUNTING_HOLE_D: f64 = 3.4;
const MOUNTING_HOLE_Y: f64 = 3.0;

/// How the panel boundary is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineMode {
    Hidden,
    /// Short tick marks at the four corners.
    CornerTicks,
    /// Full boundary rectangle.
    Full,
    /// Boundary rectangle grown past the panel edge, with the canvas
    /// expanded to keep it visible. Used for print-and-cut outlines.
    Expanded,
}

/// Where the stencil font comes from at save time.
#[derive(Debug, Clone)]
pub enum FontSource {
    /// Fetch the web font, caching it beside the given path. Debug renders
    /// skip the fetch and fall back to a local font.
    Web { cache_path: PathBuf },
    /// Use the locally installed font only.
    Local,
}

impl Default for FontSource {
    fn default() -> Self {
        FontSource::Web {
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModuleOptions {
    /// Shifts every added component down the panel.
    pub global_y_offset: f64,
    pub title: Option<String>,
    pub title_size: f64,
    /// Overrides the default title baseline.
    pub title_offset: Option<f64>,
    pub hide_logo: bool,
    /// Debug render: measurement grid, calibration markers, no editor pass.
    pub debug: bool,
    /// Display render: cosmetic illustration layer.
    pub cosmetics: bool,
    pub drill_markers: bool,
    /// `None` selects an outline to match the render mode.
    pub outline: Option<OutlineMode>,
    pub font: FontSource,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            global_y_offset: 0.0,
            title: None,
            title_size: 5.0,
            title_offset: None,
            hide_logo: false,
            debug: false,
            cosmetics: false,
            drill_markers: true,
            outline: None,
            font: FontSource::default(),
        }
    }
}

#[derive(Debug, Default)]
struct Layer {
    /// Frame-level geometry in absolute panel coordinates.
    frame: Vec<Element>,
    /// Per-component groups inside the `*_offset` subgroup.
    content: Vec<Element>,
}

/// A faceplate under construction. Write-once: components accumulate until
/// [`Module::save`] consumes the panel.
pub struct Module {
    hp: u32,
    width: f64,
    height: f64,
    opts: ModuleOptions,
    outline_mode: OutlineMode,
    defs: Defs,
    outline: Vec<Element>,
    stencil: Layer,
    holes: Layer,
    drill_markers: Option<Layer>,
    debug_layer: Option<Layer>,
    cosmetics: Option<Layer>,
    editor_actions: Vec<String>,
    post_ops: Vec<PostOp>,
    component_count: usize,
}

impl Module {
    #[must_use]
    pub fn new(hp: u32, opts: ModuleOptions) -> Self {
        let width = panel_width(hp);
        let height = PANEL_HEIGHT;

        let outline_mode = opts.outline.unwrap_or(if opts.cosmetics {
            OutlineMode::Hidden
        } else if opts.debug {
            OutlineMode::Full
        } else {
            OutlineMode::CornerTicks
        });

        let mut module = Self {
            hp,
            width,
            height,
            outline_mode,
            defs: Defs::new(),
            outline: Vec::new(),
            stencil: Layer::default(),
            holes: Layer::default(),
            drill_markers: opts.drill_markers.then(Layer::default),
            debug_layer: opts.debug.then(Layer::default),
            cosmetics: opts.cosmetics.then(Layer::default),
            editor_actions: Vec::new(),
            post_ops: Vec::new(),
            component_count: 0,
            opts,
        };

        module.draw_mounting_holes();
        module.draw_title();
        module.draw_logo();
        module.draw_outline();
        module.draw_debug_grid();
        module
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    #[must_use]
    pub fn defs_mut(&mut self) -> &mut Defs {
        &mut self.defs
    }

    fn draw_mounting_holes(&mut self) {
        let spacing = inches(0.2) * f64::from(self.hp.saturating_sub(3));
        let center = self.width / 2.0;
        let x1 = center - spacing / 2.0;

        let screw_hole = |x: f64, y: f64, holes: &mut Layer, drill: &mut Option<Layer>| {
            holes
                .frame
                .push(Element::circle((x, y), MOUNTING_HOLE_D / 2.0).stroke("none"));
            if let Some(drill) = drill {
                drill.frame.push(
                    Element::path(facegen_export::path::drill_marker(x, y, 1.0)).stroke_width(0.2),
                );
            }
        };

        screw_hole(x1, MOUNTING_HOLE_Y, &mut self.holes, &mut self.drill_markers);
        screw_hole(
            x1,
            self.height - MOUNTING_HOLE_Y,
            &mut self.holes,
            &mut self.drill_markers,
        );

        // Narrow panels only get the left-hand pair.
        if self.hp > 6 {
            let x2 = x1 + spacing;
            screw_hole(x2, MOUNTING_HOLE_Y, &mut self.holes, &mut self.drill_markers);
            screw_hole(
                x2,
                self.height - MOUNTING_HOLE_Y,
                &mut self.holes,
                &mut self.drill_markers,
            );
        }
    }

    fn draw_title(&mut self) {
        let Some(title) = self.opts.title.clone() else {
            return;
        };
        let mut baseline = if self.hp < 8 { 10.0 } else { 6.3 };
        if let Some(offset) = self.opts.title_offset {
            baseline = offset;
        }
        self.stencil.frame.push(
            Element::text(title, (self.width / 2.0, baseline))
                .font_size(self.opts.title_size)
                .attr("text-anchor", "middle"),
        );
    }

    fn draw_logo(&mut self) {
        if self.opts.hide_logo {
            return;
        }
        let logo_width = self.width.min(15.0);
        let logo_y = if self.hp < 8 {
            self.height - 12.0
        } else {
            self.height - 9.0
        };
        self.stencil.frame.push(Element::path(LOGO_PATH).attr(
            "transform",
            format!(
                "translate({}, {}) scale({})",
                facegen_export::svg::fmt_num(self.width / 2.0 - logo_width / 2.0),
                facegen_export::svg::fmt_num(logo_y),
                facegen_export::svg::fmt_num(logo_width / 100.0)
            ),
        ));
    }

    fn draw_outline(&mut self) {
        match self.outline_mode {
            OutlineMode::Hidden => {}
            OutlineMode::CornerTicks => {
                let length = 3.0;
                let (w, h) = (self.width, self.height);
                let ticks = [
                    ((0.0, -length), (0.0, length)),
                    ((-length, 0.0), (length, 0.0)),
                    ((w + length, 0.0), (w - length, 0.0)),
                    ((w, -length), (w, length)),
                    ((0.0, h + length), (0.0, h - length)),
                    ((-length, h), (length, h)),
                    ((w, h + length), (w, h - length)),
                    ((w + length, h), (w - length, h)),
                ];
                for (start, end) in ticks {
                    self.outline
                        .push(Element::line(start, end).stroke_width(1.0).stroke("black"));
                }
            }
            OutlineMode::Full => {
                self.outline.push(
                    Element::rect((0.0, 0.0), (self.width, self.height)).stroke_width(1.0),
                );
            }
            OutlineMode::Expanded => {
                self.outline.push(
                    Element::rect((-0.25, -0.25), (self.width + 0.5, self.height + 0.5))
                        .stroke_width(0.5),
                );
            }
        }
    }

    fn draw_debug_grid(&mut self) {
        let Some(debug) = &mut self.debug_layer else {
            return;
        };
        let center = self.width / 2.0;
        let y0 = self.opts.global_y_offset;
        let grid_width = inches(f64::from(self.hp) * 0.2);

        debug.frame.push(
            Element::line((center, 0.0), (center, self.height))
                .stroke("green")
                .attr("stroke-dasharray", "4,3")
                .stroke_width(0.5),
        );

        let hp = i64::from(self.hp);
        for x in -hp..hp {
            let gx = center + x as f64 * inches(0.1);
            let width = if x % 5 == 0 { 0.2 } else { 0.1 };
            debug
                .frame
                .push(Element::line((gx, y0), (gx, y0 + 100.0)).stroke_width(width));
        }
        let rows = (100.0 / inches(0.1)) as i64 + 1;
        for y in 0..rows {
            let gy = y as f64 * inches(0.1) + y0;
            let width = if y % 5 == 0 { 0.2 } else { 0.1 };
            debug
                .frame
                .push(Element::line((0.0, gy), (grid_width, gy)).stroke_width(width));
        }

        // Mounting-rail keepout bands.
        for band_y in [0.0, self.height - inches(0.4)] {
            debug.frame.push(
                Element::rect((0.0, band_y), (grid_width, inches(0.4)))
                    .attr_num("fill-opacity", 0.5)
                    .fill("cyan")
                    .stroke_width(0.0),
            );
        }
    }

    /// Adds a component, composing its geometry into every active layer.
    /// Each active layer gains exactly one translated group per component;
    /// a fabrication hole is skipped only when cosmetics are shown and the
    /// component's illustration covers it.
    pub fn add(&mut self, component: &dyn Component) -> Result<(), PanelError> {
        let index = self.component_count;
        self.component_count += 1;
        let (px, py) = component.position();

        let wrap = |children: Vec<Element>| {
            let mut group = Element::group().translate(px, py);
            for child in children {
                group.push(child);
            }
            group
        };

        if self.cosmetics.is_none() || component.cosmetic_holes() {
            self.holes.content.push(wrap(component.draw_holes()));
        }

        if let Some(drill) = &mut self.drill_markers {
            drill.content.push(wrap(component.draw_drill_markers()));
        }

        let stencil = component.draw_stencil(index);
        self.stencil.content.push(wrap(stencil.elements));
        self.editor_actions.extend(stencil.editor_actions);
        self.post_ops.extend(stencil.post_ops);

        if let Some(debug) = &mut self.debug_layer {
            debug.content.push(wrap(component.draw_debug()));
        }

        if self.cosmetics.is_some() {
            let elements = component.draw_cosmetics(&mut self.defs)?;
            if let Some(cosmetics) = &mut self.cosmetics {
                cosmetics.content.push(wrap(elements));
            }
        }

        Ok(())
    }

    /// Escape hatch: inject one raw element into the stencil layer, in the
    /// offset coordinate frame. Used for connecting traces and one-off art
    /// the component model cannot express.
    pub fn draw(&mut self, element: Element) {
        self.stencil.content.push(element);
    }

    fn offset_group(&self, id: &str, layer: &Layer) -> Vec<Element> {
        let mut children: Vec<Element> = layer.frame.clone();
        let mut offset = Element::group()
            .id(format!("{id}_offset"))
            .translate(self.width / 2.0, self.opts.global_y_offset);
        for child in layer.content.clone() {
            offset.push(child);
        }
        children.push(offset);
        children
    }

    fn build_document(&self, font_source: &str) -> Document {
        let expanded = self.outline_mode == OutlineMode::Expanded;
        let mut doc = if expanded {
            let mut doc = Document::new(self.width + 1.0, self.height + 1.0);
            doc.set_viewbox(-0.5, -0.5, self.width + 1.0, self.height + 1.0);
            doc
        } else {
            Document::new(self.width, self.height)
        };

        doc.defs = self.defs.clone();
        doc.defs
            .push(Element::style(font_face_css(font_source)).id("font-style"));

        doc.push(
            Element::rect((0.0, 0.0), (self.width, self.height))
                .fill("white")
                .id("background"),
        );

        let mut outline_group = Element::group().id("outline").fill("none").stroke("black");
        for el in self.outline.clone() {
            outline_group.push(el);
        }
        doc.push(outline_group);

        let mut stencil_group = Element::group()
            .id("stencil")
            .attr("font-family", "Ubuntu")
            .font_size(3.0);
        for el in self.offset_group("stencil", &self.stencil) {
            stencil_group.push(el);
        }
        doc.push(stencil_group);

        let mut holes_group = Element::group()
            .id("throughholes")
            .fill("black")
            .stroke("none");
        for el in self.offset_group("throughholes", &self.holes) {
            holes_group.push(el);
        }
        doc.push(holes_group);

        if let Some(drill) = &self.drill_markers {
            let mut group = Element::group().id("drill_markers").stroke("white");
            for el in self.offset_group("drill_markers", drill) {
                group.push(el);
            }
            doc.push(group);
        }

        if let Some(debug_layer) = &self.debug_layer {
            let mut group = Element::group().id("debug").fill("red").stroke("red");
            for el in self.offset_group("debug", debug_layer) {
                group.push(el);
            }
            doc.push(group);
        }

        if let Some(cosmetics) = &self.cosmetics {
            let mut group = Element::group().id("cosmetics");
            for el in self.offset_group("cosmetics", cosmetics) {
                group.push(el);
            }
            doc.push(group);
        }

        doc
    }

    /// Renders the panel with the local fallback font, without touching the
    /// filesystem or the network. Intended for previews and tests.
    #[must_use]
    pub fn render(&self) -> Document {
        self.build_document(FONT_FALLBACK)
    }

    /// Serializes the panel and, outside debug mode, runs the external
    /// editor flatten, the deferred post-ops, and the optional minifier.
    /// Consumes the panel: a saved file is never edited again.
    pub fn save(self, path: &Path) -> Result<(), PanelError> {
        let font_source = match (&self.opts.font, self.opts.debug) {
            (FontSource::Local, _) | (_, true) => FONT_FALLBACK.to_string(),
            (FontSource::Web { cache_path }, false) => font_src(cache_path),
        };

        let doc = self.build_document(&font_source);
        std::fs::write(path, doc.to_svg()).map_err(|source| PanelError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        if self.opts.debug {
            debug!("debug render, skipping editor and post-processing");
            return Ok(());
        }

        flatten_svg(path, &self.editor_actions.concat())?;

        let saved = std::fs::read_to_string(path).map_err(|source| PanelError::Reread {
            path: path.to_path_buf(),
            source,
        })?;
        let mut ops = self.post_ops.clone();
        ops.push(PostOp::RemoveElementById {
            id: "font-style".to_string(),
        });
        let cleaned = apply_post_ops(&saved, &ops)?;
        std::fs::write(path, cleaned).map_err(|source| PanelError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        minify_in_place(path)?;
        Ok(())
    }
}

/// Panel width in millimeters: the HP span minus a 0.3 mm manufacturing
/// tolerance, truncated to one decimal.
#[must_use]
pub fn panel_width(hp: u32) -> f64 {
    ((f64::from(hp) * HP_MM) * 10.0 - 3.0).floor() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jack::JackSocket;
    use crate::led::Led;

    fn find_by_id<'a>(elements: &'a [Element], id: &str) -> Option<&'a Element> {
        for el in elements {
            if el.get_attr("id") == Some(id) {
                return Some(el);
            }
            if let Some(found) = find_by_id(el.children(), id) {
                return Some(found);
            }
        }
        None
    }

    #[test]
    fn width_formula_is_exact() {
        assert_eq!(panel_width(8), 40.3);
        assert_eq!(panel_width(4), 20.0);
        assert_eq!(panel_width(20), 101.3);
    }

    #[test]
    fn narrow_panels_get_two_mounting_holes() {
        let narrow = Module::new(6, ModuleOptions::default());
        assert_eq!(narrow.holes.frame.len(), 2);
        let wide = Module::new(8, ModuleOptions::default());
        assert_eq!(wide.holes.frame.len(), 4);
    }

    #[test]
    fn each_component_adds_one_group_per_active_layer() {
        let mut module = Module::new(8, ModuleOptions::default());
        module.add(&JackSocket::new(0.0, 20.0, "A", false)).unwrap();
        module.add(&JackSocket::new(0.0, 40.0, "B", true)).unwrap();
        module.add(&Led::new(0.0, 60.0)).unwrap();

        assert_eq!(module.holes.content.len(), 3);
        assert_eq!(module.stencil.content.len(), 3);
        assert_eq!(module.drill_markers.as_ref().unwrap().content.len(), 3);
        assert!(module.debug_layer.is_none());
        assert!(module.cosmetics.is_none());
    }

    #[test]
    fn cosmetic_mode_skips_covered_holes() {
        let opts = ModuleOptions {
            cosmetics: true,
            drill_markers: false,
            ..ModuleOptions::default()
        };
        let mut module = Module::new(8, opts);
        module.add(&JackSocket::new(0.0, 20.0, "A", false)).unwrap();
        module.add(&Led::new(0.0, 60.0)).unwrap();

        // The LED's illustration covers its hole.
        assert_eq!(module.holes.content.len(), 1);
        assert_eq!(module.cosmetics.as_ref().unwrap().content.len(), 2);
    }

    #[test]
    fn inactive_layers_are_absent_from_the_document() {
        let module = Module::new(8, ModuleOptions::default());
        let doc = module.render();
        assert!(find_by_id(doc.body(), "throughholes").is_some());
        assert!(find_by_id(doc.body(), "drill_markers").is_some());
        assert!(find_by_id(doc.body(), "debug").is_none());
        assert!(find_by_id(doc.body(), "cosmetics").is_none());
    }

    #[test]
    fn layers_nest_offset_groups() {
        let opts = ModuleOptions {
            global_y_offset: 13.0,
            ..ModuleOptions::default()
        };
        let mut module = Module::new(8, opts);
        module.add(&JackSocket::new(0.0, 20.0, "In", false)).unwrap();
        let doc = module.render();

        let offset = find_by_id(doc.body(), "throughholes_offset").unwrap();
        assert_eq!(offset.get_attr("transform"), Some("translate(20.15,13)"));
        assert_eq!(offset.children().len(), 1);
    }

    #[test]
    fn title_and_logo_go_to_the_stencil_frame() {
        let opts = ModuleOptions {
            title: Some("Drift".to_string()),
            ..ModuleOptions::default()
        };
        let module = Module::new(8, opts);
        // Title text plus logo path.
        assert_eq!(module.stencil.frame.len(), 2);

        let bare = Module::new(8, ModuleOptions {
            hide_logo: true,
            ..ModuleOptions::default()
        });
        assert!(bare.stencil.frame.is_empty());
    }

    #[test]
    fn expanded_outline_grows_the_canvas() {
        let opts = ModuleOptions {
            outline: Some(OutlineMode::Expanded),
            ..ModuleOptions::default()
        };
        let module = Module::new(8, opts);
        let svg = module.render().to_svg();
        assert!(svg.contains("viewBox=\"-0.5 -0.5 41.3 129.5\""));
        assert!(svg.contains("width=\"41.3mm\""));
    }

    #[test]
    fn outline_mode_tracks_render_mode() {
        let debug = Module::new(8, ModuleOptions {
            debug: true,
            ..ModuleOptions::default()
        });
        assert_eq!(debug.outline_mode, OutlineMode::Full);

        let display = Module::new(8, ModuleOptions {
            cosmetics: true,
            ..ModuleOptions::default()
        });
        assert_eq!(display.outline_mode, OutlineMode::Hidden);

        let stencil = Module::new(8, ModuleOptions::default());
        assert_eq!(stencil.outline_mode, OutlineMode::CornerTicks);
        // Corner ticks: eight short lines.
        assert_eq!(stencil.outline.len(), 8);
    }

    #[test]
    fn output_jack_schedules_editor_work() {
        let mut module = Module::new(8, ModuleOptions::default());
        module.add(&JackSocket::new(0.0, 20.0, "Out", true)).unwrap();
        assert_eq!(module.editor_actions.len(), 1);
        assert_eq!(
            module.post_ops,
            vec![PostOp::StripStyleAttr {
                id: "jack_bg_0".to_string()
            }]
        );
    }
}

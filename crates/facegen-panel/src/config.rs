//! Declarative panel descriptions.
//!
//! A panel YAML file names the module geometry and lists its components;
//! it covers the declarative subset of the library API. Coordinates are
//! millimeters in the panel's offset frame.

use facegen_core::Rotation;
use serde::Deserialize;

use crate::button::{Button, ButtonKind};
use crate::component::Component;
use crate::error::PanelError;
use crate::jack::{JackKind, JackSocket};
use crate::led::Led;
use crate::module::{Module, ModuleOptions, OutlineMode};
use crate::oled::Oled;
use crate::pot::{PotColor, PotStyle, Potentiometer};
use crate::switch::Switch;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelConfig {
    pub hp: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_title_size")]
    pub title_size: f64,
    #[serde(default)]
    pub title_offset: Option<f64>,
    #[serde(default)]
    pub global_y_offset: f64,
    #[serde(default)]
    pub hide_logo: bool,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

fn default_title_size() -> f64 {
    5.0
}

impl PanelConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Builds a module in the given render mode and populates it with the
    /// configured components.
    pub fn build(&self, mode: RenderMode, outline: Option<OutlineMode>) -> Result<Module, PanelError> {
        let opts = ModuleOptions {
            global_y_offset: self.global_y_offset,
            title: self.title.clone(),
            title_size: self.title_size,
            title_offset: self.title_offset,
            hide_logo: self.hide_logo,
            debug: mode == RenderMode::Debug,
            cosmetics: mode == RenderMode::Display,
            drill_markers: mode == RenderMode::Stencil,
            outline,
            ..ModuleOptions::default()
        };
        let mut module = Module::new(self.hp, opts);
        for config in &self.components {
            let component = config.build();
            module.add(component.as_ref())?;
        }
        Ok(module)
    }
}

/// Which layers the generated file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Fabrication output: holes, stencil, drill markers.
    #[default]
    Stencil,
    /// Assembled-look preview with the cosmetic layer.
    Display,
    /// Measurement grid and calibration markers; no external editor pass.
    Debug,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ComponentConfig {
    Jack {
        x: f64,
        y: f64,
        #[serde(default)]
        label: String,
        #[serde(default)]
        output: bool,
        #[serde(default)]
        rotation: Rotation,
        #[serde(default)]
        label_above: bool,
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        text_offset: Option<(f64, f64)>,
        #[serde(default)]
        centered: bool,
        #[serde(default)]
        quarter_inch: bool,
    },
    Potentiometer {
        x: f64,
        y: f64,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        color: PotColor,
        #[serde(default)]
        style: PotStyle,
        #[serde(default)]
        rotation: Rotation,
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        text_offset: Option<f64>,
    },
    Switch {
        x: f64,
        y: f64,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        left_text: Option<String>,
        #[serde(default)]
        right_text: Option<String>,
        #[serde(default)]
        rotation: Rotation,
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        small: bool,
    },
    Led {
        x: f64,
        y: f64,
        #[serde(default = "default_led_color")]
        color: String,
        #[serde(default)]
        rotation: Rotation,
        #[serde(default)]
        small: bool,
    },
    Button {
        x: f64,
        y: f64,
        #[serde(default)]
        kind: ButtonVariant,
        #[serde(default)]
        rotation: Rotation,
    },
    Oled {
        x: f64,
        y: f64,
        #[serde(default)]
        rotation: Option<Rotation>,
        #[serde(default)]
        spi: bool,
    },
}

fn default_led_color() -> String {
    "red".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
    #[default]
    Generic,
    Tl1265,
    Tl1105sp,
    D6r30,
}

impl From<ButtonVariant> for ButtonKind {
    fn from(value: ButtonVariant) -> Self {
        match value {
            ButtonVariant::Generic => ButtonKind::Generic,
            ButtonVariant::Tl1265 => ButtonKind::Tl1265,
            ButtonVariant::Tl1105sp => ButtonKind::Tl1105Sp,
            ButtonVariant::D6r30 => ButtonKind::D6R30,
        }
    }
}

impl ComponentConfig {
    #[must_use]
    pub fn build(&self) -> Box<dyn Component> {
        match self.clone() {
            ComponentConfig::Jack {
                x,
                y,
                label,
                output,
                rotation,
                label_above,
                font_size,
                text_offset,
                centered,
                quarter_inch,
            } => {
                let kind = if quarter_inch {
                    JackKind::QuarterInch
                } else if centered {
                    JackKind::Centered
                } else {
                    JackKind::Standard
                };
                let mut jack = JackSocket::with_kind(x, y, label, output, kind).rotated(rotation);
                if label_above {
                    jack = jack.label_above();
                }
                if let Some(size) = font_size {
                    jack = jack.font_size(size);
                }
                if let Some(offset) = text_offset {
                    jack = jack.text_offset(offset);
                }
                Box::new(jack)
            }
            ComponentConfig::Potentiometer {
                x,
                y,
                label,
                color,
                style,
                rotation,
                font_size,
                text_offset,
            } => {
                let mut pot = Potentiometer::new(x, y)
                    .styled(style)
                    .colored(color)
                    .rotated(rotation);
                if let Some(label) = label {
                    pot = pot.labeled(label);
                }
                if let Some(size) = font_size {
                    pot = pot.font_size(size);
                }
                if let Some(offset) = text_offset {
                    pot = pot.text_offset(offset);
                }
                Box::new(pot)
            }
            ComponentConfig::Switch {
                x,
                y,
                label,
                left_text,
                right_text,
                rotation,
                font_size,
                small,
            } => {
                let mut switch = if small {
                    Switch::small(x, y)
                } else {
                    Switch::new(x, y)
                };
                switch = switch.rotated(rotation);
                if let Some(label) = label {
                    switch = switch.labeled(label);
                }
                if let Some(left) = left_text {
                    switch = switch.left_text(left);
                }
                if let Some(right) = right_text {
                    switch = switch.right_text(right);
                }
                if let Some(size) = font_size {
                    switch = switch.font_size(size);
                }
                Box::new(switch)
            }
            ComponentConfig::Led {
                x,
                y,
                color,
                rotation,
                small,
            } => {
                let led = if small { Led::small(x, y) } else { Led::new(x, y) };
                Box::new(led.rotated(rotation).colored(color))
            }
            ComponentConfig::Button { x, y, kind, rotation } => {
                Box::new(Button::with_kind(x, y, kind.into()).rotated(rotation))
            }
            ComponentConfig::Oled { x, y, rotation, spi } => {
                let oled = if spi { Oled::spi(x, y) } else { Oled::new(x, y) };
                match rotation {
                    Some(rotation) => Box::new(oled.rotated(rotation)),
                    None => Box::new(oled),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIFT: &str = r"
hp: 4
title: Drift
title_size: 4.6
global_y_offset: 13
components:
  - type: potentiometer
    x: -2.54
    y: 15.24
    label: Speed
    color: red
  - type: jack
    x: -5.08
    y: 60.96
    centered: true
    rotation: 2
  - type: jack
    x: 5.08
    y: 76.2
    label: Out
    output: true
    centered: true
    rotation: 2
  - type: led
    x: -5.08
    y: 74.93
";

    #[test]
    fn drift_panel_parses_and_builds() {
        let config = PanelConfig::from_yaml_str(DRIFT).unwrap();
        assert_eq!(config.hp, 4);
        assert_eq!(config.components.len(), 4);

        let module = config.build(RenderMode::Stencil, None).unwrap();
        assert_eq!(module.component_count(), 4);
    }

    #[test]
    fn unknown_component_type_is_rejected() {
        let yaml = "hp: 4\ncomponents:\n  - type: encoder\n    x: 0\n    y: 0\n";
        assert!(PanelConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn invalid_rotation_is_rejected() {
        let yaml = "hp: 4\ncomponents:\n  - type: led\n    x: 0\n    y: 0\n    rotation: 7\n";
        assert!(PanelConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = "hp: 4\nwidth: 20\n";
        assert!(PanelConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn debug_mode_activates_debug_layer_only() {
        let config = PanelConfig::from_yaml_str(DRIFT).unwrap();
        let module = config.build(RenderMode::Debug, None).unwrap();
        let svg = module.render().to_svg();
        assert!(svg.contains("id=\"debug\""));
        assert!(!svg.contains("id=\"cosmetics\""));
        assert!(!svg.contains("id=\"drill_markers\""));
    }

    #[test]
    fn display_mode_renders_cosmetics() {
        let config = PanelConfig::from_yaml_str(DRIFT).unwrap();
        let module = config.build(RenderMode::Display, None).unwrap();
        let svg = module.render().to_svg();
        assert!(svg.contains("id=\"cosmetics\""));
        assert!(!svg.contains("id=\"drill_markers\""));
    }
}

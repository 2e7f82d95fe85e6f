//! Eurorack faceplate composition.
//!
//! A [`Module`] owns the panel coordinate frame and four output layers
//! (holes, stencil, drill markers, cosmetics); components are added in
//! z-order and emit geometry relative to their own position. Saving
//! serializes the drawing and runs the external flatten/minify pipeline.

pub mod button;
pub mod component;
pub mod config;
pub mod cosmetics;
pub mod error;
pub mod jack;
pub mod led;
pub mod module;
pub mod oled;
pub mod pot;
pub mod switch;

pub use button::{Button, ButtonKind};
pub use component::{CircleFootprint, Component, Stencil};
pub use config::{ComponentConfig, PanelConfig, RenderMode};
pub use error::PanelError;
pub use jack::{JackKind, JackSocket};
pub use led::Led;
pub use module::{panel_width, FontSource, Module, ModuleOptions, OutlineMode, PANEL_HEIGHT};
pub use oled::{Oled, OledKind};
pub use pot::{PotColor, PotStyle, Potentiometer};
pub use switch::Switch;

//! The build manifest: which modules to build, where outputs go, and how
//! the external tools are launched. KiCad is commonly a flatpak install, so
//! the kikit/kicad-cli defaults wrap the flatpak environment; override them
//! in the manifest for a native install.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BuildError;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub modules: Vec<String>,
    #[serde(default = "default_modules_dir")]
    pub modules_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub tools: Tools,
}

fn default_modules_dir() -> PathBuf {
    PathBuf::from("modules")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("../fm-artifacts")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tools {
    #[serde(default = "default_inkscape")]
    pub inkscape: Vec<String>,
    #[serde(default = "default_kikit")]
    pub kikit: Vec<String>,
    #[serde(default = "default_kicad_cli")]
    pub kicad_cli: Vec<String>,
    #[serde(default = "default_ibom")]
    pub ibom: Vec<String>,
    #[serde(default = "default_cargo")]
    pub cargo: Vec<String>,
    #[serde(default = "default_objcopy")]
    pub objcopy: Vec<String>,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            inkscape: default_inkscape(),
            kikit: default_kikit(),
            kicad_cli: default_kicad_cli(),
            ibom: default_ibom(),
            cargo: default_cargo(),
            objcopy: default_objcopy(),
        }
    }
}

fn default_inkscape() -> Vec<String> {
    vec!["inkscape".to_string()]
}

fn flatpak_kicad(command: &str) -> Vec<String> {
    vec![
        "flatpak".to_string(),
        "run".to_string(),
        "--branch=stable".to_string(),
        "--arch=x86_64".to_string(),
        format!("--command={command}"),
        "org.kicad.KiCad".to_string(),
    ]
}

fn default_kikit() -> Vec<String> {
    let mut cmd = flatpak_kicad("python3");
    cmd.push("-c".to_string());
    cmd.push("from kikit.ui import cli; cli()".to_string());
    cmd
}

fn default_kicad_cli() -> Vec<String> {
    flatpak_kicad("kicad-cli")
}

fn default_ibom() -> Vec<String> {
    flatpak_kicad("../InteractiveHtmlBom/InteractiveHtmlBom/generate_interactive_bom.py")
}

fn default_cargo() -> Vec<String> {
    vec!["cargo".to_string()]
}

fn default_objcopy() -> Vec<String> {
    vec!["avr-objcopy".to_string()]
}

impl Manifest {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let text = std::fs::read_to_string(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|source| BuildError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_manifest_uses_defaults() {
        let manifest = Manifest::from_yaml_str("modules: [Clock, Mixer]").unwrap();
        assert_eq!(manifest.modules, vec!["Clock", "Mixer"]);
        assert_eq!(manifest.modules_dir, PathBuf::from("modules"));
        assert_eq!(manifest.output_dir, PathBuf::from("../fm-artifacts"));
        assert_eq!(manifest.tools.kikit[0], "flatpak");
        assert_eq!(manifest.tools.inkscape, vec!["inkscape"]);
    }

    #[test]
    fn tool_prefixes_are_overridable() {
        let yaml = "modules: [Clock]\ntools:\n  kikit: [kikit]\n";
        let manifest = Manifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.tools.kikit, vec!["kikit"]);
        // Unspecified tools keep their defaults.
        assert_eq!(manifest.tools.kicad_cli[0], "flatpak");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Manifest::from_yaml_str("modules: []\nextra: 1\n").is_err());
    }
}

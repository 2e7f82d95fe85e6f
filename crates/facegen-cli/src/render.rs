use std::path::PathBuf;

use facegen_build::{Builder, Manifest, SystemRunner};
use facegen_build::BuildError;
use facegen_panel::{OutlineMode, PanelConfig, RenderMode};

use crate::error::CliError;

pub fn run_render(
    input: PathBuf,
    output: Option<PathBuf>,
    mode: RenderMode,
    outline: bool,
) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(&input).map_err(|e| {
        CliError::input(format!("Could not read panel {}: {e}", input.display()))
    })?;
    let config = PanelConfig::from_yaml_str(&raw)
        .map_err(|e| CliError::input(format!("Invalid panel {}: {e}", input.display())))?;
    tracing::debug!(
        hp = config.hp,
        components = config.components.len(),
        "parsed panel description"
    );

    let outline = outline.then_some(OutlineMode::Expanded);
    let module = config
        .build(mode, outline)
        .map_err(|e| CliError::processing(e.to_string()))?;

    let out_path = output.unwrap_or_else(|| default_output(&config));
    module
        .save(&out_path)
        .map_err(|e| CliError::processing(e.to_string()))?;

    println!("Wrote {}", out_path.display());
    Ok(())
}

fn default_output(config: &PanelConfig) -> PathBuf {
    let stem = config
        .title
        .as_deref()
        .map_or_else(|| "output".to_string(), |t| t.replace(' ', "_"));
    PathBuf::from(format!("{stem}.svg"))
}

pub fn run_build(manifest_path: PathBuf) -> Result<(), CliError> {
    let manifest = Manifest::load(&manifest_path).map_err(|e| match e {
        BuildError::Io { .. } | BuildError::Manifest { .. } => CliError::input(e.to_string()),
        other => CliError::processing(other.to_string()),
    })?;

    let mut runner = SystemRunner;
    Builder::new(&manifest, &mut runner)
        .build_all()
        .map_err(|e| match e {
            BuildError::PanelConfig { .. } => CliError::input(e.to_string()),
            other => CliError::processing(other.to_string()),
        })
}

//! Per-module build orchestration, ported across the whole artifact set:
//! Gerbers, interactive BOM, schematic PDF, faceplate SVG, firmware hex,
//! and the user manual. Everything runs strictly sequentially; the external
//! CAD tools are not reentrant (Gerber export stages through a fixed local
//! tmp directory).

use std::path::Path;

use facegen_panel::{PanelConfig, RenderMode};
use regex::Regex;
use tracing::debug;

use crate::error::BuildError;
use crate::git::{self, GitDiff};
use crate::manifest::Manifest;
use crate::runner::{ToolCommand, ToolRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Built,
    UpToDate,
}

pub struct Builder<'a> {
    manifest: &'a Manifest,
    runner: &'a mut dyn ToolRunner,
    faceplate_mode: RenderMode,
}

fn log(indent: usize, icon: &str, msg: &str) {
    println!("{}{icon} {msg}", "  ".repeat(indent));
}

impl<'a> Builder<'a> {
    #[must_use]
    pub fn new(manifest: &'a Manifest, runner: &'a mut dyn ToolRunner) -> Self {
        Self {
            manifest,
            runner,
            faceplate_mode: RenderMode::Stencil,
        }
    }

    /// Render mode for faceplate SVGs (debug renders skip the external
    /// editor entirely).
    #[must_use]
    pub fn faceplate_mode(mut self, mode: RenderMode) -> Self {
        self.faceplate_mode = mode;
        self
    }

    pub fn build_all(&mut self) -> Result<(), BuildError> {
        for name in &self.manifest.modules {
            self.build_module(name)?;
        }
        Ok(())
    }

    pub fn build_module(&mut self, name: &str) -> Result<BuildOutcome, BuildError> {
        let module_dir = self.manifest.modules_dir.join(name);
        let out_dir = self.manifest.output_dir.join(name);

        let last = git::last_commit(&out_dir);
        let change = git::has_changed_since(self.runner, &module_dir, last.as_deref())?;
        if !change.changed() {
            return Ok(BuildOutcome::UpToDate);
        }

        match (&change, &last) {
            (GitDiff::ChangeSinceLastCommit, Some(commit)) => log(
                0,
                "📦",
                &format!("Building {name} (last built from #{})", short(commit)),
            ),
            _ => log(0, "📦", &format!("Building {name} (no last commit)")),
        }

        let head = git::head_commit(self.runner)?;
        if git::has_changed_since(self.runner, &module_dir, Some(&head))?.changed() {
            log(1, "⚠️", "Warning: building from untracked changes");
        }

        std::fs::create_dir_all(&out_dir).map_err(|source| BuildError::Io {
            path: out_dir.clone(),
            source,
        })?;

        let lower = name.to_lowercase();
        for pcb_name in [
            format!("{lower}_pcb"),
            format!("{lower}_front_pcb"),
            format!("{lower}_back_pcb"),
            format!("{lower}_faceplate"),
            format!("{lower}_faceplate_pcb"),
        ] {
            let project_dir = module_dir.join("PCBs").join(&pcb_name);
            if project_dir.is_dir() {
                self.build_kicad_project(&project_dir, &out_dir, &pcb_name, last.as_deref())?;
            }
        }

        self.build_faceplate(name, &module_dir, &out_dir, last.as_deref())?;

        if module_dir.join("Firmware").join("Cargo.toml").exists() {
            self.build_firmware(name, &module_dir, &out_dir, last.as_deref())?;
        }

        self.build_manual(name, &module_dir, &out_dir, last.as_deref())?;

        git::write_marker(&out_dir, &head)?;
        Ok(BuildOutcome::Built)
    }

    fn build_kicad_project(
        &mut self,
        src_dir: &Path,
        out_dir: &Path,
        pcb_name: &str,
        last: Option<&str>,
    ) -> Result<(), BuildError> {
        let pcb_file = src_dir.join(format!("{pcb_name}.kicad_pcb"));
        if !pcb_file.exists() {
            return Ok(());
        }
        if !git::has_changed_since(self.runner, src_dir, last)?.changed() {
            return Ok(());
        }
        log(1, "⚙️", &format!("Building KiCad project for {pcb_name}:"));

        log(2, "🛠️", "Exporting GERBERs:");
        // KiCad refuses paths under /tmp, so exports stage through a local
        // tmp directory; sequential execution keeps it collision-free.
        let tmpdir = Path::new("tmp");
        for flavor in ["jlcpcb", "pcbway"] {
            log(3, ">>", flavor);
            self.runner.run_checked(
                &ToolCommand::from_prefix(&self.manifest.tools.kikit)
                    .args(["fab", flavor])
                    .arg(pcb_file.to_string_lossy())
                    .arg(tmpdir.to_string_lossy())
                    .arg("--no-drc"),
            )?;
            let gerber_zip = out_dir.join(format!("{pcb_name}_{flavor}.zip"));
            std::fs::rename(tmpdir.join("gerbers.zip"), &gerber_zip).map_err(|source| {
                BuildError::Io {
                    path: gerber_zip,
                    source,
                }
            })?;
            std::fs::remove_dir_all(tmpdir).map_err(|source| BuildError::Io {
                path: tmpdir.to_path_buf(),
                source,
            })?;
        }

        if !pcb_name.contains("faceplate") {
            log(2, "📑", "Exporting interactive BOM");
            let dest_dir = std::fs::canonicalize(out_dir).unwrap_or_else(|_| out_dir.to_path_buf());
            self.runner.run_checked(
                &ToolCommand::from_prefix(&self.manifest.tools.ibom)
                    .arg("--no-browser")
                    .arg(format!("--dest-dir={}", dest_dir.display()))
                    .arg("--name-format=%f_interactive_bom")
                    .arg("--blacklist=G*")
                    .arg(pcb_file.to_string_lossy()),
            )?;

            log(2, "📝", "Exporting schematic");
            let schematic_file = src_dir.join(format!("{pcb_name}.kicad_sch"));
            let sch_pdf = out_dir.join(format!("{pcb_name}_schematic.pdf"));
            self.runner.run_checked(
                &ToolCommand::from_prefix(&self.manifest.tools.kicad_cli)
                    .args(["sch", "export", "pdf", "--no-background-color", "--output"])
                    .arg(sch_pdf.to_string_lossy())
                    .arg(schematic_file.to_string_lossy()),
            )?;
        }

        Ok(())
    }

    fn build_faceplate(
        &mut self,
        name: &str,
        module_dir: &Path,
        out_dir: &Path,
        last: Option<&str>,
    ) -> Result<(), BuildError> {
        let panel_file = module_dir.join("Faceplate").join("panel.yaml");
        if !panel_file.exists() {
            debug!("no panel description for {name}, skipping faceplate");
            return Ok(());
        }
        if !git::has_changed_since(self.runner, &panel_file, last)?.changed() {
            return Ok(());
        }
        log(1, "🤖", "Building faceplate SVG");

        let text = std::fs::read_to_string(&panel_file).map_err(|source| BuildError::Io {
            path: panel_file.clone(),
            source,
        })?;
        let config = PanelConfig::from_yaml_str(&text).map_err(|source| BuildError::PanelConfig {
            path: panel_file.clone(),
            source,
        })?;
        let module = config.build(self.faceplate_mode, None)?;
        let svg_out = out_dir.join(format!("{}_faceplate.svg", to_snake_case(name)));
        module.save(&svg_out)?;
        Ok(())
    }

    fn build_firmware(
        &mut self,
        name: &str,
        module_dir: &Path,
        out_dir: &Path,
        last: Option<&str>,
    ) -> Result<(), BuildError> {
        let firmware_dir = module_dir.join("Firmware");
        if !git::has_changed_since(self.runner, &firmware_dir, last)?.changed() {
            return Ok(());
        }
        log(1, "🦀", "Building firmware");

        self.runner.run_checked(
            &ToolCommand::from_prefix(&self.manifest.tools.cargo)
                .args(["build", "--release"])
                .current_dir(&firmware_dir)
                .env("RUSTFLAGS", "-Zlocation-detail=none"),
        )?;

        let firmware_name = format!("fm-{}", name.to_lowercase().replace('_', "-"));
        let elf_file = firmware_dir
            .join("target")
            .join("avr-atmega328p")
            .join("release")
            .join(format!("{firmware_name}.elf"));
        let hex_file = out_dir.join(format!("{firmware_name}.hex"));

        self.runner.run_checked(
            &ToolCommand::from_prefix(&self.manifest.tools.objcopy)
                .args(["-O", "ihex"])
                .arg(elf_file.to_string_lossy())
                .arg(hex_file.to_string_lossy()),
        )?;
        Ok(())
    }

    fn build_manual(
        &mut self,
        name: &str,
        module_dir: &Path,
        out_dir: &Path,
        last: Option<&str>,
    ) -> Result<(), BuildError> {
        let manual_svg = module_dir
            .join("docs")
            .join(format!("{}_manual.svg", to_snake_case(name)));
        if !manual_svg.exists() {
            return Ok(());
        }
        if !git::has_changed_since(self.runner, &manual_svg, last)?.changed() {
            return Ok(());
        }
        log(1, "🖨️", &format!("Building manual PDF for {name}"));

        let pdf_out = out_dir.join(format!("{}.pdf", to_snake_case(name)));
        self.runner.run_checked(
            &ToolCommand::from_prefix(&self.manifest.tools.inkscape)
                .arg(format!(
                    "--actions=export-filename:{};export-do",
                    pdf_out.display()
                ))
                .arg(manual_svg.to_string_lossy()),
        )?;
        Ok(())
    }
}

fn short(commit: &str) -> &str {
    &commit[..commit.len().min(7)]
}

/// CamelCase module names become snake_case artifact names.
#[must_use]
pub fn to_snake_case(text: &str) -> String {
    let text = text.replace(' ', "");
    let first = Regex::new("(.)([A-Z][a-z]+)").unwrap();
    let text = first.replace_all(&text, "${1}_${2}");
    let second = Regex::new("([a-z0-9])([A-Z])").unwrap();
    second.replace_all(&text, "${1}_${2}").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Tools;
    use crate::runner::ToolOutput;

    #[test]
    fn snake_case_matches_module_names() {
        assert_eq!(to_snake_case("DiodeDistortion"), "diode_distortion");
        assert_eq!(to_snake_case("OffsetAtten"), "offset_atten");
        assert_eq!(to_snake_case("Lights"), "lights");
        assert_eq!(to_snake_case("RNG"), "rng");
        assert_eq!(to_snake_case("Offset Atten"), "offset_atten");
    }

    /// Answers git queries from a script; panics on any CAD tool launch.
    struct ScriptedRunner {
        calls: Vec<String>,
        head: String,
        /// Per `git diff` call, whether the tree changed (nonzero exit).
        diff_changed: Vec<bool>,
    }

    impl ScriptedRunner {
        fn new(head: &str, diff_changed: Vec<bool>) -> Self {
            Self {
                calls: Vec::new(),
                head: head.to_string(),
                diff_changed,
            }
        }
    }

    impl ToolRunner for ScriptedRunner {
        fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput, BuildError> {
            self.calls.push(command.display());
            assert_eq!(command.program, "git", "unexpected tool launch: {}", command.display());
            let (success, stdout) = match command.args.first().map(String::as_str) {
                Some("log") => (true, self.head.clone()),
                Some("diff") => (!self.diff_changed.remove(0), String::new()),
                other => panic!("unexpected git subcommand {other:?}"),
            };
            Ok(ToolOutput {
                success,
                code: Some(i32::from(!success)),
                stdout,
                stderr: String::new(),
            })
        }
    }

    fn test_manifest(root: &Path) -> Manifest {
        Manifest {
            modules: vec!["Drift".to_string()],
            modules_dir: root.join("modules"),
            output_dir: root.join("artifacts"),
            tools: Tools::default(),
        }
    }

    const PANEL_YAML: &str = "hp: 4\ntitle: Drift\ncomponents:\n  - type: led\n    x: 0\n    y: 40\n";

    #[test]
    fn unchanged_module_launches_nothing_but_git() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = test_manifest(dir.path());
        let out_dir = manifest.output_dir.join("Drift");
        std::fs::create_dir_all(&out_dir).unwrap();
        crate::git::write_marker(&out_dir, "abc123").unwrap();

        // One diff call answering "no change since abc123".
        let mut runner = ScriptedRunner::new("abc123", vec![false]);
        let outcome = Builder::new(&manifest, &mut runner)
            .build_module("Drift")
            .unwrap();

        assert_eq!(outcome, BuildOutcome::UpToDate);
        assert_eq!(runner.calls.len(), 1);
        assert!(runner.calls[0].starts_with("git diff --quiet abc123"));
    }

    #[test]
    fn module_without_pcbs_still_renders_faceplate_and_marker() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = test_manifest(dir.path());
        let faceplate_dir = manifest.modules_dir.join("Drift").join("Faceplate");
        std::fs::create_dir_all(&faceplate_dir).unwrap();
        std::fs::write(faceplate_dir.join("panel.yaml"), PANEL_YAML).unwrap();

        // No marker: first diff is skipped entirely; the dirty-tree check
        // answers clean.
        let mut runner = ScriptedRunner::new("deadbeefcafe", vec![false]);
        let outcome = Builder::new(&manifest, &mut runner)
            .faceplate_mode(RenderMode::Debug)
            .build_module("Drift")
            .unwrap();

        assert_eq!(outcome, BuildOutcome::Built);
        let out_dir = manifest.output_dir.join("Drift");
        assert!(out_dir.join("drift_faceplate.svg").exists());
        assert_eq!(
            crate::git::last_commit(&out_dir),
            Some("deadbeefcafe".to_string())
        );
        assert!(runner.calls.iter().all(|call| call.starts_with("git ")));
    }

    #[test]
    fn broken_panel_description_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = test_manifest(dir.path());
        let faceplate_dir = manifest.modules_dir.join("Drift").join("Faceplate");
        std::fs::create_dir_all(&faceplate_dir).unwrap();
        std::fs::write(faceplate_dir.join("panel.yaml"), "hp: [nope").unwrap();

        let mut runner = ScriptedRunner::new("deadbeefcafe", vec![false]);
        let err = Builder::new(&manifest, &mut runner)
            .faceplate_mode(RenderMode::Debug)
            .build_module("Drift")
            .unwrap_err();
        assert!(matches!(err, BuildError::PanelConfig { .. }));
    }

    #[test]
    fn builder_reuses_marker_commit_across_modules() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = test_manifest(dir.path());
        manifest.modules = vec!["Drift".to_string(), "Clock".to_string()];
        for name in &manifest.modules {
            let out = manifest.output_dir.join(name);
            std::fs::create_dir_all(&out).unwrap();
            crate::git::write_marker(&out, "abc123").unwrap();
        }

        let mut runner = ScriptedRunner::new("abc123", vec![false, false]);
        Builder::new(&manifest, &mut runner).build_all().unwrap();
        assert_eq!(runner.calls.len(), 2);
    }

    #[test]
    fn faceplate_staleness_keys_on_panel_description() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = test_manifest(dir.path());
        let module_dir = manifest.modules_dir.join("Drift");
        let faceplate_dir = module_dir.join("Faceplate");
        std::fs::create_dir_all(&faceplate_dir).unwrap();
        std::fs::write(faceplate_dir.join("panel.yaml"), PANEL_YAML).unwrap();

        let out_dir = manifest.output_dir.join("Drift");
        std::fs::create_dir_all(&out_dir).unwrap();
        crate::git::write_marker(&out_dir, "abc123").unwrap();

        // Module tree changed, working tree clean, but the panel file itself
        // is unchanged: no SVG is rendered.
        let mut runner = ScriptedRunner::new("abc123", vec![true, false, false]);
        let outcome = Builder::new(&manifest, &mut runner)
            .faceplate_mode(RenderMode::Debug)
            .build_module("Drift")
            .unwrap();

        assert_eq!(outcome, BuildOutcome::Built);
        assert!(!out_dir.join("drift_faceplate.svg").exists());
    }

    #[test]
    fn missing_marker_skips_the_diff_subprocess() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ScriptedRunner::new("", vec![]);
        let change = crate::git::has_changed_since(&mut runner, dir.path(), None).unwrap();
        assert_eq!(change, GitDiff::NoLastCommit);
        assert!(runner.calls.is_empty());
    }
}

use std::process::Command;

const PANEL: &str = "\
hp: 8
title: Smoke Test
components:
  - type: jack
    x: 0
    y: 20
    label: In
  - type: potentiometer
    x: -2.54
    y: 45
    label: Level
    color: blue
  - type: switch
    x: 0
    y: 70
    left_text: A
    right_text: B
";

#[test]
fn debug_render_writes_layered_svg() {
    let bin = env!("CARGO_BIN_EXE_facegen");
    let dir = tempfile::tempdir().expect("tempdir");
    let panel = dir.path().join("panel.yaml");
    std::fs::write(&panel, PANEL).expect("write panel");
    let out = dir.path().join("smoke.svg");

    let output = Command::new(bin)
        .args([
            "render",
            panel.to_string_lossy().as_ref(),
            "--mode",
            "debug",
            "-o",
            out.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run facegen render");
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let svg = std::fs::read_to_string(&out).expect("read svg");
    for id in ["outline", "stencil", "throughholes", "debug"] {
        assert!(svg.contains(&format!("id=\"{id}\"")), "missing layer {id}");
    }
    // Debug renders carry no drill markers or cosmetics.
    assert!(!svg.contains("id=\"drill_markers\""));
    assert!(!svg.contains("id=\"cosmetics\""));

    assert!(svg.contains(">Smoke Test</text>"));
    assert!(svg.contains(">Level</text>"));
}

#[test]
fn default_output_is_derived_from_title() {
    let bin = env!("CARGO_BIN_EXE_facegen");
    let dir = tempfile::tempdir().expect("tempdir");
    let panel = dir.path().join("panel.yaml");
    std::fs::write(&panel, PANEL).expect("write panel");

    let status = Command::new(bin)
        .current_dir(dir.path())
        .args(["render", "panel.yaml", "--mode", "debug"])
        .status()
        .expect("run facegen render");
    assert!(status.success());
    assert!(dir.path().join("Smoke_Test.svg").exists());
}

#[test]
fn outline_flag_expands_the_canvas() {
    let bin = env!("CARGO_BIN_EXE_facegen");
    let dir = tempfile::tempdir().expect("tempdir");
    let panel = dir.path().join("panel.yaml");
    std::fs::write(&panel, "hp: 8\ntitle: Cut\n").expect("write panel");
    let out = dir.path().join("cut.svg");

    let status = Command::new(bin)
        .args([
            "render",
            panel.to_string_lossy().as_ref(),
            "--mode",
            "debug",
            "--outline",
            "-o",
            out.to_string_lossy().as_ref(),
        ])
        .status()
        .expect("run facegen render");
    assert!(status.success());

    let svg = std::fs::read_to_string(&out).expect("read svg");
    assert!(svg.contains("viewBox=\"-0.5 -0.5 41.3 129.5\""));
}

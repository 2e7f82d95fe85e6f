use std::process::Command;

#[test]
fn exit_code_usage_is_1_for_missing_args() {
    let bin = env!("CARGO_BIN_EXE_facegen");
    let status = Command::new(bin)
        .args(["render"])
        .status()
        .expect("run facegen");
    assert_eq!(status.code(), Some(1));
}

#[test]
fn exit_code_input_is_2_for_missing_file() {
    let bin = env!("CARGO_BIN_EXE_facegen");
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.yaml");

    let status = Command::new(bin)
        .args(["render", missing.to_string_lossy().as_ref(), "--mode", "debug"])
        .status()
        .expect("run facegen render");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn exit_code_input_is_2_for_invalid_yaml() {
    let bin = env!("CARGO_BIN_EXE_facegen");
    let dir = tempfile::tempdir().expect("tempdir");
    let bad = dir.path().join("bad.yaml");
    std::fs::write(&bad, "hp: [4,").expect("write bad yaml");

    let status = Command::new(bin)
        .args(["render", bad.to_string_lossy().as_ref(), "--mode", "debug"])
        .status()
        .expect("run facegen render");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn exit_code_input_is_2_for_missing_manifest() {
    let bin = env!("CARGO_BIN_EXE_facegen");
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("build.yaml");

    let status = Command::new(bin)
        .args(["build", missing.to_string_lossy().as_ref()])
        .status()
        .expect("run facegen build");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn exit_code_success_is_0_for_debug_render() {
    let bin = env!("CARGO_BIN_EXE_facegen");
    let dir = tempfile::tempdir().expect("tempdir");
    let panel = dir.path().join("panel.yaml");
    std::fs::write(
        &panel,
        "hp: 8\ntitle: Test\ncomponents:\n  - type: jack\n    x: 0\n    y: 20\n    label: In\n",
    )
    .expect("write panel yaml");
    let output = dir.path().join("test.svg");

    let status = Command::new(bin)
        .args([
            "render",
            panel.to_string_lossy().as_ref(),
            "--mode",
            "debug",
            "-o",
            output.to_string_lossy().as_ref(),
        ])
        .status()
        .expect("run facegen render");
    assert_eq!(status.code(), Some(0));
    assert!(output.exists());
}

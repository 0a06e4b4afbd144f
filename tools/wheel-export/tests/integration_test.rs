//! Integration tests for wheel-export
//!
//! Tests the full pipeline: generate meshes -> read back -> flatten

use std::path::Path;
use tempfile::tempdir;

use wheel_export::{load_obj, parse_obj};
use wheel_model::{Layout, generate};

/// Default build writes both artifacts, and they round-trip with the builder's counts
#[test]
fn test_build_default_artifacts() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest_path = dir.path().join("wheels.toml");
    std::fs::write(
        &manifest_path,
        "[meshes]\nwheel = \"single\"\ndual-wheel = { layout = \"dual\" }\n",
    )
    .expect("Failed to write manifest");

    wheel_export_build(&manifest_path, dir.path());

    for (file, layout) in [("wheel.obj", Layout::Single), ("dual-wheel.obj", Layout::Dual)] {
        let path = dir.path().join(file);
        assert!(path.exists(), "{} should exist", file);

        let parsed = load_obj(&path).expect("Failed to parse generated OBJ");
        let expected = generate(layout).expect("Failed to generate mesh");
        assert_eq!(parsed.vertex_count(), expected.vertex_count());
        assert_eq!(parsed.normal_count(), expected.normal_count());
        assert_eq!(parsed.face_count(), expected.face_count());
        assert_eq!(parsed.material_library.as_deref(), Some("materials.mtl"));
    }
}

/// Custom material library name ends up on the mtllib line
#[test]
fn test_build_custom_material_library() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest_path = dir.path().join("truck.toml");
    std::fs::write(
        &manifest_path,
        "[output]\nmaterial_library = \"truck.mtl\"\n\n[meshes]\nrear = \"dual\"\n",
    )
    .expect("Failed to write manifest");

    wheel_export_build(&manifest_path, dir.path());

    let text = std::fs::read_to_string(dir.path().join("rear.obj")).expect("Failed to read OBJ");
    assert!(text.lines().any(|l| l == "mtllib truck.mtl"));
    assert!(!dir.path().join("wheel.obj").exists());
}

/// Flatten writes JSON whose triangle count matches the OBJ face count
#[test]
fn test_flatten_to_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("wheel.obj");
    let json_path = dir.path().join("wheel.json");

    let mesh = generate(Layout::Single).expect("Failed to generate mesh");
    let text = wheel_model::to_obj_string(&mesh, "materials.mtl").expect("Failed to export");
    std::fs::write(&obj_path, text).expect("Failed to write OBJ");

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_wheel-export"))
        .args([
            "flatten",
            obj_path.to_str().unwrap(),
            "-o",
            json_path.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run wheel-export");
    assert!(status.success(), "wheel-export flatten command failed");

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&json_path).expect("Failed to read JSON"))
            .expect("Output should be valid JSON");
    let indices = json["indices"].as_array().expect("indices array");
    assert_eq!(indices.len(), 3 * mesh.face_count());
    assert_eq!(json["materials"].as_array().map(|m| m.len()), Some(5));
}

/// Dump writes a complete mesh to stdout
#[test]
fn test_dump_stdout() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_wheel-export"))
        .args(["dump", "--layout", "dual"])
        .output()
        .expect("Failed to run wheel-export");
    assert!(output.status.success(), "wheel-export dump command failed");

    let parsed = parse_obj(output.stdout.as_slice()).expect("Dump should be valid OBJ");
    let expected = generate(Layout::Dual).expect("Failed to generate mesh");
    assert_eq!(parsed.face_count(), expected.face_count());
}

/// Check rejects a file that is not a triangle mesh
#[test]
fn test_check_rejects_bad_obj() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("bad.obj");
    std::fs::write(&obj_path, "v 0 0 0\nvn 0 0 1\nf 1//1 1//1 1//1 1//1\n")
        .expect("Failed to write OBJ");

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_wheel-export"))
        .args(["check", obj_path.to_str().unwrap()])
        .status()
        .expect("Failed to run wheel-export");
    assert!(!status.success(), "check should fail on quads");
}

// Helper to run wheel-export build command
fn wheel_export_build(manifest: &Path, output: &Path) {
    let status = std::process::Command::new(env!("CARGO_BIN_EXE_wheel-export"))
        .args([
            "build",
            manifest.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run wheel-export");
    assert!(status.success(), "wheel-export build command failed");
}

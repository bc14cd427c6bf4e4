use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_default_run_writes_chart_png() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("engagement-heatmap").unwrap();
    cmd.current_dir(dir.path());

    cmd.assert().success().stdout(predicate::str::contains(
        "chart.png has been generated successfully with 512x512 dimensions.",
    ));

    let chart = dir.path().join("chart.png");
    assert_eq!(image::image_dimensions(&chart).unwrap(), (512, 512));

    // A second run replaces the file instead of failing.
    Command::cargo_bin("engagement-heatmap")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .success();
    assert!(chart.exists());
}

#[test]
fn test_exports_and_summary() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("engagement-heatmap").unwrap();
    cmd.current_dir(dir.path())
        .arg("--output")
        .arg("heatmap.png")
        .arg("--summary")
        .arg("--output-json")
        .arg("matrix.json")
        .arg("--output-markdown")
        .arg("matrix.md");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Correlation Matrix"))
        .stdout(predicate::str::contains("heatmap.png has been generated successfully"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("matrix.json")).unwrap())
            .unwrap();
    assert_eq!(json["columns"].as_array().unwrap().len(), 6);
    assert!(dir.path().join("matrix.md").exists());
    assert!(dir.path().join("heatmap.png").exists());
}

#[test]
fn test_unwritable_output_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("engagement-heatmap").unwrap();
    cmd.current_dir(dir.path())
        .arg("--output")
        .arg("missing_dir/chart.png");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Usage:").not());
}

#[test]
fn test_style_file_changes_output_size() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("style.json"), r#"{"dpi": 32}"#).unwrap();

    let mut cmd = Command::cargo_bin("engagement-heatmap").unwrap();
    cmd.current_dir(dir.path()).arg("--style").arg("style.json");

    cmd.assert().success().stdout(predicate::str::contains(
        "chart.png has been generated successfully with 256x256 dimensions.",
    ));
    assert_eq!(
        image::image_dimensions(dir.path().join("chart.png")).unwrap(),
        (256, 256)
    );
}

#[test]
fn test_invalid_style_file_fails() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("style.json"), "{ not json").unwrap();

    let mut cmd = Command::cargo_bin("engagement-heatmap").unwrap();
    cmd.current_dir(dir.path()).arg("--style").arg("style.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Serialization error"));
    assert!(!dir.path().join("chart.png").exists());
}

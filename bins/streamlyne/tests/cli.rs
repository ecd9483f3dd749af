//! CLI integration tests for offline commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn feature(lat: f64, lon: f64, name: Option<&str>) -> serde_json::Value {
    let properties = match name {
        Some(name) => serde_json::json!({ "name": name }),
        None => serde_json::json!({}),
    };
    serde_json::json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "properties": properties,
    })
}

fn collection(features: Vec<serde_json::Value>) -> String {
    serde_json::json!({"type": "FeatureCollection", "features": features}).to_string()
}

/// Temp workspace with a config file and three layer sources.
///
/// Borewells: "here" at Bengaluru and "far" to the north. Valves: one
/// unnamed valve. Pumping stations: not GeoJSON at all.
fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets");
    fs::create_dir(&assets).unwrap();

    fs::write(
        assets.join("bangalore_borewells.geojson"),
        collection(vec![
            feature(13.4, 77.5946, Some("far")),
            feature(12.9716, 77.5946, Some("here")),
        ]),
    )
    .unwrap();
    fs::write(
        assets.join("bangalore_valves.geojson"),
        collection(vec![feature(12.98, 77.5946, None)]),
    )
    .unwrap();
    fs::write(assets.join("pumping-stations.geojson"), "not geojson").unwrap();

    let config = dir.path().join("streamlyne.toml");
    fs::write(&config, "[proximity]\nk = 5\n\n[logging]\nlevel = \"warn\"\n").unwrap();
    (dir, config)
}

fn streamlyne(dir: &TempDir, config: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("streamlyne").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("STREAMLYNE_EMAIL")
        .env_remove("STREAMLYNE_PASSWORD")
        .env_remove("SUPABASE_URL")
        .env("STREAMLYNE_SUPABASE_URL", "http://127.0.0.1:9")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn test_help() {
    Command::cargo_bin("streamlyne")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("nearest"))
        .stdout(predicate::str::contains("outbreak"))
        .stdout(predicate::str::contains("navigate"));
}

#[test]
fn test_version() {
    Command::cargo_bin("streamlyne")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("streamlyne"));
}

#[test]
fn test_layers_start_hidden() {
    let (dir, config) = workspace();
    streamlyne(&dir, &config)
        .arg("layers")
        .assert()
        .success()
        .stdout(predicate::str::contains("Borewells"))
        .stdout(predicate::str::contains("Pumping Stations"))
        .stdout(predicate::str::contains("hidden"));
}

#[test]
fn test_layers_report_load_results() {
    let (dir, config) = workspace();
    let output = streamlyne(&dir, &config)
        .args(["--format", "json", "layers", "--show", "borewells", "--show", "pumpingStations"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let layers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let layers = layers.as_array().unwrap();
    assert_eq!(layers.len(), 3);
    assert_eq!(layers[0]["status"]["status"], "ready");
    assert_eq!(layers[0]["status"]["features"], 2);
    assert_eq!(layers[1]["status"]["status"], "errored");
    assert_eq!(layers[2]["status"]["status"], "hidden");
}

#[test]
fn test_nearest_text() {
    let (dir, config) = workspace();
    streamlyne(&dir, &config)
        .args(["nearest", "--lat", "12.9716", "--lon", "77.5946", "-k", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("here"))
        .stdout(predicate::str::contains("0.00000"))
        .stdout(predicate::str::contains("Nearby Source"))
        .stdout(predicate::str::contains("far").not());
}

#[test]
fn test_nearest_json_limited_to_layer() {
    let (dir, config) = workspace();
    let output = streamlyne(&dir, &config)
        .args([
            "--format", "json", "nearest", "--lat", "12.9716", "--lon", "77.5946", "--layer",
            "borewells",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sources = report["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["distance_km"], 0.0);
    assert_eq!(sources[0]["feature"]["properties"]["name"], "here");
    assert_eq!(report["focus"]["center"]["latitude"], 12.9716);
}

#[test]
fn test_nearest_rejects_zero_k() {
    let (dir, config) = workspace();
    streamlyne(&dir, &config)
        .args(["nearest", "--lat", "12.9716", "--lon", "77.5946", "-k", "0"])
        .assert()
        .failure();
}

#[test]
fn test_nearest_rejects_out_of_range_point() {
    let (dir, config) = workspace();
    streamlyne(&dir, &config)
        .args(["nearest", "--lat", "95", "--lon", "77.5946"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_navigate_prints_destination() {
    let (dir, config) = workspace();
    streamlyne(&dir, &config)
        .args(["navigate", "--lat", "12.9717", "--lon", "77.5946"])
        .assert()
        .success()
        .stdout("12.9716,77.5946\n");
}

#[test]
fn test_reviews_look_up_nearest_source_coordinate() {
    let (dir, config) = workspace();
    streamlyne(&dir, &config)
        .env("STREAMLYNE_ENV", "development")
        .args(["reviews", "--lat", "12.9717", "--lon", "77.5946"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not fetch reviews for here at 12.9716,77.5946"));
}

#[test]
fn test_review_without_session_is_rejected_locally() {
    let (dir, config) = workspace();
    streamlyne(&dir, &config)
        .args(["review", "--lat", "12.9716", "--lon", "77.5946", "--text", "Water is clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You need to be logged in to submit a review"));
}

#[test]
fn test_outbreak_requires_description() {
    let (dir, config) = workspace();
    streamlyne(&dir, &config)
        .args([
            "outbreak", "--lat", "12.9716", "--lon", "77.5946", "--disease", "Cholera",
            "--description", " ",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("description"));
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("streamlyne")
        .unwrap()
        .current_dir(dir.path())
        .args(["--config", "nope.toml", "layers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

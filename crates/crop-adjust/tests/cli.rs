#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

/// White 160x100 page with a black block at x in [40, 120), y in [30, 50).
fn write_page(dir: &Path) -> PathBuf {
    let path = dir.join("page.png");
    RgbImage::from_fn(160, 100, |x, y| {
        if (40..120).contains(&x) && (30..50).contains(&y) {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
    .save(&path)
    .expect("save png");
    path
}

fn write_rects(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("page.txt");
    std::fs::write(&path, text).expect("write rects");
    path
}

fn crop_adjust() -> Command {
    Command::cargo_bin("crop-adjust").expect("binary")
}

#[test]
fn prints_given_and_fixed_pairs() {
    let dir = TempDir::new().expect("tempdir");
    let image = write_page(dir.path());
    let rects = write_rects(dir.path(), "45,33,70,14\n");

    crop_adjust()
        .arg(&image)
        .arg(&rects)
        .args(["--threshold", "0.5", "--expand-ratio", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GIVEN:\t45,33,70,14"))
        .stdout(predicate::str::contains("FIXED:\t40,30,80,20"))
        .stdout(predicate::str::contains("Processing Completed."));
}

#[test]
fn bad_rectangle_is_reported_and_batch_continues() {
    let dir = TempDir::new().expect("tempdir");
    let image = write_page(dir.path());
    let rects = write_rects(dir.path(), "150,90,30,30\n45,33,70,14\n");

    crop_adjust()
        .arg(&image)
        .arg(&rects)
        .args(["--threshold", "0.5", "--expand-ratio", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR:\trectangle 150,90,30,30 is outside"))
        .stdout(predicate::str::contains("FIXED:\t40,30,80,20"));
}

#[test]
fn writes_json_report() {
    let dir = TempDir::new().expect("tempdir");
    let image = write_page(dir.path());
    let rects = write_rects(dir.path(), "45,33,70,14\n");
    let report = dir.path().join("report.json");

    crop_adjust()
        .arg(&image)
        .arg(&rects)
        .args(["--threshold", "0.5", "--expand-ratio", "0.1", "--json"])
        .arg(&report)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&report).expect("read report");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let fixed = &json["entries"][0]["fixed"];
    // margins round(80 * 0.1) = 8 and round(20 * 0.1) = 2
    assert_eq!(fixed["x"], 32);
    assert_eq!(fixed["y"], 28);
    assert_eq!(fixed["width"], 96);
    assert_eq!(fixed["height"], 24);
}

#[test]
fn config_file_supplies_inputs_and_params() {
    let dir = TempDir::new().expect("tempdir");
    let image = write_page(dir.path());
    let rects = write_rects(dir.path(), "45 33 70 14\n");
    let config = dir.path().join("config.json");
    let cfg = serde_json::json!({
        "image_path": image,
        "rects_path": rects,
        "params": { "threshold": 0.5, "expand_ratio": 0.0 }
    });
    std::fs::write(&config, cfg.to_string()).expect("write config");

    crop_adjust()
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("FIXED:\t40,30,80,20"));
}

#[test]
fn invalid_threshold_fails() {
    let dir = TempDir::new().expect("tempdir");
    let image = write_page(dir.path());
    let rects = write_rects(dir.path(), "45,33,70,14\n");

    crop_adjust()
        .arg(&image)
        .arg(&rects)
        .args(["--threshold", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("threshold"));
}

#[test]
fn malformed_rect_list_fails() {
    let dir = TempDir::new().expect("tempdir");
    let image = write_page(dir.path());
    let rects = write_rects(dir.path(), "45,33,70\n");

    crop_adjust()
        .arg(&image)
        .arg(&rects)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn missing_inputs_fail() {
    crop_adjust()
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing image path"));
}

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const FLYER_TEXT: &str = "\
Summer Rooftop Party With Friends
Saturday, June 15th
9:00 pm
at The Skyline Lounge
DJ Max
featuring Luna
Enjoy cocktails and a view over the whole city";

fn flyer() -> Command {
    Command::cargo_bin("flyer").unwrap()
}

/// Config file with a fixed reference date.
fn write_config(dir: &Path) -> String {
    let path = dir.join("config.json");
    fs::write(&path, r#"{ "dates": { "reference_date": "2024-05-01" } }"#).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn extract_from_file_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("flyer.txt");
    fs::write(&input, FLYER_TEXT).unwrap();

    let output = flyer()
        .args(["--config", &config, "extract"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let event: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(event["event_name"], "Summer Rooftop Party With Friends");
    assert_eq!(event["event_date"], "2024-06-15");
    assert_eq!(event["event_time"], "9:00 pm");
    assert_eq!(event["event_location"], "The Skyline Lounge");
    assert_eq!(event["event_hosts"], "Max, Luna");
}

#[test]
fn extract_from_stdin_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    flyer()
        .args(["--config", &config, "extract", "-", "--format", "text"])
        .write_stdin(FLYER_TEXT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Event:    Summer Rooftop Party With Friends"))
        .stdout(predicate::str::contains("(2024-06-15)"));
}

#[test]
fn extract_calendar_payload() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let output = flyer()
        .args(["--config", &config, "extract", "-", "-f", "calendar"])
        .write_stdin(FLYER_TEXT)
        .output()
        .unwrap();
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["start"]["dateTime"], "2024-06-15T21:00:00");
    assert_eq!(payload["end"]["dateTime"], "2024-06-15T00:00:00");
    assert_eq!(payload["start"]["timeZone"], "America/New_York");
    assert_eq!(payload["reminders"]["useDefault"], false);
}

#[test]
fn extract_warns_about_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    flyer()
        .args(["--config", &config, "extract", "-", "-f", "csv"])
        .write_stdin("Garage Sale")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("event_name,event_date,"))
        .stderr(predicate::str::contains("Could not extract event_location"));
}

#[test]
fn extract_missing_file() {
    flyer()
        .args(["extract", "/nonexistent/flyer.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_rejects_unsupported_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("flyer.pdf");
    fs::write(&input, b"%PDF-1.4").unwrap();

    flyer()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn process_reports_missing_recognizer() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{ "ocr": { "tesseract_binary": "/nonexistent/tesseract" } }"#,
    )
    .unwrap();

    let input = dir.path().join("flyer.png");
    image::GrayImage::from_pixel(8, 8, image::Luma([255]))
        .save(&input)
        .unwrap();

    flyer()
        .arg("--config")
        .arg(&config_path)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("OCR engine unavailable"));

    // Only the source image remains.
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 2);
}

#[test]
fn batch_without_matches() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = format!("{}/*.png", dir.path().display());

    flyer()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn batch_continues_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{ "ocr": { "tesseract_binary": "/nonexistent/tesseract" } }"#,
    )
    .unwrap();

    let inputs = dir.path().join("in");
    fs::create_dir(&inputs).unwrap();
    for name in ["a.png", "b.png"] {
        image::GrayImage::from_pixel(8, 8, image::Luma([255]))
            .save(inputs.join(name))
            .unwrap();
    }
    let out = dir.path().join("out");

    flyer()
        .arg("--config")
        .arg(&config_path)
        .arg("batch")
        .arg(format!("{}/*.png", inputs.display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--continue-on-error", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 successful, 2 failed"));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,event_name"));
    assert_eq!(summary.lines().filter(|l| l.starts_with("a.png,error")).count(), 1);
    assert_eq!(fs::read_dir(&inputs).unwrap().count(), 2);
}

#[test]
fn batch_stops_at_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{ "ocr": { "tesseract_binary": "/nonexistent/tesseract" } }"#,
    )
    .unwrap();

    let inputs = dir.path().join("in");
    fs::create_dir(&inputs).unwrap();
    for name in ["a.png", "b.png", "c.png"] {
        image::GrayImage::from_pixel(8, 8, image::Luma([255]))
            .save(inputs.join(name))
            .unwrap();
    }

    // One worker: the first failure ends the batch before b.png or c.png start.
    flyer()
        .arg("--config")
        .arg(&config_path)
        .arg("batch")
        .arg(format!("{}/*.png", inputs.display()))
        .args(["--summary", "-j", "1"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("a.png"))
        .stderr(predicate::str::contains("b.png").not())
        .stderr(predicate::str::contains("c.png").not());

    assert!(!dir.path().join("summary.csv").exists());
}

#[test]
fn config_init_set_get() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("nested").join("config.json");
    let config = config_path.to_str().unwrap();

    flyer()
        .args(["--config", config, "config", "init"])
        .assert()
        .success();
    assert!(config_path.exists());

    flyer()
        .args(["--config", config, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    flyer()
        .args(["--config", config, "config", "set", "ocr.language", "deu"])
        .assert()
        .success();

    flyer()
        .args(["--config", config, "config", "get", "ocr.language"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deu\""));

    flyer()
        .args(["--config", config, "config", "get", "ocr.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));

    flyer()
        .args(["--config", config, "config", "set", "preprocessing.seed_threshold", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

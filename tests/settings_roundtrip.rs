#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

#[path = "../src/settings.rs"]
mod settings;
#[path = "../src/settings_io.rs"]
mod settings_io;

use screenreel_core::encoder::OutputFormat;

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(label: &str) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "screenreel_test_{}_{}_{}",
            label,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[test]
fn settings_round_trip_through_json() {
    let temp = TempDir::new("roundtrip");

    let mut written = settings::Settings::default();
    written.fps = 24;
    written.format = OutputFormat::Gif;
    written.loop_count = 3;

    settings_io::write_settings_json(&temp.path, &written).unwrap();
    let read = settings_io::read_settings_json(&temp.path);

    assert_eq!(read, written);
}

#[test]
fn missing_settings_file_yields_defaults() {
    let temp = TempDir::new("missing");
    let read = settings_io::read_settings_json(&temp.path);
    assert_eq!(read, settings::Settings::default());
}

#[test]
fn malformed_settings_file_yields_defaults() {
    let temp = TempDir::new("malformed");
    fs::write(temp.path.join("settings.json"), "not json at all").unwrap();
    let read = settings_io::read_settings_json(&temp.path);
    assert_eq!(read, settings::Settings::default());
}

#[test]
fn partial_settings_file_keeps_other_defaults() {
    let temp = TempDir::new("partial");
    fs::write(temp.path.join("settings.json"), "{\"fps\": 30}").unwrap();
    let read = settings_io::read_settings_json(&temp.path);
    assert_eq!(read.fps, 30);
    assert_eq!(read.format, settings::Settings::default().format);
    assert_eq!(read.frame_limit, settings::Settings::default().frame_limit);
}

#[test]
fn write_creates_the_settings_directory() {
    let temp = TempDir::new("nested");
    let nested = temp.path.join("deeper");
    settings_io::write_settings_json(&nested, &settings::Settings::default()).unwrap();
    assert!(nested.join("settings.json").is_file());
}

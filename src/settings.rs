use serde::{Deserialize, Serialize};

use screenreel_core::config;
use screenreel_core::encoder::OutputFormat;

/// Persisted user defaults, merged under CLI flags at startup. Frame rate
/// and format adjusted by hotkeys are written back on quit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    #[serde(default = "default_frame_limit")]
    pub frame_limit: u32,
    #[serde(default = "default_loop_count")]
    pub loop_count: u16,

    // Logging
    #[serde(default = "default_log_level")]
    pub log_level: String, // "Off", "Error", "Warn", "Info", "Debug", "Trace"
    #[serde(default = "default_log_to_file")]
    pub log_to_file: bool,
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,
}

// Default functions for serde
fn default_fps() -> u32 {
    config::capture::DEFAULT_FPS
}

fn default_format() -> OutputFormat {
    OutputFormat::Mp4
}

fn default_frame_limit() -> u32 {
    config::capture::DEFAULT_FRAME_LIMIT
}

fn default_loop_count() -> u16 {
    config::capture::DEFAULT_LOOP_COUNT
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_to_file() -> bool {
    true
}

fn default_log_retention_days() -> u32 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            format: default_format(),
            frame_limit: default_frame_limit(),
            loop_count: default_loop_count(),
            log_level: default_log_level(),
            log_to_file: default_log_to_file(),
            log_retention_days: default_log_retention_days(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_recorder_bounds() {
        let settings = Settings::default();
        assert_eq!(settings.fps, 10);
        assert_eq!(settings.frame_limit, 1000);
        assert_eq!(settings.loop_count, 0);
        assert_eq!(settings.format, OutputFormat::Mp4);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str("{\"fps\": 24}").unwrap();
        assert_eq!(settings.fps, 24);
        assert_eq!(settings.format, OutputFormat::Mp4);
        assert!(settings.log_to_file);
    }

    #[test]
    fn format_round_trips_as_lowercase_extension() {
        let settings = Settings {
            format: OutputFormat::Gif,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"gif\""));
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.format, OutputFormat::Gif);
    }
}

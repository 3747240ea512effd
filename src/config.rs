//! Game tuning and process settings.
//!
//! [`Tuning`] carries every constant the simulation reads. Its `Default` is
//! the classic feel: a 432 × 768 playfield at 60 ticks per second.
//! [`Settings`] is read once from the environment by the binary.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use log::info;
use serde::{Deserialize, Serialize};

/// Name used for the data directory and log file.
pub const APP_NAME: &str = "flappy-tui";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub win_width: f64,
    pub win_height: f64,
    /// Height of the ground strip below the floor line.
    pub base_height: f64,

    pub gravity: f64,
    pub flap_power: f64,
    pub max_vel_up: f64,
    pub max_vel_down: f64,
    pub avatar_size: f64,
    pub avatar_x: f64,
    /// Ticks per animation frame.
    pub animation_ticks: u32,

    pub obstacle_width: f64,
    pub obstacle_velocity: f64,
    pub gap_min: i32,
    pub gap_max: i32,
    /// Minimum distance between a gap and the top of the screen or the floor.
    pub gap_margin: i32,
    pub spacing_min: i32,
    pub spacing_max: i32,
    pub initial_obstacles: usize,
    /// Distance past the right edge where the first obstacle spawns.
    pub spawn_offset: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            win_width: 432.0,
            win_height: 768.0,
            base_height: 100.0,

            gravity: 0.8,
            flap_power: -8.0,
            max_vel_up: 7.0,
            max_vel_down: 10.0,
            avatar_size: 30.0,
            avatar_x: 100.0,
            animation_ticks: 5,

            obstacle_width: 70.0,
            obstacle_velocity: 3.0,
            gap_min: 140,
            gap_max: 220,
            gap_margin: 150,
            spacing_min: 180,
            spacing_max: 250,
            initial_obstacles: 3,
            spawn_offset: 100.0,
        }
    }
}

impl Tuning {
    /// Vertical coordinate of the ground line.
    pub fn floor_y(&self) -> f64 {
        self.win_height - self.base_height
    }

    /// Where the first obstacle of a session spawns.
    pub fn spawn_x(&self) -> f64 {
        self.win_width + self.spawn_offset
    }

    pub fn avatar_start_y(&self) -> f64 {
        (self.win_height / 2.0).floor()
    }

    /// Largest gap that still leaves room for both margins.
    pub fn max_placeable_gap(&self) -> i32 {
        self.floor_y() as i32 - 2 * self.gap_margin
    }

    /// Reads a tuning file, falling back to the defaults when there is none.
    /// Keys missing from the file keep their default values.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let tuning: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        tuning
            .validate()
            .with_context(|| format!("invalid tuning in {}", path.display()))?;
        info!("loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Rejects tunings the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.win_width > 0.0 && self.win_height > 0.0,
            "playfield must have a positive size, got {}x{}",
            self.win_width,
            self.win_height
        );
        ensure!(
            self.base_height >= 0.0 && self.base_height < self.win_height,
            "ground strip height {} does not fit a {} high playfield",
            self.base_height,
            self.win_height
        );
        ensure!(
            self.avatar_size > 0.0 && self.obstacle_width > 0.0,
            "avatar and obstacle sizes must be positive"
        );
        ensure!(
            self.max_vel_up > 0.0 && self.max_vel_down > 0.0,
            "velocity caps must be positive"
        );
        ensure!(self.animation_ticks > 0, "animation_ticks must be at least 1");
        ensure!(
            self.obstacle_velocity > 0.0,
            "obstacle velocity must be positive, got {}",
            self.obstacle_velocity
        );
        ensure!(
            0 < self.gap_min && self.gap_min <= self.gap_max,
            "gap range {}..={} is empty",
            self.gap_min,
            self.gap_max
        );
        ensure!(
            0 < self.spacing_min && self.spacing_min <= self.spacing_max,
            "spacing range {}..={} is empty",
            self.spacing_min,
            self.spacing_max
        );
        ensure!(
            self.gap_margin >= 0 && self.max_placeable_gap() >= 1,
            "a margin of {} leaves no room for a gap above a floor at {}",
            self.gap_margin,
            self.floor_y()
        );
        ensure!(
            self.gap_min <= self.max_placeable_gap(),
            "smallest gap {} does not fit between margins, at most {} is placeable",
            self.gap_min,
            self.max_placeable_gap()
        );
        Ok(())
    }
}

// ── Process settings ────────────────────────────────────────────────────────

const DEFAULT_TICK_RATE: u32 = 60;
const MIN_TICK_RATE: u32 = 10;
const MAX_TICK_RATE: u32 = 240;

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub mute: bool,
    pub tick_rate: u32,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn from_env() -> Self {
        let data_dir = env::var_os("FLAPPY_TUI_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_NAME)))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            data_dir,
            mute: read_env_bool("FLAPPY_TUI_MUTE", false),
            tick_rate: read_env_u32("FLAPPY_TUI_FPS", DEFAULT_TICK_RATE)
                .clamp(MIN_TICK_RATE, MAX_TICK_RATE),
            seed: env::var("FLAPPY_TUI_SEED")
                .ok()
                .and_then(|value| value.trim().parse::<u64>().ok()),
        }
    }

    pub fn score_path(&self) -> PathBuf {
        self.data_dir.join("highscore.json")
    }

    /// Optional JSON overrides for [`Tuning`].
    pub fn tuning_path(&self) -> PathBuf {
        self.data_dir.join("tuning.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(format!("{APP_NAME}.log"))
    }
}

fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn read_env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|value| parse_bool(&value))
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_is_valid() {
        let t = Tuning::default();
        t.validate().expect("defaults should validate");
        assert_eq!(t.floor_y(), 668.0);
        assert_eq!(t.spawn_x(), 532.0);
        assert_eq!(t.avatar_start_y(), 384.0);
        assert_eq!(t.max_placeable_gap(), 368);
    }

    #[test]
    fn margins_that_swallow_the_sky_are_rejected() {
        let t = Tuning {
            gap_margin: 334,
            ..Tuning::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let gaps = Tuning {
            gap_min: 300,
            gap_max: 200,
            ..Tuning::default()
        };
        assert!(gaps.validate().is_err());

        let spacing = Tuning {
            spacing_min: 260,
            ..Tuning::default()
        };
        assert!(spacing.validate().is_err());
    }

    #[test]
    fn smallest_gap_must_fit_between_margins() {
        let t = Tuning {
            gap_min: 380,
            gap_max: 400,
            ..Tuning::default()
        };
        assert!(t.validate().is_err());

        let exact = Tuning {
            gap_min: 368,
            gap_max: 400,
            ..Tuning::default()
        };
        exact.validate().unwrap();
    }

    #[test]
    fn standing_obstacles_are_rejected() {
        for v in [0.0, -3.0] {
            let t = Tuning {
                obstacle_velocity: v,
                ..Tuning::default()
            };
            assert!(t.validate().is_err(), "velocity {v} accepted");
        }
    }

    #[test]
    fn missing_tuning_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let t = Tuning::load(&dir.path().join("tuning.json")).unwrap();
        assert_eq!(t, Tuning::default());
    }

    #[test]
    fn tuning_file_overrides_some_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        fs::write(&path, r#"{"gravity": 0.5, "gap_max": 200}"#).unwrap();

        let t = Tuning::load(&path).unwrap();
        assert_eq!(t.gravity, 0.5);
        assert_eq!(t.gap_max, 200);
        assert_eq!(t.gap_min, 140);
    }

    #[test]
    fn broken_tuning_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let garbled = dir.path().join("garbled.json");
        fs::write(&garbled, "{gravity").unwrap();
        assert!(Tuning::load(&garbled).is_err());

        let invalid = dir.path().join("invalid.json");
        fs::write(&invalid, r#"{"gap_min": 380, "gap_max": 400}"#).unwrap();
        assert!(Tuning::load(&invalid).is_err());
    }

    #[test]
    fn env_numbers_ignore_zero_and_garbage() {
        let name = "FLAPPY_TUI_TEST_READ_ENV_U32";
        // SAFETY: this variable is only touched by this test.
        unsafe { env::remove_var(name) };
        assert_eq!(read_env_u32(name, 60), 60);
        for (raw, want) in [("144", 144), (" 30 ", 30), ("0", 60), ("fast", 60), ("-5", 60)] {
            unsafe { env::set_var(name, raw) };
            assert_eq!(read_env_u32(name, 60), want, "raw {raw:?}");
        }
        unsafe { env::remove_var(name) };
    }

    #[test]
    fn tick_rate_is_clamped() {
        // SAFETY: no other test reads or writes FLAPPY_TUI_FPS.
        for (raw, want) in [("1000", 240), ("5", 10), ("120", 120), ("0", 60)] {
            unsafe { env::set_var("FLAPPY_TUI_FPS", raw) };
            assert_eq!(Settings::from_env().tick_rate, want, "raw {raw:?}");
        }
        unsafe { env::remove_var("FLAPPY_TUI_FPS") };
    }

    #[test]
    fn truthy_strings() {
        for v in ["1", "true", "YES", " on "] {
            assert!(parse_bool(v), "{v} should be truthy");
        }
        for v in ["0", "false", "", "nope"] {
            assert!(!parse_bool(v), "{v} should be falsy");
        }
    }
}

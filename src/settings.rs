//! Startup configuration.
//!
//! Settings live in a sectioned TOML file (`[Screen]`, `[Paddle]`, `[Ball]`,
//! `[AI]`).  They are read once, validated, and never change afterwards.
//! There is no default fallback: a missing file or field aborts startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::style::Color;
use serde::Deserialize;

pub use crate::error::ConfigurationError;

/// Location of the settings file relative to the executable's directory.
pub const SETTINGS_RELATIVE_PATH: &str = "data/settings.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct ScreenSettings {
    pub width: f32,
    pub height: f32,
    pub fps: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaddleSettings {
    pub width: f32,
    pub height: f32,
    pub max_speed_y: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BallSettings {
    pub size: f32,
    pub max_speed: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AiSettings {
    pub on: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub screen: ScreenSettings,
    pub paddle: PaddleSettings,
    pub ball: BallSettings,
    pub ai: AiSettings,
}

// ── On-disk shape ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawSettings {
    #[serde(rename = "Screen")]
    screen: RawScreen,
    #[serde(rename = "Paddle")]
    paddle: RawPaddle,
    #[serde(rename = "Ball")]
    ball: RawBall,
    #[serde(rename = "AI")]
    ai: RawAi,
}

#[derive(Deserialize)]
struct RawScreen {
    width: f32,
    height: f32,
    fps: f32,
}

#[derive(Deserialize)]
struct RawPaddle {
    width: f32,
    height: f32,
    max_speed_y: f32,
    color: String,
}

#[derive(Deserialize)]
struct RawBall {
    size: f32,
    max_speed: f32,
    color: String,
}

#[derive(Deserialize)]
struct RawAi {
    on: bool,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl Settings {
    /// Read and validate the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        tracing::info!("Loading settings from {}", path.display());

        if !path.is_file() {
            return Err(ConfigurationError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate settings from already-read TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        let raw: RawSettings = toml::from_str(text)?;

        Ok(Settings {
            screen: ScreenSettings {
                width: positive("Screen.width", raw.screen.width)?,
                height: positive("Screen.height", raw.screen.height)?,
                fps: frame_rate(raw.screen.fps)?,
            },
            paddle: PaddleSettings {
                width: positive("Paddle.width", raw.paddle.width)?,
                height: positive("Paddle.height", raw.paddle.height)?,
                max_speed_y: positive("Paddle.max_speed_y", raw.paddle.max_speed_y)?,
                color: color("Paddle.color", &raw.paddle.color)?,
            },
            ball: BallSettings {
                size: positive("Ball.size", raw.ball.size)?,
                max_speed: ball_speed(raw.ball.max_speed)?,
                color: color("Ball.color", &raw.ball.color)?,
            },
            ai: AiSettings { on: raw.ai.on },
        })
    }

    /// Wall-clock time allotted to a single frame.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.screen.fps)
    }
}

/// `data/settings.toml` next to the running executable, or relative to the
/// working directory when the executable path cannot be resolved.
pub fn default_settings_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|dir| dir.join(SETTINGS_RELATIVE_PATH))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_RELATIVE_PATH))
}

fn positive(field: &'static str, value: f32) -> Result<f32, ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::OutOfRange { field, value })
    }
}

/// The frame budget `1 / fps` has to fit in a `Duration`.
fn frame_rate(value: f32) -> Result<f32, ConfigurationError> {
    let fps = positive("Screen.fps", value)?;
    match Duration::try_from_secs_f32(1.0 / fps) {
        Ok(_) => Ok(fps),
        Err(_) => Err(ConfigurationError::OutOfRange {
            field: "Screen.fps",
            value,
        }),
    }
}

/// Serving samples `[-max_speed, max_speed]`, whose width must stay finite
/// with room for the sampler's own scaling.
fn ball_speed(value: f32) -> Result<f32, ConfigurationError> {
    let speed = positive("Ball.max_speed", value)?;
    if (speed * 4.0).is_finite() {
        Ok(speed)
    } else {
        Err(ConfigurationError::OutOfRange {
            field: "Ball.max_speed",
            value,
        })
    }
}

fn color(field: &'static str, value: &str) -> Result<Color, ConfigurationError> {
    parse_color(value).ok_or_else(|| ConfigurationError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

/// Named terminal colors, or `#rrggbb`.
fn parse_color(value: &str) -> Option<Color> {
    let name = value.trim().to_ascii_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }

    let color = match name.replace(|c: char| c == ' ' || c == '-', "_").as_str() {
        "black" => Color::Black,
        "white" => Color::White,
        "red" => Color::Red,
        "green" => Color::Green,
        "blue" => Color::Blue,
        "yellow" => Color::Yellow,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "grey" | "gray" => Color::Grey,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        "dark_red" => Color::DarkRed,
        "dark_green" => Color::DarkGreen,
        "dark_blue" => Color::DarkBlue,
        "dark_yellow" => Color::DarkYellow,
        "dark_magenta" => Color::DarkMagenta,
        "dark_cyan" => Color::DarkCyan,
        _ => return None,
    };
    Some(color)
}

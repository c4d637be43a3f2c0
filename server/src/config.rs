//! Service configuration parsed from environment variables.

use outline::grid::{DEFAULT_CONTAINER_PADDING, DEFAULT_FRAME_SPACING, DEFAULT_FRAMES_PER_ROW};
use outline::layout::{DEFAULT_HORIZONTAL_SPACING, DEFAULT_VERTICAL_SPACING};
use outline::{GridSpec, Spacing};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FRAME_WIDTH: f64 = 1440.0;
pub const DEFAULT_FRAME_HEIGHT: f64 = 1024.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    NotPositive { key: &'static str },
    #[error("{key} must be zero or greater")]
    Negative { key: &'static str },
}

/// Layout and export tuning shared by every document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SitemapConfig {
    pub spacing: Spacing,
    pub frames_per_row: usize,
    pub frame_spacing: f64,
    pub container_padding: f64,
    pub default_frame_width: f64,
    pub default_frame_height: f64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            spacing: Spacing::default(),
            frames_per_row: DEFAULT_FRAMES_PER_ROW,
            frame_spacing: DEFAULT_FRAME_SPACING,
            container_padding: DEFAULT_CONTAINER_PADDING,
            default_frame_width: DEFAULT_FRAME_WIDTH,
            default_frame_height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl SitemapConfig {
    /// Build from environment variables, falling back to defaults.
    ///
    /// - `SITEMAP_H_SPACING` (250), `SITEMAP_V_SPACING` (200)
    /// - `SITEMAP_FRAMES_PER_ROW` (5)
    /// - `SITEMAP_FRAME_SPACING` (100), `SITEMAP_CONTAINER_PADDING` (100)
    /// - `SITEMAP_DEFAULT_FRAME_WIDTH` (1440), `SITEMAP_DEFAULT_FRAME_HEIGHT` (1024)
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but unparseable, or if a
    /// spacing, size or row capacity is not positive. The frame gap and
    /// container padding may be zero but not negative.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_var)
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_positive = |key: &'static str, default: f64| positive(key, parse_var(lookup, key, default)?);
        let get_non_negative = |key: &'static str, default: f64| non_negative(key, parse_var(lookup, key, default)?);

        let spacing = Spacing {
            horizontal: get_positive("SITEMAP_H_SPACING", DEFAULT_HORIZONTAL_SPACING)?,
            vertical: get_positive("SITEMAP_V_SPACING", DEFAULT_VERTICAL_SPACING)?,
        };
        let frames_per_row = parse_var(lookup, "SITEMAP_FRAMES_PER_ROW", DEFAULT_FRAMES_PER_ROW)?;
        if frames_per_row == 0 {
            return Err(ConfigError::NotPositive { key: "SITEMAP_FRAMES_PER_ROW" });
        }

        Ok(Self {
            spacing,
            frames_per_row,
            frame_spacing: get_non_negative("SITEMAP_FRAME_SPACING", DEFAULT_FRAME_SPACING)?,
            container_padding: get_non_negative("SITEMAP_CONTAINER_PADDING", DEFAULT_CONTAINER_PADDING)?,
            default_frame_width: get_positive("SITEMAP_DEFAULT_FRAME_WIDTH", DEFAULT_FRAME_WIDTH)?,
            default_frame_height: get_positive("SITEMAP_DEFAULT_FRAME_HEIGHT", DEFAULT_FRAME_HEIGHT)?,
        })
    }

    /// Grid spec for an export, using the default frame size where the
    /// request leaves one out.
    #[must_use]
    pub fn grid_spec(&self, frame_width: Option<f64>, frame_height: Option<f64>) -> GridSpec {
        GridSpec {
            frame_width: frame_width.unwrap_or(self.default_frame_width),
            frame_height: frame_height.unwrap_or(self.default_frame_height),
            per_row: self.frames_per_row,
            spacing: self.frame_spacing,
            padding: self.container_padding,
        }
    }
}

/// Top-level process configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub sitemap: SitemapConfig,
}

impl ServerConfig {
    /// Build from `PORT` (default 3000) plus [`SitemapConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self { port: parse_var(&env_var, "PORT", DEFAULT_PORT)?, sitemap: SitemapConfig::from_env()? })
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

fn positive(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 { Ok(value) } else { Err(ConfigError::NotPositive { key }) }
}

fn non_negative(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 { Ok(value) } else { Err(ConfigError::Negative { key }) }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/swaytree/config.json`
//! (or a path given with `--config`), then command-line flags are layered on
//! top.  The top-level schema uses a `"view"` key so the file can grow more
//! sections without breaking existing files.
//!
//! # Example
//!
//! ```json
//! {
//!   "view": {
//!     "mode": "transparent",
//!     "include_floating": true,
//!     "alpha": 0.6,
//!     "width": "40%",
//!     "height": "600"
//!   }
//! }
//! ```

use crate::tree::NativeRect;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Width used when a configured width cannot be resolved.
pub const FALLBACK_WIDTH: i32 = 500;
/// Height used when a configured height cannot be resolved.
pub const FALLBACK_HEIGHT: i32 = 400;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Diagram appearance and host window size.
    #[serde(default)]
    pub view: ViewConfig,
}

/// How the host window presents the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A regular window with a dark background and a breadcrumb header.
    #[default]
    Window,
    /// An undecorated overlay with a transparent background and no header.
    Transparent,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "window" => Ok(Mode::Window),
            "transparent" => Ok(Mode::Transparent),
            other => Err(format!("unknown mode: {:?}", other)),
        }
    }
}

/// View settings.
///
/// `width` and `height` are either a pixel count (`"800"`) or a percentage
/// of the output (`"50%"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub mode: Mode,
    /// Draw floating containers as overlays and search them for workspaces.
    pub include_floating: bool,
    /// Opacity of every fill, stroke and label.  `None` picks the mode's
    /// default (see [`ViewConfig::alpha`]).
    pub alpha: Option<f64>,
    pub width: String,
    pub height: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Window,
            include_floating: false,
            alpha: None,
            width: "100%".into(),
            height: "100%".into(),
        }
    }
}

impl ViewConfig {
    /// Effective opacity, clamped to `[0, 1]`.
    ///
    /// Defaults to 0.5 in transparent mode and 1.0 in window mode.
    pub fn alpha(&self) -> f64 {
        let default = match self.mode {
            Mode::Transparent => 0.5,
            Mode::Window => 1.0,
        };
        let alpha = self.alpha.unwrap_or(default);
        if alpha.is_nan() {
            default
        } else {
            alpha.clamp(0.0, 1.0)
        }
    }

    /// Whether the breadcrumb header is drawn above the diagram.
    pub fn shows_breadcrumb(&self) -> bool {
        self.mode == Mode::Window
    }

    /// Resolve the configured size against `output` into pixels.
    ///
    /// Anything that cannot be resolved falls back to
    /// [`FALLBACK_WIDTH`] × [`FALLBACK_HEIGHT`] for that axis.
    pub fn window_size(&self, output: Option<&NativeRect>) -> (i32, i32) {
        (
            resolve_dimension(&self.width, output.map(|o| o.width), FALLBACK_WIDTH),
            resolve_dimension(&self.height, output.map(|o| o.height), FALLBACK_HEIGHT),
        )
    }

    /// Layer command-line overrides on top of this configuration.
    pub fn apply(&mut self, overrides: ViewOverrides) {
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if overrides.include_floating {
            self.include_floating = true;
        }
        if overrides.alpha.is_some() {
            self.alpha = overrides.alpha;
        }
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
    }
}

/// Values given on the command line; `None` / `false` leave the file's
/// value untouched.
#[derive(Debug, Clone, Default)]
pub struct ViewOverrides {
    pub mode: Option<Mode>,
    pub include_floating: bool,
    pub alpha: Option<f64>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Parse a dimension string into pixels.
///
/// Accepts an integer pixel count or a percentage of `output_extent`.
/// Returns `None` for malformed or non-positive values, and for
/// percentages when the output size is unknown.
pub fn parse_dimension(raw: &str, output_extent: Option<u32>) -> Option<i32> {
    let raw = raw.trim();
    let px = match raw.strip_suffix('%') {
        Some(pct) => {
            let pct: f64 = pct.trim().parse().ok()?;
            let extent = f64::from(output_extent?);
            (extent * pct / 100.0).trunc() as i32
        }
        None => raw.parse::<i32>().ok()?,
    };
    (px > 0).then_some(px)
}

/// [`parse_dimension`] with a fixed fallback.
pub fn resolve_dimension(raw: &str, output_extent: Option<u32>, fallback: i32) -> i32 {
    parse_dimension(raw, output_extent).unwrap_or(fallback)
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "view": {
                "mode": "transparent",
                "include_floating": true,
                "alpha": 0.25,
                "width": "40%",
                "height": "600"
            }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.view.mode, Mode::Transparent);
        assert!(cfg.view.include_floating);
        assert_eq!(cfg.view.alpha(), 0.25);
        assert_eq!(cfg.view.width, "40%");
        assert_eq!(cfg.view.height, "600");
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.view, ViewConfig::default());
        assert_eq!(cfg.view.alpha(), 1.0);
        assert!(cfg.view.shows_breadcrumb());
    }

    #[test]
    fn deserialize_partial_view() {
        let cfg: Config = serde_json::from_str(r#"{ "view": { "mode": "transparent" } }"#).unwrap();
        assert_eq!(cfg.view.mode, Mode::Transparent);
        assert_eq!(cfg.view.alpha(), 0.5, "transparent mode defaults to half opacity");
        assert_eq!(cfg.view.width, "100%");
        assert!(!cfg.view.shows_breadcrumb());
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "view": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn alpha_is_clamped() {
        let mut view = ViewConfig {
            alpha: Some(3.0),
            ..ViewConfig::default()
        };
        assert_eq!(view.alpha(), 1.0);
        view.alpha = Some(-1.0);
        assert_eq!(view.alpha(), 0.0);
        view.alpha = Some(f64::NAN);
        assert_eq!(view.alpha(), 1.0);
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("Window".parse::<Mode>(), Ok(Mode::Window));
        assert_eq!(" transparent ".parse::<Mode>(), Ok(Mode::Transparent));
        assert!("fullscreen".parse::<Mode>().is_err());
    }

    #[test]
    fn parse_pixels_and_percentages() {
        assert_eq!(parse_dimension("800", None), Some(800));
        assert_eq!(parse_dimension(" 640 ", Some(1920)), Some(640));
        assert_eq!(parse_dimension("50%", Some(1920)), Some(960));
        assert_eq!(parse_dimension("33.3%", Some(1000)), Some(333));
        assert_eq!(parse_dimension("100%", Some(1080)), Some(1080));
    }

    #[test]
    fn malformed_dimensions_are_rejected() {
        assert_eq!(parse_dimension("wide", Some(1920)), None);
        assert_eq!(parse_dimension("12.5", Some(1920)), None);
        assert_eq!(parse_dimension("abc%", Some(1920)), None);
        assert_eq!(parse_dimension("", Some(1920)), None);
        assert_eq!(parse_dimension("-20", Some(1920)), None);
        assert_eq!(parse_dimension("0%", Some(1920)), None);
        assert_eq!(parse_dimension("50%", None), None);
    }

    #[test]
    fn window_size_falls_back_per_axis() {
        let output = NativeRect::new(0, 0, 2000, 1000);
        let view = ViewConfig {
            width: "25%".into(),
            height: "tall".into(),
            ..ViewConfig::default()
        };
        assert_eq!(view.window_size(Some(&output)), (500, FALLBACK_HEIGHT));
        assert_eq!(
            ViewConfig::default().window_size(None),
            (FALLBACK_WIDTH, FALLBACK_HEIGHT)
        );
    }

    #[test]
    fn overrides_layer_on_top_of_file() {
        let mut view = ViewConfig {
            mode: Mode::Transparent,
            include_floating: true,
            alpha: Some(0.3),
            width: "800".into(),
            height: "600".into(),
        };
        view.apply(ViewOverrides {
            mode: Some(Mode::Window),
            width: Some("50%".into()),
            ..ViewOverrides::default()
        });
        assert_eq!(view.mode, Mode::Window);
        assert!(view.include_floating, "a missing flag does not clear the file value");
        assert_eq!(view.alpha, Some(0.3));
        assert_eq!(view.width, "50%");
        assert_eq!(view.height, "600");
    }
}

//! Configuration types for the Sowchart viewer.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! configuration file only needs the keys it overrides.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration.
//! - [`EngineConfig`] - Which diagram engine renders flowcharts.
//! - [`ThemeConfig`] - The fixed visual theme, validated into a [`Theme`].
//! - [`ExportConfig`] - Raster scale, background and output directory.
//! - [`ViewConfig`] - Viewport, narrow breakpoint and export gating.
//!
//! # Example
//!
//! ```
//! # use sowchart::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.theme().to_theme().is_ok());
//! assert_eq!(config.export().scale(), 2.0);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use sowchart_core::{
    color::Color,
    theme::{CurveStyle, Theme},
};

use crate::controller::ExportGate;

/// Raised when a configured value cannot be used.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid {field} in config: {message}")]
    Color { field: &'static str, message: String },

    #[error("Invalid curve style in config: {0}")]
    Curve(String),

    #[error("Export scale must be a positive number, got {0}")]
    Scale(f32),

    #[error("Theme font size must be a positive number, got {0}")]
    FontSize(f32),

    #[error("Theme padding must be zero or a positive number, got {0}")]
    Padding(f32),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    engine: EngineConfig,

    #[serde(default)]
    theme: ThemeConfig,

    #[serde(default)]
    export: ExportConfig,

    #[serde(default)]
    view: ViewConfig,
}

impl AppConfig {
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    pub fn export(&self) -> &ExportConfig {
        &self.export
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Checks every value that is only interpreted later: the theme, the
    /// raster scale and the raster background.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.theme.to_theme()?;
        self.export.validated_scale()?;
        self.export.background()?;
        Ok(())
    }
}

/// Diagram engine backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// In-process Mermaid renderer.
    #[default]
    Native,
    /// External Mermaid CLI.
    Command,
}

/// Diagram engine selection.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    kind: EngineKind,

    /// Executable used by [`EngineKind::Command`].
    #[serde(default = "default_command")]
    command: String,

    /// Extra arguments passed before the input/output flags.
    #[serde(default)]
    args: Vec<String>,
}

fn default_command() -> String {
    "mmdc".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            command: default_command(),
            args: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Visual theme as written in configuration. Unset fields use
/// [`Theme::default`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    primary_color: Option<String>,
    #[serde(default)]
    primary_text_color: Option<String>,
    #[serde(default)]
    primary_border_color: Option<String>,
    #[serde(default)]
    line_color: Option<String>,
    #[serde(default)]
    secondary_color: Option<String>,
    #[serde(default)]
    tertiary_color: Option<String>,
    #[serde(default)]
    font_size: Option<f32>,
    #[serde(default)]
    curve: Option<String>,
    #[serde(default)]
    html_labels: Option<bool>,
    #[serde(default)]
    padding: Option<f32>,
}

impl ThemeConfig {
    /// Validates the configured values into a [`Theme`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for unparsable colors or curve names, a
    /// font size that is not positive, or a negative padding.
    pub fn to_theme(&self) -> Result<Theme, ValidationError> {
        let defaults = Theme::default();

        let font_size = self.font_size.unwrap_or(defaults.font_size);
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(ValidationError::FontSize(font_size));
        }
        let padding = self.padding.unwrap_or(defaults.padding);
        if !(padding.is_finite() && padding >= 0.0) {
            return Err(ValidationError::Padding(padding));
        }

        Ok(Theme {
            primary_color: parse_color(
                "primary_color",
                &self.primary_color,
                defaults.primary_color,
            )?,
            primary_text_color: parse_color(
                "primary_text_color",
                &self.primary_text_color,
                defaults.primary_text_color,
            )?,
            primary_border_color: parse_color(
                "primary_border_color",
                &self.primary_border_color,
                defaults.primary_border_color,
            )?,
            line_color: parse_color("line_color", &self.line_color, defaults.line_color)?,
            secondary_color: parse_color(
                "secondary_color",
                &self.secondary_color,
                defaults.secondary_color,
            )?,
            tertiary_color: parse_color(
                "tertiary_color",
                &self.tertiary_color,
                defaults.tertiary_color,
            )?,
            font_size,
            curve: match &self.curve {
                Some(curve) => curve.parse::<CurveStyle>().map_err(ValidationError::Curve)?,
                None => defaults.curve,
            },
            html_labels: self.html_labels.unwrap_or(defaults.html_labels),
            padding,
        })
    }
}

fn parse_color(
    field: &'static str,
    value: &Option<String>,
    default: Color,
) -> Result<Color, ValidationError> {
    value
        .as_deref()
        .map(Color::new)
        .transpose()
        .map(|color| color.unwrap_or(default))
        .map_err(|message| ValidationError::Color { field, message })
}

/// Export settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Device-pixel density of raster snapshots.
    #[serde(default = "default_scale")]
    scale: f32,

    /// Opaque background painted under raster snapshots.
    #[serde(default)]
    background: Option<String>,

    /// Directory receiving exported files.
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
}

fn default_scale() -> f32 {
    2.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            background: None,
            output_dir: default_output_dir(),
        }
    }
}

impl ExportConfig {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Validated raster scale.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Scale`] unless the scale is finite and positive.
    pub fn validated_scale(&self) -> Result<f32, ValidationError> {
        if self.scale.is_finite() && self.scale > 0.0 {
            Ok(self.scale)
        } else {
            Err(ValidationError::Scale(self.scale))
        }
    }

    /// Raster background, white when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Color`] if the configured string is not a color.
    pub fn background(&self) -> Result<Color, ValidationError> {
        parse_color("export background", &self.background, Color::default())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Page layout settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// Width, in pixels, of the viewport the page is laid out for.
    #[serde(default = "default_viewport_width")]
    viewport_width: u32,

    /// Viewports narrower than this present the product list as an overlay.
    #[serde(default = "default_narrow_breakpoint")]
    narrow_breakpoint: u32,

    #[serde(default)]
    export_gate: ExportGate,
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_narrow_breakpoint() -> u32 {
    992
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            narrow_breakpoint: default_narrow_breakpoint(),
            export_gate: ExportGate::default(),
        }
    }
}

impl ViewConfig {
    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn narrow_breakpoint(&self) -> u32 {
        self.narrow_breakpoint
    }

    pub fn export_gate(&self) -> ExportGate {
        self.export_gate
    }
}

//! The fixed visual theme applied to every rendered flowchart.
//!
//! A [`Theme`] is chosen once for the whole application and handed to the
//! diagram engine when it is configured. Defaults reproduce the viewer's
//! blue-on-slate palette.

use std::{fmt, str::FromStr};

use crate::color::Color;

/// Interpolation used for flowchart edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveStyle {
    #[default]
    Basis,
    Linear,
    Cardinal,
    Step,
}

impl CurveStyle {
    /// Name understood by Mermaid's `flowchart.curve` setting.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basis => "basis",
            Self::Linear => "linear",
            Self::Cardinal => "cardinal",
            Self::Step => "step",
        }
    }
}

impl FromStr for CurveStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basis" => Ok(Self::Basis),
            "linear" => Ok(Self::Linear),
            "cardinal" => Ok(Self::Cardinal),
            "step" => Ok(Self::Step),
            other => Err(format!("unknown curve style `{other}`")),
        }
    }
}

impl fmt::Display for CurveStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colors, curve style and label behavior shared by all diagrams.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub primary_color: Color,
    pub primary_text_color: Color,
    pub primary_border_color: Color,
    pub line_color: Color,
    pub secondary_color: Color,
    pub tertiary_color: Color,
    pub font_size: f32,
    pub curve: CurveStyle,
    /// Whether labels may contain HTML such as `<br/>`.
    pub html_labels: bool,
    /// Padding around flowchart nodes, in pixels.
    pub padding: f32,
}

impl Default for Theme {
    fn default() -> Self {
        let color = |s: &str| Color::new(s).expect("built-in theme colors are valid");
        Self {
            primary_color: color("#dbeafe"),
            primary_text_color: color("#1e293b"),
            primary_border_color: color("#2563eb"),
            line_color: color("#64748b"),
            secondary_color: color("#f1f5f9"),
            tertiary_color: color("#f8fafc"),
            font_size: 16.0,
            curve: CurveStyle::Basis,
            html_labels: true,
            padding: 20.0,
        }
    }
}

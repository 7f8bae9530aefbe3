//! In-process Mermaid rendering via `mermaid-rs-renderer`.

use log::trace;

use sowchart_core::theme::Theme;

use super::{DiagramEngine, EngineError};

/// Renders Mermaid flowcharts without leaving the process.
///
/// Only the theme's colors and font size reach this engine; curve style,
/// HTML labels and padding are honored by [`super::CommandEngine`] only.
#[derive(Debug, Clone, Default)]
pub struct NativeEngine {
    theme: Theme,
}

impl NativeEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

fn mermaid_theme(theme: &Theme) -> mermaid_rs_renderer::Theme {
    mermaid_rs_renderer::Theme {
        font_size: theme.font_size.into(),
        primary_color: theme.primary_color.to_hex(),
        primary_text_color: theme.primary_text_color.to_hex(),
        primary_border_color: theme.primary_border_color.to_hex(),
        line_color: theme.line_color.to_hex(),
        secondary_color: theme.secondary_color.to_hex(),
        tertiary_color: theme.tertiary_color.to_hex(),
        text_color: theme.primary_text_color.to_hex(),
        ..mermaid_rs_renderer::Theme::modern()
    }
}

impl DiagramEngine for NativeEngine {
    fn configure(&mut self, theme: &Theme) -> Result<(), EngineError> {
        if !(theme.font_size.is_finite() && theme.font_size > 0.0) {
            return Err(EngineError::Config(format!(
                "font size must be positive, got {}",
                theme.font_size
            )));
        }
        self.theme = theme.clone();
        Ok(())
    }

    async fn render(&self, diagram_id: &str, source: &str) -> Result<String, EngineError> {
        let theme = self.theme.clone();
        let source = source.to_string();

        let svg = tokio::task::spawn_blocking(move || {
            let options = mermaid_rs_renderer::RenderOptions {
                theme: mermaid_theme(&theme),
                layout: mermaid_rs_renderer::LayoutConfig::default(),
            };
            mermaid_rs_renderer::render_with_options(&source, options).map_err(|e| e.to_string())
        })
        .await
        .map_err(|err| EngineError::Task(err.to_string()))?
        .map_err(EngineError::Syntax)?;

        trace!(diagram_id, bytes = svg.len(); "Native Mermaid SVG generated");
        Ok(svg)
    }
}

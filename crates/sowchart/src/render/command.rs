//! Rendering through an external Mermaid CLI (`mmdc` by default).
//!
//! The CLI reads and writes files, so each render works in its own temporary
//! directory: source is written to `<diagram-id>.mmd`, the theme to
//! `<diagram-id>.json`, and the SVG is read back from `<diagram-id>.svg`.

use std::process::Stdio;

use log::{debug, info, trace};
use serde_json::json;
use tokio::{fs, process::Command};

use sowchart_core::theme::Theme;

use super::{DiagramEngine, EngineError};

/// Drives a Mermaid command-line renderer.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    command: String,
    args: Vec<String>,
    mermaid_config: serde_json::Value,
}

impl CommandEngine {
    /// Creates an engine without checking that `command` exists.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            mermaid_config: mermaid_config(&Theme::default()),
        }
    }

    /// Probes `command --version` and returns the engine only if it runs.
    pub async fn locate(command: impl Into<String>, args: Vec<String>) -> Option<Self> {
        let command = command.into();
        let status = Command::new(&command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {
                info!(command = command.as_str(); "Found diagram engine command");
                Some(Self::new(command, args))
            }
            Ok(status) => {
                debug!(command = command.as_str(), status = status.to_string(); "Engine probe failed");
                None
            }
            Err(err) => {
                debug!(command = command.as_str(), err:err; "Engine command not runnable");
                None
            }
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Mermaid configuration carrying the application theme.
fn mermaid_config(theme: &Theme) -> serde_json::Value {
    json!({
        "startOnLoad": false,
        "theme": "default",
        "securityLevel": "loose",
        "fontSize": theme.font_size,
        "flowchart": {
            "useMaxWidth": true,
            "htmlLabels": theme.html_labels,
            "curve": theme.curve.as_str(),
            "padding": theme.padding,
        },
        "themeVariables": {
            "primaryColor": theme.primary_color.to_hex(),
            "primaryTextColor": theme.primary_text_color.to_hex(),
            "primaryBorderColor": theme.primary_border_color.to_hex(),
            "lineColor": theme.line_color.to_hex(),
            "secondaryColor": theme.secondary_color.to_hex(),
            "tertiaryColor": theme.tertiary_color.to_hex(),
            "fontSize": format!("{}px", theme.font_size),
        },
    })
}

impl DiagramEngine for CommandEngine {
    fn configure(&mut self, theme: &Theme) -> Result<(), EngineError> {
        if !(theme.padding.is_finite() && theme.padding >= 0.0) {
            return Err(EngineError::Config(format!(
                "padding must not be negative, got {}",
                theme.padding
            )));
        }
        self.mermaid_config = mermaid_config(theme);
        Ok(())
    }

    async fn render(&self, diagram_id: &str, source: &str) -> Result<String, EngineError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join(format!("{diagram_id}.mmd"));
        let config = workdir.path().join(format!("{diagram_id}.json"));
        let output = workdir.path().join(format!("{diagram_id}.svg"));

        fs::write(&input, source).await?;
        fs::write(&config, self.mermaid_config.to_string()).await?;

        let result = Command::new(&self.command)
            .args(&self.args)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-c")
            .arg(&config)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            return Err(EngineError::Syntax(if stderr.is_empty() {
                format!("`{}` exited with {}", self.command, result.status)
            } else {
                stderr
            }));
        }

        let svg = fs::read_to_string(&output).await?;
        trace!(diagram_id, bytes = svg.len(); "Command engine SVG generated");
        Ok(svg)
    }
}

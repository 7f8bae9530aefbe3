//! Markup for the non-diagram occupants of the display region.

use svg::{
    Document,
    node::element::{Circle, Path, Rectangle},
};

pub const PLACEHOLDER_MESSAGE: &str = "Select a product from the left panel to view its flowchart";
pub const RENDER_FAILED_MESSAGE: &str =
    "Failed to render flowchart. Please check the Mermaid syntax.";
pub const ENGINE_UNAVAILABLE_MESSAGE: &str =
    "The diagram engine is not available. Flowcharts cannot be rendered.";

pub(super) const LOADING_MARKUP: &str = r#"<div class="loading"></div>"#;

fn icon_frame() -> Document {
    Document::new()
        .set("width", 64)
        .set("height", 64)
        .set("viewBox", (0, 0, 64, 64))
        .set("fill", "none")
        .set("stroke", "currentColor")
        .set("stroke-width", 2)
}

/// A framed page with three text lines.
fn placeholder_icon() -> Document {
    icon_frame()
        .add(
            Rectangle::new()
                .set("x", 8)
                .set("y", 16)
                .set("width", 48)
                .set("height", 32)
                .set("rx", 4),
        )
        .add(Path::new().set("d", "M16 24h32M16 32h32M16 40h24"))
}

/// A circled exclamation mark.
fn error_icon() -> Document {
    icon_frame()
        .add(Circle::new().set("cx", 32).set("cy", 32).set("r", 24))
        .add(Path::new().set("d", "M32 20v16M32 44v.5"))
}

fn empty_state(icon: Document, message: &str) -> String {
    format!(
        r#"<div class="empty-state">{icon}<p>{}</p></div>"#,
        escape_text(message)
    )
}

pub(super) fn placeholder_markup() -> String {
    empty_state(placeholder_icon(), PLACEHOLDER_MESSAGE)
}

pub(super) fn error_markup(message: &str) -> String {
    empty_state(error_icon(), message)
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

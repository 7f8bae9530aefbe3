//! The flowchart display region.
//!
//! The region holds one occupant at a time (empty, placeholder, loading,
//! diagram or error message). Each render claims a token before it
//! starts and may only settle the region while that token is still current,
//! so the most recent selection always wins.

use std::sync::Arc;

use parking_lot::Mutex;

use super::affordance;

/// Handle to the display region shared by the renderer and the exporter.
pub type SharedRegion = Arc<Mutex<DisplayRegion>>;

/// A flowchart produced by the diagram engine.
///
/// This is the single marker element wrapping the engine's SVG; raster
/// snapshots capture it as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    diagram_id: String,
    svg: String,
}

impl RenderedDiagram {
    pub fn new(diagram_id: impl Into<String>, svg: impl Into<String>) -> Self {
        Self {
            diagram_id: diagram_id.into(),
            svg: svg.into(),
        }
    }

    /// Identifier the engine rendered this diagram under.
    pub fn diagram_id(&self) -> &str {
        &self.diagram_id
    }

    /// The vector-graphic element.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn markup(&self) -> String {
        format!(r#"<div class="mermaid-diagram">{}</div>"#, self.svg)
    }
}

/// What currently fills the display region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Occupant {
    #[default]
    Empty,
    Placeholder,
    Loading,
    Diagram(RenderedDiagram),
    Error(String),
}

/// Ticket identifying the write that last claimed the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderToken(u64);

/// The container the flowchart is displayed in.
///
/// Every replacement claims a new [`RenderToken`]. An asynchronous render
/// claims the region when it starts and may only [`settle`](Self::settle)
/// its result while its token is still the latest, so overlapping renders
/// resolve to whichever started last.
#[derive(Debug, Clone, Default)]
pub struct DisplayRegion {
    occupant: Occupant,
    token: u64,
}

impl DisplayRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRegion {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn occupant(&self) -> &Occupant {
        &self.occupant
    }

    /// Replaces the occupant and returns the token of this write.
    pub fn claim(&mut self, occupant: Occupant) -> RenderToken {
        self.token += 1;
        self.occupant = occupant;
        RenderToken(self.token)
    }

    /// Replaces the occupant only if `token` is still the latest claim.
    ///
    /// Returns `false` when a newer write has superseded `token`.
    pub fn settle(&mut self, token: RenderToken, occupant: Occupant) -> bool {
        if token.0 != self.token {
            return false;
        }
        self.occupant = occupant;
        true
    }

    pub fn clear(&mut self) {
        self.claim(Occupant::Empty);
    }

    /// The rendered SVG element, if a diagram occupies the region.
    pub fn vector_element(&self) -> Option<&str> {
        self.diagram_element().map(RenderedDiagram::svg)
    }

    /// The marker element wrapping the rendered diagram.
    pub fn diagram_element(&self) -> Option<&RenderedDiagram> {
        match &self.occupant {
            Occupant::Diagram(diagram) => Some(diagram),
            _ => None,
        }
    }

    /// Markup of the current occupant; empty for [`Occupant::Empty`].
    pub fn markup(&self) -> String {
        match &self.occupant {
            Occupant::Empty => String::new(),
            Occupant::Placeholder => affordance::placeholder_markup(),
            Occupant::Loading => affordance::LOADING_MARKUP.to_string(),
            Occupant::Diagram(diagram) => diagram.markup(),
            Occupant::Error(message) => affordance::error_markup(message),
        }
    }
}

//! The state a front end draws: the display region holding the rendered
//! flowchart, and the surrounding page (product cards, panel title, export
//! controls, side panel).
//!
//! Both are shared between the render adapter, the export pipeline and the
//! selection controller through [`SharedRegion`] and [`SharedPage`] handles.
//! Locks are never held across an `.await`.

mod affordance;
mod page;
mod region;

pub use affordance::{ENGINE_UNAVAILABLE_MESSAGE, PLACEHOLDER_MESSAGE, RENDER_FAILED_MESSAGE};
pub use page::{DEFAULT_TITLE, ExportControls, Page, ProductCard, SharedPage, SidePanel};
pub use region::{DisplayRegion, Occupant, RenderToken, RenderedDiagram, SharedRegion};

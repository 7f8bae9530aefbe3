//! The page model: product cards, panel title, export controls and the
//! collapsible side panel.

use std::sync::Arc;

use parking_lot::Mutex;

use sowchart_core::corpus::Corpus;

/// Handle to the page shared by the controller and observers.
pub type SharedPage = Arc<Mutex<Page>>;

/// Panel title shown before any product is selected.
pub const DEFAULT_TITLE: &str = "Select a Product";

/// A selectable product affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    id: String,
    name: String,
    description: String,
    active: bool,
}

impl ProductCard {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Enablement of the two export triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportControls {
    pub vector_enabled: bool,
    pub raster_enabled: bool,
}

/// The collapsible product-list panel used on narrow viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SidePanel {
    pub open: bool,
}

/// Everything around the display region.
#[derive(Debug, Clone)]
pub struct Page {
    cards: Vec<ProductCard>,
    title: String,
    controls: ExportControls,
    side_panel: SidePanel,
    viewport_width: u32,
    narrow_breakpoint: u32,
}

impl Page {
    /// An empty page with disabled export controls.
    pub fn new(viewport_width: u32, narrow_breakpoint: u32) -> Self {
        Self {
            cards: Vec::new(),
            title: DEFAULT_TITLE.to_string(),
            controls: ExportControls::default(),
            side_panel: SidePanel::default(),
            viewport_width,
            narrow_breakpoint,
        }
    }

    /// Replaces the cards with one inactive card per corpus record.
    pub fn render_cards(&mut self, corpus: &Corpus) {
        self.cards = corpus
            .all()
            .map(|record| ProductCard {
                id: record.id().to_string(),
                name: record.name().to_string(),
                description: record.description().to_string(),
                active: false,
            })
            .collect();
    }

    /// Marks the card for `id` active and every other card inactive.
    pub fn mark_active(&mut self, id: &str) {
        for card in &mut self.cards {
            card.active = card.id == id;
        }
    }

    pub fn cards(&self) -> &[ProductCard] {
        &self.cards
    }

    pub fn active_cards(&self) -> impl Iterator<Item = &ProductCard> {
        self.cards.iter().filter(|card| card.active)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Sets the title to `"<name> Flowchart"`.
    pub fn set_title_for(&mut self, product_name: &str) {
        self.title = format!("{product_name} Flowchart");
    }

    pub fn controls(&self) -> ExportControls {
        self.controls
    }

    pub fn enable_exports(&mut self) {
        self.controls = ExportControls {
            vector_enabled: true,
            raster_enabled: true,
        };
    }

    pub fn side_panel(&self) -> SidePanel {
        self.side_panel
    }

    pub fn open_side_panel(&mut self) {
        self.side_panel.open = true;
    }

    pub fn close_side_panel(&mut self) {
        self.side_panel.open = false;
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    /// Whether the product list is presented as an overlay panel.
    pub fn is_narrow(&self) -> bool {
        self.viewport_width < self.narrow_breakpoint
    }
}

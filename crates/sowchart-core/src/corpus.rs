//! The diagram corpus: an immutable, ordered table of product flowcharts.
//!
//! Records are loaded once at start-up, either from the bundled table
//! ([`Corpus::bundled`]) or from an external TOML file
//! ([`Corpus::from_toml`]), and are never mutated afterwards.

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// TOML source of the products shipped with the viewer.
const BUNDLED_PRODUCTS: &str = include_str!("../data/products.toml");

/// One selectable product and the flowchart authored for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiagramRecord {
    id: String,
    name: String,
    description: String,
    #[serde(rename = "source")]
    diagram_source: String,
}

impl DiagramRecord {
    /// Creates a new record.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        diagram_source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            diagram_source: diagram_source.into(),
        }
    }

    /// Stable, slug-like identifier, unique within a [`Corpus`].
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name; also seeds export filenames.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Diagram text in the engine's own grammar. Opaque to this crate.
    pub fn diagram_source(&self) -> &str {
        &self.diagram_source
    }
}

/// Errors raised while building a [`Corpus`].
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to parse corpus: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate product id `{0}`")]
    DuplicateId(String),

    #[error("Product at position {0} has an empty id")]
    EmptyId(usize),
}

#[derive(Deserialize)]
struct CorpusFile {
    #[serde(default)]
    product: Vec<DiagramRecord>,
}

/// Ordered table of [`DiagramRecord`]s keyed by id.
///
/// Iteration order is declaration order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: IndexMap<String, DiagramRecord>,
}

impl Corpus {
    /// Builds a corpus from records, rejecting empty and duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::EmptyId`] or [`CorpusError::DuplicateId`].
    pub fn new(records: impl IntoIterator<Item = DiagramRecord>) -> Result<Self, CorpusError> {
        let mut map = IndexMap::new();
        for (position, record) in records.into_iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(CorpusError::EmptyId(position));
            }
            if map.contains_key(&record.id) {
                return Err(CorpusError::DuplicateId(record.id));
            }
            map.insert(record.id.clone(), record);
        }

        debug!(products = map.len(); "Corpus loaded");
        Ok(Self { records: map })
    }

    /// Parses a corpus from TOML made of `[[product]]` tables with `id`,
    /// `name`, `description` and `source` keys.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Parse`] for malformed TOML, or the id errors of
    /// [`Corpus::new`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sowchart_core::corpus::Corpus;
    ///
    /// let corpus = Corpus::from_toml(r#"
    ///     [[product]]
    ///     id = "demo"
    ///     name = "Demo"
    ///     description = "A demo flow"
    ///     source = "flowchart LR\n A --> B"
    /// "#).unwrap();
    /// assert_eq!(corpus.find_by_id("demo").unwrap().name(), "Demo");
    /// ```
    pub fn from_toml(text: &str) -> Result<Self, CorpusError> {
        let file: CorpusFile = toml::from_str(text)?;
        Self::new(file.product)
    }

    /// The products bundled with the viewer.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled table itself is malformed.
    pub fn bundled() -> Result<Self, CorpusError> {
        Self::from_toml(BUNDLED_PRODUCTS)
    }

    /// All records in declaration order.
    pub fn all(&self) -> impl Iterator<Item = &DiagramRecord> {
        self.records.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&DiagramRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

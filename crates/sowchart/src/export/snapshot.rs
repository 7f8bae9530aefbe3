//! Raster snapshots of the rendered diagram.

use std::{
    future::Future,
    sync::{Arc, LazyLock},
};

use image::{ImageEncoder, codecs::png::PngEncoder};
use log::debug;
use resvg::{
    tiny_skia::{Color, Pixmap, Transform},
    usvg::{self, fontdb},
};
use thiserror::Error;

use crate::view::RenderedDiagram;

/// Largest raster edge, in pixels, a snapshot may produce.
pub const MAX_DIMENSION: u32 = 8192;

/// System fonts, loaded once and shared by every snapshot.
static FONTDB: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    debug!(faces = db.len(); "Loaded system fonts for snapshots");
    Arc::new(db)
});

/// How a snapshot is rasterized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotOptions {
    /// Device-pixel density.
    pub scale: f32,
    /// Opaque background painted under the diagram.
    pub background: [u8; 3],
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: [255, 255, 255],
        }
    }
}

/// Straight-alpha RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps `rgba`, which must hold `width * height * 4` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::BufferSize`] when the length does not match.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, SnapshotError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(SnapshotError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.rgba[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encodes the pixels as PNG.
    ///
    /// # Errors
    ///
    /// Returns the encoder's error.
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(
            &self.rgba,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(png)
    }
}

/// Snapshot failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Could not parse the diagram SVG: {0}")]
    Parse(String),

    #[error("Snapshot dimensions out of range: {width}x{height}")]
    Dimensions { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Snapshot task failed: {0}")]
    Task(String),
}

/// Captures a rendered diagram as pixels.
pub trait Snapshotter {
    fn capture(
        &self,
        element: &RenderedDiagram,
        options: SnapshotOptions,
    ) -> impl Future<Output = Result<PixelBuffer, SnapshotError>>;
}

/// Rasterizes diagram SVG with `resvg`.
#[derive(Debug, Clone, Default)]
pub struct ResvgSnapshotter;

impl ResvgSnapshotter {
    pub fn new() -> Self {
        Self
    }
}

impl Snapshotter for ResvgSnapshotter {
    async fn capture(
        &self,
        element: &RenderedDiagram,
        options: SnapshotOptions,
    ) -> Result<PixelBuffer, SnapshotError> {
        // The parser needs the namespaces the live display can do without.
        let svg = super::stamp_namespaces(element.svg());
        tokio::task::spawn_blocking(move || rasterize(&svg, options))
            .await
            .map_err(|err| SnapshotError::Task(err.to_string()))?
    }
}

fn rasterize(svg: &str, options: SnapshotOptions) -> Result<PixelBuffer, SnapshotError> {
    let opts = usvg::Options {
        fontdb: FONTDB.clone(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| SnapshotError::Parse(e.to_string()))?;

    let size = tree.size();
    let width = (size.width() * options.scale).ceil() as u32;
    let height = (size.height() * options.scale).ceil() as u32;
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(SnapshotError::Dimensions { width, height });
    }

    let mut pixmap = Pixmap::new(width, height).ok_or(SnapshotError::Dimensions { width, height })?;
    let [r, g, b] = options.background;
    pixmap.fill(Color::from_rgba8(r, g, b, 255));

    resvg::render(
        &tree,
        Transform::from_scale(options.scale, options.scale),
        &mut pixmap.as_mut(),
    );

    debug!(width, height; "Diagram rasterized");
    // Fully opaque, so premultiplied and straight alpha coincide.
    PixelBuffer::new(width, height, pixmap.take())
}

//! Delivery of exported files.
//!
//! A download registers a temporary object URL for the blob, activates a
//! transient anchor bound to that URL and the filename, and releases both.
//! [`ObjectUrl`] revokes itself on drop, so the URL is released on every exit
//! path.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, trace};
use parking_lot::Mutex;

/// File contents plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl Blob {
    pub fn new(bytes: Vec<u8>, mime_type: &'static str) -> Self {
        Self { bytes, mime_type }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Default)]
struct Registry {
    next: u64,
    live: HashMap<String, Arc<Blob>>,
}

/// Table of outstanding object URLs.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrlRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `blob` under a fresh URL.
    pub fn create(&self, blob: Blob) -> ObjectUrl {
        let mut registry = self.inner.lock();
        registry.next += 1;
        let url = format!("blob:sowchart/{}", registry.next);
        registry.live.insert(url.clone(), Arc::new(blob));
        trace!(url = url.as_str(); "Object URL created");

        ObjectUrl {
            url,
            registry: self.clone(),
        }
    }

    pub fn resolve(&self, url: &str) -> Option<Arc<Blob>> {
        self.inner.lock().live.get(url).cloned()
    }

    /// Number of URLs not yet revoked.
    pub fn live(&self) -> usize {
        self.inner.lock().live.len()
    }

    fn revoke(&self, url: &str) {
        self.inner.lock().live.remove(url);
        trace!(url; "Object URL revoked");
    }
}

/// A registered object URL, revoked when dropped.
#[derive(Debug)]
pub struct ObjectUrl {
    url: String,
    registry: ObjectUrlRegistry,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

/// Where activated downloads end up.
pub trait DownloadTarget: Send + Sync {
    /// Stores `blob` under `filename` and returns its location.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be stored.
    fn save(&self, filename: &str, blob: &Blob) -> io::Result<PathBuf>;
}

/// Saves downloads into a directory, replacing files of the same name.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadTarget for DirectoryTarget {
    fn save(&self, filename: &str, blob: &Blob) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, blob.bytes())?;
        Ok(path)
    }
}

/// A transient link bound to an object URL and a suggested filename.
#[derive(Debug)]
struct Anchor<'a> {
    href: &'a str,
    download: &'a str,
}

impl Anchor<'_> {
    fn activate(&self, urls: &ObjectUrlRegistry, target: &dyn DownloadTarget) -> io::Result<PathBuf> {
        let blob = urls.resolve(self.href).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("object URL `{}` was revoked", self.href),
            )
        })?;
        target.save(self.download, &blob)
    }
}

/// Record of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub location: PathBuf,
    pub mime_type: &'static str,
    pub bytes: usize,
}

/// Performs downloads through a [`DownloadTarget`].
#[derive(Clone)]
pub struct Downloader {
    urls: ObjectUrlRegistry,
    target: Arc<dyn DownloadTarget>,
}

impl Downloader {
    pub fn new(target: Arc<dyn DownloadTarget>) -> Self {
        Self {
            urls: ObjectUrlRegistry::new(),
            target,
        }
    }

    /// The registry backing this downloader's object URLs.
    pub fn urls(&self) -> &ObjectUrlRegistry {
        &self.urls
    }

    /// Pushes `blob` to the target under `filename`.
    ///
    /// # Errors
    ///
    /// Returns the target's I/O error. The object URL is released either way.
    pub fn download(&self, blob: Blob, filename: &str) -> io::Result<Download> {
        let mime_type = blob.mime_type();
        let bytes = blob.len();

        let url = self.urls.create(blob);
        let anchor = Anchor {
            href: url.as_str(),
            download: filename,
        };
        let location = anchor.activate(&self.urls, self.target.as_ref())?;
        debug!(filename, location = location.display().to_string(); "Download delivered");

        Ok(Download {
            filename: filename.to_string(),
            location,
            mime_type,
            bytes,
        })
    }
}

impl std::fmt::Debug for Downloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Downloader")
            .field("live_urls", &self.urls.live())
            .finish_non_exhaustive()
    }
}

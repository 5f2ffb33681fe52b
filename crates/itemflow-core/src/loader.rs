//! The load step: resolve a location into the pipeline's initial item.

use std::path::{Component, Path, PathBuf};

use crate::config::{Config, LimitsConfig};
use crate::error::LoadError;
use crate::item::{Item, Payload};
use crate::location::{Location, Scheme};
use crate::sniff::detect_classifier;

/// Turns a location into exactly one item, or fails.
pub trait Loader: Send + Sync {
    fn load(&self, location: &Location) -> Result<Item, LoadError>;
}

impl<F> Loader for F
where
    F: Fn(&Location) -> Result<Item, LoadError> + Send + Sync,
{
    fn load(&self, location: &Location) -> Result<Item, LoadError> {
        self(location)
    }
}

/// Default loader: reads `file://` and `bundle://` locations from disk.
///
/// `http://` and `https://` have no resolver and fail with
/// [`LoadError::UnsupportedScheme`], as does anything unclassified.
pub struct SchemeLoader {
    limits: LimitsConfig,
    bundle_dir: PathBuf,
}

impl SchemeLoader {
    pub fn new(limits: LimitsConfig, bundle_dir: PathBuf) -> Self {
        Self { limits, bundle_dir }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.limits.clone(), config.bundle_dir())
    }

    /// Map a location onto a filesystem path.
    pub fn resolve_path(&self, location: &Location) -> Result<PathBuf, LoadError> {
        let path = location.path();
        if path.is_empty() {
            return Err(LoadError::InvalidPath {
                location: location.raw().to_string(),
                reason: "empty path".to_string(),
            });
        }

        match location.scheme() {
            Scheme::File => Ok(PathBuf::from(shellexpand::tilde(path).into_owned())),
            Scheme::Bundle => {
                let relative = Path::new(path);
                let escapes = relative
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
                if escapes {
                    return Err(LoadError::InvalidPath {
                        location: location.raw().to_string(),
                        reason: "bundle paths must stay inside the bundle directory".to_string(),
                    });
                }
                Ok(self.bundle_dir.join(relative))
            }
            scheme => Err(LoadError::UnsupportedScheme {
                location: location.raw().to_string(),
                scheme,
            }),
        }
    }

    fn read_checked(&self, path: &Path) -> Result<Vec<u8>, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| LoadError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(LoadError::TooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        std::fs::read(path).map_err(|e| LoadError::Read {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl Default for SchemeLoader {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Loader for SchemeLoader {
    fn load(&self, location: &Location) -> Result<Item, LoadError> {
        let path = self.resolve_path(location)?;
        let bytes = self.read_checked(&path)?;
        let name = path.file_name().and_then(|n| n.to_str());
        let classifier = detect_classifier(&bytes, name);

        tracing::debug!(
            "Loaded {} ({} bytes) as {}",
            path.display(),
            bytes.len(),
            classifier
        );
        Ok(Item::from_bytes(bytes, classifier))
    }
}

/// Returns a clone of one fixed item for every location.
#[derive(Debug, Clone)]
pub struct FixtureLoader {
    item: Item,
}

impl FixtureLoader {
    pub fn new(item: Item) -> Self {
        Self { item }
    }

    /// An empty `"json"` item, whatever the location.
    pub fn placeholder() -> Self {
        Self::new(Item::new(Payload::Empty, "json"))
    }
}

impl Loader for FixtureLoader {
    fn load(&self, _location: &Location) -> Result<Item, LoadError> {
        Ok(self.item.clone())
    }
}

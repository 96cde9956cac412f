//! Resource openers for locating properties files.
//!
//! Openers are tried first-found-wins, so a composite of the project directory
//! and the working directory behaves like a search path.

use crate::error::{ConfigError, ConfigResult};
use crate::properties::PropertiesSource;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Something that can turn a resource path into a byte stream.
pub trait ResourceOpener {
    /// Open `path`, returning `Ok(None)` when the resource does not exist here.
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read>>>;

    /// Short description used in log output.
    fn describe(&self) -> String;
}

/// Opens files relative to a base directory. Absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct FileSystemOpener {
    base_dir: PathBuf,
}

impl FileSystemOpener {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl ResourceOpener for FileSystemOpener {
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read>>> {
        let full = self.base_dir.join(path);
        match File::open(&full) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn describe(&self) -> String {
        format!("filesystem:{}", self.base_dir.display())
    }
}

/// Tries each opener in order and returns the first stream found.
#[derive(Default)]
pub struct CompositeOpener {
    openers: Vec<Box<dyn ResourceOpener>>,
}

impl CompositeOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, opener: impl ResourceOpener + 'static) -> Self {
        self.openers.push(Box::new(opener));
        self
    }

    pub fn len(&self) -> usize {
        self.openers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.openers.is_empty()
    }
}

impl ResourceOpener for CompositeOpener {
    fn open(&self, path: &str) -> io::Result<Option<Box<dyn Read>>> {
        for opener in &self.openers {
            if let Some(stream) = opener.open(path)? {
                debug!(path = %path, opener = %opener.describe(), "Resolved resource");
                return Ok(Some(stream));
            }
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.openers.iter().map(|o| o.describe()).collect();
        format!("composite[{}]", parts.join(", "))
    }
}

/// Parse a properties stream that the caller expected to exist.
pub fn read_properties<R: Read>(stream: Option<R>, path: &str) -> ConfigResult<PropertiesSource> {
    let stream = stream.ok_or(ConfigError::EmptyInput)?;
    PropertiesSource::from_reader(stream).map_err(|source| ConfigError::MalformedPropertiesStream {
        path: path.to_string(),
        source,
    })
}

/// Resolve `path` through `opener` and parse it.
pub fn load_properties(opener: &dyn ResourceOpener, path: &str) -> ConfigResult<PropertiesSource> {
    let stream = opener
        .open(path)
        .map_err(|e| ConfigError::MalformedPropertiesStream {
            path: path.to_string(),
            source: e.into(),
        })?
        .ok_or_else(|| ConfigError::MissingPropertiesResource(path.to_string()))?;
    read_properties(Some(stream), path)
}

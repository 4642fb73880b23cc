use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("failed to read image {path:?}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path:?}")]
    Undecodable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {0:?} reports empty dimensions")]
    EmptyDimensions(PathBuf),
}

/// Image-loading primitive: yields the natural pixel size of an image.
///
/// Implementations are called from blocking worker threads and may do I/O.
pub trait DimensionProbe: Send + Sync + 'static {
    fn natural_size(&self, url: &str) -> Result<(u32, u32), ProbeError>;
}

/// Probe for local files, addressed either by path or by `file://` URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileProbe;

impl FileProbe {
    pub fn path_from_url(url: &str) -> Result<PathBuf, ProbeError> {
        if let Some(rest) = url.strip_prefix("file://") {
            return Ok(PathBuf::from(rest));
        }
        // Anything else with a scheme needs a network-capable probe.
        if let Some((scheme, _)) = url.split_once("://") {
            if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+') {
                return Err(ProbeError::UnsupportedSource(url.to_string()));
            }
        }
        if url.starts_with("data:") || url.is_empty() {
            return Err(ProbeError::UnsupportedSource(url.to_string()));
        }
        Ok(PathBuf::from(url))
    }

    /// Reads only as much of the file as the decoder needs for the header.
    pub fn read_dimensions(path: &Path) -> Result<(u32, u32), ProbeError> {
        let unreadable = |source: std::io::Error| ProbeError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let (width, height) = ImageReader::open(path)
            .map_err(unreadable)?
            .with_guessed_format()
            .map_err(unreadable)?
            .into_dimensions()
            .map_err(|source| ProbeError::Undecodable {
                path: path.to_path_buf(),
                source,
            })?;

        if width == 0 || height == 0 {
            return Err(ProbeError::EmptyDimensions(path.to_path_buf()));
        }
        Ok((width, height))
    }
}

impl DimensionProbe for FileProbe {
    fn natural_size(&self, url: &str) -> Result<(u32, u32), ProbeError> {
        let path = Self::path_from_url(url)?;
        Self::read_dimensions(&path)
    }
}

//! Natural image geometry for the layout engine.
//!
//! - `DimensionProbe` / `FileProbe` - the image-loading primitive
//! - `AspectRatioCache` - resolved ratios, one per media id
//! - `MetadataLoader` - async resolution feeding the cache

pub mod cache;
pub mod loader;
pub mod probe;

pub use cache::{AspectEntry, AspectRatioCache, SharedAspectCache, REFERENCE_WIDTH};
pub use loader::{MetadataLoader, Resolved};
pub use probe::{DimensionProbe, FileProbe, ProbeError};

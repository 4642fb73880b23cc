//! Waterfall image gallery state.
//!
//! Layout, metadata and viewer logic for a masonry gallery with a modal
//! pan/zoom viewer and a thumbnail dock. Rendering is left to the host; every
//! type here is plain state that can be driven and tested without a UI.

pub mod cli;
pub mod config;
pub mod gallery;
pub mod layout;
pub mod metadata;
pub mod models;
pub mod viewer;

pub use config::GalleryConfig;
pub use gallery::{Gallery, GalleryProps, GalleryView};
pub use models::{ColumnAssignment, MediaId, MediaItem};

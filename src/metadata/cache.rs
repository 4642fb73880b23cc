//! Aspect ratio cache shared by the metadata loader and the layout engine.
//!
//! One entry per media id holding the natural height/width ratio and the
//! height the item occupies when drawn at the reference width. Entries are
//! written once and never evicted for the lifetime of a gallery.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::models::MediaId;

/// Width at which scaled heights are measured.
pub const REFERENCE_WIDTH: f32 = 300.0;

/// Resolved geometry for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectEntry {
    /// Natural height divided by natural width.
    pub ratio: f32,
    /// `ratio` applied to the reference width.
    pub scaled_height: f32,
}

impl AspectEntry {
    /// Returns `None` for images that report a zero dimension.
    pub fn from_dimensions(width: u32, height: u32, reference_width: f32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let ratio = height as f32 / width as f32;
        Some(Self {
            ratio,
            scaled_height: reference_width * ratio,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AspectRatioCache {
    reference_width: f32,
    entries: HashMap<MediaId, AspectEntry>,
}

/// Handle shared between the loader tasks and the gallery.
pub type SharedAspectCache = Arc<RwLock<AspectRatioCache>>;

impl AspectRatioCache {
    /// A non-positive or non-finite reference width falls back to
    /// `REFERENCE_WIDTH`; scaled heights must stay positive.
    pub fn new(reference_width: f32) -> Self {
        let reference_width = if reference_width.is_finite() && reference_width > 0.0 {
            reference_width
        } else {
            warn!(reference_width, "Invalid reference width, using default");
            REFERENCE_WIDTH
        };
        Self {
            reference_width,
            entries: HashMap::new(),
        }
    }

    pub fn shared(reference_width: f32) -> SharedAspectCache {
        Arc::new(RwLock::new(Self::new(reference_width)))
    }

    pub fn reference_width(&self) -> f32 {
        self.reference_width
    }

    pub fn contains(&self, id: MediaId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: MediaId) -> Option<AspectEntry> {
        self.entries.get(&id).copied()
    }

    pub fn ratio(&self, id: MediaId) -> Option<f32> {
        self.entries.get(&id).map(|e| e.ratio)
    }

    pub fn scaled_height(&self, id: MediaId) -> Option<f32> {
        self.entries.get(&id).map(|e| e.scaled_height)
    }

    /// Record natural dimensions for `id`.
    ///
    /// Returns the new entry, or `None` when the id was already cached or the
    /// dimensions are empty. An existing entry is never overwritten.
    pub fn insert_dimensions(&mut self, id: MediaId, width: u32, height: u32) -> Option<AspectEntry> {
        if self.entries.contains_key(&id) {
            return None;
        }
        let entry = AspectEntry::from_dimensions(width, height, self.reference_width)?;
        self.entries.insert(id, entry);
        Some(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AspectRatioCache {
    fn default() -> Self {
        Self::new(REFERENCE_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_height_uses_reference_width() {
        let mut cache = AspectRatioCache::default();
        let entry = cache.insert_dimensions(1, 1600, 900).unwrap();
        assert!((entry.ratio - 0.5625).abs() < 1e-6);
        assert!((entry.scaled_height - 168.75).abs() < 1e-3);
        assert_eq!(cache.scaled_height(1), Some(entry.scaled_height));
    }

    #[test]
    fn test_insert_is_write_once() {
        let mut cache = AspectRatioCache::default();
        assert!(cache.insert_dimensions(1, 800, 800).is_some());
        assert!(cache.insert_dimensions(1, 800, 1600).is_none());
        assert_eq!(cache.ratio(1), Some(1.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        let mut cache = AspectRatioCache::default();
        assert!(cache.insert_dimensions(1, 0, 100).is_none());
        assert!(cache.insert_dimensions(2, 100, 0).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalid_reference_width_falls_back() {
        for width in [0.0, -300.0, f32::NAN, f32::INFINITY] {
            let mut cache = AspectRatioCache::new(width);
            assert_eq!(cache.reference_width(), REFERENCE_WIDTH);
            let entry = cache.insert_dimensions(1, 800, 400).unwrap();
            assert!((entry.scaled_height - 150.0).abs() < 1e-3);
        }
        assert_eq!(AspectRatioCache::new(600.0).reference_width(), 600.0);
    }
}

use crate::models::{MediaId, MediaItem};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnModel {
    pub column_index: u32,
    /// Sum of the layout heights of every item in the column
    pub height_px: f32,
    pub items: Vec<MediaItem>,
}

impl ColumnModel {
    pub fn new(column_index: u32, height_px: f32, items: Vec<MediaItem>) -> Self {
        Self {
            column_index,
            height_px,
            items,
        }
    }

    pub fn ids(&self) -> Vec<MediaId> {
        self.items.iter().map(|item| item.id).collect()
    }
}

/// Columns left to right; within a column, items top to bottom.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnAssignment {
    /// Pixel width shared by every column
    pub column_width: f32,
    pub columns: Vec<ColumnModel>,
}

impl ColumnAssignment {
    pub fn new(column_width: f32, columns: Vec<ColumnModel>) -> Self {
        Self {
            column_width,
            columns,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of items across all columns.
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }

    /// Index of the column holding `id`, if it was laid out.
    pub fn column_of(&self, id: MediaId) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.items.iter().any(|item| item.id == id))
    }

    pub fn contains(&self, id: MediaId) -> bool {
        self.column_of(id).is_some()
    }

    /// Height of the tallest column, i.e. the height of the whole grid.
    pub fn total_height(&self) -> f32 {
        self.columns
            .iter()
            .map(|c| c.height_px)
            .fold(0.0f32, f32::max)
    }
}

use crate::config::GalleryConfig;
use crate::metadata::cache::AspectRatioCache;
use crate::models::{ColumnAssignment, ColumnModel, MediaItem};

/// Configuration for the waterfall (masonry) layout algorithm.
///
/// Items keep their list order and are dropped one at a time into the
/// currently shortest column. Heights are measured at the cache's reference
/// width, so the packing does not depend on the final pixel width.
#[derive(Debug, Clone)]
pub struct WaterfallLayout {
    /// Gap between columns in pixels (default: 16)
    pub gap: f32,
    /// Minimum column width in pixels (default: 250)
    pub min_column_width: f32,
    /// Maximum number of columns (default: 4)
    pub max_columns: usize,
}

impl Default for WaterfallLayout {
    fn default() -> Self {
        Self {
            gap: 16.0,
            min_column_width: 250.0,
            max_columns: 4,
        }
    }
}

/// Item indices per column, the cacheable part of a layout.
pub type ColumnSlots = Vec<Vec<usize>>;

impl WaterfallLayout {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            gap: config.gap,
            min_column_width: config.min_column_width,
            max_columns: config.max_columns,
        }
    }

    /// `floor((width + gap) / (min_column_width + gap))`, clamped to `1..=max_columns`.
    pub fn column_count(&self, container_width: f32) -> usize {
        let max_columns = self.max_columns.max(1);
        let fit = ((container_width + self.gap) / (self.min_column_width + self.gap)).floor();
        if fit.is_nan() || fit < 1.0 {
            return 1;
        }
        if fit.is_infinite() {
            return max_columns;
        }
        (fit as usize).clamp(1, max_columns)
    }

    /// Width of each of `column_count` columns once the gaps are taken out.
    pub fn column_width(&self, container_width: f32, column_count: usize) -> f32 {
        let n = column_count.max(1) as f32;
        ((container_width - (n - 1.0) * self.gap) / n).floor()
    }

    /// Layout height of an item, falling back to the column width when the
    /// item has no cached ratio.
    fn item_height(&self, ratios: &AspectRatioCache, item: &MediaItem, column_width: f32) -> f32 {
        match ratios.scaled_height(item.id) {
            Some(h) if h > 0.0 => h,
            _ => column_width,
        }
    }

    /// Computes the waterfall columns for the items whose ratio is known.
    ///
    /// # Algorithm
    /// 1. Derive column count and width from the container width.
    /// 2. Drop items without a cached ratio; they show up on a later pass.
    /// 3. With `insert_first`, pin the first remaining item to column 0.
    /// 4. Append every other item to the shortest column, lowest index on ties.
    ///
    /// There is no rebalancing pass; the scan is greedy and single-pass.
    pub fn compute(
        &self,
        items: &[MediaItem],
        ratios: &AspectRatioCache,
        container_width: f32,
        insert_first: bool,
    ) -> ColumnAssignment {
        let column_count = self.column_count(container_width);
        let column_width = self.column_width(container_width, column_count);
        let slots = self.compute_slots(items, ratios, column_count, column_width, insert_first);
        self.columns_from_slots(items, ratios, &slots, column_width)
    }

    /// Greedy column assignment as indices into `items`.
    pub fn compute_slots(
        &self,
        items: &[MediaItem],
        ratios: &AspectRatioCache,
        column_count: usize,
        column_width: f32,
        insert_first: bool,
    ) -> ColumnSlots {
        let column_count = column_count.max(1);
        let mut slots: ColumnSlots = vec![Vec::new(); column_count];
        let mut heights = vec![0.0f32; column_count];

        let mut loaded = items
            .iter()
            .enumerate()
            .filter(|(_, item)| ratios.contains(item.id));

        if insert_first {
            if let Some((index, item)) = loaded.next() {
                slots[0].push(index);
                heights[0] += self.item_height(ratios, item, column_width);
            }
        }

        for (index, item) in loaded {
            let shortest = shortest_column(&heights);
            slots[shortest].push(index);
            heights[shortest] += self.item_height(ratios, item, column_width);
        }

        slots
    }

    /// Rebuilds full columns from cached slots without re-running the scan.
    pub fn columns_from_slots(
        &self,
        items: &[MediaItem],
        ratios: &AspectRatioCache,
        slots: &[Vec<usize>],
        column_width: f32,
    ) -> ColumnAssignment {
        let columns = slots
            .iter()
            .enumerate()
            .map(|(column_index, indices)| {
                let mut height = 0.0f32;
                let column_items: Vec<MediaItem> = indices
                    .iter()
                    .filter_map(|&i| items.get(i))
                    .map(|item| {
                        height += self.item_height(ratios, item, column_width);
                        item.clone()
                    })
                    .collect();
                ColumnModel::new(column_index as u32, height, column_items)
            })
            .collect();

        ColumnAssignment::new(column_width, columns)
    }
}

/// First index holding the minimum height.
fn shortest_column(heights: &[f32]) -> usize {
    let mut best = 0;
    for (i, h) in heights.iter().enumerate().skip(1) {
        if *h < heights[best] {
            best = i;
        }
    }
    best
}

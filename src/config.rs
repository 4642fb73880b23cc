use tracing::debug;

use crate::metadata::cache::REFERENCE_WIDTH;
use crate::metadata::loader::DEFAULT_PROBE_WORKERS;

/// Tunables for a gallery instance.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    /// Horizontal gap between columns in pixels (default: 16)
    pub gap: f32,
    /// Narrowest a column may get before one is dropped (default: 250)
    pub min_column_width: f32,
    /// Upper bound on the column count (default: 4)
    pub max_columns: usize,
    /// Width at which item heights are measured for packing (default: 300)
    pub reference_width: f32,
    /// Thumbnails shown in the dock at once (default: 5)
    pub dock_window: usize,
    /// Concurrent dimension probes (default: 8)
    pub probe_workers: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            gap: 16.0,
            min_column_width: 250.0,
            max_columns: 4,
            reference_width: REFERENCE_WIDTH,
            dock_window: 5,
            probe_workers: DEFAULT_PROBE_WORKERS,
        }
    }
}

impl GalleryConfig {
    /// Defaults overlaid with any valid `WATERFALL_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(gap) = env_non_negative_f32("WATERFALL_GAP") {
            config.gap = gap;
        }
        if let Some(width) = env_positive_f32("WATERFALL_MIN_COLUMN_WIDTH") {
            config.min_column_width = width;
        }
        if let Some(columns) = env_positive_usize("WATERFALL_MAX_COLUMNS") {
            config.max_columns = columns;
        }
        if let Some(window) = env_positive_usize("WATERFALL_DOCK_WINDOW") {
            config.dock_window = window;
        }
        if let Some(workers) = env_positive_usize("WATERFALL_PROBE_WORKERS") {
            config.probe_workers = workers;
        }
        debug!(?config, "Loaded gallery config");
        config
    }
}

fn env_positive_usize(key: &str) -> Option<usize> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
}

fn env_positive_f32(key: &str) -> Option<f32> {
    env_non_negative_f32(key).filter(|v| *v > 0.0)
}

fn env_non_negative_f32(key: &str) -> Option<f32> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test touches its own variable so they can run in parallel.

    #[test]
    fn test_defaults() {
        let config = GalleryConfig::default();
        assert_eq!(config.gap, 16.0);
        assert_eq!(config.min_column_width, 250.0);
        assert_eq!(config.max_columns, 4);
        assert_eq!(config.reference_width, 300.0);
        assert_eq!(config.dock_window, 5);
    }

    #[test]
    fn test_env_usize_parses_positive_values() {
        std::env::set_var("WATERFALL_TEST_COLUMNS_OK", " 6 ");
        assert_eq!(env_positive_usize("WATERFALL_TEST_COLUMNS_OK"), Some(6));
    }

    #[test]
    fn test_env_usize_ignores_zero_and_garbage() {
        std::env::set_var("WATERFALL_TEST_COLUMNS_ZERO", "0");
        std::env::set_var("WATERFALL_TEST_COLUMNS_BAD", "many");
        assert_eq!(env_positive_usize("WATERFALL_TEST_COLUMNS_ZERO"), None);
        assert_eq!(env_positive_usize("WATERFALL_TEST_COLUMNS_BAD"), None);
        assert_eq!(env_positive_usize("WATERFALL_TEST_COLUMNS_UNSET"), None);
    }

    #[test]
    fn test_env_f32_rejects_negative_and_nan() {
        std::env::set_var("WATERFALL_TEST_GAP_NEG", "-4");
        std::env::set_var("WATERFALL_TEST_GAP_NAN", "NaN");
        std::env::set_var("WATERFALL_TEST_GAP_ZERO", "0");
        assert_eq!(env_non_negative_f32("WATERFALL_TEST_GAP_NEG"), None);
        assert_eq!(env_non_negative_f32("WATERFALL_TEST_GAP_NAN"), None);
        assert_eq!(env_non_negative_f32("WATERFALL_TEST_GAP_ZERO"), Some(0.0));
        assert_eq!(env_positive_f32("WATERFALL_TEST_GAP_ZERO"), None);
    }
}

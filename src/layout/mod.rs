pub mod layout_cache;
pub mod waterfall;

pub use layout_cache::{CachedWaterfall, LayoutCache};
pub use waterfall::WaterfallLayout;

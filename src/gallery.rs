//! Mountable waterfall gallery.
//!
//! A `Gallery` owns everything one on-screen gallery needs: the host's item
//! list, the aspect ratio cache and loader, the column layout for the
//! current container width, and the viewer session. All methods are meant
//! to be called from the host's single UI thread; only the dimension probes
//! run elsewhere, and their results come back through `poll_loaded`.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::config::GalleryConfig;
use crate::layout::{CachedWaterfall, WaterfallLayout};
use crate::metadata::{AspectRatioCache, DimensionProbe, MetadataLoader};
use crate::models::{index_of, ColumnAssignment, MediaId, MediaItem};
use crate::viewer::{Transition, ViewerSession};

pub const DEFAULT_EMPTY_STATE_MESSAGE: &str = "No images to display";

/// Callback type for delete/download requests
pub type ItemActionCallback = Box<dyn Fn(&MediaItem) + Send + Sync>;

/// Everything the host passes when mounting a gallery.
pub struct GalleryProps {
    pub media_items: Vec<MediaItem>,
    pub title: String,
    pub description: String,
    /// Pin the first loaded item to the top of the first column
    pub insert_at_start: bool,
    pub empty_state_message: Option<String>,
    pub on_delete: Option<ItemActionCallback>,
    pub on_download: Option<ItemActionCallback>,
}

impl fmt::Debug for GalleryProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryProps")
            .field("media_items", &self.media_items.len())
            .field("title", &self.title)
            .field("description", &self.description)
            .field("insert_at_start", &self.insert_at_start)
            .field("empty_state_message", &self.empty_state_message)
            .field("on_delete", &self.on_delete.as_ref().map(|_| "<closure>"))
            .field("on_download", &self.on_download.as_ref().map(|_| "<closure>"))
            .finish()
    }
}

impl GalleryProps {
    pub fn new(
        media_items: Vec<MediaItem>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            media_items,
            title: title.into(),
            description: description.into(),
            insert_at_start: false,
            empty_state_message: None,
            on_delete: None,
            on_download: None,
        }
    }

    pub fn insert_at_start(mut self, enabled: bool) -> Self {
        self.insert_at_start = enabled;
        self
    }

    pub fn empty_state_message(mut self, message: impl Into<String>) -> Self {
        self.empty_state_message = Some(message.into());
        self
    }

    pub fn on_delete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&MediaItem) + Send + Sync + 'static,
    {
        self.on_delete = Some(Box::new(callback));
        self
    }

    pub fn on_download<F>(mut self, callback: F) -> Self
    where
        F: Fn(&MediaItem) + Send + Sync + 'static,
    {
        self.on_download = Some(Box::new(callback));
        self
    }
}

/// What the grid area should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GalleryView<'a> {
    Empty { message: &'a str },
    Columns(&'a ColumnAssignment),
}

pub struct Gallery {
    title: String,
    description: String,
    items: Vec<MediaItem>,
    insert_at_start: bool,
    empty_state_message: String,
    on_delete: Option<ItemActionCallback>,
    on_download: Option<ItemActionCallback>,
    loader: MetadataLoader,
    layout: CachedWaterfall,
    container_width: f32,
    columns: ColumnAssignment,
    viewer: ViewerSession,
}

impl Gallery {
    pub fn mount(props: GalleryProps, probe: Arc<dyn DimensionProbe>) -> Self {
        Self::mount_with_config(props, probe, &GalleryConfig::default())
    }

    pub fn mount_with_config(
        props: GalleryProps,
        probe: Arc<dyn DimensionProbe>,
        config: &GalleryConfig,
    ) -> Self {
        let cache = AspectRatioCache::shared(config.reference_width);
        let loader = MetadataLoader::with_workers(probe, cache, config.probe_workers);

        let mut gallery = Self {
            title: props.title,
            description: props.description,
            items: props.media_items,
            insert_at_start: props.insert_at_start,
            empty_state_message: props
                .empty_state_message
                .unwrap_or_else(|| DEFAULT_EMPTY_STATE_MESSAGE.to_string()),
            on_delete: props.on_delete,
            on_download: props.on_download,
            loader,
            layout: CachedWaterfall::with_layout(WaterfallLayout::from_config(config)),
            container_width: 0.0,
            columns: ColumnAssignment::default(),
            viewer: ViewerSession::new(config.dock_window),
        };

        info!(
            title = %gallery.title,
            items = gallery.items.len(),
            insert_at_start = gallery.insert_at_start,
            "Mounted gallery"
        );
        gallery.relayout();
        gallery
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn empty_state_message(&self) -> &str {
        &self.empty_state_message
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn loader(&self) -> &MetadataLoader {
        &self.loader
    }

    /// Future resolving the aspect ratio of every current item.
    ///
    /// Owns clones of what it needs, so the host can spawn it or block on it,
    /// but it must be polled inside a tokio runtime: the probes run on
    /// `JoinSet` and `spawn_blocking` tasks. Already-cached ids cost nothing. Results become visible in the layout
    /// on the next `poll_loaded`.
    pub fn load(&self) -> impl Future<Output = ()> + Send + 'static {
        let loader = self.loader.clone();
        let items = self.items.clone();
        let first_in_order = self.insert_at_start;
        async move { loader.resolve_all(&items, first_in_order).await }
    }

    /// Apply resolutions that completed since the last call.
    ///
    /// Returns how many items resolved; the layout is recomputed if any did.
    pub fn poll_loaded(&mut self) -> usize {
        let resolved = self.loader.poll_resolved();
        if !resolved.is_empty() {
            trace!(count = resolved.len(), "Applying resolved aspect ratios");
            self.relayout();
        }
        resolved.len()
    }

    /// Container width changed.
    pub fn resize(&mut self, container_width: f32) {
        self.container_width = container_width;
        self.relayout();
    }

    /// Replace the host's item list.
    ///
    /// Cached ratios are kept; new items still need a `load`. The selection
    /// is kept by id even if the item is gone.
    pub fn set_items(&mut self, items: Vec<MediaItem>) {
        debug!(old = self.items.len(), new = items.len(), "Replacing gallery items");
        self.items = items;
        self.viewer.refresh_window(&self.items);
        self.relayout();
    }

    pub fn relayout(&mut self) {
        let ratios = self.loader.cache().read();
        self.columns = self.layout.compute(
            &self.items,
            &ratios,
            self.container_width,
            self.insert_at_start,
        );
        debug!(
            width = self.container_width,
            columns = self.columns.column_count(),
            laid_out = self.columns.item_count(),
            total = self.items.len(),
            "Recomputed waterfall layout"
        );
    }

    pub fn columns(&self) -> &ColumnAssignment {
        &self.columns
    }

    pub fn view(&self) -> GalleryView<'_> {
        if self.items.is_empty() {
            GalleryView::Empty {
                message: &self.empty_state_message,
            }
        } else {
            GalleryView::Columns(&self.columns)
        }
    }

    pub fn viewer(&self) -> &ViewerSession {
        &self.viewer
    }

    /// Zoom, pan and dock drags go through here.
    pub fn viewer_mut(&mut self) -> &mut ViewerSession {
        &mut self.viewer
    }

    /// Open (or switch) the viewer on `id`: grid tile or dock thumbnail.
    pub fn select(&mut self, id: MediaId) -> Transition {
        self.viewer.select(id, &self.items)
    }

    pub fn next(&mut self) -> Transition {
        self.viewer.next(&self.items)
    }

    pub fn previous(&mut self) -> Transition {
        self.viewer.previous(&self.items)
    }

    pub fn close(&mut self) -> Transition {
        self.viewer.close()
    }

    pub fn selected_item(&self) -> Option<&MediaItem> {
        let id = self.viewer.selected_id()?;
        index_of(&self.items, id).map(|i| &self.items[i])
    }

    /// Thumbnails currently shown in the dock.
    pub fn dock_items(&self) -> &[MediaItem] {
        self.viewer.navigator().visible_items(&self.items)
    }

    /// Tell the host the user asked to delete `item`.
    ///
    /// The gallery keeps the item; the host is expected to call `set_items`.
    pub fn delete(&self, item: &MediaItem) {
        match &self.on_delete {
            Some(callback) => callback(item),
            None => trace!(id = item.id, "No delete handler"),
        }
    }

    pub fn download(&self, item: &MediaItem) {
        match &self.on_download {
            Some(callback) => callback(item),
            None => trace!(id = item.id, "No download handler"),
        }
    }

    /// Returns false when the viewer is closed.
    pub fn delete_selected(&self) -> bool {
        match self.selected_item() {
            Some(item) => {
                self.delete(item);
                true
            }
            None => false,
        }
    }

    pub fn download_selected(&self) -> bool {
        match self.selected_item() {
            Some(item) => {
                self.download(item);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Gallery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gallery")
            .field("title", &self.title)
            .field("items", &self.items.len())
            .field("container_width", &self.container_width)
            .field("columns", &self.columns.column_count())
            .field("viewer", &self.viewer.navigator().selection())
            .finish()
    }
}

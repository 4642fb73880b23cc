// Selection and dock navigation for the gallery viewer
//
// States:
// - Closed: nothing selected, viewer hidden
// - Open(id): one item shown enlarged, dock visible
//
// Previous/Next move one step through the full item list and stop at both
// ends. Dock thumbnails jump straight to their item.

use std::ops::Range;

use tracing::debug;

use crate::models::{index_of, MediaId, MediaItem};

/// Default number of thumbnails in the dock
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Current viewer selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Closed,
    Open(MediaId),
}

/// What a navigation call did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Selection is the same as before
    Unchanged,
    /// Viewer went from closed to open on this id
    Opened(MediaId),
    /// Viewer switched items while open
    Moved { from: MediaId, to: MediaId },
    /// Viewer closed
    Closed,
}

impl Transition {
    /// True when the selected id is different afterwards.
    pub fn changed(&self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

/// Half-open index range `[start, end)` of dock thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleWindow {
    pub start: usize,
    pub end: usize,
}

impl VisibleWindow {
    /// Window of `min(capacity, item_count)` indices with `selected_index`
    /// as close to the middle as the list ends allow.
    pub fn around(selected_index: usize, item_count: usize, capacity: usize) -> Self {
        let size = capacity.min(item_count);
        let middle = capacity / 2;
        let start = selected_index
            .saturating_sub(middle)
            .min(item_count - size);
        let end = (start + size).min(item_count);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Items exist before the window (dock shows a "previous" control)
    pub fn has_before(&self) -> bool {
        self.start > 0
    }

    /// Items exist after the window (dock shows a "next" control)
    pub fn has_after(&self, item_count: usize) -> bool {
        self.end < item_count
    }
}

/// Selection state machine plus the dock window derived from it.
#[derive(Debug, Clone)]
pub struct Navigator {
    selection: Selection,
    window_size: usize,
    window: VisibleWindow,
}

impl Navigator {
    pub fn new(window_size: usize) -> Self {
        Self {
            selection: Selection::Closed,
            window_size,
            window: VisibleWindow::default(),
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_id(&self) -> Option<MediaId> {
        match self.selection {
            Selection::Open(id) => Some(id),
            Selection::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.selection, Selection::Open(_))
    }

    /// Position of the selected id in `items`, if open and still present
    pub fn selected_index(&self, items: &[MediaItem]) -> Option<usize> {
        self.selected_id().and_then(|id| index_of(items, id))
    }

    pub fn window(&self) -> VisibleWindow {
        self.window
    }

    /// Dock thumbnails for the current window
    pub fn visible_items<'a>(&self, items: &'a [MediaItem]) -> &'a [MediaItem] {
        let end = self.window.end.min(items.len());
        let start = self.window.start.min(end);
        &items[start..end]
    }

    /// Select `id`, opening the viewer if it was closed.
    ///
    /// Used for grid tiles and dock thumbnails alike; the distance from the
    /// current selection does not matter.
    pub fn select(&mut self, id: MediaId, items: &[MediaItem]) -> Transition {
        let transition = match self.selection {
            Selection::Closed => Transition::Opened(id),
            Selection::Open(current) if current == id => Transition::Unchanged,
            Selection::Open(current) => Transition::Moved {
                from: current,
                to: id,
            },
        };
        self.selection = Selection::Open(id);
        self.refresh_window(items);
        debug!(?transition, window = ?self.window, "Viewer selection");
        transition
    }

    /// Step one item forward; a no-op on the last item.
    pub fn next(&mut self, items: &[MediaItem]) -> Transition {
        if !self.is_open() || items.is_empty() {
            return Transition::Unchanged;
        }
        let target = match self.selected_index(items) {
            Some(index) => (index + 1).min(items.len() - 1),
            // Selected item left the list; fall back to the first item.
            None => 0,
        };
        self.select(items[target].id, items)
    }

    /// Step one item back; a no-op on the first item.
    pub fn previous(&mut self, items: &[MediaItem]) -> Transition {
        if !self.is_open() || items.is_empty() {
            return Transition::Unchanged;
        }
        let target = match self.selected_index(items) {
            Some(index) => index.saturating_sub(1),
            None => 0,
        };
        self.select(items[target].id, items)
    }

    pub fn close(&mut self) -> Transition {
        if !self.is_open() {
            return Transition::Unchanged;
        }
        self.selection = Selection::Closed;
        self.window = VisibleWindow::default();
        debug!("Viewer closed");
        Transition::Closed
    }

    /// Recompute the dock window, e.g. after the host replaced the list.
    ///
    /// A selection missing from `items` is windowed as if it were first.
    pub fn refresh_window(&mut self, items: &[MediaItem]) {
        if !self.is_open() {
            self.window = VisibleWindow::default();
            return;
        }
        let index = self.selected_index(items).unwrap_or(0);
        self.window = VisibleWindow::around(index, items.len(), self.window_size);
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

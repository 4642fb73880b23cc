//! Modal viewer state for the gallery.
//!
//! - `Navigator` - which item is open and the dock window around it
//! - `ViewerTransform` - zoom and pan of the enlarged image
//! - `DockPosition` - where the user dragged the dock to
//!
//! `ViewerSession` keeps the three consistent: the transform goes back to
//! its defaults whenever the selected item changes, and the dock returns to
//! its anchor when the viewer closes.

pub mod navigation;
pub mod transform;

pub use navigation::{Navigator, Selection, Transition, VisibleWindow, DEFAULT_WINDOW_SIZE};
pub use transform::{DockPosition, Offset, ViewerTransform, ZOOM_PRESETS};

use crate::models::{MediaId, MediaItem};

#[derive(Debug, Clone, Default)]
pub struct ViewerSession {
    navigator: Navigator,
    transform: ViewerTransform,
    dock: DockPosition,
}

impl ViewerSession {
    pub fn new(window_size: usize) -> Self {
        Self {
            navigator: Navigator::new(window_size),
            transform: ViewerTransform::default(),
            dock: DockPosition::default(),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn transform(&self) -> &ViewerTransform {
        &self.transform
    }

    /// Zoom/pan controls act directly on the transform.
    pub fn transform_mut(&mut self) -> &mut ViewerTransform {
        &mut self.transform
    }

    pub fn dock(&self) -> &DockPosition {
        &self.dock
    }

    pub fn dock_mut(&mut self) -> &mut DockPosition {
        &mut self.dock
    }

    pub fn is_open(&self) -> bool {
        self.navigator.is_open()
    }

    pub fn selected_id(&self) -> Option<MediaId> {
        self.navigator.selected_id()
    }

    pub fn window(&self) -> VisibleWindow {
        self.navigator.window()
    }

    pub fn select(&mut self, id: MediaId, items: &[MediaItem]) -> Transition {
        let transition = self.navigator.select(id, items);
        self.apply(transition)
    }

    pub fn next(&mut self, items: &[MediaItem]) -> Transition {
        let transition = self.navigator.next(items);
        self.apply(transition)
    }

    pub fn previous(&mut self, items: &[MediaItem]) -> Transition {
        let transition = self.navigator.previous(items);
        self.apply(transition)
    }

    pub fn close(&mut self) -> Transition {
        let transition = self.navigator.close();
        self.apply(transition)
    }

    pub fn refresh_window(&mut self, items: &[MediaItem]) {
        self.navigator.refresh_window(items);
    }

    fn apply(&mut self, transition: Transition) -> Transition {
        match transition {
            Transition::Opened(_) | Transition::Moved { .. } => self.transform.reset_zoom(),
            Transition::Closed => {
                self.transform.reset_zoom();
                self.dock.reset();
            }
            Transition::Unchanged => {}
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: u64) -> Vec<MediaItem> {
        (1..=n)
            .map(|id| MediaItem::new(id, format!("{}", id), format!("{}.jpg", id)))
            .collect()
    }

    fn disturb(session: &mut ViewerSession) {
        session.transform_mut().zoom_in();
        session.transform_mut().drag_end(15.0, -8.0);
    }

    #[test]
    fn test_selection_change_resets_transform() {
        let list = items(7);
        let mut session = ViewerSession::default();
        session.select(2, &list);

        disturb(&mut session);
        session.next(&list);
        assert!(session.transform().is_default());

        disturb(&mut session);
        session.previous(&list);
        assert!(session.transform().is_default());

        disturb(&mut session);
        session.select(6, &list);
        assert!(session.transform().is_default());
    }

    #[test]
    fn test_noop_navigation_keeps_transform() {
        let list = items(3);
        let mut session = ViewerSession::default();
        session.select(3, &list);
        disturb(&mut session);

        assert_eq!(session.next(&list), Transition::Unchanged);
        assert!(!session.transform().is_default());
        assert_eq!(session.transform().zoom_percent(), 110);
    }

    #[test]
    fn test_reopening_starts_from_defaults() {
        let list = items(4);
        let mut session = ViewerSession::default();
        session.select(1, &list);
        disturb(&mut session);
        session.dock_mut().drag_end(100.0, 0.0);

        assert_eq!(session.close(), Transition::Closed);
        assert!(session.transform().is_default());
        assert_eq!(session.dock().offset(), Offset::ZERO);

        assert_eq!(session.select(1, &list), Transition::Opened(1));
        assert!(session.transform().is_default());
    }

    #[test]
    fn test_dock_position_survives_navigation() {
        let list = items(5);
        let mut session = ViewerSession::default();
        session.select(1, &list);
        session.dock_mut().drag_end(20.0, -10.0);
        session.next(&list);
        assert_eq!(session.dock().offset(), Offset::new(20.0, -10.0));
    }
}

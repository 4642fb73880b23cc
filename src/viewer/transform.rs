/// Minimum zoom scale allowed
pub const MIN_SCALE: f64 = 0.5;
/// Maximum zoom scale allowed
pub const MAX_SCALE: f64 = 3.0;
/// Scale change per zoom button press or wheel notch
pub const ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_SCALE: f64 = 1.0;
/// Percentages offered by the zoom preset menu
pub const ZOOM_PRESETS: [u32; 6] = [25, 50, 75, 100, 150, 200];

/// Two-dimensional pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Zoom and pan of the enlarged image.
///
/// Scale and pan are independent. Scale stays within
/// `[MIN_SCALE, MAX_SCALE]` except when set through a preset; pan is
/// unbounded so the image can be dragged anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerTransform {
    scale: f64,
    pan: Offset,
}

impl Default for ViewerTransform {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            pan: Offset::ZERO,
        }
    }
}

impl ViewerTransform {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan(&self) -> Offset {
        self.pan
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn zoom_in(&mut self) {
        self.scale = (self.scale + ZOOM_STEP).min(MAX_SCALE);
    }

    pub fn zoom_out(&mut self) {
        self.scale = (self.scale - ZOOM_STEP).max(MIN_SCALE);
    }

    /// Jump to a preset percentage. Not clamped: presets are trusted.
    pub fn zoom_to(&mut self, percentage: u32) {
        self.scale = f64::from(percentage) / 100.0;
    }

    /// Wheel zoom: scrolling down zooms out, anything else zooms in.
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.zoom_out();
        } else {
            self.zoom_in();
        }
    }

    /// Back to 100% without touching the pan (zoom label click)
    pub fn reset_scale(&mut self) {
        self.scale = DEFAULT_SCALE;
    }

    /// Back to 100% and centred
    pub fn reset_zoom(&mut self) {
        *self = Self::default();
    }

    pub fn double_click(&mut self) {
        self.reset_zoom();
    }

    /// Add a finished drag gesture to the accumulated pan.
    pub fn drag_end(&mut self, delta_x: f64, delta_y: f64) {
        self.pan = self.pan.translated(delta_x, delta_y);
    }

    /// Scale as a rounded percentage, as shown on the zoom label
    pub fn zoom_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }

    /// Preset matching the current zoom label, if any
    pub fn active_preset(&self) -> Option<u32> {
        let percent = self.zoom_percent();
        ZOOM_PRESETS
            .iter()
            .copied()
            .find(|p| i64::from(*p) == percent)
    }
}

/// Offset of the draggable dock from its anchored position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DockPosition {
    offset: Offset,
}

impl DockPosition {
    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn drag_end(&mut self, delta_x: f64, delta_y: f64) {
        self.offset = self.offset.translated(delta_x, delta_y);
    }

    pub fn reset(&mut self) {
        self.offset = Offset::ZERO;
    }
}

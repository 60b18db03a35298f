use crate::foundation::error::{PixupError, PixupResult};
use crate::foundation::geom::{DisplaySize, Point, Rect, ScaleFactors};

/// Smallest selectable square side, in display pixels.
pub const MIN_SIZE: f64 = 50.0;

/// Fraction of the shorter preview side used for the initial selection.
const DEFAULT_FRACTION: f64 = 0.6;

/// Float tolerance accepted on boundary checks.
///
/// Clamped gesture arithmetic can land a region one ulp past a border.
const SLACK: f64 = 1e-6;

/// Minimum side the current preview can actually hold.
///
/// On previews shorter than [`MIN_SIZE`] the bounds win and the whole
/// shorter side becomes the floor.
pub fn effective_min_size(display: DisplaySize) -> f64 {
    MIN_SIZE.min(display.min_side())
}

/// Corner grabbed during a resize gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    /// The corner that stays fixed while this one is dragged.
    pub fn anchor(self) -> Handle {
        match self {
            Handle::TopLeft => Handle::BottomRight,
            Handle::TopRight => Handle::BottomLeft,
            Handle::BottomLeft => Handle::TopRight,
            Handle::BottomRight => Handle::TopLeft,
        }
    }

    fn moves_left_edge(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::BottomLeft)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopRight)
    }
}

/// Square selection over the preview surface, in display pixels.
///
/// Storing a single side length makes the selection square by construction;
/// the gesture operations keep it inside the preview and above the minimum
/// side without ever rejecting pointer input.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl CropRegion {
    /// Validates a selection against the preview bounds.
    ///
    /// Accepts up to `SLACK` of float noise on the boundary checks, then
    /// snaps the stored coordinates exactly into bounds, so regions coming
    /// back out of gesture arithmetic always reconstruct.
    pub fn new(x: f64, y: f64, size: f64, display: DisplaySize) -> PixupResult<Self> {
        if !x.is_finite() || !y.is_finite() || !size.is_finite() {
            return Err(PixupError::validation(
                "CropRegion coordinates must be finite",
            ));
        }
        let min = effective_min_size(display);
        if size < min - SLACK {
            return Err(PixupError::validation(format!(
                "CropRegion size {size} is below the minimum side {min}"
            )));
        }
        if x < -SLACK
            || y < -SLACK
            || x + size > display.width + SLACK
            || y + size > display.height + SLACK
        {
            return Err(PixupError::validation(format!(
                "CropRegion {x},{y} size {size} exceeds the {}x{} preview",
                display.width, display.height
            )));
        }
        let size = size.clamp(min, display.min_side());
        Ok(Self {
            x: x.clamp(0.0, display.width - size),
            y: y.clamp(0.0, display.height - size),
            size,
        })
    }

    /// Initial selection for a freshly loaded image: a centered square at
    /// 60% of the shorter preview side.
    pub fn centered(display: DisplaySize) -> Self {
        let size = (display.min_side() * DEFAULT_FRACTION).max(effective_min_size(display));
        Self {
            x: (display.width - size) / 2.0,
            y: (display.height - size) / 2.0,
            size,
        }
    }

    pub fn right(self) -> f64 {
        self.x + self.size
    }

    pub fn bottom(self) -> f64 {
        self.y + self.size
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn as_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }

    /// Drag semantics: recenter under the pointer, then clamp the
    /// translation so the whole square stays on the preview.
    pub fn move_center_to(self, pointer: Point, display: DisplaySize) -> Self {
        let half = self.size / 2.0;
        let max_x = (display.width - self.size).max(0.0);
        let max_y = (display.height - self.size).max(0.0);
        Self {
            x: (pointer.x - half).clamp(0.0, max_x),
            y: (pointer.y - half).clamp(0.0, max_y),
            size: self.size,
        }
    }

    /// Corner-resize semantics: the grabbed corner chases the pointer while
    /// the opposite corner stays fixed.
    ///
    /// Each axis is clamped independently to the preview and the minimum
    /// side, then the shorter axis wins to keep the selection square.
    pub fn resize_corner(self, handle: Handle, pointer: Point, display: DisplaySize) -> Self {
        let min = effective_min_size(display);

        let (anchor_x, width_room) = if handle.moves_left_edge() {
            (self.right(), self.right())
        } else {
            (self.x, display.width - self.x)
        };
        let raw_width = if handle.moves_left_edge() {
            anchor_x - pointer.x
        } else {
            pointer.x - anchor_x
        };
        let width = raw_width.clamp(min, width_room.max(min));

        let (anchor_y, height_room) = if handle.moves_top_edge() {
            (self.bottom(), self.bottom())
        } else {
            (self.y, display.height - self.y)
        };
        let raw_height = if handle.moves_top_edge() {
            anchor_y - pointer.y
        } else {
            pointer.y - anchor_y
        };
        let height = raw_height.clamp(min, height_room.max(min));

        let size = width.min(height);

        Self {
            x: if handle.moves_left_edge() {
                anchor_x - size
            } else {
                anchor_x
            },
            y: if handle.moves_top_edge() {
                anchor_y - size
            } else {
                anchor_y
            },
            size,
        }
    }

    /// Maps the selection into source image coordinates.
    pub fn source_rect(self, scale: ScaleFactors) -> Rect {
        Rect::new(
            self.x * scale.x,
            self.y * scale.y,
            self.right() * scale.x,
            self.bottom() * scale.y,
        )
    }
}

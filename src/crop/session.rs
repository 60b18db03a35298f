use crate::crop::region::{CropRegion, Handle};
use crate::foundation::error::PixupResult;
use crate::foundation::geom::{fit_within, DisplaySize, NaturalSize, Point};

/// Pointer gesture currently owning the selection.
///
/// At most one gesture is active at a time; a second press while one is in
/// progress is ignored until [`CropSession::finish`] runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging,
    Resizing(Handle),
}

/// Interactive crop state for one loaded image.
///
/// The session owns the selection and the gesture lifecycle: press arms a
/// gesture, pointer moves mutate the selection through the clamping region
/// operations, and [`finish`](CropSession::finish) is the single release
/// path, safe to call any number of times.
#[derive(Clone, Debug)]
pub struct CropSession {
    natural: NaturalSize,
    display: DisplaySize,
    region: CropRegion,
    interaction: Interaction,
}

impl CropSession {
    /// Opens a session with the preview fitted into `max_preview` and the
    /// default centered selection.
    pub fn fitted(natural: NaturalSize, max_preview: DisplaySize) -> Self {
        Self::with_display(natural, fit_within(natural, max_preview))
    }

    /// Opens a session against an already-measured preview surface.
    pub fn with_display(natural: NaturalSize, display: DisplaySize) -> Self {
        Self {
            natural,
            display,
            region: CropRegion::centered(display),
            interaction: Interaction::Idle,
        }
    }

    pub fn natural(&self) -> NaturalSize {
        self.natural
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    pub fn region(&self) -> CropRegion {
        self.region
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Replaces the selection with an explicit, validated one.
    pub fn select(&mut self, x: f64, y: f64, size: f64) -> PixupResult<()> {
        self.region = CropRegion::new(x, y, size, self.display)?;
        Ok(())
    }

    /// Arms a drag gesture. Ignored while another gesture is active.
    pub fn begin_drag(&mut self) {
        if self.interaction == Interaction::Idle {
            self.interaction = Interaction::Dragging;
        }
    }

    /// Arms a corner-resize gesture. Ignored while another gesture is active.
    pub fn begin_resize(&mut self, handle: Handle) {
        if self.interaction == Interaction::Idle {
            self.interaction = Interaction::Resizing(handle);
        }
    }

    /// Feeds a pointer position to the active gesture.
    ///
    /// Any position is accepted; the selection is clamped, never the input.
    /// Without an active gesture this is a no-op.
    pub fn pointer_moved(&mut self, pointer: Point) {
        match self.interaction {
            Interaction::Idle => {}
            Interaction::Dragging => {
                self.region = self.region.move_center_to(pointer, self.display);
            }
            Interaction::Resizing(handle) => {
                self.region = self.region.resize_corner(handle, pointer, self.display);
            }
        }
    }

    /// Ends whatever gesture is active. Idempotent.
    pub fn finish(&mut self) {
        self.interaction = Interaction::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::region::effective_min_size;

    fn session() -> CropSession {
        CropSession::with_display(
            NaturalSize::new(500, 500).unwrap(),
            DisplaySize::new(250.0, 250.0).unwrap(),
        )
    }

    fn assert_region_valid(s: &CropSession) {
        let r = s.region();
        let d = s.display();
        assert!(r.size >= effective_min_size(d) - 1e-9, "{r:?}");
        assert!(r.x >= 0.0 && r.y >= 0.0, "{r:?}");
        assert!(r.right() <= d.width + 1e-9, "{r:?}");
        assert!(r.bottom() <= d.height + 1e-9, "{r:?}");
    }

    #[test]
    fn opens_idle_with_centered_selection() {
        let s = session();
        assert_eq!(s.interaction(), Interaction::Idle);
        assert_eq!(s.region().size, 150.0);
        assert_eq!(s.region().x, 50.0);
        assert_eq!(s.region().y, 50.0);
        assert_region_valid(&s);
    }

    #[test]
    fn fitted_derives_display_from_preview_box() {
        let s = CropSession::fitted(
            NaturalSize::new(1600, 800).unwrap(),
            DisplaySize::new(800.0, 600.0).unwrap(),
        );
        assert_eq!(s.display().width, 800.0);
        assert_eq!(s.display().height, 400.0);
        assert_region_valid(&s);
    }

    #[test]
    fn drag_script_keeps_selection_valid() {
        let mut s = session();
        s.begin_drag();
        assert_eq!(s.interaction(), Interaction::Dragging);

        for pointer in [
            Point::new(10.0, 10.0),
            Point::new(-400.0, 125.0),
            Point::new(125.0, 9000.0),
            Point::new(125.0, 125.0),
        ] {
            s.pointer_moved(pointer);
            assert_region_valid(&s);
            assert_eq!(s.region().size, 150.0);
        }

        s.finish();
        assert_eq!(s.interaction(), Interaction::Idle);
        // The last move centered the selection.
        assert_eq!(s.region().x, 50.0);
        assert_eq!(s.region().y, 50.0);
    }

    #[test]
    fn resize_script_keeps_selection_square_and_valid() {
        let mut s = session();
        s.begin_resize(Handle::BottomRight);
        assert_eq!(s.interaction(), Interaction::Resizing(Handle::BottomRight));

        for pointer in [
            Point::new(240.0, 230.0),
            Point::new(9999.0, 9999.0),
            Point::new(0.0, 0.0),
            Point::new(130.0, 170.0),
        ] {
            s.pointer_moved(pointer);
            assert_region_valid(&s);
        }
        // Last pointer: width 80, height 120 from the (50,50) anchor.
        assert_eq!(s.region().size, 80.0);
        s.finish();
    }

    #[test]
    fn second_press_is_ignored_until_finish() {
        let mut s = session();
        s.begin_drag();
        s.begin_resize(Handle::TopLeft);
        assert_eq!(s.interaction(), Interaction::Dragging);

        s.finish();
        s.begin_resize(Handle::TopLeft);
        assert_eq!(s.interaction(), Interaction::Resizing(Handle::TopLeft));
    }

    #[test]
    fn finish_is_idempotent() {
        let mut s = session();
        s.finish();
        assert_eq!(s.interaction(), Interaction::Idle);

        s.begin_drag();
        s.finish();
        s.finish();
        assert_eq!(s.interaction(), Interaction::Idle);
        assert_region_valid(&s);
    }

    #[test]
    fn moves_without_a_gesture_change_nothing() {
        let mut s = session();
        let before = s.region();
        s.pointer_moved(Point::new(0.0, 0.0));
        assert_eq!(s.region(), before);
    }

    #[test]
    fn select_validates_against_the_display() {
        let mut s = session();
        s.select(50.0, 50.0, 100.0).unwrap();
        assert_eq!(s.region().size, 100.0);
        assert!(s.select(200.0, 200.0, 100.0).is_err());
        // A failed select leaves the previous selection in place.
        assert_eq!(s.region().size, 100.0);
    }
}

//! Coordinate transforms between display and screen space.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::Viewport;

const MIN_SPAN: f64 = 1e-12;

/// Linear transform from display coordinates into screen coordinates.
#[derive(Debug, Clone)]
pub(crate) struct Transform {
    viewport: Viewport,
    screen: ScreenRect,
}

impl Transform {
    /// Create a transform for the given viewport and screen rectangle.
    pub(crate) fn new(viewport: Viewport, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() || !viewport.x.is_finite() || !viewport.y.is_finite() {
            return None;
        }
        let viewport = Viewport::new(
            viewport.x.with_min_span(MIN_SPAN),
            viewport.y.with_min_span(MIN_SPAN),
        );
        Some(Self { viewport, screen })
    }

    /// Access the screen rectangle.
    pub(crate) fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a display X value to a screen X pixel.
    pub(crate) fn x_to_screen(&self, x: f64) -> Option<f32> {
        if !x.is_finite() {
            return None;
        }
        let x_norm = (x - self.viewport.x.min) / self.viewport.x.span();
        Some((self.screen.min.x as f64 + x_norm * self.screen.width() as f64) as f32)
    }

    /// Map a display Y value to a screen Y pixel.
    pub(crate) fn y_to_screen(&self, y: f64) -> Option<f32> {
        if !y.is_finite() {
            return None;
        }
        let y_norm = (y - self.viewport.y.min) / self.viewport.y.span();
        Some((self.screen.max.y as f64 - y_norm * self.screen.height() as f64) as f32)
    }

    /// Map a display point into screen space.
    pub(crate) fn data_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(
            self.x_to_screen(point.x)?,
            self.y_to_screen(point.y)?,
        ))
    }

    /// Map a screen point into display space.
    pub(crate) fn screen_to_data(&self, point: ScreenPoint) -> Point {
        let x_norm = (point.x as f64 - self.screen.min.x as f64) / self.screen.width() as f64;
        let y_norm = (self.screen.max.y as f64 - point.y as f64) / self.screen.height() as f64;
        Point::new(
            self.viewport.x.min + x_norm * self.viewport.x.span(),
            self.viewport.y.min + y_norm * self.viewport.y.span(),
        )
    }
}

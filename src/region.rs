//! A single labeled region on the plot.

use crate::geom::Point;
use crate::render::{
    Color, LineStyle, RectStyle, RenderCommand, RenderList, TextStyle, clip_span, vertical_line,
};
use crate::style::Theme;
use crate::transform::Transform;
use crate::view::Viewport;

/// Scale applied to the base text size for label names.
const LABEL_TEXT_SCALE: f32 = 2.0;

/// Visual marker for one label: a shaded span, two boundary lines and the
/// label name.
///
/// Regions are never dragged by the user. The plot moves their bounds with
/// [`set_region`](Self::set_region) while a label is being resized.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRegion {
    name: String,
    start: f64,
    stop: f64,
    line_colors: Option<(Color, Color)>,
    text_x: Option<f64>,
    text_y: Option<f64>,
}

impl LabelRegion {
    /// Create a region in display units and place its text for `viewport`.
    pub fn new(
        name: impl Into<String>,
        start: f64,
        stop: f64,
        viewport: Option<&Viewport>,
        line_colors: Option<(Color, Color)>,
    ) -> Self {
        let mut region = Self {
            name: name.into(),
            start,
            stop,
            line_colors,
            text_x: None,
            text_y: None,
        };
        region.position_text_y(viewport);
        region.position_text_x(viewport);
        region
    }

    /// Label name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region bounds `(start, stop)` in display units.
    pub fn region(&self) -> (f64, f64) {
        (self.start, self.stop)
    }

    /// Move the region bounds.
    pub fn set_region(&mut self, start: f64, stop: f64) {
        self.start = start;
        self.stop = stop;
    }

    /// Explicit boundary colors, if any.
    pub fn line_colors(&self) -> Option<(Color, Color)> {
        self.line_colors
    }

    /// Regions cannot be dragged directly.
    pub fn is_movable(&self) -> bool {
        false
    }

    /// Text anchor in display units, once both coordinates are known.
    pub fn text_position(&self) -> Option<Point> {
        Some(Point::new(self.text_x?, self.text_y?))
    }

    /// Horizontal text anchor, if placed.
    pub fn text_x(&self) -> Option<f64> {
        self.text_x
    }

    /// Re-place the text for a new view.
    pub fn position_text(&mut self, viewport: Option<&Viewport>) {
        self.position_text_y(viewport);
        self.position_text_x(viewport);
    }

    fn position_text_y(&mut self, viewport: Option<&Viewport>) {
        if let Some(viewport) = viewport {
            self.text_y = Some(viewport.y.midpoint());
        }
    }

    fn position_text_x(&mut self, viewport: Option<&Viewport>) {
        let Some(viewport) = viewport else {
            tracing::debug!("Region {:?} has no view", self.region());
            return;
        };
        let (xmin, xmax) = (viewport.x.min, viewport.x.max);
        if xmin <= self.start && self.start <= xmax {
            self.text_x = Some(self.start);
        } else if self.start < xmin && xmin < self.stop {
            self.text_x = Some(xmin);
        }
    }

    pub(crate) fn render(
        &self,
        transform: &Transform,
        theme: &Theme,
        text_size: f32,
        line_width: f32,
        out: &mut RenderList,
    ) {
        let clip = transform.screen();
        let (Some(start_px), Some(stop_px)) = (
            transform.x_to_screen(self.start),
            transform.x_to_screen(self.stop),
        ) else {
            return;
        };

        if let Some(rect) = clip_span(start_px, stop_px, clip) {
            out.push(RenderCommand::Rect {
                rect,
                style: RectStyle {
                    fill: theme.region_fill,
                    ..RectStyle::default()
                },
            });
        }

        let (start_color, stop_color) = self
            .line_colors
            .unwrap_or((theme.default_line, theme.default_line));
        for (x, color) in [(start_px, start_color), (stop_px, stop_color)] {
            if let Some(segment) = vertical_line(x, clip) {
                out.push(RenderCommand::LineSegments {
                    segments: vec![segment],
                    style: LineStyle {
                        color,
                        width: line_width,
                    },
                });
            }
        }

        if let Some(position) = self
            .text_position()
            .and_then(|anchor| transform.data_to_screen(anchor))
            && clip.contains(position)
        {
            out.push(RenderCommand::Text {
                position,
                text: self.name.clone(),
                style: TextStyle {
                    color: theme.text,
                    size: text_size * LABEL_TEXT_SCALE,
                },
            });
        }
    }
}

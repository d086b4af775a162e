/// Configuration for the GPUI label plot view.
#[derive(Debug, Clone)]
pub struct LabelPlotViewConfig {
    /// Zoom the time axis with the scroll wheel.
    pub scroll_zoom: bool,
    /// Zoom factor change per scrolled pixel.
    pub scroll_zoom_rate: f64,
    /// Line height used to convert line-based scroll deltas to pixels.
    pub scroll_line_height_px: f32,
    /// Pan the time axis by dragging with the right mouse button.
    pub drag_pan: bool,
}

impl Default for LabelPlotViewConfig {
    fn default() -> Self {
        Self {
            scroll_zoom: true,
            scroll_zoom_rate: 0.002,
            scroll_line_height_px: 16.0,
            drag_pan: true,
        }
    }
}

//! GPUI integration for gpui_labelplot.
//!
//! This module provides a GPUI view that renders a
//! [`LabelPlot`](crate::plot::LabelPlot) and forwards keyboard and mouse
//! input to it. Confirmation and error prompts use the window's native
//! dialogs.

mod config;
mod paint;
mod view;

pub use config::LabelPlotViewConfig;
pub use view::{GpuiLabelPlotView, LabelPlotHandle};

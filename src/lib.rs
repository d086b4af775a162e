//! gpui_labelplot is an interactive plot for labeling time intervals.
//! Labels are named `(start, stop)` intervals kept sorted in a resizable
//! dataset. The plot creates, resizes, selects and deletes them from
//! keyboard and mouse input, and renders at most a bounded number of them
//! for the visible window.

#![forbid(unsafe_code)]

pub mod config;
pub mod dialog;
pub mod error;
pub mod event;
pub mod geom;
pub mod interaction;
pub mod notify;
pub mod plot;
pub mod region;
pub mod render;
pub mod selection;
pub mod store;
pub mod style;
mod transform;
pub mod view;
pub mod windowing;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use config::{ConfigError, LabelPlotConfig};
pub use dialog::{DialogHost, HeadlessDialogs};
pub use error::LabelPlotError;
pub use event::{ComplexEvent, TimeUnits};
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use interaction::{
    ClickEvent, EventResponse, InteractionState, Key, KeyEvent, Modifiers, MouseButton,
};
pub use notify::{LabelNotice, Notifier, SubscriptionId};
pub use plot::{DELETE_FAILED, DELETE_PROMPT, LabelPlot, LabelPlotBuilder};
pub use region::LabelRegion;
pub use render::{
    Color, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextStyle,
};
pub use selection::SelectionMask;
pub use store::{
    Dataset, DatasetAttrs, DatasetKind, DocumentStore, LabelDocument, LabelStore, MemoryStore,
    StoreError,
};
pub use style::Theme;
pub use view::{Range, Viewport};

#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiLabelPlotView, LabelPlotHandle, LabelPlotViewConfig};

//! Label editor over a JSON label document.
//!
//! Usage: `label_editor [FILE] [DATASET] [CONFIG]`
//!
//! Hold a letter and click to drop a label; add shift to give it an extent
//! with a second click. Double-click labels to select them and press Delete
//! to remove them. Scroll to zoom, right-drag to pan.

use std::path::PathBuf;

use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::EnvFilter;

use gpui_labelplot::{
    ComplexEvent, Dataset, DatasetAttrs, DocumentStore, GpuiLabelPlotView, LabelNotice,
    LabelPlotBuilder, LabelPlotConfig, Range,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let file = PathBuf::from(args.next().unwrap_or_else(|| "labels.json".to_string()));
    let dataset_path = args.next().unwrap_or_else(|| "/labels".to_string());
    let config = match args.next() {
        Some(path) => LabelPlotConfig::load(path.as_ref()).unwrap_or_else(|err| {
            tracing::warn!("Using default config: {err}");
            LabelPlotConfig::default()
        }),
        None => LabelPlotConfig::default(),
    };

    let store = match DocumentStore::open(&file, dataset_path.clone()) {
        Ok(store) => store,
        Err(err) => {
            tracing::info!("Creating {}: {err}", file.display());
            let seed = Dataset::complex_events(
                DatasetAttrs::milliseconds(),
                vec![
                    ComplexEvent::new("a", 500.0, 1500.0),
                    ComplexEvent::new("b", 1500.0, 2200.0),
                    ComplexEvent::new("c", 4000.0, 4000.0),
                ],
            );
            DocumentStore::create(&file, dataset_path, seed).expect("create label document")
        }
    };

    let plot = LabelPlotBuilder::new()
        .config(config)
        .view_range(Range::new(0.0, 10.0))
        .build(store)
        .expect("label dataset");

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(900.0), px(240.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let view = cx.new(|cx| GpuiLabelPlotView::new(plot, cx));
            cx.subscribe(&view, |_, notice: &LabelNotice, _| match notice {
                LabelNotice::Selected => tracing::info!("label selected"),
                LabelNotice::NoneSelected => tracing::info!("no label selected"),
            })
            .detach();
            view
        })
        .unwrap();
    });
}

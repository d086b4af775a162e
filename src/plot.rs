//! Label plot controller and builder.
//!
//! [`LabelPlot`] owns a [`LabelStore`] handle and turns viewport changes and
//! input events into label edits:
//!
//! - holding a letter key and left clicking creates a zero-width label named
//!   after the key;
//! - holding shift on that click keeps the label active, and the next left
//!   click moves its stop (or its start, when clicking left of it);
//! - double clicking toggles the selection of every label under the cursor;
//! - Delete or Backspace removes the selected labels after confirmation.
//!
//! After every edit the stored labels are sorted by start so the viewport
//! window can be found with a forward and a backward scan.

use crate::config::LabelPlotConfig;
use crate::dialog::DialogHost;
use crate::error::LabelPlotError;
use crate::event::{ComplexEvent, TimeUnits};
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::{
    ClickEvent, EventResponse, InteractionState, KeyEvent, MouseButton, interval_hit, pan_range,
    zoom_range,
};
use crate::notify::{LabelNotice, Notifier, SubscriptionId};
use crate::region::LabelRegion;
use crate::render::{Color, RenderCommand, RenderList};
use crate::selection::SelectionMask;
use crate::store::{DatasetKind, LabelStore, StoreError};
use crate::style::Theme;
use crate::transform::Transform;
use crate::view::{Range, Viewport};
use crate::windowing::{
    AdjacencyColoring, BoundaryColors, is_sorted_by_start, plotted_indices, sort_order,
};

/// Question asked before deleting selected labels.
pub const DELETE_PROMPT: &str = "Delete selected labels?";
/// Error shown when the delete could not be written.
pub const DELETE_FAILED: &str =
    "Could not delete label. Make sure you have write permission for this file.";

/// Interactive plot for making and displaying labels.
#[derive(Debug)]
pub struct LabelPlot<S: LabelStore> {
    store: S,
    config: LabelPlotConfig,
    units: TimeUnits,
    scaling_factor: f64,
    selection: SelectionMask,
    key: Option<char>,
    active: Option<usize>,
    regions: Vec<LabelRegion>,
    viewport: Viewport,
    transform: Option<Transform>,
    notifier: Notifier,
    input_target: bool,
}

impl<S: LabelStore> LabelPlot<S> {
    /// Create a plot over `store` with the default configuration.
    ///
    /// Use [`LabelPlotBuilder`] to set the configuration or initial view.
    pub fn new(store: S) -> Result<Self, LabelPlotError> {
        LabelPlotBuilder::new().build(store)
    }

    fn from_parts(
        store: S,
        config: LabelPlotConfig,
        view_range: Range,
    ) -> Result<Self, LabelPlotError> {
        let dataset = store.dataset();
        if dataset.kind != DatasetKind::ComplexEvent {
            return Err(LabelPlotError::NotComplexEvent);
        }
        if let Some(max_len) = dataset.max_len {
            return Err(LabelPlotError::BoundedMaxShape { max_len });
        }
        let units = TimeUnits::from_attrs(&dataset.attrs)?;
        let selection = SelectionMask::cleared(store.len());
        let viewport = Viewport::new(view_range, config.y_range);

        let mut plot = Self {
            store,
            config,
            units,
            scaling_factor: units.scaling_factor(),
            selection,
            key: None,
            active: None,
            regions: Vec::new(),
            viewport,
            transform: None,
            notifier: Notifier::new(),
            input_target: false,
        };
        if !is_sorted_by_start(plot.store.records()) {
            tracing::warn!("Stored labels are not sorted by start; sorting");
            plot.sort_labels();
        }
        plot.plot_all_events();
        Ok(plot)
    }

    /// Access the store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the store handle.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Access the configuration.
    pub fn config(&self) -> &LabelPlotConfig {
        &self.config
    }

    /// Access the theme.
    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    /// Units of the stored times.
    pub fn units(&self) -> TimeUnits {
        self.units
    }

    /// Divisor from raw stored times to display times.
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// Per-label selection flags.
    pub fn selection(&self) -> &SelectionMask {
        &self.selection
    }

    /// Label key currently held, if any.
    pub fn pending_key(&self) -> Option<char> {
        self.key
    }

    /// Label being resized, if any.
    pub fn active_label(&self) -> Option<&ComplexEvent> {
        self.active.and_then(|_| self.store.records().last())
    }

    /// Current editing state.
    pub fn state(&self) -> InteractionState {
        if self.active.is_some() {
            InteractionState::Dragging
        } else if self.key.is_some() {
            InteractionState::KeyHeld
        } else {
            InteractionState::Idle
        }
    }

    /// Regions rendered for the current view.
    pub fn regions(&self) -> &[LabelRegion] {
        &self.regions
    }

    /// Current view ranges.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Take the request for input focus raised by the last re-render.
    ///
    /// Returns true once per re-render; hosts focus the plot when it does.
    pub fn take_input_target(&mut self) -> bool {
        std::mem::take(&mut self.input_target)
    }

    /// Register a selection observer.
    pub fn subscribe(&mut self, callback: impl FnMut(LabelNotice) + 'static) -> SubscriptionId {
        self.notifier.subscribe(callback)
    }

    /// Remove a selection observer.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Set the pixel rectangle the plot area occupies.
    pub fn set_screen_rect(&mut self, rect: ScreenRect) {
        self.transform = Transform::new(self.viewport, rect);
    }

    /// Pixel rectangle of the plot area, if known.
    pub fn screen_rect(&self) -> Option<ScreenRect> {
        self.transform.as_ref().map(Transform::screen)
    }

    /// Change the visible time window and re-render.
    pub fn set_view_range(&mut self, x: Range) {
        self.viewport = self.viewport.with_x(x);
        if let Some(rect) = self.screen_rect() {
            self.transform = Transform::new(self.viewport, rect);
        }
        self.plot_all_events();
    }

    /// Zoom the time window around screen X `center_px`.
    pub fn zoom_x(&mut self, center_px: f32, factor: f64) {
        let Some(transform) = self.transform.as_ref() else {
            return;
        };
        let center = transform.screen_to_data(ScreenPoint::new(center_px, 0.0)).x;
        self.set_view_range(zoom_range(self.viewport.x, center, factor));
    }

    /// Scroll the time window by a pixel delta (content follows the pointer).
    pub fn pan_x(&mut self, delta_px: f32) {
        let Some(transform) = self.transform.as_ref() else {
            return;
        };
        let width = transform.screen().width() as f64;
        let delta = -(delta_px as f64) / width * self.viewport.x.span();
        self.set_view_range(pan_range(self.viewport.x, delta));
    }

    /// Re-render the labels visible in the current view.
    ///
    /// At most `max_plotted` labels are drawn. While a label is active it is
    /// the last stored record and sits outside the sorted prefix, so it is
    /// rendered separately.
    pub fn plot_all_events(&mut self) {
        self.regions.clear();
        let records = self.store.records();
        let sorted_len = if self.active.is_some() {
            records.len().saturating_sub(1)
        } else {
            records.len()
        };
        let sorted = &records[..sorted_len];

        let indices = plotted_indices(
            sorted,
            self.scaling_factor,
            self.viewport.x,
            self.config.max_plotted,
        );
        let mut coloring = AdjacencyColoring::default();
        for index in indices {
            let record = &sorted[index];
            let colors = coloring.next(record, self.selection.is_selected(index));
            self.regions.push(make_region(
                record,
                self.scaling_factor,
                &self.viewport,
                line_colors(colors, &self.config.theme),
            ));
        }

        if self.active.is_some()
            && let Some(record) = records.last()
        {
            self.regions.push(make_region(
                record,
                self.scaling_factor,
                &self.viewport,
                None,
            ));
            self.active = Some(self.regions.len() - 1);
        }
        tracing::trace!("Rendered {} label regions", self.regions.len());
        self.input_target = true;
    }

    /// Render commands for the current regions, clipped to the plot area.
    pub fn render_list(&self) -> RenderList {
        let mut render = RenderList::new();
        let Some(transform) = self.transform.as_ref() else {
            return render;
        };
        render.push(RenderCommand::ClipRect(transform.screen()));
        for region in &self.regions {
            region.render(
                transform,
                &self.config.theme,
                self.config.text_size,
                self.config.line_width,
                &mut render,
            );
        }
        render.push(RenderCommand::ClipEnd);
        render
    }

    /// Handle a key press.
    ///
    /// A single letter becomes the pending label key. Delete or Backspace
    /// with a selection runs [`delete_selected_labels`](Self::delete_selected_labels).
    pub fn key_press(&mut self, event: &KeyEvent, dialogs: &mut dyn DialogHost) -> EventResponse {
        if let Some(key) = event.label_key() {
            self.key = Some(key);
            EventResponse::Consumed
        } else if event.is_delete() && self.selection.any() {
            self.delete_selected_labels(dialogs);
            EventResponse::Consumed
        } else {
            EventResponse::Ignored
        }
    }

    /// Handle a key release; releasing the pending key clears it.
    pub fn key_release(&mut self, event: &KeyEvent) -> EventResponse {
        match self.key {
            Some(key) if event.text.to_lowercase() == key.to_string() => {
                self.key = None;
                EventResponse::Consumed
            }
            _ => EventResponse::Ignored,
        }
    }

    /// Handle a single mouse click.
    pub fn click(&mut self, event: &ClickEvent) -> EventResponse {
        if event.button != MouseButton::Left {
            return EventResponse::Ignored;
        }
        let Some(transform) = self.transform.as_ref() else {
            return EventResponse::Ignored;
        };
        let t = transform.screen_to_data(event.position).x * self.scaling_factor;

        match (self.key, self.active) {
            (Some(key), None) => {
                self.begin_label(key, t, event.modifiers.shift);
                EventResponse::Consumed
            }
            (_, Some(_)) => {
                self.finish_label(t);
                EventResponse::Consumed
            }
            (None, None) => EventResponse::Ignored,
        }
    }

    fn begin_label(&mut self, key: char, t: f64, extend: bool) {
        let record = ComplexEvent::instant(key.to_string(), t);
        if let Err(err) = self.store.append(record.clone()) {
            tracing::warn!("Failed to append label {:?}: {err}", record.name);
            return;
        }
        tracing::info!("Added label {:?} at {t}", record.name);
        self.regions.push(make_region(
            &record,
            self.scaling_factor,
            &self.viewport,
            None,
        ));
        self.active = Some(self.regions.len() - 1);
        self.selection.reset(self.store.len());

        if !extend {
            self.sort_labels();
            self.active = None;
            self.plot_all_events();
        }
    }

    fn finish_label(&mut self, t: f64) {
        let Some(last_index) = self.store.len().checked_sub(1) else {
            self.active = None;
            return;
        };
        if let Some(last) = self.store.get(last_index).cloned() {
            let updated = if t >= last.start {
                ComplexEvent { stop: t, ..last }
            } else {
                ComplexEvent { start: t, ..last }
            };
            if let Err(err) = self.store.set(last_index, updated) {
                tracing::warn!("Failed to resize label: {err}");
            }
        }

        if let (Some(region_index), Some(record)) = (self.active, self.store.get(last_index)) {
            let (start, stop) = (
                record.start / self.scaling_factor,
                record.stop / self.scaling_factor,
            );
            if let Some(region) = self.regions.get_mut(region_index) {
                region.set_region(start, stop);
            }
        }
        self.active = None;
        self.sort_labels();
        self.plot_all_events();
    }

    /// Handle a double click: toggle every label under the cursor.
    ///
    /// Emits [`LabelNotice::Selected`] when the selection goes from empty to
    /// non-empty and [`LabelNotice::NoneSelected`] when it becomes empty.
    pub fn double_click(&mut self, event: &ClickEvent) -> EventResponse {
        if self.active.is_some() {
            return EventResponse::Ignored;
        }
        let Some(transform) = self.transform.as_ref() else {
            return EventResponse::Ignored;
        };
        let previously_selected = self.selection.any();
        let margin = self.config.pixel_margin;
        let x = event.position.x;

        for (index, record) in self.store.records().iter().enumerate() {
            let start = transform.x_to_screen(record.start / self.scaling_factor);
            let stop = transform.x_to_screen(record.stop / self.scaling_factor);
            if let (Some(start), Some(stop)) = (start, stop)
                && interval_hit(x, start, stop, margin)
            {
                self.selection.toggle(index);
            }
        }

        self.plot_all_events();
        let selected = self.selection.any();
        if selected && !previously_selected {
            self.notifier.emit(LabelNotice::Selected);
            EventResponse::Consumed
        } else if !selected {
            if previously_selected {
                self.notifier.emit(LabelNotice::NoneSelected);
            }
            EventResponse::Ignored
        } else {
            EventResponse::Consumed
        }
    }

    /// Ask for confirmation, then delete the selected labels.
    ///
    /// Returns true when labels were deleted. A failed write is reported
    /// through `dialogs` and leaves everything as it was.
    pub fn delete_selected_labels(&mut self, dialogs: &mut dyn DialogHost) -> bool {
        if !dialogs.confirm(DELETE_PROMPT) {
            return false;
        }
        match self.remove_selected() {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!("Failed to delete selected labels: {err}");
                dialogs.error(DELETE_FAILED);
                false
            }
        }
    }

    /// Delete the selected labels without asking.
    ///
    /// Replaces the stored dataset with the unselected labels in their
    /// current order, clears the selection and emits
    /// [`LabelNotice::NoneSelected`]. Returns the number of labels removed.
    pub fn remove_selected(&mut self) -> Result<usize, StoreError> {
        if !self.selection.any() {
            return Ok(0);
        }
        let kept: Vec<ComplexEvent> = self
            .store
            .records()
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.selection.is_selected(*index))
            .map(|(_, record)| record.clone())
            .collect();
        let removed = self.store.len() - kept.len();

        self.store.replace(kept)?;
        if let Err(err) = self.store.refresh() {
            tracing::warn!("Failed to reload labels after delete: {err}");
        }
        tracing::info!("Deleted {removed} labels");

        self.selection.reset(self.store.len());
        self.plot_all_events();
        self.notifier.emit(LabelNotice::NoneSelected);
        Ok(removed)
    }

    /// Sort stored labels by start, carrying selection flags along.
    ///
    /// The sort is stable: labels with equal starts keep their order.
    pub fn sort_labels(&mut self) {
        let records = self.store.records();
        let order = sort_order(records);
        if order.iter().enumerate().all(|(pos, index)| pos == *index) {
            return;
        }
        let sorted: Vec<ComplexEvent> = order.iter().map(|&index| records[index].clone()).collect();
        match self.store.write_all(sorted) {
            Ok(()) => self.selection.permute(&order),
            Err(err) => tracing::warn!("Failed to write sorted labels: {err}"),
        }
    }
}

/// Builder for configuring a label plot before construction.
#[derive(Debug, Default)]
pub struct LabelPlotBuilder {
    config: LabelPlotConfig,
    view_range: Option<Range>,
}

impl LabelPlotBuilder {
    /// Start from the default configuration and a `0..1` view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn config(mut self, config: LabelPlotConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the initial time window (display units).
    pub fn view_range(mut self, range: Range) -> Self {
        self.view_range = Some(range);
        self
    }

    /// Build the plot over `store`.
    ///
    /// Fails when the store does not hold an unbounded complex event dataset.
    pub fn build<S: LabelStore>(self, store: S) -> Result<LabelPlot<S>, LabelPlotError> {
        LabelPlot::from_parts(store, self.config, self.view_range.unwrap_or_default())
    }
}

fn make_region(
    record: &ComplexEvent,
    scaling_factor: f64,
    viewport: &Viewport,
    line_colors: Option<(Color, Color)>,
) -> LabelRegion {
    LabelRegion::new(
        record.name.clone(),
        record.start / scaling_factor,
        record.stop / scaling_factor,
        Some(viewport),
        line_colors,
    )
}

fn line_colors(colors: BoundaryColors, theme: &Theme) -> Option<(Color, Color)> {
    match colors {
        BoundaryColors::Default => None,
        BoundaryColors::Selected => Some((theme.selected_line, theme.selected_line)),
        BoundaryColors::AfterSelected => Some((theme.adjacent_line, theme.selected_line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::interaction::Modifiers;
    use crate::store::{Dataset, DatasetAttrs, MemoryStore};

    #[derive(Default)]
    struct ScriptedDialogs {
        answer: bool,
        prompts: Vec<String>,
        errors: Vec<String>,
    }

    impl ScriptedDialogs {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                ..Self::default()
            }
        }
    }

    impl DialogHost for ScriptedDialogs {
        fn confirm(&mut self, message: &str) -> bool {
            self.prompts.push(message.to_string());
            self.answer
        }

        fn error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    /// Appends succeed; in-place edits and rewrites fail.
    #[derive(Debug)]
    struct RejectingEdits(MemoryStore);

    impl LabelStore for RejectingEdits {
        fn dataset(&self) -> &Dataset {
            self.0.dataset()
        }

        fn append(&mut self, record: ComplexEvent) -> Result<(), StoreError> {
            self.0.append(record)
        }

        fn set(&mut self, _index: usize, _record: ComplexEvent) -> Result<(), StoreError> {
            Err(StoreError::ReadOnly)
        }

        fn write_all(&mut self, _records: Vec<ComplexEvent>) -> Result<(), StoreError> {
            Err(StoreError::ReadOnly)
        }

        fn replace(&mut self, records: Vec<ComplexEvent>) -> Result<(), StoreError> {
            self.0.replace(records)
        }
    }

    fn screen() -> ScreenRect {
        ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1000.0, 100.0))
    }

    fn abc_store() -> MemoryStore {
        MemoryStore::complex_events(
            DatasetAttrs::milliseconds(),
            vec![
                ComplexEvent::new("a", 0.0, 1000.0),
                ComplexEvent::new("b", 2000.0, 3000.0),
                ComplexEvent::new("c", 4000.0, 5000.0),
            ],
        )
    }

    /// 1000 px wide plot; `seconds` of view maps onto it.
    fn plot_over(store: MemoryStore, seconds: f64) -> LabelPlot<MemoryStore> {
        let mut plot = LabelPlotBuilder::new()
            .view_range(Range::new(0.0, seconds))
            .build(store)
            .expect("valid dataset");
        plot.set_screen_rect(screen());
        plot
    }

    fn record_notices(plot: &mut LabelPlot<MemoryStore>) -> Rc<RefCell<Vec<LabelNotice>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        plot.subscribe(move |notice| sink.borrow_mut().push(notice));
        seen
    }

    fn at(x: f32) -> ClickEvent {
        ClickEvent::left(ScreenPoint::new(x, 50.0))
    }

    #[test]
    fn milliseconds_display_as_seconds() {
        let mut plot = plot_over(abc_store(), 10.0);
        assert_eq!(plot.scaling_factor(), 1000.0);
        let bounds: Vec<_> = plot.regions().iter().map(LabelRegion::region).collect();
        assert_eq!(bounds, vec![(0.0, 1.0), (2.0, 3.0), (4.0, 5.0)]);
        assert!(plot.take_input_target());
        assert!(!plot.take_input_target());
    }

    #[test]
    fn rejects_non_complex_event_dataset() {
        let dataset = Dataset {
            kind: DatasetKind::SimpleEvent,
            ..Dataset::complex_events(DatasetAttrs::default(), Vec::new())
        };
        let err = LabelPlot::new(MemoryStore::new(dataset)).unwrap_err();
        assert!(matches!(err, LabelPlotError::NotComplexEvent));
    }

    #[test]
    fn rejects_bounded_dataset() {
        let mut dataset = Dataset::complex_events(DatasetAttrs::default(), Vec::new());
        dataset.max_len = Some(10);
        let err = LabelPlot::new(MemoryStore::new(dataset)).unwrap_err();
        assert!(matches!(err, LabelPlotError::BoundedMaxShape { max_len: 10 }));
    }

    #[test]
    fn unsorted_input_is_sorted_on_load() {
        let store = MemoryStore::complex_events(
            DatasetAttrs::default(),
            vec![ComplexEvent::new("b", 5.0, 6.0), ComplexEvent::new("a", 1.0, 2.0)],
        );
        let plot = LabelPlot::new(store).unwrap();
        let names: Vec<_> = plot.store().records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn single_click_creates_instant_label() {
        let mut plot = plot_over(abc_store(), 1.0);
        let mut dialogs = ScriptedDialogs::default();

        assert!(plot.key_press(&KeyEvent::text("x"), &mut dialogs).is_consumed());
        assert_eq!(plot.state(), InteractionState::KeyHeld);
        assert!(plot.click(&at(500.0)).is_consumed());

        let records = plot.store().records();
        assert_eq!(records.len(), 4);
        assert_eq!(records[1], ComplexEvent::new("x", 500.0, 500.0));
        assert!(plot.active_label().is_none());
        assert_eq!(plot.selection().len(), 4);
        assert!(!plot.selection().any());
        // The key is still held until released.
        assert_eq!(plot.state(), InteractionState::KeyHeld);
        assert!(plot.key_release(&KeyEvent::text("X")).is_consumed());
        assert_eq!(plot.state(), InteractionState::Idle);
    }

    #[test]
    fn shift_click_then_click_sets_extent() {
        let mut plot = plot_over(abc_store(), 10.0);
        let mut dialogs = ScriptedDialogs::default();
        plot.key_press(&KeyEvent::text("q"), &mut dialogs);

        plot.click(&at(600.0).with_modifiers(Modifiers::shift()));
        assert_eq!(plot.state(), InteractionState::Dragging);
        assert_eq!(
            plot.active_label(),
            Some(&ComplexEvent::new("q", 6000.0, 6000.0))
        );

        plot.click(&at(700.0));
        assert_eq!(plot.state(), InteractionState::KeyHeld);
        assert_eq!(
            plot.store().records().last(),
            Some(&ComplexEvent::new("q", 6000.0, 7000.0))
        );
    }

    #[test]
    fn second_click_left_of_start_moves_start_and_resorts() {
        let mut plot = plot_over(abc_store(), 10.0);
        let mut dialogs = ScriptedDialogs::default();
        plot.key_press(&KeyEvent::text("q"), &mut dialogs);
        plot.click(&at(600.0).with_modifiers(Modifiers::shift()));
        plot.click(&at(150.0));

        let records = plot.store().records();
        assert_eq!(records[1], ComplexEvent::new("q", 1500.0, 6000.0));
        assert!(is_sorted_by_start(records));
        assert!(plot.active_label().is_none());
    }

    #[test]
    fn active_label_survives_view_change() {
        let mut plot = plot_over(abc_store(), 10.0);
        let mut dialogs = ScriptedDialogs::default();
        plot.key_press(&KeyEvent::text("q"), &mut dialogs);
        plot.click(&at(100.0).with_modifiers(Modifiers::shift()));

        plot.set_view_range(Range::new(0.0, 20.0));
        assert_eq!(plot.state(), InteractionState::Dragging);
        let last = plot.regions().last().expect("active region");
        assert_eq!(last.name(), "q");
        assert_eq!(plot.regions().len(), 4);
    }

    #[test]
    fn click_without_key_is_ignored() {
        let mut plot = plot_over(abc_store(), 10.0);
        assert_eq!(plot.click(&at(100.0)), EventResponse::Ignored);
        let right = ClickEvent {
            button: MouseButton::Right,
            ..at(100.0)
        };
        assert_eq!(plot.click(&right), EventResponse::Ignored);
        assert_eq!(plot.store().len(), 3);
    }

    #[test]
    fn key_release_of_other_key_is_ignored() {
        let mut plot = plot_over(abc_store(), 10.0);
        let mut dialogs = ScriptedDialogs::default();
        plot.key_press(&KeyEvent::text("a"), &mut dialogs);
        assert_eq!(plot.key_release(&KeyEvent::text("b")), EventResponse::Ignored);
        assert_eq!(plot.pending_key(), Some('a'));
        assert_eq!(
            plot.key_press(&KeyEvent::text("1"), &mut dialogs),
            EventResponse::Ignored
        );
    }

    #[test]
    fn double_click_selects_label_under_cursor() {
        let mut plot = plot_over(abc_store(), 10.0);
        let seen = record_notices(&mut plot);

        // "c" spans 400..500 px.
        assert!(plot.double_click(&at(450.0)).is_consumed());
        assert_eq!(plot.selection().as_slice(), &[false, false, true]);
        assert_eq!(*seen.borrow(), vec![LabelNotice::Selected]);

        let colors = plot.regions()[2].line_colors();
        assert_eq!(colors, Some((Color::RED, Color::RED)));
    }

    #[test]
    fn double_click_within_margin_hits() {
        let mut plot = plot_over(abc_store(), 10.0);
        plot.double_click(&at(198.5));
        assert_eq!(plot.selection().as_slice(), &[false, true, false]);
    }

    #[test]
    fn double_click_again_deselects_and_propagates() {
        let mut plot = plot_over(abc_store(), 10.0);
        let seen = record_notices(&mut plot);
        plot.double_click(&at(450.0));
        assert_eq!(plot.double_click(&at(450.0)), EventResponse::Ignored);
        assert!(!plot.selection().any());
        assert_eq!(
            *seen.borrow(),
            vec![LabelNotice::Selected, LabelNotice::NoneSelected]
        );
    }

    #[test]
    fn double_click_on_empty_space_is_silent() {
        let mut plot = plot_over(abc_store(), 10.0);
        let seen = record_notices(&mut plot);
        assert_eq!(plot.double_click(&at(800.0)), EventResponse::Ignored);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn double_click_adding_to_selection_is_consumed_quietly() {
        let mut plot = plot_over(abc_store(), 10.0);
        let seen = record_notices(&mut plot);
        plot.double_click(&at(50.0));
        assert!(plot.double_click(&at(250.0)).is_consumed());
        assert_eq!(plot.selection().count(), 2);
        assert_eq!(*seen.borrow(), vec![LabelNotice::Selected]);
    }

    #[test]
    fn double_click_while_dragging_is_ignored() {
        let mut plot = plot_over(abc_store(), 10.0);
        let mut dialogs = ScriptedDialogs::default();
        plot.key_press(&KeyEvent::text("q"), &mut dialogs);
        plot.click(&at(700.0).with_modifiers(Modifiers::shift()));
        assert_eq!(plot.double_click(&at(50.0)), EventResponse::Ignored);
        assert!(!plot.selection().any());
    }

    #[test]
    fn touching_label_after_selected_is_yellow_then_red() {
        let store = MemoryStore::complex_events(
            DatasetAttrs::milliseconds(),
            vec![
                ComplexEvent::new("a", 0.0, 1000.0),
                ComplexEvent::new("b", 1000.0, 2000.0),
            ],
        );
        let mut plot = plot_over(store, 10.0);
        plot.double_click(&at(50.0));
        assert_eq!(plot.selection().as_slice(), &[true, false]);

        let regions = plot.regions();
        assert_eq!(regions[0].line_colors(), Some((Color::RED, Color::RED)));
        assert_eq!(regions[1].line_colors(), Some((Color::YELLOW, Color::RED)));
    }

    #[test]
    fn delete_removes_selected_and_notifies_once() {
        let mut plot = plot_over(abc_store(), 10.0);
        let seen = record_notices(&mut plot);
        let mut dialogs = ScriptedDialogs::answering(true);
        plot.double_click(&at(250.0));

        assert!(plot.key_press(&KeyEvent::delete(), &mut dialogs).is_consumed());
        assert_eq!(dialogs.prompts, vec![DELETE_PROMPT.to_string()]);

        let names: Vec<_> = plot.store().records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(plot.selection().as_slice(), &[false, false]);
        assert!(plot.regions().iter().all(|region| region.name() != "b"));
        assert_eq!(
            *seen.borrow(),
            vec![LabelNotice::Selected, LabelNotice::NoneSelected]
        );
        assert_eq!(plot.store().dataset().max_len, None);
    }

    #[test]
    fn declined_delete_changes_nothing() {
        let mut plot = plot_over(abc_store(), 10.0);
        let mut dialogs = ScriptedDialogs::answering(false);
        plot.double_click(&at(250.0));
        assert!(plot.key_press(&KeyEvent::backspace(), &mut dialogs).is_consumed());
        assert_eq!(plot.store().len(), 3);
        assert_eq!(plot.selection().as_slice(), &[false, true, false]);
    }

    #[test]
    fn delete_without_selection_propagates() {
        let mut plot = plot_over(abc_store(), 10.0);
        let mut dialogs = ScriptedDialogs::answering(true);
        assert_eq!(
            plot.key_press(&KeyEvent::delete(), &mut dialogs),
            EventResponse::Ignored
        );
        assert!(dialogs.prompts.is_empty());
    }

    #[test]
    fn failed_delete_reports_error_and_keeps_state() {
        let mut plot = plot_over(abc_store().read_only(), 10.0);
        let seen = record_notices(&mut plot);
        let mut dialogs = ScriptedDialogs::answering(true);
        plot.double_click(&at(250.0));

        assert!(!plot.delete_selected_labels(&mut dialogs));
        assert_eq!(dialogs.errors, vec![DELETE_FAILED.to_string()]);
        assert_eq!(plot.store().len(), 3);
        assert_eq!(plot.selection().as_slice(), &[false, true, false]);
        assert_eq!(*seen.borrow(), vec![LabelNotice::Selected]);
    }

    #[test]
    fn sort_carries_selection_with_labels() {
        let mut plot = plot_over(abc_store(), 10.0);
        plot.double_click(&at(50.0));
        plot.store
            .write_all(vec![
                ComplexEvent::new("a", 6000.0, 7000.0),
                ComplexEvent::new("b", 2000.0, 3000.0),
                ComplexEvent::new("c", 4000.0, 5000.0),
            ])
            .unwrap();

        plot.sort_labels();
        let names: Vec<_> = plot.store().records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(plot.selection().as_slice(), &[false, false, true]);
    }

    #[test]
    fn append_keeps_mask_length_in_step() {
        let mut plot = plot_over(abc_store(), 10.0);
        let mut dialogs = ScriptedDialogs::default();
        plot.key_press(&KeyEvent::text("z"), &mut dialogs);
        for x in [100.0, 300.0, 900.0] {
            plot.click(&at(x));
            assert_eq!(plot.selection().len(), plot.store().len());
        }
        assert_eq!(plot.store().len(), 6);
    }

    #[test]
    fn render_cap_limits_regions() {
        let records = (0..50)
            .map(|i| ComplexEvent::new("a", i as f64, i as f64 + 0.5))
            .collect();
        let store = MemoryStore::complex_events(DatasetAttrs::default(), records);
        let config = LabelPlotConfig {
            max_plotted: 10,
            ..LabelPlotConfig::default()
        };
        let plot = LabelPlotBuilder::new()
            .config(config)
            .view_range(Range::new(0.0, 100.0))
            .build(store)
            .unwrap();
        assert_eq!(plot.regions().len(), 10);
    }

    #[test]
    fn view_changes_rewindow() {
        let mut plot = plot_over(abc_store(), 10.0);
        plot.set_view_range(Range::new(2.5, 3.5));
        let names: Vec<_> = plot.regions().iter().map(LabelRegion::name).collect();
        assert_eq!(names, vec!["b"]);

        plot.set_view_range(Range::new(0.0, 10.0));
        plot.zoom_x(0.0, 0.5);
        assert_eq!(plot.viewport().x, Range::new(0.0, 5.0));
        plot.pan_x(-100.0);
        assert_eq!(plot.viewport().x, Range::new(0.5, 5.5));
    }

    #[test]
    fn render_list_is_clipped() {
        let plot = plot_over(abc_store(), 10.0);
        let render = plot.render_list();
        let commands = render.commands();
        assert!(matches!(commands.first(), Some(RenderCommand::ClipRect(_))));
        assert!(matches!(commands.last(), Some(RenderCommand::ClipEnd)));
        let texts = commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::Text { .. }))
            .count();
        assert_eq!(texts, 3);
    }

    #[test]
    fn failed_append_leaves_state_unchanged() {
        let mut plot = plot_over(abc_store().read_only(), 10.0);
        let mut dialogs = ScriptedDialogs::default();
        plot.key_press(&KeyEvent::text("x"), &mut dialogs);
        let regions = plot.regions().len();

        assert!(plot.click(&at(600.0).with_modifiers(Modifiers::shift())).is_consumed());
        assert_eq!(plot.state(), InteractionState::KeyHeld);
        assert_eq!(plot.store().len(), 3);
        assert_eq!(plot.selection().len(), plot.store().len());
        assert_eq!(plot.regions().len(), regions);
        assert!(plot.active_label().is_none());
    }

    #[test]
    fn failed_resize_keeps_label_and_ends_drag() {
        let mut plot = LabelPlotBuilder::new()
            .view_range(Range::new(0.0, 10.0))
            .build(RejectingEdits(abc_store()))
            .unwrap();
        plot.set_screen_rect(screen());
        let mut dialogs = ScriptedDialogs::default();
        plot.key_press(&KeyEvent::text("q"), &mut dialogs);
        plot.click(&at(600.0).with_modifiers(Modifiers::shift()));
        assert_eq!(plot.state(), InteractionState::Dragging);

        assert!(plot.click(&at(700.0)).is_consumed());
        assert_eq!(plot.state(), InteractionState::KeyHeld);
        assert_eq!(
            plot.store().records().last(),
            Some(&ComplexEvent::new("q", 6000.0, 6000.0))
        );
        assert_eq!(plot.selection().len(), plot.store().len());
        let last = plot.regions().last().unwrap();
        assert_eq!((last.name(), last.region()), ("q", (6.0, 6.0)));
    }

    #[test]
    fn failed_sort_keeps_order_and_selection() {
        let store = RejectingEdits(MemoryStore::complex_events(
            DatasetAttrs::milliseconds(),
            vec![
                ComplexEvent::new("c", 4000.0, 5000.0),
                ComplexEvent::new("a", 0.0, 1000.0),
                ComplexEvent::new("b", 2000.0, 3000.0),
            ],
        ));
        let mut plot = LabelPlotBuilder::new()
            .view_range(Range::new(0.0, 10.0))
            .build(store)
            .unwrap();
        plot.set_screen_rect(screen());
        plot.double_click(&at(450.0));
        assert_eq!(plot.selection().as_slice(), &[true, false, false]);

        plot.sort_labels();
        let names: Vec<_> = plot.store().records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(plot.selection().as_slice(), &[true, false, false]);
    }
}

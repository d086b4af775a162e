use std::cell::RefCell;
use std::rc::Rc;

use gpui::prelude::*;
use gpui::{
    App, AsyncWindowContext, EventEmitter, FocusHandle, Focusable, KeyDownEvent, KeyUpEvent,
    MouseButton as GpuiMouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point,
    PromptLevel, ScrollWheelEvent, Window, canvas, div, px,
};

use crate::dialog::HeadlessDialogs;
use crate::geom::ScreenPoint;
use crate::interaction::{ClickEvent, KeyEvent, Modifiers, MouseButton};
use crate::notify::LabelNotice;
use crate::plot::{DELETE_FAILED, DELETE_PROMPT, LabelPlot};
use crate::store::LabelStore;

use super::config::LabelPlotViewConfig;
use super::paint::{paint_render_list, screen_rect, to_hsla};

/// A GPUI view that renders a [`LabelPlot`] and edits labels from input.
///
/// Selection notices are re-emitted as GPUI events, so other entities can
/// `cx.subscribe` to [`LabelNotice`].
pub struct GpuiLabelPlotView<S: LabelStore + 'static> {
    plot: Rc<RefCell<LabelPlot<S>>>,
    notices: Rc<RefCell<Vec<LabelNotice>>>,
    focus_handle: FocusHandle,
    config: LabelPlotViewConfig,
    pan_anchor: Option<f32>,
}

impl<S: LabelStore + 'static> GpuiLabelPlotView<S> {
    /// Create a view for `plot` with the default [`LabelPlotViewConfig`].
    pub fn new(plot: LabelPlot<S>, cx: &mut Context<Self>) -> Self {
        Self::with_config(plot, LabelPlotViewConfig::default(), cx)
    }

    /// Create a view with a custom configuration.
    pub fn with_config(
        mut plot: LabelPlot<S>,
        config: LabelPlotViewConfig,
        cx: &mut Context<Self>,
    ) -> Self {
        let notices = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&notices);
        plot.subscribe(move |notice| sink.borrow_mut().push(notice));
        Self {
            plot: Rc::new(RefCell::new(plot)),
            notices,
            focus_handle: cx.focus_handle(),
            config,
            pan_anchor: None,
        }
    }

    /// Get a handle for reading or mutating the underlying plot.
    pub fn plot_handle(&self) -> LabelPlotHandle<S> {
        LabelPlotHandle {
            plot: Rc::clone(&self.plot),
        }
    }

    fn flush_notices(&mut self, cx: &mut Context<Self>) {
        let pending: Vec<LabelNotice> = self.notices.borrow_mut().drain(..).collect();
        for notice in pending {
            cx.emit(notice);
        }
    }

    fn on_key_down(&mut self, ev: &KeyDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        let event = key_event(&ev.keystroke.key, ev.keystroke.key_char.as_deref());
        if event.is_delete() && self.plot.borrow().selection().any() {
            self.confirm_delete(window, cx);
            cx.stop_propagation();
            return;
        }
        let response = self
            .plot
            .borrow_mut()
            .key_press(&event, &mut HeadlessDialogs);
        if response.is_consumed() {
            cx.stop_propagation();
        }
    }

    fn on_key_up(&mut self, ev: &KeyUpEvent, cx: &mut Context<Self>) {
        let event = key_event(&ev.keystroke.key, ev.keystroke.key_char.as_deref());
        if self.plot.borrow_mut().key_release(&event).is_consumed() {
            cx.stop_propagation();
        }
    }

    fn confirm_delete(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let answer = window.prompt(
            PromptLevel::Warning,
            DELETE_PROMPT,
            None,
            &["Yes", "No"],
            cx,
        );
        let plot = Rc::clone(&self.plot);
        let view = cx.weak_entity();
        window
            .spawn(cx, move |cx: &mut AsyncWindowContext| {
                let mut cx = cx.clone();
                async move {
                    if !matches!(answer.await, Ok(0)) {
                        return;
                    }
                    let result = plot.borrow_mut().remove_selected();
                    let dismissed = cx.update(|window, cx| {
                        if view
                            .update(cx, |view, cx| {
                                view.flush_notices(cx);
                                cx.notify();
                            })
                            .is_err()
                        {
                            tracing::debug!("Label plot view closed before delete finished");
                        }
                        result.err().map(|err| {
                            tracing::warn!("Failed to delete selected labels: {err}");
                            window.prompt(PromptLevel::Critical, DELETE_FAILED, None, &["OK"], cx)
                        })
                    });
                    // Keep the task alive until the error prompt is dismissed.
                    if let Ok(Some(dismissed)) = dismissed
                        && dismissed.await.is_err()
                    {
                        tracing::debug!("Delete error prompt closed without an answer");
                    }
                }
            })
            .detach();
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        self.focus_handle.focus(window);
        let pos = screen_point(ev.position);
        if ev.button == GpuiMouseButton::Right && self.config.drag_pan {
            self.pan_anchor = Some(pos.x);
        }

        let click = ClickEvent {
            button: mouse_button(ev.button),
            position: pos,
            modifiers: Modifiers {
                shift: ev.modifiers.shift,
                control: ev.modifiers.control,
                alt: ev.modifiers.alt,
            },
        };
        let response = {
            let mut plot = self.plot.borrow_mut();
            match ev.click_count {
                1 => plot.click(&click),
                2 => plot.double_click(&click),
                _ => return,
            }
        };
        self.flush_notices(cx);
        if response.is_consumed() {
            cx.stop_propagation();
        }
        cx.notify();
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let Some(anchor) = self.pan_anchor else {
            return;
        };
        if ev.pressed_button != Some(GpuiMouseButton::Right) {
            self.pan_anchor = None;
            return;
        }
        let x = f32::from(ev.position.x);
        self.plot.borrow_mut().pan_x(x - anchor);
        self.pan_anchor = Some(x);
        cx.notify();
    }

    fn on_mouse_up(&mut self, _ev: &MouseUpEvent, _cx: &mut Context<Self>) {
        self.pan_anchor = None;
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, cx: &mut Context<Self>) {
        if !self.config.scroll_zoom {
            return;
        }
        let delta = ev
            .delta
            .pixel_delta(px(self.config.scroll_line_height_px));
        let zoom_delta = -f32::from(delta.y);
        if zoom_delta.abs() < 0.01 {
            return;
        }
        let factor = (1.0 - zoom_delta as f64 * self.config.scroll_zoom_rate).clamp(0.1, 10.0);
        self.plot
            .borrow_mut()
            .zoom_x(f32::from(ev.position.x), factor);
        cx.notify();
    }
}

impl<S: LabelStore + 'static> EventEmitter<LabelNotice> for GpuiLabelPlotView<S> {}

impl<S: LabelStore + 'static> Focusable for GpuiLabelPlotView<S> {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl<S: LabelStore + 'static> Render for GpuiLabelPlotView<S> {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.plot.borrow_mut().take_input_target() {
            self.focus_handle.focus(window);
        }
        let plot = Rc::clone(&self.plot);
        let background = self.plot.borrow().theme().background;

        div()
            .size_full()
            .track_focus(&self.focus_handle)
            .bg(to_hsla(background))
            .child(
                canvas(
                    move |bounds, _window, _| {
                        let mut plot = plot.borrow_mut();
                        plot.set_screen_rect(screen_rect(bounds));
                        plot.render_list()
                    },
                    move |_, render, window, cx| {
                        paint_render_list(&render, window, cx);
                    },
                )
                .size_full(),
            )
            .on_key_down(cx.listener(|this, ev, window, cx| {
                this.on_key_down(ev, window, cx);
            }))
            .on_key_up(cx.listener(|this, ev, _, cx| {
                this.on_key_up(ev, cx);
            }))
            .on_mouse_down(
                GpuiMouseButton::Left,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_down(ev, window, cx);
                }),
            )
            .on_mouse_down(
                GpuiMouseButton::Right,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_down(ev, window, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                GpuiMouseButton::Right,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_scroll_wheel(cx.listener(|this, ev, _, cx| {
                this.on_scroll(ev, cx);
            }))
    }
}

/// A handle for reading or mutating a [`LabelPlot`] held inside a
/// [`GpuiLabelPlotView`].
///
/// The handle clones cheaply and can be moved into foreground tasks. Call
/// `cx.notify()` on the view after mutating so it repaints.
pub struct LabelPlotHandle<S: LabelStore> {
    plot: Rc<RefCell<LabelPlot<S>>>,
}

impl<S: LabelStore> Clone for LabelPlotHandle<S> {
    fn clone(&self) -> Self {
        Self {
            plot: Rc::clone(&self.plot),
        }
    }
}

impl<S: LabelStore> LabelPlotHandle<S> {
    /// Read the plot state.
    ///
    /// The plot is borrowed for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&LabelPlot<S>) -> R) -> R {
        f(&self.plot.borrow())
    }

    /// Mutate the plot state.
    ///
    /// The plot is borrowed for the duration of the callback.
    pub fn write<R>(&self, f: impl FnOnce(&mut LabelPlot<S>) -> R) -> R {
        f(&mut self.plot.borrow_mut())
    }
}

fn key_event(key: &str, key_char: Option<&str>) -> KeyEvent {
    match key {
        "delete" => KeyEvent::delete(),
        "backspace" => KeyEvent::backspace(),
        _ => KeyEvent::text(key_char.unwrap_or(key)),
    }
}

fn mouse_button(button: GpuiMouseButton) -> MouseButton {
    match button {
        GpuiMouseButton::Left => MouseButton::Left,
        GpuiMouseButton::Right => MouseButton::Right,
        _ => MouseButton::Middle,
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}

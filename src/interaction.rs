//! Input events and interaction helpers.
//!
//! Backends translate toolkit events into these types and feed them to
//! [`LabelPlot`](crate::plot::LabelPlot). Handlers answer with an
//! [`EventResponse`] so the host knows whether to propagate the event.

use crate::geom::ScreenPoint;
use crate::view::Range;

/// Whether a handler used an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// The plot handled the event; stop propagation.
    Consumed,
    /// The plot did not handle the event; let the host propagate it.
    Ignored,
}

impl EventResponse {
    /// Check whether the event was consumed.
    pub fn is_consumed(self) -> bool {
        self == Self::Consumed
    }
}

/// Label editing state, derived from the pending key and active label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// No pending key and no active label.
    Idle,
    /// A label key is held; the next left click creates a label.
    KeyHeld,
    /// A label was created with shift held; the next left click sets its extent.
    Dragging,
}

/// Keys the plot reacts to besides label letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    /// Any other key; its text decides what happens.
    Other,
}

/// Key press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key.
    pub key: Key,
    /// Text the key produced, if any.
    pub text: String,
}

impl KeyEvent {
    /// A key that produced `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            key: Key::Other,
            text: text.into(),
        }
    }

    /// The Delete key.
    pub fn delete() -> Self {
        Self {
            key: Key::Delete,
            text: String::new(),
        }
    }

    /// The Backspace key.
    pub fn backspace() -> Self {
        Self {
            key: Key::Backspace,
            text: String::new(),
        }
    }

    /// Lowercased label key, when the text is exactly one alphabetic character.
    pub(crate) fn label_key(&self) -> Option<char> {
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_alphabetic() => ch.to_lowercase().next(),
            _ => None,
        }
    }

    pub(crate) fn is_delete(&self) -> bool {
        matches!(self.key, Key::Delete | Key::Backspace)
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keyboard modifiers held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Only shift held.
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }
}

/// Mouse click (single or double) in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub button: MouseButton,
    pub position: ScreenPoint,
    pub modifiers: Modifiers,
}

impl ClickEvent {
    /// Left click without modifiers.
    pub fn left(position: ScreenPoint) -> Self {
        Self {
            button: MouseButton::Left,
            position,
            modifiers: Modifiers::default(),
        }
    }

    /// Replace the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Check whether screen X `x` falls on a label spanning `start_px..stop_px`,
/// with `margin` pixels of slack on both sides (bounds exclusive).
pub(crate) fn interval_hit(x: f32, start_px: f32, stop_px: f32, margin: f32) -> bool {
    start_px - margin < x && x < stop_px + margin
}

/// Zoom an X range around a center value.
pub(crate) fn zoom_range(range: Range, center: f64, factor: f64) -> Range {
    Range::new(
        center + (range.min - center) * factor,
        center + (range.max - center) * factor,
    )
}

/// Shift an X range by a display-space delta.
pub(crate) fn pan_range(range: Range, delta: f64) -> Range {
    Range::new(range.min + delta, range.max + delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_key_requires_single_letter() {
        assert_eq!(KeyEvent::text("X").label_key(), Some('x'));
        assert_eq!(KeyEvent::text("q").label_key(), Some('q'));
        assert_eq!(KeyEvent::text("1").label_key(), None);
        assert_eq!(KeyEvent::text("ab").label_key(), None);
        assert_eq!(KeyEvent::delete().label_key(), None);
        assert!(KeyEvent::backspace().is_delete());
    }

    #[test]
    fn hit_uses_exclusive_margin() {
        assert!(interval_hit(9.0, 10.0, 20.0, 2.0));
        assert!(!interval_hit(8.0, 10.0, 20.0, 2.0));
        assert!(interval_hit(21.9, 10.0, 20.0, 2.0));
        assert!(!interval_hit(22.0, 10.0, 20.0, 2.0));
    }

    #[test]
    fn zoom_and_pan() {
        let range = Range::new(0.0, 10.0);
        let zoomed = zoom_range(range, 5.0, 0.5);
        assert_eq!((zoomed.min, zoomed.max), (2.5, 7.5));
        let panned = pan_range(range, -2.0);
        assert_eq!((panned.min, panned.max), (-2.0, 8.0));
    }
}

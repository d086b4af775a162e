//! Selection notifications for host integration.

/// Emitted when the label selection changes between empty and non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelNotice {
    /// The selection became non-empty.
    Selected,
    /// The selection became empty, or selected labels were deleted.
    NoneSelected,
}

/// Handle returned by [`Notifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(LabelNotice)>;

/// Registry of notice observers.
#[derive(Default)]
pub struct Notifier {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl Notifier {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe(&mut self, callback: impl FnMut(LabelNotice) + 'static) -> SubscriptionId {
        self.next_id = self.next_id.wrapping_add(1);
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Deliver a notice to every observer in registration order.
    pub fn emit(&mut self, notice: LabelNotice) {
        tracing::debug!("Label notice {:?}", notice);
        for (_, callback) in &mut self.subscribers {
            callback(notice);
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_to_subscribers_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::new();
        let sink = Rc::clone(&seen);
        let id = notifier.subscribe(move |notice| sink.borrow_mut().push(notice));

        notifier.emit(LabelNotice::Selected);
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(LabelNotice::NoneSelected);

        assert_eq!(*seen.borrow(), vec![LabelNotice::Selected]);
    }
}

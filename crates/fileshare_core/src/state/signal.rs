//! Single-threaded observable value.
//!
//! # Invariants
//! - Listeners run synchronously, in subscription order, on every mutation.
//! - A listener always observes the value as it is after the mutation.

use std::fmt::{Debug, Formatter};

/// Handle returned by [`Signal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// Holds a current value and notifies listeners whenever it changes.
pub struct Signal<T> {
    value: T,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replaces the value and notifies listeners.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.notify();
    }

    /// Mutates the value in place and notifies listeners.
    pub fn update(&mut self, mutate: impl FnOnce(&mut T)) {
        mutate(&mut self.value);
        self.notify();
    }

    /// Registers a listener. It is not invoked for the current value.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
    }
}

impl<T: Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Debug> Debug for Signal<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Signal;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_see_new_value_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal = Signal::new(1);

        let first = Rc::clone(&seen);
        signal.subscribe(move |value| first.borrow_mut().push(("first", *value)));
        let second = Rc::clone(&seen);
        signal.subscribe(move |value| second.borrow_mut().push(("second", *value)));

        signal.set(2);
        signal.update(|value| *value += 1);

        assert_eq!(
            *seen.borrow(),
            vec![("first", 2), ("second", 2), ("first", 3), ("second", 3)]
        );
        assert_eq!(*signal.get(), 3);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let calls = Rc::new(RefCell::new(0));
        let mut signal = Signal::new(String::new());

        let counter = Rc::clone(&calls);
        let id = signal.subscribe(move |_| *counter.borrow_mut() += 1);
        signal.set("a".to_string());

        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        signal.set("b".to_string());

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(signal.listener_count(), 0);
    }
}

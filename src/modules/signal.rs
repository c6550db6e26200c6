// Observable value container.
// Single-threaded: subscribers run synchronously inside `set`, in registration order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

pub struct Signal<T> {
    value: T,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: u64,
}

impl<T: PartialEq> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replaces the value. Subscribers are notified only when it changed.
    /// Returns true if a change was published.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&self.value);
        }
        true
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

//! Change notification for hosts that are not driven by a reactive framework.

use std::fmt;

/// Identifies a listener registered with [`Listeners::subscribe`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ListenerId(u64);

/// Callbacks invoked with an animator's new output every time it changes.
///
/// Listeners run synchronously, in registration order, from inside the animator method that caused
/// the change. They only receive the value; to react by driving the animator again, the host should
/// record the change and act after the call returns.
pub struct Listeners<T: ?Sized> {
    next_id: u64,
    callbacks: Vec<(ListenerId, Box<dyn FnMut(&T)>)>,
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

impl<T: ?Sized> Listeners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(listener_id, _)| *listener_id != id);
        self.callbacks.len() != before
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn emit(&mut self, value: &T) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_to_all_listeners_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners: Listeners<str> = Listeners::new();
        let first = seen.clone();
        listeners.subscribe(move |value| first.borrow_mut().push(format!("a:{value}")));
        let second = seen.clone();
        listeners.subscribe(move |value| second.borrow_mut().push(format!("b:{value}")));

        listeners.emit("x");

        assert_eq!(*seen.borrow(), vec!["a:x", "b:x"]);
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let calls = Rc::new(RefCell::new(0));
        let mut listeners: Listeners<u32> = Listeners::new();
        let counter = calls.clone();
        let id = listeners.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(&5);

        assert_eq!(*calls.borrow(), 0);
        assert!(listeners.is_empty());
    }
}

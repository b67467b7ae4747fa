//! Synchronous change notification.
//!
//! [`Observable`] is a single-writer, multi-reader cell: `set` stores a value
//! and, when it differs from the previous one, calls every subscriber before
//! returning. [`EventStream`] is the same broadcast without a stored value.
//!
//! Delivery is inline and depth-first. A subscriber may write to the cell it
//! is subscribed to; the nested notification completes before the outer one
//! resumes. Nothing here detects update cycles: a subscriber that keeps
//! producing new values from the values it receives never terminates.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Listener<T> {
    key: u64,
    active: Rc<Cell<bool>>,
    callback: Callback<T>,
}

struct Registry<T> {
    next_key: u64,
    listeners: Vec<Listener<T>>,
}

/// Subscriber list shared by [`Observable`] and [`EventStream`].
struct Broadcast<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T: 'static> Broadcast<T> {
    fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_key: 0,
                listeners: Vec::new(),
            })),
        }
    }

    fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let key = registry.next_key;
        registry.next_key += 1;
        let active = Rc::new(Cell::new(true));
        registry.listeners.push(Listener {
            key,
            active: Rc::clone(&active),
            callback: Rc::new(callback),
        });

        let weak = Rc::downgrade(&self.registry);
        Subscription {
            dispose: Some(Box::new(move || {
                active.set(false);
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().listeners.retain(|l| l.key != key);
                }
            })),
        }
    }

    fn notify(&self, value: &T) {
        // Snapshot so callbacks can subscribe, dispose or re-enter freely.
        let snapshot: Vec<(Rc<Cell<bool>>, Callback<T>)> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|l| (Rc::clone(&l.active), Rc::clone(&l.callback)))
            .collect();
        for (active, callback) in snapshot {
            if active.get() {
                callback(value);
            }
        }
    }

    fn len(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Handle returned by `subscribe`. Disposing it stops further deliveries.
///
/// Dropping the handle does not unsubscribe.
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the subscriber. Calling this again does nothing.
    pub fn dispose(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }

    /// Whether the subscriber is still registered.
    pub fn is_active(&self) -> bool {
        self.dispose.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

struct Shared<T> {
    value: RefCell<T>,
    broadcast: Broadcast<T>,
}

/// A value cell that notifies subscribers when it changes.
///
/// Cloning yields another handle to the same cell.
pub struct Observable<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(value),
                broadcast: Broadcast::new(),
            }),
        }
    }

    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.value.borrow())
    }

    /// Store `value` and notify subscribers if it differs from the current one.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.shared.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }
        self.shared.broadcast.notify(&value);
        true
    }

    /// Derive the next value from the current one, then [`set`](Self::set) it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let next = self.with(f);
        self.set(next)
    }

    /// Register `callback` for every future change.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.shared.broadcast.subscribe(callback)
    }

    /// A read-only view of this cell.
    pub fn signal(&self) -> Signal<T> {
        Signal { inner: self.clone() }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.broadcast.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable")
            .field(&*self.shared.value.borrow())
            .finish()
    }
}

/// Read-only view of an [`Observable`]: readers can look and listen, not write.
pub struct Signal<T> {
    inner: Observable<T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    pub fn get(&self) -> T {
        self.inner.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.subscribe(callback)
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.inner).finish()
    }
}

/// A broadcast of discrete events. Every `emit` is delivered, equal or not.
pub struct EventStream<T> {
    broadcast: Broadcast<T>,
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        Self {
            broadcast: self.broadcast.clone(),
        }
    }
}

impl<T: 'static> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventStream<T> {
    pub fn new() -> Self {
        Self {
            broadcast: Broadcast::new(),
        }
    }

    pub fn emit(&self, event: &T) {
        self.broadcast.notify(event);
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.broadcast.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.broadcast.len()
    }
}

impl<T> fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream").finish_non_exhaustive()
    }
}

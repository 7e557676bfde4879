// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rail Boost Engine - Debug Subscriber Fan-out

//! Human-readable debug lines delivered to whoever asked for them.
//!
//! Each subscriber decides whether it wants verbose lines. Non-verbose lines
//! go to everyone. Delivery is fire-and-forget; throttling is the
//! subscriber's business.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A debug listener, typically an operator who toggled debugging on.
pub trait DebugSubscriber {
    fn accepts_verbose(&self) -> bool;
    fn send(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

#[derive(Default)]
pub struct DebugSubscribers {
    subscribers: HashMap<SubscriberId, Box<dyn DebugSubscriber>>,
    next_id: u64,
}

impl DebugSubscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn DebugSubscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(id, subscriber);
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether a line of the given verbosity would reach anyone.
    pub fn wants(&self, verbose: bool) -> bool {
        self.subscribers
            .values()
            .any(|s| !verbose || s.accepts_verbose())
    }

    pub fn log(&mut self, verbose: bool, message: &str) {
        for subscriber in self.subscribers.values_mut() {
            if !verbose || subscriber.accepts_verbose() {
                subscriber.send(message);
            }
        }
    }

    /// Like [`log`](Self::log) but only formats when someone will receive it.
    pub fn log_with<F>(&mut self, verbose: bool, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.wants(verbose) {
            let line = message();
            self.log(verbose, &line);
        }
    }
}

impl std::fmt::Debug for DebugSubscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugSubscribers")
            .field("count", &self.subscribers.len())
            .finish()
    }
}

// ─── MemorySubscriber ────────────────────────────────────────────────────────

/// Collects lines into a shared buffer the host can drain.
#[derive(Debug, Clone, Default)]
pub struct MemorySubscriber {
    verbose: bool,
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemorySubscriber {
    pub fn new(verbose: bool) -> Self {
        Self { verbose, lines: Rc::default() }
    }

    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }
}

impl DebugSubscriber for MemorySubscriber {
    fn accepts_verbose(&self) -> bool {
        self.verbose
    }

    fn send(&mut self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }
}

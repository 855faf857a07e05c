//! Configuration store with explicit subscribers
//!
//! The store owns the current part→color mapping and a list of
//! subscribers. Every successful `set` synchronously notifies all
//! subscribers with a full snapshot — there is no per-key diffing,
//! which is a deliberate trade-off: the configuration is tiny and a
//! full overwrite downstream is cheaper than tracking deltas.

use crate::{Color, ConfigError, Part, PartColors};

/// Identifies a subscription for later removal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Subscriber = Box<dyn FnMut(&PartColors)>;

/// Part→color configuration with synchronous change notification
///
/// Single-threaded by design: the engine runs on one UI thread, so
/// subscribers run to completion inside `set` and observe changes in
/// exactly the order they were made.
pub struct ConfigStore {
    colors: PartColors,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_id: u64,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(PartColors::default())
    }
}

impl ConfigStore {
    /// Create a store with the given initial configuration
    pub fn new(colors: PartColors) -> Self {
        Self {
            colors,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Current color of a part
    pub fn get(&self, part: Part) -> Color {
        self.colors.get(part)
    }

    /// Immutable copy of the full configuration
    pub fn snapshot(&self) -> PartColors {
        self.colors
    }

    /// Set a part's color and notify all subscribers
    pub fn set(&mut self, part: Part, color: Color) {
        self.colors.set(part, color);
        tracing::debug!(part = %part, "configuration changed");
        let snapshot = self.colors;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&snapshot);
        }
    }

    /// Set from the wire representation of a color-selection event
    ///
    /// Unknown parts and malformed colors are rejected without
    /// touching the store; the caller decides whether to log or
    /// surface the error.
    pub fn set_named(&mut self, part: &str, color: &str) -> Result<(), ConfigError> {
        let part: Part = part.parse()?;
        let color = Color::parse(color)?;
        self.set(part, color);
        Ok(())
    }

    /// Register a subscriber called on every change
    ///
    /// The subscriber is not called with the current state on
    /// registration; callers that need it can read `snapshot()`.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriberId
    where
        F: FnMut(&PartColors) + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber; unknown ids are ignored
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn set_notifies_with_full_snapshot() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = ConfigStore::default();
        let sink = seen.clone();
        store.subscribe(move |snapshot| sink.borrow_mut().push(*snapshot));

        store.set(Part::Base, Color::BLUE);
        store.set(Part::Wood, Color::RED);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].get(Part::Base), Color::BLUE);
        assert_eq!(seen[0].get(Part::Wood), Color::WHITE);
        assert_eq!(seen[1].get(Part::Base), Color::BLUE);
        assert_eq!(seen[1].get(Part::Wood), Color::RED);
    }

    #[test]
    fn later_set_overwrites_earlier() {
        let mut store = ConfigStore::default();
        store.set(Part::Cushion, Color::RED);
        store.set(Part::Cushion, Color::GREEN);
        assert_eq!(store.get(Part::Cushion), Color::GREEN);
        // Independence: no other part moved.
        assert_eq!(store.get(Part::Base), Color::WHITE);
    }

    #[test]
    fn set_named_rejects_bad_input_without_mutation() {
        let mut store = ConfigStore::default();
        assert!(matches!(
            store.set_named("armrest", "#00f"),
            Err(ConfigError::UnknownPart(_))
        ));
        assert!(matches!(
            store.set_named("base", "not-a-color"),
            Err(ConfigError::InvalidColor(_))
        ));
        assert_eq!(store.snapshot(), PartColors::default());
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let count = Rc::new(RefCell::new(0));
        let mut store = ConfigStore::default();
        let sink = count.clone();
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);

        store.set(Part::Base, Color::RED);
        store.unsubscribe(id);
        store.set(Part::Base, Color::BLUE);

        assert_eq!(*count.borrow(), 1);
    }
}

//! Synchronous publish/subscribe bus.
//!
//! Two fixed topics decouple inventories, stats and the navigator:
//!
//! - [`Topic::ItemSetChanged`] carries the acting inventory's current items.
//! - [`Topic::PositionQuery`] carries a [`PositionSlot`] owned by the
//!   publisher; whichever entity is the player writes its location into it.
//!
//! Delivery happens inline on the publisher's call stack, in registration
//! order. The subscriber list is snapshotted before dispatch, so a handler
//! may publish again (re-entrant dispatch) or subscribe without deadlocking.
//! A handler that fails or panics is logged and skipped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use log::{debug, warn};

use crate::game::entities::items::Item;
use crate::game::error::EventError;
use crate::game::types::{EntityId, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    ItemSetChanged,
    PositionQuery,
}

const TOPIC_COUNT: usize = 2;

impl Topic {
    fn index(self) -> usize {
        self as usize
    }
}

/// Reply cell filled by position-query subscribers.
#[derive(Debug, Default)]
pub struct PositionSlot {
    location: RefCell<Option<Location>>,
}

impl PositionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&self, location: Location) {
        *self.location.borrow_mut() = Some(location);
    }

    pub fn get(&self) -> Option<Location> {
        self.location.borrow().clone()
    }

    pub fn clear(&self) {
        self.location.borrow_mut().take();
    }
}

/// A notification together with its payload.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    ItemSetChanged {
        sender: EntityId,
        items: &'a [Rc<Item>],
    },
    PositionQuery {
        reply: &'a PositionSlot,
    },
}

impl Event<'_> {
    pub fn topic(&self) -> Topic {
        match self {
            Event::ItemSetChanged { .. } => Topic::ItemSetChanged,
            Event::PositionQuery { .. } => Topic::PositionQuery,
        }
    }
}

pub type Handler = Rc<dyn Fn(&Event<'_>) -> Result<(), EventError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct SubscriberEntry {
    id: SubscriptionId,
    handler: Handler,
}

/// Per-publish delivery report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct EventBus {
    subscribers: [RefCell<Vec<SubscriberEntry>>; TOPIC_COUNT],
    next_id: Cell<u64>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("item_set_changed", &self.subscriber_count(Topic::ItemSetChanged))
            .field("position_query", &self.subscriber_count(Topic::PositionQuery))
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Register a handler. The same handler may be registered more than once
    /// and is then invoked once per registration.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&Event<'_>) -> Result<(), EventError> + 'static,
    {
        self.subscribe_handler(topic, Rc::new(handler))
    }

    pub fn subscribe_handler(&self, topic: Topic, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers[topic.index()]
            .borrow_mut()
            .push(SubscriberEntry { id, handler });
        debug!("[EventBus] Subscribed {:?} to {:?}", id, topic);
        id
    }

    /// Like [`EventBus::subscribe`], but the returned guard unsubscribes on drop.
    pub fn subscribe_scoped<F>(self: &Rc<Self>, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(&Event<'_>) -> Result<(), EventError> + 'static,
    {
        let id = self.subscribe(topic, handler);
        Subscription {
            bus: Rc::downgrade(self),
            topic,
            id,
        }
    }

    /// Returns false when the id was not subscribed to `topic`.
    pub fn unsubscribe(&self, topic: Topic, id: SubscriptionId) -> bool {
        let mut entries = self.subscribers[topic.index()].borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        before != entries.len()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers[topic.index()].borrow().len()
    }

    /// Deliver `event` to every current subscriber of its topic.
    pub fn publish(&self, event: &Event<'_>) -> Delivery {
        let topic = event.topic();
        let handlers: Vec<(SubscriptionId, Handler)> = self.subscribers[topic.index()]
            .borrow()
            .iter()
            .map(|entry| (entry.id, Rc::clone(&entry.handler)))
            .collect();

        let mut report = Delivery::default();
        for (id, handler) in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => {
                    report.failed += 1;
                    warn!("[EventBus] Handler {:?} on {:?} failed: {}", id, topic, err);
                }
                Err(_) => {
                    report.failed += 1;
                    warn!("[EventBus] Handler {:?} on {:?} panicked", id, topic);
                }
            }
        }
        report
    }
}

/// Drop guard for a subscription.
#[derive(Debug)]
pub struct Subscription {
    bus: Weak<EventBus>,
    topic: Topic,
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.topic, self.id);
        }
    }
}

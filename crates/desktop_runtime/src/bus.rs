//! Synchronous topic-keyed notification bus.
//!
//! Handlers run on the publisher's thread in subscription order. A handler that returns an error
//! or panics is logged and skipped; delivery to the remaining subscribers continues and nothing
//! unwinds into the publisher.

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    hash::Hash,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use desktop_app_contract::{DesktopEvent, DesktopEventKind};

/// Events routable by the bus.
pub trait BusEvent {
    /// Topic key subscribers register under.
    type Topic: Copy + Eq + Hash + fmt::Debug;

    /// Returns the topic this event is delivered on.
    fn topic(&self) -> Self::Topic;
}

impl BusEvent for DesktopEvent {
    type Topic = DesktopEventKind;

    fn topic(&self) -> DesktopEventKind {
        self.kind()
    }
}

/// Handle returned by subscribe, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

pub type HandlerResult = Result<(), String>;

type Handler<E> = Rc<dyn Fn(&E) -> HandlerResult>;

struct Subscriber<E> {
    id: SubscriptionId,
    once: bool,
    handler: Handler<E>,
}

impl<E> Clone for Subscriber<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            once: self.once,
            handler: Rc::clone(&self.handler),
        }
    }
}

struct BusState<E: BusEvent> {
    next_id: u64,
    topics: HashMap<E::Topic, Vec<Subscriber<E>>>,
}

/// Cloneable handle to one bus; clones share subscribers.
pub struct NotificationBus<E: BusEvent> {
    inner: Rc<RefCell<BusState<E>>>,
}

impl<E: BusEvent> Clone for NotificationBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: BusEvent> Default for NotificationBus<E> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusState {
                next_id: 0,
                topics: HashMap::new(),
            })),
        }
    }
}

impl<E: BusEvent> fmt::Debug for NotificationBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("NotificationBus")
            .field("topics", &inner.topics.len())
            .finish()
    }
}

impl<E: BusEvent> NotificationBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(
        &self,
        topic: E::Topic,
        once: bool,
        handler: impl Fn(&E) -> HandlerResult + 'static,
    ) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.topics.entry(topic).or_default().push(Subscriber {
            id,
            once,
            handler: Rc::new(handler),
        });
        id
    }

    pub fn subscribe(
        &self,
        topic: E::Topic,
        handler: impl Fn(&E) -> HandlerResult + 'static,
    ) -> SubscriptionId {
        self.insert(topic, false, handler)
    }

    /// Subscribes for a single delivery; the subscription is dropped before the handler runs.
    pub fn subscribe_once(
        &self,
        topic: E::Topic,
        handler: impl Fn(&E) -> HandlerResult + 'static,
    ) -> SubscriptionId {
        self.insert(topic, true, handler)
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let mut removed = false;
        for subscribers in inner.topics.values_mut() {
            let before = subscribers.len();
            subscribers.retain(|s| s.id != id);
            removed |= subscribers.len() != before;
        }
        inner.topics.retain(|_, subscribers| !subscribers.is_empty());
        removed
    }

    pub fn subscriber_count(&self, topic: E::Topic) -> usize {
        self.inner
            .borrow()
            .topics
            .get(&topic)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().topics.clear();
    }

    fn is_subscribed(&self, topic: E::Topic, id: SubscriptionId) -> bool {
        self.inner
            .borrow()
            .topics
            .get(&topic)
            .is_some_and(|subscribers| subscribers.iter().any(|s| s.id == id))
    }

    /// Delivers `event` to every current subscriber of its topic.
    ///
    /// Handlers may subscribe, unsubscribe, or publish re-entrantly. A subscriber removed by an
    /// earlier handler in the same delivery is skipped. Returns the number of handlers that
    /// completed successfully.
    pub fn publish(&self, event: &E) -> usize {
        let topic = event.topic();
        let snapshot = match self.inner.borrow().topics.get(&topic) {
            Some(subscribers) => subscribers.clone(),
            None => return 0,
        };

        let mut delivered = 0;
        for subscriber in snapshot {
            let current = if subscriber.once {
                self.unsubscribe(subscriber.id)
            } else {
                self.is_subscribed(topic, subscriber.id)
            };
            if !current {
                continue;
            }
            let handler = Rc::clone(&subscriber.handler);
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => {
                    log::warn!("{topic:?} handler {:?} failed: {err}", subscriber.id);
                }
                Err(_) => {
                    log::warn!("{topic:?} handler {:?} panicked", subscriber.id);
                }
            }
        }
        delivered
    }
}

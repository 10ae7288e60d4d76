//! Synchronous publish/subscribe dispatcher.
//!
//! The bus is the only channel between the game state machine and its
//! listeners. Dispatch is synchronous and reentrant: a handler may call
//! `send` again, producing depth-first nested delivery on the same call
//! stack. Handlers registered for both a specific tag and the wildcard
//! still fire at most once per send. A depth cap catches dispatch cycles;
//! exceeding it is a programmer error and panics.
//!
//! Handlers are plain `Fn` closures; stateful listeners capture their own
//! `Rc<RefCell<_>>`, which keeps reentrant dispatch borrow-safe.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::constants::bus::MAX_DISPATCH_DEPTH;
use crate::models::events::{EventTag, GameEvent};

/// Shared so one closure can subscribe under several tags.
pub type SharedHandler = Rc<dyn Fn(&EventBus, &GameEvent)>;

pub fn handler(f: impl Fn(&EventBus, &GameEvent) + 'static) -> SharedHandler {
    Rc::new(f)
}

pub type SubscriptionId = u64;

struct Subscription {
    id: SubscriptionId,
    tag: EventTag,
    priority: i32,
    handler: SharedHandler,
}

#[derive(Default)]
struct BusInner {
    subs: Vec<Subscription>,
    next_id: SubscriptionId,
    depth: usize,
}

/// Cheaply cloneable; clones share the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe at default priority 0.
    pub fn subscribe(&self, tag: EventTag, handler: SharedHandler) -> SubscriptionId {
        self.subscribe_with_priority(tag, 0, handler)
    }

    /// Higher priority runs earlier; ties run in subscription order.
    pub fn subscribe_with_priority(
        &self,
        tag: EventTag,
        priority: i32,
        handler: SharedHandler,
    ) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subs.push(Subscription {
            id,
            tag,
            priority,
            handler,
        });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subs.len();
        inner.subs.retain(|s| s.id != id);
        inner.subs.len() != before
    }

    /// Deliver `event` to every handler subscribed to its tag or to
    /// `EventTag::All`, synchronously, on this call stack.
    pub fn send(&self, event: &GameEvent) {
        let matched = {
            let mut inner = self.inner.borrow_mut();
            inner.depth += 1;
            if inner.depth > MAX_DISPATCH_DEPTH {
                panic!(
                    "event bus dispatch depth exceeded {}: handler cycle on {:?}",
                    MAX_DISPATCH_DEPTH,
                    event.tag()
                );
            }
            let tag = event.tag();
            let mut matched: Vec<(i32, SubscriptionId, SharedHandler)> = inner
                .subs
                .iter()
                .filter(|s| s.tag == tag || s.tag == EventTag::All)
                .map(|s| (s.priority, s.id, Rc::clone(&s.handler)))
                .collect();
            matched.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            matched
        };

        // One delivery per handler per send, even under multiple tags.
        let mut seen: Vec<SharedHandler> = Vec::with_capacity(matched.len());
        for (_, _, h) in matched {
            if seen.iter().any(|s| Rc::ptr_eq(s, &h)) {
                continue;
            }
            (h)(self, event);
            seen.push(h);
        }

        self.inner.borrow_mut().depth -= 1;
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events::{EventPayload, OutKind};
    use crate::models::player::{PlayerId, TeamSide};

    fn pitch_event(tick: u32) -> GameEvent {
        GameEvent {
            inning: 1,
            half: 1,
            tick,
            payload: EventPayload::Pitch {
                pitcher: PlayerId::new(TeamSide::Home, 0),
                location: 0.5,
                strike: true,
                obscurity: 0.3,
                difficulty: 0.2,
            },
        }
    }

    fn out_event(tick: u32) -> GameEvent {
        GameEvent {
            inning: 1,
            half: 1,
            tick,
            payload: EventPayload::Out {
                player: PlayerId::new(TeamSide::Away, 0),
                kind: OutKind::Strikeout,
                outs: 1,
            },
        }
    }

    #[test]
    fn handlers_fire_in_subscription_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            bus.subscribe(
                EventTag::Pitch,
                handler(move |_, _| log.borrow_mut().push(name)),
            );
        }
        bus.send(&pitch_event(0));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn priority_beats_subscription_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        bus.subscribe_with_priority(
            EventTag::Pitch,
            0,
            handler(move |_, _| l1.borrow_mut().push("late")),
        );
        let l2 = Rc::clone(&log);
        bus.subscribe_with_priority(
            EventTag::Pitch,
            10,
            handler(move |_, _| l2.borrow_mut().push("early")),
        );
        bus.send(&pitch_event(0));
        assert_eq!(*log.borrow(), vec!["early", "late"]);
    }

    #[test]
    fn wildcard_and_specific_deliver_once() {
        let bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let shared = handler(move |_, _| *c.borrow_mut() += 1);
        bus.subscribe(EventTag::Pitch, Rc::clone(&shared));
        bus.subscribe(EventTag::All, shared);
        bus.send(&pitch_event(0));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn unmatched_tags_are_skipped() {
        let bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        bus.subscribe(EventTag::Out, handler(move |_, _| *c.borrow_mut() += 1));
        bus.send(&pitch_event(0));
        assert_eq!(*count.borrow(), 0);
        bus.send(&out_event(1));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn nested_send_is_depth_first() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        bus.subscribe(
            EventTag::Pitch,
            handler(move |bus, _| {
                l1.borrow_mut().push("pitch:pre");
                bus.send(&out_event(99));
                l1.borrow_mut().push("pitch:post");
            }),
        );
        let l2 = Rc::clone(&log);
        bus.subscribe(
            EventTag::Out,
            handler(move |_, _| l2.borrow_mut().push("out")),
        );

        bus.send(&pitch_event(0));
        // The nested Out delivery completes inside the Pitch handler.
        assert_eq!(*log.borrow(), vec!["pitch:pre", "out", "pitch:post"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let id = bus.subscribe(EventTag::All, handler(move |_, _| *c.borrow_mut() += 1));
        bus.send(&pitch_event(0));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.send(&pitch_event(1));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    #[should_panic(expected = "dispatch depth")]
    fn dispatch_cycle_panics() {
        let bus = EventBus::new();
        bus.subscribe(EventTag::Pitch, handler(move |bus, event| bus.send(event)));
        bus.send(&pitch_event(0));
    }
}

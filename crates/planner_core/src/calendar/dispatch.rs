//! Typed click notifications for external listeners.
//!
//! # Invariants
//! - Handlers run synchronously, in subscription order, on the caller's thread.
//! - Only the calendar core publishes; hosts can only subscribe.

use crate::model::assignment::Assignment;
use chrono::NaiveDate;
use std::fmt::{Debug, Formatter};

/// Discriminant used to pick which notifications a handler receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    DayActivated,
    AssignmentActivated,
}

/// Notification raised by a click on the month view.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    DayActivated(NaiveDate),
    AssignmentActivated(Assignment),
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::DayActivated(_) => NotificationKind::DayActivated,
            Self::AssignmentActivated(_) => NotificationKind::AssignmentActivated,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type NotificationHandler = Box<dyn FnMut(&Notification)>;

struct Subscription {
    id: SubscriptionId,
    kind: NotificationKind,
    handler: NotificationHandler,
}

/// Single-threaded publish/subscribe hub.
#[derive(Default)]
pub struct InteractionDispatcher {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl Debug for InteractionDispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionDispatcher")
            .field("subscriptions", &self.subscriptions.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl InteractionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        kind: NotificationKind,
        handler: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Removes a handler. Returns `false` when `id` is not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    pub fn subscriber_count(&self, kind: NotificationKind) -> usize {
        self.subscriptions
            .iter()
            .filter(|subscription| subscription.kind == kind)
            .count()
    }

    /// Delivers `notification` to every handler of its kind; returns how many ran.
    pub(crate) fn publish(&mut self, notification: &Notification) -> usize {
        let kind = notification.kind();
        let mut delivered = 0;
        for subscription in self
            .subscriptions
            .iter_mut()
            .filter(|subscription| subscription.kind == kind)
        {
            (subscription.handler)(notification);
            delivered += 1;
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionDispatcher, Notification, NotificationKind};
    use crate::model::assignment::Assignment;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid march date")
    }

    #[test]
    fn publish_reaches_only_matching_kind_in_order() {
        let mut dispatcher = InteractionDispatcher::new();
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));

        let first = Rc::clone(&seen);
        dispatcher.subscribe(NotificationKind::DayActivated, move |n| {
            if let Notification::DayActivated(date) = n {
                first.borrow_mut().push(format!("a:{date}"));
            }
        });
        let second = Rc::clone(&seen);
        dispatcher.subscribe(NotificationKind::DayActivated, move |_| {
            second.borrow_mut().push("b".to_string());
        });
        let other = Rc::clone(&seen);
        dispatcher.subscribe(NotificationKind::AssignmentActivated, move |_| {
            other.borrow_mut().push("assignment".to_string());
        });

        let delivered = dispatcher.publish(&Notification::DayActivated(day(4)));

        assert_eq!(delivered, 2);
        assert_eq!(*seen.borrow(), vec!["a:2024-03-04".to_string(), "b".to_string()]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut dispatcher = InteractionDispatcher::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = dispatcher.subscribe(NotificationKind::AssignmentActivated, move |_| {
            *counter.borrow_mut() += 1;
        });
        let assignment = Assignment::new("essay", day(1), day(2), 1.0, "school");

        dispatcher.publish(&Notification::AssignmentActivated(assignment.clone()));
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        dispatcher.publish(&Notification::AssignmentActivated(assignment));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(dispatcher.subscriber_count(NotificationKind::AssignmentActivated), 0);
    }
}

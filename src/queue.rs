//! Message queue kept in creation order.

use std::collections::VecDeque;
use std::fmt;

use crate::messages::{by_creation, Message};

/// FIFO queue of messages, kept sorted oldest-first.
///
/// The sort is stable, so messages created at the same instant keep their
/// insertion order. Iterating the queue drains it front-to-back.
#[derive(Default)]
pub struct MessageQueue {
    items: VecDeque<Box<dyn Message>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, keeping the queue sorted.
    pub fn push(&mut self, message: Box<dyn Message>) {
        self.items.push_back(message);
        self.sort();
    }

    /// Append several messages, keeping the queue sorted.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Box<dyn Message>>) {
        self.items.extend(messages);
        self.sort();
    }

    /// Take the oldest message.
    pub fn pop_front(&mut self) -> Option<Box<dyn Message>> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drain every queued message, oldest first.
    pub fn drain(&mut self) -> Vec<Box<dyn Message>> {
        self.items.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Message> {
        self.items.iter().map(|message| message.as_ref())
    }

    fn sort(&mut self) {
        self.items
            .make_contiguous()
            .sort_by(|a, b| by_creation(a.as_ref(), b.as_ref()));
    }
}

impl Iterator for MessageQueue {
    type Item = Box<dyn Message>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop_front()
    }
}

impl fmt::Debug for MessageQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|message| message.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{MessageKind, Stamp};
    use chrono::{DateTime, TimeZone, Utc};
    use std::any::Any;

    struct Noted {
        stamp: Stamp,
        label: &'static str,
    }

    impl Noted {
        fn at(day: u32, label: &'static str) -> Box<dyn Message> {
            Box::new(Noted {
                stamp: Stamp::at(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
                label,
            })
        }
    }

    impl Message for Noted {
        fn kind(&self) -> MessageKind {
            MessageKind::Event
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.stamp.time()
        }

        fn name(&self) -> &'static str {
            self.label
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_pops_oldest_message_first() {
        let mut queue = MessageQueue::new();
        queue.push(Noted::at(2, "second"));
        queue.push(Noted::at(1, "first"));
        queue.push(Noted::at(3, "third"));

        assert_eq!(queue.pop_front().unwrap().name(), "first");
        assert_eq!(queue.pop_front().unwrap().name(), "second");
        assert_eq!(queue.pop_front().unwrap().name(), "third");
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn test_extend_keeps_queue_sorted() {
        let mut queue = MessageQueue::new();
        queue.push(Noted::at(5, "last"));
        queue.extend(vec![Noted::at(1, "first"), Noted::at(3, "middle")]);

        let names: Vec<_> = queue.map(|message| message.name()).collect();
        assert_eq!(names, vec!["first", "middle", "last"]);
    }

    #[test]
    fn test_clear_empties_queue() {
        let mut queue = MessageQueue::new();
        queue.push(Noted::at(1, "only"));
        queue.clear();
        assert!(queue.is_empty());
    }
}

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// A named application event emitted when a binding times out.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TimeoutEvent {
    pub name: String,
    /// Position of the event in its queue, starting at 0.
    pub seq: u64,
}

#[derive(Default)]
struct Queue {
    events: VecDeque<TimeoutEvent>,
    next_seq: u64,
}

/// Single-threaded FIFO of [`TimeoutEvent`]s, drained by the UI each frame.
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct EventQueue {
    queue: Rc<RefCell<Queue>>,
    wakeup: Option<Rc<dyn Fn()>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// `wakeup` runs after every push, e.g. to request a repaint when a timer
    /// fires between two frames.
    pub fn with_wakeup(wakeup: impl Fn() + 'static) -> Self {
        Self {
            queue: Default::default(),
            wakeup: Some(Rc::new(wakeup)),
        }
    }

    pub fn push(&self, name: impl Into<String>) {
        {
            let mut queue = self.queue.borrow_mut();
            let seq = queue.next_seq;
            queue.next_seq += 1;
            queue.events.push_back(TimeoutEvent {
                name: name.into(),
                seq,
            });
        }
        if let Some(wakeup) = &self.wakeup {
            wakeup();
        }
    }

    pub fn try_recv(&self) -> Option<TimeoutEvent> {
        self.queue.borrow_mut().events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().events.is_empty()
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::EventQueue;

    #[test]
    fn delivers_in_order_with_sequence_numbers() {
        let queue = EventQueue::new();
        let sender = queue.clone();
        sender.push("search");
        sender.push("comment");
        assert_eq!(queue.len(), 2);

        let first = queue.try_recv().unwrap();
        assert_eq!((first.name.as_str(), first.seq), ("search", 0));
        let second = queue.try_recv().unwrap();
        assert_eq!((second.name.as_str(), second.seq), ("comment", 1));
        assert!(queue.try_recv().is_none());
        assert!(queue.is_empty());

        sender.push("search");
        assert_eq!(queue.try_recv().unwrap().seq, 2);
    }

    #[test]
    fn wakes_up_after_each_push() {
        let wakeups = Rc::new(Cell::new(0));
        let counter = wakeups.clone();
        let queue = EventQueue::with_wakeup(move || counter.set(counter.get() + 1));
        queue.push("a");
        queue.clone().push("b");
        assert_eq!(wakeups.get(), 2);
    }
}

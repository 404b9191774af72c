use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

struct Entry<E> {
    due: Duration,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

/// Deferred events on one logical timeline.
///
/// Offsets are measured from the owner's origin. Events pop in due order;
/// events due at the same instant pop in the order they were scheduled.
pub struct TimerQueue<E> {
    heap: BinaryHeap<Reverse<Entry<E>>>,
    next_seq: u64,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: Duration, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { due, seq, event }));
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(entry)| entry.due)
    }

    /// Pops the earliest event if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, E)> {
        if self.next_due()? > now {
            return None;
        }
        self.heap
            .pop()
            .map(|Reverse(entry)| (entry.due, entry.event))
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pops_in_due_then_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(30), "late");
        queue.schedule(ms(10), "first");
        queue.schedule(ms(10), "second");
        queue.schedule(ms(20), "middle");

        let mut fired = Vec::new();
        while let Some((_, event)) = queue.pop_due(ms(100)) {
            fired.push(event);
        }
        assert_eq!(fired, vec!["first", "second", "middle", "late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_future_events_stay_queued() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(50), 1);
        queue.schedule(ms(5), 2);

        assert_eq!(queue.pop_due(ms(10)), Some((ms(5), 2)));
        assert_eq!(queue.pop_due(ms(10)), None);
        assert_eq!(queue.next_due(), Some(ms(50)));
        assert_eq!(queue.len(), 1);

        queue.clear();
        assert_eq!(queue.next_due(), None);
    }
}

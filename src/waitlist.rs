//! Per-book reservation queue.
//!
//! A binary min-heap of [`Reservation`]s ordered by priority (lower value is
//! served first) and then by arrival sequence, so equal priorities are served
//! first-come-first-served.

use smallvec::SmallVec;

use crate::catalog::{CatalogError, PatronId};

/// Most reservations a single book accepts. Enforced by the catalog, not the queue.
pub const RESERVATION_LIMIT: usize = 20;

/// One pending reservation.
///
/// Ordering is by `priority`, then `arrival`; the derive relies on field order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Reservation {
    pub priority: i64,
    pub arrival: u64,
    pub patron: PatronId,
}

/// Min-priority queue of reservations.
///
/// Storage is inline up to [`RESERVATION_LIMIT`] entries; the queue itself
/// accepts more and spills to the heap.
#[derive(Clone, Debug, Default)]
pub struct Waitlist {
    heap: SmallVec<[Reservation; RESERVATION_LIMIT]>,
}

impl Waitlist {
    #[must_use]
    pub fn new() -> Self {
        Self { heap: SmallVec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Adds a reservation. O(log n).
    pub fn push(&mut self, reservation: Reservation) {
        self.heap.push(reservation);
        self.sift_up(self.heap.len() - 1);
    }

    /// The next reservation to be served, without removing it.
    #[must_use]
    pub fn peek_min(&self) -> Option<&Reservation> {
        self.heap.first()
    }

    /// Removes and returns the reservation with the smallest `(priority, arrival)`. O(log n).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyQueue`] if there is nothing to serve.
    pub fn pop_min(&mut self) -> Result<Reservation, CatalogError> {
        if self.heap.is_empty() {
            return Err(CatalogError::EmptyQueue);
        }
        let min = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// The reservations in internal heap order. Only the first is guaranteed to be the minimum.
    #[must_use]
    pub fn as_slice(&self) -> &[Reservation] {
        &self.heap
    }

    /// Patrons in internal heap order.
    pub fn patrons(&self) -> impl Iterator<Item = PatronId> + '_ {
        self.heap.iter().map(|r| r.patron)
    }

    /// Empties the queue, returning the patrons whose reservations were dropped, in heap order.
    pub fn drain_patrons(&mut self) -> Vec<PatronId> {
        self.heap.drain(..).map(|r| r.patron).collect()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[index] >= self.heap[parent] {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.heap[left] < self.heap[smallest] {
                smallest = left;
            }
            if right < len && self.heap[right] < self.heap[smallest] {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.heap.swap(index, smallest);
            index = smallest;
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reservation(priority: i64, arrival: u64, patron: u64) -> Reservation {
        Reservation {
            priority,
            arrival,
            patron: PatronId(patron),
        }
    }

    #[test]
    fn pop_from_empty_fails() {
        let mut waitlist = Waitlist::new();
        assert_eq!(waitlist.pop_min(), Err(CatalogError::EmptyQueue));
        assert!(waitlist.peek_min().is_none());
    }

    #[test]
    fn lower_priority_value_is_served_first() {
        let mut waitlist = Waitlist::new();
        waitlist.push(reservation(3, 1, 2));
        waitlist.push(reservation(1, 2, 3));
        assert_eq!(waitlist.pop_min().map(|r| r.patron), Ok(PatronId(3)));
        assert_eq!(waitlist.pop_min().map(|r| r.patron), Ok(PatronId(2)));
        assert!(waitlist.is_empty());
    }

    #[test]
    fn equal_priority_is_first_come_first_served() {
        let mut waitlist = Waitlist::new();
        waitlist.push(reservation(2, 10, 7));
        waitlist.push(reservation(2, 11, 4));
        waitlist.push(reservation(2, 12, 1));
        let order: Vec<u64> = std::iter::from_fn(|| waitlist.pop_min().ok()).map(|r| r.patron.0).collect();
        assert_eq!(order, vec![7, 4, 1]);
    }

    #[test]
    fn slice_reflects_heap_layout_not_priority_order() {
        let mut waitlist = Waitlist::new();
        waitlist.push(reservation(5, 1, 1));
        waitlist.push(reservation(4, 2, 2));
        waitlist.push(reservation(3, 3, 3));
        // 2 bubbles above 1, then 3 bubbles to the root.
        let patrons: Vec<u64> = waitlist.patrons().map(|p| p.0).collect();
        assert_eq!(patrons, vec![3, 1, 2]);
        assert_eq!(
            waitlist.as_slice(),
            &[reservation(3, 3, 3), reservation(5, 1, 1), reservation(4, 2, 2)]
        );
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut waitlist = Waitlist::new();
        waitlist.push(reservation(1, 1, 8));
        waitlist.push(reservation(1, 2, 9));
        assert_eq!(waitlist.drain_patrons(), vec![PatronId(8), PatronId(9)]);
        assert!(waitlist.is_empty());
    }

    #[test]
    fn queue_itself_is_unbounded() {
        let mut waitlist = Waitlist::new();
        for i in 0..(RESERVATION_LIMIT as u64 + 5) {
            waitlist.push(reservation(0, i, i));
        }
        assert_eq!(waitlist.len(), RESERVATION_LIMIT + 5);
    }

    proptest! {
        #[test]
        fn pops_come_out_sorted(entries in prop::collection::vec((-5i64..5, 0u64..50), 0..64)) {
            let mut waitlist = Waitlist::new();
            let mut expected: Vec<Reservation> = Vec::new();
            for (arrival, (priority, patron)) in entries.into_iter().enumerate() {
                let r = reservation(priority, arrival as u64, patron);
                waitlist.push(r);
                expected.push(r);
            }
            expected.sort();

            let mut popped = Vec::new();
            while let Ok(r) = waitlist.pop_min() {
                popped.push(r);
            }
            prop_assert_eq!(popped, expected);
        }
    }
}

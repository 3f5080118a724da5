//! This module contains a bounded max-heap that keeps the k closest candidates seen so far.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An entry of [`KBestNeighbors`]: a distance key, the order in which it was offered, and data.
///
/// The key only needs a total order; `f64` distances go in as `OrderedFloat`.
#[derive(Debug)]
pub struct HeapElement<K, P> {
    pub distance: K,
    /// Discovery order. Among equal distances the later candidate ranks as farther,
    /// so earlier discoveries win ties.
    pub sequence: u64,
    pub data: P,
}

impl<K: Ord, P> PartialEq for HeapElement<K, P> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.sequence == other.sequence
    }
}
impl<K: Ord, P> Eq for HeapElement<K, P> {}

impl<K: Ord, P> PartialOrd for HeapElement<K, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, P> Ord for HeapElement<K, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so the farthest retained candidate sits on top.
        self.distance
            .cmp(&other.distance)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Manages a collection of the K "best" (smallest distance) items seen so far.
#[derive(Debug)]
pub struct KBestNeighbors<K, P> {
    capacity: usize,
    next_sequence: u64,
    heap: BinaryHeap<HeapElement<K, P>>,
}

impl<K: Ord, P> KBestNeighbors<K, P> {
    pub fn new(capacity: usize) -> Self {
        KBestNeighbors {
            capacity,
            next_sequence: 0,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1)),
        }
    }

    /// Offers a candidate; it is kept if the heap is not full or it beats the current farthest.
    pub fn add(&mut self, distance: K, data: P) {
        if self.capacity == 0 {
            return;
        }
        let item = HeapElement { distance, sequence: self.next_sequence, data };
        self.next_sequence += 1;
        if self.heap.len() < self.capacity {
            self.heap.push(item);
        } else if self.heap.peek().is_some_and(|farthest| item < *farthest) {
            self.heap.pop();
            self.heap.push(item);
        }
    }

    /// The farthest retained candidate once the heap is full; `None` while it is still filling,
    /// which callers treat as an unbounded search radius.
    pub fn current_farthest(&self) -> Option<&HeapElement<K, P>> {
        if self.heap.len() == self.capacity { self.heap.peek() } else { None }
    }

    pub fn current_farthest_distance(&self) -> Option<&K> {
        self.current_farthest().map(|heap_elem| &heap_elem.distance)
    }

    /// Whether `capacity` candidates are held.
    pub fn is_full(&self) -> bool {
        self.heap.len() == self.capacity
    }

    /// Consumes the heap, returning the data ordered from closest to farthest.
    pub fn into_sorted_points(self) -> Vec<P> {
        self.into_sorted_elements().into_iter().map(|elem| elem.data).collect()
    }

    /// Like [`into_sorted_points`](Self::into_sorted_points), keeping each distance key.
    pub fn into_sorted_elements(self) -> Vec<HeapElement<K, P>> {
        self.heap.into_sorted_vec()
    }

    /// Returns the current number of neighbors stored.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

//! Priority frontier with lazy replacement of superseded entries.

use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashMap},
    hash::Hash,
};

#[derive(Clone, Copy, Debug)]
struct Entry {
    priority: f64,
    sequence: u64,
    node: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Min-ordered frontier keyed by state.
///
/// Ties on priority pop in insertion order. Each state has at most one live
/// entry; replaced entries stay in the heap and are skipped when popped.
#[derive(Debug)]
pub(crate) struct Frontier<S> {
    heap: BinaryHeap<Reverse<Entry>>,
    live: HashMap<S, (f64, usize)>,
    next_sequence: u64,
}

impl<S: Clone + Eq + Hash> Frontier<S> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            next_sequence: 0,
        }
    }

    /// Priority of the live entry for `state`, if any.
    pub(crate) fn priority_of(&self, state: &S) -> Option<f64> {
        self.live.get(state).map(|(priority, _)| *priority)
    }

    /// Inserts or replaces the live entry for `state`.
    pub(crate) fn push(&mut self, state: S, node: usize, priority: f64) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Reverse(Entry {
            priority,
            sequence,
            node,
        }));
        let _ = self.live.insert(state, (priority, node));
    }

    /// Removes the lowest-priority live entry, resolving node states via `state_of`.
    pub(crate) fn pop<'a, F>(&mut self, mut state_of: F) -> Option<usize>
    where
        F: FnMut(usize) -> &'a S,
        S: 'a,
    {
        while let Some(Reverse(entry)) = self.heap.pop() {
            let state = state_of(entry.node);
            match self.live.get(state) {
                Some((_, node)) if *node == entry.node => {
                    let _ = self.live.remove(state);
                    return Some(entry.node);
                }
                _ => continue,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_priorities_pop_in_insertion_order() {
        let states = ["a", "b", "c"];
        let mut frontier = Frontier::new();
        frontier.push(states[0], 0, 1.0);
        frontier.push(states[1], 1, 1.0);
        frontier.push(states[2], 2, 0.5);

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop(|node| &states[node])).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn replaced_entries_are_skipped() {
        let states = ["a", "a", "b"];
        let mut frontier = Frontier::new();
        frontier.push(states[0], 0, 5.0);
        frontier.push(states[2], 2, 3.0);
        frontier.push(states[1], 1, 1.0);
        assert_eq!(frontier.priority_of(&"a"), Some(1.0));

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop(|node| &states[node])).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(frontier.priority_of(&"a"), None);
    }
}

//! Append-only log of `(time, value, signal)` observations.
//!
//! The store never reorders or deduplicates. [`ObservationStore::sorted`]
//! produces the emission order: ascending time, insertion order within a tick.

use crate::ids::SignalId;

/// One recorded value of one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Simulation time of the value.
    pub time: u64,
    /// The value, right-aligned in a 64-bit register.
    pub value: u64,
    /// The signal the value belongs to.
    pub signal: SignalId,
    /// Position in the store at insertion.
    pub seq: u64,
}

/// Insertion-ordered observations for one session.
#[derive(Debug, Default)]
pub struct ObservationStore {
    entries: Vec<Observation>,
}

impl ObservationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one observation.
    pub fn push(&mut self, signal: SignalId, time: u64, value: u64) {
        let seq = self.entries.len() as u64;
        self.entries.push(Observation {
            time,
            value,
            signal,
            seq,
        });
    }

    /// Appends `(time, value)` pairs for one signal, preserving their order.
    pub fn extend<I>(&mut self, signal: SignalId, samples: I)
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        for (time, value) in samples {
            self.push(signal, time, value);
        }
    }

    /// Number of observations held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every observation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Observations in insertion order.
    pub fn entries(&self) -> &[Observation] {
        &self.entries
    }

    /// Observations ordered by time. `sort_by_key` is stable, so equal times
    /// keep insertion order.
    pub fn sorted(&self) -> Vec<&Observation> {
        let mut out: Vec<&Observation> = self.entries.iter().collect();
        out.sort_by_key(|o| o.time);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaId;

    fn sig(n: u32) -> SignalId {
        SignalId::from_parts(0, n)
    }

    #[test]
    fn push_assigns_sequence_numbers() {
        let mut store = ObservationStore::new();
        store.push(sig(0), 5, 1);
        store.push(sig(1), 5, 0);
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[1].seq, 1);
    }

    #[test]
    fn sorted_by_time() {
        let mut store = ObservationStore::new();
        store.push(sig(0), 30, 0);
        store.push(sig(0), 10, 0);
        store.push(sig(0), 20, 0);
        let times: Vec<u64> = store.sorted().iter().map(|o| o.time).collect();
        assert_eq!(times, vec![10, 20, 30]);
    }

    #[test]
    fn equal_times_keep_insertion_order() {
        let mut store = ObservationStore::new();
        store.push(sig(2), 100, 0);
        store.push(sig(0), 0, 0);
        store.push(sig(1), 100, 0);
        store.push(sig(2), 100, 1);
        store.push(sig(0), 100, 1);
        let at_100: Vec<(u32, u64)> = store
            .sorted()
            .iter()
            .filter(|o| o.time == 100)
            .map(|o| (o.signal.index(), o.seq))
            .collect();
        assert_eq!(at_100, vec![(2, 0), (1, 2), (2, 3), (0, 4)]);
    }

    #[test]
    fn repeated_observations_are_retained() {
        let mut store = ObservationStore::new();
        store.extend(sig(0), [(7, 1), (7, 1), (7, 0)]);
        assert_eq!(store.len(), 3);
        let values: Vec<u64> = store.sorted().iter().map(|o| o.value).collect();
        assert_eq!(values, vec![1, 1, 0]);
    }

    #[test]
    fn clear_empties() {
        let mut store = ObservationStore::new();
        store.push(sig(0), 1, 1);
        store.clear();
        assert!(store.is_empty());
    }
}

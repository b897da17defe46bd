// CutoffScout - app/coalesce.rs
//
// Time-window coalescing of rapid updates at the UI boundary.
//
// A burst of values for the same key (a slider being dragged) collapses to
// the most recent one, emitted at most once per window measured from the
// first value of the burst. The engine only ever sees the settled value.
// Callers pass `now` explicitly so the behaviour is deterministic in tests.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<V> {
    value: V,
    opened: Instant,
}

/// Per-key latest-value-wins coalescer.
#[derive(Debug)]
pub struct Coalescer<K: Ord, V> {
    window: Duration,
    pending: BTreeMap<K, Pending<V>>,
}

impl<K: Ord + Clone, V> Coalescer<K, V> {
    /// A zero window emits every value on the next `take_due`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: BTreeMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a new value for `key`, discarding any earlier value still
    /// waiting in the same window.
    pub fn offer(&mut self, key: K, value: V, now: Instant) {
        match self.pending.get_mut(&key) {
            Some(p) => p.value = value,
            None => {
                self.pending.insert(key, Pending { value, opened: now });
            }
        }
    }

    /// Remove and return every value whose window has closed by `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| now.saturating_duration_since(p.opened) >= self.window)
            .map(|(k, _)| k.clone())
            .collect();

        due.into_iter()
            .filter_map(|k| self.pending.remove(&k).map(|p| (k, p.value)))
            .collect()
    }

    /// Remove and return every pending value regardless of its window.
    pub fn flush(&mut self) -> Vec<(K, V)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(k, p)| (k, p.value))
            .collect()
    }

    /// Earliest instant at which a pending value becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.opened + self.window).min()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(10);

    #[test]
    fn test_latest_value_wins_within_window() {
        let t0 = Instant::now();
        let mut c = Coalescer::new(WINDOW);
        c.offer("OC", 150, t0);
        c.offer("OC", 160, t0 + Duration::from_millis(3));
        c.offer("OC", 170, t0 + Duration::from_millis(6));

        assert!(c.take_due(t0 + Duration::from_millis(9)).is_empty());
        assert_eq!(c.take_due(t0 + WINDOW), vec![("OC", 170)]);
        assert!(c.is_empty());
    }

    #[test]
    fn test_keys_are_independent() {
        let t0 = Instant::now();
        let mut c = Coalescer::new(WINDOW);
        c.offer("OC", 1, t0);
        c.offer("BC", 2, t0 + Duration::from_millis(8));

        assert_eq!(c.take_due(t0 + WINDOW), vec![("OC", 1)]);
        assert_eq!(c.next_deadline(), Some(t0 + Duration::from_millis(18)));
        assert_eq!(c.take_due(t0 + Duration::from_millis(18)), vec![("BC", 2)]);
    }

    #[test]
    fn test_at_most_one_value_per_window() {
        let t0 = Instant::now();
        let mut c = Coalescer::new(WINDOW);
        let mut emitted = Vec::new();
        for ms in 0..30u64 {
            let now = t0 + Duration::from_millis(ms);
            c.offer("SC", ms, now);
            emitted.extend(c.take_due(now));
        }
        emitted.extend(c.flush());
        assert_eq!(emitted, vec![("SC", 10), ("SC", 21), ("SC", 29)]);
    }

    #[test]
    fn test_zero_window_passes_through() {
        let t0 = Instant::now();
        let mut c = Coalescer::new(Duration::ZERO);
        c.offer(1u8, "a", t0);
        assert_eq!(c.take_due(t0), vec![(1, "a")]);
    }

    #[test]
    fn test_flush_empties() {
        let t0 = Instant::now();
        let mut c = Coalescer::new(WINDOW);
        c.offer("ST", 5, t0);
        assert_eq!(c.flush(), vec![("ST", 5)]);
        assert!(c.next_deadline().is_none());
    }
}

//! Short-lived memo of merged history series, shared across concurrent lookups.

use dashmap::DashMap;
use std::time::{Duration, Instant};

struct Slot<V> {
    value: V,
    stored_at: Instant,
}

/// Concurrent TTL map keyed by `"history:{SYMBOL}:{start}:{end}"` strings.
///
/// A slot older than the TTL is treated as absent and dropped on lookup.
/// With a zero TTL nothing is ever stored.
pub struct MemoryCache<V> {
    slots: DashMap<String, Slot<V>>,
    ttl: Duration,
}

impl<V: Clone> MemoryCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let ttl = self.ttl;
        let now = Instant::now();
        if let Some(slot) = self.slots.get(key) {
            if now.duration_since(slot.stored_at) < ttl {
                return Some(slot.value.clone());
            }
        }
        // Leaves a slot that a concurrent `set` refreshed after the read.
        self.slots
            .remove_if(key, |_, slot| now.duration_since(slot.stored_at) >= ttl);
        None
    }

    /// Stores `value` under `key`, replacing any previous slot.
    pub fn set(&self, key: String, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.slots.insert(
            key,
            Slot {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "history:AAPL:2018-11-01:2018-11-30";

    #[test]
    fn stored_series_is_returned() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set(KEY.to_string(), vec![1, 2, 3]);
        assert_eq!(cache.get(KEY), Some(vec![1, 2, 3]));
        assert_eq!(cache.get("history:MSFT:2018-11-01:2018-11-30"), None);
    }

    #[test]
    fn stale_slot_is_dropped() {
        let cache = MemoryCache::new(Duration::from_millis(1));
        cache.set(KEY.to_string(), "old".to_string());
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get(KEY), None);
        assert!(cache.slots.is_empty());
    }

    #[test]
    fn zero_ttl_stores_nothing() {
        let cache = MemoryCache::new(Duration::ZERO);
        cache.set(KEY.to_string(), 1u8);
        assert_eq!(cache.get(KEY), None);
        assert!(cache.slots.is_empty());
    }

    #[test]
    fn set_replaces_previous_value() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set(KEY.to_string(), "old".to_string());
        cache.set(KEY.to_string(), "new".to_string());
        assert_eq!(cache.get(KEY), Some("new".to_string()));
    }
}

//! Single-slot time-to-live cache.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

use crate::error::Result;

/// Function producing a fresh value for a [`TtlCache`].
pub type Supplier<T> = Box<dyn Fn() -> Result<T> + Send + Sync>;

struct Slot<T> {
    value: Option<T>,
    refreshed_at: Option<Instant>,
}

/// Caches the last value produced by a supplier for a fixed window.
///
/// A refresh happens on `get` once `ttl` has elapsed since the last refresh.
/// The refresh timestamp advances whether or not the supplier succeeds; a
/// failed refresh keeps the previous value and returns the error. A cache
/// that has never produced a value refreshes on every `get`.
///
/// All operations on one cache are serialized, including the supplier call.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tenet_core::TtlCache;
///
/// let cache = TtlCache::new(Duration::from_secs(60), Box::new(|| Ok(42)));
/// assert_eq!(cache.get().unwrap(), 42);
///
/// cache.set(7);
/// assert_eq!(cache.get().unwrap(), 7);
/// ```
pub struct TtlCache<T> {
    supplier: Supplier<T>,
    ttl: Duration,
    slot: Mutex<Slot<T>>,
}

impl<T: Clone> TtlCache<T> {
    /// Creates an empty cache.
    pub fn new(ttl: Duration, supplier: Supplier<T>) -> Self {
        Self {
            supplier,
            ttl,
            slot: Mutex::new(Slot {
                value: None,
                refreshed_at: None,
            }),
        }
    }

    /// Returns the cached value, refreshing it first if the window elapsed.
    pub fn get(&self) -> Result<T> {
        let mut slot = self.slot.lock();

        let expired = match slot.refreshed_at {
            Some(at) => at.elapsed() >= self.ttl,
            None => true,
        };

        if !expired && let Some(value) = &slot.value {
            return Ok(value.clone());
        }

        self.refresh(&mut slot)
    }

    /// Recomputes the value regardless of the window.
    pub fn get_fresh(&self) -> Result<T> {
        let mut slot = self.slot.lock();
        self.refresh(&mut slot)
    }

    /// Stores a value without calling the supplier and restarts the window.
    pub fn set(&self, value: T) {
        let mut slot = self.slot.lock();
        slot.value = Some(value);
        slot.refreshed_at = Some(Instant::now());
    }

    /// Runs `write` while holding the slot, then stores the value it hands
    /// back, if any, and restarts the window.
    ///
    /// `write` returns its own result alongside the value to cache. Neither
    /// a concurrent `get` nor another `write_through` can interleave, so the
    /// cached value follows the order in which writes committed. An error
    /// leaves the slot untouched.
    pub fn write_through<R>(&self, write: impl FnOnce() -> Result<(R, Option<T>)>) -> Result<R> {
        let mut slot = self.slot.lock();

        let (outcome, value) = write()?;
        if let Some(value) = value {
            slot.value = Some(value);
            slot.refreshed_at = Some(Instant::now());
        }
        Ok(outcome)
    }

    /// Forces a refresh on the next `get`.
    pub fn invalidate(&self) {
        self.slot.lock().refreshed_at = None;
    }

    /// Returns the cached value without refreshing.
    pub fn peek(&self) -> Option<T> {
        self.slot.lock().value.clone()
    }

    /// Returns when the value was last refreshed or set.
    pub fn last_refreshed(&self) -> Option<Instant> {
        self.slot.lock().refreshed_at
    }

    /// Returns the configured window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn refresh(&self, slot: &mut Slot<T>) -> Result<T> {
        trace!(ttl_ms = self.ttl.as_millis() as u64, "Refreshing cached value");

        let result = (self.supplier)();
        slot.refreshed_at = Some(Instant::now());

        let value = result?;
        slot.value = Some(value.clone());
        Ok(value)
    }
}

impl<T> fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TenetError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting(ttl: Duration) -> (TtlCache<u32>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let cache = TtlCache::new(
            ttl,
            Box::new(move || Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)),
        );
        (cache, calls)
    }

    #[test]
    fn test_get_within_window_hits_supplier_once() {
        let (cache, calls) = counting(Duration::from_secs(3600));

        assert_eq!(cache.get().unwrap(), 1);
        assert_eq!(cache.get().unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_get_after_window_refreshes() {
        let (cache, calls) = counting(Duration::from_millis(20));

        cache.get().unwrap();
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get().unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_ttl_always_refreshes() {
        let (cache, calls) = counting(Duration::ZERO);

        cache.get().unwrap();
        cache.get().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_get_fresh_ignores_window() {
        let (cache, calls) = counting(Duration::from_secs(3600));

        cache.get().unwrap();
        assert_eq!(cache.get_fresh().unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_set_skips_supplier() {
        let (cache, calls) = counting(Duration::from_secs(3600));

        cache.set(99);
        assert_eq!(cache.get().unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(cache.last_refreshed().is_some());
    }

    #[test]
    fn test_write_through_stores_only_accepted_values() {
        let (cache, calls) = counting(Duration::from_secs(3600));

        assert!(cache.write_through(|| Ok((true, Some(10)))).unwrap());
        assert_eq!(cache.get().unwrap(), 10);

        assert!(!cache.write_through(|| Ok((false, None))).unwrap());
        assert_eq!(cache.get().unwrap(), 10);

        let err = cache
            .write_through(|| -> Result<(bool, Option<u32>)> {
                Err(TenetError::unavailable("store down"))
            })
            .unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(cache.get().unwrap(), 10);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_write_through_blocks_concurrent_writers() {
        use std::sync::mpsc;

        let (cache, _) = counting(Duration::from_secs(3600));
        let cache = Arc::new(cache);
        let committed = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let (started_tx, started_rx) = mpsc::channel();

        let first = {
            let cache = Arc::clone(&cache);
            let committed = Arc::clone(&committed);
            std::thread::spawn(move || {
                cache
                    .write_through(|| {
                        committed.lock().push(1);
                        started_tx.send(()).unwrap();
                        std::thread::sleep(Duration::from_millis(50));
                        Ok(((), Some(1)))
                    })
                    .unwrap()
            })
        };

        started_rx.recv().unwrap();
        cache
            .write_through(|| {
                committed.lock().push(2);
                Ok(((), Some(2)))
            })
            .unwrap();
        first.join().unwrap();

        assert_eq!(*committed.lock(), vec![1, 2]);
        assert_eq!(cache.peek(), Some(2));
    }

    #[test]
    fn test_invalidate_forces_refresh() {
        let (cache, calls) = counting(Duration::from_secs(3600));

        cache.get().unwrap();
        cache.invalidate();
        assert_eq!(cache.peek(), Some(1));
        assert_eq!(cache.get().unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_refresh_keeps_value_and_advances_window() {
        let fail = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = Arc::clone(&fail);
        let cache = TtlCache::new(
            Duration::from_millis(20),
            Box::new(move || {
                if flag.load(Ordering::SeqCst) {
                    Err(TenetError::unavailable("store down"))
                } else {
                    Ok(5)
                }
            }),
        );

        assert_eq!(cache.get().unwrap(), 5);
        std::thread::sleep(Duration::from_millis(40));
        fail.store(true, Ordering::SeqCst);

        assert!(cache.get().unwrap_err().is_unavailable());
        // Window restarted by the failed refresh: the old value is served.
        assert_eq!(cache.get().unwrap(), 5);
    }

    #[test]
    fn test_concurrent_gets_share_one_refresh() {
        let (cache, calls) = counting(Duration::from_secs(3600));
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get().unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

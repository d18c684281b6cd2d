use std::time::{Duration, Instant};

/// Single-slot read cache that treats its value as valid for `ttl` after
/// loading. The only other invalidation is an explicit `invalidate()`.
///
/// There is no size bound and no eviction policy: a reader can observe
/// data up to `ttl` old when another process writes the store.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<(Instant, T)>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// The cached value, if it was loaded less than `ttl` before `now`.
    pub fn get_at(&self, now: Instant) -> Option<&T> {
        match &self.entry {
            Some((loaded_at, value)) if now.saturating_duration_since(*loaded_at) < self.ttl => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.get_at(Instant::now())
    }

    pub fn put_at(&mut self, now: Instant, value: T) {
        self.entry = Some((now, value));
    }

    pub fn put(&mut self, value: T) {
        self.put_at(Instant::now(), value);
    }

    /// Return the fresh value, or run `load` and cache its result.
    /// A failed load leaves the cache empty.
    pub fn get_or_try_load_at<E>(
        &mut self,
        now: Instant,
        load: impl FnOnce() -> Result<T, E>,
    ) -> Result<&T, E> {
        let fresh = self.is_fresh_at(now);
        match self.entry.take() {
            Some(entry) if fresh => Ok(&self.entry.insert(entry).1),
            _ => {
                let value = load()?;
                Ok(&self.entry.insert((now, value)).1)
            }
        }
    }

    pub fn get_or_try_load<E>(&mut self, load: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        self.get_or_try_load_at(Instant::now(), load)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_fresh_at(&self, now: Instant) -> bool {
        self.get_at(now).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(5);

    #[test]
    fn empty_cache_misses() {
        let cache: TtlCache<u32> = TtlCache::new(TTL);
        assert!(cache.get().is_none());
    }

    #[test]
    fn value_is_fresh_until_ttl() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new(TTL);
        cache.put_at(t0, 7);
        assert_eq!(cache.get_at(t0), Some(&7));
        assert_eq!(cache.get_at(t0 + Duration::from_millis(4_999)), Some(&7));
        assert_eq!(cache.get_at(t0 + TTL), None);
    }

    #[test]
    fn load_runs_only_when_stale() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new(TTL);
        let mut loads = 0;

        let v = *cache
            .get_or_try_load_at(t0, || {
                loads += 1;
                Ok::<_, ()>(1)
            })
            .unwrap();
        assert_eq!(v, 1);

        let v = *cache
            .get_or_try_load_at(t0 + Duration::from_secs(1), || {
                loads += 1;
                Ok::<_, ()>(2)
            })
            .unwrap();
        assert_eq!(v, 1, "stale data is served within the ttl");

        let v = *cache
            .get_or_try_load_at(t0 + Duration::from_secs(6), || {
                loads += 1;
                Ok::<_, ()>(3)
            })
            .unwrap();
        assert_eq!(v, 3);
        assert_eq!(loads, 2);
    }

    #[test]
    fn invalidate_forces_reload() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new(TTL);
        cache.put_at(t0, "old");
        cache.invalidate();
        assert!(!cache.is_fresh_at(t0));
        let v = *cache
            .get_or_try_load_at(t0, || Ok::<_, ()>("new"))
            .unwrap();
        assert_eq!(v, "new");
    }

    #[test]
    fn failed_load_leaves_cache_empty() {
        let t0 = Instant::now();
        let mut cache: TtlCache<u32> = TtlCache::new(TTL);
        cache.put_at(t0, 1);
        let res = cache.get_or_try_load_at(t0 + TTL, || Err("db down"));
        assert_eq!(res, Err("db down"));
        assert!(cache.get_at(t0 + TTL).is_none());
    }
}

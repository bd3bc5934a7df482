//! Admission control ahead of the authentication endpoints
//!
//! One limiter is built per process and shared by reference; it owns its
//! bucket state.

use dashmap::DashMap;
use std::fmt;
use tokio::time::Instant;
use tracing::warn;

use ag_shared::config::RateLimitConfig;

/// Decides whether a request keyed by `key` may proceed
pub trait AdmissionControl: Send + Sync {
    /// Returns `true` and consumes capacity if the request is admitted
    fn try_admit(&self, key: &str) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Default bound on simultaneously tracked keys
pub const DEFAULT_MAX_TRACKED_KEYS: usize = 100_000;

/// Token-bucket limiter with one bucket per key
///
/// At most `max_tracked_keys` buckets are held. When a new key arrives at
/// the bound, fully refilled buckets are pruned first; if none can go, the
/// new key is refused until capacity frees up. Keys already tracked are
/// never affected by the bound.
pub struct TokenBucketLimiter {
    capacity: f64,
    refill_per_second: f64,
    max_tracked_keys: usize,
    buckets: DashMap<String, Bucket>,
}

impl TokenBucketLimiter {
    /// `capacity` requests in a burst, refilled at `refill_per_second`
    pub fn new(capacity: u32, refill_per_second: f64) -> Self {
        Self {
            capacity: f64::from(capacity),
            refill_per_second,
            max_tracked_keys: DEFAULT_MAX_TRACKED_KEYS,
            buckets: DashMap::new(),
        }
    }

    pub fn with_max_tracked_keys(mut self, max_tracked_keys: usize) -> Self {
        self.max_tracked_keys = max_tracked_keys.max(1);
        self
    }

    /// Limiter for the configured limits, or `None` when admission is off
    pub fn from_config(config: &RateLimitConfig) -> Option<Self> {
        config.enabled.then(|| {
            Self::new(config.capacity, config.refill_per_second)
                .with_max_tracked_keys(config.max_tracked_keys)
        })
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }

    /// Drop buckets that have refilled completely
    pub fn prune(&self) {
        let now = Instant::now();
        self.buckets
            .retain(|_, bucket| self.refilled(bucket, now) < self.capacity);
    }

    fn refilled(&self, bucket: &Bucket, now: Instant) -> f64 {
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        (bucket.tokens + elapsed * self.refill_per_second).min(self.capacity)
    }

    /// Whether a bucket may be created for a key not yet tracked
    fn make_room(&self) -> bool {
        if self.buckets.len() < self.max_tracked_keys {
            return true;
        }
        self.prune();
        if self.buckets.len() < self.max_tracked_keys {
            return true;
        }
        warn!(
            tracked_keys = self.buckets.len(),
            max_tracked_keys = self.max_tracked_keys,
            "Admission table full; refusing new key"
        );
        false
    }
}

impl AdmissionControl for TokenBucketLimiter {
    fn try_admit(&self, key: &str) -> bool {
        // No shard guard may be held here: pruning takes every shard lock
        if !self.buckets.contains_key(key) && !self.make_room() {
            return false;
        }

        let now = Instant::now();
        let mut bucket = self.buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: self.capacity,
            last_refill: now,
        });

        let available = self.refilled(&bucket, now);
        bucket.last_refill = now;

        if available >= 1.0 {
            bucket.tokens = available - 1.0;
            true
        } else {
            bucket.tokens = available;
            false
        }
    }
}

impl fmt::Debug for TokenBucketLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBucketLimiter")
            .field("capacity", &self.capacity)
            .field("refill_per_second", &self.refill_per_second)
            .field("max_tracked_keys", &self.max_tracked_keys)
            .field("tracked_keys", &self.buckets.len())
            .finish()
    }
}

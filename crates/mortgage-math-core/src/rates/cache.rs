use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::rates::lender::LenderRate;
use crate::types::Province;

/// Rates are re-fetched after five minutes unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    rates: Vec<LenderRate>,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) >= ttl
    }
}

/// Per-province cache of lender rates with a fixed time-to-live.
///
/// Owned by whoever serves rate requests; there is no process-wide instance.
/// The `*_at` variants take the current time explicitly.
#[derive(Debug, Clone)]
pub struct RateCache {
    ttl: Duration,
    entries: HashMap<Province, CacheEntry>,
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl RateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, province: Province, rates: Vec<LenderRate>) {
        self.insert_at(province, rates, Instant::now());
    }

    pub fn insert_at(&mut self, province: Province, rates: Vec<LenderRate>, now: Instant) {
        self.entries.insert(province, CacheEntry { rates, stored_at: now });
    }

    pub fn get(&self, province: Province) -> Option<&[LenderRate]> {
        self.get_at(province, Instant::now())
    }

    /// Cached rates for `province`, or `None` if absent or expired at `now`.
    pub fn get_at(&self, province: Province, now: Instant) -> Option<&[LenderRate]> {
        match self.entries.get(&province) {
            Some(entry) if !entry.is_expired(self.ttl, now) => {
                tracing::trace!(%province, "rate cache hit");
                Some(entry.rates.as_slice())
            }
            Some(_) => {
                tracing::debug!(%province, "rate cache entry expired");
                None
            }
            None => None,
        }
    }

    pub fn get_or_refresh<F, E>(&mut self, province: Province, fetch: F) -> Result<&[LenderRate], E>
    where
        F: FnOnce(Province) -> Result<Vec<LenderRate>, E>,
    {
        self.get_or_refresh_at(province, Instant::now(), fetch)
    }

    /// Return fresh cached rates, calling `fetch` only on a miss or expiry.
    /// A failed fetch leaves any stale entry in place.
    pub fn get_or_refresh_at<F, E>(&mut self, province: Province, now: Instant, fetch: F) -> Result<&[LenderRate], E>
    where
        F: FnOnce(Province) -> Result<Vec<LenderRate>, E>,
    {
        let ttl = self.ttl;
        let entry = match self.entries.entry(province) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired(ttl, now) {
                    tracing::debug!(%province, "refreshing expired rates");
                    let rates = fetch(province)?;
                    occupied.insert(CacheEntry { rates, stored_at: now });
                }
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => {
                tracing::debug!(%province, "fetching rates");
                let rates = fetch(province)?;
                vacant.insert(CacheEntry { rates, stored_at: now })
            }
        };
        Ok(entry.rates.as_slice())
    }

    pub fn invalidate(&mut self, province: Province) -> bool {
        self.entries.remove(&province).is_some()
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired_at(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.is_expired(ttl, now));
        before - self.entries.len()
    }

    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }
}

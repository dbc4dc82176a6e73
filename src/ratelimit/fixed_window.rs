use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::StudioError;

/// Named (copy-generating) requests allowed per client per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 10;
/// Length of one counting window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits:    u32,
}

/// Fixed-window request counter keyed by client address.
///
/// A client's window opens on its first counted hit and resets once
/// `window` has elapsed. Counts are process-local and never persisted.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window:       Duration,
    clients:      Mutex<HashMap<IpAddr, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        FixedWindowLimiter { max_requests, window, clients: Mutex::new(HashMap::new()) }
    }

    /// Counts one hit for `client` and rejects it if the window is full.
    pub fn check(&self, client: IpAddr) -> Result<(), StudioError> {
        self.check_at(client, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading.
    pub fn check_at(&self, client: IpAddr, now: Instant) -> Result<(), StudioError> {
        let mut clients = self.lock();
        let entry = clients.entry(client).or_insert(Window { started: now, hits: 0 });

        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window { started: now, hits: 0 };
        }

        entry.hits = entry.hits.saturating_add(1);
        if entry.hits > self.max_requests {
            let reset_in = self.window.saturating_sub(now.saturating_duration_since(entry.started));
            return Err(StudioError::RateLimited { retry_after: reset_in.as_secs().max(1) });
        }
        Ok(())
    }

    /// Forgets clients whose window has elapsed; returns how many were dropped.
    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    pub fn prune_at(&self, now: Instant) -> usize {
        let window = self.window;
        let mut clients = self.lock();
        let before = clients.len();
        clients.retain(|_, w| now.saturating_duration_since(w.started) < window);
        before - clients.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<IpAddr, Window>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    const ALICE: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const BOB:   IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn eleventh_hit_in_window_is_rejected() {
        let limiter = FixedWindowLimiter::default();
        let t0 = Instant::now();
        for i in 0..10 {
            assert!(limiter.check_at(ALICE, t0 + Duration::from_secs(i)).is_ok(), "hit {}", i + 1);
        }

        let err = limiter
            .check_at(ALICE, t0 + Duration::from_secs(600))
            .expect_err("11th hit must be limited");
        assert_eq!(err.status_code(), 429);
        assert_eq!(err.retry_after(), Some(3000));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = FixedWindowLimiter::new(1, DEFAULT_WINDOW);
        let now = Instant::now();
        assert!(limiter.check_at(ALICE, now).is_ok());
        assert!(limiter.check_at(ALICE, now).is_err());
        assert!(limiter.check_at(BOB, now).is_ok());
    }

    #[test]
    fn window_resets_after_it_elapses() {
        let limiter = FixedWindowLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(limiter.check_at(ALICE, t0).is_ok());
        assert!(limiter.check_at(ALICE, t0).is_ok());
        assert!(limiter.check_at(ALICE, t0 + Duration::from_secs(59)).is_err());
        assert!(limiter.check_at(ALICE, t0 + Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn prune_drops_elapsed_windows() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_secs(60));
        let t0 = Instant::now();
        limiter.check_at(ALICE, t0).ok();
        limiter.check_at(BOB, t0 + Duration::from_secs(30)).ok();

        assert_eq!(limiter.prune_at(t0 + Duration::from_secs(61)), 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }
}

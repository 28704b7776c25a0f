use std::{
	collections::VecDeque,
	sync::{Mutex, PoisonError},
	time::{Duration, Instant},
};

use ahash::AHashMap;

/// Sliding-window admission control, one timestamp window per client key.
/// Windows are pruned lazily on access; idle keys are dropped by the
/// periodic `cleanup_old_entries` sweep the owning service schedules.
#[derive(Default)]
pub struct RateLimiter {
	windows: Mutex<AHashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Admits iff the key has fewer than `max_requests` admissions within
	/// the trailing window. The timestamp is recorded only on admission.
	pub fn is_allowed(&self, key: &str, max_requests: u32, window: Duration) -> bool {
		self.is_allowed_at(key, max_requests, window, Instant::now())
	}

	/// Remaining admissible slots for the key. Non-mutating.
	pub fn remaining(&self, key: &str, max_requests: u32, window: Duration) -> u32 {
		self.remaining_at(key, max_requests, window, Instant::now())
	}

	/// Drops every key whose most recent admission is older than `idle`,
	/// bounding memory across the process lifetime.
	pub fn cleanup_old_entries(&self, idle: Duration) {
		self.cleanup_at(idle, Instant::now());
	}

	fn is_allowed_at(
		&self,
		key: &str,
		max_requests: u32,
		window: Duration,
		now: Instant,
	) -> bool {
		let cutoff = now.checked_sub(window);
		let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
		let entries = windows.entry(key.to_string()).or_default();

		if let Some(cutoff) = cutoff {
			while entries.front().map(|at| *at <= cutoff).unwrap_or(false) {
				entries.pop_front();
			}
		}

		if entries.len() >= max_requests as usize {
			return false;
		}

		entries.push_back(now);

		true
	}

	fn remaining_at(&self, key: &str, max_requests: u32, window: Duration, now: Instant) -> u32 {
		let cutoff = now.checked_sub(window);
		let windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
		let recent = windows
			.get(key)
			.map(|entries| {
				entries
					.iter()
					.filter(|at| cutoff.map(|cutoff| **at > cutoff).unwrap_or(true))
					.count()
			})
			.unwrap_or(0);

		max_requests.saturating_sub(recent as u32)
	}

	fn cleanup_at(&self, idle: Duration, now: Instant) {
		let Some(cutoff) = now.checked_sub(idle) else {
			return;
		};
		let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

		windows.retain(|_, entries| entries.back().map(|at| *at > cutoff).unwrap_or(false));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WINDOW: Duration = Duration::from_secs(10);

	#[test]
	fn sixth_request_in_the_window_is_blocked() {
		let limiter = RateLimiter::new();
		let base = Instant::now();

		for i in 0..5 {
			assert!(
				limiter.is_allowed_at("client", 5, WINDOW, base + Duration::from_secs(i)),
				"request {} should be admitted",
				i + 1
			);
		}

		assert!(!limiter.is_allowed_at("client", 5, WINDOW, base + Duration::from_secs(5)));
	}

	#[test]
	fn admission_resumes_after_the_window_elapses() {
		let limiter = RateLimiter::new();
		let base = Instant::now();

		for _ in 0..3 {
			limiter.is_allowed_at("client", 3, WINDOW, base);
		}

		assert!(!limiter.is_allowed_at("client", 3, WINDOW, base + Duration::from_secs(1)));
		assert!(limiter.is_allowed_at("client", 3, WINDOW, base + Duration::from_secs(11)));
	}

	#[test]
	fn keys_are_tracked_independently() {
		let limiter = RateLimiter::new();
		let base = Instant::now();

		for _ in 0..5 {
			limiter.is_allowed_at("exhausted", 5, WINDOW, base);
		}

		assert!(!limiter.is_allowed_at("exhausted", 5, WINDOW, base));
		assert!(limiter.is_allowed_at("fresh", 5, WINDOW, base));
	}

	#[test]
	fn remaining_does_not_consume_a_slot() {
		let limiter = RateLimiter::new();
		let base = Instant::now();

		limiter.is_allowed_at("client", 5, WINDOW, base);

		assert_eq!(limiter.remaining_at("client", 5, WINDOW, base), 4);
		assert_eq!(limiter.remaining_at("client", 5, WINDOW, base), 4);
		assert_eq!(limiter.remaining_at("unknown", 5, WINDOW, base), 5);
	}

	#[test]
	fn blocked_attempts_are_not_recorded() {
		let limiter = RateLimiter::new();
		let base = Instant::now();

		for _ in 0..2 {
			limiter.is_allowed_at("client", 2, WINDOW, base);
		}

		// Rejections must not extend the window.
		assert!(!limiter.is_allowed_at("client", 2, WINDOW, base + Duration::from_secs(5)));
		assert!(limiter.is_allowed_at("client", 2, WINDOW, base + Duration::from_secs(11)));
	}

	#[test]
	fn idle_sweep_drops_stale_keys_only() {
		let limiter = RateLimiter::new();
		let base = Instant::now();

		limiter.is_allowed_at("stale", 5, WINDOW, base);
		limiter.is_allowed_at("active", 5, WINDOW, base + Duration::from_secs(3_599));
		limiter.cleanup_at(Duration::from_secs(3_600), base + Duration::from_secs(7_000));

		let windows = limiter.windows.lock().expect("lock poisoned");

		assert!(!windows.contains_key("stale"));
		assert!(windows.contains_key("active"));
	}
}

use serde::{Deserialize, Serialize};

/// Progressive floor reduction for searches that come back empty at the
/// caller's similarity floor. The floor drops by `step` per attempt and
/// never goes below `min_floor`; once a single reduction has happened the
/// controller is active and result lists are capped.
#[derive(Clone, Debug)]
pub struct CompromiseState {
	initial_floor: f32,
	current_floor: f32,
	min_floor: f32,
	step: f32,
	max_results: usize,
	attempts: u32,
	active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompromiseStatus {
	pub active: bool,
	pub initial_floor: f32,
	pub current_floor: f32,
	pub attempts: u32,
	pub can_continue: bool,
}

impl CompromiseState {
	pub fn new(initial_floor: f32, cfg: &lode_config::Compromise) -> Self {
		Self {
			initial_floor,
			current_floor: initial_floor,
			min_floor: cfg.min_floor,
			step: cfg.step,
			max_results: cfg.max_results as usize,
			attempts: 0,
			active: false,
		}
	}

	pub fn should_continue(&self) -> bool {
		self.current_floor > self.min_floor
	}

	/// Lowers the floor by one step, clamped at the minimum. Activates the
	/// controller as a side effect.
	pub fn reduce_floor(&mut self) -> f32 {
		self.current_floor = (self.current_floor - self.step).max(self.min_floor);
		self.attempts += 1;
		self.active = true;

		tracing::info!(
			floor = self.current_floor,
			attempt = self.attempts,
			"Compromise mode reduced the similarity floor.",
		);

		self.current_floor
	}

	/// Caps the result list while active; inactive lists pass through.
	pub fn limit_results<T>(&self, results: Vec<T>) -> Vec<T> {
		if self.active && results.len() > self.max_results {
			tracing::info!(
				from = results.len(),
				to = self.max_results,
				"Compromise mode truncated the result list.",
			);

			results.into_iter().take(self.max_results).collect()
		} else {
			results
		}
	}

	pub fn status(&self) -> CompromiseStatus {
		CompromiseStatus {
			active: self.active,
			initial_floor: self.initial_floor,
			current_floor: self.current_floor,
			attempts: self.attempts,
			can_continue: self.should_continue(),
		}
	}
}

//! Work budget for the force layout.
//!
//! The layout may tick until either the tick count is spent or the
//! wall-clock time since the first tick reaches the time budget, after
//! which positions freeze. A frozen layout is not an error; it may simply
//! be less converged.
//!
//! Timestamps are monotonic readings from whatever clock drives the frames
//! (the `requestAnimationFrame` timestamp in the browser), measured from an
//! arbitrary origin.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownStatus {
	Running,
	Frozen,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cooldown {
	max_ticks: u32,
	max_time: Duration,
	ticks: u32,
	started: Option<Duration>,
	last_tick: Option<Duration>,
	frozen: bool,
}

impl Cooldown {
	pub fn new(max_ticks: u32, max_time: Duration) -> Self {
		Self {
			max_ticks,
			max_time,
			ticks: 0,
			started: None,
			last_tick: None,
			frozen: false,
		}
	}

	/// Claims one tick at timestamp `now`. The first call starts the clock.
	/// Once a tick is refused the budget stays frozen; a new model gets a
	/// new budget.
	pub fn try_tick(&mut self, now: Duration) -> bool {
		if self.frozen {
			return false;
		}
		let started = *self.started.get_or_insert(now);
		if self.ticks >= self.max_ticks || now.saturating_sub(started) >= self.max_time {
			self.frozen = true;
			return false;
		}
		self.ticks += 1;
		self.last_tick = Some(now);
		true
	}

	/// `Frozen` once the tick budget is spent or a tick has been refused.
	pub fn status(&self) -> CooldownStatus {
		if self.frozen || self.ticks >= self.max_ticks {
			CooldownStatus::Frozen
		} else {
			CooldownStatus::Running
		}
	}

	pub fn ticks(&self) -> u32 {
		self.ticks
	}

	/// Wall-clock time between the start of the budget and the last tick
	/// that ran.
	pub fn elapsed(&self) -> Duration {
		match (self.started, self.last_tick) {
			(Some(start), Some(last)) => last.saturating_sub(start),
			_ => Duration::ZERO,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::thread;
	use std::time::Instant;

	use super::*;

	fn drive(cooldown: &mut Cooldown, step: Duration, frames: u32) -> u32 {
		(0..frames).filter(|i| cooldown.try_tick(step * *i)).count() as u32
	}

	#[test]
	fn tick_bound_is_respected() {
		let mut cooldown = Cooldown::new(1000, Duration::from_millis(15_000));
		let ran = drive(&mut cooldown, Duration::from_millis(1), 5000);
		assert_eq!(ran, 1000);
		assert_eq!(cooldown.ticks(), 1000);
		assert!(cooldown.elapsed() < Duration::from_millis(15_000));
		assert_eq!(cooldown.status(), CooldownStatus::Frozen);
	}

	#[test]
	fn time_bound_is_respected() {
		let mut cooldown = Cooldown::new(1000, Duration::from_millis(15_000));
		// 16ms frames starting at 0: ticks at 0..=14_992ms
		let ran = drive(&mut cooldown, Duration::from_millis(16), 5000);
		assert_eq!(ran, 938);
		assert!(cooldown.elapsed() < Duration::from_millis(15_000));
		assert_eq!(cooldown.status(), CooldownStatus::Frozen);
		assert!(!cooldown.try_tick(Duration::from_millis(16 * 938)));
	}

	#[test]
	fn refused_tick_freezes_for_good() {
		let mut cooldown = Cooldown::new(1000, Duration::from_millis(100));
		assert!(cooldown.try_tick(Duration::from_millis(1_000)));
		assert!(!cooldown.try_tick(Duration::from_millis(1_100)));
		assert_eq!(cooldown.status(), CooldownStatus::Frozen);
		// a timestamp going backwards does not thaw it
		assert!(!cooldown.try_tick(Duration::from_millis(1_050)));
	}

	#[test]
	fn bounds_hold_for_uneven_frames() {
		let mut cooldown = Cooldown::new(1000, Duration::from_millis(15_000));
		let mut now = Duration::from_secs(3);
		for i in 0..10_000u64 {
			now += Duration::from_millis(1 + (i * 7) % 40);
			cooldown.try_tick(now);
			assert!(cooldown.ticks() <= 1000);
			assert!(cooldown.elapsed() < Duration::from_millis(15_000));
		}
	}

	#[test]
	fn slow_frames_stop_at_wall_clock_budget() {
		let mut cooldown = Cooldown::new(1000, Duration::from_millis(100));
		let origin = Instant::now();
		let mut ran = 0;
		for _ in 0..10 {
			if cooldown.try_tick(origin.elapsed()) {
				ran += 1;
			}
			thread::sleep(Duration::from_millis(40));
		}
		// frames land at roughly 0, 40, 80, 120... ms
		assert!((1..=3).contains(&ran), "ran {ran} ticks");
		assert!(cooldown.elapsed() < Duration::from_millis(100));
		assert_eq!(cooldown.status(), CooldownStatus::Frozen);
	}

	#[test]
	fn zero_budget_never_runs() {
		let mut cooldown = Cooldown::new(0, Duration::from_millis(15_000));
		assert_eq!(cooldown.status(), CooldownStatus::Frozen);
		assert!(!cooldown.try_tick(Duration::ZERO));
	}
}

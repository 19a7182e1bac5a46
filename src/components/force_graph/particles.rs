//! Directional particles travelling from a link's source to its target.

/// Positions of `count` evenly spaced particles on the segment at
/// `progress` (in link lengths travelled, wraps at 1).
pub fn particle_positions(
	(x1, y1): (f64, f64),
	(x2, y2): (f64, f64),
	count: u32,
	progress: f64,
) -> impl Iterator<Item = (f64, f64)> {
	(0..count).map(move |i| {
		let t = (progress + i as f64 / count as f64).rem_euclid(1.0);
		(x1 + (x2 - x1) * t, y1 + (y2 - y1) * t)
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn particles_are_evenly_spaced() {
		let points: Vec<_> = particle_positions((0.0, 0.0), (10.0, 0.0), 2, 0.0).collect();
		assert_eq!(points, vec![(0.0, 0.0), (5.0, 0.0)]);
	}

	#[test]
	fn particles_move_towards_target_and_wrap() {
		let at = |p| particle_positions((0.0, 0.0), (0.0, 100.0), 1, p).next().unwrap();
		assert_eq!(at(0.25), (0.0, 25.0));
		assert_eq!(at(1.25), (0.0, 25.0));
	}

	#[test]
	fn zero_count_draws_nothing() {
		assert_eq!(particle_positions((0.0, 0.0), (1.0, 1.0), 0, 0.5).count(), 0);
	}
}

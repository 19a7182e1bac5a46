use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Bookkeeping for the canvas animation loop: the pending
/// `requestAnimationFrame` id and whether the owner has gone away.
#[derive(Clone, Debug, Default)]
pub struct FrameLoop {
	pending: Arc<AtomicI32>,
	stopped: Arc<AtomicBool>,
}

impl FrameLoop {
	pub fn scheduled(&self, id: i32) {
		self.pending.store(id, Ordering::Relaxed);
	}

	pub fn is_stopped(&self) -> bool {
		self.stopped.load(Ordering::Relaxed)
	}

	/// Stops the loop. Returns the frame to cancel the first time only.
	pub fn stop(&self) -> Option<i32> {
		if self.stopped.swap(true, Ordering::Relaxed) {
			return None;
		}
		Some(self.pending.load(Ordering::Relaxed))
	}
}

#[cfg(test)]
mod tests {
	use leptos::prelude::*;

	use super::*;

	#[test]
	fn stop_cancels_latest_frame_once() {
		let frames = FrameLoop::default();
		frames.scheduled(3);
		frames.scheduled(4);
		assert!(!frames.is_stopped());
		assert_eq!(frames.stop(), Some(4));
		assert!(frames.is_stopped());
		assert_eq!(frames.stop(), None);
	}

	#[test]
	fn disposing_the_owner_stops_the_loop() {
		let frames = FrameLoop::default();
		let cancelled = Arc::new(AtomicI32::new(-1));
		let owner = Owner::new();
		owner.with(|| {
			let (frames, cancelled) = (frames.clone(), cancelled.clone());
			frames.scheduled(7);
			on_cleanup(move || {
				if let Some(id) = frames.stop() {
					cancelled.store(id, Ordering::Relaxed);
				}
			});
		});
		assert!(!frames.is_stopped());
		owner.cleanup();
		assert!(frames.is_stopped());
		assert_eq!(cancelled.load(Ordering::Relaxed), 7);
	}
}

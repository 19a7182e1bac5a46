//! The set of node ids the user has toggled on.
//!
//! The state is a plain value; the UI wraps it in a signal so the canvas and
//! any reading panel observe every toggle. Mutation only happens through
//! [`SelectionState::toggle`] and [`SelectionState::clear`].

use std::collections::BTreeSet;

use leptos::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
	selected: BTreeSet<String>,
}

impl SelectionState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Flips membership of `id` and returns whether it is now selected.
	/// Other ids are never touched and there is no cap on the set size.
	pub fn toggle(&mut self, id: &str) -> bool {
		if self.selected.remove(id) {
			false
		} else {
			self.selected.insert(id.to_string());
			true
		}
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.contains(id)
	}

	/// External reset.
	pub fn clear(&mut self) {
		self.selected.clear();
	}

	pub fn len(&self) -> usize {
		self.selected.len()
	}

	pub fn is_empty(&self) -> bool {
		self.selected.is_empty()
	}

	/// Selected ids in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.selected.iter().map(String::as_str)
	}
}

/// Shared handle over a reactive [`SelectionState`].
///
/// `Copy`, so the click handler, the canvas and reading panels each hold
/// their own handle to the same state. Reads through [`Self::is_selected`]
/// and [`Self::state`] are tracked, so panels re-run when the set changes.
#[derive(Clone, Copy, Debug)]
pub struct SelectionManager {
	state: RwSignal<SelectionState>,
}

impl Default for SelectionManager {
	fn default() -> Self {
		Self::new()
	}
}

impl SelectionManager {
	pub fn new() -> Self {
		Self {
			state: RwSignal::new(SelectionState::new()),
		}
	}

	pub fn toggle(&self, id: &str) -> bool {
		let mut now_selected = false;
		self.state.update(|s| now_selected = s.toggle(id));
		now_selected
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.state.with(|s| s.is_selected(id))
	}

	pub fn clear(&self) {
		self.state.update(SelectionState::clear);
	}

	/// Read-only view for consumers.
	pub fn state(&self) -> Signal<SelectionState> {
		self.state.into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_empty() {
		let state = SelectionState::new();
		assert!(state.is_empty());
		assert!(!state.is_selected("a"));
	}

	#[test]
	fn toggle_twice_restores() {
		let mut state = SelectionState::new();
		assert!(state.toggle("a"));
		assert!(state.is_selected("a"));
		assert!(!state.toggle("a"));
		assert!(!state.is_selected("a"));
		assert_eq!(state, SelectionState::new());
	}

	#[test]
	fn toggles_are_independent() {
		let ids = ["a", "b", "c", "src/main.rs"];
		let mut state = SelectionState::new();
		state.toggle("b");
		for a in ids {
			for b in ids.iter().copied().filter(|b| *b != a) {
				let before = state.is_selected(b);
				state.toggle(a);
				assert_eq!(state.is_selected(b), before);
				state.toggle(a);
			}
		}
	}

	#[test]
	fn no_single_selection_limit() {
		let mut state = SelectionState::new();
		for i in 0..100 {
			state.toggle(&format!("n{i}"));
		}
		assert_eq!(state.len(), 100);
		assert_eq!(state.iter().next(), Some("n0"));
	}

	#[test]
	fn clear_empties() {
		let mut state = SelectionState::new();
		state.toggle("a");
		state.toggle("b");
		state.clear();
		assert!(state.is_empty());
		assert!(!state.is_selected("a"));
	}

	#[test]
	fn manager_handles_share_state() {
		let manager = SelectionManager::new();
		let panel = manager;
		assert!(manager.toggle("src"));
		assert!(panel.is_selected("src"));
		assert!(panel.state().get_untracked().is_selected("src"));
		panel.clear();
		assert!(!manager.is_selected("src"));
		assert!(manager.state().get_untracked().is_empty());
	}

	#[test]
	fn panels_reach_the_provided_manager() {
		let owner = Owner::new();
		owner.with(|| {
			let manager = SelectionManager::new();
			provide_context(manager);
			expect_context::<SelectionManager>().toggle("docs");
			assert!(manager.is_selected("docs"));
		});
	}

	#[test]
	#[should_panic]
	fn missing_manager_is_a_wiring_error() {
		Owner::new().with(|| {
			expect_context::<SelectionManager>();
		});
	}
}

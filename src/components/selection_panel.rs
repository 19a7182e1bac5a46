use std::sync::Arc;

use leptos::prelude::*;

use crate::graph::{GraphModel, SelectionManager};

/// Lists the selected entries. Needs a [`SelectionManager`] in context.
#[component]
pub fn SelectionPanel(#[prop(into)] model: Signal<Option<Arc<GraphModel>>>) -> impl IntoView {
	let selection = expect_context::<SelectionManager>();

	let entries = move || {
		let model = model.get();
		selection.state().with(|s| {
			s.iter()
				.map(|id| {
					let (label, path) = model
						.as_deref()
						.and_then(|m| m.node(id))
						.map(|n| (n.label.clone(), n.path.clone()))
						.unwrap_or_else(|| (id.to_string(), id.to_string()));
					let target = id.to_string();
					view! {
						<li class="selection-entry">
							<span title=path>{label}</span>
							<button on:click=move |_| {
								selection.toggle(&target);
							}>"×"</button>
						</li>
					}
				})
				.collect_view()
		})
	};

	view! {
		<aside class="selection-panel">
			<header>
				<span>
					{move || {
						selection
							.state()
							.with(|s| {
								if s.is_empty() {
									"Nothing selected".to_string()
								} else {
									format!("{} selected", s.len())
								}
							})
					}}
				</span>
				<button on:click=move |_| selection.clear()>"Clear"</button>
			</header>
			<ul>{entries}</ul>
		</aside>
	}
}

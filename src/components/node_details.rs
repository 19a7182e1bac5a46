use leptos::prelude::*;

use crate::graph::{GraphNode, NodeKind, SelectionManager};

/// Details of the last clicked node, with a select toggle. Closing the
/// panel leaves the selection alone.
#[component]
pub fn NodeDetails(active: RwSignal<Option<GraphNode>>) -> impl IntoView {
	let selection = expect_context::<SelectionManager>();

	move || {
		active.get().map(|node| {
			let kind = match node.kind {
				NodeKind::Directory => "Directory",
				NodeKind::File => "File",
			};
			let id = node.id.clone();
			let selected = {
				let id = id.clone();
				move || selection.is_selected(&id)
			};
			let selected_label = selected.clone();
			view! {
				<aside class="node-details" class:selected=selected.clone()>
					<header>
						<span class="swatch" style:background=node.color.clone()></span>
						<strong>{node.label.clone()}</strong>
						<button on:click=move |_| active.set(None)>"Close"</button>
					</header>
					<dl>
						<dt>"Path"</dt>
						<dd>{node.path.clone()}</dd>
						<dt>"Type"</dt>
						<dd>{kind}</dd>
					</dl>
					<button on:click=move |_| {
						selection.toggle(&id);
					}>
						{move || if selected_label() { "Deselect" } else { "Select" }}
					</button>
				</aside>
			}
		})
	}
}

use std::sync::Arc;

use leptos::ev;
use leptos::prelude::*;
use log::{debug, warn};

use crate::components::force_graph::ForceGraphCanvas;
use crate::components::node_details::NodeDetails;
use crate::components::selection_panel::SelectionPanel;
use crate::graph::{
	DirectoryNode, GraphError, GraphModel, GraphModelBuilder, GraphNode, NodeClickHandler,
	SelectionManager, SimulationConfig, SimulationController, SimulationParams, ViewFilter,
};

const DIRECTORIES: &[&str] = &[
	"frontend", "backend", "tests", "docs", "logs", "database", "meta", "utils", "components",
];
const FILE_STEMS: &[&str] = &["index", "main", "app", "config", "schema", "handler", "README"];
const EXTENSIONS: &[&str] = &["ts", "tsx", "py", "rs", "json", "md", "css", "sql", "yaml", "xyz"];

/// Deterministic sample project tree with `dirs` top-level directories.
fn generate_sample_tree(dirs: usize) -> DirectoryNode {
	let children = (0..dirs)
		.map(|d| {
			let name = DIRECTORIES[d % DIRECTORIES.len()];
			let files = (0..3 + (rand_simple(d) * 6.0) as usize)
				.map(|f| {
					let seed = d * 31 + f;
					let stem = FILE_STEMS[(rand_simple(seed) * FILE_STEMS.len() as f64) as usize];
					let ext = EXTENSIONS[(rand_simple(seed + 7) * EXTENSIONS.len() as f64) as usize];
					DirectoryNode::file(format!("{name}/{f}"), format!("{stem}{f}.{ext}"))
				})
				.collect();
			DirectoryNode::directory(name, name, files)
		})
		.chain([
			DirectoryNode::file("Dockerfile", "Dockerfile"),
			DirectoryNode::file("package.json", "package.json"),
		])
		.collect();
	DirectoryNode::directory(".", "project", children)
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Last good model plus the error of the latest attempt, if it failed.
#[derive(Clone, Debug, Default, PartialEq)]
struct BuildOutcome {
	model: Option<Arc<GraphModel>>,
	error: Option<GraphError>,
}

/// Project structure page
#[component]
pub fn Home() -> impl IntoView {
	let tree = RwSignal::new(generate_sample_tree(DIRECTORIES.len()));
	let view_filter = RwSignal::new(ViewFilter::All);
	let active = RwSignal::new(None::<GraphNode>);
	let params = RwSignal::new(SimulationParams::default());
	let selection = SelectionManager::new();
	provide_context(selection);

	let builder = GraphModelBuilder::default();
	let built = Memo::new(move |prev: Option<&BuildOutcome>| {
		tree.with(|t| match builder.build(t) {
			Ok(model) => BuildOutcome {
				model: Some(Arc::new(model)),
				error: None,
			},
			Err(error) => {
				warn!("could not build visualization: {error}");
				BuildOutcome {
					model: prev.and_then(|p| p.model.clone()),
					error: Some(error),
				}
			}
		})
	});

	let full = Memo::new(move |_| built.with(|b| b.model.clone()));
	let visible = Memo::new(move |_| {
		let model = full.get()?;
		Some(view_filter.with(|f| f.apply(&model)))
	});

	// select, narrow the view to the node's neighbourhood, show its details
	let on_node_click: NodeClickHandler = Arc::new(move |node: &GraphNode| {
		let selected = selection.toggle(&node.id);
		debug!("{} {}", if selected { "selected" } else { "deselected" }, node.path);
		view_filter.set(ViewFilter::Focus(node.id.clone()));
		active.set(Some(node.clone()));
	});

	let config = Signal::derive(move || -> Option<SimulationConfig> {
		let model = visible.get()?;
		let controller = SimulationController::new(params.get());
		controller
			.configure(model, &selection.state().get(), on_node_click.clone())
			.inspect_err(|e| warn!("could not configure simulation: {e}"))
			.ok()
	});

	let show_all = move |_: ev::MouseEvent| view_filter.set(ViewFilter::All);
	let toggle_labels = move |_: ev::MouseEvent| params.update(|p| p.show_labels = !p.show_labels);

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Project Structure"</h1>
				<div class="graph-toolbar">
					<input
						type="search"
						placeholder="Search files"
						prop:value=move || view_filter.with(|f| f.query().to_string())
						on:input=move |ev| view_filter.set(ViewFilter::Search(event_target_value(&ev)))
					/>
					<button on:click=show_all>"Show all"</button>
					<button on:click=toggle_labels>
						{move || {
							if params.with(|p| p.show_labels) { "Hide file names" } else { "Show file names" }
						}}
					</button>
				</div>
				{move || {
					built
						.with(|b| b.error.clone())
						.map(|e| {
							view! {
								<p class="graph-error">"Could not build visualization: " {e.to_string()}</p>
							}
						})
				}}
				<p class="subtitle">
					"Click a node to select it and focus its neighbours. Scroll to zoom. Drag background to pan."
				</p>
				<NodeDetails active=active />
			</div>
			<SelectionPanel model=full />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_tree_builds() {
		let tree = generate_sample_tree(DIRECTORIES.len());
		let builder = GraphModelBuilder::default();
		let model = builder.build(&tree).unwrap();
		assert_eq!(model.links.len(), model.nodes.len() - 1);
		assert_eq!(builder.build(&generate_sample_tree(DIRECTORIES.len())).unwrap(), model);
		assert_eq!(
			model.node("logs").unwrap().color,
			"rgba(169, 169, 169, 0.8)"
		);
	}

	#[test]
	fn clicking_a_directory_focuses_its_files() {
		let model = Arc::new(
			GraphModelBuilder::default()
				.build(&generate_sample_tree(DIRECTORIES.len()))
				.unwrap(),
		);
		let focused = ViewFilter::Focus("docs".into()).apply(&model);
		let files = model.links.iter().filter(|l| l.source == "docs").count();
		// the directory, its parent and its files
		assert_eq!(focused.nodes.len(), files + 2);
		assert!(focused.node(".").is_some());
		assert!(focused.node("frontend").is_none());
		assert!(Arc::ptr_eq(&ViewFilter::All.apply(&model), &model));
	}
}

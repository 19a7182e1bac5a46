//! Directory tree input and the node/link model derived from it.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use super::color::ColorResolver;
use super::error::{GraphError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	File,
	Directory,
}

/// One file-system entry as handed over by the project indexer.
///
/// Only directories carry children; a file with children is rejected by
/// [`GraphModelBuilder::build`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectoryNode {
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
	#[serde(default)]
	pub children: Vec<DirectoryNode>,
}

impl DirectoryNode {
	pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			kind: NodeKind::File,
			children: Vec::new(),
		}
	}

	pub fn directory(
		id: impl Into<String>,
		name: impl Into<String>,
		children: Vec<DirectoryNode>,
	) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			kind: NodeKind::Directory,
			children,
		}
	}

	/// Parses a tree from the indexer's JSON shape.
	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphNode {
	/// Copied from the tree entry; the layout keys physics state by it.
	pub id: String,
	pub label: String,
	/// Names from the root down to this entry, joined with `/`.
	pub path: String,
	/// Resolved once at build time.
	pub color: String,
	pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphModel {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphModel {
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// The node `id`, its direct neighbours and the links touching it, or
	/// `None` if `id` is not in the model.
	pub fn neighborhood(&self, id: &str) -> Option<GraphModel> {
		self.node(id)?;
		let links: Vec<GraphLink> = self
			.links
			.iter()
			.filter(|l| l.source == id || l.target == id)
			.cloned()
			.collect();
		let kept: HashSet<&str> = links
			.iter()
			.flat_map(|l| [l.source.as_str(), l.target.as_str()])
			.chain([id])
			.collect();
		let nodes = self
			.nodes
			.iter()
			.filter(|n| kept.contains(n.id.as_str()))
			.cloned()
			.collect();

		Some(GraphModel { nodes, links })
	}

	/// Keeps nodes whose label or path contains `query` (case-insensitive)
	/// and the links between them. A blank query keeps everything.
	pub fn filter(&self, query: &str) -> GraphModel {
		let query = query.trim().to_lowercase();
		if query.is_empty() {
			return self.clone();
		}

		let nodes: Vec<GraphNode> = self
			.nodes
			.iter()
			.filter(|n| {
				n.label.to_lowercase().contains(&query) || n.path.to_lowercase().contains(&query)
			})
			.cloned()
			.collect();
		let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		let links = self
			.links
			.iter()
			.filter(|l| kept.contains(l.source.as_str()) && kept.contains(l.target.as_str()))
			.cloned()
			.collect();

		GraphModel { nodes, links }
	}
}

/// Which part of the built model is on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewFilter {
	#[default]
	All,
	/// Nodes whose label or path contains the query.
	Search(String),
	/// A clicked node and its direct neighbours.
	Focus(String),
}

impl ViewFilter {
	/// Narrows `model`. Returns the same `Arc` when nothing is filtered out,
	/// so the layout keeps running; a focus on an unknown id shows everything.
	pub fn apply(&self, model: &Arc<GraphModel>) -> Arc<GraphModel> {
		match self {
			ViewFilter::All => model.clone(),
			ViewFilter::Search(query) if query.trim().is_empty() => model.clone(),
			ViewFilter::Search(query) => Arc::new(model.filter(query)),
			ViewFilter::Focus(id) => model
				.neighborhood(id)
				.map(Arc::new)
				.unwrap_or_else(|| model.clone()),
		}
	}

	/// Text for the search box.
	pub fn query(&self) -> &str {
		match self {
			ViewFilter::Search(query) => query,
			_ => "",
		}
	}
}

/// Turns a [`DirectoryNode`] tree into a [`GraphModel`].
#[derive(Clone, Debug, Default)]
pub struct GraphModelBuilder {
	resolver: ColorResolver,
}

impl GraphModelBuilder {
	pub fn new(resolver: ColorResolver) -> Self {
		Self { resolver }
	}

	/// Pre-order walk producing one node per entry and one link per
	/// parent/child edge. Any structural problem aborts the whole build.
	pub fn build(&self, root: &DirectoryNode) -> Result<GraphModel> {
		let mut seen: HashSet<&str> = HashSet::new();
		let mut model = GraphModel::default();
		// (entry, index of its parent in model.nodes)
		let mut stack: Vec<(&DirectoryNode, Option<usize>)> = vec![(root, None)];

		while let Some((entry, parent)) = stack.pop() {
			if !seen.insert(entry.id.as_str()) {
				return Err(GraphError::DuplicateNodeId(entry.id.clone()));
			}
			if entry.kind == NodeKind::File && !entry.children.is_empty() {
				return Err(GraphError::FileWithChildren(entry.id.clone()));
			}

			let path = match parent {
				Some(p) => {
					let parent = &model.nodes[p];
					model.links.push(GraphLink {
						source: parent.id.clone(),
						target: entry.id.clone(),
					});
					format!("{}/{}", parent.path, entry.name)
				}
				None => entry.name.clone(),
			};

			model.nodes.push(GraphNode {
				id: entry.id.clone(),
				label: entry.name.clone(),
				path,
				color: self.resolver.resolve_entry(entry).to_string(),
				kind: entry.kind,
			});

			let idx = model.nodes.len() - 1;
			stack.extend(entry.children.iter().rev().map(|child| (child, Some(idx))));
		}

		debug!(
			"built graph from '{}': {} nodes, {} links",
			root.name,
			model.nodes.len(),
			model.links.len()
		);
		Ok(model)
	}
}

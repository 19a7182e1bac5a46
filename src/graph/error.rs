//! Structural errors raised while turning a directory tree into a graph.

use thiserror::Error;

/// Result alias for graph building and configuration.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Integrity violations in upstream data. None of them are retried: the
/// input has to change before a second attempt could succeed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
	/// Two entries in the tree (or two nodes in a model) share an id.
	#[error("duplicate node id: {0}")]
	DuplicateNodeId(String),

	/// A link endpoint names a node that is not in the model.
	#[error("link references unknown node: {0}")]
	DanglingLinkReference(String),

	/// A file entry was given children.
	#[error("file entry has children: {0}")]
	FileWithChildren(String),

	/// A simulation parameter is not finite or not positive.
	#[error("invalid simulation parameter {name}: {value}")]
	InvalidParameter { name: &'static str, value: f64 },
}

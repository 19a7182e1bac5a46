//! Directory tree to force-graph pipeline.
//!
//! `model` builds nodes and links (colouring each through `color`),
//! `selection` tracks toggled nodes, and `simulation` wraps it all into the
//! config the canvas consumes, bounded by a `cooldown` budget.

pub mod color;
pub mod cooldown;
pub mod error;
pub mod model;
pub mod selection;
pub mod simulation;

pub use color::{ColorResolver, ColorRules};
pub use cooldown::{Cooldown, CooldownStatus};
pub use error::{GraphError, Result};
pub use model::{
	DirectoryNode, GraphLink, GraphModel, GraphModelBuilder, GraphNode, NodeKind, ViewFilter,
};
pub use selection::{SelectionManager, SelectionState};
pub use simulation::{
	Halo, NodeCanvasMode, NodeClickHandler, NodeDecorator, SimulationConfig, SimulationController,
	SimulationParams,
};

//! Renderer-ready configuration for the force layout.
//!
//! [`SimulationController::configure`] bundles a validated model, a
//! snapshot of the selection and the click handler into a
//! [`SimulationConfig`]. A new config replaces the previous one; nothing is
//! patched in place.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::cooldown::Cooldown;
use super::error::{GraphError, Result};
use super::model::{GraphModel, GraphNode, NodeKind};
use super::selection::SelectionState;

/// Called with the clicked node. Runs on the UI thread during the event, so
/// it must return quickly and do no I/O.
pub type NodeClickHandler = Arc<dyn Fn(&GraphNode) + Send + Sync>;

/// Invoked per node per frame relative to the base shape; returns the
/// decoration to layer on, if any.
pub type NodeDecorator = Arc<dyn Fn(&GraphNode, bool) -> Option<Halo> + Send + Sync>;

/// When the decorator runs relative to the base node shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCanvasMode {
	Before,
	#[default]
	After,
	/// The decorator output is drawn instead of the base shape.
	Replace,
}

/// A pulsing glow plus outline ring drawn around a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Halo {
	pub rgb: (u8, u8, u8),
	pub base_radius: f64,
}

impl Halo {
	/// Radius at time `t` seconds: pulses ±2 around the base at 1.5 rad/s.
	pub fn radius_at(&self, t: f64) -> f64 {
		self.base_radius + (t * 1.5).sin() * 2.0
	}

	/// Centre alpha of the glow at time `t`.
	pub fn alpha_at(&self, t: f64) -> f64 {
		0.8 + (t * 1.5).sin() * 0.2
	}
}

const META_GOLD: (u8, u8, u8) = (255, 215, 0);
const DIRECTORY_CYAN: (u8, u8, u8) = (0, 255, 255);
const SELECTED_WHITE: (u8, u8, u8) = (255, 255, 255);

/// Gold for `meta`, cyan for directories, white for selected files.
pub fn default_halo(node: &GraphNode, selected: bool) -> Option<Halo> {
	let is_dir = node.kind == NodeKind::Directory;
	if !(is_dir || selected || node.label == "meta") {
		return None;
	}
	let rgb = if node.label == "meta" {
		META_GOLD
	} else if is_dir {
		DIRECTORY_CYAN
	} else {
		SELECTED_WHITE
	};
	Some(Halo {
		rgb,
		base_radius: if is_dir { 8.0 } else { 6.0 },
	})
}

/// Base radius a node is drawn with.
pub fn node_radius(kind: NodeKind) -> f64 {
	match kind {
		NodeKind::Directory => 6.0,
		NodeKind::File => 4.0,
	}
}

/// Label font size in px before dividing by the zoom scale.
pub fn label_font_size(kind: NodeKind) -> f64 {
	match kind {
		NodeKind::Directory => 14.0,
		NodeKind::File => 12.0,
	}
}

/// Layout forces, handed to the `force_graph` engine unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
}

impl Default for PhysicsParams {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

/// Directional particles travelling along each link, parent to child.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
	pub count: u32,
	pub width: f64,
	/// Fraction of the link length travelled per frame.
	pub speed: f64,
	pub color: String,
}

impl Default for ParticleParams {
	fn default() -> Self {
		Self {
			count: 2,
			width: 1.0,
			speed: 0.005,
			color: "rgba(255, 255, 255, 0.6)".into(),
		}
	}
}

/// Every tunable of the rendering and physics contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
	pub link_width: f64,
	pub link_color: String,
	pub particles: ParticleParams,
	pub node_canvas_mode: NodeCanvasMode,
	pub cooldown_ticks: u32,
	pub cooldown_time_ms: u64,
	pub width: f64,
	pub height: f64,
	pub show_labels: bool,
	/// Zoom level the view eases to, centred on a clicked node.
	pub click_zoom: f64,
	pub click_zoom_ms: u64,
	pub physics: PhysicsParams,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			link_width: 1.4,
			link_color: "rgba(255, 255, 255, 0.1)".into(),
			particles: ParticleParams::default(),
			node_canvas_mode: NodeCanvasMode::After,
			cooldown_ticks: 1000,
			cooldown_time_ms: 15_000,
			width: 2000.0,
			height: 1000.0,
			show_labels: true,
			click_zoom: 4.0,
			click_zoom_ms: 2000,
			physics: PhysicsParams::default(),
		}
	}
}

impl SimulationParams {
	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}

	pub fn cooldown_time(&self) -> Duration {
		Duration::from_millis(self.cooldown_time_ms)
	}

	/// A fresh layout budget for these bounds.
	pub fn cooldown(&self) -> Cooldown {
		Cooldown::new(self.cooldown_ticks, self.cooldown_time())
	}

	pub fn click_zoom_duration(&self) -> Duration {
		Duration::from_millis(self.click_zoom_ms)
	}

	fn validate(&self) -> Result<()> {
		let positive = [
			("width", self.width),
			("height", self.height),
			("link_width", self.link_width),
			("click_zoom", self.click_zoom),
		];
		for (name, value) in positive {
			if !value.is_finite() || value <= 0.0 {
				return Err(GraphError::InvalidParameter { name, value });
			}
		}
		let non_negative = [
			("particles.width", self.particles.width),
			("particles.speed", self.particles.speed),
		];
		for (name, value) in non_negative {
			if !value.is_finite() || value < 0.0 {
				return Err(GraphError::InvalidParameter { name, value });
			}
		}
		Ok(())
	}
}

/// Immutable bundle handed to the rendering surface.
#[derive(Clone)]
pub struct SimulationConfig {
	pub model: Arc<GraphModel>,
	pub params: SimulationParams,
	selected: HashSet<String>,
	on_node_click: NodeClickHandler,
	node_decoration: NodeDecorator,
}

impl fmt::Debug for SimulationConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SimulationConfig")
			.field("nodes", &self.model.nodes.len())
			.field("links", &self.model.links.len())
			.field("selected", &self.selected.len())
			.field("params", &self.params)
			.finish_non_exhaustive()
	}
}

impl SimulationConfig {
	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.contains(id)
	}

	pub fn click(&self, node: &GraphNode) {
		(self.on_node_click)(node);
	}

	/// Runs the decoration extension point for one node.
	pub fn decorate(&self, node: &GraphNode) -> Option<Halo> {
		(self.node_decoration)(node, self.is_selected(&node.id))
	}

	pub fn with_decorator(mut self, decorator: NodeDecorator) -> Self {
		self.node_decoration = decorator;
		self
	}

	/// Whether both configs describe the same model instance.
	pub fn same_model(&self, other: &SimulationConfig) -> bool {
		Arc::ptr_eq(&self.model, &other.model)
	}
}

#[derive(Clone, Debug, Default)]
pub struct SimulationController {
	params: SimulationParams,
}

impl SimulationController {
	pub fn new(params: SimulationParams) -> Self {
		Self { params }
	}

	/// Validates the model and parameters, then bundles them with the
	/// selection snapshot and click handler.
	pub fn configure(
		&self,
		model: Arc<GraphModel>,
		selection: &SelectionState,
		on_node_click: NodeClickHandler,
	) -> Result<SimulationConfig> {
		self.params.validate()?;

		let mut ids: HashSet<&str> = HashSet::with_capacity(model.nodes.len());
		for node in &model.nodes {
			if !ids.insert(node.id.as_str()) {
				return Err(GraphError::DuplicateNodeId(node.id.clone()));
			}
		}
		for link in &model.links {
			for end in [&link.source, &link.target] {
				if !ids.contains(end.as_str()) {
					return Err(GraphError::DanglingLinkReference(end.clone()));
				}
			}
		}

		let selected = selection
			.iter()
			.filter(|id| ids.contains(id))
			.map(str::to_string)
			.collect();

		Ok(SimulationConfig {
			model,
			params: self.params.clone(),
			selected,
			on_node_click,
			node_decoration: Arc::new(default_halo),
		})
	}
}

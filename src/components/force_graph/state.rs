use std::collections::HashMap;
use std::f64::consts::PI;
use std::time::Duration;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use crate::graph::simulation::PhysicsParams;
use crate::graph::{Cooldown, CooldownStatus, GraphNode, SimulationConfig};

pub const HIT_RADIUS: f64 = 12.0;
/// Pointer travel below this still counts as a click.
pub const CLICK_SLOP: f64 = 4.0;
const CHILD_OFFSET: f32 = 30.0;
/// Frame time assumed for the very first frame.
const FIRST_FRAME: Duration = Duration::from_millis(16);
/// Longer gaps (a backgrounded tab) are clamped so one physics step stays small.
const MAX_FRAME: Duration = Duration::from_millis(100);

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
}

/// Eased move of the view, started by a node click.
#[derive(Clone, Debug)]
pub struct ZoomTransition {
	pub from: ViewTransform,
	pub to: ViewTransform,
	pub elapsed: Duration,
	pub duration: Duration,
}

pub struct ForceGraphState {
	/// Edge data holds the parent end of each link.
	pub graph: ForceGraph<GraphNode, DefaultNodeIdx>,
	pub config: SimulationConfig,
	pub cooldown: Cooldown,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub press: PressState,
	pub transition: Option<ZoomTransition>,
	pub width: f64,
	pub height: f64,
	/// Seconds since the state was created; drives pulses.
	pub flow_time: f64,
	/// Frames rendered; particles advance `speed` per frame.
	pub frames: u64,
	last_frame: Option<Duration>,
	ids: HashMap<String, DefaultNodeIdx>,
}

fn physics(params: &PhysicsParams) -> SimulationParameters {
	SimulationParameters {
		force_charge: params.force_charge,
		force_spring: params.force_spring,
		force_max: params.force_max,
		node_speed: params.node_speed,
		damping_factor: params.damping_factor,
	}
}

fn build_graph(
	config: &SimulationConfig,
	previous: &HashMap<String, (f32, f32)>,
) -> (ForceGraph<GraphNode, DefaultNodeIdx>, HashMap<String, DefaultNodeIdx>) {
	let model = &config.model;
	let mut graph = ForceGraph::new(physics(&config.params.physics));
	let mut ids = HashMap::with_capacity(model.nodes.len());
	let mut placed: HashMap<&str, (f32, f32)> = HashMap::with_capacity(model.nodes.len());
	let parents: HashMap<&str, &str> = model
		.links
		.iter()
		.map(|l| (l.target.as_str(), l.source.as_str()))
		.collect();

	for (i, node) in model.nodes.iter().enumerate() {
		let angle = (i as f64) * 2.0 * PI / model.nodes.len() as f64;
		let (x, y) = previous
			.get(&node.id)
			.copied()
			.or_else(|| {
				let parent = parents.get(node.id.as_str())?;
				let (px, py) = placed.get(parent)?;
				Some((
					px + CHILD_OFFSET * angle.cos() as f32,
					py + CHILD_OFFSET * angle.sin() as f32,
				))
			})
			.unwrap_or(((100.0 * angle.cos()) as f32, (100.0 * angle.sin()) as f32));

		let idx = graph.add_node(NodeData {
			x,
			y,
			mass: 10.0,
			is_anchor: false,
			user_data: node.clone(),
		});
		placed.insert(node.id.as_str(), (x, y));
		ids.insert(node.id.clone(), idx);
	}

	for link in &model.links {
		// configure() already rejected dangling endpoints
		if let (Some(&src), Some(&tgt)) = (ids.get(&link.source), ids.get(&link.target)) {
			graph.add_edge(src, tgt, EdgeData { user_data: src });
		}
	}

	(graph, ids)
}

impl ForceGraphState {
	pub fn new(config: SimulationConfig, width: f64, height: f64) -> Self {
		let (graph, ids) = build_graph(&config, &HashMap::new());
		Self {
			graph,
			ids,
			cooldown: config.params.cooldown(),
			config,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			pan: PanState::default(),
			press: PressState::default(),
			transition: None,
			width,
			height,
			flow_time: 0.0,
			frames: 0,
			last_frame: None,
		}
	}

	/// Swaps in a new config. The running layout survives when the model is
	/// the same instance; otherwise the physics graph is rebuilt with known
	/// ids kept in place and a fresh cooldown budget.
	pub fn apply(&mut self, config: SimulationConfig) {
		if self.config.same_model(&config) {
			self.config = config;
			return;
		}
		let previous = self.positions();
		let (graph, ids) = build_graph(&config, &previous);
		debug!(
			"layout rebuilt: {} nodes ({} kept in place)",
			ids.len(),
			ids.keys().filter(|id| previous.contains_key(*id)).count()
		);
		self.graph = graph;
		self.ids = ids;
		self.cooldown = config.params.cooldown();
		self.press = PressState::default();
		self.config = config;
	}

	pub fn positions(&self) -> HashMap<String, (f32, f32)> {
		let mut out = HashMap::with_capacity(self.ids.len());
		self.graph.visit_nodes(|node| {
			out.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});
		out
	}

	pub fn position_of(&self, id: &str) -> Option<(f32, f32)> {
		let idx = *self.ids.get(id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x(), node.y()));
			}
		});
		found
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	fn node_data(&self, idx: DefaultNodeIdx) -> Option<GraphNode> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.clone());
			}
		});
		found
	}

	/// Pointer down: arms a click on a node, or starts panning.
	pub fn press(&mut self, x: f64, y: f64) {
		self.transition = None;
		self.press = PressState {
			node_idx: self.node_at_position(x, y),
			start_x: x,
			start_y: y,
		};
		if self.press.node_idx.is_none() {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// Pointer up. Returns the node to dispatch to `onNodeClick` when the
	/// press and release land on the same node without travelling, and
	/// starts zooming the view onto it.
	pub fn release(&mut self, x: f64, y: f64) -> Option<GraphNode> {
		let press = std::mem::take(&mut self.press);
		self.pan.active = false;
		let idx = press.node_idx?;
		let travel = ((x - press.start_x).powi(2) + (y - press.start_y).powi(2)).sqrt();
		if travel >= CLICK_SLOP || self.node_at_position(x, y) != Some(idx) {
			return None;
		}
		let node = self.node_data(idx)?;
		self.zoom_to_node(&node.id);
		Some(node)
	}

	/// Eases the view to `click_zoom`, centred on the node.
	pub fn zoom_to_node(&mut self, id: &str) {
		let Some((nx, ny)) = self.position_of(id) else {
			return;
		};
		let params = &self.config.params;
		let k = params.click_zoom.clamp(0.1, 10.0);
		let to = ViewTransform {
			x: self.width / 2.0 - nx as f64 * k,
			y: self.height / 2.0 - ny as f64 * k,
			k,
		};
		let duration = params.click_zoom_duration();
		if duration.is_zero() {
			self.transform = to;
			self.transition = None;
			return;
		}
		self.transition = Some(ZoomTransition {
			from: self.transform.clone(),
			to,
			elapsed: Duration::ZERO,
			duration,
		});
	}

	fn advance_transition(&mut self, dt: Duration) {
		let Some(tr) = self.transition.as_mut() else {
			return;
		};
		tr.elapsed += dt;
		let t = (tr.elapsed.as_secs_f64() / tr.duration.as_secs_f64()).min(1.0);
		let e = ease_out_cubic(t);
		let lerp = |a: f64, b: f64| a + (b - a) * e;
		self.transform = ViewTransform {
			x: lerp(tr.from.x, tr.to.x),
			y: lerp(tr.from.y, tr.to.y),
			k: lerp(tr.from.k, tr.to.k),
		};
		if t >= 1.0 {
			self.transition = None;
		}
	}

	pub fn cancel_pointer(&mut self) {
		self.press = PressState::default();
		self.pan.active = false;
	}

	pub fn zoom(&mut self, x: f64, y: f64, zoom_in: bool) {
		self.transition = None;
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Advances one frame at timestamp `now` (monotonic, arbitrary origin).
	/// Physics only runs while the cooldown budget allows; returns whether
	/// it did.
	pub fn tick(&mut self, now: Duration) -> bool {
		let dt = self
			.last_frame
			.map_or(FIRST_FRAME, |last| now.saturating_sub(last))
			.min(MAX_FRAME);
		self.last_frame = Some(now);
		self.flow_time += dt.as_secs_f64();
		self.frames += 1;
		self.advance_transition(dt);

		let was_running = self.cooldown.status() == CooldownStatus::Running;
		let ran = self.cooldown.try_tick(now);
		if ran {
			self.graph.update(dt.as_secs_f32());
		}
		if was_running && self.cooldown.status() == CooldownStatus::Frozen {
			debug!(
				"layout frozen after {} ticks, {:?}",
				self.cooldown.ticks(),
				self.cooldown.elapsed()
			);
		}
		ran
	}

	/// Particle progress along every link, in link lengths.
	pub fn particle_progress(&self) -> f64 {
		self.frames as f64 * self.config.params.particles.speed
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

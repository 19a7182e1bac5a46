use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::particles::particle_positions;
use super::state::ForceGraphState;
use crate::graph::simulation::{label_font_size, node_radius};
use crate::graph::{GraphNode, Halo, NodeCanvasMode};

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1e1e1e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let params = &state.config.params;
	let progress = state.particle_progress();

	ctx.set_stroke_style_str(&params.link_color);
	ctx.set_line_width(params.link_width);
	state.graph.visit_edges(|n1, n2, _| {
		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});

	let particles = &params.particles;
	if particles.count == 0 {
		return;
	}
	ctx.set_fill_style_str(&particles.color);
	state.graph.visit_edges(|n1, n2, edge| {
		// the engine's graph is undirected; edges remember their parent end
		let (from, to) = if n1.index() == edge.user_data {
			(n1, n2)
		} else {
			(n2, n1)
		};
		let ends = (
			(from.x() as f64, from.y() as f64),
			(to.x() as f64, to.y() as f64),
		);
		for (x, y) in particle_positions(ends.0, ends.1, particles.count, progress) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, particles.width, 0.0, 2.0 * PI);
			ctx.fill();
		}
	});
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let config = &state.config;
	let mode = config.params.node_canvas_mode;
	let k = state.transform.k;

	state.graph.visit_nodes(|node| {
		let data = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = node_radius(data.kind);
		let halo = config.decorate(data);

		match (mode, halo) {
			(NodeCanvasMode::Before, Some(halo)) => {
				draw_halo(ctx, &halo, x, y, radius, state.flow_time);
				draw_base(ctx, data, x, y, radius);
			}
			(NodeCanvasMode::After, Some(halo)) => {
				draw_base(ctx, data, x, y, radius);
				draw_halo(ctx, &halo, x, y, radius, state.flow_time);
			}
			(NodeCanvasMode::Replace, Some(halo)) => {
				draw_halo(ctx, &halo, x, y, radius, state.flow_time);
			}
			(_, None) => draw_base(ctx, data, x, y, radius),
		}

		if config.params.show_labels {
			let font_size = label_font_size(data.kind) / k;
			ctx.set_font(&format!("{}px sans-serif", font_size));
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			ctx.set_fill_style_str("rgba(255, 255, 255, 1)");
			let _ = ctx.fill_text(&data.label, x, y + font_size * 1.5);
		}
	});
}

fn draw_base(ctx: &CanvasRenderingContext2d, node: &GraphNode, x: f64, y: f64, radius: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&node.color);
	ctx.fill();
}

fn draw_halo(ctx: &CanvasRenderingContext2d, halo: &Halo, x: f64, y: f64, radius: f64, t: f64) {
	let (r, g, b) = halo.rgb;
	let (glow_radius, alpha) = (halo.radius_at(t), halo.alpha_at(t));

	if x.is_finite() && y.is_finite() {
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, 0.0, x, y, glow_radius) {
			let _ = gradient.add_color_stop(0.0, &format!("rgba({r}, {g}, {b}, {alpha})"));
			let _ = gradient.add_color_stop(0.5, &format!("rgba({r}, {g}, {b}, {})", alpha / 2.0));
			let _ = gradient.add_color_stop(1.0, &format!("rgba({r}, {g}, {b}, 0)"));
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&format!("rgba({r}, {g}, {b}, 0.8)"));
	ctx.set_line_width(2.0);
	ctx.stroke();
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::ev;
use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::frame_loop::FrameLoop;
use super::render;
use super::state::ForceGraphState;
use crate::graph::SimulationConfig;

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Canvas surface for a [`SimulationConfig`].
///
/// A new config with the same model swaps selection and styling without
/// disturbing the layout; a new model restarts the layout budget. `None`
/// clears the canvas. The animation loop and the resize listener are torn
/// down when the component unmounts.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] config: Signal<Option<SimulationConfig>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let size: Rc<Cell<Option<(f64, f64)>>> = Rc::new(Cell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let (state_init, size_init) = (state.clone(), size.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let params = config.get_untracked().map(|c| c.params);
		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width
					.or(params.as_ref().map(|p| p.width))
					.unwrap_or(800.0),
				height
					.or(params.as_ref().map(|p| p.height))
					.unwrap_or(600.0),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		size_init.set(Some((w, h)));
		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.resize(w, h);
		}

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("canvas has no 2d context");
			return;
		};

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			let handle = window_event_listener(ev::resize, move |_| {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			});
			on_cleanup(move || handle.remove());
		}

		// the closure reschedules itself through a weak handle; the strong
		// one lives in this effect and drops with it
		let frames = FrameLoop::default();
		let (state_anim, animate_self, frame) = (
			state_init.clone(),
			Rc::downgrade(&animate),
			frames.clone(),
		);
		*animate.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(Duration::from_secs_f64(timestamp.max(0.0) / 1000.0));
				render::render(s, &ctx);
			}
			if frame.is_stopped() {
				return;
			}
			let Some(slot) = animate_self.upgrade() else {
				return;
			};
			if let (Some(cb), Some(win)) = (&*slot.borrow(), web_sys::window()) {
				if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
					frame.scheduled(id);
				}
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frames.scheduled(id);
			}
		}

		on_cleanup(move || {
			if let (Some(id), Some(win)) = (frames.stop(), web_sys::window()) {
				let _ = win.cancel_animation_frame(id);
				debug!("animation loop stopped");
			}
		});
	});

	let state_cfg = state.clone();
	Effect::new(move |_| {
		let next = config.get();
		let mut slot = state_cfg.borrow_mut();
		let Some(c) = next else {
			*slot = None;
			return;
		};
		if let Some(s) = slot.as_mut() {
			s.apply(c);
		} else {
			let (w, h) = size.get().unwrap_or((c.params.width, c.params.height));
			debug!("starting layout: {:?}", c);
			*slot = Some(ForceGraphState::new(c, w, h));
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		// release the borrow before dispatching; the handler updates the
		// selection, which feeds a new config back into this state
		let clicked = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| Some((s.release(x, y)?, s.config.clone())));
		if let Some((node, config)) = clicked {
			debug!("node clicked: {}", node.path);
			config.click(&node);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel_pointer();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y() <= 0.0);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::CanvasConfig;
use super::controller::Gesture;
use super::entry_form::EntryForm;
use super::render;
use super::state::{DispatchOutcome, FlowCanvasState};
use super::types::{GraphSnapshot, Point, Submission};
use crate::components::toast::{Toast, notify};

/// Canvas state plus the reactive handles its outcomes are reported through.
struct Shared {
	state: RefCell<FlowCanvasState>,
	published: Cell<u64>,
	on_change: Option<Callback<GraphSnapshot>>,
	editing: RwSignal<bool>,
	notice: RwSignal<Option<String>>,
}

impl Shared {
	fn settle(&self, outcome: DispatchOutcome) {
		match outcome {
			DispatchOutcome::EditStarted(_) => self.editing.set(true),
			DispatchOutcome::Notice(text) => notify(self.notice, text),
			DispatchOutcome::Committed { .. }
			| DispatchOutcome::Cancelled
			| DispatchOutcome::Aborted(_) => self.editing.set(false),
			DispatchOutcome::Suppressed
			| DispatchOutcome::Ignored
			| DispatchOutcome::Connected(_) => {}
		}
		self.publish();
	}

	/// Hands observers a snapshot when the store moved since the last one.
	fn publish(&self) {
		let Some(on_change) = self.on_change.as_ref() else {
			return;
		};
		let snapshot = {
			let state = self.state.borrow();
			let revision = state.store.revision();
			if revision == self.published.get() {
				return;
			}
			self.published.set(revision);
			state.store.snapshot()
		};
		on_change.run(snapshot);
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn FlowCanvas(
	#[prop(default = CanvasConfig::default())] config: CanvasConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] on_change: Option<Callback<GraphSnapshot>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let editing = RwSignal::new(false);
	let notice = RwSignal::new(None::<String>);
	let shared = Rc::new(Shared {
		state: RefCell::new(FlowCanvasState::new(config)),
		published: Cell::new(0),
		on_change,
		editing,
		notice,
	});
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (shared_init, animate_init, resize_cb_init) =
		(shared.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			error!("2d context unavailable, flow canvas stays inert");
			return;
		};
		shared_init.state.borrow_mut().ready(w, h);

		if fullscreen {
			let (shared_resize, canvas_resize) = (shared_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				shared_resize.state.borrow_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (shared_anim, animate_inner) = (shared_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			render::render(&shared_anim.state.borrow(), &ctx);
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let shared_cm = shared.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let rect = canvas.get_bounding_client_rect();
		let gesture = Gesture::RightClick {
			screen: Point::new(ev.client_x() as f64, ev.client_y() as f64),
			origin: Point::new(rect.left(), rect.top()),
		};
		let outcome = shared_cm.state.borrow_mut().dispatch(gesture);
		shared_cm.settle(outcome);
	};

	let shared_md = shared.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		if let Some(p) = local_point(canvas_ref, &ev) {
			shared_md.state.borrow_mut().pointer_down(p);
		}
	};

	let shared_mm = shared.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(p) = local_point(canvas_ref, &ev) {
			shared_mm.state.borrow_mut().pointer_move(p);
		}
	};

	let shared_mu = shared.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(p) = local_point(canvas_ref, &ev) else {
			return;
		};
		let gesture = shared_mu.state.borrow_mut().pointer_up(p);
		match gesture {
			Some(gesture) => {
				let outcome = shared_mu.state.borrow_mut().dispatch(gesture);
				shared_mu.settle(outcome);
			}
			// A node drag may have moved something.
			None => shared_mu.publish(),
		}
	};

	let shared_ml = shared.clone();
	let on_mouseleave = move |_: MouseEvent| {
		shared_ml.state.borrow_mut().pointer_leave();
		shared_ml.publish();
	};

	let shared_wh = shared.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(p) = local_point(canvas_ref, &ev) {
			shared_wh.state.borrow_mut().wheel(p, ev.delta_y());
		}
	};

	let shared_ok = shared.clone();
	let on_submit = move |submission: Submission| {
		let outcome = shared_ok.state.borrow_mut().submit(&submission);
		shared_ok.settle(outcome);
	};

	let shared_cancel = shared;
	let on_cancel = move || {
		let outcome = shared_cancel.state.borrow_mut().cancel();
		shared_cancel.settle(outcome);
	};

	view! {
		<div class="flow-canvas">
			<canvas
				node_ref=canvas_ref
				class="flow-canvas-surface"
				on:contextmenu=on_contextmenu
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: default;"
			/>
			<EntryForm open=editing on_submit=on_submit on_cancel=on_cancel />
			<Toast message=notice />
		</div>
	}
}

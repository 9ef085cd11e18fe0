use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::anchor::{Handle, NODE_HEIGHT, NODE_WIDTH};
use super::state::FlowCanvasState;
use super::types::{FlowNode, NodeKind, Point};

const HANDLE_RADIUS: f64 = 4.0;
const ARROW_SIZE: f64 = 8.0;

pub fn render(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#f5f6fa");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	let Some(transform) = state.transform else {
		return;
	};
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
	draw_edges(state, ctx, transform.k);
	draw_pending(state, ctx, transform.k);
	draw_nodes(state, ctx, transform.k);
	draw_connect_line(state, ctx, transform.k);
	ctx.restore();
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: f64, gap: f64) {
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
}

fn clear_dash(ctx: &CanvasRenderingContext2d) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d, k: f64) {
	let store = &state.store;
	for edge in store.edges() {
		let (Some(src), Some(tgt)) = (store.node(&edge.source), store.node(&edge.target)) else {
			continue;
		};
		let (from, to) = (Handle::Source.position(src), Handle::Target.position(tgt));
		let color = if state.is_highlighted_edge(edge) {
			"#1890ff"
		} else {
			"#b1b1b7"
		};

		ctx.set_stroke_style_str(color);
		ctx.set_fill_style_str(color);
		ctx.set_line_width(1.5 / k.max(0.5));

		if edge.source == edge.target {
			draw_self_loop(ctx, src);
		} else {
			ctx.begin_path();
			ctx.move_to(from.x, from.y);
			ctx.line_to(to.x, to.y);
			ctx.stroke();
			draw_arrow(ctx, from, to);
		}

		if !edge.label.is_empty() {
			let mid = if edge.source == edge.target {
				Point::new(src.position.x + NODE_WIDTH / 2.0 + 30.0, src.position.y)
			} else {
				Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0)
			};
			draw_label_box(ctx, &edge.label, mid);
		}
	}
}

fn draw_self_loop(ctx: &CanvasRenderingContext2d, node: &FlowNode) {
	let right = node.position.x + NODE_WIDTH / 2.0;
	ctx.begin_path();
	let _ = ctx.arc(right, node.position.y, NODE_HEIGHT / 2.0, -PI / 2.0, PI / 2.0);
	ctx.stroke();
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, from: Point, to: Point) {
	let d = to - from;
	let dist = (d.x * d.x + d.y * d.y).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (d.x / dist, d.y / dist);
	let (back_x, back_y) = (to.x - ux * ARROW_SIZE, to.y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(to.x, to.y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_label_box(ctx: &CanvasRenderingContext2d, text: &str, at: Point) {
	ctx.set_font("11px sans-serif");
	let width = ctx
		.measure_text(text)
		.map(|m| m.width())
		.unwrap_or(text.chars().count() as f64 * 7.0);
	let (w, h) = (width + 8.0, 16.0);
	ctx.set_fill_style_str("white");
	ctx.fill_rect(at.x - w / 2.0, at.y - h / 2.0, w, h);
	ctx.set_fill_style_str("#333");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(text, at.x, at.y);
}

fn draw_pending(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d, k: f64) {
	let Some(edit) = state.edit.pending() else {
		return;
	};
	let Some(anchor) = state.store.node(&edit.anchor) else {
		return;
	};
	let ghost = edit.target_position;
	let from = Handle::Source.position(anchor);
	let to = Point::new(ghost.x, ghost.y - NODE_HEIGHT / 2.0);

	ctx.set_stroke_style_str("#1890ff");
	ctx.set_line_width(1.0 / k.max(0.5));
	set_dash(ctx, 6.0, 4.0);
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(to.x, to.y);
	ctx.stroke();
	ctx.stroke_rect(
		ghost.x - NODE_WIDTH / 2.0,
		ghost.y - NODE_HEIGHT / 2.0,
		NODE_WIDTH,
		NODE_HEIGHT,
	);
	clear_dash(ctx);
}

fn draw_nodes(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d, k: f64) {
	for node in state.store.nodes() {
		let (x, y) = (
			node.position.x - NODE_WIDTH / 2.0,
			node.position.y - NODE_HEIGHT / 2.0,
		);
		let hovered = state.is_hovered(&node.id);
		let border = match (node.kind, hovered) {
			(_, true) => "#1890ff",
			(NodeKind::Start, false) => "#0041d0",
			(NodeKind::Ordinary, false) => "#1a192b",
		};

		ctx.set_fill_style_str("white");
		ctx.fill_rect(x, y, NODE_WIDTH, NODE_HEIGHT);
		ctx.set_stroke_style_str(border);
		ctx.set_line_width((if hovered { 2.0 } else { 1.0 }) / k.max(0.5));
		ctx.stroke_rect(x, y, NODE_WIDTH, NODE_HEIGHT);

		ctx.set_fill_style_str("#222");
		ctx.set_font("12px sans-serif");
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&node.label, node.position.x, node.position.y);

		for handle in [Handle::Source, Handle::Target] {
			let p = handle.position(node);
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, HANDLE_RADIUS, 0.0, 2.0 * PI);
			ctx.set_fill_style_str("#555");
			ctx.fill();
		}
	}
}

fn draw_connect_line(state: &FlowCanvasState, ctx: &CanvasRenderingContext2d, k: f64) {
	let Some(connect) = &state.connect else {
		return;
	};
	let Some(source) = state.store.node(&connect.source) else {
		return;
	};
	let from = connect.handle.position(source);
	ctx.set_stroke_style_str("#555");
	ctx.set_line_width(1.5 / k.max(0.5));
	set_dash(ctx, 4.0, 4.0);
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(connect.cursor.x, connect.cursor.y);
	ctx.stroke();
	clear_dash(ctx);
}

use log::{debug, error, info, warn};

use super::anchor::{Handle, handle_at, node_at};
use super::config::CanvasConfig;
use super::controller::{Begin, EditFlow, Gesture, PendingEdit};
use super::error::FlowError;
use super::store::GraphStore;
use super::types::{EdgeId, FlowEdge, NodeId, Point, Submission};
use super::viewport::ViewTransform;

pub const NO_ANCHOR_NOTICE: &str = "Right-click near a node to add a connection";

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<NodeId>,
	pub start: Point,
	pub node_start: Point,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start: Point,
	pub transform_start: Point,
}

/// In-progress handle drag; `cursor` is in graph space.
#[derive(Clone, Debug)]
pub struct ConnectState {
	pub source: NodeId,
	pub handle: Handle,
	pub cursor: Point,
}

/// What a gesture, submit or cancel did to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
	/// The canvas had no transform yet; nothing happened.
	Suppressed,
	/// Nothing changed and the user should be told why.
	Notice(&'static str),
	EditStarted(PendingEdit),
	/// No state change: a second right-click during an edit, or a
	/// submit/cancel with no edit open.
	Ignored,
	Committed { node: NodeId, edge: EdgeId },
	Cancelled,
	Connected(EdgeId),
	/// Controller invariant violated; the transition was dropped.
	Aborted(FlowError),
}

pub struct FlowCanvasState {
	pub store: GraphStore,
	pub config: CanvasConfig,
	/// `None` until the canvas has been sized and mounted.
	pub transform: Option<ViewTransform>,
	pub edit: EditFlow,
	pub drag: DragState,
	pub pan: PanState,
	pub connect: Option<ConnectState>,
	pub hover: Option<NodeId>,
	pub width: f64,
	pub height: f64,
}

impl FlowCanvasState {
	pub fn new(config: CanvasConfig) -> Self {
		Self {
			store: GraphStore::initialize(&config),
			config,
			transform: None,
			edit: EditFlow::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			connect: None,
			hover: None,
			width: 0.0,
			height: 0.0,
		}
	}

	/// Called once the canvas has a size; centers the start node horizontally
	/// near the top edge.
	pub fn ready(&mut self, width: f64, height: f64) {
		self.resize(width, height);
		let root = self.config.root_position;
		self.transform = Some(ViewTransform {
			x: width / 2.0 - root.x,
			y: 60.0 - root.y,
			k: 1.0,
		});
		info!("flow canvas ready at {}x{}", width, height);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Container-local point to graph space, if the canvas is ready.
	pub fn to_graph(&self, local: Point) -> Option<Point> {
		self.transform
			.map(|t| t.to_graph_space(local, Point::default()))
	}

	pub fn dispatch(&mut self, gesture: Gesture) -> DispatchOutcome {
		match gesture {
			Gesture::RightClick { screen, origin } => self.right_click(screen, origin),
			Gesture::ConnectDrag { source, target } => {
				match self.store.connect_existing(&source, &target) {
					Ok(edge) => DispatchOutcome::Connected(edge),
					Err(err) => {
						error!("connection {} -> {} rejected: {}", source, target, err);
						DispatchOutcome::Aborted(err)
					}
				}
			}
		}
	}

	fn right_click(&mut self, screen: Point, origin: Point) -> DispatchOutcome {
		// Re-read on every gesture: pan and zoom move between clicks.
		let Some(transform) = self.transform else {
			debug!("right-click before canvas ready, dropped");
			return DispatchOutcome::Suppressed;
		};
		let point = transform.to_graph_space(screen, origin);
		debug!(
			"right-click ({:.1}, {:.1}) -> graph ({:.1}, {:.1})",
			screen.x, screen.y, point.x, point.y
		);

		match self.edit.begin(point, &self.store, &self.config) {
			Ok(Begin::Started(edit)) => DispatchOutcome::EditStarted(edit),
			Ok(Begin::Ignored) => DispatchOutcome::Ignored,
			Err(err @ FlowError::NoAnchorFound { .. }) => {
				warn!("{}", err);
				DispatchOutcome::Notice(NO_ANCHOR_NOTICE)
			}
			Err(err) => DispatchOutcome::Aborted(err),
		}
	}

	pub fn submit(&mut self, submission: &Submission) -> DispatchOutcome {
		match self.edit.submit(submission, &mut self.store) {
			Ok(Some((node, edge))) => DispatchOutcome::Committed { node, edge },
			Ok(None) => DispatchOutcome::Ignored,
			Err(err) => DispatchOutcome::Aborted(err),
		}
	}

	pub fn cancel(&mut self) -> DispatchOutcome {
		if self.edit.cancel() {
			debug!("pending edit cancelled");
			DispatchOutcome::Cancelled
		} else {
			DispatchOutcome::Ignored
		}
	}

	/// Left button down at a container-local point: starts a connect drag on a
	/// handle, a node drag on a node body, or a pan elsewhere.
	pub fn pointer_down(&mut self, local: Point) {
		let (Some(transform), Some(graph)) = (self.transform, self.to_graph(local)) else {
			return;
		};
		let nodes = self.store.nodes();
		let handle_radius = self.config.handle_radius / transform.k.min(1.0);

		if let Some((node, handle)) = handle_at(graph, nodes, handle_radius) {
			self.connect = Some(ConnectState {
				source: node.id.clone(),
				handle,
				cursor: graph,
			});
		} else if let Some(node) = node_at(graph, nodes) {
			self.drag = DragState {
				node: Some(node.id.clone()),
				start: local,
				node_start: node.position,
			};
		} else {
			self.pan = PanState {
				active: true,
				start: local,
				transform_start: Point::new(transform.x, transform.y),
			};
		}
	}

	pub fn pointer_move(&mut self, local: Point) {
		let Some(graph) = self.to_graph(local) else {
			return;
		};

		if let Some(connect) = self.connect.as_mut() {
			connect.cursor = graph;
		} else if let Some(id) = self.drag.node.clone() {
			let k = self.transform.map_or(1.0, |t| t.k);
			let delta = local - self.drag.start;
			let position = self.drag.node_start + Point::new(delta.x / k, delta.y / k);
			if let Err(err) = self.store.move_node(&id, position) {
				error!("drag of {} dropped: {}", id, err);
				self.drag = DragState::default();
			}
		} else if self.pan.active {
			if let Some(t) = self.transform.as_mut() {
				t.x = self.pan.transform_start.x + (local.x - self.pan.start.x);
				t.y = self.pan.transform_start.y + (local.y - self.pan.start.y);
			}
		} else {
			let hovered = node_at(graph, self.store.nodes()).map(|n| n.id.clone());
			self.hover = hovered;
		}
	}

	/// Ends whatever pointer interaction is active. A connect drag released on
	/// another handle, or on another node's body, becomes a
	/// [`Gesture::ConnectDrag`].
	pub fn pointer_up(&mut self, local: Point) -> Option<Gesture> {
		self.drag = DragState::default();
		self.pan.active = false;
		let connect = self.connect.take()?;
		let graph = self.to_graph(local)?;
		let k = self.transform.map_or(1.0, |t| t.k);
		let nodes = self.store.nodes();

		let target = match handle_at(graph, nodes, self.config.handle_radius / k.min(1.0)) {
			Some((n, h)) if n.id == connect.source && h == connect.handle => None,
			Some((n, _)) => Some(n),
			None => node_at(graph, nodes).filter(|n| n.id != connect.source),
		}?;
		// Dragging out of a target handle draws the edge backwards.
		let (source, target) = match connect.handle {
			Handle::Source => (connect.source, target.id.clone()),
			Handle::Target => (target.id.clone(), connect.source),
		};
		Some(Gesture::ConnectDrag { source, target })
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.connect = None;
		self.hover = None;
	}

	pub fn wheel(&mut self, local: Point, delta_y: f64) {
		let step = self.config.zoom_step;
		let factor = if delta_y > 0.0 { 1.0 / step } else { step };
		let (min, max) = (self.config.min_zoom, self.config.max_zoom);
		if let Some(t) = self.transform.as_mut() {
			t.zoom_at(local, factor, min, max);
		}
	}

	pub fn is_highlighted_edge(&self, edge: &FlowEdge) -> bool {
		self.hover
			.as_ref()
			.is_some_and(|h| &edge.source == h || &edge.target == h)
	}

	pub fn is_hovered(&self, id: &NodeId) -> bool {
		self.hover.as_ref() == Some(id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_canvas::store::START_ID;

	/// Ready canvas whose graph space equals container space.
	fn identity_canvas() -> FlowCanvasState {
		let mut state = FlowCanvasState::new(CanvasConfig::default());
		state.ready(800.0, 600.0);
		state.transform = Some(ViewTransform::default());
		state
	}

	fn right_click(x: f64, y: f64) -> Gesture {
		Gesture::RightClick {
			screen: Point::new(x, y),
			origin: Point::default(),
		}
	}

	fn qa(q: &str, a: &str) -> Submission {
		Submission::new(q, a).unwrap()
	}

	#[test]
	fn gestures_before_ready_are_suppressed() {
		let mut state = FlowCanvasState::new(CanvasConfig::default());
		assert_eq!(state.dispatch(right_click(250.0, 25.0)), DispatchOutcome::Suppressed);
		state.pointer_down(Point::new(250.0, 25.0));
		assert!(state.drag.node.is_none());
		assert!(!state.pan.active);
		assert!(state.edit.pending().is_none());
	}

	#[test]
	fn authoring_scenario_from_start_node() {
		let mut state = identity_canvas();
		let outcome = state.dispatch(right_click(260.0, 30.0));
		assert!(matches!(outcome, DispatchOutcome::EditStarted(ref e) if e.anchor.0 == START_ID));

		let outcome = state.submit(&qa("is it urgent?", "yes"));
		let DispatchOutcome::Committed { node, .. } = outcome else {
			panic!("expected commit, got {outcome:?}");
		};

		let nodes = state.store.nodes();
		assert_eq!(nodes.len(), 2);
		assert_eq!(nodes[0].label, "开始");
		assert_eq!(nodes[1].label, "yes");
		let edges = state.store.edges();
		assert_eq!(edges.len(), 1);
		assert_eq!(edges[0].source.0, START_ID);
		assert_eq!(edges[0].target, node);
		assert_eq!(edges[0].label, "is it urgent?");
	}

	#[test]
	fn far_right_click_notifies_and_changes_nothing() {
		let mut state = identity_canvas();
		assert_eq!(
			state.dispatch(right_click(1000.0, 1000.0)),
			DispatchOutcome::Notice(NO_ANCHOR_NOTICE)
		);
		assert_eq!(state.store.nodes().len(), 1);
		assert!(state.store.edges().is_empty());
		assert!(state.edit.pending().is_none());
	}

	#[test]
	fn two_submits_from_same_anchor_share_source() {
		let mut state = identity_canvas();
		for (q, a) in [("urgent?", "yes"), ("important?", "no")] {
			state.dispatch(right_click(255.0, 20.0));
			assert!(matches!(state.submit(&qa(q, a)), DispatchOutcome::Committed { .. }));
		}
		assert_eq!(state.store.nodes().len(), 3);
		let edges = state.store.edges();
		assert_eq!(edges.len(), 2);
		assert_eq!(edges[0].source, edges[1].source);
		assert_ne!(edges[0].target, edges[1].target);
	}

	#[test]
	fn cancel_restores_idle_without_mutation() {
		let mut state = identity_canvas();
		let before = state.store.snapshot();
		state.dispatch(right_click(260.0, 30.0));
		assert_eq!(state.cancel(), DispatchOutcome::Cancelled);
		assert_eq!(state.cancel(), DispatchOutcome::Ignored);
		assert_eq!(state.store.snapshot(), before);
	}

	#[test]
	fn right_click_during_edit_is_ignored() {
		let mut state = identity_canvas();
		state.dispatch(right_click(260.0, 30.0));
		let pending = state.edit.pending().cloned();
		assert_eq!(state.dispatch(right_click(250.0, 25.0)), DispatchOutcome::Ignored);
		assert_eq!(state.edit.pending().cloned(), pending);
	}

	#[test]
	fn right_click_uses_current_pan_and_zoom() {
		let mut state = identity_canvas();
		state.transform = Some(ViewTransform {
			x: 100.0,
			y: 50.0,
			k: 2.0,
		});
		// graph (250, 25) sits at local (600, 100); page origin adds (10, 20).
		let outcome = state.dispatch(Gesture::RightClick {
			screen: Point::new(610.0, 120.0),
			origin: Point::new(10.0, 20.0),
		});
		assert!(matches!(outcome, DispatchOutcome::EditStarted(_)));

		state.edit.cancel();
		// Same page point after panning far away no longer hits.
		state.transform = Some(ViewTransform {
			x: -2000.0,
			y: 50.0,
			k: 2.0,
		});
		let outcome = state.dispatch(Gesture::RightClick {
			screen: Point::new(610.0, 120.0),
			origin: Point::new(10.0, 20.0),
		});
		assert_eq!(outcome, DispatchOutcome::Notice(NO_ANCHOR_NOTICE));
	}

	#[test]
	fn handle_drag_connects_existing_nodes() {
		let mut state = identity_canvas();
		let other = state.store.add_node("b", Point::new(250.0, 200.0));

		// Start node source handle is at (250, 45); other's target handle at (250, 180).
		state.pointer_down(Point::new(250.0, 45.0));
		assert!(state.connect.is_some());
		state.pointer_move(Point::new(250.0, 120.0));
		let gesture = state.pointer_up(Point::new(251.0, 181.0)).unwrap();
		assert_eq!(
			gesture,
			Gesture::ConnectDrag {
				source: NodeId(START_ID.into()),
				target: other.clone(),
			}
		);

		let DispatchOutcome::Connected(_) = state.dispatch(gesture) else {
			panic!("connect failed");
		};
		let edge = &state.store.edges()[0];
		assert_eq!(edge.target, other);
		assert!(edge.label.is_empty());
	}

	#[test]
	fn handle_drag_released_on_empty_space_does_nothing() {
		let mut state = identity_canvas();
		state.pointer_down(Point::new(250.0, 45.0));
		assert!(state.pointer_up(Point::new(700.0, 500.0)).is_none());
		assert!(state.connect.is_none());
		assert!(state.store.edges().is_empty());
	}

	#[test]
	fn handle_drag_onto_own_other_handle_makes_self_loop() {
		let mut state = identity_canvas();
		state.pointer_down(Point::new(250.0, 45.0));
		let start = NodeId(START_ID.into());
		assert_eq!(
			state.pointer_up(Point::new(250.0, 5.0)),
			Some(Gesture::ConnectDrag {
				source: start.clone(),
				target: start,
			})
		);

		state.pointer_down(Point::new(250.0, 45.0));
		assert!(state.pointer_up(Point::new(252.0, 44.0)).is_none());
	}

	#[test]
	fn dragging_a_node_moves_it() {
		let mut state = identity_canvas();
		state.transform = Some(ViewTransform {
			x: 0.0,
			y: 0.0,
			k: 2.0,
		});
		// Start node body center is local (500, 50) at k = 2.
		state.pointer_down(Point::new(500.0, 50.0));
		state.pointer_move(Point::new(540.0, 70.0));
		assert!(state.pointer_up(Point::new(540.0, 70.0)).is_none());
		assert_eq!(state.store.nodes()[0].position, Point::new(270.0, 35.0));
		assert!(state.drag.node.is_none());
	}

	#[test]
	fn dragging_background_pans() {
		let mut state = identity_canvas();
		state.pointer_down(Point::new(700.0, 500.0));
		state.pointer_move(Point::new(650.0, 520.0));
		state.pointer_up(Point::new(650.0, 520.0));
		assert_eq!(
			state.transform,
			Some(ViewTransform {
				x: -50.0,
				y: 20.0,
				k: 1.0
			})
		);
	}

	#[test]
	fn hover_highlights_incident_edges() {
		let mut state = identity_canvas();
		state.dispatch(right_click(250.0, 25.0));
		state.submit(&qa("q", "a"));
		state.pointer_move(Point::new(250.0, 25.0));
		assert!(state.is_hovered(&NodeId(START_ID.into())));
		assert!(state.is_highlighted_edge(&state.store.edges()[0]));
	}
}

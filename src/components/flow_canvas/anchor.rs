//! Proximity and hit testing against node positions in graph space.

use super::error::FlowError;
use super::types::{FlowNode, Point};

/// Node box size in graph units; `position` is the box center.
pub const NODE_WIDTH: f64 = 150.0;
pub const NODE_HEIGHT: f64 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
	/// Bottom edge, where outgoing edges leave.
	Source,
	/// Top edge, where incoming edges arrive.
	Target,
}

impl Handle {
	pub fn position(self, node: &FlowNode) -> Point {
		let dy = NODE_HEIGHT / 2.0;
		match self {
			Handle::Source => Point::new(node.position.x, node.position.y + dy),
			Handle::Target => Point::new(node.position.x, node.position.y - dy),
		}
	}
}

/// Nearest node strictly closer than `radius` to `point`. Ties go to the
/// node inserted first.
pub fn resolve_anchor(
	point: Point,
	nodes: &[FlowNode],
	radius: f64,
) -> Result<&FlowNode, FlowError> {
	let mut closest: Option<(&FlowNode, f64)> = None;
	for node in nodes {
		let dist = point.distance(node.position);
		match closest {
			Some((_, best)) if dist >= best => {}
			_ => closest = Some((node, dist)),
		}
	}

	match closest {
		Some((node, dist)) if dist < radius => Ok(node),
		_ => Err(FlowError::NoAnchorFound {
			x: point.x,
			y: point.y,
		}),
	}
}

/// Node whose box contains `point`. Later nodes are drawn on top, so they win.
pub fn node_at(point: Point, nodes: &[FlowNode]) -> Option<&FlowNode> {
	let (hw, hh) = (NODE_WIDTH / 2.0, NODE_HEIGHT / 2.0);
	nodes.iter().rev().find(|n| {
		(point.x - n.position.x).abs() <= hw && (point.y - n.position.y).abs() <= hh
	})
}

pub fn handle_at(point: Point, nodes: &[FlowNode], radius: f64) -> Option<(&FlowNode, Handle)> {
	nodes.iter().rev().find_map(|n| {
		[Handle::Source, Handle::Target]
			.into_iter()
			.find(|h| point.distance(h.position(n)) <= radius)
			.map(|h| (n, h))
	})
}

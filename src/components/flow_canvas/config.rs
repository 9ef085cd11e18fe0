use super::types::Point;

/// Tunables for one canvas instance, passed in as a component prop.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasConfig {
	/// Right-clicks farther than this (graph units) from every node are rejected.
	pub anchor_radius: f64,
	/// Offset from the anchor at which an authored node is placed.
	pub child_offset: Point,
	/// Hit radius of connection handles, in graph units.
	pub handle_radius: f64,
	pub min_zoom: f64,
	pub max_zoom: f64,
	pub zoom_step: f64,
	pub root_label: String,
	pub root_position: Point,
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			anchor_radius: 100.0,
			child_offset: Point::new(0.0, 100.0),
			handle_radius: 8.0,
			min_zoom: 0.1,
			max_zoom: 10.0,
			zoom_step: 1.1,
			root_label: "开始".into(),
			root_position: Point::new(250.0, 25.0),
		}
	}
}

use super::types::Point;

/// Pan/zoom of the canvas: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// `screen` is relative to the page; `origin` is the container's top-left
	/// corner on the same page.
	pub fn to_graph_space(&self, screen: Point, origin: Point) -> Point {
		let local = screen - origin;
		Point::new((local.x - self.x) / self.k, (local.y - self.y) / self.k)
	}

	/// Scales by `factor` keeping the graph point under `focus` (container
	/// coordinates) fixed on screen.
	pub fn zoom_at(&mut self, focus: Point, factor: f64, min: f64, max: f64) {
		let new_k = (self.k * factor).clamp(min, max);
		let ratio = new_k / self.k;
		self.x = focus.x - (focus.x - self.x) * ratio;
		self.y = focus.y - (focus.y - self.y) * ratio;
		self.k = new_k;
	}
}

use std::fmt;
use std::ops::{Add, Sub};

use super::error::FlowError;

/// A point in either screen or graph space; the caller knows which.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

impl Add for Point {
	type Output = Point;
	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;
	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgeId(pub String);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	/// The single node created with the canvas.
	Start,
	Ordinary,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowNode {
	pub id: NodeId,
	pub label: String,
	pub position: Point,
	pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowEdge {
	pub id: EdgeId,
	pub source: NodeId,
	pub target: NodeId,
	pub label: String,
}

/// Copy of the graph handed to observers after each mutation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	pub nodes: Vec<FlowNode>,
	pub edges: Vec<FlowEdge>,
}

/// A question/answer pair that passed the entry form's required-field check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
	question: String,
	answer: String,
}

impl Submission {
	pub fn new(question: &str, answer: &str) -> Result<Self, FlowError> {
		let (question, answer) = (question.trim(), answer.trim());
		if question.is_empty() {
			return Err(FlowError::IncompleteSubmission { field: "question" });
		}
		if answer.is_empty() {
			return Err(FlowError::IncompleteSubmission { field: "answer" });
		}
		Ok(Self {
			question: question.to_owned(),
			answer: answer.to_owned(),
		})
	}

	pub fn question(&self) -> &str {
		&self.question
	}

	pub fn answer(&self) -> &str {
		&self.answer
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn distance_is_euclidean() {
		assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
	}

	#[test]
	fn submission_requires_both_fields() {
		assert_eq!(
			Submission::new("  ", "yes"),
			Err(FlowError::IncompleteSubmission { field: "question" })
		);
		assert_eq!(
			Submission::new("is it urgent?", ""),
			Err(FlowError::IncompleteSubmission { field: "answer" })
		);
	}

	#[test]
	fn submission_trims_whitespace() {
		let s = Submission::new(" is it urgent? ", "yes\n").unwrap();
		assert_eq!(s.question(), "is it urgent?");
		assert_eq!(s.answer(), "yes");
	}
}

use thiserror::Error;

/// Failures raised while authoring the flow graph.
///
/// None of these reach a global handler: the canvas state turns each one
/// into a [`DispatchOutcome`](super::state::DispatchOutcome) where it occurs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
	/// Right-click landed too far from every node.
	#[error("no node within reach of ({x:.1}, {y:.1})")]
	NoAnchorFound { x: f64, y: f64 },

	/// An edge endpoint names a node the store does not hold.
	#[error("edge endpoint references unknown node: {id}")]
	InvalidReference { id: String },

	/// A required entry form field was left blank.
	#[error("required field is empty: {field}")]
	IncompleteSubmission { field: &'static str },
}

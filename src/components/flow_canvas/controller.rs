//! Right-click → entry form → commit/cancel state machine.

use log::{debug, error, warn};

use super::anchor::resolve_anchor;
use super::config::CanvasConfig;
use super::error::FlowError;
use super::store::GraphStore;
use super::types::{EdgeId, NodeId, Point, Submission};

/// Pointer gestures reported by the canvas, already stripped of DOM payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
	/// Context-menu click; `screen` and `origin` are page coordinates of the
	/// pointer and of the canvas' top-left corner.
	RightClick { screen: Point, origin: Point },
	/// Handle-to-handle drag between two existing nodes.
	ConnectDrag { source: NodeId, target: NodeId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingEdit {
	pub anchor: NodeId,
	pub target_position: Point,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditState {
	#[default]
	Idle,
	AwaitingInput(PendingEdit),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Begin {
	Started(PendingEdit),
	/// An edit is already pending; it is kept as is.
	Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct EditFlow {
	state: EditState,
}

impl EditFlow {
	pub fn pending(&self) -> Option<&PendingEdit> {
		match &self.state {
			EditState::AwaitingInput(edit) => Some(edit),
			EditState::Idle => None,
		}
	}

	/// Handles a right-click already translated to graph space.
	pub fn begin(
		&mut self,
		point: Point,
		store: &GraphStore,
		config: &CanvasConfig,
	) -> Result<Begin, FlowError> {
		if let EditState::AwaitingInput(edit) = &self.state {
			warn!("right-click ignored, edit from {} still pending", edit.anchor);
			return Ok(Begin::Ignored);
		}

		let anchor = resolve_anchor(point, store.nodes(), config.anchor_radius)?;
		debug!(
			"anchor {} resolved for ({:.1}, {:.1})",
			anchor.id, point.x, point.y
		);
		let edit = PendingEdit {
			anchor: anchor.id.clone(),
			target_position: anchor.position + config.child_offset,
		};
		self.state = EditState::AwaitingInput(edit.clone());
		Ok(Begin::Started(edit))
	}

	/// Commits the pending edit. Returns `Ok(None)` when nothing is pending.
	pub fn submit(
		&mut self,
		submission: &Submission,
		store: &mut GraphStore,
	) -> Result<Option<(NodeId, EdgeId)>, FlowError> {
		let EditState::AwaitingInput(edit) = std::mem::take(&mut self.state) else {
			return Ok(None);
		};
		match store.author(
			&edit.anchor,
			submission.question(),
			submission.answer(),
			edit.target_position,
		) {
			Ok(created) => Ok(Some(created)),
			Err(err) => {
				error!("edit from {} aborted: {}", edit.anchor, err);
				Err(err)
			}
		}
	}

	/// Drops the pending edit. Returns whether one existed.
	pub fn cancel(&mut self) -> bool {
		matches!(
			std::mem::take(&mut self.state),
			EditState::AwaitingInput(_)
		)
	}
}

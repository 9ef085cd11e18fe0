use log::info;

use super::config::CanvasConfig;
use super::error::FlowError;
use super::types::{EdgeId, FlowEdge, FlowNode, GraphSnapshot, NodeId, NodeKind, Point};

pub const START_ID: &str = "start";

/// Owns the nodes and edges of one canvas. Insertion order is kept so
/// redraws are deterministic.
#[derive(Clone, Debug)]
pub struct GraphStore {
	nodes: Vec<FlowNode>,
	edges: Vec<FlowEdge>,
	next_node: u64,
	revision: u64,
}

impl GraphStore {
	/// A graph holding only the start node.
	pub fn initialize(config: &CanvasConfig) -> Self {
		Self {
			nodes: vec![FlowNode {
				id: NodeId(START_ID.into()),
				label: config.root_label.clone(),
				position: config.root_position,
				kind: NodeKind::Start,
			}],
			edges: Vec::new(),
			next_node: 1,
			revision: 0,
		}
	}

	pub fn nodes(&self) -> &[FlowNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[FlowEdge] {
		&self.edges
	}

	/// Bumped on every mutation; the render loop compares it to decide
	/// whether observers need a fresh snapshot.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
		self.nodes.iter().find(|n| &n.id == id)
	}

	pub fn contains(&self, id: &NodeId) -> bool {
		self.node(id).is_some()
	}

	pub fn add_node(&mut self, label: &str, position: Point) -> NodeId {
		// Ids come from a counter that never rewinds, not from the node count.
		let id = NodeId(format!("node-{}", self.next_node));
		self.next_node += 1;
		self.nodes.push(FlowNode {
			id: id.clone(),
			label: label.to_owned(),
			position,
			kind: NodeKind::Ordinary,
		});
		self.revision += 1;
		info!("node {} added at ({:.1}, {:.1})", id, position.x, position.y);
		id
	}

	pub fn add_edge(
		&mut self,
		source: &NodeId,
		target: &NodeId,
		label: &str,
	) -> Result<EdgeId, FlowError> {
		self.check_endpoints(source, target)?;
		let id = EdgeId(format!("e{}-{}", source, target));
		self.edges.push(FlowEdge {
			id: id.clone(),
			source: source.clone(),
			target: target.clone(),
			label: label.to_owned(),
		});
		self.revision += 1;
		info!("edge {} added: {} -> {}", id, source, target);
		Ok(id)
	}

	/// Unlabeled edge between two nodes that already exist. Duplicates and
	/// self-loops are accepted.
	pub fn connect_existing(
		&mut self,
		source: &NodeId,
		target: &NodeId,
	) -> Result<EdgeId, FlowError> {
		self.add_edge(source, target, "")
	}

	/// Inserts a node labeled `answer` and an edge `anchor -> node` labeled
	/// `question`. The anchor is checked first so a failure leaves the store
	/// untouched.
	pub fn author(
		&mut self,
		anchor: &NodeId,
		question: &str,
		answer: &str,
		position: Point,
	) -> Result<(NodeId, EdgeId), FlowError> {
		if !self.contains(anchor) {
			return Err(FlowError::InvalidReference { id: anchor.0.clone() });
		}
		let node = self.add_node(answer, position);
		let edge = self.add_edge(anchor, &node, question)?;
		Ok((node, edge))
	}

	pub fn move_node(&mut self, id: &NodeId, position: Point) -> Result<(), FlowError> {
		let node = self
			.nodes
			.iter_mut()
			.find(|n| &n.id == id)
			.ok_or_else(|| FlowError::InvalidReference { id: id.0.clone() })?;
		node.position = position;
		self.revision += 1;
		Ok(())
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
		}
	}

	fn check_endpoints(&self, source: &NodeId, target: &NodeId) -> Result<(), FlowError> {
		for id in [source, target] {
			if !self.contains(id) {
				return Err(FlowError::InvalidReference { id: id.0.clone() });
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn start() -> NodeId {
		NodeId(START_ID.into())
	}

	#[test]
	fn initialize_yields_single_start_node() {
		let store = GraphStore::initialize(&CanvasConfig::default());
		assert_eq!(store.nodes().len(), 1);
		assert!(store.edges().is_empty());
		let root = &store.nodes()[0];
		assert_eq!(root.kind, NodeKind::Start);
		assert_eq!(root.label, "开始");
		assert_eq!(root.position, Point::new(250.0, 25.0));
	}

	#[test]
	fn node_ids_are_never_reused() {
		let mut store = GraphStore::initialize(&CanvasConfig::default());
		let a = store.add_node("a", Point::default());
		let b = store.add_node("b", Point::default());
		assert_ne!(a, b);
		assert_ne!(a, start());
		assert_eq!(a.0, "node-1");
		assert_eq!(b.0, "node-2");
	}

	#[test]
	fn add_edge_rejects_unknown_endpoints() {
		let mut store = GraphStore::initialize(&CanvasConfig::default());
		let ghost = NodeId("ghost".into());
		assert_eq!(
			store.add_edge(&start(), &ghost, "q"),
			Err(FlowError::InvalidReference { id: "ghost".into() })
		);
		assert_eq!(
			store.add_edge(&ghost, &start(), "q"),
			Err(FlowError::InvalidReference { id: "ghost".into() })
		);
		assert!(store.edges().is_empty());
	}

	#[test]
	fn edge_id_derives_from_endpoints() {
		let mut store = GraphStore::initialize(&CanvasConfig::default());
		let n = store.add_node("yes", Point::default());
		let e = store.add_edge(&start(), &n, "q").unwrap();
		assert_eq!(e.0, "estart-node-1");
	}

	#[test]
	fn connect_existing_allows_duplicates_and_self_loops() {
		let mut store = GraphStore::initialize(&CanvasConfig::default());
		let n = store.add_node("yes", Point::default());
		let first = store.connect_existing(&start(), &n).unwrap();
		let second = store.connect_existing(&start(), &n).unwrap();
		store.connect_existing(&n, &n).unwrap();
		assert_eq!(first, second);
		assert_eq!(store.edges().len(), 3);
		assert!(store.edges().iter().all(|e| e.label.is_empty()));
	}

	#[test]
	fn author_with_missing_anchor_leaves_store_untouched() {
		let mut store = GraphStore::initialize(&CanvasConfig::default());
		let before = store.snapshot();
		let err = store
			.author(&NodeId("gone".into()), "q", "a", Point::default())
			.unwrap_err();
		assert_eq!(err, FlowError::InvalidReference { id: "gone".into() });
		assert_eq!(store.snapshot(), before);
		assert_eq!(store.revision(), 0);
	}

	#[test]
	fn move_node_updates_position_only() {
		let mut store = GraphStore::initialize(&CanvasConfig::default());
		store.move_node(&start(), Point::new(10.0, 20.0)).unwrap();
		assert_eq!(store.nodes()[0].position, Point::new(10.0, 20.0));
		assert_eq!(store.nodes()[0].label, "开始");
		assert!(store.move_node(&NodeId("x".into()), Point::default()).is_err());
	}
}

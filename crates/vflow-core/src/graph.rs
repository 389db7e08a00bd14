use crate::values::{SourceLocation, ValueId};
use crate::VflowError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// Statement flavor of a sparse value-flow graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Alloc,
    Copy,
    Load,
    Store,
    Phi,
    FieldAddr,
    FormalParam,
    ActualParam,
    FormalReturn,
    ActualReturn,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Alloc => "alloc",
            NodeKind::Copy => "copy",
            NodeKind::Load => "load",
            NodeKind::Store => "store",
            NodeKind::Phi => "phi",
            NodeKind::FieldAddr => "field-addr",
            NodeKind::FormalParam => "formal-param",
            NodeKind::ActualParam => "actual-param",
            NodeKind::FormalReturn => "formal-return",
            NodeKind::ActualReturn => "actual-return",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Direct def-use flow of a top-level value.
    Direct,
    /// Flow through memory discovered by the pointer analysis.
    Indirect,
    Call,
    Return,
}

/// Directed relation between two nodes. Endpoints are ids into the owning
/// graph; the graph, not the edge, owns node lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowEdge {
    pub src: NodeId,
    pub dst: NodeId,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub value: Option<ValueId>,
    pub location: Option<SourceLocation>,
    pub out_edges: Vec<FlowEdge>,
}

impl FlowNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            value: None,
            location: None,
            out_edges: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: ValueId) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Human-readable descriptor used by the report layer.
    pub fn describe(&self) -> String {
        let mut out = format!("{} [{}]", self.id, self.kind);
        if let Some(value) = self.value {
            out.push_str(&format!(" {}", value));
        }
        if let Some(location) = &self.location {
            out.push_str(&format!(" @ {}", location));
        }
        out
    }
}

/// Directed graph of flow nodes. Each node owns its outgoing edges; the
/// incoming-edge index is derived and rebuilt after deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    nodes: IndexMap<NodeId, FlowNode>,
    #[serde(skip)]
    in_edges: HashMap<NodeId, Vec<FlowEdge>>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: FlowNode) -> NodeId {
        let id = node.id;
        for edge in &node.out_edges {
            self.in_edges.entry(edge.dst).or_default().push(*edge);
        }
        // Re-inserting an id replaces the node; its old edges leave the
        // index with it.
        if let Some(old) = self.nodes.insert(id, node) {
            for edge in &old.out_edges {
                if let Some(incoming) = self.in_edges.get_mut(&edge.dst) {
                    if let Some(pos) = incoming.iter().position(|e| e == edge) {
                        incoming.remove(pos);
                    }
                }
            }
        }
        id
    }

    pub fn add_edge(&mut self, src: NodeId, dst: NodeId, kind: EdgeKind) -> crate::Result<()> {
        if !self.nodes.contains_key(&src) {
            return Err(VflowError::UnknownNode(src));
        }
        if !self.nodes.contains_key(&dst) {
            return Err(VflowError::UnknownNode(dst));
        }
        let edge = FlowEdge { src, dst, kind };
        if let Some(node) = self.nodes.get_mut(&src) {
            node.out_edges.push(edge);
        }
        self.in_edges.entry(dst).or_default().push(edge);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&FlowNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.values()
    }

    pub fn in_edges(&self, id: NodeId) -> &[FlowEdge] {
        self.in_edges.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn out_edges(&self, id: NodeId) -> &[FlowEdge] {
        self.nodes
            .get(&id)
            .map(|n| n.out_edges.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.out_edges.len()).sum()
    }

    /// Rebuilds the incoming-edge index from node-owned outgoing edges.
    /// Must be called after deserialization; the index is not persisted.
    pub fn reindex(&mut self) {
        self.in_edges.clear();
        for node in self.nodes.values() {
            for edge in &node.out_edges {
                self.in_edges.entry(edge.dst).or_default().push(*edge);
            }
        }
    }

    /// Structural problems in the graph, one message per finding. The
    /// walker does not re-check these; reject malformed input here first.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for node in self.nodes.values() {
            for edge in &node.out_edges {
                if edge.src != node.id {
                    problems.push(format!(
                        "{}: owned edge claims source {}",
                        node.id, edge.src
                    ));
                }
                if !self.nodes.contains_key(&edge.dst) {
                    problems.push(format!(
                        "{}: edge to {} which the graph does not own",
                        node.id, edge.dst
                    ));
                }
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_nodes(n: u32) -> FlowGraph {
        let mut graph = FlowGraph::new();
        for i in 0..n {
            graph.add_node(FlowNode::new(NodeId(i), NodeKind::Copy));
        }
        graph
    }

    #[test]
    fn edges_are_indexed_both_ways() {
        let mut graph = graph_with_nodes(3);
        graph.add_edge(NodeId(0), NodeId(2), EdgeKind::Direct).unwrap();
        graph.add_edge(NodeId(1), NodeId(2), EdgeKind::Indirect).unwrap();

        assert_eq!(graph.out_edges(NodeId(0)).len(), 1);
        assert_eq!(graph.in_edges(NodeId(2)).len(), 2);
        assert_eq!(graph.in_edges(NodeId(0)).len(), 0);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn edge_to_unknown_node_is_rejected() {
        let mut graph = graph_with_nodes(1);
        let err = graph
            .add_edge(NodeId(0), NodeId(9), EdgeKind::Direct)
            .unwrap_err();
        assert!(matches!(err, VflowError::UnknownNode(NodeId(9))));
    }

    #[test]
    fn replacing_a_node_purges_its_indexed_edges() {
        let mut graph = graph_with_nodes(2);
        graph.add_edge(NodeId(0), NodeId(1), EdgeKind::Direct).unwrap();
        assert_eq!(graph.in_edges(NodeId(1)).len(), 1);

        // Replacement without the edge drops it from the index.
        graph.add_node(FlowNode::new(NodeId(0), NodeKind::Alloc));
        assert!(graph.in_edges(NodeId(1)).is_empty());
        assert_eq!(graph.edge_count(), 0);

        // Replacement carrying the same edge keeps exactly one entry.
        let mut node = FlowNode::new(NodeId(0), NodeKind::Copy);
        node.out_edges.push(FlowEdge {
            src: NodeId(0),
            dst: NodeId(1),
            kind: EdgeKind::Direct,
        });
        graph.add_node(node.clone());
        graph.add_node(node);
        assert_eq!(graph.in_edges(NodeId(1)).len(), 1);
    }

    #[test]
    fn reindex_restores_incoming_edges() {
        let mut graph = graph_with_nodes(2);
        graph.add_edge(NodeId(0), NodeId(1), EdgeKind::Direct).unwrap();

        let json = serde_json::to_string(&graph).unwrap();
        let mut restored: FlowGraph = serde_json::from_str(&json).unwrap();
        assert!(restored.in_edges(NodeId(1)).is_empty());

        restored.reindex();
        assert_eq!(restored.in_edges(NodeId(1)).len(), 1);
        assert_eq!(restored.in_edges(NodeId(1))[0].src, NodeId(0));
    }

    #[test]
    fn validate_reports_dangling_destination() {
        let mut graph = FlowGraph::new();
        let mut node = FlowNode::new(NodeId(0), NodeKind::Store);
        node.out_edges.push(FlowEdge {
            src: NodeId(0),
            dst: NodeId(5),
            kind: EdgeKind::Direct,
        });
        graph.add_node(node);

        let problems = graph.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("node5"));
    }

    #[test]
    fn describe_includes_value_and_location() {
        let node = FlowNode::new(NodeId(4), NodeKind::Alloc)
            .with_value(ValueId(9))
            .with_location(SourceLocation::new("a.c", 3, 1));
        assert_eq!(node.describe(), "node4 [alloc] val9 @ a.c:3:1");
    }
}

use crate::analysis::pointsto::PointsToResult;
use crate::graph::{FlowGraph, NodeId};
use crate::module::Module;
use crate::values::ValueId;
use crate::VflowError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse value-flow graph plus the map from values to definition nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueFlowGraph {
    graph: FlowGraph,
    def_nodes: HashMap<ValueId, NodeId>,
}

impl ValueFlowGraph {
    pub fn new(graph: FlowGraph) -> Self {
        Self {
            graph,
            def_nodes: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut FlowGraph {
        &mut self.graph
    }

    pub fn set_def_node(&mut self, value: ValueId, node: NodeId) -> crate::Result<()> {
        if !self.graph.contains(node) {
            return Err(VflowError::UnknownNode(node));
        }
        self.def_nodes.insert(value, node);
        Ok(())
    }

    /// Definition node of a value, or `None`. Not every value has one, so
    /// absence is never an error.
    pub fn def_node(&self, value: ValueId) -> Option<NodeId> {
        let node = self.def_nodes.get(&value).copied()?;
        if self.graph.contains(node) {
            Some(node)
        } else {
            None
        }
    }

    pub fn def_count(&self) -> usize {
        self.def_nodes.len()
    }
}

/// Builder interface for the value-flow graph. The real construction is the
/// external engine's job; the signature fixes the input order.
pub trait VfgBuilder {
    fn build(
        &mut self,
        module: &Module,
        points_to: &PointsToResult,
    ) -> crate::Result<ValueFlowGraph>;
}

/// Builder backed by a previously exported graph; single-use.
#[derive(Debug)]
pub struct PrecomputedVfg {
    vfg: Option<ValueFlowGraph>,
}

impl PrecomputedVfg {
    pub fn new(vfg: ValueFlowGraph) -> Self {
        Self { vfg: Some(vfg) }
    }
}

impl VfgBuilder for PrecomputedVfg {
    fn build(
        &mut self,
        _module: &Module,
        _points_to: &PointsToResult,
    ) -> crate::Result<ValueFlowGraph> {
        self.vfg
            .take()
            .ok_or_else(|| VflowError::EngineError("value-flow graph artifact already consumed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FlowNode, NodeKind};

    #[test]
    fn def_node_lookup_is_layered() {
        let mut graph = FlowGraph::new();
        graph.add_node(FlowNode::new(NodeId(0), NodeKind::Alloc));
        let mut vfg = ValueFlowGraph::new(graph);

        // No recorded definition.
        assert_eq!(vfg.def_node(ValueId(1)), None);

        vfg.set_def_node(ValueId(1), NodeId(0)).unwrap();
        assert_eq!(vfg.def_node(ValueId(1)), Some(NodeId(0)));

        // Recording a definition on a node the graph does not own fails.
        assert!(matches!(
            vfg.set_def_node(ValueId(2), NodeId(7)),
            Err(VflowError::UnknownNode(NodeId(7)))
        ));
    }
}

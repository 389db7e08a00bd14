use crate::analysis::pointsto::{AliasResult, PointerEngine, PointsToResult, PointsToSet};
use crate::analysis::vfg::{ValueFlowGraph, VfgBuilder};
use crate::graph::{FlowGraph, NodeId};
use crate::module::Module;
use crate::values::ValueId;

/// Owner of every analysis artifact for one module. There is no
/// process-wide analysis state; whoever builds the context passes it by
/// reference to queries and passes.
pub struct AnalysisContext {
    module: Module,
    points_to: PointsToResult,
    vfg: ValueFlowGraph,
    icfg: Option<FlowGraph>,
}

impl AnalysisContext {
    /// Runs the construction chain: module, pointer engine, value-flow
    /// graph. Each stage only sees artifacts of earlier stages.
    pub fn build(
        module: Module,
        engine: &mut dyn PointerEngine,
        vfg_builder: &mut dyn VfgBuilder,
    ) -> crate::Result<Self> {
        let points_to = engine.solve(&module)?;
        let vfg = vfg_builder.build(&module, &points_to)?;
        Ok(Self {
            module,
            points_to,
            vfg,
            icfg: None,
        })
    }

    /// Attaches an inter-procedural CFG when the bundle carries one.
    pub fn with_icfg(mut self, icfg: FlowGraph) -> Self {
        self.icfg = Some(icfg);
        self
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn vfg(&self) -> &ValueFlowGraph {
        &self.vfg
    }

    pub fn icfg(&self) -> Option<&FlowGraph> {
        self.icfg.as_ref()
    }

    pub fn points_to(&self, value: ValueId) -> Option<&PointsToSet> {
        self.points_to.get(value)
    }

    pub fn alias(&self, a: ValueId, b: ValueId) -> AliasResult {
        self.points_to.alias(a, b)
    }

    pub fn def_node(&self, value: ValueId) -> Option<NodeId> {
        self.vfg.def_node(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pointsto::PrecomputedPointsTo;
    use crate::analysis::vfg::PrecomputedVfg;
    use crate::graph::{FlowNode, NodeKind};

    #[test]
    fn build_runs_the_stage_chain() {
        let mut graph = FlowGraph::new();
        graph.add_node(FlowNode::new(NodeId(0), NodeKind::Alloc).with_value(ValueId(1)));
        let mut vfg = ValueFlowGraph::new(graph);
        vfg.set_def_node(ValueId(1), NodeId(0)).unwrap();

        let mut points_to = PointsToResult::new();
        points_to.insert(ValueId(1), PointsToSet::from_targets([ValueId(1)]));

        let mut engine = PrecomputedPointsTo::new(points_to);
        let mut builder = PrecomputedVfg::new(vfg);
        let ctx = AnalysisContext::build(Module::new("unit"), &mut engine, &mut builder).unwrap();

        assert_eq!(ctx.module().name, "unit");
        assert_eq!(ctx.def_node(ValueId(1)), Some(NodeId(0)));
        assert!(ctx.points_to(ValueId(1)).is_some());
        assert!(ctx.icfg().is_none());
    }
}

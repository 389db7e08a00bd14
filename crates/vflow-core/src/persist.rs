use crate::analysis::context::AnalysisContext;
use crate::analysis::pointsto::{PointsToResult, PrecomputedPointsTo};
use crate::analysis::vfg::{PrecomputedVfg, ValueFlowGraph};
use crate::graph::FlowGraph;
use crate::module::Module;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything the external analysis exports for one module, in one file:
/// the IR model, the points-to result, the sparse value-flow graph, and
/// optionally the inter-procedural CFG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisBundle {
    pub module: Module,
    pub points_to: PointsToResult,
    pub vfg: ValueFlowGraph,
    #[serde(default)]
    pub icfg: Option<FlowGraph>,
}

impl AnalysisBundle {
    /// Runs the construction chain over the bundled artifacts and hands
    /// ownership of all of them to the resulting context.
    pub fn into_context(self) -> crate::Result<AnalysisContext> {
        let AnalysisBundle {
            module,
            points_to,
            vfg,
            icfg,
        } = self;

        let mut engine = PrecomputedPointsTo::new(points_to);
        let mut builder = PrecomputedVfg::new(vfg);
        let ctx = AnalysisContext::build(module, &mut engine, &mut builder)?;

        Ok(match icfg {
            Some(icfg) => ctx.with_icfg(icfg),
            None => ctx,
        })
    }
}

pub fn save_bundle(bundle: &AnalysisBundle, path: impl AsRef<Path>) -> crate::Result<()> {
    let json = serde_json::to_string_pretty(bundle)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_bundle(path: impl AsRef<Path>) -> crate::Result<AnalysisBundle> {
    let json = fs::read_to_string(path)?;
    let mut bundle: AnalysisBundle = serde_json::from_str(&json)?;

    // Incoming-edge indexes are derived state and not persisted.
    bundle.vfg.graph_mut().reindex();
    if let Some(icfg) = bundle.icfg.as_mut() {
        icfg.reindex();
    }

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeKind, FlowNode, NodeId, NodeKind};
    use crate::values::ValueId;
    use tempfile::NamedTempFile;

    #[test]
    fn bundle_round_trip_restores_the_edge_index() {
        let mut graph = FlowGraph::new();
        graph.add_node(FlowNode::new(NodeId(0), NodeKind::Alloc));
        graph.add_node(FlowNode::new(NodeId(1), NodeKind::Copy));
        graph.add_edge(NodeId(0), NodeId(1), EdgeKind::Direct).unwrap();

        let mut vfg = ValueFlowGraph::new(graph);
        vfg.set_def_node(ValueId(1), NodeId(1)).unwrap();

        let bundle = AnalysisBundle {
            module: Module::new("unit"),
            points_to: PointsToResult::new(),
            vfg,
            icfg: None,
        };

        let temp_file = NamedTempFile::new().unwrap();
        save_bundle(&bundle, temp_file.path()).unwrap();

        let loaded = load_bundle(temp_file.path()).unwrap();
        assert_eq!(loaded.module.name, "unit");
        assert_eq!(loaded.vfg.graph().in_edges(NodeId(1)).len(), 1);
        assert_eq!(loaded.vfg.def_node(ValueId(1)), Some(NodeId(1)));
    }
}

use crate::analysis::context::AnalysisContext;
use crate::analysis::walk::{reachable_ancestors, reachable_successors};
use crate::graph::{NodeId, NodeKind};
use crate::values::{SourceLocation, ValueId};
use serde::{Deserialize, Serialize};

/// One reportable node out of a reachability walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefSite {
    pub node: NodeId,
    pub kind: NodeKind,
    pub value: Option<ValueId>,
    pub location: Option<SourceLocation>,
}

impl DefSite {
    pub fn describe(&self) -> String {
        let mut out = format!("{} [{}]", self.node, self.kind);
        if let Some(value) = self.value {
            out.push_str(&format!(" {}", value));
        }
        if let Some(location) = &self.location {
            out.push_str(&format!(" @ {}", location));
        }
        out
    }
}

/// Every transitive upstream definition site of `value`, not only the
/// nearest reaching definition. A value without a definition node yields no
/// sites. Sorted by node id.
pub fn collect_def_sites(ctx: &AnalysisContext, value: ValueId) -> Vec<DefSite> {
    let visited = reachable_ancestors(ctx.vfg().graph(), ctx.def_node(value));
    sites_for(ctx, visited)
}

/// Every transitive use of `value`'s definition, walking forward.
pub fn collect_uses(ctx: &AnalysisContext, value: ValueId) -> Vec<DefSite> {
    let visited = reachable_successors(ctx.vfg().graph(), ctx.def_node(value));
    sites_for(ctx, visited)
}

fn sites_for(
    ctx: &AnalysisContext,
    visited: std::collections::HashSet<NodeId>,
) -> Vec<DefSite> {
    let mut sites: Vec<DefSite> = visited
        .into_iter()
        .filter_map(|id| ctx.vfg().graph().node(id))
        .map(|node| DefSite {
            node: node.id,
            kind: node.kind,
            value: node.value,
            location: node.location.clone(),
        })
        .collect();
    sites.sort_by_key(|site| site.node);
    sites
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallArgumentReport {
    pub module: String,
    pub calls: Vec<CallReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReport {
    /// Function the call appears in.
    pub function: String,
    pub callee: String,
    pub location: Option<SourceLocation>,
    pub arguments: Vec<ArgumentReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentReport {
    pub value: ValueId,
    pub def_sites: Vec<DefSite>,
}

/// Upstream definition sites of each argument, for every resolved call site
/// in the module. Calls without a resolved callee are skipped.
pub fn report_call_arguments(ctx: &AnalysisContext) -> CallArgumentReport {
    let mut calls = Vec::new();

    for (function, call) in ctx.module().call_sites() {
        let callee = match &call.callee {
            Some(name) => name.clone(),
            None => continue,
        };

        let arguments = call
            .args
            .iter()
            .map(|&arg| ArgumentReport {
                value: arg,
                def_sites: collect_def_sites(ctx, arg),
            })
            .collect();

        calls.push(CallReport {
            function: function.name.clone(),
            callee,
            location: call.location.clone(),
            arguments,
        });
    }

    CallArgumentReport {
        module: ctx.module().name.clone(),
        calls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pointsto::{PointsToResult, PrecomputedPointsTo};
    use crate::analysis::vfg::{PrecomputedVfg, ValueFlowGraph};
    use crate::graph::{EdgeKind, FlowGraph, FlowNode};
    use crate::module::{CallSite, FunctionModel, Module};
    use pretty_assertions::assert_eq;

    /// alloc(node0, val1) -> copy(node1, val2) -> actual-param(node2, val3),
    /// with val3 passed to `sink` and an unresolved call alongside.
    fn context() -> AnalysisContext {
        let mut graph = FlowGraph::new();
        graph.add_node(
            FlowNode::new(NodeId(0), NodeKind::Alloc)
                .with_value(ValueId(1))
                .with_location(SourceLocation::new("demo.c", 3, 5)),
        );
        graph.add_node(FlowNode::new(NodeId(1), NodeKind::Copy).with_value(ValueId(2)));
        graph.add_node(FlowNode::new(NodeId(2), NodeKind::ActualParam).with_value(ValueId(3)));
        graph.add_edge(NodeId(0), NodeId(1), EdgeKind::Direct).unwrap();
        graph.add_edge(NodeId(1), NodeId(2), EdgeKind::Direct).unwrap();

        let mut vfg = ValueFlowGraph::new(graph);
        vfg.set_def_node(ValueId(1), NodeId(0)).unwrap();
        vfg.set_def_node(ValueId(2), NodeId(1)).unwrap();
        vfg.set_def_node(ValueId(3), NodeId(2)).unwrap();

        let mut main = FunctionModel::new("main");
        main.add_call(
            CallSite::new(Some("sink".into()), vec![ValueId(3)])
                .with_location(SourceLocation::new("demo.c", 9, 1)),
        );
        main.add_call(CallSite::new(None, vec![ValueId(2)]));
        let mut module = Module::new("demo");
        module.add_function(main);

        let mut engine = PrecomputedPointsTo::new(PointsToResult::new());
        let mut builder = PrecomputedVfg::new(vfg);
        AnalysisContext::build(module, &mut engine, &mut builder).unwrap()
    }

    #[test]
    fn def_sites_cover_the_whole_upstream_chain() {
        let ctx = context();
        let sites = collect_def_sites(&ctx, ValueId(3));
        let nodes: Vec<NodeId> = sites.iter().map(|s| s.node).collect();
        assert_eq!(nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(sites[0].kind, NodeKind::Alloc);
        assert_eq!(sites[0].describe(), "node0 [alloc] val1 @ demo.c:3:5");
    }

    #[test]
    fn value_without_definition_yields_no_sites() {
        let ctx = context();
        assert!(collect_def_sites(&ctx, ValueId(99)).is_empty());
    }

    #[test]
    fn uses_walk_forward() {
        let ctx = context();
        let uses = collect_uses(&ctx, ValueId(1));
        let nodes: Vec<NodeId> = uses.iter().map(|s| s.node).collect();
        assert_eq!(nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(collect_uses(&ctx, ValueId(3)).len(), 1);
    }

    #[test]
    fn report_skips_unresolved_callees() {
        let ctx = context();
        let report = report_call_arguments(&ctx);

        assert_eq!(report.module, "demo");
        assert_eq!(report.calls.len(), 1);

        let call = &report.calls[0];
        assert_eq!(call.function, "main");
        assert_eq!(call.callee, "sink");
        assert_eq!(call.arguments.len(), 1);
        assert_eq!(call.arguments[0].value, ValueId(3));
        assert_eq!(call.arguments[0].def_sites.len(), 3);
    }
}

/*! Unified interface for value-flow queries.
 *
 * Single import for everything you need: loading analysis bundles, building
 * a context, walking the flow graph, and formatting reports.
 */

pub use vflow_core as core;
pub use vflow_report as report;

pub use vflow_core::{
    collect_def_sites, collect_uses, load_bundle, reachable_ancestors, reachable_successors,
    report_call_arguments, save_bundle, AliasResult, AnalysisBundle, AnalysisContext,
    AnalysisPass, CallArgumentReport, CallSite, DefSite, DefSitePass, EdgeKind, FlowEdge,
    FlowGraph, FlowNode, FunctionModel, Module, NodeId, NodeKind, Pipeline, PipelinePlugin,
    PointerEngine, PointsToResult, PointsToSet, SourceLocation, ValueFlowGraph, ValueId,
    VfgBuilder, VflowError,
};

pub use vflow_report::{EmitContext, Emitter, JsonReportEmitter, TextReportEmitter};

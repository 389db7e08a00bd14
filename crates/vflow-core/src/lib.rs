/*! Value-flow query driver over externally built analysis artifacts.
 *
 * A whole-program value-flow analysis produces three artifacts: an IR module
 * model, a points-to result, and a sparse value-flow graph. This crate owns
 * none of that machinery; it models the artifacts, walks the graph, and
 * answers the questions a reporting layer cares about, chiefly "where could
 * this call argument have been defined?".
 */

pub mod analysis;
pub mod graph;
pub mod module;
pub mod persist;
pub mod pipeline;
pub mod query;
pub mod values;

pub use analysis::context::AnalysisContext;
pub use analysis::pointsto::{
    AliasResult, PointerEngine, PointsToResult, PointsToSet, PrecomputedPointsTo,
};
pub use analysis::vfg::{PrecomputedVfg, ValueFlowGraph, VfgBuilder};
pub use analysis::walk::{reachable_ancestors, reachable_successors};
pub use graph::{EdgeKind, FlowEdge, FlowGraph, FlowNode, NodeId, NodeKind};
pub use module::{CallSite, FunctionModel, Module};
pub use persist::{load_bundle, save_bundle, AnalysisBundle};
pub use pipeline::{AnalysisPass, DefSitePass, PassStatistics, Pipeline, PipelinePlugin};
pub use query::{
    collect_def_sites, collect_uses, report_call_arguments, ArgumentReport, CallArgumentReport,
    CallReport, DefSite,
};
pub use values::{SourceLocation, ValueId};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VflowError {
    #[error("unknown node: {0}")]
    UnknownNode(graph::NodeId),
    #[error("unknown value: {0}")]
    UnknownValue(values::ValueId),
    #[error("malformed flow graph: {0}")]
    MalformedGraph(String),
    #[error("analysis engine error: {0}")]
    EngineError(String),
    #[error("pass error: {0}")]
    PassError(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VflowError>;

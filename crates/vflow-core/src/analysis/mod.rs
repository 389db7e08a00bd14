/*! Query the artifacts of a whole-program value-flow analysis.
 *
 * The pointer-analysis fixpoint and the sparse value-flow graph construction
 * run in an external engine; these modules define the interface that engine
 * is reached through, the context that owns its artifacts, and the
 * reachability walks that answer queries over the resulting graph.
 */

pub mod context;
pub mod pointsto;
pub mod vfg;
pub mod walk;

pub use context::AnalysisContext;
pub use pointsto::{AliasResult, PointerEngine, PointsToResult, PointsToSet, PrecomputedPointsTo};
pub use vfg::{PrecomputedVfg, ValueFlowGraph, VfgBuilder};
pub use walk::{reachable_ancestors, reachable_successors};

use crate::analysis::context::AnalysisContext;
use crate::query::{report_call_arguments, CallArgumentReport};
use anyhow::Result;
use std::any::Any;
use std::time::{Duration, Instant};

/// One read-only analysis over a built [`AnalysisContext`]. Passes keep
/// their results internally; callers retrieve them through
/// [`Pipeline::get_pass`] after the run.
pub trait AnalysisPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        "No description provided"
    }

    fn run(&mut self, ctx: &AnalysisContext) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Entry point a host hands its pipeline to: given a registration
/// capability, add your passes.
pub trait PipelinePlugin {
    fn register(&self, pipeline: &mut Pipeline);
}

#[derive(Debug, Clone)]
pub struct PassStatistics {
    pub name: String,
    pub duration: Duration,
}

pub struct Pipeline {
    passes: Vec<Box<dyn AnalysisPass>>,
    statistics: Vec<PassStatistics>,
    collect_stats: bool,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            statistics: Vec::new(),
            collect_stats: false,
        }
    }

    pub fn enable_statistics(&mut self) {
        self.collect_stats = true;
    }

    pub fn register_pass<P: AnalysisPass + 'static>(&mut self, pass: P) {
        self.passes.push(Box::new(pass));
    }

    pub fn register_plugin(&mut self, plugin: &dyn PipelinePlugin) {
        plugin.register(self);
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn run_all(&mut self, ctx: &AnalysisContext) -> Result<()> {
        let collect_stats = self.collect_stats;
        for pass in self.passes.iter_mut() {
            let start = collect_stats.then(Instant::now);

            pass.run(ctx)?;

            if let Some(start) = start {
                self.statistics.push(PassStatistics {
                    name: pass.name().to_string(),
                    duration: start.elapsed(),
                });
            }
        }
        Ok(())
    }

    pub fn statistics(&self) -> &[PassStatistics] {
        &self.statistics
    }

    pub fn get_pass<P: AnalysisPass + 'static>(&self) -> Option<&P> {
        self.passes
            .iter()
            .find_map(|p| p.as_any().downcast_ref::<P>())
    }

    pub fn get_pass_mut<P: AnalysisPass + 'static>(&mut self) -> Option<&mut P> {
        self.passes
            .iter_mut()
            .find_map(|p| p.as_any_mut().downcast_mut::<P>())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// The driver's built-in pass: upstream definition sites for every call
/// argument in the module.
pub struct DefSitePass {
    report: Option<CallArgumentReport>,
}

impl DefSitePass {
    pub fn new() -> Self {
        Self { report: None }
    }

    /// Report of the last run, if the pass has run.
    pub fn report(&self) -> Option<&CallArgumentReport> {
        self.report.as_ref()
    }

    pub fn take_report(&mut self) -> Option<CallArgumentReport> {
        self.report.take()
    }
}

impl Default for DefSitePass {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisPass for DefSitePass {
    fn name(&self) -> &'static str {
        "def-sites"
    }

    fn description(&self) -> &'static str {
        "Collects transitive upstream definition sites for every call argument"
    }

    fn run(&mut self, ctx: &AnalysisContext) -> Result<()> {
        self.report = Some(report_call_arguments(ctx));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pointsto::{PointsToResult, PrecomputedPointsTo};
    use crate::analysis::vfg::{PrecomputedVfg, ValueFlowGraph};
    use crate::graph::FlowGraph;
    use crate::module::Module;

    fn empty_context() -> AnalysisContext {
        let mut engine = PrecomputedPointsTo::new(PointsToResult::new());
        let mut builder = PrecomputedVfg::new(ValueFlowGraph::new(FlowGraph::new()));
        AnalysisContext::build(Module::new("unit"), &mut engine, &mut builder).unwrap()
    }

    #[test]
    fn plugin_registration_and_typed_retrieval() {
        struct DefSitePlugin;
        impl PipelinePlugin for DefSitePlugin {
            fn register(&self, pipeline: &mut Pipeline) {
                pipeline.register_pass(DefSitePass::new());
            }
        }

        let mut pipeline = Pipeline::new();
        pipeline.register_plugin(&DefSitePlugin);
        assert_eq!(pipeline.pass_count(), 1);

        let ctx = empty_context();
        pipeline.run_all(&ctx).unwrap();

        let pass = pipeline.get_pass::<DefSitePass>().unwrap();
        let report = pass.report().unwrap();
        assert_eq!(report.module, "unit");
        assert!(report.calls.is_empty());
    }

    #[test]
    fn statistics_record_one_entry_per_pass() {
        let mut pipeline = Pipeline::new();
        pipeline.enable_statistics();
        pipeline.register_pass(DefSitePass::new());

        let ctx = empty_context();
        pipeline.run_all(&ctx).unwrap();

        assert_eq!(pipeline.statistics().len(), 1);
        assert_eq!(pipeline.statistics()[0].name, "def-sites");
    }
}

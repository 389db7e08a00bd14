use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vflow")]
#[command(about = "vflow - Query driver for whole-program value-flow analysis artifacts")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the def-site pipeline and report on every call argument
    Analyze {
        /// Analysis bundle exported by the external engine
        bundle: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Print per-pass timing after the run
        #[arg(long)]
        stats: bool,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Transitive ancestors of a flow-graph node (walks against edges)
    Ancestors {
        bundle: PathBuf,

        #[arg(long)]
        node: u32,

        /// Walk forward along edges instead
        #[arg(long)]
        forward: bool,

        /// Query the inter-procedural CFG instead of the value-flow graph
        #[arg(long)]
        icfg: bool,
    },

    /// Transitive uses of a value's definition
    Uses {
        bundle: PathBuf,

        #[arg(long)]
        value: u32,
    },

    /// Alias query between two values
    Alias {
        bundle: PathBuf,

        #[arg(long)]
        lhs: u32,

        #[arg(long)]
        rhs: u32,
    },

    /// Print the points-to set of a value
    PointsTo {
        bundle: PathBuf,

        #[arg(long)]
        value: u32,
    },

    /// Check the bundle's graphs for structural problems
    Validate {
        bundle: PathBuf,

        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            bundle,
            output,
            json,
            stats,
            verbose,
        } => cmd_analyze(bundle, output, json, stats, verbose),
        Commands::Ancestors {
            bundle,
            node,
            forward,
            icfg,
        } => cmd_ancestors(bundle, node, forward, icfg),
        Commands::Uses { bundle, value } => cmd_uses(bundle, value),
        Commands::Alias { bundle, lhs, rhs } => cmd_alias(bundle, lhs, rhs),
        Commands::PointsTo { bundle, value } => cmd_points_to(bundle, value),
        Commands::Validate { bundle, verbose } => cmd_validate(bundle, verbose),
    }
}

fn cmd_analyze(
    bundle: PathBuf,
    output: Option<PathBuf>,
    json: bool,
    stats: bool,
    verbose: bool,
) -> Result<()> {
    use colored::*;
    use std::fs;
    use std::time::Instant;
    use vflow_core::{load_bundle, DefSitePass, Pipeline};
    use vflow_report::{EmitContext, Emitter, JsonReportEmitter, TextReportEmitter};

    if verbose {
        println!("{}", " vflow analyze".bright_blue().bold());
        println!("{}", "=".repeat(50).bright_blue());
        println!(" Bundle: {}", bundle.display());
        println!();
    }

    let start = Instant::now();

    if verbose {
        println!(" Loading analysis bundle...");
    }
    let ctx = load_bundle(&bundle)?.into_context()?;

    if verbose {
        println!(
            " Module {}: {} function(s), {} node(s)",
            ctx.module().name,
            ctx.module().functions.len(),
            ctx.vfg().graph().node_count()
        );
        println!(" Running def-site pipeline...");
    }

    let mut pipeline = Pipeline::new();
    if stats {
        pipeline.enable_statistics();
    }
    pipeline.register_pass(DefSitePass::new());
    pipeline.run_all(&ctx)?;

    let report = pipeline
        .get_pass_mut::<DefSitePass>()
        .and_then(|pass| pass.take_report())
        .ok_or_else(|| anyhow::anyhow!("def-site pass produced no report"))?;

    let rendered = if json {
        let mut context = EmitContext::plain();
        JsonReportEmitter::pretty().emit_to_string(&report, &mut context)?
    } else {
        let mut context = if output.is_some() {
            EmitContext::plain()
        } else {
            EmitContext::new()
        };
        TextReportEmitter::new().emit_to_string(&report, &mut context)?
    };

    if let Some(output_path) = output {
        fs::write(&output_path, &rendered)?;
        if verbose {
            println!(
                "\n {} Report written to: {}",
                "SUCCESS:".bright_green().bold(),
                output_path.display()
            );
            println!("   Time: {:.3}s", start.elapsed().as_secs_f64());
        }
    } else {
        print!("{}", rendered);
    }

    if stats {
        println!();
        for entry in pipeline.statistics() {
            println!(
                " pass {}: {:.3}ms",
                entry.name,
                entry.duration.as_secs_f64() * 1000.0
            );
        }
    }

    Ok(())
}

fn cmd_ancestors(bundle: PathBuf, node: u32, forward: bool, icfg: bool) -> Result<()> {
    use vflow_core::{load_bundle, reachable_ancestors, reachable_successors, NodeId};

    let ctx = load_bundle(&bundle)?.into_context()?;
    let graph = if icfg {
        ctx.icfg()
            .ok_or_else(|| anyhow::anyhow!("bundle carries no inter-procedural CFG"))?
    } else {
        ctx.vfg().graph()
    };

    // A start node the graph does not own behaves like an absent one.
    let start = Some(NodeId(node)).filter(|&id| graph.contains(id));
    let visited = if forward {
        reachable_successors(graph, start)
    } else {
        reachable_ancestors(graph, start)
    };

    let mut ids: Vec<NodeId> = visited.into_iter().collect();
    ids.sort_unstable();

    println!(
        "{} node(s) reachable {} node{}",
        ids.len(),
        if forward { "from" } else { "into" },
        node
    );
    for id in ids {
        match graph.node(id) {
            Some(n) => println!("  {}", n.describe()),
            None => println!("  {}", id),
        }
    }

    Ok(())
}

fn cmd_uses(bundle: PathBuf, value: u32) -> Result<()> {
    use vflow_core::{load_bundle, query, ValueId};

    let ctx = load_bundle(&bundle)?.into_context()?;
    let uses = query::collect_uses(&ctx, ValueId(value));

    println!("{} use site(s) of {}", uses.len(), ValueId(value));
    for site in uses {
        println!("  {}", site.describe());
    }

    Ok(())
}

fn cmd_alias(bundle: PathBuf, lhs: u32, rhs: u32) -> Result<()> {
    use vflow_core::{load_bundle, ValueId};
    use vflow_report::format_alias;

    let ctx = load_bundle(&bundle)?.into_context()?;
    let result = ctx.alias(ValueId(lhs), ValueId(rhs));
    println!("{}", format_alias(ValueId(lhs), ValueId(rhs), result));

    Ok(())
}

fn cmd_points_to(bundle: PathBuf, value: u32) -> Result<()> {
    use vflow_core::{load_bundle, ValueId};
    use vflow_report::format_points_to;

    let ctx = load_bundle(&bundle)?.into_context()?;
    match ctx.points_to(ValueId(value)) {
        Some(set) => println!("{}", format_points_to(ValueId(value), set)),
        None => println!("{} -> no points-to record", ValueId(value)),
    }

    Ok(())
}

fn cmd_validate(bundle: PathBuf, verbose: bool) -> Result<()> {
    use colored::*;
    use vflow_core::load_bundle;

    if verbose {
        println!("{}", " Validating analysis bundle".bright_cyan().bold());
        println!(" Bundle: {}", bundle.display());
        println!();
    }

    let loaded = load_bundle(&bundle)?;

    let mut problems = loaded.vfg.graph().validate();
    if let Some(icfg) = &loaded.icfg {
        problems.extend(
            icfg.validate()
                .into_iter()
                .map(|p| format!("icfg: {}", p)),
        );
    }

    if problems.is_empty() {
        println!("{}", " VALID".bright_green().bold());
        if verbose {
            println!(
                "   {} node(s), {} edge(s), {} recorded definition(s)",
                loaded.vfg.graph().node_count(),
                loaded.vfg.graph().edge_count(),
                loaded.vfg.def_count()
            );
        }
        Ok(())
    } else {
        println!("{}", " INVALID".bright_red().bold());
        for problem in &problems {
            println!("   {}", problem);
        }
        Err(anyhow::anyhow!("Validation failed"))
    }
}

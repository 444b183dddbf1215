use qtsim::{bench_rebuild, bench_strategies};
use qtsim::{Scenario, ScenarioConfig, UpdateStrategy};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Headless quadtree circle-collision simulation")]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, long, default_value = "default.yaml")]
    file_name: String,

    /// Override the scenario's frame count
    #[arg(long)]
    frames: Option<u64>,

    /// Override the scenario's update strategy (flattened, branches, boundary, brute_force)
    #[arg(long)]
    strategy: Option<UpdateStrategy>,

    /// Run the timing harness instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let scenario_cfg = ScenarioConfig::from_path(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    if args.bench {
        bench_rebuild();
        bench_strategies();
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(strategy) = args.strategy {
        scenario_cfg.engine.strategy = strategy;
    }
    let frames = args.frames.unwrap_or(scenario_cfg.parameters.frames);

    let mut scenario = Scenario::build_scenario(scenario_cfg)?;
    let summary = scenario.run(frames);
    let tree = scenario.tree_stats();

    info!(
        frames = summary.frames,
        t = scenario.system.t,
        bodies = scenario.system.bodies.len(),
        contacts = summary.contacts,
        broad_queries = summary.broad_queries,
        branches = tree.branches,
        leaves = tree.leaves,
        max_depth = tree.max_depth,
        kinetic_energy = scenario.system.kinetic_energy(),
        "run complete"
    );

    Ok(())
}

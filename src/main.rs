use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tribesim::{engine::EngineBuilder, scenario::ScenarioLoader};

#[derive(Debug, Parser)]
#[command(author, version, about = "Tribal village simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/valley.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if cli.seed.is_some() {
        scenario.seed = cli.seed;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&scenario.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut world = scenario.build_world()?;
    let ticks = scenario.ticks(cli.ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));
    let mut settings = scenario.engine_settings(snapshot_dir);
    if let Some(interval) = cli.snapshot_interval {
        settings.snapshot_interval_ticks = interval;
    }

    tracing::info!(
        scenario = %scenario.name,
        ticks,
        seed = ?scenario.seed,
        tribes = world.tribe_ids().len(),
        population = world.total_population(),
        "starting run"
    );

    let mut engine = EngineBuilder::new(settings).with_default_systems().build();
    engine.run_with_hook(&mut world, ticks, |outcome| {
        for event in &outcome.events {
            tracing::info!(tick = event.tick, kind = ?event.kind, "{}", event.message);
        }
    })?;

    println!(
        "Scenario '{}' completed for {} ticks. Final population: {} across {} tribes",
        scenario.name,
        ticks,
        world.total_population(),
        world.tribe_ids().len()
    );
    for tribe in world.tribes() {
        println!(
            "  {:<12} pop {:>3}  food {:>8.1}  wood {:>8.1}  stone {:>8.1}  tech {:>7.1}",
            tribe.name,
            world.population(tribe.id),
            tribe.stockpile.food,
            tribe.stockpile.wood,
            tribe.stockpile.stone,
            tribe.stockpile.tech
        );
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::{
    components::{Tribe, Villager, WorldEvent},
    config::SimConfig,
    error::{SimError, SimResult},
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    spatial::{MapBounds, WorldMap},
    systems::{
        BookkeepingSystem, HazardSystem, ImmigrationSystem, SplittingSystem, VillagerSystem,
    },
    world::{GameEvent, GameState, World},
};

pub struct EngineSettings {
    pub scenario_name: String,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
    pub map: WorldMap,
    pub config: SimConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            scenario_name: "sandbox".to_string(),
            seed: None,
            snapshot_interval_ticks: 0,
            snapshot_dir: PathBuf::from("snapshots"),
            map: WorldMap::default(),
            config: SimConfig::default(),
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    /// The standard tick: villagers, immigration, splitting, hazards, bookkeeping.
    pub fn with_default_systems(self) -> Self {
        self.with_system(VillagerSystem::new())
            .with_system(ImmigrationSystem::new())
            .with_system(SplittingSystem::new())
            .with_system(HazardSystem::new())
            .with_system(BookkeepingSystem::new())
    }

    pub fn build(self) -> Engine {
        let rng = match self.settings.seed {
            Some(seed) => RngManager::new(seed),
            None => RngManager::from_entropy(),
        };
        Engine {
            rng,
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

/// Post-tick copy of the world plus the narration produced during the tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    pub state: GameState,
    pub tribes: Vec<Tribe>,
    pub villagers: Vec<Villager>,
    pub world_events: Vec<WorldEvent>,
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    pub fn tick(&self) -> u64 {
        self.state.tick
    }

    fn from_world(world: &World, events: Vec<GameEvent>) -> Self {
        Self {
            state: world.state.clone(),
            tribes: world.tribes.values().cloned().collect(),
            villagers: world.villagers.values().cloned().collect(),
            world_events: world.world_events.clone(),
            events,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Advance the world by one tick.
    ///
    /// Systems run on a working copy; `world` is replaced only when every
    /// system succeeded and the result passes the invariant check.
    pub fn step(&mut self, world: &mut World) -> SimResult<TickOutcome> {
        let mut working = world.clone();
        working.advance_time();
        working.remove_dead();
        let bounds = self.settings.map.bounds;
        for villager in working.villagers.values_mut() {
            villager.position = bounds.clamp(villager.position);
        }
        for tribe in working.tribes.values_mut() {
            tribe.center = bounds.clamp(tribe.center);
        }
        let tick = working.tick();

        let ctx = SystemContext {
            tick,
            config: &self.settings.config,
            map: &self.settings.map,
        };
        for system in &mut self.systems {
            let mut rng_stream = self.rng.stream(system.name());
            system
                .run(&ctx, &mut working, &mut rng_stream)
                .map_err(|source| SimError::System {
                    system: system.name().to_string(),
                    source,
                })?;
        }

        if let Err(err) = check_invariants(&working, &bounds) {
            tracing::warn!(tick, %err, "tick rejected");
            return Err(err);
        }

        let events = working.drain_events();
        tracing::debug!(
            tick,
            population = working.total_population(),
            tribes = working.tribes.len(),
            events = events.len(),
            "tick complete"
        );
        *world = working;
        Ok(TickOutcome::from_world(world, events))
    }

    /// Stateless entry point: assemble a world from the given records and
    /// advance it once.
    pub fn advance_tick(
        &mut self,
        state: GameState,
        tribes: Vec<Tribe>,
        villagers: Vec<Villager>,
        world_events: Vec<WorldEvent>,
    ) -> SimResult<TickOutcome> {
        let mut world = World::from_parts(state, tribes, villagers, world_events)?;
        self.step(&mut world)
    }

    pub fn run(&mut self, world: &mut World, ticks: u64) -> SimResult<()> {
        self.run_with_hook(world, ticks, |_| {})
    }

    /// Run `ticks` ticks, writing due snapshots and handing each outcome to `hook`.
    pub fn run_with_hook<F>(&mut self, world: &mut World, ticks: u64, mut hook: F) -> SimResult<()>
    where
        F: FnMut(&TickOutcome),
    {
        for _ in 0..ticks {
            let outcome = self.step(world)?;
            if let Some(path) = self
                .snapshot_writer
                .maybe_write(world, &self.settings.scenario_name)?
            {
                tracing::debug!(path = %path.display(), "snapshot written");
            }
            hook(&outcome);
        }
        Ok(())
    }
}

fn check_invariants(world: &World, bounds: &MapBounds) -> SimResult<()> {
    let tick = world.tick();
    let violation = |detail: String| SimError::InvariantViolated { tick, detail };

    for villager in world.villagers.values() {
        if villager.is_dead {
            return Err(violation(format!("dead villager {} survived the tick", villager.id.raw())));
        }
        if !villager.vitals.in_range() {
            return Err(violation(format!(
                "villager {} has vitals out of range: {:?}",
                villager.id.raw(),
                villager.vitals
            )));
        }
        if !bounds.contains(villager.position) {
            return Err(violation(format!(
                "villager {} left the map at {:?}",
                villager.id.raw(),
                villager.position
            )));
        }
        if !world.tribes.contains_key(&villager.tribe_id) {
            return Err(violation(format!(
                "villager {} belongs to missing tribe {}",
                villager.id.raw(),
                villager.tribe_id.raw()
            )));
        }
    }
    for tribe in world.tribes.values() {
        if !tribe.stockpile.is_valid() {
            return Err(violation(format!(
                "tribe {} has an invalid stockpile: {:?}",
                tribe.id.raw(),
                tribe.stockpile
            )));
        }
    }
    if let Some(event) = world.world_events.iter().find(|e| e.duration == 0) {
        return Err(violation(format!("world event {} outlived its duration", event.id.raw())));
    }
    Ok(())
}

pub struct SystemContext<'a> {
    pub tick: u64,
    pub config: &'a SimConfig,
    pub map: &'a WorldMap,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

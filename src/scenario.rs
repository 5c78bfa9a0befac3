use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::{
    components::{Priorities, Stockpile, Tribe, TribeId, VillagerId, DEFAULT_TERRITORY_RADIUS},
    config::SimConfig,
    engine::EngineSettings,
    rng::RngManager,
    spatial::{MapBounds, Point, WorldMap},
    systems::spawn::{spawn_villager, TRIBE_COLORS},
    world::{GameState, World},
};

fn default_snapshot_interval_ticks() -> u64 {
    0
}

fn default_map_size() -> f64 {
    2000.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_radius() -> f64 {
    DEFAULT_TERRITORY_RADIUS
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub logging: ScenarioLogging,
    #[serde(default)]
    pub map: ScenarioMap,
    #[serde(default)]
    pub settings: ScenarioToggles,
    #[serde(default)]
    pub config: SimConfig,
    pub tribes: Vec<ScenarioTribe>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioLogging {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ScenarioLogging {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioMap {
    #[serde(default = "default_map_size")]
    pub width: f64,
    #[serde(default = "default_map_size")]
    pub height: f64,
    #[serde(default)]
    pub trees: Vec<Point>,
    #[serde(default)]
    pub rocks: Vec<Point>,
}

impl Default for ScenarioMap {
    fn default() -> Self {
        Self {
            width: default_map_size(),
            height: default_map_size(),
            trees: Vec::new(),
            rocks: Vec::new(),
        }
    }
}

impl ScenarioMap {
    pub fn to_world_map(&self) -> WorldMap {
        WorldMap {
            bounds: MapBounds::new(self.width, self.height),
            trees: self.trees.clone(),
            rocks: self.rocks.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioToggles {
    #[serde(default = "default_enabled")]
    pub immigration: bool,
    #[serde(default = "default_enabled")]
    pub tribe_splitting: bool,
    #[serde(default = "default_enabled")]
    pub random_events: bool,
}

impl Default for ScenarioToggles {
    fn default() -> Self {
        Self {
            immigration: true,
            tribe_splitting: true,
            random_events: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioTribe {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub center: Point,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub is_player: bool,
    #[serde(default)]
    pub priorities: Priorities,
    #[serde(default)]
    pub resources: Stockpile,
    /// Villagers rolled at the tribe center when the world is built.
    #[serde(default)]
    pub population: usize,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Lay out the tribes and roll their starting villagers.
    pub fn build_world(&self) -> Result<World> {
        let map = self.map.to_world_map();
        if !(map.bounds.width > 0.0 && map.bounds.height > 0.0) {
            bail!(
                "scenario '{}' has an empty map ({} x {})",
                self.name,
                self.map.width,
                self.map.height
            );
        }

        let mut world = World::new(GameState {
            immigration_enabled: self.settings.immigration,
            tribe_splitting_enabled: self.settings.tribe_splitting,
            random_events_enabled: self.settings.random_events,
            ..GameState::default()
        });
        let mut rng = match self.seed {
            Some(seed) => RngManager::new(seed),
            None => RngManager::from_entropy(),
        };
        let mut stream = rng.stream("scenario");

        for (index, entry) in self.tribes.iter().enumerate() {
            let id = TribeId(world.allocate_id());
            let color = entry
                .color
                .clone()
                .unwrap_or_else(|| TRIBE_COLORS[index % TRIBE_COLORS.len()].to_string());
            let tribe = Tribe {
                id,
                name: entry.name.clone(),
                color,
                stockpile: entry.resources,
                center: map.bounds.clamp(entry.center),
                radius: entry.radius,
                priorities: entry.priorities,
                founded_tick: 0,
                is_player: entry.is_player,
            };
            for _ in 0..entry.population {
                let villager_id = VillagerId(world.allocate_id());
                world.insert_villager(spawn_villager(villager_id, &tribe, &mut stream));
            }
            world.insert_tribe(tribe);
        }
        world.state_mut().selected_tribe = self
            .tribes
            .iter()
            .position(|t| t.is_player)
            .and_then(|index| world.tribe_ids().get(index).copied());
        Ok(world)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(1000)
    }

    pub fn engine_settings(&self, snapshot_dir: PathBuf) -> EngineSettings {
        EngineSettings {
            scenario_name: self.name.clone(),
            seed: self.seed,
            snapshot_interval_ticks: self.snapshot_interval_ticks,
            snapshot_dir,
            map: self.map.to_world_map(),
            config: self.config.clone(),
        }
    }
}

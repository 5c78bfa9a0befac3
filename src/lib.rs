pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod spatial;
pub mod systems;
pub mod world;

pub use config::SimConfig;
pub use engine::{Engine, EngineBuilder, EngineSettings, TickOutcome};
pub use error::{SimError, SimResult};
pub use scenario::{Scenario, ScenarioLoader};
pub use systems::spawn::spawn_villager;
pub use world::{GameEvent, GameEventKind, GameState, World};

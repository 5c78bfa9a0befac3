use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    components::{EventId, Tribe, TribeId, Villager, VillagerId, WorldEvent},
    error::{SimError, SimResult},
    systems::spawn::spawn_villager,
};

fn default_speed() -> f64 {
    1.0
}

fn default_enabled() -> bool {
    true
}

/// Global clock, feature toggles and the bookkeeping threaded between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub tick: u64,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_enabled")]
    pub immigration_enabled: bool,
    #[serde(default = "default_enabled")]
    pub tribe_splitting_enabled: bool,
    #[serde(default = "default_enabled")]
    pub random_events_enabled: bool,
    #[serde(default)]
    pub selected_tribe: Option<TribeId>,
    /// Host-owned narration history; the tick never touches it.
    #[serde(default)]
    pub event_log: Vec<GameEvent>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub last_immigration_tick: u64,
    #[serde(default)]
    pub last_split_tick: u64,
    #[serde(default)]
    pub next_entity_id: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            tick: 0,
            speed: default_speed(),
            immigration_enabled: true,
            tribe_splitting_enabled: true,
            random_events_enabled: true,
            selected_tribe: None,
            event_log: Vec::new(),
            achievements: Vec::new(),
            last_immigration_tick: 0,
            last_split_tick: 0,
            next_entity_id: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameEventKind {
    Birth,
    Death,
    Immigration,
    TribeSplit,
    Disaster,
    Blessing,
    Diplomacy,
}

/// Narration record handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub tick: u64,
    pub kind: GameEventKind,
    pub message: String,
    #[serde(default)]
    pub tribe_id: Option<TribeId>,
    #[serde(default)]
    pub villager_id: Option<VillagerId>,
}

impl GameEvent {
    pub fn new(tick: u64, kind: GameEventKind, message: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            message: message.into(),
            tribe_id: None,
            villager_id: None,
        }
    }

    pub fn with_tribe(mut self, id: TribeId) -> Self {
        self.tribe_id = Some(id);
        self
    }

    pub fn with_villager(mut self, id: VillagerId) -> Self {
        self.villager_id = Some(id);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TribeSummary {
    pub id: TribeId,
    pub name: String,
    pub population: usize,
    pub food: f64,
    pub wood: f64,
    pub stone: f64,
    pub tech: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub written_at: String,
    pub total_population: usize,
    pub summaries: Vec<TribeSummary>,
    pub state: GameState,
    pub tribes: Vec<Tribe>,
    pub villagers: Vec<Villager>,
    pub world_events: Vec<WorldEvent>,
}

/// Working set for one simulation.
///
/// Villagers and tribes are keyed by id; ids come from a single monotonic
/// allocator so id order is also creation order.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub(crate) state: GameState,
    pub(crate) tribes: BTreeMap<TribeId, Tribe>,
    pub(crate) villagers: BTreeMap<VillagerId, Villager>,
    pub(crate) world_events: Vec<WorldEvent>,
    pub(crate) pending: Vec<GameEvent>,
}

impl World {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Assemble a world from caller-supplied records.
    ///
    /// Numeric fields are re-clamped; duplicate ids and villagers pointing
    /// at unknown tribes are rejected.
    pub fn from_parts(
        state: GameState,
        tribes: Vec<Tribe>,
        villagers: Vec<Villager>,
        world_events: Vec<WorldEvent>,
    ) -> SimResult<Self> {
        let mut world = World::new(state);
        let mut max_id = 0u64;
        for mut tribe in tribes {
            tribe.sanitize();
            let id = tribe.id;
            max_id = max_id.max(id.raw());
            if world.tribes.insert(id, tribe).is_some() {
                return Err(SimError::DuplicateId {
                    kind: "tribe",
                    id: id.raw(),
                });
            }
        }
        for mut villager in villagers {
            villager.sanitize();
            if !world.tribes.contains_key(&villager.tribe_id) {
                return Err(SimError::UnknownTribe {
                    villager: villager.id,
                    tribe: villager.tribe_id,
                });
            }
            max_id = max_id.max(villager.id.raw());
            let id = villager.id;
            if world.villagers.insert(id, villager).is_some() {
                return Err(SimError::DuplicateId {
                    kind: "villager",
                    id: id.raw(),
                });
            }
        }
        let mut seen_events = Vec::with_capacity(world_events.len());
        for mut event in world_events {
            if seen_events.contains(&event.id) {
                return Err(SimError::DuplicateId {
                    kind: "world event",
                    id: event.id.raw(),
                });
            }
            seen_events.push(event.id);
            max_id = max_id.max(event.id.raw());
            event.severity = event.severity.clamp(1, 5);
            event.radius = event.radius.max(0.0);
            world.world_events.push(event);
        }
        let has_records =
            !world.tribes.is_empty() || !world.villagers.is_empty() || !seen_events.is_empty();
        if has_records {
            world.state.next_entity_id = world.state.next_entity_id.max(max_id + 1);
        }
        Ok(world)
    }

    /// Split the world back into the caller-facing lists (id order).
    pub fn into_parts(self) -> (GameState, Vec<Tribe>, Vec<Villager>, Vec<WorldEvent>) {
        (
            self.state,
            self.tribes.into_values().collect(),
            self.villagers.into_values().collect(),
            self.world_events,
        )
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn tick(&self) -> u64 {
        self.state.tick
    }

    pub fn advance_time(&mut self) {
        self.state.tick += 1;
    }

    pub fn allocate_id(&mut self) -> u64 {
        let id = self.state.next_entity_id;
        self.state.next_entity_id += 1;
        id
    }

    pub fn insert_tribe(&mut self, mut tribe: Tribe) -> TribeId {
        tribe.sanitize();
        let id = tribe.id;
        self.state.next_entity_id = self.state.next_entity_id.max(id.raw() + 1);
        self.tribes.insert(id, tribe);
        id
    }

    pub fn insert_villager(&mut self, mut villager: Villager) -> VillagerId {
        villager.sanitize();
        let id = villager.id;
        self.state.next_entity_id = self.state.next_entity_id.max(id.raw() + 1);
        self.villagers.insert(id, villager);
        id
    }

    pub fn insert_world_event(&mut self, event: WorldEvent) -> EventId {
        let id = event.id;
        self.state.next_entity_id = self.state.next_entity_id.max(id.raw() + 1);
        self.world_events.push(event);
        id
    }

    /// Divine spawn: a fresh villager at the tribe's center.
    ///
    /// Records a birth event that is handed out with the next tick's outcome.
    pub fn spawn_villager<R: Rng + ?Sized>(
        &mut self,
        tribe_id: TribeId,
        rng: &mut R,
    ) -> Option<VillagerId> {
        let tribe = self.tribes.get(&tribe_id)?.clone();
        let id = VillagerId(self.allocate_id());
        let villager = spawn_villager(id, &tribe, rng);
        let message = format!("{} was born into {}", villager.name, tribe.name);
        self.villagers.insert(id, villager);
        self.record(
            GameEvent::new(self.state.tick, GameEventKind::Birth, message)
                .with_tribe(tribe_id)
                .with_villager(id),
        );
        Some(id)
    }

    pub fn record(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn tribe(&self, id: TribeId) -> Option<&Tribe> {
        self.tribes.get(&id)
    }

    pub fn tribe_mut(&mut self, id: TribeId) -> Option<&mut Tribe> {
        self.tribes.get_mut(&id)
    }

    pub fn villager(&self, id: VillagerId) -> Option<&Villager> {
        self.villagers.get(&id)
    }

    pub fn villager_mut(&mut self, id: VillagerId) -> Option<&mut Villager> {
        self.villagers.get_mut(&id)
    }

    pub fn tribe_ids(&self) -> Vec<TribeId> {
        self.tribes.keys().copied().collect()
    }

    pub fn tribes(&self) -> impl Iterator<Item = &Tribe> {
        self.tribes.values()
    }

    pub fn villagers(&self) -> impl Iterator<Item = &Villager> {
        self.villagers.values()
    }

    pub fn world_events(&self) -> &[WorldEvent] {
        &self.world_events
    }

    /// Living members of a tribe in id order.
    pub fn living_members(&self, tribe_id: TribeId) -> Vec<VillagerId> {
        self.villagers
            .values()
            .filter(|v| v.tribe_id == tribe_id && v.is_alive())
            .map(|v| v.id)
            .collect()
    }

    pub fn population(&self, tribe_id: TribeId) -> usize {
        self.villagers
            .values()
            .filter(|v| v.tribe_id == tribe_id && v.is_alive())
            .count()
    }

    pub fn total_population(&self) -> usize {
        self.villagers.values().filter(|v| v.is_alive()).count()
    }

    /// Living population per tribe, id order; tribes with no members included.
    pub fn populations(&self) -> BTreeMap<TribeId, usize> {
        let mut counts: BTreeMap<TribeId, usize> =
            self.tribes.keys().map(|id| (*id, 0)).collect();
        for villager in self.villagers.values().filter(|v| v.is_alive()) {
            if let Some(count) = counts.get_mut(&villager.tribe_id) {
                *count += 1;
            }
        }
        counts
    }

    pub fn remove_dead(&mut self) -> usize {
        let before = self.villagers.len();
        self.villagers.retain(|_, v| v.is_alive());
        before - self.villagers.len()
    }

    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        let populations = self.populations();
        let summaries = self
            .tribes
            .values()
            .map(|tribe| TribeSummary {
                id: tribe.id,
                name: tribe.name.clone(),
                population: populations.get(&tribe.id).copied().unwrap_or(0),
                food: tribe.stockpile.food,
                wood: tribe.stockpile.wood,
                stone: tribe.stockpile.stone,
                tech: tribe.stockpile.tech,
            })
            .collect();
        WorldSnapshot {
            scenario: scenario.to_string(),
            tick: self.state.tick,
            written_at: chrono::Utc::now().to_rfc3339(),
            total_population: self.total_population(),
            summaries,
            state: self.state.clone(),
            tribes: self.tribes.values().cloned().collect(),
            villagers: self.villagers.values().cloned().collect(),
            world_events: self.world_events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::spawn::{test_tribe, test_villager};

    #[test]
    fn test_from_parts_rejects_unknown_tribe() {
        let tribes = vec![test_tribe(TribeId(1))];
        let villagers = vec![test_villager(VillagerId(2), TribeId(9))];
        let err = World::from_parts(GameState::default(), tribes, villagers, Vec::new())
            .unwrap_err();
        assert!(matches!(err, SimError::UnknownTribe { .. }));
    }

    #[test]
    fn test_from_parts_rejects_duplicates() {
        let tribes = vec![test_tribe(TribeId(1))];
        let villagers = vec![
            test_villager(VillagerId(2), TribeId(1)),
            test_villager(VillagerId(2), TribeId(1)),
        ];
        let err = World::from_parts(GameState::default(), tribes, villagers, Vec::new())
            .unwrap_err();
        assert!(matches!(err, SimError::DuplicateId { kind: "villager", .. }));
    }

    #[test]
    fn test_from_parts_advances_allocator() {
        let tribes = vec![test_tribe(TribeId(4))];
        let villagers = vec![test_villager(VillagerId(11), TribeId(4))];
        let mut world =
            World::from_parts(GameState::default(), tribes, villagers, Vec::new()).unwrap();
        assert_eq!(world.allocate_id(), 12);
        assert_eq!(world.allocate_id(), 13);
    }

    #[test]
    fn test_population_ignores_dead() {
        let mut world = World::new(GameState::default());
        world.insert_tribe(test_tribe(TribeId(1)));
        world.insert_villager(test_villager(VillagerId(2), TribeId(1)));
        let mut dead = test_villager(VillagerId(3), TribeId(1));
        dead.kill("old age");
        world.insert_villager(dead);
        assert_eq!(world.population(TribeId(1)), 1);
        assert_eq!(world.living_members(TribeId(1)), vec![VillagerId(2)]);
        assert_eq!(world.remove_dead(), 1);
    }

    #[test]
    fn test_spawn_villager_records_birth() {
        let mut world = World::new(GameState::default());
        world.insert_tribe(test_tribe(TribeId(1)));
        let mut rng = crate::rng::RngManager::new(3);
        let id = world
            .spawn_villager(TribeId(1), &mut rng.stream("spawn"))
            .expect("tribe exists");
        assert_eq!(world.villager(id).map(|v| v.tribe_id), Some(TribeId(1)));
        let events = world.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, GameEventKind::Birth);
        assert!(world.spawn_villager(TribeId(77), &mut rng.stream("spawn")).is_none());
    }
}

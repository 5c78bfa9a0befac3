use serde::{Deserialize, Serialize};

use crate::spatial::Point;

pub const VITAL_MAX: f64 = 100.0;
pub const SKILL_MAX: u8 = 100;
pub const PRIORITY_MAX: f64 = 10.0;
pub const DEFAULT_TERRITORY_RADIUS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VillagerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TribeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl VillagerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl TribeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl EventId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
}

/// Sustained activity of a villager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    #[default]
    Idle,
    Farming,
    Building,
    Gathering,
    Research,
    Eating,
    Sleeping,
    Fleeing,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Farming => "farming",
            Action::Building => "building",
            Action::Gathering => "gathering",
            Action::Research => "research",
            Action::Eating => "eating",
            Action::Sleeping => "sleeping",
            Action::Fleeing => "fleeing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trait {
    Cautious,
    Reckless,
    Lucky,
    Hardworking,
    Curious,
    Glutton,
}

impl Trait {
    pub const POOL: [Trait; 6] = [
        Trait::Cautious,
        Trait::Reckless,
        Trait::Lucky,
        Trait::Hardworking,
        Trait::Curious,
        Trait::Glutton,
    ];

    /// Traits that cannot be carried together.
    pub fn conflicts_with(self, other: Trait) -> bool {
        matches!(
            (self, other),
            (Trait::Cautious, Trait::Reckless) | (Trait::Reckless, Trait::Cautious)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f64,
    pub energy: f64,
    pub hunger: f64,
    pub happiness: f64,
}

impl Vitals {
    pub fn clamp(&mut self) {
        self.health = crate::spatial::clamp(self.health, 0.0, VITAL_MAX);
        self.energy = crate::spatial::clamp(self.energy, 0.0, VITAL_MAX);
        self.hunger = crate::spatial::clamp(self.hunger, 0.0, VITAL_MAX);
        self.happiness = crate::spatial::clamp(self.happiness, 0.0, VITAL_MAX);
    }

    pub fn in_range(&self) -> bool {
        [self.health, self.energy, self.hunger, self.happiness]
            .iter()
            .all(|v| (0.0..=VITAL_MAX).contains(v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Skills {
    pub farming: u8,
    pub building: u8,
    pub research: u8,
    pub gathering: u8,
    pub healing: u8,
    pub combat: u8,
}

impl Skills {
    pub fn clamp(&mut self) {
        for skill in [
            &mut self.farming,
            &mut self.building,
            &mut self.research,
            &mut self.gathering,
            &mut self.healing,
            &mut self.combat,
        ] {
            *skill = (*skill).min(SKILL_MAX);
        }
    }

    /// Skill that drives the yield of a production action.
    pub fn for_action(&self, action: Action) -> Option<u8> {
        match action {
            Action::Farming => Some(self.farming),
            Action::Building => Some(self.building),
            Action::Gathering => Some(self.gathering),
            Action::Research => Some(self.research),
            _ => None,
        }
    }

    pub fn bump(&mut self, action: Action) {
        let slot = match action {
            Action::Farming => &mut self.farming,
            Action::Building => &mut self.building,
            Action::Gathering => &mut self.gathering,
            Action::Research => &mut self.research,
            _ => return,
        };
        *slot = slot.saturating_add(1).min(SKILL_MAX);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Villager {
    pub id: VillagerId,
    pub tribe_id: TribeId,
    pub name: String,
    pub gender: Gender,
    pub age: u32,
    pub vitals: Vitals,
    pub skills: Skills,
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub target: Option<Point>,
    #[serde(default)]
    pub is_pregnant: bool,
    #[serde(default)]
    pub pregnancy_progress: f64,
    pub position: Point,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub is_dead: bool,
    #[serde(default)]
    pub cause_of_death: Option<String>,
}

impl Villager {
    pub fn has_trait(&self, t: Trait) -> bool {
        self.traits.contains(&t)
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Set the death flag once; later calls keep the first cause.
    pub fn kill(&mut self, cause: impl Into<String>) -> bool {
        if self.is_dead {
            return false;
        }
        self.is_dead = true;
        self.cause_of_death = Some(cause.into());
        true
    }

    pub fn go_idle(&mut self) {
        self.action = Action::Idle;
        self.target = None;
    }

    /// Re-clamp numeric fields and normalize the trait set.
    pub fn sanitize(&mut self) {
        self.vitals.clamp();
        self.skills.clamp();
        let mut kept: Vec<Trait> = Vec::with_capacity(self.traits.len());
        for t in self.traits.drain(..) {
            if !kept.contains(&t) && !kept.iter().any(|k| k.conflicts_with(t)) {
                kept.push(t);
            }
        }
        self.traits = kept;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stockpile {
    pub food: f64,
    pub wood: f64,
    pub stone: f64,
    pub tech: f64,
}

impl Stockpile {
    pub fn clamp_non_negative(&mut self) {
        for amount in [&mut self.food, &mut self.wood, &mut self.stone, &mut self.tech] {
            if amount.is_nan() || *amount < 0.0 {
                *amount = 0.0;
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.food, self.wood, self.stone, self.tech]
            .iter()
            .all(|v| *v >= 0.0)
    }

    /// Take up to `amount` food, returning what was actually taken.
    pub fn take_food(&mut self, amount: f64) -> f64 {
        let taken = amount.max(0.0).min(self.food.max(0.0));
        self.food = (self.food - taken).max(0.0);
        taken
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Priorities {
    pub farming: f64,
    pub building: f64,
    pub research: f64,
    pub gathering: f64,
    pub defense: f64,
}

impl Priorities {
    pub fn clamp(&mut self) {
        for weight in [
            &mut self.farming,
            &mut self.building,
            &mut self.research,
            &mut self.gathering,
            &mut self.defense,
        ] {
            *weight = crate::spatial::clamp(*weight, 0.0, PRIORITY_MAX);
        }
    }

    /// Work bands in selection order.
    pub fn work_bands(&self) -> [(Action, f64); 4] {
        [
            (Action::Farming, self.farming),
            (Action::Building, self.building),
            (Action::Gathering, self.gathering),
            (Action::Research, self.research),
        ]
    }
}

impl Default for Priorities {
    fn default() -> Self {
        Self {
            farming: 5.0,
            building: 5.0,
            research: 5.0,
            gathering: 5.0,
            defense: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tribe {
    pub id: TribeId,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub stockpile: Stockpile,
    pub center: Point,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub priorities: Priorities,
    #[serde(default)]
    pub founded_tick: u64,
    #[serde(default)]
    pub is_player: bool,
}

fn default_radius() -> f64 {
    DEFAULT_TERRITORY_RADIUS
}

impl Tribe {
    pub fn sanitize(&mut self) {
        self.stockpile.clamp_non_negative();
        self.priorities.clamp();
        if !self.radius.is_finite() || self.radius <= 0.0 {
            self.radius = DEFAULT_TERRITORY_RADIUS;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorldEventKind {
    WildAnimal,
    Disease,
    Fire,
    Storm,
    Blessing,
}

impl WorldEventKind {
    pub const ALL: [WorldEventKind; 5] = [
        WorldEventKind::WildAnimal,
        WorldEventKind::Disease,
        WorldEventKind::Fire,
        WorldEventKind::Storm,
        WorldEventKind::Blessing,
    ];

    /// Kinds villagers notice and flee from.
    pub fn is_hazard(self) -> bool {
        matches!(
            self,
            WorldEventKind::WildAnimal | WorldEventKind::Disease | WorldEventKind::Fire
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            WorldEventKind::WildAnimal => "wild animals",
            WorldEventKind::Disease => "disease",
            WorldEventKind::Fire => "wildfire",
            WorldEventKind::Storm => "storm",
            WorldEventKind::Blessing => "blessing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldEvent {
    pub id: EventId,
    pub kind: WorldEventKind,
    pub position: Point,
    pub radius: f64,
    pub severity: u8,
    pub duration: u32,
    #[serde(default)]
    pub affected_tribe: Option<TribeId>,
}

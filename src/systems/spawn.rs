//! Villager construction for immigration, divine spawn and scenario seeding.

use rand::Rng;

use crate::{
    components::{Action, Gender, Skills, Trait, Tribe, TribeId, Villager, VillagerId, Vitals},
    rng::RngExt,
    spatial::{MapBounds, Point},
};

pub const MALE_NAMES: &[&str] = &[
    "Aldric", "Bran", "Cedric", "Doran", "Edmund", "Finn", "Garrick", "Hal", "Ivor", "Joren",
    "Kael", "Leof", "Magnus", "Orrin", "Rowan", "Torin",
];

pub const FEMALE_NAMES: &[&str] = &[
    "Aela", "Brynn", "Cora", "Dalia", "Elin", "Freya", "Gwen", "Hilde", "Isla", "Kara", "Lyra",
    "Maren", "Nessa", "Runa", "Sigrid", "Tova",
];

pub const TRIBE_NAMES: &[&str] = &[
    "Ashfolk", "Riverborn", "Stonehand", "Windcallers", "Emberclan", "Mossveil", "Ironroot",
    "Duskwalkers", "Frostmere", "Sunreach",
];

pub const TRIBE_COLORS: &[&str] = &[
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#008080",
];

/// Inclusive stat ranges for a freshly rolled villager.
struct StatRanges {
    age: (u32, u32),
    health: (f64, f64),
    energy: (f64, f64),
    hunger: (f64, f64),
    happiness: (f64, f64),
    skill: (u8, u8),
    max_traits: usize,
}

const IMMIGRANT: StatRanges = StatRanges {
    age: (16, 45),
    health: (70.0, 100.0),
    energy: (60.0, 100.0),
    hunger: (10.0, 40.0),
    happiness: (50.0, 80.0),
    skill: (0, 30),
    max_traits: 2,
};

const DIVINE: StatRanges = StatRanges {
    age: (18, 30),
    health: (90.0, 100.0),
    energy: (80.0, 100.0),
    hunger: (0.0, 20.0),
    happiness: (70.0, 90.0),
    skill: (5, 20),
    max_traits: 1,
};

pub fn random_name<R: Rng + ?Sized>(gender: Gender, rng: &mut R) -> String {
    let pool = match gender {
        Gender::Male => MALE_NAMES,
        Gender::Female => FEMALE_NAMES,
    };
    pool[rng.gen_range(0..pool.len())].to_string()
}

/// Up to `max` distinct, non-conflicting traits from the pool.
pub fn random_traits<R: Rng + ?Sized>(max: usize, rng: &mut R) -> Vec<Trait> {
    let count = rng.gen_range(0..=max);
    let mut traits: Vec<Trait> = Vec::with_capacity(count);
    let mut guard = 0;
    while traits.len() < count && guard < 16 {
        guard += 1;
        let candidate = Trait::POOL[rng.gen_range(0..Trait::POOL.len())];
        if traits.contains(&candidate) || traits.iter().any(|t| t.conflicts_with(candidate)) {
            continue;
        }
        traits.push(candidate);
    }
    traits
}

fn roll_villager<R: Rng + ?Sized>(
    id: VillagerId,
    tribe_id: TribeId,
    position: Point,
    ranges: &StatRanges,
    rng: &mut R,
) -> Villager {
    let gender = if rng.gen_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    };
    let mut skill = || rng.gen_range(ranges.skill.0..=ranges.skill.1);
    let skills = Skills {
        farming: skill(),
        building: skill(),
        research: skill(),
        gathering: skill(),
        healing: skill(),
        combat: skill(),
    };
    let vitals = Vitals {
        health: rng.uniform(ranges.health.0, ranges.health.1),
        energy: rng.uniform(ranges.energy.0, ranges.energy.1),
        hunger: rng.uniform(ranges.hunger.0, ranges.hunger.1),
        happiness: rng.uniform(ranges.happiness.0, ranges.happiness.1),
    };
    let mut villager = Villager {
        id,
        tribe_id,
        name: random_name(gender, rng),
        gender,
        age: rng.gen_range(ranges.age.0..=ranges.age.1),
        vitals,
        skills,
        action: Action::Idle,
        target: None,
        is_pregnant: false,
        pregnancy_progress: 0.0,
        position,
        traits: random_traits(ranges.max_traits, rng),
        is_dead: false,
        cause_of_death: None,
    };
    villager.sanitize();
    villager
}

/// God-mode creation at the tribe's center with favourable stats.
pub fn spawn_villager<R: Rng + ?Sized>(id: VillagerId, tribe: &Tribe, rng: &mut R) -> Villager {
    roll_villager(id, tribe.id, tribe.center, &DIVINE, rng)
}

/// A newcomer walking in from a random map edge.
pub fn immigrant<R: Rng + ?Sized>(
    id: VillagerId,
    tribe_id: TribeId,
    bounds: &MapBounds,
    rng: &mut R,
) -> Villager {
    let position = edge_point(bounds, rng);
    roll_villager(id, tribe_id, position, &IMMIGRANT, rng)
}

fn edge_point<R: Rng + ?Sized>(bounds: &MapBounds, rng: &mut R) -> Point {
    let along_x = rng.uniform(0.0, bounds.width);
    let along_y = rng.uniform(0.0, bounds.height);
    match rng.gen_range(0..4) {
        0 => Point::new(along_x, 0.0),
        1 => Point::new(along_x, bounds.height),
        2 => Point::new(0.0, along_y),
        _ => Point::new(bounds.width, along_y),
    }
}

#[cfg(test)]
pub fn test_villager(id: VillagerId, tribe_id: TribeId) -> Villager {
    Villager {
        id,
        tribe_id,
        name: "Tester".into(),
        gender: Gender::Female,
        age: 25,
        vitals: Vitals {
            health: 80.0,
            energy: 80.0,
            hunger: 30.0,
            happiness: 60.0,
        },
        skills: Skills::default(),
        action: Action::Idle,
        target: None,
        is_pregnant: false,
        pregnancy_progress: 0.0,
        position: Point::new(500.0, 500.0),
        traits: Vec::new(),
        is_dead: false,
        cause_of_death: None,
    }
}

#[cfg(test)]
pub fn test_tribe(id: TribeId) -> Tribe {
    Tribe {
        id,
        name: format!("Tribe {}", id.raw()),
        color: "#e6194b".into(),
        stockpile: crate::components::Stockpile {
            food: 100.0,
            wood: 50.0,
            stone: 30.0,
            tech: 10.0,
        },
        center: Point::new(500.0, 500.0),
        radius: 100.0,
        priorities: crate::components::Priorities::default(),
        founded_tick: 0,
        is_player: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;

    #[test]
    fn test_immigrant_spawns_on_edge_within_ranges() {
        let mut rng = RngManager::new(11);
        let mut stream = rng.stream("spawn");
        let bounds = MapBounds::new(800.0, 600.0);
        for i in 0..100 {
            let v = immigrant(VillagerId(i), TribeId(1), &bounds, &mut stream);
            let p = v.position;
            let on_edge = p.x == 0.0 || p.y == 0.0 || p.x == 800.0 || p.y == 600.0;
            assert!(on_edge, "{p:?} is not on an edge");
            assert!((16..=45).contains(&v.age));
            assert!((70.0..=100.0).contains(&v.vitals.health));
            assert!((10.0..=40.0).contains(&v.vitals.hunger));
            assert!(v.skills.farming <= 30);
            assert!(v.traits.len() <= 2);
            assert!(!(v.has_trait(Trait::Cautious) && v.has_trait(Trait::Reckless)));
        }
    }

    #[test]
    fn test_divine_spawn_uses_tighter_ranges() {
        let mut rng = RngManager::new(12);
        let mut stream = rng.stream("spawn");
        let tribe = test_tribe(TribeId(3));
        for i in 0..100 {
            let v = spawn_villager(VillagerId(i), &tribe, &mut stream);
            assert_eq!(v.position, tribe.center);
            assert_eq!(v.tribe_id, TribeId(3));
            assert!((18..=30).contains(&v.age));
            assert!(v.vitals.health >= 90.0);
            assert!(v.vitals.hunger <= 20.0);
            assert!((5..=20).contains(&v.skills.research));
            assert!(v.traits.len() <= 1);
            assert_eq!(v.action, Action::Idle);
        }
    }
}

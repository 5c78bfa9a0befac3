//! Hunger, energy, happiness and health upkeep, plus starvation and accidents.

use rand::Rng;

use crate::{
    components::{Action, Trait, Villager, WorldEventKind},
    config::VitalsConfig,
    rng::RngExt,
    systems::danger::HazardSite,
};

pub const STARVATION: &str = "starvation";

const ACCIDENTS: &[&str] = &[
    "fell from a cliff",
    "was crushed by a falling tree",
    "drowned in a river",
    "was struck by lightning",
];

const GLUTTON_FACTOR: f64 = 1.25;
const UNHAPPY_HUNGER: f64 = 70.0;
const UNHAPPY_ENERGY: f64 = 20.0;

/// Per-tick decay and recovery, then the starvation check.
///
/// Returns the cause of death when the villager did not survive.
pub fn update<R: Rng + ?Sized>(
    villager: &mut Villager,
    sites: &[HazardSite],
    config: &VitalsConfig,
    rng: &mut R,
) -> Option<String> {
    let vitals = &mut villager.vitals;
    let hunger_rate = if villager.traits.contains(&Trait::Glutton) {
        config.hunger_rate * GLUTTON_FACTOR
    } else {
        config.hunger_rate
    };
    vitals.hunger += hunger_rate;

    if villager.action == Action::Sleeping {
        vitals.energy += config.sleep_energy_recovery;
        vitals.health += config.sleep_health_recovery;
    } else {
        vitals.energy -= config.energy_decay;
    }

    if vitals.hunger >= UNHAPPY_HUNGER || vitals.energy < UNHAPPY_ENERGY {
        vitals.happiness -= config.happiness_decay;
    } else {
        vitals.happiness += config.happiness_recovery;
    }

    let in_storm = sites.iter().any(|s| {
        s.kind == WorldEventKind::Storm && s.position.distance(villager.position) <= s.radius
    });
    if in_storm {
        vitals.energy -= config.storm_energy_drain;
    }
    vitals.clamp();

    let starving = vitals.hunger >= config.starvation_threshold;
    if starving {
        vitals.health -= config.starvation_damage;
        vitals.clamp();
    }

    if vitals.health <= 0.0 {
        return Some(if starving {
            STARVATION.to_string()
        } else {
            "succumbed to their wounds".to_string()
        });
    }
    if vitals.hunger >= 100.0 && rng.chance(config.starvation_death_chance) {
        return Some(STARVATION.to_string());
    }
    None
}

/// Rare severe injury. `Lucky` halves the damage.
pub fn accident<R: Rng + ?Sized>(
    villager: &mut Villager,
    config: &VitalsConfig,
    rng: &mut R,
) -> Option<String> {
    if !rng.chance(config.accident_chance) {
        return None;
    }
    let mut damage = rng.uniform(config.accident_min_damage, config.accident_max_damage);
    if villager.has_trait(Trait::Lucky) {
        damage *= 0.5;
    }
    let flavor = ACCIDENTS[rng.gen_range(0..ACCIDENTS.len())];
    villager.vitals.health -= damage;
    villager.vitals.clamp();
    if villager.vitals.health <= 0.0 {
        return Some(flavor.to_string());
    }
    tracing::debug!(
        villager = villager.id.raw(),
        damage,
        "survived an accident: {flavor}"
    );
    None
}

//! Hazard proximity: notice-and-flee or take harm.

use rand::Rng;

use crate::{
    components::{Action, Trait, Villager, WorldEvent, WorldEventKind},
    config::DangerConfig,
    rng::RngExt,
    spatial::{flee_point, MapBounds, Point},
};

/// Active hazard, flattened from a world event for the per-villager pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardSite {
    pub kind: WorldEventKind,
    pub position: Point,
    pub radius: f64,
    pub severity: u8,
}

/// Index of every spatial effect (hazards and storms) in event order.
pub fn hazard_index(events: &[WorldEvent]) -> Vec<HazardSite> {
    events
        .iter()
        .filter(|e| e.duration > 0 && e.kind != WorldEventKind::Blessing)
        .map(|e| HazardSite {
            kind: e.kind,
            position: e.position,
            radius: e.radius,
            severity: e.severity,
        })
        .collect()
}

/// First hazard within `radius` of `position`, in event order.
pub fn nearby_hazard(sites: &[HazardSite], position: Point, radius: f64) -> Option<HazardSite> {
    sites
        .iter()
        .find(|s| s.kind.is_hazard() && s.position.distance(position) <= radius)
        .copied()
}

pub fn notice_chance(villager: &Villager, config: &DangerConfig) -> f64 {
    if villager.has_trait(Trait::Cautious) {
        config.cautious_notice_chance
    } else if villager.has_trait(Trait::Reckless) {
        config.reckless_notice_chance
    } else {
        config.notice_chance
    }
}

/// React to the nearest hazard. Returns a cause of death when harm was fatal.
pub fn react<R: Rng + ?Sized>(
    villager: &mut Villager,
    sites: &[HazardSite],
    config: &DangerConfig,
    bounds: &MapBounds,
    rng: &mut R,
) -> Option<String> {
    let site = nearby_hazard(sites, villager.position, config.danger_radius)?;
    if villager.action == Action::Fleeing {
        return None;
    }

    if rng.chance(notice_chance(villager, config)) {
        villager.action = Action::Fleeing;
        villager.target = Some(flee_point(
            villager.position,
            site.position,
            config.flee_distance,
            bounds,
        ));
        tracing::debug!(villager = villager.id.raw(), hazard = site.kind.label(), "fleeing");
        return None;
    }

    let severity = f64::from(site.severity);
    let (chance, scale, cause) = match site.kind {
        WorldEventKind::WildAnimal => (
            config.wildlife_attack_chance,
            config.wildlife_damage_scale,
            "was mauled by wild animals",
        ),
        WorldEventKind::Disease => (
            config.disease_chance,
            config.disease_damage_scale,
            "succumbed to disease",
        ),
        WorldEventKind::Fire => (
            config.fire_burn_chance,
            config.fire_damage_scale,
            "burned to death",
        ),
        WorldEventKind::Storm | WorldEventKind::Blessing => return None,
    };
    if !rng.chance(chance) {
        return None;
    }
    let damage = rng.gen::<f64>() * severity * scale;
    villager.vitals.health -= damage;
    villager.vitals.clamp();
    if villager.vitals.health <= 0.0 {
        Some(cause.to_string())
    } else {
        None
    }
}

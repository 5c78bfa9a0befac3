//! Idle-state decision tree.

use rand::Rng;

use crate::{
    components::{Action, Priorities, Tribe, Villager},
    config::WorkConfig,
    rng::RngExt,
    spatial::{nearest, Point, WorldMap},
    systems::weighted_pick,
};

const FARM_OFFSET: (f64, f64) = (40.0, 20.0);
const RESEARCH_OFFSET: (f64, f64) = (-30.0, -30.0);

/// Apply the transition rules in priority order.
pub fn choose<R: Rng + ?Sized>(
    villager: &mut Villager,
    tribe: &Tribe,
    map: &WorldMap,
    config: &WorkConfig,
    rng: &mut R,
) {
    let vitals = villager.vitals;

    if vitals.hunger > config.emergency_hunger
        && tribe.stockpile.food > 0.0
        && villager.action != Action::Eating
    {
        villager.action = Action::Eating;
        villager.target = Some(map.bounds.clamp(tribe.center));
        return;
    }

    if vitals.energy < config.exhausted_energy && villager.action != Action::Sleeping {
        let jitter = config.sleep_jitter;
        let spot = tribe
            .center
            .offset(rng.uniform(-jitter, jitter), rng.uniform(-jitter, jitter));
        villager.action = Action::Sleeping;
        villager.target = Some(map.bounds.clamp(spot));
        return;
    }

    match villager.action {
        Action::Fleeing => {
            let arrived = villager
                .target
                .map_or(true, |t| villager.position.distance(t) <= config.arrival_radius);
            if arrived {
                villager.go_idle();
            }
        }
        Action::Sleeping if vitals.energy >= config.rested_energy => villager.go_idle(),
        Action::Idle => {
            if let Some(action) = pick_work(&tribe.priorities, rng) {
                villager.action = action;
                villager.target = Some(work_site(action, villager.position, tribe, map));
                tracing::trace!(villager = villager.id.raw(), task = action.label(), "assigned");
            }
        }
        _ => {}
    }
}

/// Draw a work action from the tribe's priority bands.
pub fn pick_work<R: Rng + ?Sized>(priorities: &Priorities, rng: &mut R) -> Option<Action> {
    weighted_pick(&priorities.work_bands(), rng)
}

/// Where a task is carried out. Missing resource nodes fall back to the tribe center.
pub fn work_site(action: Action, from: Point, tribe: &Tribe, map: &WorldMap) -> Point {
    let site = match action {
        Action::Farming => tribe.center.offset(FARM_OFFSET.0, FARM_OFFSET.1),
        Action::Research => tribe.center.offset(RESEARCH_OFFSET.0, RESEARCH_OFFSET.1),
        Action::Gathering => nearest(from, &map.trees).unwrap_or(tribe.center),
        Action::Building => nearest(from, &map.rocks).unwrap_or(tribe.center),
        _ => tribe.center,
    };
    map.bounds.clamp(site)
}

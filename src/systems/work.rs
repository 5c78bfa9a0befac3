//! Travel toward the current target and the work done on arrival.

use rand::Rng;

use crate::{
    components::{Action, Stockpile, Trait, Tribe, Villager},
    config::WorkConfig,
    rng::RngExt,
    spatial::{clamp_to_disk, step_toward, WorldMap},
};

const HARDWORKING_FACTOR: f64 = 1.25;
const CURIOUS_FACTOR: f64 = 2.0;
const FLEE_SPEED_FACTOR: f64 = 2.0;

/// Move toward the target, or work when already there. Idle villagers
/// without a target occasionally wander inside the territory, drifting
/// back toward it when they are outside.
pub fn advance<R: Rng + ?Sized>(
    villager: &mut Villager,
    tribe: &mut Tribe,
    map: &WorldMap,
    config: &WorkConfig,
    rng: &mut R,
) {
    let Some(target) = villager.target else {
        if villager.action == Action::Idle && rng.chance(config.wander_chance) {
            wander(villager, tribe, map, config, rng);
        }
        return;
    };

    if villager.position.distance(target) > config.arrival_radius {
        let speed = if villager.action == Action::Fleeing {
            config.move_speed * FLEE_SPEED_FACTOR
        } else {
            config.move_speed
        };
        villager.position = map
            .bounds
            .clamp(step_toward(villager.position, target, speed));
        return;
    }

    match villager.action {
        Action::Farming | Action::Gathering | Action::Building | Action::Research => {
            produce(villager, &mut tribe.stockpile, config, rng);
            if rng.chance(config.task_complete_chance) {
                villager.go_idle();
            }
        }
        Action::Eating => eat(villager, &mut tribe.stockpile, config),
        Action::Idle => villager.target = None,
        Action::Sleeping | Action::Fleeing => {}
    }
}

/// `base * (1 + skill * coefficient)`, scaled for hardworking villagers.
pub fn work_yield(villager: &Villager, config: &WorkConfig) -> f64 {
    let base = match villager.action {
        Action::Farming => config.farming_rate,
        Action::Gathering => config.gathering_rate,
        Action::Building => config.building_rate,
        Action::Research => config.research_rate,
        _ => return 0.0,
    };
    let Some(skill) = villager.skills.for_action(villager.action) else {
        return 0.0;
    };
    let mut amount = base * (1.0 + f64::from(skill) * config.skill_coefficient);
    if villager.has_trait(Trait::Hardworking) {
        amount *= HARDWORKING_FACTOR;
    }
    amount
}

fn produce<R: Rng + ?Sized>(
    villager: &mut Villager,
    stockpile: &mut Stockpile,
    config: &WorkConfig,
    rng: &mut R,
) {
    let amount = work_yield(villager, config);
    let slot = match villager.action {
        Action::Farming => &mut stockpile.food,
        Action::Gathering => &mut stockpile.wood,
        Action::Building => &mut stockpile.stone,
        Action::Research => &mut stockpile.tech,
        _ => return,
    };
    *slot += amount;

    let mut gain_chance = config.skill_gain_chance;
    if villager.has_trait(Trait::Curious) {
        gain_chance *= CURIOUS_FACTOR;
    }
    if rng.chance(gain_chance) {
        let action = villager.action;
        villager.skills.bump(action);
    }
}

fn eat(villager: &mut Villager, stockpile: &mut Stockpile, config: &WorkConfig) {
    let eaten = stockpile.take_food(config.eat_food_per_tick);
    if config.eat_food_per_tick > 0.0 {
        villager.vitals.hunger -= config.eat_hunger_relief * eaten / config.eat_food_per_tick;
        villager.vitals.clamp();
    }
    if villager.vitals.hunger <= config.sated_hunger || stockpile.food <= 0.0 {
        villager.go_idle();
    }
}

fn wander<R: Rng + ?Sized>(
    villager: &mut Villager,
    tribe: &Tribe,
    map: &WorldMap,
    config: &WorkConfig,
    rng: &mut R,
) {
    let step = config.wander_step;
    let next = if villager.position.distance(tribe.center) > tribe.radius {
        step_toward(villager.position, tribe.center, step)
    } else {
        let next = villager
            .position
            .offset(rng.uniform(-step, step), rng.uniform(-step, step));
        clamp_to_disk(next, tribe.center, tribe.radius)
    };
    villager.position = map.bounds.clamp(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{TribeId, VillagerId},
        rng::RngManager,
        spatial::{MapBounds, Point},
        systems::spawn::{test_tribe, test_villager},
    };

    fn map() -> WorldMap {
        WorldMap {
            bounds: MapBounds::new(1000.0, 1000.0),
            ..WorldMap::default()
        }
    }

    fn steady() -> WorkConfig {
        WorkConfig {
            task_complete_chance: 0.0,
            skill_gain_chance: 0.0,
            ..WorkConfig::default()
        }
    }

    #[test]
    fn test_moves_toward_target_at_speed() {
        let mut rng = RngManager::new(1);
        let mut tribe = test_tribe(TribeId(1));
        let mut v = test_villager(VillagerId(2), TribeId(1));
        v.action = Action::Farming;
        v.position = Point::new(100.0, 100.0);
        v.target = Some(Point::new(200.0, 100.0));
        let config = steady();
        advance(&mut v, &mut tribe, &map(), &config, &mut rng.stream("w"));
        assert!((v.position.x - (100.0 + config.move_speed)).abs() < 1e-9);
        assert_eq!(tribe.stockpile.food, 100.0);
    }

    #[test]
    fn test_fleeing_moves_twice_as_fast() {
        let mut rng = RngManager::new(1);
        let mut tribe = test_tribe(TribeId(1));
        let mut v = test_villager(VillagerId(2), TribeId(1));
        v.action = Action::Fleeing;
        v.position = Point::new(100.0, 100.0);
        v.target = Some(Point::new(100.0, 300.0));
        let config = steady();
        advance(&mut v, &mut tribe, &map(), &config, &mut rng.stream("w"));
        assert!((v.position.y - (100.0 + 2.0 * config.move_speed)).abs() < 1e-9);
    }

    #[test]
    fn test_farming_on_site_adds_food() {
        let mut rng = RngManager::new(1);
        let mut tribe = test_tribe(TribeId(1));
        let mut v = test_villager(VillagerId(2), TribeId(1));
        v.action = Action::Farming;
        v.skills.farming = 50;
        v.target = Some(v.position);
        let config = steady();
        advance(&mut v, &mut tribe, &map(), &config, &mut rng.stream("w"));
        let expected = 100.0 + config.farming_rate * 1.5;
        assert!((tribe.stockpile.food - expected).abs() < 1e-9);
        assert_eq!(v.action, Action::Farming);
    }

    fn stock_for(stockpile: &Stockpile, action: Action) -> f64 {
        match action {
            Action::Gathering => stockpile.wood,
            Action::Building => stockpile.stone,
            Action::Research => stockpile.tech,
            _ => stockpile.food,
        }
    }

    #[test]
    fn test_each_task_feeds_its_stockpile() {
        let config = steady();
        for action in [Action::Gathering, Action::Building, Action::Research] {
            let mut rng = RngManager::new(1);
            let mut tribe = test_tribe(TribeId(1));
            let before = stock_for(&tribe.stockpile, action);
            let mut v = test_villager(VillagerId(2), TribeId(1));
            v.action = action;
            v.target = Some(v.position);
            advance(&mut v, &mut tribe, &map(), &config, &mut rng.stream("w"));
            assert!(
                stock_for(&tribe.stockpile, action) > before,
                "{action:?} produced nothing"
            );
        }
    }

    #[test]
    fn test_hardworking_yields_more() {
        let config = WorkConfig::default();
        let mut v = test_villager(VillagerId(2), TribeId(1));
        v.action = Action::Research;
        let plain = work_yield(&v, &config);
        v.traits = vec![Trait::Hardworking];
        assert!((work_yield(&v, &config) - plain * 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_skill_gain_caps_at_hundred() {
        let mut rng = RngManager::new(1);
        let mut tribe = test_tribe(TribeId(1));
        let mut v = test_villager(VillagerId(2), TribeId(1));
        v.action = Action::Gathering;
        v.skills.gathering = 99;
        v.target = Some(v.position);
        let config = WorkConfig {
            skill_gain_chance: 1.0,
            task_complete_chance: 0.0,
            ..WorkConfig::default()
        };
        for _ in 0..3 {
            advance(&mut v, &mut tribe, &map(), &config, &mut rng.stream("w"));
        }
        assert_eq!(v.skills.gathering, 100);
    }

    #[test]
    fn test_eating_consumes_food_and_stops_when_sated() {
        let mut rng = RngManager::new(1);
        let mut tribe = test_tribe(TribeId(1));
        let mut v = test_villager(VillagerId(2), TribeId(1));
        v.action = Action::Eating;
        v.vitals.hunger = 23.0;
        v.target = Some(v.position);
        let config = steady();
        advance(&mut v, &mut tribe, &map(), &config, &mut rng.stream("w"));
        assert!((tribe.stockpile.food - 99.9).abs() < 1e-9);
        assert!((v.vitals.hunger - 21.0).abs() < 1e-9);
        assert_eq!(v.action, Action::Eating);

        advance(&mut v, &mut tribe, &map(), &config, &mut rng.stream("w"));
        assert_eq!(v.action, Action::Idle);
        assert_eq!(v.target, None);
    }

    #[test]
    fn test_eating_stops_when_food_runs_out() {
        let mut rng = RngManager::new(1);
        let mut tribe = test_tribe(TribeId(1));
        tribe.stockpile.food = 0.05;
        let mut v = test_villager(VillagerId(2), TribeId(1));
        v.action = Action::Eating;
        v.vitals.hunger = 80.0;
        v.target = Some(v.position);
        advance(&mut v, &mut tribe, &map(), &steady(), &mut rng.stream("w"));
        assert_eq!(tribe.stockpile.food, 0.0);
        assert!((v.vitals.hunger - 79.0).abs() < 1e-9);
        assert_eq!(v.action, Action::Idle);
    }

    #[test]
    fn test_wander_stays_in_territory() {
        let mut rng = RngManager::new(1);
        let mut stream = rng.stream("w");
        let mut tribe = test_tribe(TribeId(1));
        tribe.radius = 10.0;
        let mut v = test_villager(VillagerId(2), TribeId(1));
        v.position = tribe.center;
        let config = WorkConfig {
            wander_chance: 1.0,
            wander_step: 8.0,
            ..WorkConfig::default()
        };
        for _ in 0..200 {
            advance(&mut v, &mut tribe, &map(), &config, &mut stream);
            assert!(v.position.distance(tribe.center) <= 10.0 + 1e-9);
        }
        assert_eq!(v.target, None);
    }

    #[test]
    fn test_wander_outside_territory_drifts_home() {
        let mut rng = RngManager::new(1);
        let mut stream = rng.stream("w");
        let mut tribe = test_tribe(TribeId(1));
        tribe.radius = 10.0;
        let mut v = test_villager(VillagerId(2), TribeId(1));
        v.position = Point::new(1000.0, 500.0);
        let config = WorkConfig {
            wander_chance: 1.0,
            wander_step: 3.0,
            ..WorkConfig::default()
        };
        let start = v.position.distance(tribe.center);
        advance(&mut v, &mut tribe, &map(), &config, &mut stream);
        let moved = v.position.distance(Point::new(1000.0, 500.0));
        assert!(moved <= config.wander_step + 1e-9, "moved {moved}");
        assert!((start - v.position.distance(tribe.center) - 3.0).abs() < 1e-9);
    }
}

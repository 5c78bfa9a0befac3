use anyhow::Result;
use rand::Rng;

use crate::{
    components::{EventId, TribeId, WorldEvent, WorldEventKind},
    config::HazardConfig,
    engine::{System, SystemContext},
    rng::{RngExt, SystemRng},
    spatial::MapBounds,
    world::{GameEvent, GameEventKind, World},
};

/// Random disasters and blessings, then per-tick expiry of active events.
pub struct HazardSystem;

impl HazardSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HazardSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for HazardSystem {
    fn name(&self) -> &str {
        "hazards"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let config = &ctx.config.hazards;
        if world.state().random_events_enabled && rng.chance(config.random_event_chance) {
            let kind = WorldEventKind::ALL[rng.gen_range(0..WorldEventKind::ALL.len())];
            let tribes = world.tribe_ids();
            if !tribes.is_empty() {
                let target = tribes[rng.gen_range(0..tribes.len())];
                if kind == WorldEventKind::Blessing {
                    bless(world, target, config, rng);
                } else {
                    spawn_hazard(world, kind, target, config, &ctx.map.bounds, rng);
                }
            }
        }
        expire(world);
        Ok(())
    }
}

/// Grant a tribe a windfall of food. Returns the amount added.
pub fn bless<R: Rng + ?Sized>(
    world: &mut World,
    tribe_id: TribeId,
    config: &HazardConfig,
    rng: &mut R,
) -> u32 {
    let tick = world.tick();
    let Some(tribe) = world.tribe_mut(tribe_id) else {
        return 0;
    };
    let low = config.blessing_min_food.min(config.blessing_max_food);
    let amount = rng.gen_range(low..=config.blessing_max_food);
    tribe.stockpile.food += f64::from(amount);
    let name = tribe.name.clone();
    tracing::info!(tribe = %name, amount, "blessing");
    world.record(
        GameEvent::new(
            tick,
            GameEventKind::Blessing,
            format!("The spirits blessed {name} with {amount} food"),
        )
        .with_tribe(tribe_id),
    );
    amount
}

/// Place a hazard near a tribe's center and narrate it.
pub fn spawn_hazard<R: Rng + ?Sized>(
    world: &mut World,
    kind: WorldEventKind,
    tribe_id: TribeId,
    config: &HazardConfig,
    bounds: &MapBounds,
    rng: &mut R,
) -> Option<EventId> {
    let (center, name) = {
        let tribe = world.tribe(tribe_id)?;
        (tribe.center, tribe.name.clone())
    };
    let spread = config.hazard_spread;
    let position = bounds.clamp(center.offset(
        rng.uniform(-spread, spread),
        rng.uniform(-spread, spread),
    ));
    let min_duration = config.min_duration.min(config.max_duration).max(1);
    let event = WorldEvent {
        id: EventId(world.allocate_id()),
        kind,
        position,
        radius: rng.uniform(config.min_radius, config.max_radius),
        severity: rng.gen_range(1..=5),
        duration: rng.gen_range(min_duration..=config.max_duration.max(1)),
        affected_tribe: Some(tribe_id),
    };
    tracing::info!(
        kind = kind.label(),
        tribe = %name,
        severity = event.severity,
        duration = event.duration,
        "disaster"
    );
    world.record(
        GameEvent::new(
            world.tick(),
            GameEventKind::Disaster,
            format!("{} threatens {name}", capitalize(kind.label())),
        )
        .with_tribe(tribe_id),
    );
    Some(world.insert_world_event(event))
}

/// Count every event down by one tick and drop the finished ones.
pub(crate) fn expire(world: &mut World) {
    for event in &mut world.world_events {
        event.duration = event.duration.saturating_sub(1);
    }
    world.world_events.retain(|e| e.duration > 0);
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SimConfig,
        rng::RngManager,
        spatial::{Point, WorldMap},
        systems::spawn::test_tribe,
        world::GameState,
    };

    fn world() -> World {
        let mut world = World::new(GameState::default());
        world.insert_tribe(test_tribe(TribeId(1)));
        world
    }

    #[test]
    fn test_blessing_adds_food_in_range_without_world_event() {
        let config = HazardConfig::default();
        let mut rng = RngManager::new(11);
        let mut stream = rng.stream("hazards");
        for _ in 0..25 {
            let mut world = world();
            let amount = bless(&mut world, TribeId(1), &config, &mut stream);
            assert!((20..=50).contains(&amount));
            assert_eq!(
                world.tribe(TribeId(1)).unwrap().stockpile.food,
                100.0 + f64::from(amount)
            );
            assert!(world.world_events().is_empty());
            assert_eq!(world.drain_events()[0].kind, GameEventKind::Blessing);
        }
    }

    #[test]
    fn test_hazard_lands_near_tribe_within_ranges() {
        let config = HazardConfig::default();
        let bounds = MapBounds::default();
        let mut rng = RngManager::new(12);
        let mut stream = rng.stream("hazards");
        let mut world = world();
        for _ in 0..20 {
            spawn_hazard(&mut world, WorldEventKind::Fire, TribeId(1), &config, &bounds, &mut stream)
                .expect("tribe exists");
        }
        for event in world.world_events() {
            assert!((event.position.x - 500.0).abs() <= 100.0);
            assert!((event.position.y - 500.0).abs() <= 100.0);
            assert!((60.0..=120.0).contains(&event.radius));
            assert!((1..=5).contains(&event.severity));
            assert!((300..=900).contains(&event.duration));
            assert_eq!(event.affected_tribe, Some(TribeId(1)));
        }
        let events = world.drain_events();
        assert_eq!(events.len(), 20);
        assert!(events.iter().all(|e| e.kind == GameEventKind::Disaster));
    }

    #[test]
    fn test_unknown_tribe_gets_nothing() {
        let mut world = world();
        let mut rng = RngManager::new(1);
        let mut stream = rng.stream("hazards");
        assert_eq!(bless(&mut world, TribeId(9), &HazardConfig::default(), &mut stream), 0);
        assert!(spawn_hazard(
            &mut world,
            WorldEventKind::Disease,
            TribeId(9),
            &HazardConfig::default(),
            &MapBounds::default(),
            &mut stream
        )
        .is_none());
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_expiry_counts_down_and_drops() {
        let mut world = world();
        for (id, duration) in [(5, 1), (6, 3)] {
            world.insert_world_event(WorldEvent {
                id: EventId(id),
                kind: WorldEventKind::Storm,
                position: Point::new(0.0, 0.0),
                radius: 50.0,
                severity: 1,
                duration,
                affected_tribe: None,
            });
        }
        expire(&mut world);
        assert_eq!(world.world_events().len(), 1);
        assert_eq!(world.world_events()[0].duration, 2);
    }

    #[test]
    fn test_disabled_events_still_expire() {
        let mut world = world();
        world.state_mut().random_events_enabled = false;
        world.insert_world_event(WorldEvent {
            id: EventId(5),
            kind: WorldEventKind::Fire,
            position: Point::new(0.0, 0.0),
            radius: 50.0,
            severity: 1,
            duration: 1,
            affected_tribe: None,
        });
        let mut config = SimConfig::peaceful();
        config.hazards.random_event_chance = 1.0;
        let map = WorldMap::default();
        let ctx = SystemContext {
            tick: 1,
            config: &config,
            map: &map,
        };
        let mut rng = RngManager::new(1);
        HazardSystem::new()
            .run(&ctx, &mut world, &mut rng.stream("hazards"))
            .unwrap();
        assert!(world.world_events().is_empty());
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("wildfire"), "Wildfire");
        assert_eq!(capitalize(""), "");
    }
}

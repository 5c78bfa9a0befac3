use anyhow::Result;

use crate::{
    components::{Tribe, TribeId, Villager, VillagerId},
    engine::{System, SystemContext},
    rng::SystemRng,
    systems::{
        danger::{self, HazardSite},
        tasks, vitals, work,
    },
    world::{GameEvent, GameEventKind, World},
};

/// Runs vitals, danger, task selection and movement for every living
/// villager, tribe by tribe in id order.
pub struct VillagerSystem;

impl VillagerSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VillagerSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for VillagerSystem {
    fn name(&self) -> &str {
        "villagers"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let sites = danger::hazard_index(&world.world_events);
        let mut deaths: Vec<(TribeId, VillagerId, String)> = Vec::new();

        for tribe_id in world.tribe_ids() {
            for villager_id in world.living_members(tribe_id) {
                let (Some(tribe), Some(villager)) = (
                    world.tribes.get_mut(&tribe_id),
                    world.villagers.get_mut(&villager_id),
                ) else {
                    continue;
                };
                if let Some(cause) = tick_villager(villager, tribe, &sites, ctx, rng) {
                    villager.kill(cause.clone());
                    deaths.push((tribe_id, villager_id, cause));
                }
            }
        }

        for (tribe_id, villager_id, cause) in deaths {
            let tribe_name = world
                .tribe(tribe_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "unknown".into());
            let name = world
                .villager(villager_id)
                .map(|v| v.name.clone())
                .unwrap_or_default();
            tracing::debug!(villager = villager_id.raw(), tribe = %tribe_name, %cause, "death");
            world.record(
                GameEvent::new(
                    ctx.tick,
                    GameEventKind::Death,
                    format!("{name} of {tribe_name} died: {cause}"),
                )
                .with_tribe(tribe_id)
                .with_villager(villager_id),
            );
        }
        Ok(())
    }
}

/// One villager's tick. The first fatal step ends it.
fn tick_villager(
    villager: &mut Villager,
    tribe: &mut Tribe,
    sites: &[HazardSite],
    ctx: &SystemContext,
    rng: &mut SystemRng<'_>,
) -> Option<String> {
    let config = ctx.config;
    if let Some(cause) = vitals::update(villager, sites, &config.vitals, rng) {
        return Some(cause);
    }
    if let Some(cause) = danger::react(villager, sites, &config.danger, &ctx.map.bounds, rng) {
        return Some(cause);
    }
    if let Some(cause) = vitals::accident(villager, &config.vitals, rng) {
        return Some(cause);
    }
    tasks::choose(villager, tribe, ctx.map, &config.work, rng);
    work::advance(villager, tribe, ctx.map, &config.work, rng);
    None
}

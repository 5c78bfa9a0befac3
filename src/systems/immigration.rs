use anyhow::Result;
use rand::Rng;

use crate::{
    components::{TribeId, VillagerId},
    engine::{System, SystemContext},
    rng::{RngExt, SystemRng},
    spatial::MapBounds,
    systems::{spawn::immigrant, weighted_pick},
    world::{GameEvent, GameEventKind, World},
};

/// Occasional newcomers, drawn toward small tribes.
pub struct ImmigrationSystem;

impl ImmigrationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImmigrationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ImmigrationSystem {
    fn name(&self) -> &str {
        "immigration"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let config = &ctx.config.population;
        let state = world.state();
        if !state.immigration_enabled
            || state.tick.saturating_sub(state.last_immigration_tick) < config.immigration_cooldown
        {
            return Ok(());
        }
        if !rng.chance(config.immigration_chance) {
            return Ok(());
        }
        admit(world, &ctx.map.bounds, rng);
        Ok(())
    }
}

/// Settle one immigrant in a populated tribe. Smaller tribes are favoured.
pub(crate) fn admit<R: Rng + ?Sized>(
    world: &mut World,
    bounds: &MapBounds,
    rng: &mut R,
) -> Option<VillagerId> {
    let candidates: Vec<(TribeId, f64)> = world
        .populations()
        .into_iter()
        .filter(|(_, pop)| *pop >= 1)
        .map(|(id, pop)| (id, destination_weight(pop)))
        .collect();
    let Some(tribe_id) = weighted_pick(&candidates, rng) else {
        tracing::debug!("no populated tribe for immigrant");
        return None;
    };

    let tick = world.tick();
    let id = VillagerId(world.allocate_id());
    let villager = immigrant(id, tribe_id, bounds, rng);
    let tribe_name = world
        .tribe(tribe_id)
        .map(|t| t.name.clone())
        .unwrap_or_default();
    let message = format!("{} arrived to join {}", villager.name, tribe_name);
    tracing::info!(villager = id.raw(), tribe = %tribe_name, "immigrant arrived");
    world.insert_villager(villager);
    world.record(
        GameEvent::new(tick, GameEventKind::Immigration, message)
            .with_tribe(tribe_id)
            .with_villager(id),
    );
    world.state_mut().last_immigration_tick = tick;
    Some(id)
}

fn destination_weight(population: usize) -> f64 {
    10usize.saturating_sub(population).max(1) as f64
}

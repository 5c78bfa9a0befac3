use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// End-of-tick cleanup: bury the dead, disband empty AI tribes, clamp stockpiles.
pub struct BookkeepingSystem;

impl BookkeepingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BookkeepingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &str {
        "bookkeeping"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        world.remove_dead();

        let populations = world.populations();
        world.tribes.retain(|id, tribe| {
            let keep = tribe.is_player || populations.get(id).copied().unwrap_or(0) > 0;
            if !keep {
                tracing::info!(tribe = %tribe.name, "tribe disbanded");
            }
            keep
        });

        for tribe in world.tribes.values_mut() {
            tribe.stockpile.clamp_non_negative();
        }
        Ok(())
    }
}

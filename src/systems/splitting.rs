use anyhow::Result;
use rand::Rng;

use crate::{
    components::{Priorities, Stockpile, Tribe, TribeId, DEFAULT_TERRITORY_RADIUS},
    config::PopulationConfig,
    engine::{System, SystemContext},
    rng::{RngExt, SystemRng},
    spatial::{MapBounds, Point},
    systems::spawn::{TRIBE_COLORS, TRIBE_NAMES},
    world::{GameEvent, GameEventKind, World},
};

/// Large tribes occasionally bud off a small group that founds a new tribe.
pub struct SplittingSystem;

impl SplittingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SplittingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for SplittingSystem {
    fn name(&self) -> &str {
        "splitting"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let config = &ctx.config.population;
        let state = world.state();
        if !state.tribe_splitting_enabled
            || state.tick.saturating_sub(state.last_split_tick) < config.split_cooldown
        {
            return Ok(());
        }

        for (tribe_id, population) in world.populations() {
            if population < config.split_threshold {
                continue;
            }
            if !rng.chance(config.split_chance) {
                continue;
            }
            let movers = rng.gen_range(2..=3);
            if split_tribe(world, tribe_id, movers, config, &ctx.map.bounds, rng).is_some() {
                break;
            }
        }
        Ok(())
    }
}

/// Move the first `movers` living members of `source` into a new tribe.
///
/// Returns the new tribe's id, or `None` when the source is unknown or has
/// too few members to leave anyone behind.
pub fn split_tribe<R: Rng + ?Sized>(
    world: &mut World,
    source: TribeId,
    movers: usize,
    config: &PopulationConfig,
    bounds: &MapBounds,
    rng: &mut R,
) -> Option<TribeId> {
    let members = world.living_members(source);
    if movers == 0 || members.len() <= movers {
        return None;
    }
    let (source_name, source_priorities) = {
        let tribe = world.tribe(source)?;
        (tribe.name.clone(), tribe.priorities)
    };

    let center = find_center(world, config, bounds, rng);
    let name = pick_name(world, &source_name, rng);
    let color = pick_color(world, rng);

    let dowry = {
        let tribe = world.tribe_mut(source)?;
        let stock = &mut tribe.stockpile;
        let dowry = Stockpile {
            food: (stock.food * config.split_resource_share).floor(),
            wood: (stock.wood * config.split_resource_share).floor(),
            stone: (stock.stone * config.split_resource_share).floor(),
            tech: (stock.tech * config.split_tech_share).floor(),
        };
        stock.food -= dowry.food;
        stock.wood -= dowry.wood;
        stock.stone -= dowry.stone;
        stock.tech -= dowry.tech;
        stock.clamp_non_negative();
        dowry
    };

    let tick = world.tick();
    let id = TribeId(world.allocate_id());
    world.insert_tribe(new_tribe(id, name.clone(), color, dowry, center, source_priorities, tick));

    for villager_id in members.into_iter().take(movers) {
        if let Some(villager) = world.villager_mut(villager_id) {
            villager.tribe_id = id;
            villager.position = center;
            villager.go_idle();
        }
    }

    tracing::info!(
        from = %source_name,
        to = %name,
        movers,
        x = center.x,
        y = center.y,
        "tribe split"
    );
    world.record(
        GameEvent::new(
            tick,
            GameEventKind::TribeSplit,
            format!("{movers} villagers left {source_name} to found {name}"),
        )
        .with_tribe(id),
    );
    world.state_mut().last_split_tick = tick;
    Some(id)
}

fn new_tribe(
    id: TribeId,
    name: String,
    color: String,
    stockpile: Stockpile,
    center: Point,
    priorities: Priorities,
    tick: u64,
) -> Tribe {
    Tribe {
        id,
        name,
        color,
        stockpile,
        center,
        radius: DEFAULT_TERRITORY_RADIUS,
        priorities,
        founded_tick: tick,
        is_player: false,
    }
}

/// Rejection-sample a center far enough from every existing tribe.
fn find_center<R: Rng + ?Sized>(
    world: &World,
    config: &PopulationConfig,
    bounds: &MapBounds,
    rng: &mut R,
) -> Point {
    let margin = config.split_margin;
    let mut candidate = Point::new(bounds.width / 2.0, bounds.height / 2.0);
    for _ in 0..config.split_max_attempts {
        candidate = Point::new(
            rng.uniform(margin, bounds.width - margin),
            rng.uniform(margin, bounds.height - margin),
        );
        let crowded = world
            .tribes()
            .any(|t| t.center.distance(candidate) < config.split_min_distance);
        if !crowded {
            return candidate;
        }
    }
    tracing::warn!(
        attempts = config.split_max_attempts,
        "no uncrowded site for new tribe, settling at last candidate"
    );
    bounds.clamp(candidate)
}

fn pick_name<R: Rng + ?Sized>(world: &World, source_name: &str, rng: &mut R) -> String {
    let free: Vec<&str> = TRIBE_NAMES
        .iter()
        .copied()
        .filter(|n| !world.tribes().any(|t| t.name == *n))
        .collect();
    if free.is_empty() {
        return format!("New {source_name}");
    }
    free[rng.gen_range(0..free.len())].to_string()
}

fn pick_color<R: Rng + ?Sized>(world: &World, rng: &mut R) -> String {
    TRIBE_COLORS
        .iter()
        .find(|c| !world.tribes().any(|t| t.color == **c))
        .map(|c| c.to_string())
        .unwrap_or_else(|| format!("#{:06x}", rng.gen_range(0..0x100_0000u32)))
}

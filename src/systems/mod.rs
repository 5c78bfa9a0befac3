mod bookkeeping;
pub(crate) mod danger;
mod hazards;
mod immigration;
pub mod spawn;
mod splitting;
pub(crate) mod tasks;
mod villagers;
pub(crate) mod vitals;
pub(crate) mod work;

use rand::Rng;

use crate::rng::RngExt;

pub use bookkeeping::BookkeepingSystem;
pub use hazards::{bless, spawn_hazard, HazardSystem};
pub use immigration::ImmigrationSystem;
pub use splitting::{split_tribe, SplittingSystem};
pub use villagers::VillagerSystem;

/// Cumulative-weight sampling over `items` in slice order.
///
/// Non-positive weights never win; returns `None` when nothing has weight.
pub(crate) fn weighted_pick<T: Copy, R: Rng + ?Sized>(items: &[(T, f64)], rng: &mut R) -> Option<T> {
    let total: f64 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    if !(total > 0.0) {
        return None;
    }
    let draw = rng.uniform(0.0, total);
    let mut cumulative = 0.0;
    let mut last = None;
    for (item, weight) in items {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last = Some(*item);
        if draw < cumulative {
            return Some(*item);
        }
    }
    last
}

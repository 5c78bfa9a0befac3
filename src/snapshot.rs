use std::fs;
use std::path::{Path, PathBuf};

use crate::{error::SimResult, world::World};

/// Periodic JSON dumps of the world under `<dir>/<scenario>/tick_NNNNNN.json`.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval,
        }
    }

    pub fn is_due(&self, tick: u64) -> bool {
        self.interval > 0 && tick % self.interval == 0
    }

    pub fn maybe_write(&self, world: &World, scenario_name: &str) -> SimResult<Option<PathBuf>> {
        let tick = world.tick();
        if !self.is_due(tick) {
            return Ok(None);
        }

        let dir = self.dir.join(scenario_name);
        fs::create_dir_all(&dir)?;
        let file_path = dir.join(format!("tick_{tick:06}.json"));
        let json = serde_json::to_string_pretty(&world.snapshot(scenario_name))?;
        fs::write(&file_path, json)?;
        Ok(Some(file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{TribeId, VillagerId},
        systems::spawn::{test_tribe, test_villager},
        world::{GameState, WorldSnapshot},
    };

    #[test]
    fn test_is_due() {
        let writer = SnapshotWriter::new("unused", 10);
        assert!(!writer.is_due(5));
        assert!(writer.is_due(10));
        assert!(writer.is_due(20));
        assert!(!SnapshotWriter::new("unused", 0).is_due(10));
    }

    #[test]
    fn test_writes_snapshot_when_due() {
        let temp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 5);
        let mut world = World::new(GameState {
            tick: 10,
            ..GameState::default()
        });
        world.insert_tribe(test_tribe(TribeId(1)));
        world.insert_villager(test_villager(VillagerId(2), TribeId(1)));

        let path = writer.maybe_write(&world, "valley").unwrap().expect("due");
        assert_eq!(path, temp.path().join("valley").join("tick_000010.json"));
        let parsed: WorldSnapshot =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.tick, 10);
        assert_eq!(parsed.total_population, 1);
        assert_eq!(parsed.summaries[0].population, 1);

        world.state_mut().tick = 11;
        assert!(writer.maybe_write(&world, "valley").unwrap().is_none());
    }
}

use proptest::prelude::*;
use tribesim::{
    config::SimConfig,
    engine::{EngineBuilder, EngineSettings},
    rng::RngManager,
    scenario::Scenario,
};

/// A busy configuration so that every system fires within a short run.
fn turbulent() -> SimConfig {
    let mut config = SimConfig::default();
    config.vitals.hunger_rate = 1.5;
    config.vitals.accident_chance = 0.01;
    config.hazards.random_event_chance = 0.05;
    config.hazards.min_duration = 1;
    config.hazards.max_duration = 40;
    config.population.immigration_cooldown = 0;
    config.population.immigration_chance = 0.1;
    config.population.split_cooldown = 0;
    config.population.split_threshold = 4;
    config.population.split_chance = 0.2;
    config
}

fn fixture(populations: &[usize], food: f64) -> Scenario {
    let mut yaml = String::from("name: prop\ntribes:\n");
    for (i, population) in populations.iter().enumerate() {
        let x = 300 + (i % 3) * 600;
        let y = 300 + (i / 3) * 600;
        yaml.push_str(&format!(
            "  - name: Tribe{i}\n    center: {{ x: {x}, y: {y} }}\n    resources: {{ food: {food}, wood: 5, stone: 5, tech: 1 }}\n    population: {population}\n"
        ));
    }
    serde_yaml::from_str(&yaml).expect("generated fixture parses")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn every_tick_keeps_the_world_consistent(
        seed in any::<u64>(),
        populations in prop::collection::vec(0usize..7, 1..5),
        food in 0.0f64..30.0,
    ) {
        let mut scenario = fixture(&populations, food);
        scenario.seed = Some(seed);
        let mut world = scenario.build_world().expect("world builds");
        let mut engine = EngineBuilder::new(EngineSettings {
            seed: Some(seed),
            config: turbulent(),
            map: scenario.map.to_world_map(),
            ..EngineSettings::default()
        })
        .with_default_systems()
        .build();

        let mut divine = RngManager::new(seed);
        let mut previous_dead = Vec::new();
        for tick in 1..=150u64 {
            if tick % 50 == 0 {
                if let Some(tribe) = world.tribe_ids().first().copied() {
                    world.spawn_villager(tribe, &mut divine.stream("divine"));
                }
            }
            let outcome = engine.step(&mut world).expect("tick succeeds");
            prop_assert_eq!(outcome.tick(), tick);

            for villager in &outcome.villagers {
                prop_assert!(villager.vitals.in_range());
                prop_assert!(!villager.is_dead);
                prop_assert!(!previous_dead.contains(&villager.id));
                prop_assert!(outcome.tribes.iter().any(|t| t.id == villager.tribe_id));
            }
            for tribe in &outcome.tribes {
                prop_assert!(tribe.stockpile.is_valid());
            }
            for event in &outcome.world_events {
                prop_assert!(event.duration > 0);
                prop_assert!((1..=5).contains(&event.severity));
            }
            previous_dead.extend(
                outcome
                    .events
                    .iter()
                    .filter(|e| e.kind == tribesim::world::GameEventKind::Death)
                    .filter_map(|e| e.villager_id),
            );
        }
    }
}

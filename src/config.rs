//! Tuning constants for the per-tick simulation.
//!
//! Every field has a default so scenarios only need to list overrides.

use serde::{Deserialize, Serialize};

fn default_hunger_rate() -> f64 {
    0.04
}

fn default_energy_decay() -> f64 {
    0.02
}

fn default_sleep_energy_recovery() -> f64 {
    0.5
}

fn default_sleep_health_recovery() -> f64 {
    0.1
}

fn default_happiness_decay() -> f64 {
    0.02
}

fn default_happiness_recovery() -> f64 {
    0.005
}

fn default_storm_energy_drain() -> f64 {
    0.05
}

fn default_starvation_threshold() -> f64 {
    95.0
}

fn default_starvation_damage() -> f64 {
    0.5
}

fn default_starvation_death_chance() -> f64 {
    0.001
}

fn default_accident_chance() -> f64 {
    0.00002
}

fn default_accident_min_damage() -> f64 {
    30.0
}

fn default_accident_max_damage() -> f64 {
    70.0
}

fn default_danger_radius() -> f64 {
    80.0
}

fn default_flee_distance() -> f64 {
    150.0
}

fn default_notice_chance() -> f64 {
    0.6
}

fn default_cautious_notice_chance() -> f64 {
    0.85
}

fn default_reckless_notice_chance() -> f64 {
    0.3
}

fn default_wildlife_attack_chance() -> f64 {
    0.1
}

fn default_wildlife_damage_scale() -> f64 {
    4.0
}

fn default_disease_chance() -> f64 {
    0.05
}

fn default_disease_damage_scale() -> f64 {
    1.5
}

fn default_fire_burn_chance() -> f64 {
    0.15
}

fn default_fire_damage_scale() -> f64 {
    3.0
}

fn default_emergency_hunger() -> f64 {
    70.0
}

fn default_exhausted_energy() -> f64 {
    20.0
}

fn default_rested_energy() -> f64 {
    95.0
}

fn default_sated_hunger() -> f64 {
    20.0
}

fn default_sleep_jitter() -> f64 {
    20.0
}

fn default_move_speed() -> f64 {
    1.5
}

fn default_arrival_radius() -> f64 {
    5.0
}

fn default_task_complete_chance() -> f64 {
    0.005
}

fn default_wander_chance() -> f64 {
    0.02
}

fn default_wander_step() -> f64 {
    3.0
}

fn default_farming_rate() -> f64 {
    0.05
}

fn default_gathering_rate() -> f64 {
    0.04
}

fn default_building_rate() -> f64 {
    0.03
}

fn default_research_rate() -> f64 {
    0.02
}

fn default_skill_coefficient() -> f64 {
    0.01
}

fn default_skill_gain_chance() -> f64 {
    0.002
}

fn default_eat_food_per_tick() -> f64 {
    0.1
}

fn default_eat_hunger_relief() -> f64 {
    2.0
}

fn default_immigration_cooldown() -> u64 {
    600
}

fn default_immigration_chance() -> f64 {
    0.01
}

fn default_split_cooldown() -> u64 {
    1200
}

fn default_split_threshold() -> usize {
    8
}

fn default_split_chance() -> f64 {
    0.005
}

fn default_split_min_distance() -> f64 {
    250.0
}

fn default_split_margin() -> f64 {
    100.0
}

fn default_split_max_attempts() -> u32 {
    30
}

fn default_split_resource_share() -> f64 {
    0.3
}

fn default_split_tech_share() -> f64 {
    0.2
}

fn default_random_event_chance() -> f64 {
    0.0005
}

fn default_blessing_min_food() -> u32 {
    20
}

fn default_blessing_max_food() -> u32 {
    50
}

fn default_hazard_spread() -> f64 {
    100.0
}

fn default_hazard_min_radius() -> f64 {
    60.0
}

fn default_hazard_max_radius() -> f64 {
    120.0
}

fn default_hazard_min_duration() -> u32 {
    300
}

fn default_hazard_max_duration() -> u32 {
    900
}

/// Per-villager vitals, starvation and accident tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsConfig {
    #[serde(default = "default_hunger_rate")]
    pub hunger_rate: f64,
    #[serde(default = "default_energy_decay")]
    pub energy_decay: f64,
    #[serde(default = "default_sleep_energy_recovery")]
    pub sleep_energy_recovery: f64,
    #[serde(default = "default_sleep_health_recovery")]
    pub sleep_health_recovery: f64,
    #[serde(default = "default_happiness_decay")]
    pub happiness_decay: f64,
    #[serde(default = "default_happiness_recovery")]
    pub happiness_recovery: f64,
    #[serde(default = "default_storm_energy_drain")]
    pub storm_energy_drain: f64,
    #[serde(default = "default_starvation_threshold")]
    pub starvation_threshold: f64,
    #[serde(default = "default_starvation_damage")]
    pub starvation_damage: f64,
    #[serde(default = "default_starvation_death_chance")]
    pub starvation_death_chance: f64,
    #[serde(default = "default_accident_chance")]
    pub accident_chance: f64,
    #[serde(default = "default_accident_min_damage")]
    pub accident_min_damage: f64,
    #[serde(default = "default_accident_max_damage")]
    pub accident_max_damage: f64,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            hunger_rate: default_hunger_rate(),
            energy_decay: default_energy_decay(),
            sleep_energy_recovery: default_sleep_energy_recovery(),
            sleep_health_recovery: default_sleep_health_recovery(),
            happiness_decay: default_happiness_decay(),
            happiness_recovery: default_happiness_recovery(),
            storm_energy_drain: default_storm_energy_drain(),
            starvation_threshold: default_starvation_threshold(),
            starvation_damage: default_starvation_damage(),
            starvation_death_chance: default_starvation_death_chance(),
            accident_chance: default_accident_chance(),
            accident_min_damage: default_accident_min_damage(),
            accident_max_damage: default_accident_max_damage(),
        }
    }
}

/// Hazard proximity, notice and harm tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DangerConfig {
    #[serde(default = "default_danger_radius")]
    pub danger_radius: f64,
    #[serde(default = "default_flee_distance")]
    pub flee_distance: f64,
    #[serde(default = "default_notice_chance")]
    pub notice_chance: f64,
    #[serde(default = "default_cautious_notice_chance")]
    pub cautious_notice_chance: f64,
    #[serde(default = "default_reckless_notice_chance")]
    pub reckless_notice_chance: f64,
    #[serde(default = "default_wildlife_attack_chance")]
    pub wildlife_attack_chance: f64,
    #[serde(default = "default_wildlife_damage_scale")]
    pub wildlife_damage_scale: f64,
    #[serde(default = "default_disease_chance")]
    pub disease_chance: f64,
    #[serde(default = "default_disease_damage_scale")]
    pub disease_damage_scale: f64,
    #[serde(default = "default_fire_burn_chance")]
    pub fire_burn_chance: f64,
    #[serde(default = "default_fire_damage_scale")]
    pub fire_damage_scale: f64,
}

impl Default for DangerConfig {
    fn default() -> Self {
        Self {
            danger_radius: default_danger_radius(),
            flee_distance: default_flee_distance(),
            notice_chance: default_notice_chance(),
            cautious_notice_chance: default_cautious_notice_chance(),
            reckless_notice_chance: default_reckless_notice_chance(),
            wildlife_attack_chance: default_wildlife_attack_chance(),
            wildlife_damage_scale: default_wildlife_damage_scale(),
            disease_chance: default_disease_chance(),
            disease_damage_scale: default_disease_damage_scale(),
            fire_burn_chance: default_fire_burn_chance(),
            fire_damage_scale: default_fire_damage_scale(),
        }
    }
}

/// Task selection, movement and production tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkConfig {
    #[serde(default = "default_emergency_hunger")]
    pub emergency_hunger: f64,
    #[serde(default = "default_exhausted_energy")]
    pub exhausted_energy: f64,
    #[serde(default = "default_rested_energy")]
    pub rested_energy: f64,
    #[serde(default = "default_sated_hunger")]
    pub sated_hunger: f64,
    #[serde(default = "default_sleep_jitter")]
    pub sleep_jitter: f64,
    #[serde(default = "default_move_speed")]
    pub move_speed: f64,
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius: f64,
    #[serde(default = "default_task_complete_chance")]
    pub task_complete_chance: f64,
    #[serde(default = "default_wander_chance")]
    pub wander_chance: f64,
    #[serde(default = "default_wander_step")]
    pub wander_step: f64,
    #[serde(default = "default_farming_rate")]
    pub farming_rate: f64,
    #[serde(default = "default_gathering_rate")]
    pub gathering_rate: f64,
    #[serde(default = "default_building_rate")]
    pub building_rate: f64,
    #[serde(default = "default_research_rate")]
    pub research_rate: f64,
    #[serde(default = "default_skill_coefficient")]
    pub skill_coefficient: f64,
    #[serde(default = "default_skill_gain_chance")]
    pub skill_gain_chance: f64,
    #[serde(default = "default_eat_food_per_tick")]
    pub eat_food_per_tick: f64,
    #[serde(default = "default_eat_hunger_relief")]
    pub eat_hunger_relief: f64,
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self {
            emergency_hunger: default_emergency_hunger(),
            exhausted_energy: default_exhausted_energy(),
            rested_energy: default_rested_energy(),
            sated_hunger: default_sated_hunger(),
            sleep_jitter: default_sleep_jitter(),
            move_speed: default_move_speed(),
            arrival_radius: default_arrival_radius(),
            task_complete_chance: default_task_complete_chance(),
            wander_chance: default_wander_chance(),
            wander_step: default_wander_step(),
            farming_rate: default_farming_rate(),
            gathering_rate: default_gathering_rate(),
            building_rate: default_building_rate(),
            research_rate: default_research_rate(),
            skill_coefficient: default_skill_coefficient(),
            skill_gain_chance: default_skill_gain_chance(),
            eat_food_per_tick: default_eat_food_per_tick(),
            eat_hunger_relief: default_eat_hunger_relief(),
        }
    }
}

/// Immigration and tribe-splitting tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    #[serde(default = "default_immigration_cooldown")]
    pub immigration_cooldown: u64,
    #[serde(default = "default_immigration_chance")]
    pub immigration_chance: f64,
    #[serde(default = "default_split_cooldown")]
    pub split_cooldown: u64,
    #[serde(default = "default_split_threshold")]
    pub split_threshold: usize,
    #[serde(default = "default_split_chance")]
    pub split_chance: f64,
    #[serde(default = "default_split_min_distance")]
    pub split_min_distance: f64,
    #[serde(default = "default_split_margin")]
    pub split_margin: f64,
    #[serde(default = "default_split_max_attempts")]
    pub split_max_attempts: u32,
    #[serde(default = "default_split_resource_share")]
    pub split_resource_share: f64,
    #[serde(default = "default_split_tech_share")]
    pub split_tech_share: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            immigration_cooldown: default_immigration_cooldown(),
            immigration_chance: default_immigration_chance(),
            split_cooldown: default_split_cooldown(),
            split_threshold: default_split_threshold(),
            split_chance: default_split_chance(),
            split_min_distance: default_split_min_distance(),
            split_margin: default_split_margin(),
            split_max_attempts: default_split_max_attempts(),
            split_resource_share: default_split_resource_share(),
            split_tech_share: default_split_tech_share(),
        }
    }
}

/// Random disaster and blessing tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardConfig {
    #[serde(default = "default_random_event_chance")]
    pub random_event_chance: f64,
    #[serde(default = "default_blessing_min_food")]
    pub blessing_min_food: u32,
    #[serde(default = "default_blessing_max_food")]
    pub blessing_max_food: u32,
    #[serde(default = "default_hazard_spread")]
    pub hazard_spread: f64,
    #[serde(default = "default_hazard_min_radius")]
    pub min_radius: f64,
    #[serde(default = "default_hazard_max_radius")]
    pub max_radius: f64,
    #[serde(default = "default_hazard_min_duration")]
    pub min_duration: u32,
    #[serde(default = "default_hazard_max_duration")]
    pub max_duration: u32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            random_event_chance: default_random_event_chance(),
            blessing_min_food: default_blessing_min_food(),
            blessing_max_food: default_blessing_max_food(),
            hazard_spread: default_hazard_spread(),
            min_radius: default_hazard_min_radius(),
            max_radius: default_hazard_max_radius(),
            min_duration: default_hazard_min_duration(),
            max_duration: default_hazard_max_duration(),
        }
    }
}

/// All tuning for one simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub vitals: VitalsConfig,
    #[serde(default)]
    pub danger: DangerConfig,
    #[serde(default)]
    pub work: WorkConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub hazards: HazardConfig,
}

impl SimConfig {
    /// Configuration with every chance-driven death and event source disabled.
    ///
    /// Useful for hosts that want a calm sandbox and for tests.
    pub fn peaceful() -> Self {
        let mut config = Self::default();
        config.vitals.accident_chance = 0.0;
        config.vitals.starvation_death_chance = 0.0;
        config.hazards.random_event_chance = 0.0;
        config.population.split_chance = 0.0;
        config.population.immigration_chance = 0.0;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: SimConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.vitals.hunger_rate, 0.04);
        assert_eq!(config.vitals.starvation_threshold, 95.0);
        assert_eq!(config.population.split_threshold, 8);
        assert_eq!(config.hazards.blessing_min_food, 20);
    }

    #[test]
    fn test_partial_override() {
        let yaml = "population:\n  split_chance: 1.0\nwork:\n  move_speed: 3.0\n";
        let config: SimConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.population.split_chance, 1.0);
        assert_eq!(config.population.split_cooldown, 1200);
        assert_eq!(config.work.move_speed, 3.0);
        assert_eq!(config.work.arrival_radius, 5.0);
    }

    #[test]
    fn test_peaceful_disables_random_sources() {
        let config = SimConfig::peaceful();
        assert_eq!(config.vitals.accident_chance, 0.0);
        assert_eq!(config.hazards.random_event_chance, 0.0);
        assert_eq!(config.population.split_chance, 0.0);
        assert_eq!(config.population.immigration_chance, 0.0);
    }
}

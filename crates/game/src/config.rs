//! Skirmish configuration. Loaded from config.ron at startup.

use maneuver::ManeuverConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persistent skirmish settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for spawn layout and AI pilots; the same seed replays the same fight.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Turns to play before calling it a draw.
    #[serde(default = "default_turns")]
    pub turns: u32,
    /// Simulation ticks per second while a turn executes.
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: f64,
    /// Aircraft in the player squadron.
    #[serde(default = "default_player_count")]
    pub player_count: usize,
    /// Aircraft in the enemy squadron.
    #[serde(default = "default_enemy_count")]
    pub enemy_count: usize,
    /// Distance between the two squadrons at the start.
    #[serde(default = "default_arena_radius")]
    pub arena_radius: f32,
    /// Reach of a gun.
    #[serde(default = "default_gun_range")]
    pub gun_range: f32,
    /// Half-angle of the cone a gun covers, radians.
    #[serde(default = "default_gun_cone")]
    pub gun_cone: f32,
    /// Damage of one gun per turn.
    #[serde(default = "default_gun_damage")]
    pub gun_damage: f32,
    /// Maneuver model tunables.
    #[serde(default)]
    pub maneuver: ManeuverConfig,
}

fn default_seed() -> u64 {
    7
}
fn default_turns() -> u32 {
    30
}
fn default_ticks_per_second() -> f64 {
    60.0
}
fn default_player_count() -> usize {
    2
}
fn default_enemy_count() -> usize {
    3
}
fn default_arena_radius() -> f32 {
    1500.0
}
fn default_gun_range() -> f32 {
    600.0
}
fn default_gun_cone() -> f32 {
    0.35
}
fn default_gun_damage() -> f32 {
    4.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            turns: default_turns(),
            ticks_per_second: default_ticks_per_second(),
            player_count: default_player_count(),
            enemy_count: default_enemy_count(),
            arena_radius: default_arena_radius(),
            gun_range: default_gun_range(),
            gun_cone: default_gun_cone(),
            gun_damage: default_gun_damage(),
            maneuver: ManeuverConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let config = match std::fs::read_to_string(path) {
            Ok(data) => match ron::from_str::<GameConfig>(&data) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {:?}, using defaults", path);
                Self::default()
            }
        };
        config.sanitized()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    fn sanitized(mut self) -> Self {
        self.maneuver = self.maneuver.sanitized();
        if !(self.ticks_per_second >= 1.0) {
            log::warn!(
                "ticks_per_second {} is too low, using {}",
                self.ticks_per_second,
                default_ticks_per_second()
            );
            self.ticks_per_second = default_ticks_per_second();
        }
        self
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}

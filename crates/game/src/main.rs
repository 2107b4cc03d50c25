//! Skyduel - headless turn-based dogfight between two squadrons of part-built aircraft

mod combat;
mod config;
mod pilot;
mod skirmish;
mod spawner;

use anyhow::Result;

use config::GameConfig;
use pilot::Team;
use skirmish::Skirmish;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    if std::env::args().any(|arg| arg == "--save-config") {
        config.save();
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║                       Skyduel                        ║");
    println!("╠══════════════════════════════════════════════════════╣");
    println!("║  seed {:<10}  turns {:<6}  tick rate {:<6}      ║", config.seed, config.turns, config.ticks_per_second);
    println!("║  players {:<4}  enemies {:<4}                           ║", config.player_count, config.enemy_count);
    println!("╚══════════════════════════════════════════════════════╝");

    log::info!("Starting skirmish");

    let mut skirmish = Skirmish::new(config)?;
    let reports = skirmish.run()?;

    let players = skirmish.alive(Team::Player);
    let enemies = skirmish.alive(Team::Enemy);
    let hits: u32 = reports.iter().map(|r| r.volley.hits).sum();
    let outcome = match (players, enemies) {
        (0, 0) => "mutual destruction",
        (_, 0) => "players win",
        (0, _) => "enemies win",
        _ => "draw",
    };
    log::info!(
        "{} after {} turns, {:.1} s flown ({} hits, {} players / {} enemies left)",
        outcome,
        skirmish.turn(),
        skirmish.elapsed(),
        hits,
        players,
        enemies
    );

    Ok(())
}

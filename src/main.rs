use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use treadlock_server::config::GameConfig;
use treadlock_server::game::constants::world::TICK_DURATION_MS;
use treadlock_server::game::engine::GameEngine;
use treadlock_server::game::state::{PlayerId, PlayerInput};
use treadlock_server::net::NullConnection;

/// Scoreboard dump cadence in ticks
const SCOREBOARD_EVERY: u64 = 5000 / TICK_DURATION_MS;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Treadlock Server v{}", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::load_or_default();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    info!(
        "Arena {}x{}, {} interior walls, tick every {}ms",
        config.world_width, config.world_height, config.wall_count, TICK_DURATION_MS
    );

    let mut engine = GameEngine::new(config);
    engine.generate_world();

    // Scripted bots stand in for real connections until a transport layer
    // is wired up
    let mut bots: Vec<PlayerId> = Vec::new();
    for i in 1..=4 {
        match engine.join(format!("Bot{i}"), Box::new(NullConnection), 0) {
            Ok(id) => bots.push(id),
            Err(e) => warn!("Bot{i} could not join: {e}"),
        }
    }

    let start = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_DURATION_MS));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now_ms = start.elapsed().as_millis() as u64;
                for (slot, &bot) in bots.iter().enumerate() {
                    engine.apply_input(bot, bot_input(slot, engine.tick()));
                    engine.heartbeat(bot, now_ms);
                }
                engine.run_tick(now_ms);

                if engine.tick() % SCOREBOARD_EVERY == 0 {
                    let scoreboard = serde_json::to_string(&engine.snapshot())
                        .unwrap_or_else(|e| format!("<serialize error: {e}>"));
                    info!("tick {}: {}", engine.tick(), scoreboard);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    for &bot in &bots {
        engine.disconnect(bot);
    }
    info!("Server stopped after {} ticks", engine.tick());

    Ok(())
}

/// Drive-and-shoot script so a headless run produces visible activity
fn bot_input(slot: usize, tick: u64) -> PlayerInput {
    let leg = (tick / 90 + slot as u64) % 4;
    PlayerInput {
        up: leg == 0,
        right: leg == 1,
        down: leg == 2,
        left: leg == 3,
        boost: tick % 300 < 30,
        firing: tick % 45 == 0,
        aim_angle: Some(slot as f32 * std::f32::consts::FRAC_PI_2),
    }
}

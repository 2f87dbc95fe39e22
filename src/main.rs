//! Headless brushwork session.
//!
//! Builds a small terrain in memory, connects a few players, has each of
//! them run a brush and lets the turn driver apply the edits.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   JSON configuration file (defaults apply when absent)
//!   --players <N>     Number of simulated players (default: 3)
//!   --timeout <SECS>  Give up waiting for the edits after this long (default: 10)

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::IVec3;
use tokio::sync::Mutex;

use brushwork::config::Configuration;
use brushwork::core::{logging, Result};
use brushwork::engine::Engine;
use brushwork::player::LogSink;
use brushwork::scheduler::spawn_turns;
use brushwork::shape::Direction;
use brushwork::world::MemoryWorld;

const WORLD: &str = "demo";

/// Brush setups cycled through by the simulated players
const SETUPS: &[(&str, &str, &[(&str, &str)])] = &[
    ("ball material", "stone", &[("brushSize", "4")]),
    ("cylinder material", "dirt", &[("brushSize", "3"), ("height", "6")]),
    ("kernel ball blend", "air", &[("brushSize", "3"), ("kernelRadius", "1")]),
    ("disc material", "sand", &[("brushSize", "5"), ("useFace", "true")]),
];

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match parse_str_arg(&args, "--config") {
        Some(path) => Configuration::load_json(&path)?,
        None => Configuration::new(),
    };
    let player_count = parse_usize_arg(&args, "--players").unwrap_or(3);
    let timeout = Duration::from_secs(parse_usize_arg(&args, "--timeout").unwrap_or(10) as u64);

    let mut engine = Engine::new(config);
    engine.add_world(WORLD, Box::new(build_terrain(&engine)?));

    for i in 0..player_count {
        let name = format!("player{}", i + 1);
        engine.connect_player(&name, WORLD, Box::new(LogSink))?;

        let (brush, material, params) = SETUPS[i % SETUPS.len()];
        engine.set_brush(&name, brush)?;
        engine.set_material(&name, material)?;
        for (key, value) in params {
            engine.set_param(&name, key, value)?;
        }

        let target = IVec3::new(i as i32 * 12 - 20, 8, 0);
        engine.snipe(&name, target, Direction::Up)?;
    }

    let period = engine.turn_period();
    let engine = Arc::new(Mutex::new(engine));
    let handle = spawn_turns(Arc::clone(&engine), period);

    let start = Instant::now();
    wait_idle(&engine, timeout).await;
    log::info!("All edits applied in {:.2?}", start.elapsed());

    if player_count > 0 {
        let undone = engine.lock().await.undo("player1", 1)?;
        log::info!("player1 undid {} change(s)", undone);
        wait_idle(&engine, timeout).await;
    }

    handle.shutdown().await;
    Ok(())
}

/// Stone ground with a pond of water, eight voxels deep
fn build_terrain(engine: &Engine) -> Result<MemoryWorld> {
    let materials = engine.materials();
    let stone = materials.get("stone").unwrap_or_else(|| materials.air());
    let water = materials.get("water").unwrap_or_else(|| materials.air());

    let mut world = MemoryWorld::with_height_bounds(0, 255);
    world.fill(IVec3::new(-32, 0, -32), IVec3::new(31, 7, 31), stone)?;
    world.fill(IVec3::new(-6, 5, -6), IVec3::new(6, 7, 6), water)?;
    log::info!("Built terrain with {} blocks", world.block_count());
    Ok(world)
}

async fn wait_idle(engine: &Arc<Mutex<Engine>>, timeout: Duration) {
    let start = Instant::now();
    loop {
        let pending = engine.lock().await.players().pending_count();
        if pending == 0 {
            return;
        }
        if start.elapsed() > timeout {
            log::warn!("Timed out with {} players still pending", pending);
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

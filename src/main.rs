//! Sidescroller: a 2D side-scrolling platformer
//!
//! Run right through each level collecting coins, climb ladders, ride moving
//! platforms and stay off the spikes. Levels are RON files embedded at build
//! time (or listed in the config); reaching the right edge loads the next.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod game;
mod input;
mod logger;
mod world;

use anyhow::Context;
use macroquad::prelude::*;

use config::{FpsLimit, GameConfig};
use game::{draw_game, FpsCounter, Game, SoundBank};
use input::poll_key_events;
use world::LevelSet;

fn window_conf() -> Conf {
    // Errors are reported again once logging is up
    let config = GameConfig::load_or_default().unwrap_or_default();
    Conf {
        window_title: format!("{} v{}", config.window_title, VERSION),
        window_width: config.screen_width as i32,
        window_height: config.screen_height as i32,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        eprintln!("sidescroller: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    logger::init().context("failed to initialize logging")?;

    let config = GameConfig::load_or_default().context("failed to load configuration")?;
    match config.to_ron_string() {
        Ok(text) => tracing::debug!("effective configuration:\n{}", text),
        Err(e) => tracing::warn!(error = %e, "could not serialize configuration"),
    }

    let level_set = LevelSet::from_config(&config.level_files);
    tracing::info!(levels = level_set.len(), "level set ready");

    let sounds = SoundBank::load(&config.sounds)
        .await
        .context("failed to load sounds")?;

    let fps_limit = config.fps_limit;
    let mut fps = FpsCounter::new(get_time(), config.fps_window);
    let mut game = Game::new(config, level_set).context("failed to load the first level")?;

    tracing::info!("=== Sidescroller v{} ===", VERSION);

    loop {
        // Track frame start time for FPS limiting
        let frame_start = get_time();

        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        game.begin_frame();
        for event in poll_key_events() {
            game.handle_key(event);
        }
        game.update(get_frame_time())
            .with_context(|| format!("failed to load level {}", game.level_number))?;

        sounds.play_events(&mut game.events);
        draw_game(&game, &fps);
        fps.tick(get_time());

        pace_frame(frame_start, fps_limit);
        next_frame().await;
    }

    tracing::info!(score = game.score, level = game.level_number, "quit");
    Ok(())
}

/// Hold the frame until the target frame time has elapsed
fn pace_frame(frame_start: f64, limit: FpsLimit) {
    let Some(target_frame_time) = limit.frame_time() else {
        return;
    };
    if get_time() - frame_start >= target_frame_time {
        return;
    }

    // Native: use sleep for bulk, then spin-wait for precision
    #[cfg(not(target_arch = "wasm32"))]
    {
        let spin_margin = 0.002; // 2ms
        while get_time() - frame_start + spin_margin < target_frame_time {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        while get_time() - frame_start < target_frame_time {
            std::hint::spin_loop();
        }
    }
    // WASM: just spin-wait (no thread::sleep available)
    #[cfg(target_arch = "wasm32")]
    {
        while get_time() - frame_start < target_frame_time {
            std::hint::spin_loop();
        }
    }
}

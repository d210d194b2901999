//! Terminal tile-matching runner (default binary).
//!
//! Reads `TILEMATCH_*` settings, opens the leaderboard, and runs a fixed-step
//! loop: render, wait for input until the next tick, advance the game.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::EnvFilter;

use tilematch::app::App;
use tilematch::config::AppConfig;
use tilematch::input::{map_key, should_quit};
use tilematch::leaderboard::{FileStore, KeyValueStore, Leaderboard, MemoryStore};
use tilematch::term::{BoardView, FrameBuffer, TerminalRenderer, Viewport};
use tilematch::types::TICK_MS;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config)?;
    tracing::info!(
        seed = config.seed,
        difficulty = config.difficulty.as_str(),
        data_dir = %config.data_dir.display(),
        persist = !config.no_persist,
        "starting"
    );

    if config.no_persist {
        run_with(&config, MemoryStore::new())
    } else {
        run_with(&config, FileStore::new(&config.data_dir))
    }
}

/// Log to a file only; stdout belongs to the game screen.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

fn run_with<S: KeyValueStore>(config: &AppConfig, store: S) -> Result<()> {
    let app = App::new(config.seed, Leaderboard::new(store))
        .with_menu(config.difficulty, config.team.as_deref());

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, app);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run<S: KeyValueStore>(term: &mut TerminalRenderer, mut app: App<S>) -> Result<()> {
    let view = BoardView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&app.view(), Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(app.screen(), key) {
                        tracing::info!("quit requested");
                        return Ok(());
                    }
                    if let Some(command) = map_key(app.screen(), key) {
                        app.handle(command);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            app.tick(TICK_MS);
        }
    }
}

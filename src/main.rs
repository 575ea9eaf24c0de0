mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::compute::{init_world, start_game, step};
use space_invaders::config::Config;
use space_invaders::entities::{Canvas, Ending, FrameOutcome, GameStatus, World};
use space_invaders::error::GameError;
use space_invaders::input::{HeldKeys, InputLatch};

/// Terminal Space Invaders: a formation of enemies, destructible barriers,
/// and ten lives to clear the wave with.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// TOML file overriding the default tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for enemy fire timing; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second, overriding the config file.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    fps: Option<u32>,

    /// Where log output goes while the terminal is in raw mode.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to a file: anything written to stderr would tear the alternate
/// screen.
fn init_logging(path: PathBuf) {
    match File::create(&path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("Warning: logging disabled, cannot open {}: {e}", path.display()),
    }
}

// ── Menu & dialog ─────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn is_press(kind: KeyEventKind) -> bool {
    kind == KeyEventKind::Press
}

/// Raw mode swallows SIGINT, so Ctrl-C arrives as an ordinary key.
fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Discard input queued up during play so a held key can't skip a screen.
fn drain(rx: &mpsc::Receiver<Event>) {
    while rx.try_recv().is_ok() {}
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    last: Option<Ending>,
) -> Result<MenuResult, GameError> {
    display::render_menu(out, last)?;

    // Block until the user makes a choice
    while let Ok(ev) = rx.recv() {
        let Event::Key(key) = ev else { continue };
        if !is_press(key.kind) {
            continue;
        }
        if is_interrupt(&key) {
            return Ok(MenuResult::Quit);
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
                return Ok(MenuResult::Start)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuResult::Quit)
            }
            _ => {}
        }
    }
    // Input thread gone: nothing more can be read.
    Ok(MenuResult::Quit)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopExit {
    Quit,
    Menu,
}

/// Modal end-of-run message; returns once acknowledged, or `Quit` on Ctrl-C.
fn show_dialog<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    ending: Ending,
) -> Result<LoopExit, GameError> {
    drain(rx);
    display::render_dialog(out, ending)?;

    while let Ok(ev) = rx.recv() {
        let Event::Key(key) = ev else { continue };
        if !is_press(key.kind) {
            continue;
        }
        if is_interrupt(&key) {
            return Ok(LoopExit::Quit);
        }
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            return Ok(LoopExit::Menu);
        }
    }
    Ok(LoopExit::Quit)
}

/// Runs frames until the world leaves the running state or the user quits.
///
/// Input events are drained into the latch between frames, so a key
/// pressed mid-frame is seen by the next one. On terminals without key
/// release reporting, `HeldKeys::expire` lets go of keys that stop repeating.
fn game_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    reports_release: bool,
) -> Result<LoopExit, GameError> {
    let frame_time = Duration::from_secs(1) / world.config.display.fps;
    let mut latch = InputLatch::default();
    let mut held = HeldKeys::default();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(key) = ev else { continue };
            let quit_key =
                matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc);
            if is_press(key.kind) && (quit_key || is_interrupt(&key)) {
                return Ok(LoopExit::Quit);
            }
            held.handle_key(&key, frame, &mut latch);
        }
        if !reports_release {
            held.expire(&mut latch, frame);
        }

        // ── Advance & draw ────────────────────────────────────────────────────
        let outcome = step(world, &latch, rng);
        if let Some(ending) = outcome.ending() {
            return show_dialog(out, rx, ending);
        }
        if outcome == FrameOutcome::Idle {
            return Ok(LoopExit::Menu);
        }
        display::render(out, world)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    init_logging(
        cli.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("space_invaders.log")),
    );

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(fps) = cli.fps {
        config.display.fps = fps;
    }

    let mut rng = match cli.seed {
        Some(seed) => {
            info!("Using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    if let Err(e) = play(config, &mut rng) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Sets up the terminal, runs the menu/game cycle, and always restores the
/// terminal before returning.
fn play(config: Config, rng: &mut StdRng) -> Result<(), GameError> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events let the latch drop a key the moment it's let go.
    let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    if !reports_release {
        warn!("Terminal does not report key releases; falling back to hold expiry");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, config, rng, reports_release);

    // Always restore the terminal
    if reports_release {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: Config,
    rng: &mut StdRng,
    reports_release: bool,
) -> Result<(), GameError> {
    let (cols, rows) = terminal::size()?;
    let canvas = Canvas::from_cells(cols, rows.saturating_sub(display::HUD_ROWS), &config);
    config.check_fits(canvas)?;

    let mut world = init_world(config, canvas);

    loop {
        let last = match world.status {
            GameStatus::Menu { last } => last,
            GameStatus::Running => None,
        };
        match show_menu(out, rx, last)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                start_game(&mut world, rng);
                if let LoopExit::Quit = game_loop(out, &mut world, rx, rng, reports_release)? {
                    break;
                }
            }
        }
    }
    info!("Exiting");
    Ok(())
}

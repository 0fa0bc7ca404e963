use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use space_ship_game::clock::Millis;
use space_ship_game::compute::{Frame, Game, GameStatus};
use space_ship_game::config::{report_load, ConfigError, Difficulty, GameConfig, CONFIG_ENV};
use space_ship_game::display::{self, Canvas, Hud};
use space_ship_game::error::Result;
use space_ship_game::input::{InputTracker, Keys, Pointer};
use space_ship_game::sinks::AudioLog;
use space_ship_game::upgrade::UpgradeStat;

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// many frames.  Terminals without release events only send OS key-repeat
/// presses, which arrive well inside the window.
const HOLD_WINDOW: u64 = 4;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| is_held(key_frame, key, frame))
}

/// Level state of every logical control this frame.
fn held_keys(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Keys {
    use KeyCode::{Char, Enter, Esc};
    Keys {
        up: any_held(key_frame, &[KeyCode::Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[KeyCode::Down, Char('s'), Char('S')], frame),
        left: any_held(key_frame, &[KeyCode::Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[KeyCode::Right, Char('d'), Char('D')], frame),
        fire: is_held(key_frame, &Char(' '), frame),
        shield: any_held(key_frame, &[Char('e'), Char('E')], frame),
        pause: any_held(key_frame, &[Char('p'), Char('P'), Esc], frame),
        confirm: is_held(key_frame, &Enter, frame),
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to `config.log_file`, and only when `RUST_LOG` asks for it: stderr
/// belongs to the alternate screen while the game runs.
fn init_logging(config: &GameConfig) {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    match File::create(&config.log_file) {
        Ok(file) => {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(err) => eprintln!("cannot open log file {}: {}", config.log_file.display(), err),
    }
}

/// Config plus the error that forced a fallback to defaults, if any.
fn load_config(path: &Path) -> Result<(GameConfig, Option<ConfigError>)> {
    if std::env::var_os(CONFIG_ENV).is_some() {
        // An explicitly requested file must exist and parse.
        return Ok((GameConfig::from_file(path)?, None));
    }
    Ok(GameConfig::load_or_default(path))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drive the session until the player quits.
///
/// Keyboard input uses a `key_frame` map of the frame each key was last seen
/// in, so several keys can be held at once.  Terminals with keyboard
/// enhancement send releases and keys drop out at once; others expire after
/// `HOLD_WINDOW` frames of silence.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut rng = thread_rng();
    let mut audio = AudioLog::new(config.audio.enabled);
    let frame_time = Duration::from_millis(config.display.frame_ms.max(1));

    let (width, height) = terminal::size()?;
    let mut canvas = Canvas::new(width, height, &config.display);
    let mut hud = Hud::new();
    let origin = Instant::now();
    let clock = || origin.elapsed().as_millis() as Millis;
    let mut game = Game::new(config, canvas.bounds(), clock());

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut tracker = InputTracker::new();
    let mut pointer: Option<Pointer> = None;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char(digit @ '1'..='3') => {
                                one_shot_digit(&mut game, &mut hud, digit);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    if let Some((x, y)) = canvas.world_point(column, row) {
                        let primary = match kind {
                            MouseEventKind::Down(MouseButton::Left)
                            | MouseEventKind::Drag(MouseButton::Left) => true,
                            MouseEventKind::Up(MouseButton::Left) => false,
                            _ => pointer.map(|p| p.primary).unwrap_or(false),
                        };
                        pointer = Some(Pointer { x, y, primary });
                    }
                }
                Event::Resize(cols, rows) => {
                    canvas.resize(cols, rows);
                    game.resize(canvas.bounds());
                    info!("resized to {}x{}", cols, rows);
                }
                _ => {}
            }
        }

        let input = tracker.snapshot(held_keys(&key_frame, frame), pointer);
        let now = clock();
        let mut ctx = Frame {
            now,
            input: &input,
            surface: &mut canvas,
            audio: &mut audio,
            hud: &mut hud,
        };
        game.tick(&mut ctx, &mut rng);

        display::render(out, &canvas, &hud, &game, now)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

/// Digit keys pick the difficulty on the start screen and buy upgrades
/// everywhere else.
fn one_shot_digit(game: &mut Game, hud: &mut Hud, digit: char) {
    if game.status == GameStatus::Start {
        let difficulty = match digit {
            '1' => Difficulty::Easy,
            '2' => Difficulty::Medium,
            _ => Difficulty::Hard,
        };
        game.set_difficulty(difficulty);
        return;
    }
    let stat = match digit {
        '1' => UpgradeStat::FireRate,
        '2' => UpgradeStat::ShieldEfficiency,
        _ => return,
    };
    game.purchase_upgrade(stat, hud);
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config_path = GameConfig::default_path();
    let (config, fallback) = load_config(&config_path)?;
    init_logging(&config);
    report_load(&config_path, fallback.as_ref());

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    if config.controls.mouse_control {
        out.execute(EnableMouseCapture)?;
    }

    // Ask for key-release events; terminals without the protocol fall back
    // to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &config, &rx);
    if let Err(err) = &result {
        warn!("stopped: {}", err);
    }

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    if config.controls.mouse_control {
        let _ = out.execute(DisableMouseCapture);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

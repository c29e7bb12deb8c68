use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::ThreadRng;
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use space_invader::assets::Assets;
use space_invader::compute::{init_state, return_to_menu, select_difficulty, start_match, tick};
use space_invader::config::GameConfig;
use space_invader::display::{self, Button, TerminalSurface};
use space_invader::entities::{Difficulty, GameEvent, MatchState, Phase};
use space_invader::highscore::HighScoreStore;
use space_invader::input::{KeyTracker, MouseState};
use space_invader::menu::{Menu, MenuAction};

const GAME_FRAME: Duration = Duration::from_micros(16_667); // ≈60 FPS
const MENU_FRAME: Duration = Duration::from_micros(33_333); // ≈30 FPS

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode, so logs go to a file. No file, no logs.
fn init_logging(path: &Path) {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

// ── Frame loop ────────────────────────────────────────────────────────────────

struct App {
    state: MatchState,
    menu: Menu,
    keys: KeyTracker,
    mouse: MouseState,
    surface: TerminalSurface,
    store: HighScoreStore,
    assets: Assets,
    rng: ThreadRng,
}

enum Flow {
    Continue,
    Quit,
}

fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

impl App {
    fn apply_menu_action(&mut self, action: MenuAction) -> Flow {
        match action {
            MenuAction::None => {}
            MenuAction::Start => {
                self.state = start_match(&self.state, &mut self.rng);
                self.keys.clear();
            }
            MenuAction::SetDifficulty(difficulty) => {
                tracing::info!(difficulty = difficulty.name(), "difficulty selected");
                self.state = select_difficulty(&self.state, difficulty);
            }
            MenuAction::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn update_menu(&mut self, presses: &[(KeyCode, KeyModifiers)]) -> Flow {
        for &(code, modifiers) in presses {
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Flow::Quit;
            }
            let action = self.menu.handle_key(code, self.state.difficulty);
            if let Flow::Quit = self.apply_menu_action(action) {
                return Flow::Quit;
            }
            if self.state.phase != Phase::Menu {
                return Flow::Continue;
            }
        }
        if self.mouse.clicked {
            let action = self.menu.handle_click(self.mouse.x, self.mouse.y, self.state.difficulty);
            return self.apply_menu_action(action);
        }
        Flow::Continue
    }

    fn update_match(&mut self, presses: &[(KeyCode, KeyModifiers)]) -> Flow {
        if presses.iter().any(|&(code, modifiers)| is_quit_key(code, modifiers)) {
            return Flow::Quit;
        }
        self.state = tick(&self.state, &self.keys.frame_input(), &mut self.rng);

        let events = &self.state.events;
        if events.contains(&GameEvent::Shot) {
            self.assets.shoot.play();
        }
        if events.iter().any(|e| matches!(e, GameEvent::Explosion { .. })) {
            self.assets.explosion.play();
        }
        if events.contains(&GameEvent::GameOver) {
            self.store.record(self.state.score);
        }
        Flow::Continue
    }

    fn update_game_over(&mut self, presses: &[(KeyCode, KeyModifiers)]) -> Flow {
        if presses.iter().any(|&(code, modifiers)| is_quit_key(code, modifiers)) {
            return Flow::Quit;
        }
        let restart_key = presses
            .iter()
            .any(|&(code, _)| matches!(code, KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter));
        let restart_click = self.mouse.clicked && Button::restart().contains(self.mouse.x, self.mouse.y);
        if restart_key || restart_click {
            self.store.record(self.state.score);
            self.state = return_to_menu(&self.state);
            self.menu.reset();
        }
        Flow::Continue
    }

    fn render(&mut self) {
        match self.state.phase {
            Phase::Menu => display::render_menu(&mut self.surface, &self.menu, &self.state, self.store.best()),
            Phase::Playing | Phase::Boss => display::render_match(&mut self.surface, &self.state, &self.assets),
            Phase::GameOver => display::render_game_over(
                &mut self.surface,
                &self.state,
                self.store.best(),
                self.mouse.position(),
            ),
        }
    }

    /// Returns once the player quits.
    fn run<W: Write>(&mut self, out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
        loop {
            let frame_start = Instant::now();
            self.keys.begin_frame();
            self.mouse.begin_frame();

            // ── Drain all pending input events (non-blocking) ─────────────────
            let mut presses = Vec::new();
            while let Ok(ev) = rx.try_recv() {
                match ev {
                    Event::Key(key) => {
                        if let Some(code) = self.keys.observe(&key) {
                            presses.push((code, key.modifiers));
                        }
                    }
                    Event::Mouse(mouse) => {
                        let surface = &self.surface;
                        self.mouse.observe(&mouse, |col, row| surface.to_logical(col, row));
                    }
                    Event::Resize(cols, rows) => self.surface.resize(cols, rows),
                    _ => {}
                }
            }

            let flow = match self.state.phase {
                Phase::Menu => self.update_menu(&presses),
                Phase::Playing | Phase::Boss => self.update_match(&presses),
                Phase::GameOver => self.update_game_over(&presses),
            };
            if let Flow::Quit = flow {
                return Ok(());
            }

            self.render();
            self.surface.present(out)?;

            let budget = match self.state.phase {
                Phase::Playing | Phase::Boss => GAME_FRAME,
                Phase::Menu | Phase::GameOver => MENU_FRAME,
            };
            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = GameConfig::from_env();
    init_logging(&config.log_path);
    tracing::info!(?config, "starting");

    let store = HighScoreStore::open(&config.high_score_path);
    let assets = if config.asset_dir.is_dir() {
        Assets::load(&config.asset_dir)
    } else {
        tracing::warn!(dir = ?config.asset_dir, "asset directory missing, using placeholders");
        Assets::placeholders()
    };

    let (cols, rows) = terminal::size()?;
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Ask for release/repeat events; terminals without the kitty protocol
    // ignore this and held keys expire through `HOLD_WINDOW` instead.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread; the frame loop only drains
    // the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // loop has exited
            }
        }
    });

    let mut app = App {
        state: init_state(Difficulty::default()),
        menu: Menu::new(),
        keys: KeyTracker::new(),
        mouse: MouseState::default(),
        surface: TerminalSurface::new(cols, rows),
        store,
        assets,
        rng: thread_rng(),
    };
    app.assets.music.start();
    let result = app.run(&mut out, &rx);
    app.assets.music.stop();

    // Opportunistic save on the way out.
    app.store.record(app.state.score);

    // Restore the terminal even when the loop failed.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    tracing::info!("bye");
    result.map_err(Into::into)
}

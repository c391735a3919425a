mod app;

use std::io::{self, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::{cursor, execute, queue, style, terminal};
use fruitrun_common::RunConfig;
use fruitrun_input::Key;
use fruitrun_persist::HighScoreStore;
use glam::Vec2;
use tracing_subscriber::EnvFilter;

use app::{App, CORRIDOR_TOP, Line};

#[derive(Parser)]
#[command(name = "fruitrun-tui", about = "Fruit Runner in the terminal")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file (the terminal is busy drawing the game)
    #[arg(long)]
    log: Option<PathBuf>,

    /// YAML run config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed (taken from the clock when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// High score file
    #[arg(long, default_value = "fruitrun-highscore.json")]
    scores: PathBuf,
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Enter => Key::Enter,
        _ => Key::Other,
    }
}

fn draw(out: &mut impl Write, lines: &[Line]) -> io::Result<()> {
    queue!(out, cursor::MoveTo(0, 0))?;
    for (row, line) in lines.iter().enumerate() {
        queue!(out, cursor::MoveTo(0, row as u16))?;
        if line.highlight {
            queue!(
                out,
                style::SetForegroundColor(style::Color::Yellow),
                style::SetAttribute(style::Attribute::Bold),
                style::Print(&line.text),
                style::SetAttribute(style::Attribute::Reset),
                style::ResetColor
            )?;
        } else {
            queue!(out, style::Print(&line.text))?;
        }
        queue!(out, terminal::Clear(terminal::ClearType::UntilNewLine))?;
    }
    queue!(out, terminal::Clear(terminal::ClearType::FromCursorDown))?;
    out.flush()
}

fn corridor_px(mouse: &MouseEvent) -> Vec2 {
    Vec2::new(
        mouse.column as f32,
        mouse.row.saturating_sub(CORRIDOR_TOP) as f32,
    )
}

fn enter_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        event::EnableMouseCapture,
    )
}

fn leave_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )
}

/// Raw mode and the alternate screen for the lifetime of the guard.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        enter_screen(&mut stdout())?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = leave_screen(&mut stdout());
        let _ = terminal::disable_raw_mode();
    }
}

fn play(app: &mut App, out: &mut impl Write) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size()?;
    app.resize(cols, rows);

    let frame_dur = Duration::from_millis(16);
    let mut last_frame = Instant::now();
    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    code => app.handle_key(map_key(code)),
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => app.pointer_down(corridor_px(&mouse)),
                    MouseEventKind::Up(MouseButton::Left) => app.pointer_up(corridor_px(&mouse)),
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        app.pointer_move(corridor_px(&mouse))
                    }
                    _ => {}
                },
                Event::Resize(c, r) => app.resize(c, r),
                _ => {}
            }
        }

        let now = Instant::now();
        app.update(now - last_frame)?;
        last_frame = now;

        draw(out, &app.lines())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        let filter = if cli.verbose { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    }

    let config = match &cli.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    config.validate()?;

    let seed = match cli.seed {
        Some(seed) => seed,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64,
    };
    let scores = HighScoreStore::open(&cli.scores)?;
    tracing::info!(seed, best = scores.best(), "starting fruitrun-tui");
    let mut app = App::new(config, seed, scores);

    let guard = TerminalGuard::enter()?;
    let result = play(&mut app, &mut stdout());
    drop(guard);

    let run = app.run();
    if run.attempts() > 0 {
        println!(
            "Played {} run(s), last score {}, best {}",
            run.attempts(),
            run.score(),
            app.best()
        );
    }
    result
}

use std::fs::{self, OpenOptions};
use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, terminal,
};
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use flappy_tui::assets::Assets;
use flappy_tui::audio::{Audio, RodioAudio, SilentAudio};
use flappy_tui::config::{Settings, Tuning};
use flappy_tui::game::{Game, GameEvent};
use flappy_tui::render::{self, PixelBuf, Viewport};
use flappy_tui::score::JsonScoreStore;

// ── Setup ───────────────────────────────────────────────────────────────────

fn init_logging(settings: &Settings) {
    let file = fs::create_dir_all(&settings.data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(settings.log_path())
    });
    // The terminal belongs to the renderer; without a log file we stay quiet.
    let Ok(file) = file else { return };

    env_logger::Builder::from_env(env_logger::Env::new().filter_or("FLAPPY_TUI_LOG", "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn open_audio(settings: &Settings) -> Box<dyn Audio> {
    if settings.mute {
        info!("audio muted");
        return Box::new(SilentAudio);
    }
    match RodioAudio::open() {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            warn!("continuing without sound: {e:#}");
            Box::new(SilentAudio)
        }
    }
}

fn dispatch(audio: &mut dyn Audio, events: &[GameEvent]) {
    for event in events {
        match *event {
            GameEvent::Sound(cue) => audio.play(cue),
            GameEvent::MusicStart => audio.start_music(),
            GameEvent::MusicStop => audio.stop_music(),
            GameEvent::NewBest(best) => info!("new best score {best}"),
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings);

    let tuning = Tuning::load(&settings.tuning_path())?;
    let assets = Assets::load(
        tuning.win_width,
        tuning.win_height,
        tuning.base_height,
        tuning.obstacle_width,
    )
    .context("failed to load assets")?;
    let mut audio = open_audio(&settings);

    let store = JsonScoreStore::new(settings.score_path());
    info!("best score file: {}", store.path().display());
    let game = Game::new(tuning, Box::new(store));
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let result = run(&mut out, game, &assets, audio.as_mut(), rng, settings.tick_rate);

    audio.stop_music();
    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;

    if let Err(e) = &result {
        error!("terminal error: {e}");
    }
    Ok(result?)
}

fn run(
    out: &mut impl Write,
    mut game: Game,
    assets: &Assets,
    audio: &mut dyn Audio,
    mut rng: StdRng,
    tick_rate: u32,
) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut view = Viewport::fit(
        buf.width(),
        buf.height(),
        game.tuning.win_width,
        game.tuning.win_height,
    );

    let frame_dur = Duration::from_secs_f64(1.0 / tick_rate as f64);
    audio.start_music();

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        info!("quit with best score {}", game.best());
                        return Ok(());
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                        let events = game.impulse(&mut rng);
                        dispatch(audio, &events);
                    }
                    _ => {}
                },
                Event::Resize(c, r) => {
                    buf.resize(c as usize, r as usize * 2);
                    view = Viewport::fit(
                        buf.width(),
                        buf.height(),
                        game.tuning.win_width,
                        game.tuning.win_height,
                    );
                }
                _ => {}
            }
        }

        // Update
        let events = game.tick(&mut rng);
        dispatch(audio, &events);

        // Render
        render::draw(&game, assets, &view, &mut buf);
        buf.render(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

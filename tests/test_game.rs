use flappy_tui::audio::Cue;
use flappy_tui::config::Tuning;
use flappy_tui::game::{Game, GameEvent, GameState};
use flappy_tui::obstacle::Obstacle;
use flappy_tui::score::MemoryScoreStore;

use rand::SeedableRng;
use rand::rngs::StdRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn new_game() -> Game {
    Game::new(Tuning::default(), Box::new(MemoryScoreStore::default()))
}

fn playing_game(rng: &mut StdRng) -> Game {
    let mut g = new_game();
    g.impulse(rng);
    assert_eq!(g.state, GameState::Playing);
    g
}

// ── START ─────────────────────────────────────────────────────────────────────

#[test]
fn initial_state_is_start() {
    let g = new_game();
    assert_eq!(g.state, GameState::Start);
    assert_eq!(g.score(), 0);
    assert!(g.stream.is_empty());
}

#[test]
fn impulse_from_start_begins_play_with_three_obstacles() {
    let mut rng = seeded_rng();
    let g = playing_game(&mut rng);

    assert_eq!(g.score(), 0);
    assert_eq!(g.stream.len(), 3);
    assert_eq!(g.avatar.vel, -8.0);
    let xs: Vec<f64> = g.stream.obstacles().iter().map(|o| o.x).collect();
    for pair in xs.windows(2) {
        assert!(pair[1] > pair[0]);
        let spacing = pair[1] - pair[0];
        assert!((180.0..=250.0).contains(&spacing), "spacing {spacing}");
    }
}

// ── PLAYING ───────────────────────────────────────────────────────────────────

#[test]
fn falling_velocity_rises_then_holds() {
    let mut rng = seeded_rng();
    let mut g = playing_game(&mut rng);
    g.stream.clear();
    g.avatar.vel = 0.0;
    // High enough that 30 ticks of falling stay above the floor.
    g.avatar.y = 100.0;

    let mut prev = g.avatar.vel;
    let mut held = 0;
    for _ in 0..30 {
        g.tick(&mut rng);
        assert_eq!(g.state, GameState::Playing);
        let vel = g.avatar.vel;
        if prev < 10.0 {
            assert!(vel > prev, "velocity {vel} did not increase from {prev}");
        } else {
            assert_eq!(vel, 10.0);
            held += 1;
        }
        prev = vel;
    }
    assert!(held > 10);
}

#[test]
fn velocity_stays_bounded_while_playing() {
    let mut rng = seeded_rng();
    let mut g = playing_game(&mut rng);
    for i in 0..120 {
        if i % 9 == 0 {
            g.impulse(&mut rng);
        }
        g.tick(&mut rng);
        if g.state != GameState::Playing {
            break;
        }
        assert!((-7.0..=10.0).contains(&g.avatar.vel), "tick {i}: {}", g.avatar.vel);
    }
}

#[test]
fn impulse_while_playing_keeps_playing() {
    let mut rng = seeded_rng();
    let mut g = playing_game(&mut rng);
    g.avatar.vel = 6.0;
    let events = g.impulse(&mut rng);
    assert_eq!(g.state, GameState::Playing);
    assert_eq!(g.avatar.vel, -8.0);
    assert_eq!(events, vec![GameEvent::Sound(Cue::Flap)]);
}

#[test]
fn below_floor_ends_the_session() {
    let mut rng = seeded_rng();
    let mut g = playing_game(&mut rng);
    g.avatar.y = 700.0;
    g.tick(&mut rng);
    assert_eq!(g.state, GameState::GameOver);
}

#[test]
fn collision_ends_the_session() {
    let mut rng = seeded_rng();
    let mut g = playing_game(&mut rng);
    g.stream.clear();
    g.avatar.y = 100.0;
    g.avatar.vel = 0.0;

    // Place one obstacle right on top of the bird with its gap far below.
    let mut o = Obstacle::new(0.0, &g.tuning, &mut rng);
    o.x = 110.0;
    o.gap_y = 400.0;
    o.gap_size = 150.0;
    inject(&mut g, o);

    let events = g.tick(&mut rng);
    assert_eq!(g.state, GameState::GameOver);
    assert!(events.contains(&GameEvent::Sound(Cue::Hit)));
    assert!(events.contains(&GameEvent::MusicStop));
}

#[test]
fn scores_once_per_obstacle() {
    let mut rng = seeded_rng();
    let mut g = playing_game(&mut rng);
    g.stream.clear();

    let mut o = Obstacle::new(0.0, &g.tuning, &mut rng);
    o.x = 180.0;
    o.gap_y = 150.0;
    o.gap_size = 368.0;
    inject(&mut g, o);

    let mut points = 0;
    for _ in 0..60 {
        // Hold the bird in the middle of the gap.
        g.avatar.y = 320.0;
        g.avatar.vel = 0.0;
        let events = g.tick(&mut rng);
        points += events
            .iter()
            .filter(|e| **e == GameEvent::Sound(Cue::Point))
            .count();
        assert_eq!(g.state, GameState::Playing);
    }
    assert_eq!(points, 1);
    assert_eq!(g.score(), 1);
}

// ── GAME_OVER ─────────────────────────────────────────────────────────────────

#[test]
fn game_over_stays_until_impulse() {
    let mut rng = seeded_rng();
    let mut g = playing_game(&mut rng);
    g.avatar.y = 700.0;
    g.tick(&mut rng);
    let y = g.avatar.y;
    for _ in 0..30 {
        assert!(!g.tick(&mut rng).contains(&GameEvent::MusicStop));
    }
    assert_eq!(g.state, GameState::GameOver);
    assert_eq!(g.avatar.y, y);
}

#[test]
fn impulse_from_game_over_resets_to_start() {
    let mut rng = seeded_rng();
    let mut g = playing_game(&mut rng);
    g.session.score = 4;
    g.avatar.y = 700.0;
    g.tick(&mut rng);
    assert_eq!(g.state, GameState::GameOver);

    g.impulse(&mut rng);
    assert_eq!(g.state, GameState::Start);
    assert!(g.stream.is_empty());
    assert_eq!(g.score(), 0);
    assert_eq!(g.avatar.y, 384.0);
    assert_eq!(g.best(), 4);
}

#[test]
fn same_seed_same_session() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(3);
        let mut g = playing_game(&mut rng);
        for i in 0..200 {
            if i % 18 == 0 {
                g.impulse(&mut rng);
            }
            g.tick(&mut rng);
        }
        (g.state, g.score(), g.avatar.y, g.stream.obstacles().to_vec())
    };
    assert_eq!(run(), run());
}

/// Replaces the stream with the single obstacle `o`.
fn inject(g: &mut Game, o: Obstacle) {
    g.stream.clear();
    g.stream.insert(o);
}

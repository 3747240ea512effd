use flappy_tui::config::Tuning;
use flappy_tui::game::{Game, GameEvent, GameState};
use flappy_tui::obstacle::Obstacle;
use flappy_tui::score::{JsonScoreStore, ScoreStore};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Starts a session and flies the bird through `n` wide-open obstacles.
fn score_points(game: &mut Game, rng: &mut StdRng, n: usize) {
    if game.state != GameState::Playing {
        game.impulse(rng);
    }
    game.stream.clear();
    for i in 0..n {
        game.stream.insert(Obstacle {
            x: 110.0 + i as f64 * 30.0,
            gap_size: 368.0,
            gap_y: 150.0,
            scored: false,
        });
    }
    for _ in 0..(n * 10 + 10) {
        game.avatar.y = 320.0;
        game.avatar.vel = 0.0;
        game.tick(rng);
    }
    assert_eq!(game.state, GameState::Playing);
}

fn crash(game: &mut Game, rng: &mut StdRng) {
    game.avatar.y = 700.0;
    game.tick(rng);
    assert_eq!(game.state, GameState::GameOver);
}

#[test]
fn best_score_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.json");
    let mut rng = StdRng::seed_from_u64(42);

    let mut first = Game::new(Tuning::default(), Box::new(JsonScoreStore::new(&path)));
    assert_eq!(first.best(), 0);
    score_points(&mut first, &mut rng, 3);
    assert_eq!(first.score(), 3);
    crash(&mut first, &mut rng);
    drop(first);

    assert_eq!(JsonScoreStore::new(&path).load(), 3);
    let second = Game::new(Tuning::default(), Box::new(JsonScoreStore::new(&path)));
    assert_eq!(second.best(), 3);
    assert_eq!(second.score(), 0);
}

#[test]
fn best_score_never_decreases_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.json");
    let mut rng = StdRng::seed_from_u64(5);
    let mut game = Game::new(Tuning::default(), Box::new(JsonScoreStore::new(&path)));

    let mut last_best = 0;
    for points in [2, 5, 1, 0, 4, 6] {
        score_points(&mut game, &mut rng, points);
        crash(&mut game, &mut rng);
        assert!(game.best() >= last_best);
        last_best = game.best();
        game.impulse(&mut rng); // GAME_OVER -> START
    }
    assert_eq!(last_best, 6);
    assert_eq!(JsonScoreStore::new(&path).load(), 6);
}

#[test]
fn new_best_is_announced_once_per_improvement() {
    let mut rng = StdRng::seed_from_u64(8);
    let dir = tempfile::tempdir().unwrap();
    let mut game = Game::new(
        Tuning::default(),
        Box::new(JsonScoreStore::new(dir.path().join("hs.json"))),
    );
    game.impulse(&mut rng);
    game.stream.clear();
    game.stream.insert(Obstacle {
        x: 102.0,
        gap_size: 368.0,
        gap_y: 150.0,
        scored: false,
    });

    game.avatar.y = 320.0;
    let events = game.tick(&mut rng);
    assert!(events.contains(&GameEvent::NewBest(1)));

    game.avatar.y = 320.0;
    let events = game.tick(&mut rng);
    assert!(!events.iter().any(|e| matches!(e, GameEvent::NewBest(_))));
}

#[test]
fn unwritable_store_keeps_the_game_running() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be makes every write fail.
    let path = dir.path().join("highscore.json");
    std::fs::create_dir(&path).unwrap();

    let mut rng = StdRng::seed_from_u64(1);
    let mut game = Game::new(Tuning::default(), Box::new(JsonScoreStore::new(&path)));
    score_points(&mut game, &mut rng, 2);
    assert_eq!(game.best(), 2);
}

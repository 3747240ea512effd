//! The START / PLAYING / GAME_OVER state machine.
//!
//! [`Game`] owns every entity of a session. Input arrives as impulses through
//! [`Game::impulse`], time advances through [`Game::tick`], and both report
//! what the presentation layer should do as a list of [`GameEvent`]s.

use log::{info, warn};
use rand::Rng;

use crate::audio::Cue;
use crate::avatar::Avatar;
use crate::config::Tuning;
use crate::score::ScoreStore;
use crate::stream::ObstacleStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Start,
    Playing,
    GameOver,
}

/// Side effects requested by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(Cue),
    MusicStart,
    MusicStop,
    /// The best score was raised (and saved) to this value.
    NewBest(u32),
}

// ── Session ─────────────────────────────────────────────────────────────────

/// Current and best score, with the store the best one lives in.
pub struct Session {
    pub score: u32,
    best: u32,
    store: Box<dyn ScoreStore>,
}

impl Session {
    /// Loads the best score once.
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        let best = store.load();
        info!("loaded best score {best}");
        Self {
            score: 0,
            best,
            store,
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Raises and persists the best score if the current score beats it.
    /// A failed write is logged; the in-memory best still moves.
    pub fn record_best(&mut self) -> bool {
        if self.score <= self.best {
            return false;
        }
        self.best = self.score;
        if let Err(e) = self.store.save(self.best) {
            warn!("could not save best score {}: {e}", self.best);
        }
        true
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("score", &self.score)
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}

// ── Game ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Game {
    pub tuning: Tuning,
    pub state: GameState,
    pub avatar: Avatar,
    pub stream: ObstacleStream,
    pub session: Session,
    /// Ground strip offset, in `(-win_width, 0]`.
    pub ground_x: f64,
}

impl Game {
    pub fn new(tuning: Tuning, store: Box<dyn ScoreStore>) -> Self {
        Self {
            avatar: Avatar::new(&tuning),
            stream: ObstacleStream::new(),
            session: Session::new(store),
            state: GameState::Start,
            ground_x: 0.0,
            tuning,
        }
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn best(&self) -> u32 {
        self.session.best()
    }

    /// Applies one flap/confirm input.
    pub fn impulse<R: Rng>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match self.state {
            GameState::Start => {
                self.stream
                    .spawn_initial(self.tuning.initial_obstacles, &self.tuning, rng);
                self.session.score = 0;
                self.avatar.vel = 0.0;
                self.avatar.impulse();
                self.state = GameState::Playing;
                events.push(GameEvent::Sound(Cue::Flap));
                info!("session started, best is {}", self.session.best());
            }
            GameState::Playing => {
                self.avatar.impulse();
                events.push(GameEvent::Sound(Cue::Flap));
            }
            GameState::GameOver => {
                self.reset();
                events.push(GameEvent::MusicStart);
            }
        }
        events
    }

    /// Runs one fixed simulation step.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.state == GameState::Playing {
            self.avatar.update();

            let outcome = self.stream.advance(&self.avatar, &self.tuning, rng);
            for _ in 0..outcome.points {
                self.session.score += 1;
                events.push(GameEvent::Sound(Cue::Point));
            }

            if outcome.collided {
                self.game_over("hit an obstacle", &mut events);
            } else if self.out_of_bounds() {
                self.game_over("left the sky", &mut events);
            }
        }

        if self.session.record_best() {
            events.push(GameEvent::NewBest(self.session.best()));
        }

        self.scroll_ground();
        self.avatar.animate();
        events
    }

    fn out_of_bounds(&self) -> bool {
        self.avatar.y + self.avatar.size() >= self.tuning.floor_y() || self.avatar.y < 0.0
    }

    fn game_over(&mut self, reason: &str, events: &mut Vec<GameEvent>) {
        self.state = GameState::GameOver;
        events.push(GameEvent::Sound(Cue::Hit));
        events.push(GameEvent::Sound(Cue::Die));
        events.push(GameEvent::MusicStop);
        info!(
            "game over ({reason}) with score {}, best {}",
            self.session.score,
            self.session.best()
        );
    }

    fn reset(&mut self) {
        self.avatar = Avatar::new(&self.tuning);
        self.stream.clear();
        self.session.score = 0;
        self.state = GameState::Start;
    }

    fn scroll_ground(&mut self) {
        let width = self.tuning.win_width;
        self.ground_x = -((-self.ground_x + self.tuning.obstacle_velocity) % width);
    }
}

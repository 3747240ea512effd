//! The ordered run of obstacles scrolling toward the bird.

use log::debug;
use rand::Rng;

use crate::avatar::Avatar;
use crate::config::Tuning;
use crate::obstacle::Obstacle;

/// What happened to the stream during one [`ObstacleStream::advance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Advance {
    pub collided: bool,
    /// Obstacles newly passed this tick.
    pub points: u32,
    pub retired: usize,
    pub spawned: usize,
}

/// Obstacles kept in increasing-x order.
#[derive(Debug, Clone, Default)]
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Adds an obstacle, keeping the stream ordered by x.
    pub fn insert(&mut self, obstacle: Obstacle) {
        let at = self.obstacles.partition_point(|o| o.x <= obstacle.x);
        self.obstacles.insert(at, obstacle);
    }

    /// Replaces the stream with `n` obstacles starting just past the right edge.
    pub fn spawn_initial<R: Rng>(&mut self, n: usize, tuning: &Tuning, rng: &mut R) {
        self.obstacles.clear();
        let mut next_x = tuning.spawn_x();
        for _ in 0..n {
            self.obstacles.push(Obstacle::new(next_x, tuning, rng));
            next_x += draw_spacing(tuning, rng);
        }
        debug!("spawned {n} obstacles, next slot at x={next_x}");
    }

    /// Moves every obstacle, tests it against the bird, latches scores, then
    /// replaces retired obstacles with one fresh obstacle on the right.
    pub fn advance<R: Rng>(&mut self, avatar: &Avatar, tuning: &Tuning, rng: &mut R) -> Advance {
        let mut outcome = Advance::default();
        let avatar_box = avatar.bounding_box();
        let floor_y = tuning.floor_y();

        for obstacle in &mut self.obstacles {
            obstacle.update(tuning.obstacle_velocity);
            if !outcome.collided
                && obstacle.collides_with(&avatar_box, tuning.obstacle_width, floor_y)
            {
                outcome.collided = true;
            }
            if !obstacle.scored && obstacle.is_passed(avatar.x) {
                obstacle.scored = true;
                outcome.points += 1;
            }
        }

        let before = self.obstacles.len();
        self.obstacles
            .retain(|o| !o.is_off_screen(tuning.obstacle_width));
        outcome.retired = before - self.obstacles.len();

        if outcome.retired > 0 {
            let x = match self.obstacles.last() {
                Some(rightmost) => rightmost.x + draw_spacing(tuning, rng),
                None => tuning.spawn_x(),
            };
            self.obstacles.push(Obstacle::new(x, tuning, rng));
            outcome.spawned = 1;
            debug!("retired {} obstacle(s), spawned one at x={x}", outcome.retired);
        }

        outcome
    }
}

fn draw_spacing<R: Rng>(tuning: &Tuning, rng: &mut R) -> f64 {
    rng.gen_range(tuning.spacing_min..=tuning.spacing_max) as f64
}

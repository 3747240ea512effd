//! The player-controlled bird.

use crate::config::Tuning;
use crate::rect::Rect;

/// Number of wing frames the animation cycles through.
pub const ANIMATION_FRAMES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub x: f64,
    pub y: f64,
    pub vel: f64,
    /// Ticks since the last impulse.
    pub tick_count: u32,
    pub frame_index: usize,
    animation_count: u32,

    size: f64,
    gravity: f64,
    flap_power: f64,
    max_vel_up: f64,
    max_vel_down: f64,
    animation_ticks: u32,
}

impl Avatar {
    /// A resting bird at the start position.
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.avatar_x,
            y: tuning.avatar_start_y(),
            vel: 0.0,
            tick_count: 0,
            frame_index: 0,
            animation_count: 0,
            size: tuning.avatar_size,
            gravity: tuning.gravity,
            flap_power: tuning.flap_power,
            max_vel_up: tuning.max_vel_up,
            max_vel_down: tuning.max_vel_down,
            animation_ticks: tuning.animation_ticks.max(1),
        }
    }

    /// Overwrites the vertical velocity with the flap power.
    pub fn impulse(&mut self) {
        self.vel = self.flap_power;
        self.tick_count = 0;
    }

    /// One physics step.
    pub fn update(&mut self) {
        self.tick_count = self.tick_count.saturating_add(1);

        if self.vel < self.max_vel_down {
            self.vel = (self.vel + self.gravity).min(self.max_vel_down);
        }
        if self.vel < -self.max_vel_up {
            self.vel = -self.max_vel_up;
        }

        self.y += self.vel;
    }

    /// Advances the wing animation. No gameplay effect.
    pub fn animate(&mut self) {
        self.animation_count = (self.animation_count + 1) % self.animation_ticks;
        if self.animation_count == 0 {
            self.frame_index = (self.frame_index + 1) % ANIMATION_FRAMES;
        }
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Visual tilt in degrees, nose up positive.
    pub fn rotation(&self) -> f64 {
        (self.vel * -3.0).clamp(-90.0, 30.0)
    }
}

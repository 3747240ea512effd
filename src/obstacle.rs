//! A single pipe pair with a randomly sized and placed gap.

use log::warn;
use rand::Rng;

use crate::config::Tuning;
use crate::rect::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    /// Height of the open passage.
    pub gap_size: f64,
    /// Top edge of the open passage.
    pub gap_y: f64,
    pub scored: bool,
}

impl Obstacle {
    /// Draws a gap that lies fully between the top margin and the floor margin.
    pub fn new<R: Rng>(x: f64, tuning: &Tuning, rng: &mut R) -> Self {
        let mut gap_size = rng.gen_range(tuning.gap_min..=tuning.gap_max);

        let min_gap_y = tuning.gap_margin;
        let mut max_gap_y = tuning.floor_y() as i32 - tuning.gap_margin - gap_size;
        if max_gap_y < min_gap_y {
            let clamped = tuning.max_placeable_gap().max(1);
            warn!("gap of {gap_size} does not fit between the margins, clamping to {clamped}");
            gap_size = clamped;
            max_gap_y = min_gap_y;
        }
        let gap_y = rng.gen_range(min_gap_y..=max_gap_y);

        Self {
            x,
            gap_size: gap_size as f64,
            gap_y: gap_y as f64,
            scored: false,
        }
    }

    pub fn update(&mut self, velocity: f64) {
        self.x -= velocity;
    }

    /// Solid part from the top of the screen down to the gap.
    pub fn upper_span(&self, width: f64) -> Rect {
        Rect::new(self.x, 0.0, width, self.gap_y)
    }

    /// Solid part from below the gap down to the floor.
    pub fn lower_span(&self, width: f64, floor_y: f64) -> Rect {
        let top = self.gap_y + self.gap_size;
        Rect::new(self.x, top, width, floor_y - top)
    }

    pub fn collides_with(&self, avatar_box: &Rect, width: f64, floor_y: f64) -> bool {
        avatar_box.intersects(&self.upper_span(width))
            || avatar_box.intersects(&self.lower_span(width, floor_y))
    }

    pub fn is_off_screen(&self, width: f64) -> bool {
        self.x + width < 0.0
    }

    pub fn is_passed(&self, avatar_x: f64) -> bool {
        self.x < avatar_x
    }
}

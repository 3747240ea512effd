//! Colors and sprites.
//!
//! Every visual is built in memory at startup: the bird frames are parsed
//! from palette tables, the rest is generated from the palette. Sprites are
//! stored at a low native resolution and scaled when drawn.

use anyhow::{Context, Result, bail, ensure};
use log::info;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

pub const SKY_TOP: Rgb = Rgb(70, 180, 200);
pub const SKY_BOT: Rgb = Rgb(190, 232, 245);
pub const GRASS: Rgb = Rgb(84, 168, 55);
pub const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
pub const DIRT: Rgb = Rgb(210, 185, 110);
pub const DIRT_DARK: Rgb = Rgb(185, 160, 90);
pub const PANEL: Rgb = Rgb(220, 195, 120);
pub const PIPE_L: Rgb = Rgb(74, 122, 26);
pub const PIPE_M: Rgb = Rgb(100, 170, 40);
pub const PIPE_R: Rgb = Rgb(115, 191, 46);
pub const PIPE_HI: Rgb = Rgb(145, 215, 62);
pub const CAP_DARK: Rgb = Rgb(60, 100, 20);
pub const BIRD_Y: Rgb = Rgb(245, 200, 66);
pub const BIRD_HI: Rgb = Rgb(255, 225, 100);
pub const BIRD_WING: Rgb = Rgb(215, 165, 35);
pub const BIRD_EYE: Rgb = Rgb(255, 255, 255);
pub const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
pub const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
pub const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
pub const HILL_FAR: Rgb = Rgb(120, 195, 75);
pub const HILL_NEAR: Rgb = Rgb(95, 175, 55);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const SHADOW: Rgb = Rgb(30, 30, 30);

fn palette(key: char) -> Option<Option<Rgb>> {
    let c = match key {
        '.' => return Some(None),
        'k' => SHADOW,
        'y' => BIRD_Y,
        'h' => BIRD_HI,
        'w' => BIRD_WING,
        'e' => BIRD_EYE,
        'p' => BIRD_PUPIL,
        'b' => BIRD_BEAK,
        'o' => BIRD_BEAK_HI,
        _ => return None,
    };
    Some(Some(c))
}

// ── Sprite ──────────────────────────────────────────────────────────────────

/// A grid of pixels; `None` is transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub w: usize,
    pub h: usize,
    px: Vec<Option<Rgb>>,
}

impl Sprite {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![None; w * h],
        }
    }

    /// Parses rows of palette keys. All rows must be the same width.
    pub fn parse(rows: &[&str]) -> Result<Self> {
        let h = rows.len();
        let w = rows.first().map_or(0, |r| r.chars().count());
        ensure!(w > 0 && h > 0, "sprite table is empty");

        let mut sprite = Sprite::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != w {
                bail!("row {y} is {len} pixels wide, expected {w}");
            }
            for (x, key) in row.chars().enumerate() {
                let Some(c) = palette(key) else {
                    bail!("unknown palette key {key:?} at {x},{y}");
                };
                sprite.px[y * w + x] = c;
            }
        }
        Ok(sprite)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        self.px[y * self.w + x]
    }

    pub fn set(&mut self, x: usize, y: usize, c: Rgb) {
        if x < self.w && y < self.h {
            self.px[y * self.w + x] = Some(c);
        }
    }

    /// Upside-down copy.
    pub fn flipped_v(&self) -> Sprite {
        let mut out = Sprite::new(self.w, self.h);
        for y in 0..self.h {
            let src = (self.h - 1 - y) * self.w;
            out.px[y * self.w..(y + 1) * self.w].copy_from_slice(&self.px[src..src + self.w]);
        }
        out
    }
}

// ── Loader ──────────────────────────────────────────────────────────────────

#[rustfmt::skip]
const BIRD_DOWNFLAP: [&str; 12] = [
    "....kkkk....",
    "..kkhhhhkk..",
    ".khhyyyykeek",
    "khyyyyyyeepk",
    "khyyyyyyeepk",
    "kyyyyyyykkkk",
    "kwwwwyykbbbk",
    "kwwwwyykoook",
    ".kwwyyyykkk.",
    "..kkyyyyk...",
    "....kkkk....",
    "............",
];

#[rustfmt::skip]
const BIRD_MIDFLAP: [&str; 12] = [
    "....kkkk....",
    "..kkhhhhkk..",
    ".khhyyyykeek",
    "khyyyyyyeepk",
    "kwwwwyyyeepk",
    "kwwwwwyyykkk",
    "kywwwyykbbbk",
    "kyyyyyykoook",
    ".kyyyyyykkk.",
    "..kkyyyyk...",
    "....kkkk....",
    "............",
];

#[rustfmt::skip]
const BIRD_UPFLAP: [&str; 12] = [
    "....kkkk....",
    "..kwwhhhkk..",
    ".kwwwyyykeek",
    "kwwwwyyyeepk",
    "khwwyyyyeepk",
    "kyyyyyyykkkk",
    "kyyyyyykbbbk",
    "kyyyyyykoook",
    ".kyyyyyykkk.",
    "..kkyyyyk...",
    "....kkkk....",
    "............",
];

/// Native sprite resolution relative to world units.
const NATIVE_PER_WORLD: f64 = 0.25;

/// Everything the renderer draws.
#[derive(Debug, Clone)]
pub struct Assets {
    pub background: Sprite,
    pub bird_frames: [Sprite; 3],
    /// Lower span; the upper span is its vertical mirror.
    pub pipe: Sprite,
    pub pipe_top: Sprite,
    /// One period of the ground strip, as wide as the playfield.
    pub base: Sprite,
}

impl Assets {
    /// Builds every visual for a playfield of the given world size.
    pub fn load(
        win_width: f64,
        win_height: f64,
        base_height: f64,
        pipe_width: f64,
    ) -> Result<Self> {
        let native = |v: f64| ((v * NATIVE_PER_WORLD).round() as usize).max(1);
        let floor_y = win_height - base_height;

        let bird_frames = [
            Sprite::parse(&BIRD_DOWNFLAP).context("loading bird-downflap")?,
            Sprite::parse(&BIRD_MIDFLAP).context("loading bird-midflap")?,
            Sprite::parse(&BIRD_UPFLAP).context("loading bird-upflap")?,
        ];
        let background = sky(native(win_width), native(win_height), native(floor_y));
        // Ground stripes repeat every 12 native pixels, so the width must be a
        // multiple of 12 for the two copies to meet without a seam.
        let base_w = native(win_width).div_ceil(12) * 12;
        let base = ground(base_w, native(base_height));
        let pipe = pipe(native(pipe_width), native(floor_y));
        let pipe_top = pipe.flipped_v();

        info!(
            "built sprites: background {}x{}, pipe {}x{}, base {}x{}",
            background.w, background.h, pipe.w, pipe.h, base.w, base.h
        );
        Ok(Self {
            background,
            bird_frames,
            pipe,
            pipe_top,
            base,
        })
    }
}

fn sky(w: usize, h: usize, horizon: usize) -> Sprite {
    let mut s = Sprite::new(w, h);
    let horizon = horizon.min(h);
    for y in 0..h {
        let t = ((y * 256) / horizon.max(1)).min(256) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..w {
            s.set(x, y, c);
        }
    }

    // Far and near hills sitting on the horizon.
    let layers = [(HILL_FAR, 0.09, 6.0, 4.0), (HILL_NEAR, 0.14, 4.0, 2.0)];
    for (color, freq, amp, lift) in layers {
        for x in 0..w {
            let fx = x as f64 * freq;
            let height = fx.sin() * amp + (fx * 1.7).sin() * amp / 2.0 + lift + amp;
            let top = horizon.saturating_sub(height.max(0.0) as usize);
            for y in top..horizon {
                s.set(x, y, color);
            }
        }
    }
    s
}

fn ground(w: usize, h: usize) -> Sprite {
    let mut s = Sprite::new(w, h);
    for x in 0..w {
        let alt = (x / 3) % 2 == 0;
        s.set(x, 0, if alt { GRASS } else { GRASS_LIGHT });
        s.set(x, 1, GRASS);
    }
    for y in 2..h {
        for x in 0..w {
            let stripe = (x + (y - 2) * 2) % 12 < 6;
            s.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
    s
}

fn pipe(w: usize, h: usize) -> Sprite {
    let mut s = Sprite::new(w, h);
    let cap_h = (w / 3).clamp(2, h.max(2));
    let inset = if w > 4 { 1 } else { 0 };

    for y in 0..h {
        let (from, to) = if y < cap_h { (0, w) } else { (inset, w - inset) };
        for x in from..to {
            s.set(x, y, pipe_shade((x - from) as i32, (to - from) as i32));
        }
    }
    for x in 0..w {
        s.set(x, 0, CAP_DARK);
        s.set(x, cap_h - 1, CAP_DARK);
    }
    s
}

pub fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

//! Half-block terminal rendering.
//!
//! The world is drawn into a [`PixelBuf`] where every terminal cell holds two
//! vertical pixels (`▀` with foreground = top, background = bottom). A
//! [`Viewport`] fits the portrait playfield into the buffer.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::assets::{Assets, BIRD_Y, DIRT, PANEL, Rgb, SHADOW, SKY_TOP, Sprite, WHITE};
use crate::game::{Game, GameState};

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Halves every channel inside the rectangle.
    pub fn dim_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        for py in y.max(0)..(y + h).min(self.h as i32) {
            for px in x.max(0)..(x + w).min(self.w as i32) {
                let c = self.get(px as usize, py as usize);
                self.set(px, py, c.dim());
            }
        }
    }

    /// Nearest-neighbour stretch of `sprite` onto a pixel rectangle.
    pub fn blit_scaled(&mut self, sprite: &Sprite, x: f64, y: f64, w: f64, h: f64) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = x.floor().max(0.0) as i32;
        let y0 = y.floor().max(0.0) as i32;
        let x1 = (x + w).ceil().min(self.w as f64) as i32;
        let y1 = (y + h).ceil().min(self.h as f64) as i32;

        for py in y0..y1 {
            let v = (py as f64 + 0.5 - y) / h;
            if !(0.0..1.0).contains(&v) {
                continue;
            }
            let sy = (v * sprite.h as f64) as usize;
            for px in x0..x1 {
                let u = (px as f64 + 0.5 - x) / w;
                if !(0.0..1.0).contains(&u) {
                    continue;
                }
                let sx = (u * sprite.w as f64) as usize;
                if let Some(c) = sprite.get(sx, sy) {
                    self.set(px, py, c);
                }
            }
        }
    }

    /// Draws `sprite` as a `size` square centred on (`cx`, `cy`), turned
    /// counter-clockwise by `degrees`.
    pub fn blit_rotated(&mut self, sprite: &Sprite, cx: f64, cy: f64, size: f64, degrees: f64) {
        if size <= 0.0 {
            return;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let half = size / 2.0;
        let reach = (half * std::f64::consts::SQRT_2).ceil() as i32 + 1;

        for py in (cy as i32 - reach)..=(cy as i32 + reach) {
            for px in (cx as i32 - reach)..=(cx as i32 + reach) {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                // Undo the rotation to find the source pixel.
                let u = (dx * cos - dy * sin + half) / size;
                let v = (dx * sin + dy * cos + half) / size;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let sx = (u * sprite.w as f64) as usize;
                let sy = (v * sprite.h as f64) as usize;
                if let Some(c) = sprite.get(sx, sy) {
                    self.set(px, py, c);
                }
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── Viewport ────────────────────────────────────────────────────────────────

/// Maps world units onto buffer pixels, preserving aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub off_x: f64,
    pub off_y: f64,
    pub world_w: f64,
    pub world_h: f64,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize, world_w: f64, world_h: f64) -> Self {
        let scale = (ph as f64 / world_h).min(pw as f64 / world_w);
        Self {
            scale,
            off_x: ((pw as f64 - world_w * scale) / 2.0).floor(),
            off_y: ((ph as f64 - world_h * scale) / 2.0).floor(),
            world_w,
            world_h,
        }
    }

    pub fn x(&self, wx: f64) -> f64 {
        self.off_x + wx * self.scale
    }

    pub fn y(&self, wy: f64) -> f64 {
        self.off_y + wy * self.scale
    }

    pub fn scaled(&self, v: f64) -> f64 {
        v * self.scale
    }

    /// Pixel bounds of the playfield: (x, y, w, h).
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        (
            self.off_x as i32,
            self.off_y as i32,
            self.scaled(self.world_w).round() as i32,
            self.scaled(self.world_h).round() as i32,
        )
    }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn glyph(ch: char) -> Option<[u8; 15]> {
    let g = match ch.to_ascii_uppercase() {
        d @ '0'..='9' => DIGITS[(d as u8 - b'0') as usize],
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        _ => return None,
    };
    Some(g)
}

/// Width in pixels of `text` at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    (text.chars().count() as i32 * 4 - 1).max(0) * scale
}

/// Draws `text` centred on `cx` with a drop shadow. Unknown characters
/// render as blanks.
pub fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb, scale: i32) {
    let scale = scale.max(1);
    let start_x = cx - text_width(text, scale) / 2;
    // Shadow pass first so no shadow lands on a neighbouring stroke.
    for (shift, color) in [(scale, SHADOW), (0, fg)] {
        for (i, ch) in text.chars().enumerate() {
            let Some(g) = glyph(ch) else { continue };
            let gx = start_x + i as i32 * 4 * scale;
            for row in 0..5 {
                for col in 0..3 {
                    if g[row * 3 + col] == 1 {
                        let px = gx + col as i32 * scale + shift;
                        let py = y + row as i32 * scale + shift;
                        buf.fill_rect(px, py, scale, scale, color);
                    }
                }
            }
        }
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Draws a whole frame of `game` into `buf`.
pub fn draw(game: &Game, assets: &Assets, view: &Viewport, buf: &mut PixelBuf) {
    let t = &game.tuning;
    let floor_y = t.floor_y();

    buf.blit_scaled(
        &assets.background,
        view.x(0.0),
        view.y(0.0),
        view.scaled(t.win_width),
        view.scaled(t.win_height),
    );

    for o in game.stream.obstacles() {
        let lower_top = o.gap_y + o.gap_size;
        buf.blit_scaled(
            &assets.pipe,
            view.x(o.x),
            view.y(lower_top),
            view.scaled(t.obstacle_width),
            view.scaled(floor_y),
        );
        buf.blit_scaled(
            &assets.pipe_top,
            view.x(o.x),
            view.y(o.gap_y - floor_y),
            view.scaled(t.obstacle_width),
            view.scaled(floor_y),
        );
    }

    for copy in 0..2 {
        buf.blit_scaled(
            &assets.base,
            view.x(game.ground_x + copy as f64 * t.win_width),
            view.y(floor_y),
            view.scaled(t.win_width),
            view.scaled(t.base_height),
        );
    }

    let bird = &game.avatar;
    let half = bird.size() / 2.0;
    buf.blit_rotated(
        &assets.bird_frames[bird.frame_index],
        view.x(bird.x + half),
        view.y(bird.y + half),
        view.scaled(bird.size()).max(3.0),
        bird.rotation(),
    );

    draw_overlay(game, view, buf);
    letterbox(view, buf);
}

fn draw_overlay(game: &Game, view: &Viewport, buf: &mut PixelBuf) {
    let (vx, vy, vw, vh) = view.bounds();
    let cx = vx + vw / 2;
    let cy = vy + vh / 2;
    let scale = (vw / 60).max(1);
    let line = 7 * scale;

    match game.state {
        GameState::Start => {
            draw_text(buf, cx, cy - 3 * line, "PRESS SPACE", WHITE, scale);
            draw_text(buf, cx, cy - 2 * line, "TO START", WHITE, scale);
            draw_text(buf, cx, cy + line, &format!("BEST {}", game.best()), BIRD_Y, scale);
        }
        GameState::Playing => {}
        GameState::GameOver => {
            buf.dim_rect(vx, vy, vw, vh);
            let panel_w = (text_width("TO RESTART", scale) + 6 * scale).min(vw);
            let panel_h = 5 * line;
            let px = cx - panel_w / 2;
            let py = cy - panel_h / 2;
            buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
            buf.fill_rect(px, py, panel_w, panel_h, DIRT);
            buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);
            draw_text(buf, cx, py + scale * 2, "GAME OVER", WHITE, scale);
            let best = format!("BEST {}", game.best());
            draw_text(buf, cx, py + scale * 2 + line, &best, BIRD_Y, scale);
            draw_text(buf, cx, py + scale * 2 + 3 * line, "PRESS SPACE", WHITE, scale);
            draw_text(buf, cx, py + scale * 2 + 4 * line, "TO RESTART", WHITE, scale);
        }
    }

    // Score on top of everything else.
    let score_y = view.y(50.0) as i32;
    draw_text(buf, cx, score_y, &game.score().to_string(), WHITE, scale);
}

fn letterbox(view: &Viewport, buf: &mut PixelBuf) {
    let (vx, vy, vw, vh) = view.bounds();
    let (bw, bh) = (buf.width() as i32, buf.height() as i32);
    buf.fill_rect(0, 0, vx, bh, SHADOW);
    buf.fill_rect(vx + vw, 0, bw - vx - vw, bh, SHADOW);
    buf.fill_rect(0, 0, bw, vy, SHADOW);
    buf.fill_rect(0, vy + vh, bw, bh - vy - vh, SHADOW);
}

//! Sound cues and background music.
//!
//! Every sound is synthesized with fundsp once at startup into a sample
//! buffer; playback just queues a copy on a detached rodio sink.

use anyhow::{Context, Result};
use fundsp::prelude::*;
use log::{debug, info};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};

const SAMPLE_RATE: u32 = 44_100;
const MUSIC_VOLUME: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Flap,
    Hit,
    Point,
    Die,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Flap, Cue::Hit, Cue::Point, Cue::Die];

    pub fn name(&self) -> &'static str {
        match self {
            Cue::Flap => "flap",
            Cue::Hit => "hit",
            Cue::Point => "score",
            Cue::Die => "death",
        }
    }
}

/// Fire-and-forget playback. Implementations swallow their own failures.
pub trait Audio {
    fn play(&mut self, cue: Cue);
    fn start_music(&mut self);
    fn stop_music(&mut self);
}

/// Plays nothing.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl Audio for SilentAudio {
    fn play(&mut self, _cue: Cue) {}
    fn start_music(&mut self) {}
    fn stop_music(&mut self) {}
}

// ── Rodio output ────────────────────────────────────────────────────────────

pub struct RodioAudio {
    stream: OutputStream,
    cues: Vec<(Cue, Vec<f32>)>,
    music_track: Vec<f32>,
    music: Option<Sink>,
}

impl RodioAudio {
    /// Opens the default output device and renders every sound.
    pub fn open() -> Result<Self> {
        let mut stream =
            OutputStreamBuilder::open_default_stream().context("no audio output device")?;
        stream.log_on_drop(false);

        let cues = Cue::ALL.iter().map(|&cue| (cue, synth_cue(cue))).collect();
        let music_track = synth_music();
        info!(
            "audio ready: {} cues, {:.1}s music loop",
            Cue::ALL.len(),
            music_track.len() as f32 / SAMPLE_RATE as f32
        );

        Ok(Self {
            stream,
            cues,
            music_track,
            music: None,
        })
    }

    fn buffer(samples: &[f32]) -> SamplesBuffer {
        SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec())
    }
}

impl Audio for RodioAudio {
    fn play(&mut self, cue: Cue) {
        let Some((_, samples)) = self.cues.iter().find(|(c, _)| *c == cue) else {
            return;
        };
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(Self::buffer(samples));
        sink.detach(); // Play in background
        debug!("cue {}", cue.name());
    }

    fn start_music(&mut self) {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(MUSIC_VOLUME);
        sink.append(Self::buffer(&self.music_track).repeat_infinite());
        // Replacing the old sink drops it, which silences it.
        self.music = Some(sink);
    }

    fn stop_music(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }
}

// ── Synthesis ───────────────────────────────────────────────────────────────

fn render(seconds: f32, mut next: impl FnMut() -> f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..n).map(|_| next()).collect()
}

/// Linear ramp from `a` to `b` over `span` seconds, then hold.
fn glide(a: f32, b: f32, t: f32, span: f32) -> f32 {
    a + (b - a) * (t / span).min(1.0)
}

fn synth_cue(cue: Cue) -> Vec<f32> {
    match cue {
        Cue::Flap => {
            let freq = lfo(|t| glide(280.0, 720.0, t, 0.07));
            let gain = lfo(|t| glide(0.12, 0.0, t, 0.09));
            let mut node = (freq >> square()) * gain;
            render(0.09, || node.get_mono())
        }
        Cue::Hit => {
            let gain = lfo(|t| glide(0.25, 0.0, t, 0.12));
            let mut node = (noise() >> lowpass_hz(1800.0, 0.7)) * gain;
            render(0.12, || node.get_mono())
        }
        Cue::Point => {
            let freq = lfo(|t| if t < 0.07 { 988.0_f32 } else { 1319.0 });
            let gain = lfo(|t| {
                if t < 0.07 {
                    0.12_f32
                } else {
                    glide(0.12, 0.0, t - 0.07, 0.18)
                }
            });
            let mut node = (freq >> sine::<f32>()) * gain;
            render(0.25, || node.get_mono())
        }
        Cue::Die => {
            // 400Hz down to 80Hz over 0.4s, fading out over 0.5s.
            let freq = lfo(|t| glide(400.0, 80.0, t, 0.4));
            let gain = lfo(|t| glide(0.15, 0.0, t, 0.5));
            let mut node = (freq >> saw()) * gain;
            render(0.5, || node.get_mono())
        }
    }
}

/// A short arpeggio loop, quiet enough to sit under the cues.
fn synth_music() -> Vec<f32> {
    const NOTES: [f32; 8] = [523.25, 659.25, 783.99, 659.25, 587.33, 698.46, 880.0, 698.46];
    const NOTE_SECS: f32 = 0.22;

    let mut track = Vec::new();
    for freq in NOTES {
        let gain = lfo(|t| glide(0.08, 0.01, t, NOTE_SECS));
        let mut node = (sine_hz::<f32>(freq) + sine_hz::<f32>(freq * 0.5) * 0.5) * gain;
        track.extend(render(NOTE_SECS, || node.get_mono()));
    }
    track
}

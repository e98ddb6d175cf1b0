//! Sound cues for the wheel.
//!
//! The tones are cosmetic. Each cue carries its tone sequence as plain data
//! so a backend can synthesize it; the terminal backend just rings the bell.
//! A [`SoundBoard`] is created once at startup, lent to whatever needs to make
//! noise, and dropped at shutdown.

use std::{
    io::Write,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Start,
    Tick,
    Win,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// One synthesized note: frequency sweeps from `from_hz` to `to_hz` over
/// `length`, beginning `offset` after the cue fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub from_hz: f32,
    pub to_hz: f32,
    pub offset: Duration,
    pub length: Duration,
    pub peak_gain: f32,
    pub wave: Waveform,
}

const fn note(hz: f32, offset_ms: u64, length_ms: u64, peak_gain: f32, wave: Waveform) -> Tone {
    Tone {
        from_hz: hz,
        to_hz: hz,
        offset: Duration::from_millis(offset_ms),
        length: Duration::from_millis(length_ms),
        peak_gain,
        wave,
    }
}

// Rising three-pop arpeggio
const START_TONES: [Tone; 3] = [
    note(440., 0, 200, 0.1, Waveform::Sine),
    note(554., 100, 200, 0.1, Waveform::Sine),
    note(659., 200, 200, 0.1, Waveform::Sine),
];

const TICK_TONES: [Tone; 1] = [Tone {
    from_hz: 600.,
    to_hz: 300.,
    offset: Duration::ZERO,
    length: Duration::from_millis(50),
    peak_gain: 0.05,
    wave: Waveform::Sine,
}];

// C5 E5 G5 C6
const WIN_TONES: [Tone; 4] = [
    note(523.25, 0, 700, 0.15, Waveform::Triangle),
    note(659.25, 100, 700, 0.15, Waveform::Triangle),
    note(783.99, 200, 700, 0.15, Waveform::Triangle),
    note(1046.5, 300, 700, 0.15, Waveform::Triangle),
];

impl Cue {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::Start => &START_TONES,
            Cue::Tick => &TICK_TONES,
            Cue::Win => &WIN_TONES,
        }
    }

    /// Time from firing until the last tone ends.
    pub fn length(self) -> Duration {
        self.tones()
            .iter()
            .map(|t| t.offset + t.length)
            .max()
            .unwrap_or_default()
    }
}

/// Output device for cues.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Discards every cue.
#[derive(Debug, Default)]
pub struct Silent;

impl CueSink for Silent {
    fn play(&mut self, _cue: Cue) {}
}

/// Rings the terminal bell. Ticks closer together than the bell can sound
/// are dropped.
#[derive(Debug)]
pub struct TerminalBell {
    min_gap: Duration,
    last: Option<Instant>,
}

impl TerminalBell {
    pub fn new() -> TerminalBell {
        TerminalBell {
            min_gap: Cue::Tick.length(),
            last: None,
        }
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        TerminalBell::new()
    }
}

impl CueSink for TerminalBell {
    fn play(&mut self, cue: Cue) {
        let now = Instant::now();
        if cue == Cue::Tick {
            if let Some(last) = self.last {
                if now.duration_since(last) < self.min_gap {
                    return;
                }
            }
        }
        self.last = Some(now);
        let mut err = std::io::stderr();
        // A bell that fails to ring is not worth surfacing
        if err.write_all(b"\x07").and_then(|_| err.flush()).is_err() {
            log::trace!("Bell write failed for {:?}", cue);
        }
    }
}

/// Owned sound resource. Counts what it played for the shutdown log.
pub struct SoundBoard {
    sink: Box<dyn CueSink>,
    starts: usize,
    ticks: usize,
    wins: usize,
}

impl SoundBoard {
    pub fn new(sink: Box<dyn CueSink>) -> SoundBoard {
        log::debug!("Sound board opened");
        SoundBoard {
            sink,
            starts: 0,
            ticks: 0,
            wins: 0,
        }
    }

    pub fn terminal() -> SoundBoard {
        SoundBoard::new(Box::new(TerminalBell::new()))
    }

    pub fn silent() -> SoundBoard {
        SoundBoard::new(Box::new(Silent))
    }

    pub fn play(&mut self, cue: Cue) {
        match cue {
            Cue::Start => self.starts += 1,
            Cue::Tick => self.ticks += 1,
            Cue::Win => self.wins += 1,
        }
        self.sink.play(cue);
    }

    pub fn played(&self, cue: Cue) -> usize {
        match cue {
            Cue::Start => self.starts,
            Cue::Tick => self.ticks,
            Cue::Win => self.wins,
        }
    }
}

impl Drop for SoundBoard {
    fn drop(&mut self) {
        log::debug!(
            "Sound board closed ({} starts, {} ticks, {} wins)",
            self.starts,
            self.ticks,
            self.wins
        );
    }
}

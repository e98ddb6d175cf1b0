//! Terminal presentation. Reads the layout and live rotation each frame;
//! the wheel core never calls in here.

use std::{io::Write, time::Duration};

use rand::{seq::SliceRandom, Rng};

use crate::{
    audio::{Cue, SoundBoard},
    classroom::Level,
    frame_loop::SpinObserver,
    layout::{compute_slices, Rgb, PALETTE},
    roster::Entry,
    spin::{pointer_index, Frame, Spinner},
};

/// Slices shown either side of the one under the pointer.
const NEIGHBORS: usize = 2;
const CELL_WIDTH: usize = 10;
const POINTER: &str = "▼";
const POINTER_DEFLECTED: &str = "◣";
pub const FALLBACK_MESSAGE: &str = "Tiết học của chúng ta bắt đầu thôi!";
const SPARKLES: [char; 5] = ['✦', '✧', '★', '·', '*'];

fn paint(text: &str, bg: Rgb, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    // Dark text on light slices
    let fg = if bg.luminance() > 0.6 { "30" } else { "97" };
    format!("\x1b[1;{fg};48;2;{};{};{}m{text}\x1b[0m", bg.0, bg.1, bg.2)
}

fn fit(label: &str, width: usize) -> String {
    let chars = label.chars().count();
    if chars > width {
        let mut cut = label.chars().take(width.saturating_sub(1)).collect::<String>();
        cut.push('…');
        cut
    } else {
        let pad = width - chars;
        format!("{}{}{}", " ".repeat(pad / 2), label, " ".repeat(pad - pad / 2))
    }
}

/// One-line view of the wheel around the pointer.
pub struct WheelView<W: Write> {
    out: W,
    color: bool,
    jitter: Duration,
    deflected_until: Option<Duration>,
    entries: Vec<Entry>,
}

impl<W: Write> WheelView<W> {
    pub fn new(out: W, color: bool, jitter: Duration) -> WheelView<W> {
        WheelView {
            out,
            color,
            jitter,
            deflected_until: None,
            entries: Vec::new(),
        }
    }

    /// Builds the strip for `entries` at `rotation`; the slice under the
    /// pointer is bracketed.
    pub fn strip(&self, entries: &[Entry], rotation: f64, pointer: f64, deflected: bool) -> String {
        let Ok(slices) = compute_slices(entries, rotation) else {
            return String::new();
        };
        let n = slices.len();
        let Ok(center) = pointer_index(rotation, n, pointer) else {
            return String::new();
        };

        let mut line = String::new();
        line.push_str(if deflected { POINTER_DEFLECTED } else { POINTER });
        line.push(' ');
        let shown = (2 * NEIGHBORS + 1).min(n);
        let first = center + n - shown / 2;
        for k in 0..shown {
            let i = (first + k) % n;
            let label = fit(&entries[i].label, CELL_WIDTH);
            let cell = if i == center {
                format!("[{label}]")
            } else {
                format!(" {label} ")
            };
            let bg = slices[i].color();
            line.push_str(&paint(&cell, if i == center { bg } else { bg.shade(-30) }, self.color));
        }
        line
    }

    pub fn draw(&mut self, rotation: f64, pointer: f64, now: Duration) {
        let deflected = self.deflected_until.is_some_and(|until| now < until);
        let strip = self.strip(&self.entries, rotation, pointer, deflected);
        // Redraw in place
        let written = write!(self.out, "\r\x1b[2K{strip}").and_then(|_| self.out.flush());
        if let Err(e) = written {
            log::trace!("Wheel redraw failed: {e}");
        }
    }

    pub fn deflect(&mut self, now: Duration) {
        self.deflected_until = Some(now + self.jitter);
    }

    pub fn finish(&mut self) {
        if let Err(e) = writeln!(self.out).and_then(|_| self.out.flush()) {
            log::trace!("Wheel finish failed: {e}");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Everything the terminal shows and plays while a spin runs.
pub struct Stage<'a, W: Write> {
    pub view: WheelView<W>,
    pub sound: &'a mut SoundBoard,
}

impl<W: Write> SpinObserver for Stage<'_, W> {
    fn on_frame(&mut self, spinner: &Spinner, frame: &Frame, now: Duration) {
        if let Some(snapshot) = spinner.snapshot() {
            // A new spin may carry other labels at the same size
            if self.view.entries.as_slice() != snapshot {
                self.view.entries = snapshot.to_vec();
            }
        }
        self.view.draw(frame.rotation, spinner.pointer(), now);
    }

    fn on_tick(&mut self, now: Duration) {
        self.sound.play(Cue::Tick);
        self.view.deflect(now);
    }

    fn on_result(&mut self, _winner: &Entry) {
        self.view.finish();
        self.sound.play(Cue::Win);
    }
}

/// Row of colored sparkles standing in for confetti.
pub fn sparkle_row<R: Rng + ?Sized>(rng: &mut R, width: usize, color: bool) -> String {
    let mut row = String::new();
    for _ in 0..width {
        if rng.gen_bool(0.4) {
            row.push(' ');
            continue;
        }
        // Non-empty constants
        let glyph = *SPARKLES.choose(rng).unwrap_or(&'*');
        let c = *PALETTE.choose(rng).unwrap_or(&PALETTE[0]);
        if color {
            row.push_str(&format!("\x1b[38;2;{};{};{}m{glyph}\x1b[0m", c.0, c.1, c.2));
        } else {
            row.push(glyph);
        }
    }
    row
}

/// Framed result card.
pub fn result_banner(winner: &Entry, level: Level, subject: &str, message: Option<&str>) -> String {
    let heading = "NGƯỜI ĐƯỢC CHỌN LÀ";
    let context = format!("{level} · {subject}");
    let body = match message {
        Some(msg) => format!("“{msg}”"),
        None => FALLBACK_MESSAGE.to_string(),
    };
    let lines = [heading, "", winner.label.as_str(), "", body.as_str(), "", context.as_str()];
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;

    let mut out = String::new();
    out.push_str(&format!("╭{}╮\n", "─".repeat(inner)));
    for line in lines {
        out.push_str(&format!("│{}│\n", fit(line, inner)));
    }
    out.push_str(&format!("╰{}╯\n", "─".repeat(inner)));
    out
}

//! Angular layout of the wheel: one equal-width slice per entry, each with a
//! color drawn cyclically from a fixed palette.

use std::{f64::consts::TAU, fmt::Display};

use crate::error::WheelError;

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Unpacks a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Rgb {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Shifts every channel by `amount`, saturating at 0 and 255.
    pub fn shade(self, amount: i16) -> Rgb {
        let ch = |c: u8| (c as i16 + amount).clamp(0, 255) as u8;
        Rgb(ch(self.0), ch(self.1), ch(self.2))
    }

    /// Relative luminance in [0, 1], used to pick a legible label color.
    pub fn luminance(self) -> f64 {
        (0.2126 * self.0 as f64 + 0.7152 * self.1 as f64 + 0.0722 * self.2 as f64) / 255.
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Paint palette; adjacent slices always differ.
pub const PALETTE: [Rgb; 14] = [
    Rgb::from_hex(0xFF595E),
    Rgb::from_hex(0xFF924C),
    Rgb::from_hex(0xFFCA3A),
    Rgb::from_hex(0xC5CA30),
    Rgb::from_hex(0x8AC926),
    Rgb::from_hex(0x52A675),
    Rgb::from_hex(0x1982C4),
    Rgb::from_hex(0x4267AC),
    Rgb::from_hex(0x6A4C93),
    Rgb::from_hex(0x9B5DE5),
    Rgb::from_hex(0xF15BB5),
    Rgb::from_hex(0xFEE440),
    Rgb::from_hex(0x00BBF9),
    Rgb::from_hex(0x00F5D4),
];

/// Angular interval `[start, end)` of one entry, in radians. Bounds include
/// the wheel's rotation so they may lie outside `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub start: f64,
    pub end: f64,
    pub color_index: usize,
}

impl Slice {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn color(&self) -> Rgb {
        PALETTE[self.color_index]
    }

    /// Checks if an angle (any real, taken modulo 2π) falls in this slice.
    pub fn contains(&self, angle: f64) -> bool {
        wrap_angle(angle - self.start) < self.width()
    }
}

/// Reduces an angle to `[0, 2π)`.
pub fn wrap_angle(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.
    } else {
        wrapped
    }
}

/// Width of each slice for `n` entries.
pub fn slice_width(n: usize) -> Result<f64, WheelError> {
    if n == 0 {
        return Err(WheelError::DegenerateLayout);
    }
    Ok(TAU / n as f64)
}

/// Lays out one slice per entry, offset uniformly by `rotation`.
pub fn compute_slices<T>(entries: &[T], rotation: f64) -> Result<Vec<Slice>, WheelError> {
    let width = slice_width(entries.len())?;
    Ok((0..entries.len())
        .map(|i| Slice {
            start: rotation + i as f64 * width,
            end: rotation + (i + 1) as f64 * width,
            color_index: i % PALETTE.len(),
        })
        .collect())
}

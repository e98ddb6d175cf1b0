//! Spin animator and resolver.
//!
//! A spin commits to a target rotation up front (current rotation plus a
//! continuous number of extra turns), eases towards it over a fixed duration,
//! and reports a tick each time the pointer moves onto a different slice. When
//! the duration elapses the wheel freezes on the target and the entry under
//! the pointer wins. The winner is never chosen first: it falls out of the
//! final angle, so fairness rests on the revolution draw being continuous.
//!
//! [`Spinner::step`] is a pure function of the timestamp it is given; the
//! caller supplies time (see [`crate::clock`]) so tests never need real timers.

use std::{f64::consts::TAU, ops::Range, time::Duration};

use rand::Rng;

use crate::{
    error::{Precondition, WheelError},
    layout::{slice_width, wrap_angle},
    params::Params,
    roster::Entry,
};

/// Something the pointer observed during a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinEvent {
    /// The pointer crossed onto another slice.
    Tick,
    /// The wheel settled; carries the winner from the spin's snapshot.
    Resolved(Entry),
}

/// Output of one animation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Rotation to draw this frame
    pub rotation: f64,
    /// Normalized progress in [0, 1]
    pub progress: f64,
    pub events: Vec<SpinEvent>,
    /// Set on the frame that resolved the spin
    pub done: bool,
}

/// Read-only view of an in-flight spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinState {
    pub rotation: f64,
    pub start_rotation: f64,
    pub target_rotation: f64,
    pub started_at: Duration,
    pub last_index: usize,
}

/// Quartic ease-out: fast start, zero velocity at `progress == 1`.
pub fn ease_out_quart(progress: f64) -> f64 {
    let p = progress.clamp(0., 1.);
    1. - (1. - p).powi(4)
}

/// Index of the slice under a pointer at `pointer` radians, for a wheel of
/// `n` equal slices rotated by `rotation`. Shared by tick detection and
/// resolution so the last tick and the winner always agree.
pub fn pointer_index(rotation: f64, n: usize, pointer: f64) -> Result<usize, WheelError> {
    let width = slice_width(n)?;
    Ok(index_under(rotation, pointer, width, n))
}

/// Entry under the pointer once the wheel has stopped at `rotation`.
pub fn resolve<T>(snapshot: &[T], rotation: f64, pointer: f64) -> Result<&T, WheelError> {
    let index = pointer_index(rotation, snapshot.len(), pointer)?;
    Ok(&snapshot[index])
}

fn index_under(rotation: f64, pointer: f64, width: f64, n: usize) -> usize {
    // Rotation is unbounded; reduce before mapping
    let local = wrap_angle(pointer - rotation);
    (local / width).floor() as usize % n
}

/// A spin in progress.
#[derive(Debug, Clone)]
struct Flight {
    snapshot: Vec<Entry>,
    width: f64,
    from: f64,
    target: f64,
    started_at: Duration,
    last_index: usize,
}

/// Two-state (idle/spinning) wheel animator.
#[derive(Debug, Clone)]
pub struct Spinner {
    duration: Duration,
    revolutions: Range<f64>,
    tick_cutoff: f64,
    pointer: f64,

    /// Current rotation; accumulates across spins
    rotation: f64,
    flight: Option<Flight>,
}

impl Spinner {
    pub fn new(params: &Params) -> Spinner {
        Spinner {
            duration: params.spin_duration,
            revolutions: params.revolutions.clone(),
            tick_cutoff: params.tick_cutoff,
            pointer: params.pointer_angle,
            rotation: 0.,
            flight: None,
        }
    }

    /// Starts a spin with a random number of extra turns.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        snapshot: Vec<Entry>,
        rng: &mut R,
        now: Duration,
    ) -> Result<(), WheelError> {
        self.check_can_start(&snapshot)?;
        let extra = if self.revolutions.is_empty() {
            self.revolutions.start
        } else {
            rng.gen_range(self.revolutions.clone())
        };
        log::debug!("Spinning {} entries, {:.4} extra turns", snapshot.len(), extra);
        let target = self.rotation + extra * TAU;
        self.launch(snapshot, target, now)
    }

    /// Starts a spin towards a fixed target rotation. Used to replay or
    /// script a spin; the winner still comes from the final angle.
    pub fn start_towards(
        &mut self,
        snapshot: Vec<Entry>,
        target: f64,
        now: Duration,
    ) -> Result<(), WheelError> {
        self.check_can_start(&snapshot)?;
        self.launch(snapshot, target, now)
    }

    fn check_can_start(&self, snapshot: &[Entry]) -> Result<(), WheelError> {
        if self.flight.is_some() {
            log::debug!("Ignoring start; wheel already spinning");
            return Err(WheelError::PreconditionViolation(Precondition::AlreadySpinning));
        }
        if snapshot.is_empty() {
            return Err(WheelError::PreconditionViolation(Precondition::EmptyRoster));
        }
        Ok(())
    }

    fn launch(&mut self, snapshot: Vec<Entry>, target: f64, now: Duration) -> Result<(), WheelError> {
        let width = slice_width(snapshot.len())?;
        let last_index = index_under(self.rotation, self.pointer, width, snapshot.len());
        log::trace!(
            "Spin {:.4} -> {:.4} rad, starting under slice {}",
            self.rotation,
            target,
            last_index
        );
        self.flight = Some(Flight {
            snapshot,
            width,
            from: self.rotation,
            target,
            started_at: now,
            last_index,
        });
        Ok(())
    }

    /// Advances the animation to `now`. Returns `None` when idle.
    pub fn step(&mut self, now: Duration) -> Option<Frame> {
        let duration = self.duration;
        let (tick_cutoff, pointer) = (self.tick_cutoff, self.pointer);
        let flight = self.flight.as_mut()?;

        let elapsed = now.saturating_sub(flight.started_at);
        let progress = if duration.is_zero() {
            1.
        } else {
            (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.)
        };

        let mut events = Vec::new();
        let n = flight.snapshot.len();

        if progress < 1. {
            let rotation = flight.from + (flight.target - flight.from) * ease_out_quart(progress);
            let index = index_under(rotation, pointer, flight.width, n);
            if index != flight.last_index {
                flight.last_index = index;
                if progress < tick_cutoff {
                    log::trace!("Tick onto slice {} at progress {:.3}", index, progress);
                    events.push(SpinEvent::Tick);
                }
            }
            self.rotation = rotation;
            return Some(Frame {
                rotation,
                progress,
                events,
                done: false,
            });
        }

        // Settle exactly on the committed target
        let rotation = flight.target;
        let index = index_under(rotation, pointer, flight.width, n);
        let winner = flight.snapshot[index].clone();
        log::debug!("Wheel stopped on {} (slice {} of {})", winner, index, n);
        events.push(SpinEvent::Resolved(winner));

        self.rotation = rotation;
        self.flight = None;
        Some(Frame {
            rotation,
            progress,
            events,
            done: true,
        })
    }

    pub fn is_spinning(&self) -> bool {
        self.flight.is_some()
    }

    /// Live rotation, for drawing.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Entries being spun over, while a spin is in flight.
    pub fn snapshot(&self) -> Option<&[Entry]> {
        self.flight.as_ref().map(|f| f.snapshot.as_slice())
    }

    pub fn state(&self) -> Option<SpinState> {
        self.flight.as_ref().map(|f| SpinState {
            rotation: self.rotation,
            start_rotation: f.from,
            target_rotation: f.target,
            started_at: f.started_at,
            last_index: f.last_index,
        })
    }

    pub fn pointer(&self) -> f64 {
        self.pointer
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

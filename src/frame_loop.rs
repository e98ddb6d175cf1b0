use std::time::Duration;

use crate::{
    clock::Clock,
    roster::Entry,
    spin::{Frame, SpinEvent, Spinner},
};

/// Receives everything a running spin produces, on the loop's own thread.
pub trait SpinObserver {
    /// Called once per frame, before that frame's events.
    fn on_frame(&mut self, _spinner: &Spinner, _frame: &Frame, _now: Duration) {}
    fn on_tick(&mut self, _now: Duration) {}
    fn on_result(&mut self, _winner: &Entry) {}
}

/// Observer that ignores everything.
impl SpinObserver for () {}

/// Drives a [`Spinner`] one frame at a time until it settles.
pub struct FrameLoop<C: Clock> {
    clock: C,
    interval: Duration,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C, interval: Duration) -> FrameLoop<C> {
        FrameLoop { clock, interval }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Runs the spin to completion and returns the winner, or `None` if the
    /// spinner was idle.
    pub fn run<O: SpinObserver + ?Sized>(
        &mut self,
        spinner: &mut Spinner,
        observer: &mut O,
    ) -> Option<Entry> {
        let mut frames = 0usize;
        loop {
            let now = self.clock.now();
            let frame = spinner.step(now)?;
            frames += 1;
            observer.on_frame(spinner, &frame, now);

            let mut winner = None;
            for event in frame.events {
                match event {
                    SpinEvent::Tick => observer.on_tick(now),
                    SpinEvent::Resolved(entry) => {
                        observer.on_result(&entry);
                        winner = Some(entry);
                    }
                }
            }
            if winner.is_some() {
                log::trace!("Spin finished after {} frames", frames);
                return winner;
            }
            self.clock.sleep(self.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;
    use crate::{clock::ManualClock, params::Params, roster::Roster};

    #[derive(Default)]
    struct Log {
        frames: usize,
        ticks: Vec<Duration>,
        results: Vec<String>,
    }

    impl SpinObserver for Log {
        fn on_frame(&mut self, _spinner: &Spinner, _frame: &Frame, _now: Duration) {
            self.frames += 1;
        }
        fn on_tick(&mut self, now: Duration) {
            self.ticks.push(now);
        }
        fn on_result(&mut self, winner: &Entry) {
            self.results.push(winner.label.clone());
        }
    }

    #[test]
    fn runs_until_settled() {
        let params = Params::default();
        let mut spinner = Spinner::new(&params);
        let mut frames = FrameLoop::new(ManualClock::new(), Duration::from_millis(16));
        spinner
            .start_towards(
                Roster::from_text("An\nBình\nChi").snapshot(),
                10.25 * TAU,
                frames.now(),
            )
            .unwrap();

        let mut log = Log::default();
        let winner = frames.run(&mut spinner, &mut log).unwrap();

        assert_eq!(winner.label, "Bình");
        assert_eq!(log.results, vec!["Bình".to_string()]);
        // 5000 ms at 16 ms a frame, plus the settling frame
        assert_eq!(log.frames, 5_000 / 16 + 2);
        assert!(!log.ticks.is_empty());
        assert!(log.ticks.windows(2).all(|w| w[0] < w[1]));
        assert!(!spinner.is_spinning());
        assert!(frames.now() >= params.spin_duration);
    }

    #[test]
    fn idle_spinner_returns_nothing() {
        let mut spinner = Spinner::new(&Params::default());
        let mut frames = FrameLoop::new(ManualClock::new(), Duration::from_millis(16));
        assert!(frames.run(&mut spinner, &mut ()).is_none());
    }
}

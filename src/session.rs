use std::time::Duration;

use rand::Rng;

use crate::{
    classroom::{default_subject, Level},
    clock::Clock,
    error::{Precondition, WheelError},
    frame_loop::{FrameLoop, SpinObserver},
    params::Params,
    roster::{Entry, Roster},
    spin::Spinner,
};

/// One classroom sitting: the roster, the wheel, what is being taught and who
/// has been picked so far. Owns the caller-side rules around a spin: the
/// roster is frozen while the wheel turns, and each result is shown before it
/// goes into the history.
pub struct Session {
    roster: Roster,
    spinner: Spinner,
    level: Level,
    subject: String,

    /// Winner waiting to be shown
    pending: Option<Entry>,
    /// Labels of past winners, most recent first
    history: Vec<String>,
    history_cap: usize,
}

impl Session {
    pub fn new(roster: Roster, params: &Params) -> Session {
        Session {
            roster,
            spinner: Spinner::new(params),
            level: Level::default(),
            subject: default_subject().to_string(),
            pending: None,
            history: Vec::new(),
            history_cap: params.history_cap,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutable roster access, refused mid-spin.
    pub fn roster_mut(&mut self) -> Result<&mut Roster, WheelError> {
        if self.spinner.is_spinning() {
            return Err(WheelError::PreconditionViolation(Precondition::RosterLocked));
        }
        Ok(&mut self.roster)
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn set_subject(&mut self, subject: &str) {
        let subject = subject.trim();
        if !subject.is_empty() {
            self.subject = subject.to_string();
        }
    }

    /// Starts a random spin over a snapshot of the roster.
    pub fn start_spin<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Duration) -> Result<(), WheelError> {
        self.spinner.start(self.roster.snapshot(), rng, now)?;
        self.pending = None;
        log::info!("Spinning over {} names", self.roster.len());
        Ok(())
    }

    /// Starts a spin that will stop at `target` radians.
    pub fn start_spin_towards(&mut self, target: f64, now: Duration) -> Result<(), WheelError> {
        self.spinner.start_towards(self.roster.snapshot(), target, now)?;
        self.pending = None;
        Ok(())
    }

    /// Runs a started spin to completion on `frames` and holds the winner
    /// for display.
    pub fn finish_spin<C: Clock, O: SpinObserver + ?Sized>(
        &mut self,
        frames: &mut FrameLoop<C>,
        observer: &mut O,
    ) -> Option<Entry> {
        let winner = frames.run(&mut self.spinner, observer)?;
        log::info!("Selected {}", winner);
        self.pending = Some(winner.clone());
        Some(winner)
    }

    /// Winner waiting to be shown.
    pub fn pending(&self) -> Option<&Entry> {
        self.pending.as_ref()
    }

    /// Dismisses the shown winner into the history.
    pub fn close_result(&mut self) -> Option<Entry> {
        let winner = self.pending.take()?;
        self.history.insert(0, winner.label.clone());
        self.history.truncate(self.history_cap);
        Some(winner)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Restores a saved history, trimmed to capacity.
    pub fn restore_history(&mut self, mut history: Vec<String>) {
        history.truncate(self.history_cap);
        self.history = history;
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::clock::ManualClock;

    fn frame_loop() -> FrameLoop<ManualClock> {
        FrameLoop::new(ManualClock::new(), Duration::from_millis(16))
    }

    #[test]
    fn empty_roster_cannot_spin() {
        let mut session = Session::new(Roster::new(), &Params::default());
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            session.start_spin(&mut rng, Duration::ZERO),
            Err(WheelError::PreconditionViolation(Precondition::EmptyRoster))
        );
    }

    #[test]
    fn roster_is_locked_while_spinning() {
        let mut session = Session::new(Roster::from_text("An\nBình"), &Params::default());
        let mut rng = SmallRng::seed_from_u64(0);
        session.start_spin(&mut rng, Duration::ZERO).unwrap();
        assert!(matches!(
            session.roster_mut(),
            Err(WheelError::PreconditionViolation(Precondition::RosterLocked))
        ));

        let mut frames = frame_loop();
        session.finish_spin(&mut frames, &mut ()).unwrap();
        session.roster_mut().unwrap().add("Chi").unwrap();
        assert_eq!(session.roster().len(), 3);
    }

    #[test]
    fn result_moves_to_history_on_close() {
        let mut session = Session::new(Roster::from_text("An\nBình\nChi"), &Params::default());
        session.start_spin_towards(10.25 * TAU, Duration::ZERO).unwrap();
        let winner = session.finish_spin(&mut frame_loop(), &mut ()).unwrap();
        assert_eq!(winner.label, "Bình");
        assert_eq!(session.pending(), Some(&winner));
        assert!(session.history().is_empty());

        assert_eq!(session.close_result(), Some(winner));
        assert_eq!(session.pending(), None);
        assert_eq!(session.history(), ["Bình".to_string()]);
        assert_eq!(session.close_result(), None);
    }

    #[test]
    fn history_is_capped_most_recent_first() {
        let params = Params {
            history_cap: 3,
            ..Params::default()
        };
        let mut session = Session::new(Roster::from_text("An\nBình\nChi"), &params);
        let mut frames = frame_loop();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut winners = Vec::new();
        for _ in 0..5 {
            session.start_spin(&mut rng, frames.now()).unwrap();
            winners.push(session.finish_spin(&mut frames, &mut ()).unwrap().label);
            session.close_result();
        }
        winners.reverse();
        assert_eq!(session.history(), &winners[..3]);
    }

    #[test]
    fn starting_a_spin_clears_the_pending_result() {
        let mut session = Session::new(Roster::from_text("An\nBình"), &Params::default());
        let mut frames = frame_loop();
        let mut rng = SmallRng::seed_from_u64(4);
        session.start_spin(&mut rng, frames.now()).unwrap();
        session.finish_spin(&mut frames, &mut ()).unwrap();
        assert!(session.pending().is_some());
        session.start_spin(&mut rng, frames.now()).unwrap();
        assert!(session.pending().is_none());
    }

    #[test]
    fn subject_ignores_blank() {
        let mut session = Session::new(Roster::new(), &Params::default());
        session.set_subject("  Tin học ");
        session.set_subject("   ");
        assert_eq!(session.subject(), "Tin học");
    }

    #[test]
    fn restored_history_is_trimmed() {
        let params = Params {
            history_cap: 2,
            ..Params::default()
        };
        let mut session = Session::new(Roster::new(), &params);
        session.restore_history(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(session.history(), ["a".to_string(), "b".to_string()]);
    }
}

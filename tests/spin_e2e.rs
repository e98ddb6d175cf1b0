use std::{
    f64::consts::{FRAC_PI_2, TAU},
    time::Duration,
};

use rand::{rngs::SmallRng, SeedableRng};
use wheel_of_names::{
    audio::{Cue, SoundBoard},
    clock::ManualClock,
    frame_loop::{FrameLoop, SpinObserver},
    layout::{compute_slices, wrap_angle},
    params::Params,
    render::{Stage, WheelView},
    session::Session,
    simulate::simulate,
    spin::{pointer_index, Frame},
    Entry, Roster, Spinner,
};

#[derive(Default)]
struct Recorder {
    ticks: usize,
    results: Vec<Entry>,
    rotations: Vec<f64>,
}

impl SpinObserver for Recorder {
    fn on_frame(&mut self, _spinner: &Spinner, frame: &Frame, _now: Duration) {
        self.rotations.push(frame.rotation);
    }
    fn on_tick(&mut self, _now: Duration) {
        self.ticks += 1;
    }
    fn on_result(&mut self, winner: &Entry) {
        self.results.push(winner.clone());
    }
}

fn frame_loop() -> FrameLoop<ManualClock> {
    FrameLoop::new(ManualClock::new(), Duration::from_millis(16))
}

#[test]
fn ten_and_a_quarter_turns_lands_on_binh() {
    let params = Params::default();
    let roster = Roster::from_text("An\nBình\nChi");
    let mut session = Session::new(roster.clone(), &params);
    let mut frames = frame_loop();

    session.start_spin_towards(10.25 * TAU, frames.now()).unwrap();
    let mut recorder = Recorder::default();
    let winner = session.finish_spin(&mut frames, &mut recorder).unwrap();

    let final_rotation = *recorder.rotations.last().unwrap();
    assert!((wrap_angle(final_rotation) - 0.25 * TAU).abs() < 1e-9);

    // Recompute the layout at rest and find the slice holding the pointer
    let snapshot = roster.snapshot();
    let slices = compute_slices(&snapshot, 0.).unwrap();
    let local = (TAU - (0.25 * TAU + FRAC_PI_2)).rem_euclid(TAU);
    let expected = slices.iter().position(|s| s.contains(local)).unwrap();
    assert_eq!(snapshot[expected].label, "Bình");
    assert_eq!(winner.label, "Bình");
    assert_eq!(recorder.results.len(), 1);
    assert_eq!(
        pointer_index(final_rotation, 3, params.pointer_angle).unwrap(),
        expected
    );
}

#[test]
fn rotation_only_moves_forward_and_settles_on_target() {
    let params = Params::default();
    let mut session = Session::new(Roster::with_defaults(), &params);
    let mut frames = frame_loop();
    let mut rng = SmallRng::seed_from_u64(2024);
    session.start_spin(&mut rng, frames.now()).unwrap();
    let target = session.spinner().state().unwrap().target_rotation;

    let mut recorder = Recorder::default();
    session.finish_spin(&mut frames, &mut recorder).unwrap();
    assert!(recorder.rotations.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*recorder.rotations.last().unwrap(), target);
    // At most one tick per frame, so the fast opening turns undercount
    assert!(recorder.ticks > 60, "ticks {}", recorder.ticks);
    assert!(recorder.ticks <= 13 * 15 + 1, "ticks {}", recorder.ticks);
}

#[test]
fn same_seed_same_show() {
    let run = || {
        let mut session = Session::new(Roster::with_defaults(), &Params::default());
        let mut frames = frame_loop();
        let mut rng = SmallRng::seed_from_u64(77);
        session.start_spin(&mut rng, frames.now()).unwrap();
        let mut recorder = Recorder::default();
        let winner = session.finish_spin(&mut frames, &mut recorder).unwrap();
        (winner.label, recorder.ticks, recorder.rotations)
    };
    assert_eq!(run(), run());
}

#[test]
fn stage_plays_ticks_and_one_win() {
    let params = Params::default();
    let mut session = Session::new(Roster::from_text("An\nBình\nChi\nDũng"), &params);
    let mut frames = frame_loop();
    let mut sound = SoundBoard::silent();
    let mut rng = SmallRng::seed_from_u64(5);

    session.start_spin(&mut rng, frames.now()).unwrap();
    let winner = {
        let mut stage = Stage {
            view: WheelView::new(Vec::new(), false, params.jitter),
            sound: &mut sound,
        };
        let winner = session.finish_spin(&mut frames, &mut stage).unwrap();
        let drawn = String::from_utf8(stage.view.into_inner()).unwrap();
        assert!(drawn.contains(&winner.label));
        winner
    };
    assert_eq!(sound.played(Cue::Win), 1);
    assert!(sound.played(Cue::Tick) >= 24);
    assert_eq!(session.pending(), Some(&winner));
}

#[test]
fn uniform_over_ten_thousand_spins() {
    let params = Params::default();
    for n in [2, 3, 5, 7] {
        let tally = simulate(n, 10_000, 31_337 + n as u64, 4, &params).unwrap();
        assert_eq!(tally.spins, 10_000);
        // About four standard deviations of a binomial at 10k draws
        assert!(tally.max_deviation() < 0.025, "n={n}\n{tally}");
    }
}

#[test]
fn quantized_revolutions_are_unfair() {
    // Whole-turn draws always stop where they started
    let params = Params {
        revolutions: 8.0..8.0,
        ..Params::default()
    };
    let tally = simulate(5, 1_000, 1, 2, &params).unwrap();
    assert_eq!(tally.counts.iter().filter(|&&c| c > 0).count(), 1);
}

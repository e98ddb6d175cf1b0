//! Fairness check: spin a wheel many times and count who wins.

use std::{fmt::Display, time::Duration};

use fxhash::FxHashMap;
use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    error::WheelError,
    params::Params,
    roster::{EntryId, Roster},
    spin::{SpinEvent, Spinner},
};

/// Winner counts per slice position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub counts: Vec<usize>,
    pub spins: usize,
}

impl Tally {
    pub fn frequency(&self, index: usize) -> f64 {
        if self.spins == 0 {
            return 0.;
        }
        self.counts[index] as f64 / self.spins as f64
    }

    /// Largest gap between an entry's win frequency and `1/N`.
    pub fn max_deviation(&self) -> f64 {
        let expected = 1. / self.counts.len() as f64;
        (0..self.counts.len())
            .map(|i| (self.frequency(i) - expected).abs())
            .fold(0., f64::max)
    }
}

impl Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "===== Fairness over {} spins =====", self.spins)?;
        for (i, count) in self.counts.iter().enumerate() {
            writeln!(f, "\t - slice {:>3}: {:>7} ({:.4})", i, count, self.frequency(i))?;
        }
        write!(f, "\t - max deviation from 1/{}: {:.4}", self.counts.len(), self.max_deviation())
    }
}

/// Spins a wheel of `n_entries` slices `spins` times across `n_threads`
/// workers. Same seed and thread count give the same tally.
pub fn simulate(
    n_entries: usize,
    spins: usize,
    seed: u64,
    n_threads: usize,
    params: &Params,
) -> Result<Tally, WheelError> {
    let roster = Roster::from_text(
        &(0..n_entries)
            .map(|i| format!("#{i}"))
            .collect::<Vec<_>>()
            .join("\n"),
    );
    if roster.is_empty() {
        return Err(WheelError::DegenerateLayout);
    }
    let snapshot = roster.snapshot();
    let positions: FxHashMap<EntryId, usize> =
        snapshot.iter().enumerate().map(|(i, e)| (e.id, i)).collect();

    let n_threads = n_threads.clamp(1, spins.max(1));
    log::debug!("Simulating {} spins of {} slices on {} threads", spins, n_entries, n_threads);

    let mut counts = vec![0usize; n_entries];
    let results = crossbeam::scope(|s| {
        let handles = (0..n_threads)
            .map(|w| {
                // Spread the remainder over the first workers
                let share = spins / n_threads + usize::from(w < spins % n_threads);
                let snapshot = &snapshot;
                let positions = &positions;
                s.spawn(move |_| {
                    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(w as u64));
                    let mut spinner = Spinner::new(params);
                    let mut local: FxHashMap<usize, usize> = FxHashMap::default();
                    let mut now = Duration::ZERO;
                    for _ in 0..share {
                        spinner.start(snapshot.clone(), &mut rng, now)?;
                        now += spinner.duration();
                        let Some(frame) = spinner.step(now) else {
                            continue;
                        };
                        for event in frame.events {
                            if let SpinEvent::Resolved(winner) = event {
                                *local.entry(positions[&winner.id]).or_default() += 1;
                            }
                        }
                    }
                    Ok::<_, WheelError>(local)
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    })
    .unwrap_or_else(|e| std::panic::resume_unwind(e));

    for local in results {
        for (i, c) in local? {
            counts[i] += c;
        }
    }
    let spins = counts.iter().sum();
    Ok(Tally { counts, spins })
}

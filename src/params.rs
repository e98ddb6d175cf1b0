use std::{f64::consts::FRAC_PI_2, fmt::Display, ops::Range, time::Duration};

use lazy_static::lazy_static;

lazy_static! {
  pub static ref DEFAULT_PARAMS: Params = Params {
    // Wall-clock length of one spin
    spin_duration: Duration::from_millis(5_000),
    // Extra full turns drawn per spin; continuous, never rounded
    revolutions: 8.0..13.0,
    // Ticks are suppressed past this progress so the settle is silent
    tick_cutoff: 0.98,
    // Pointer sits at the top of the wheel
    pointer_angle: -FRAC_PI_2,

    // ~60 Hz
    frame_interval: Duration::from_millis(16),
    // Pointer deflection after a tick
    jitter: Duration::from_millis(50),

    // Most-recent-first results kept
    history_cap: 10,
    // How long the result banner waits for the congratulatory message
    message_timeout: Duration::from_secs(10),

    // Default to system physical cores for fairness simulation
    n_threads: num_cpus::get_physical(),
  };
}

/// Spin and session parameters.
#[derive(Clone, Debug)]
pub struct Params {
    /// Duration of the deceleration animation
    pub spin_duration: Duration,
    /// Range of extra revolutions drawn at spin start
    pub revolutions: Range<f64>,
    /// Progress after which slice crossings no longer tick
    pub tick_cutoff: f64,
    /// Angle of the fixed pointer, relative to slice-angle zero
    pub pointer_angle: f64,

    /// Delay between frames in the real-time loop
    pub frame_interval: Duration,
    /// How long the pointer stays deflected after a tick
    pub jitter: Duration,

    /// Capacity of the result history
    pub history_cap: usize,
    /// Time limit for the text-generation request. Zero waits for nothing.
    pub message_timeout: Duration,

    /// Number of threads available
    pub n_threads: usize,
}

impl Default for Params {
    fn default() -> Self {
        DEFAULT_PARAMS.clone()
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "===== Spin Parameters =====")?;
        writeln!(f, "\t - spin_duration: {:?}", self.spin_duration)?;
        writeln!(
            f,
            "\t - revolutions (extra turns per spin): {:.1}..{:.1}",
            self.revolutions.start, self.revolutions.end
        )?;
        writeln!(f, "\t - tick_cutoff (silent settle after): {}", self.tick_cutoff)?;
        writeln!(f, "\t - pointer_angle (rad): {:.4}", self.pointer_angle)?;
        writeln!(f, "\t - frame_interval: {:?}", self.frame_interval)?;
        writeln!(f, "\t - history_cap: {}", self.history_cap)?;
        writeln!(f, "\t - message_timeout: {:?}", self.message_timeout)?;
        writeln!(f, "\t - n_threads (simulation workers): {}", self.n_threads)
    }
}

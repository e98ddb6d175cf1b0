use thiserror::Error;

/// Errors raised by the wheel core. Both are caller-side gates: they are
/// returned synchronously and never surface from inside the frame loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WheelError {
    #[error("precondition violated: {0}")]
    PreconditionViolation(Precondition),

    #[error("cannot lay out a wheel with no entries")]
    DegenerateLayout,
}

/// Which gate rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("roster is empty")]
    EmptyRoster,
    #[error("a spin is already in progress")]
    AlreadySpinning,
    #[error("roster cannot change while the wheel is spinning")]
    RosterLocked,
}

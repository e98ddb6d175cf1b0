//! Spinning-wheel name picker for the classroom.
//!
//! The wheel itself is [`layout`] (slice geometry) and [`spin`] (the
//! animator/resolver). Everything else is a collaborator around it: the
//! roster, the frame loop and clock, sound cues, terminal drawing, the saved
//! store and the congratulatory message service.

pub mod audio;
pub mod classroom;
pub mod clock;
pub mod error;
pub mod frame_loop;
pub mod layout;
pub mod oracle;
pub mod params;
pub mod render;
pub mod roster;
pub mod session;
pub mod simulate;
pub mod spin;
pub mod store;

pub use error::{Precondition, WheelError};
pub use roster::{Entry, EntryId, Roster};
pub use spin::{Frame, SpinEvent, Spinner};

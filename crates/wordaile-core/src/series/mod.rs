//! Round scheduling and series control.
//!
//! [`SeriesController`] owns the [`SeriesState`] and a [`RoundScheduler`].
//! Timers post events on a channel; the controller handles them one at a
//! time, so every transition runs to completion before the next begins.

mod controller;
mod decision;
mod scheduler;
mod state;
mod timers;

pub use controller::{RoundEndReason, RoundSummary, SeriesController, SeriesDeps, StepOutcome};
pub use decision::{decide_series, SeriesDecision};
pub use scheduler::{CycleReport, RoundScheduler};
pub use state::{GuessRejected, PlayerSummary, SeriesSnapshot, SeriesState};
pub use timers::{RoundEpoch, SchedulerEvent};

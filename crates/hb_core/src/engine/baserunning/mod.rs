//! Baserunning engine.
//!
//! `Runner` models one base-runner's decisions and continuous motion;
//! `Basepaths` owns the ordered set of live runners for the duration of a
//! play and renders it into an immutable `BaseSummary` for publication.
//!
//! The ordering invariant is the heart of the module: runners are kept
//! lead-first, and a runner can never legally occupy a base at or beyond
//! the runner ahead of it. Violations abort the play as invariant errors
//! rather than being clamped; they mean an upstream force-resolution bug.

mod basepaths;
mod runner;

pub use basepaths::{BaseSummary, Basepaths};
pub use runner::Runner;

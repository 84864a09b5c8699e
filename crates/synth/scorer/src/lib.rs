//! Quality scoring for Synth candidates.
//!
//! Five independent dimensions are scored on `[0, 10]` and unified with a
//! harmonic mean, so the weakest dimension dominates:
//!
//! ```text
//! correctness ─┐
//! performance ─┤
//! reliability ─┼──> harmonic_mean ──> unified
//! synergy ─────┤
//! elegance ────┘
//! ```
//!
//! Every dimension lives in [`dimensions`] as a pure function over explicit
//! inputs; [`QualityScorer`] only gathers those inputs from a candidate, the
//! intent, plan-type statistics and the user profile.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod config;
pub mod dimensions;
mod scorer;

pub use config::ScorerConfig;
pub use scorer::QualityScorer;

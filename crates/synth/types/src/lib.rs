//! Core value types for the Synth intent synthesis engine.
//!
//! Everything that flows between the encoder, the candidate generator, the
//! quality scorer, the selector and the feedback recorder is defined here so
//! that each stage can depend on a single vocabulary:
//!
//! ```text
//! IntentSummary ──> SemanticVector + Regime ──> Candidate ──> QualityBreakdown
//!                                                   │
//!                                                   v
//!                              InteractionRecord / PlanTypeStats / UserProfile
//! ```
//!
//! The statistics types ([`PlanTypeStats`], [`UserProfile`]) carry their own
//! update rules; storage backends only decide *where* those rules are applied.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod candidate;
mod ids;
mod indicators;
mod intent;
mod interaction;
pub mod math;
mod profile;
mod quality;
mod regime;
mod stats;
mod vector;

pub use candidate::{
    Candidate, Optimization, PlanPayload, PlanStep, PlanType, StepKind, StrategyKind,
};
pub use ids::{CandidateId, InteractionId, UserId};
pub use indicators::SystemIndicators;
pub use intent::{ActionKind, Certainty, EncodedIntent, IntentCategory, IntentSummary};
pub use interaction::InteractionRecord;
pub use math::{arithmetic_mean, harmonic_mean, weighted_harmonic_mean, HARMONIC_EPSILON};
pub use profile::{ProfileUpdate, RegimeCounts, UserProfile};
pub use quality::{QualityBreakdown, QualityDimension, MAX_SCORE};
pub use regime::Regime;
pub use stats::{PlanOutcome, PlanTypeStats, SUCCESS_PRIOR_RATE, SUCCESS_PRIOR_WEIGHT};
pub use vector::{SemanticVector, VectorError, NORM_TOLERANCE};

//! Candidate generation for Synth.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    CANDIDATE GENERATOR                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │   EncodedIntent ──┬──> history-lookup ───────────┐           │
//! │                   ├──> neighborhood-exploration ─┤           │
//! │                   ├──> state-aware ──────────────┼──> concat │
//! │                   └──> profile-predictive ───────┘     │     │
//! │                                                        v     │
//! │                        Vec<Candidate> + GenerationReport     │
//! │                                                              │
//! │   each strategy: own task, own timeout, failures isolated    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Components
//!
//! - [`CandidateGenerator`]: fans out to the enabled strategies on a
//!   `JoinSet` and concatenates what completes in time
//! - [`PlanCatalog`]: built-in plan templates with anchor vectors
//! - [`IndicatorSource`]: live system indicators for the state-aware strategy

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod catalog;
mod config;
mod error;
mod generator;
mod indicators;
mod strategies;

pub use catalog::{PlanCatalog, PlanProfile, PlanTemplate};
pub use config::GeneratorConfig;
pub use error::{GenerationError, GenerationResult};
pub use generator::{
    CandidateGenerator, Generation, GenerationReport, GenerationRequest, StrategyReport,
    StrategyStatus,
};
pub use indicators::{IndicatorSource, StaticIndicators};

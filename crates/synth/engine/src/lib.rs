//! The Synth synthesis engine.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                         SYNTHESIS ENGINE                          │
//! ├───────────────────────────────────────────────────────────────────┤
//! │                                                                   │
//! │  IntentSummary ──> encode ──> generate ──> score ──> dedupe       │
//! │                                 (4 tasks)   (n tasks)    │        │
//! │                                                          v        │
//! │  SynthesisResponse <── candidate cache <── gate + rank + take k   │
//! │                                                                   │
//! │  ChoiceReport ──> candidate cache ──> FeedbackRecorder ──> store  │
//! │                                                                   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A synthesize call runs under one deadline. Strategies are cancelled once
//! `generation_share` of it has elapsed, and the candidates of those that
//! finished go on to scoring. Whatever is scored when the deadline passes is
//! still gated and ranked, and the response is flagged `timed_out`. Three outcomes are distinguished: `ranked`, `no_match`
//! (nothing generated) and `below_threshold` (generated but gated out).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use synth_engine::{EngineConfig, SynthesisEngine, SynthesisRequest};
//! use synth_generator::StaticIndicators;
//! use synth_store::InMemorySynthesisStore;
//! use synth_types::IntentSummary;
//!
//! let engine = SynthesisEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(InMemorySynthesisStore::new()),
//!     Arc::new(StaticIndicators::default()),
//! )?;
//! let response = engine
//!     .synthesize(SynthesisRequest::new(IntentSummary::new("search", "customer")))
//!     .await;
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod cache;
mod config;
mod engine;
mod error;
mod synthesis;
mod telemetry;

pub use cache::{CachedCandidate, CandidateCache};
pub use config::EngineConfig;
pub use engine::SynthesisEngine;
pub use error::{EngineError, EngineResult};
pub use synthesis::{
    ChoiceReport, PoolSummary, SynthesisOutcome, SynthesisRequest, SynthesisResponse,
};
pub use telemetry::{Counter, EngineTelemetry, MetricsSnapshot, RegimeShare};

//! Semantic encoder for Synth.
//!
//! Turns an [`IntentSummary`](synth_types::IntentSummary) into a unit-length
//! [`SemanticVector`](synth_types::SemanticVector), a regime and a confidence.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     SEMANTIC ENCODER                           │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │  action ─────┐                                                 │
//! │  entity ─────┼──> BLAKE3 field seeds ──> weighted sum ──> |v|=1│
//! │  attributes ─┤                                                 │
//! │  certainty ──┘                                                 │
//! │                                                                │
//! │  per-field clarity ──> harmonic mean ──> confidence ──> regime │
//! │                                                                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Encoding is pure: the same summary always yields the bit-identical
//! vector, regime and confidence. A summary with neither action nor entity
//! never fails; it encodes to the neutral vector in the exploration regime.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod clarity;
mod config;
mod encoder;
mod seeds;

pub use clarity::ClaritySignals;
pub use config::{EncoderConfig, FieldWeights};
pub use encoder::SemanticEncoder;
pub use seeds::{field_seeds, Field};

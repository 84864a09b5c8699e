//! Regime-gated selection for Synth.
//!
//! Scored candidates pass a quality gate tied to the regime of both the plan
//! and the intent, are ranked by unified quality, and are cut to a size that
//! grows sublinearly with the number of survivors:
//!
//! ```text
//!  scored pool ──> gate(threshold) ──> rank ──> take k
//!                       │
//!                       └──> gated_out
//!
//!  k = clamp(round(√n · log2(max(n, 2))), min_results, max_results), k ≤ n
//! ```
//!
//! | Regime        | Threshold |
//! |---------------|-----------|
//! | exploration   | 7.0       |
//! | optimization  | 8.5       |
//! | stabilization | 9.0       |

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod config;
mod selector;

pub use config::{RegimeThresholds, SelectorConfig, SelectorConfigError};
pub use selector::{cardinality, dedupe_by_plan_type, rank, CandidateSelector, Selection};

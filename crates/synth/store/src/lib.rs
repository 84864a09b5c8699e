//! Synth storage contracts.
//!
//! This crate defines the narrow read/write interface the synthesis pipeline
//! uses for its shared statistics:
//! - per-plan-type rolling statistics
//! - per-user preference profiles
//! - the append-only interaction log
//!
//! Design stance:
//! - Records are keyed and independently lockable; an update to one plan type
//!   or one user never blocks another.
//! - Update rules live on the value types in `synth-types`; a backend only
//!   decides where they are applied atomically.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
pub mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemorySynthesisStore;
pub use traits::{InteractionStore, PlanStatsStore, ProfileStore, QueryWindow, SynthesisStorage};

//! Feedback recording for Synth.
//!
//! The recorder is the only writer of plan-type statistics and user
//! profiles. Each recorded choice produces three writes:
//!
//! ```text
//!  chosen candidate + outcome
//!            │
//!            ├──> PlanStatsStore::apply_outcome     (per plan type)
//!            ├──> ProfileStore::apply_profile_update (per user, optional)
//!            └──> InteractionStore::append_interaction
//! ```
//!
//! Transient store failures are retried with a linear backoff. When retries
//! run out the entry moves to a bounded pending queue and the caller gets a
//! `Queued` receipt; [`FeedbackRecorder::flush_pending`] replays the queue.
//! Completed writes are remembered per entry, so a replay never counts an
//! outcome twice.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod config;
mod error;
mod recorder;

pub use config::FeedbackConfig;
pub use error::{FeedbackError, FeedbackResult};
pub use recorder::{FeedbackReceipt, FeedbackRecorder, FeedbackStatus, FlushReport};

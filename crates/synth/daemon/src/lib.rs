//! Synth Daemon library
//!
//! HTTP surface over the synthesis engine:
//!
//! ```text
//!   client ──► /api/v1 router ──► handlers ──► SynthesisEngine
//!                  │                              │
//!            trace + cors                 in-memory store
//! ```
//!
//! - `POST /encode`, `POST /synthesize`
//! - `POST /record-choice`, `POST /feedback/flush`
//! - `GET /health`, `GET /status`
//! - `GET /plan-types`, `GET /catalog`, `GET /profiles/:user_id`

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, DaemonResult};
pub use server::Server;

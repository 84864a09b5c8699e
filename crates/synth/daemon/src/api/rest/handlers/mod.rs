//! API request handlers

mod feedback;
mod health;
mod stats;
mod synthesis;

pub use feedback::*;
pub use health::*;
pub use stats::*;
pub use synthesis::*;

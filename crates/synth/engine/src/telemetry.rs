//! Engine counters and the realised regime mix.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use synth_feedback::FeedbackStatus;
use synth_types::Regime;

use crate::synthesis::SynthesisOutcome;

/// Monotonic counter.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Counters updated by every synthesize and record-choice call.
#[derive(Debug, Default)]
pub struct EngineTelemetry {
    calls: Counter,
    ranked: Counter,
    no_match: Counter,
    below_threshold: Counter,
    timed_out: Counter,
    strategy_failures: Counter,
    strategy_timeouts: Counter,
    candidates_generated: Counter,
    candidates_gated_out: Counter,
    candidates_surfaced: Counter,
    feedback_recorded: Counter,
    feedback_queued: Counter,
    exploration: Counter,
    optimization: Counter,
    stabilization: Counter,
}

/// Realised share of one regime against its long-run target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeShare {
    pub regime: Regime,
    pub calls: u64,
    pub observed: f64,
    pub target: f64,
}

/// Point-in-time copy of the engine counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub synthesize_calls: u64,
    pub ranked: u64,
    pub no_match: u64,
    pub below_threshold: u64,
    pub timed_out: u64,
    pub strategy_failures: u64,
    pub strategy_timeouts: u64,
    pub candidates_generated: u64,
    pub candidates_gated_out: u64,
    pub candidates_surfaced: u64,
    pub feedback_recorded: u64,
    pub feedback_queued: u64,
    pub regime_mix: Vec<RegimeShare>,
}

/// Per-call figures folded into the counters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CallFigures {
    pub regime: Regime,
    pub outcome: SynthesisOutcome,
    pub timed_out: bool,
    pub strategy_failures: usize,
    pub strategy_timeouts: usize,
    pub generated: usize,
    pub gated_out: usize,
    pub surfaced: usize,
}

impl EngineTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_call(&self, figures: CallFigures) {
        self.calls.inc();
        match figures.outcome {
            SynthesisOutcome::Ranked => self.ranked.inc(),
            SynthesisOutcome::NoMatch => self.no_match.inc(),
            SynthesisOutcome::BelowThreshold => self.below_threshold.inc(),
        }
        if figures.timed_out {
            self.timed_out.inc();
        }
        self.strategy_failures.inc_by(figures.strategy_failures as u64);
        self.strategy_timeouts.inc_by(figures.strategy_timeouts as u64);
        self.candidates_generated.inc_by(figures.generated as u64);
        self.candidates_gated_out.inc_by(figures.gated_out as u64);
        self.candidates_surfaced.inc_by(figures.surfaced as u64);
        self.regime_counter(figures.regime).inc();
    }

    pub(crate) fn record_feedback(&self, status: FeedbackStatus) {
        match status {
            FeedbackStatus::Recorded => self.feedback_recorded.inc(),
            FeedbackStatus::Queued => self.feedback_queued.inc(),
        }
    }

    /// Queued entries that a flush finally wrote.
    pub(crate) fn record_flushed(&self, recorded: usize) {
        self.feedback_recorded.inc_by(recorded as u64);
    }

    fn regime_counter(&self, regime: Regime) -> &Counter {
        match regime {
            Regime::Exploration => &self.exploration,
            Regime::Optimization => &self.optimization,
            Regime::Stabilization => &self.stabilization,
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.exploration.get() + self.optimization.get() + self.stabilization.get();
        let regime_mix = Regime::ALL
            .into_iter()
            .map(|regime| {
                let calls = self.regime_counter(regime).get();
                RegimeShare {
                    regime,
                    calls,
                    observed: if total == 0 {
                        0.0
                    } else {
                        calls as f64 / total as f64
                    },
                    target: regime.target_frequency(),
                }
            })
            .collect();

        MetricsSnapshot {
            synthesize_calls: self.calls.get(),
            ranked: self.ranked.get(),
            no_match: self.no_match.get(),
            below_threshold: self.below_threshold.get(),
            timed_out: self.timed_out.get(),
            strategy_failures: self.strategy_failures.get(),
            strategy_timeouts: self.strategy_timeouts.get(),
            candidates_generated: self.candidates_generated.get(),
            candidates_gated_out: self.candidates_gated_out.get(),
            candidates_surfaced: self.candidates_surfaced.get(),
            feedback_recorded: self.feedback_recorded.get(),
            feedback_queued: self.feedback_queued.get(),
            regime_mix,
        }
    }
}

//! Request-rate cooldown controller.
//!
//! A per-player two-state machine: `Normal` counts accepted interactive
//! actions; hitting the limit starts a `Throttled` episode with a fixed
//! penalty measured in scheduler ticks. While throttled, interactive actions
//! are rejected (the player is told exactly once per episode) and accrual is
//! paused; the penalty counts down once per tick and the episode ends at
//! zero. Purely local per player — no cross-player coordination.

use typer_core::constants::{COOLDOWN_ACTION_LIMIT, COOLDOWN_PENALTY_TICKS};

/// Verdict on an interactive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    /// Rejected; `first` is set on the first rejection of this episode so
    /// the caller notifies exactly once.
    Rejected { retry_in: u32, first: bool },
}

#[derive(Debug, Clone)]
pub struct Cooldown {
    limit: u32,
    penalty_ticks: u32,
    counter: u32,
    penalty: u32,
    informed: bool,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(COOLDOWN_ACTION_LIMIT, COOLDOWN_PENALTY_TICKS)
    }
}

impl Cooldown {
    pub fn new(limit: u32, penalty_ticks: u32) -> Self {
        Self {
            limit,
            penalty_ticks,
            counter: 0,
            penalty: 0,
            informed: false,
        }
    }

    pub fn is_throttled(&self) -> bool {
        self.penalty > 0
    }

    /// Remaining penalty in ticks.
    pub fn retry_in(&self) -> u32 {
        self.penalty
    }

    /// Gate an interactive action.
    ///
    /// The action that reaches the limit is itself accepted; the episode it
    /// starts rejects everything after it until the penalty runs out.
    pub fn admit(&mut self) -> Admission {
        if self.penalty > 0 {
            let first = !self.informed;
            self.informed = true;
            return Admission::Rejected {
                retry_in: self.penalty,
                first,
            };
        }
        self.counter += 1;
        if self.counter >= self.limit {
            self.counter = 0;
            self.penalty = self.penalty_ticks;
        }
        Admission::Accepted
    }

    /// Count one scheduler tick down. Returns `true` when this tick ends the
    /// episode (accrual resumes, the informed flag clears).
    pub fn tick(&mut self) -> bool {
        if self.penalty == 0 {
            return false;
        }
        self.penalty -= 1;
        if self.penalty == 0 {
            self.informed = false;
            true
        } else {
            false
        }
    }
}

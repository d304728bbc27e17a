//! Tick-driven countdown shown before play (re)starts

use serde::{Deserialize, Serialize};

/// What a countdown did on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    /// Nothing pending
    Idle,
    /// Still counting; the number on display
    Counting(u32),
    /// Moved on to a new number this tick
    Stepped(u32),
    /// Finished this tick
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Pending {
    /// Number on display
    step: u32,
    ticks_left: u32,
}

/// Countdown of `steps` displayed numbers, `step_ticks` ticks each.
///
/// Cancelling is idempotent: cancelling an idle countdown does nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    steps: u32,
    step_ticks: u32,
    pending: Option<Pending>,
}

impl Countdown {
    pub fn new(steps: u32, step_ticks: u32) -> Self {
        Self {
            steps: steps.max(1),
            step_ticks: step_ticks.max(1),
            pending: None,
        }
    }

    /// (Re)start from the top
    pub fn start(&mut self) {
        self.pending = Some(Pending {
            step: self.steps,
            ticks_left: self.step_ticks,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number to show, if counting
    pub fn display(&self) -> Option<u32> {
        self.pending.map(|p| p.step)
    }

    /// Advance by one tick
    pub fn advance(&mut self) -> CountdownStatus {
        let Some(pending) = self.pending.as_mut() else {
            return CountdownStatus::Idle;
        };

        pending.ticks_left -= 1;
        if pending.ticks_left > 0 {
            return CountdownStatus::Counting(pending.step);
        }

        if pending.step <= 1 {
            self.pending = None;
            return CountdownStatus::Expired;
        }

        pending.step -= 1;
        pending.ticks_left = self.step_ticks;
        CountdownStatus::Stepped(pending.step)
    }
}

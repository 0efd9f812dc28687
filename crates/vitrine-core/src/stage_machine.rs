use serde::{Deserialize, Serialize};

/// Presentation stage of a specimen. Transitions are linear; no stage is
/// ever re-entered within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    Arriving,
    Present,
    Active,
    Resonant,
    Afterglow,
}

/// Durations of the time-gated waits, microseconds.
///
/// `arriving_us` gates arriving→present, `present_us` gates
/// present→active, `grace_us` gates active→resonant once the step counter
/// is full, `resonant_us` gates resonant→afterglow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub arriving_us: u64,
    pub present_us: u64,
    pub grace_us: u64,
    pub resonant_us: u64,
}

impl StageTimings {
    pub fn total_us(&self) -> u64 {
        self.arriving_us + self.present_us + self.grace_us + self.resonant_us
    }
}

/// Tick-driven five-stage progression.
///
/// The machine owns all of its pending work as plain deadlines, so
/// cancellation is synchronous: after `reset()` no tick or advance can
/// change state, and nothing is left scheduled. A host needing wall-clock
/// scheduling wraps this in a [`crate::stage_driver::StageDriver`].
#[derive(Debug, Clone)]
pub struct StageMachine {
    stage: StageState,
    elapsed_us: u64,
    steps: u32,
    max_steps: u32,
    timings: StageTimings,
    halted: bool,
    completion_pending: bool,
    completion_emitted: bool,
}

impl StageMachine {
    /// Create a running machine in `arriving`.
    pub fn new(timings: StageTimings, max_steps: u32) -> Self {
        StageMachine {
            stage: StageState::Arriving,
            elapsed_us: 0,
            steps: 0,
            max_steps,
            timings,
            halted: false,
            completion_pending: false,
            completion_emitted: false,
        }
    }

    pub fn stage(&self) -> StageState {
        self.stage
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Remaining time until the next time-gated transition, or None when
    /// the machine is waiting on interaction (or has nothing scheduled).
    pub fn next_deadline_us(&self) -> Option<u64> {
        if self.halted {
            return None;
        }
        match self.stage {
            StageState::Arriving => Some(self.timings.arriving_us.saturating_sub(self.elapsed_us)),
            StageState::Present => Some(self.timings.present_us.saturating_sub(self.elapsed_us)),
            StageState::Active => {
                if self.steps >= self.max_steps {
                    Some(self.timings.grace_us.saturating_sub(self.elapsed_us))
                } else {
                    None
                }
            }
            StageState::Resonant => Some(self.timings.resonant_us.saturating_sub(self.elapsed_us)),
            StageState::Afterglow => None,
        }
    }

    fn enter_next(&mut self) {
        self.elapsed_us = 0;
        self.stage = match self.stage {
            StageState::Arriving => StageState::Present,
            StageState::Present => StageState::Active,
            StageState::Active => StageState::Resonant,
            StageState::Resonant => StageState::Afterglow,
            StageState::Afterglow => StageState::Afterglow,
        };
        if self.stage == StageState::Afterglow && !self.completion_emitted {
            self.completion_emitted = true;
            self.completion_pending = true;
        }
    }

    /// Consume elapsed time, returning the stages entered during this
    /// tick in order. A single large tick can cross several boundaries.
    pub fn tick(&mut self, mut dt_us: u64) -> Vec<StageState> {
        let mut entered = Vec::new();
        if self.halted {
            return entered;
        }
        while dt_us > 0 {
            let Some(remaining) = self.next_deadline_us() else {
                break;
            };
            if dt_us < remaining {
                self.elapsed_us = self.elapsed_us.saturating_add(dt_us);
                break;
            }
            dt_us -= remaining;
            self.enter_next();
            entered.push(self.stage);
        }
        entered
    }

    /// Register one interaction. Accepted only while `active` with the
    /// counter below `max_steps`; a no-op returning false otherwise.
    /// Stray interactions after auto-advance are expected, not errors.
    pub fn advance(&mut self) -> bool {
        if self.halted || self.stage != StageState::Active || self.steps >= self.max_steps {
            return false;
        }
        self.steps += 1;
        if self.steps >= self.max_steps {
            // Counter full: arm the grace delay toward resonant.
            self.elapsed_us = 0;
        }
        true
    }

    /// One-shot completion flag, set when `afterglow` is entered. Returns
    /// true exactly once per machine instance.
    pub fn take_completion(&mut self) -> bool {
        std::mem::take(&mut self.completion_pending)
    }

    /// Cancel everything. The machine returns to `arriving` with zeroed
    /// counters and stays dormant: subsequent ticks and advances are
    /// no-ops and no deadline remains outstanding. Callable at any time,
    /// any number of times.
    pub fn reset(&mut self) {
        self.halted = true;
        self.stage = StageState::Arriving;
        self.elapsed_us = 0;
        self.steps = 0;
        self.completion_pending = false;
    }

    /// Re-arm a machine after `reset()`, starting a fresh run from
    /// `arriving`. The completion flag stays spent: one fire per instance.
    pub fn start(&mut self) {
        self.halted = false;
        self.stage = StageState::Arriving;
        self.elapsed_us = 0;
        self.steps = 0;
    }
}

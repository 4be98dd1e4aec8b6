//! Warning tracking for simulation diagnostics.
//!
//! Recoverable numerical trouble (a skipped sub-step, an auto-reset) is
//! counted per kind rather than returned as an error, because the frame loop
//! driving the simulation cannot do anything useful with it mid-frame.
//! Each kind is logged once, on its first occurrence since the last reset.

/// Warning kinds. `repr(u8)` for compact storage; cast to `usize` for indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Warning {
    /// Contact geometry degenerate at the current orientation; sub-step skipped.
    SingularContact = 0,
    /// Constraint or inertia matrix not invertible; sub-step skipped.
    SingularMatrix = 1,
    /// State became NaN, infinite or overflowed.
    BadState = 2,
    /// `update` called with a negative or non-finite frame time.
    BadTimestep = 3,
}

/// Number of warning kinds.
pub const NUM_WARNINGS: usize = 4;

/// Per-warning statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WarningStat {
    /// Simulation time of the most recent occurrence.
    pub last_time: f64,
    /// Cumulative count since last reset.
    pub count: u32,
}

/// Per-kind warning counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Warnings {
    stats: [WarningStat; NUM_WARNINGS],
}

impl Warnings {
    /// Record a warning at simulation time `time`, logging it on first occurrence.
    pub fn record(&mut self, warning: Warning, time: f64, detail: &str) {
        let stat = &mut self.stats[warning as usize];
        if stat.count == 0 {
            tracing::warn!("{} ({detail}). Time = {time:.4}.", warning_text(warning));
        }
        stat.last_time = time;
        stat.count = stat.count.saturating_add(1);
    }

    /// Statistics for one kind.
    #[must_use]
    pub fn stat(&self, warning: Warning) -> WarningStat {
        self.stats[warning as usize]
    }

    /// Occurrences of one kind since the last reset.
    #[must_use]
    pub fn count(&self, warning: Warning) -> u32 {
        self.stats[warning as usize].count
    }

    /// Whether nothing has been recorded since the last reset.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.stats.iter().all(|s| s.count == 0)
    }

    /// Zero all counters.
    pub fn clear(&mut self) {
        self.stats = [WarningStat::default(); NUM_WARNINGS];
    }
}

fn warning_text(warning: Warning) -> &'static str {
    match warning {
        Warning::SingularContact => "Warning: singular contact geometry, sub-step skipped",
        Warning::SingularMatrix => "Warning: singular constraint matrix, sub-step skipped",
        Warning::BadState => "Warning: state diverged",
        Warning::BadTimestep => "Warning: invalid frame time ignored",
    }
}

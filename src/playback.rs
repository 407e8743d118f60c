use std::time::Duration;

use crate::recorder::{Operation, OperationLog};
use crate::view::{Canvas, View};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Turns elapsed time into whole ticks of a fixed interval.
///
/// The host feeds it whatever time passed (frame time, or a virtual clock in
/// tests); leftover time below one interval carries over to the next call.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    pending: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker {
            interval: interval.max(Duration::from_nanos(1)),
            pending: Duration::ZERO,
        }
    }

    /// Ticker firing `rate` times per second
    pub fn per_second(rate: u32) -> Self {
        Self::new(Duration::from_secs(1) / rate.max(1))
    }

    /// Number of ticks that became due during `elapsed`, saturating at
    /// `u32::MAX`
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let pending = self.pending.saturating_add(elapsed).as_nanos();
        let interval = self.interval.as_nanos();
        let remainder = pending % interval;
        self.pending = Duration::new(
            (remainder / NANOS_PER_SEC) as u64,
            (remainder % NANOS_PER_SEC) as u32,
        );
        u32::try_from(pending / interval).unwrap_or(u32::MAX)
    }

    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }
}

/// Result of one playback tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// The operation was painted
    Applied(Operation),
    /// Nothing visualizable remained; the log is exhausted
    Drained,
    /// The timer is not running
    Idle,
}

/// Replays a recorded operation log at a fixed rate.
///
/// Non-visualizable operations are skipped within the same tick, so every
/// tick paints exactly one cell until the log runs dry.
#[derive(Debug)]
pub struct PlaybackScheduler {
    log: OperationLog,
    ticker: Ticker,
    running: bool,
    applied: usize,
}

impl PlaybackScheduler {
    pub fn new(operations_per_second: u32) -> Self {
        PlaybackScheduler {
            log: OperationLog::new(),
            ticker: Ticker::per_second(operations_per_second),
            running: false,
            applied: 0,
        }
    }

    /// Replace whatever was loaded with a fresh trace and start the timer
    pub fn start(&mut self, log: OperationLog) {
        self.log = log;
        self.applied = 0;
        self.ticker.reset();
        self.running = true;
    }

    /// Continue the remaining log after a `stop`
    pub fn resume(&mut self) {
        self.ticker.reset();
        self.running = true;
    }

    /// Tear down the timer, keeping whatever is left of the log
    pub fn stop(&mut self) {
        self.running = false;
        self.ticker.reset();
    }

    /// Tear down the timer and drop the remaining log
    pub fn discard(&mut self) {
        self.stop();
        self.log = OperationLog::new();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> usize {
        self.log.len()
    }

    /// Operations painted since the last `start`
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Ticks due after `elapsed`; zero while stopped
    pub fn due(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.ticker.advance(elapsed)
    }

    /// Pop up to the next visualizable operation and paint it
    pub fn tick<V: View>(&mut self, canvas: &mut Canvas<V>) -> Tick {
        if !self.running {
            return Tick::Idle;
        }

        loop {
            let Some(op) = self.log.pop_front() else {
                return Tick::Drained;
            };
            if op.kind.is_visualizable() {
                canvas.set_attribute(op.x, op.y, op.kind, op.value);
                self.applied += 1;
                return Tick::Applied(op);
            }
        }
    }
}

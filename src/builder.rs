use std::future::Future;

use tracing::debug;

use crate::view::{BuildProgress, View};

/// Where a grid build stands after a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStatus {
    /// A row was built; more follow
    Built(BuildProgress),
    /// The last row was built. Reported exactly once.
    Complete,
    /// Already complete or cancelled; nothing happened
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Done,
    Cancelled,
}

/// Builds the visual grid one row per step so the host can keep drawing
/// between rows.
///
/// Rows are built in ascending order. A build can be cancelled between
/// steps; a cancelled build never reports completion.
#[derive(Debug)]
pub struct GridBuilder {
    cols: i32,
    rows: i32,
    next_row: i32,
    phase: Phase,
}

impl GridBuilder {
    pub fn new(cols: i32, rows: i32) -> Self {
        GridBuilder {
            cols,
            rows,
            next_row: 0,
            phase: Phase::Running,
        }
    }

    /// Size the view and return the builder ready for its first row
    pub fn begin<V: View>(cols: i32, rows: i32, view: &mut V) -> Self {
        view.initialize(cols, rows);
        Self::new(cols, rows)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn cancel(&mut self) {
        if self.phase == Phase::Running {
            debug!("grid build cancelled after {} of {} rows", self.next_row, self.rows);
            self.phase = Phase::Cancelled;
        }
    }

    /// Build the next row. The step after the last row reports `Complete`.
    pub fn step<V: View>(&mut self, view: &mut V) -> BuildStatus {
        if self.phase != Phase::Running {
            return BuildStatus::Idle;
        }

        if self.next_row >= self.rows {
            self.phase = Phase::Done;
            debug!("grid build complete: {}x{}", self.cols, self.rows);
            return BuildStatus::Complete;
        }

        let row = self.next_row;
        view.build_row(row);
        let progress = BuildProgress { row, rows: self.rows };
        view.report_progress(progress);
        self.next_row += 1;
        BuildStatus::Built(progress)
    }

    /// Drive the build to the end, awaiting `yield_now` after every row and
    /// calling `on_complete` once the last row is in place.
    ///
    /// Returns `false` without calling `on_complete` if the build was
    /// already cancelled or finished.
    pub async fn run<V, Y, F>(mut self, view: &mut V, mut yield_now: Y, on_complete: impl FnOnce(&mut V)) -> bool
    where
        V: View,
        Y: FnMut() -> F,
        F: Future<Output = ()>,
    {
        loop {
            match self.step(view) {
                BuildStatus::Built(_) => yield_now().await,
                BuildStatus::Complete => {
                    on_complete(view);
                    return true;
                }
                BuildStatus::Idle => return false,
            }
        }
    }
}

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pathfinding::NodeObserver;

/// Node status a finder reports while it searches
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Walkable,
    Opened,
    Closed,
    Parent,
}

impl OperationKind {
    /// Kinds the playback shows; everything else is skipped
    pub fn is_visualizable(self) -> bool {
        matches!(self, OperationKind::Opened | OperationKind::Closed)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Walkable => "walkable",
            OperationKind::Opened => "opened",
            OperationKind::Closed => "closed",
            OperationKind::Parent => "parent",
        };
        f.write_str(name)
    }
}

/// One recorded node-status change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub x: i32,
    pub y: i32,
    pub kind: OperationKind,
    pub value: bool,
}

/// Ordered trace of a single search, oldest first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationLog {
    operations: VecDeque<Operation>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: Operation) {
        self.operations.push_back(op);
    }

    /// Remove and return the oldest operation
    pub fn pop_front(&mut self) -> Option<Operation> {
        self.operations.pop_front()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    pub fn visualizable_count(&self) -> usize {
        self.iter().filter(|op| op.kind.is_visualizable()).count()
    }

    /// Count of operations per kind
    pub fn counts(&self) -> BTreeMap<OperationKind, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.operations {
            *counts.entry(op.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> String {
        let per_kind: Vec<String> = self
            .counts()
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();
        format!(
            "{} operations ({} visualizable): {}",
            self.len(),
            self.visualizable_count(),
            per_kind.join(", ")
        )
    }

    /// Save the trace as pretty JSON
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl FromIterator<Operation> for OperationLog {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        OperationLog {
            operations: iter.into_iter().collect(),
        }
    }
}

/// Node observer that appends every call to an operation log.
///
/// The recorder never filters; the log is handed over with [`take`] once the
/// search returns.
///
/// [`take`]: OperationRecorder::take
#[derive(Debug, Default)]
pub struct OperationRecorder {
    log: OperationLog,
}

impl OperationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Move the recorded log out, leaving the recorder empty
    pub fn take(&mut self) -> OperationLog {
        std::mem::take(&mut self.log)
    }
}

impl NodeObserver for OperationRecorder {
    fn on_node(&mut self, x: i32, y: i32, kind: OperationKind, value: bool) {
        self.log.push(Operation { x, y, kind, value });
    }
}

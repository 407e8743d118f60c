pub mod builder;
pub mod config;
pub mod controller;
pub mod controls;
pub mod coords;
pub mod error;
pub mod grid;
pub mod pathfinding;
pub mod playback;
pub mod recorder;
pub mod state;
pub mod view;

pub use controller::Controller;
pub use coords::CellMapper;
pub use error::{PathvizError, Result};
pub use grid::{Grid, Position};
pub use recorder::{Operation, OperationKind, OperationLog, OperationRecorder};
pub use state::{Event, UiState};
pub use view::{Canvas, SearchStats, View};

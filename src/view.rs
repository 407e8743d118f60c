use tracing::warn;

use crate::controls::CommandSlot;
use crate::grid::Position;
use crate::recorder::OperationKind;

/// Figures shown once a search has finished playing back
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchStats {
    pub path_length: f64,
    pub elapsed_ms: u128,
    pub operation_count: usize,
}

/// Grid construction progress after a row has been built
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildProgress {
    pub row: i32,
    pub rows: i32,
}

impl BuildProgress {
    /// Rounded percentage of rows built so far
    pub fn percent(&self) -> u32 {
        if self.rows <= 0 {
            return 100;
        }
        ((self.row + 1) as f64 / self.rows as f64 * 100.0).round() as u32
    }
}

/// Presentation surface the controller drives.
///
/// Implementations only draw; the controller decides what and when.
pub trait View {
    fn initialize(&mut self, cols: i32, rows: i32);

    /// Construct the visual cells of one row
    fn build_row(&mut self, row: i32);

    fn report_progress(&mut self, progress: BuildProgress);

    /// `kind` is one of `Walkable`, `Opened`, `Closed`
    fn set_cell_attribute(&mut self, x: i32, y: i32, kind: OperationKind, value: bool);

    fn set_start_marker(&mut self, x: i32, y: i32);

    fn set_end_marker(&mut self, x: i32, y: i32);

    /// Never called with an empty path
    fn draw_path(&mut self, path: &[Position]);

    fn clear_path(&mut self);

    fn show_statistics(&mut self, stats: &SearchStats);

    fn show_commands(&mut self, commands: &[CommandSlot; 3]);
}

/// Wraps a [`View`] and remembers which cells were painted as walls and
/// which were touched by playback.
pub struct Canvas<V> {
    view: V,
    walls: Vec<Position>,
    dirty: Vec<Position>,
}

impl<V: View> Canvas<V> {
    pub fn new(view: V) -> Self {
        Canvas {
            view,
            walls: Vec::new(),
            dirty: Vec::new(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Paint a cell. Walls are remembered, opened/closed cells become dirty,
    /// anything else is reported and dropped.
    pub fn set_attribute(&mut self, x: i32, y: i32, kind: OperationKind, value: bool) {
        match kind {
            OperationKind::Walkable => {
                if !value {
                    self.walls.push(Position::new(x, y));
                }
            }
            OperationKind::Opened | OperationKind::Closed => {
                self.dirty.push(Position::new(x, y));
            }
            OperationKind::Parent => {
                warn!("unsupported operation: {}:{} at ({},{})", kind, value, x, y);
                return;
            }
        }
        self.view.set_cell_attribute(x, y, kind, value);
    }

    /// Every coordinate ever painted as a wall, duplicates included
    pub fn walls(&self) -> &[Position] {
        &self.walls
    }

    pub fn dirty(&self) -> &[Position] {
        &self.dirty
    }

    pub fn take_dirty(&mut self) -> Vec<Position> {
        std::mem::take(&mut self.dirty)
    }

    pub fn take_walls(&mut self) -> Vec<Position> {
        std::mem::take(&mut self.walls)
    }
}

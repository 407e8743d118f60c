use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::builder::{BuildStatus, GridBuilder};
use crate::config::Config;
use crate::controls::{command_slots, CommandSlot};
use crate::coords::CellMapper;
use crate::grid::{Grid, Position};
use crate::pathfinding::{format_path, path_length, Finder};
use crate::playback::{PlaybackScheduler, Tick};
use crate::recorder::{OperationKind, OperationLog, OperationRecorder};
use crate::state::{Event, UiState};
use crate::view::{Canvas, SearchStats, View};

/// Owns the grid, the recorder, the playback and the canvas, and only lets
/// them change through the state machine.
pub struct Controller<V: View> {
    state: UiState,
    grid: Grid,
    canvas: Canvas<V>,
    mapper: CellMapper,
    recorder: OperationRecorder,
    playback: PlaybackScheduler,
    builder: Option<GridBuilder>,
    grid_built: bool,
    finder: Box<dyn Finder>,
    start: Position,
    end: Position,
    path: Vec<Position>,
    elapsed_ms: u128,
    operation_count: usize,
    last_trace: Option<OperationLog>,
    last_stats: Option<SearchStats>,
}

/// Walkable cell closest to `target`, other than `taken`. Ties go to the
/// first cell in row-major order.
fn nearest_walkable(grid: &Grid, target: Position, taken: Option<Position>) -> Option<Position> {
    (0..grid.rows)
        .flat_map(|y| (0..grid.cols).map(move |x| Position::new(x, y)))
        .filter(|&p| grid.is_walkable_at(p.x, p.y) && Some(p) != taken)
        .min_by_key(|p| {
            let dx = i64::from(p.x - target.x);
            let dy = i64::from(p.y - target.y);
            dx * dx + dy * dy
        })
}

/// Start and end markers ten cells apart around the middle of the grid,
/// each moved to the nearest walkable cell so they never coincide
fn default_endpoints(grid: &Grid) -> (Position, Position) {
    let clamp_x = |x: i32| x.clamp(0, (grid.cols - 1).max(0));
    let center_x = grid.cols / 2;
    let center_y = grid.rows / 2;
    let preferred_start = Position::new(clamp_x(center_x - 5), center_y);
    let preferred_end = Position::new(clamp_x(center_x + 5), center_y);

    let start = nearest_walkable(grid, preferred_start, None);
    let end = nearest_walkable(grid, preferred_end, start);
    match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            warn!(
                "{}x{} grid has fewer than two walkable cells; markers left at defaults",
                grid.cols, grid.rows
            );
            (preferred_start, preferred_end)
        }
    }
}

impl<V: View> Controller<V> {
    pub fn new(
        grid: Grid,
        view: V,
        mapper: CellMapper,
        finder: Box<dyn Finder>,
        operations_per_second: u32,
    ) -> Self {
        let (start, end) = default_endpoints(&grid);
        Controller {
            state: UiState::Uninitialized,
            grid,
            canvas: Canvas::new(view),
            mapper,
            recorder: OperationRecorder::new(),
            playback: PlaybackScheduler::new(operations_per_second),
            builder: None,
            grid_built: false,
            finder,
            start,
            end,
            path: Vec::new(),
            elapsed_ms: 0,
            operation_count: 0,
            last_trace: None,
            last_stats: None,
        }
    }

    pub fn from_config(config: &Config, view: V) -> Self {
        Self::new(
            Grid::new(config.grid.cols, config.grid.rows),
            view,
            CellMapper::new(config.grid.cell_size),
            config.search.build_finder(),
            config.playback.operations_per_second,
        )
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn can(&self, event: Event) -> bool {
        self.state.can(event)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn canvas(&self) -> &Canvas<V> {
        &self.canvas
    }

    pub fn view(&self) -> &V {
        self.canvas.view()
    }

    /// Direct access for host-side view state; cell painting should go
    /// through the controller
    pub fn view_mut(&mut self) -> &mut V {
        self.canvas.view_mut()
    }

    pub fn mapper(&self) -> &CellMapper {
        &self.mapper
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn finder_name(&self) -> &'static str {
        self.finder.name()
    }

    /// Path of the last search; empty if none was found
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn last_stats(&self) -> Option<SearchStats> {
        self.last_stats
    }

    /// Full trace of the last search, unaffected by playback
    pub fn last_trace(&self) -> Option<&OperationLog> {
        self.last_trace.as_ref()
    }

    pub fn playback(&self) -> &PlaybackScheduler {
        &self.playback
    }

    pub fn commands(&self) -> [CommandSlot; 3] {
        command_slots(self.state)
    }

    /// Fire `event` if the current state allows it.
    ///
    /// Returns `false` and changes nothing otherwise.
    pub fn fire(&mut self, event: Event) -> bool {
        let from = self.state;
        let Some(to) = from.next(event) else {
            trace!("rejected {:?} in {}", event, from);
            return false;
        };

        self.leave(from, to);
        self.state = to;
        debug!("=> {}", to);
        self.canvas.view_mut().show_commands(&command_slots(to));
        self.enter(from, to, event);
        true
    }

    fn leave(&mut self, from: UiState, to: UiState) {
        match (from, to) {
            (UiState::Uninitialized, _) => self.ensure_built(),
            (UiState::Searching, UiState::Paused) => self.playback.stop(),
            (UiState::Searching | UiState::Paused, UiState::Searching | UiState::Finished) => {}
            (UiState::Searching | UiState::Paused, _) => {
                debug!("discarding {} unplayed operations", self.playback.remaining());
                self.playback.discard();
            }
            _ => {}
        }
    }

    fn enter(&mut self, from: UiState, to: UiState, event: Event) {
        match to {
            UiState::Starting => {
                self.clear_path();
                self.clear_footprints();
                self.fire(Event::Search);
            }
            UiState::Searching if from == UiState::Paused => self.playback.resume(),
            UiState::Searching => self.search(),
            UiState::Finished => self.finish(),
            UiState::Ready => match event {
                Event::Cancel => self.clear_footprints(),
                Event::Clear => {
                    self.clear_path();
                    self.clear_footprints();
                }
                Event::Reset => {
                    self.clear_path();
                    self.clear_footprints();
                    self.clear_walls();
                }
                _ => {}
            },
            _ => {}
        }
    }

    /// Run the finder on a snapshot of the grid and start replaying its trace
    fn search(&mut self) {
        let mut snapshot = self.grid.clone();
        let timer = Instant::now();
        let path = self
            .finder
            .find_path(self.start, self.end, &mut snapshot, &mut self.recorder);
        self.elapsed_ms = timer.elapsed().as_millis();

        let log = self.recorder.take();
        info!(
            finder = self.finder.name(),
            "searched in {}ms: {}",
            self.elapsed_ms,
            log.summary()
        );
        debug!("path: {}", format_path(&path));

        self.path = path;
        self.operation_count = log.len();
        self.last_trace = Some(log.clone());
        self.playback.start(log);
    }

    fn finish(&mut self) {
        self.playback.discard();
        if !self.path.is_empty() {
            self.canvas.view_mut().draw_path(&self.path);
        }

        let stats = SearchStats {
            path_length: path_length(&self.path),
            elapsed_ms: self.elapsed_ms,
            operation_count: self.operation_count,
        };
        self.canvas.view_mut().show_statistics(&stats);
        self.last_stats = Some(stats);
    }

    fn clear_path(&mut self) {
        self.canvas.view_mut().clear_path();
    }

    /// Repaint cells touched by playback. Cells walled over since then keep
    /// their wall.
    fn clear_footprints(&mut self) {
        for pos in self.canvas.take_dirty() {
            if self.grid.is_walkable_at(pos.x, pos.y) {
                self.canvas.set_attribute(pos.x, pos.y, OperationKind::Walkable, true);
            }
        }
    }

    fn clear_walls(&mut self) {
        for pos in self.canvas.take_walls() {
            if !self.grid.is_walkable_at(pos.x, pos.y) && self.grid.contains(pos.x, pos.y) {
                self.grid.set_walkable_at(pos.x, pos.y, true);
                self.canvas.set_attribute(pos.x, pos.y, OperationKind::Walkable, true);
            }
        }
    }

    // ---- grid construction ----

    /// Size the view and start building it row by row through [`advance`].
    ///
    /// [`advance`]: Controller::advance
    pub fn begin(&mut self) {
        if self.state != UiState::Uninitialized || self.builder.is_some() || self.grid_built {
            return;
        }
        self.builder = Some(GridBuilder::begin(
            self.grid.cols,
            self.grid.rows,
            self.canvas.view_mut(),
        ));
    }

    /// Build the whole view, awaiting `yield_now` between rows, then fire
    /// `init`.
    pub async fn build_grid<Y, F>(&mut self, yield_now: Y) -> bool
    where
        Y: FnMut() -> F,
        F: Future<Output = ()>,
    {
        if self.state != UiState::Uninitialized || self.builder.is_some() || self.grid_built {
            return false;
        }

        let (start, end) = (self.start, self.end);
        let builder = GridBuilder::begin(self.grid.cols, self.grid.rows, self.canvas.view_mut());
        let completed = builder
            .run(self.canvas.view_mut(), yield_now, |view| {
                view.set_start_marker(start.x, start.y);
                view.set_end_marker(end.x, end.y);
            })
            .await;
        if !completed {
            return false;
        }

        self.grid_built = true;
        self.fire(Event::Init)
    }

    /// Finish any build in progress synchronously and paint the grid's
    /// initial walls and the markers
    fn ensure_built(&mut self) {
        if !self.grid_built {
            let (cols, rows) = (self.grid.cols, self.grid.rows);
            let view = self.canvas.view_mut();
            let mut builder = self
                .builder
                .take()
                .unwrap_or_else(|| GridBuilder::begin(cols, rows, view));
            while builder.is_running() {
                builder.step(self.canvas.view_mut());
            }
            self.grid_built = true;
        }

        for y in 0..self.grid.rows {
            for x in 0..self.grid.cols {
                if !self.grid.is_walkable_at(x, y) {
                    self.canvas.set_attribute(x, y, OperationKind::Walkable, false);
                }
            }
        }
        let view = self.canvas.view_mut();
        view.set_start_marker(self.start.x, self.start.y);
        view.set_end_marker(self.end.x, self.end.y);
    }

    /// Let `elapsed` time pass: builds one row while the grid is under
    /// construction, otherwise plays back every operation that became due.
    pub fn advance(&mut self, elapsed: Duration) {
        if let Some(builder) = self.builder.as_mut() {
            match builder.step(self.canvas.view_mut()) {
                BuildStatus::Complete => {
                    self.fire(Event::Init);
                }
                BuildStatus::Built(_) => return,
                BuildStatus::Idle => self.builder = None,
            }
        }

        let due = self.playback.due(elapsed);
        for _ in 0..due {
            if !matches!(self.tick(), Tick::Applied(_)) {
                break;
            }
        }
    }

    /// One playback tick; fires `finish` once the trace is exhausted
    pub fn tick(&mut self) -> Tick {
        let tick = self.playback.tick(&mut self.canvas);
        if tick == Tick::Drained {
            self.fire(Event::Finish);
        }
        tick
    }

    // ---- editing ----

    /// Move the start marker onto a walkable cell other than the end
    pub fn place_start(&mut self, pos: Position) -> bool {
        if !self.grid.is_walkable_at(pos.x, pos.y) || pos == self.end {
            return false;
        }
        self.start = pos;
        if self.grid_built {
            self.canvas.view_mut().set_start_marker(pos.x, pos.y);
        }
        true
    }

    /// Move the end marker onto a walkable cell other than the start
    pub fn place_end(&mut self, pos: Position) -> bool {
        if !self.grid.is_walkable_at(pos.x, pos.y) || pos == self.start {
            return false;
        }
        self.end = pos;
        if self.grid_built {
            self.canvas.view_mut().set_end_marker(pos.x, pos.y);
        }
        true
    }

    /// Place both markers at once; fails without changes unless both cells
    /// are walkable and distinct
    pub fn place_endpoints(&mut self, start: Position, end: Position) -> bool {
        let usable = |p: Position| self.grid.is_walkable_at(p.x, p.y);
        if start == end || !usable(start) || !usable(end) {
            return false;
        }
        self.start = start;
        self.end = end;
        if self.grid_built {
            let view = self.canvas.view_mut();
            view.set_start_marker(start.x, start.y);
            view.set_end_marker(end.x, end.y);
        }
        true
    }

    fn set_walkable_at(&mut self, pos: Position, walkable: bool) {
        if !self.grid.contains(pos.x, pos.y) || self.grid.is_walkable_at(pos.x, pos.y) == walkable {
            return;
        }
        self.grid.set_walkable_at(pos.x, pos.y, walkable);
        self.canvas.set_attribute(pos.x, pos.y, OperationKind::Walkable, walkable);
    }

    /// Swap the finder used by the next search; marks a finished search as
    /// modified
    pub fn select_finder(&mut self, finder: Box<dyn Finder>) {
        info!("finder selected: {}", finder.name());
        self.finder = finder;
        self.fire(Event::Modify);
    }

    // ---- pointer input ----

    pub fn pointer_down(&mut self, page_x: f32, page_y: f32) {
        let pos = self.mapper.to_grid_coordinate(page_x, page_y);
        if !self.grid.contains(pos.x, pos.y) {
            return;
        }

        if self.can(Event::DragStart) && pos == self.start {
            self.fire(Event::DragStart);
        } else if self.can(Event::DragEnd) && pos == self.end {
            self.fire(Event::DragEnd);
        } else if self.can(Event::DrawWall) && self.grid.is_walkable_at(pos.x, pos.y) {
            self.fire(Event::DrawWall);
            self.set_walkable_at(pos, false);
        } else if self.can(Event::EraseWall) && !self.grid.is_walkable_at(pos.x, pos.y) {
            self.fire(Event::EraseWall);
            self.set_walkable_at(pos, true);
        }
    }

    pub fn pointer_move(&mut self, page_x: f32, page_y: f32) {
        let pos = self.mapper.to_grid_coordinate(page_x, page_y);
        if pos == self.start || pos == self.end {
            return;
        }

        match self.state {
            UiState::DraggingStart => {
                self.place_start(pos);
            }
            UiState::DraggingEnd => {
                self.place_end(pos);
            }
            UiState::DrawingWall => self.set_walkable_at(pos, false),
            UiState::ErasingWall => self.set_walkable_at(pos, true),
            _ => {}
        }
    }

    pub fn pointer_up(&mut self) {
        if self.can(Event::Rest) {
            self.fire(Event::Rest);
        }
    }
}

#![allow(dead_code)]

use std::future::Future;
use std::pin::pin;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use pathviz::controls::CommandSlot;
use pathviz::pathfinding::{FinderKind, Heuristic};
use pathviz::view::BuildProgress;
use pathviz::{
    CellMapper, Controller, Grid, Operation, OperationKind, Position, SearchStats, UiState, View,
};

/// Pixel size of a cell in every test controller
pub const CELL: f32 = 10.0;

/// Playback rate used by the tests: one operation per 10ms
pub const RATE: u32 = 100;
pub const TICK: Duration = Duration::from_millis(10);

/// View that remembers every call the controller makes
#[derive(Default)]
pub struct RecordingView {
    pub initialized: Option<(i32, i32)>,
    pub rows_built: Vec<i32>,
    pub progress: Vec<BuildProgress>,
    pub painted: Vec<Operation>,
    pub start_marker: Option<Position>,
    pub end_marker: Option<Position>,
    pub drawn_paths: Vec<Vec<Position>>,
    pub path_clears: usize,
    pub stats: Vec<SearchStats>,
    pub commands: Vec<[CommandSlot; 3]>,
}

impl RecordingView {
    /// Opened/closed cells painted so far, in paint order
    pub fn played(&self) -> Vec<Operation> {
        self.painted
            .iter()
            .copied()
            .filter(|op| op.kind.is_visualizable())
            .collect()
    }
}

impl View for RecordingView {
    fn initialize(&mut self, cols: i32, rows: i32) {
        self.initialized = Some((cols, rows));
    }

    fn build_row(&mut self, row: i32) {
        self.rows_built.push(row);
    }

    fn report_progress(&mut self, progress: BuildProgress) {
        self.progress.push(progress);
    }

    fn set_cell_attribute(&mut self, x: i32, y: i32, kind: OperationKind, value: bool) {
        self.painted.push(Operation { x, y, kind, value });
    }

    fn set_start_marker(&mut self, x: i32, y: i32) {
        self.start_marker = Some(Position::new(x, y));
    }

    fn set_end_marker(&mut self, x: i32, y: i32) {
        self.end_marker = Some(Position::new(x, y));
    }

    fn draw_path(&mut self, path: &[Position]) {
        self.drawn_paths.push(path.to_vec());
    }

    fn clear_path(&mut self) {
        self.path_clears += 1;
    }

    fn show_statistics(&mut self, stats: &SearchStats) {
        self.stats.push(*stats);
    }

    fn show_commands(&mut self, commands: &[CommandSlot; 3]) {
        self.commands.push(*commands);
    }
}

/// Controller on an unbuilt grid, A* with the Manhattan heuristic
pub fn controller(grid: Grid) -> Controller<RecordingView> {
    Controller::new(
        grid,
        RecordingView::default(),
        CellMapper::new(CELL),
        FinderKind::AStar.build(Heuristic::Manhattan, false),
        RATE,
    )
}

/// Controller with the grid built row by row and sitting in `Ready`
pub fn ready_controller(grid: Grid, start: Position, end: Position) -> Controller<RecordingView> {
    let mut c = controller(grid);
    assert!(c.place_endpoints(start, end), "endpoints must be walkable and distinct");
    c.begin();
    for _ in 0..=c.grid().rows {
        c.advance(Duration::ZERO);
    }
    assert_eq!(c.state(), UiState::Ready);
    c
}

/// Feed playback ticks until the search leaves `Searching`
pub fn play_to_end(c: &mut Controller<RecordingView>) {
    for _ in 0..100_000 {
        if c.state() != UiState::Searching {
            return;
        }
        c.advance(TICK);
    }
    panic!("playback never finished");
}

/// Page coordinate in the middle of a cell
pub fn page(x: i32, y: i32) -> (f32, f32) {
    (x as f32 * CELL + CELL / 2.0, y as f32 * CELL + CELL / 2.0)
}

/// Future that is pending exactly once, like waiting for the next frame
pub struct NextFrame(bool);

pub fn next_frame() -> NextFrame {
    NextFrame(false)
}

impl Future for NextFrame {
    type Output = ();

    fn poll(mut self: std::pin::Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            Poll::Pending
        }
    }
}

/// Poll a future to completion on the current thread, counting polls
pub fn block_on<F: Future>(fut: F) -> (F::Output, usize) {
    let mut fut = pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    let mut polls = 0;
    loop {
        polls += 1;
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return (out, polls);
        }
    }
}

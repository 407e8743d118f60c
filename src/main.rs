use std::sync::OnceLock;
use std::time::Duration;

use arboard::Clipboard;
use macroquad::prelude::*;
use pathviz::config::Config;
use pathviz::controls::CommandSlot;
use pathviz::pathfinding::FinderKind;
use pathviz::view::BuildProgress;
use pathviz::{CellMapper, Controller, OperationKind, Position, SearchStats, View};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

const PANEL_HEIGHT: f32 = 90.0;
const BUTTON_WIDTH: f32 = 160.0;
const BUTTON_HEIGHT: f32 = 34.0;
const BUTTON_GAP: f32 = 12.0;

static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Clone, Copy, PartialEq)]
enum CellPaint {
    Normal,
    Blocked,
    Opened,
    Closed,
}

impl CellPaint {
    fn color(self) -> Color {
        match self {
            CellPaint::Normal => WHITE,
            CellPaint::Blocked => GRAY,
            CellPaint::Opened => Color::from_rgba(152, 251, 152, 255),
            CellPaint::Closed => Color::from_rgba(175, 238, 238, 255),
        }
    }
}

/// Immediate-mode rendering of everything the controller paints
struct MacroquadView {
    mapper: CellMapper,
    cols: i32,
    rows: i32,
    cells: Vec<CellPaint>,
    built_rows: i32,
    progress: Option<BuildProgress>,
    start: Option<Position>,
    end: Option<Position>,
    path: Vec<Position>,
    stats: Option<SearchStats>,
    commands: [CommandSlot; 3],
    background: Color,
    status: String,
}

impl MacroquadView {
    fn new(config: &Config) -> Self {
        MacroquadView {
            mapper: CellMapper::new(config.grid.cell_size),
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            built_rows: 0,
            progress: None,
            start: None,
            end: None,
            path: Vec::new(),
            stats: None,
            commands: pathviz::controls::command_slots(pathviz::UiState::Uninitialized),
            background: Color::from_rgba(
                config.visual.background_r,
                config.visual.background_g,
                config.visual.background_b,
                255,
            ),
            status: String::new(),
        }
    }

    fn grid_height(&self) -> f32 {
        self.rows as f32 * self.mapper.cell_size
    }

    fn button_rect(&self, slot: usize) -> Rect {
        Rect::new(
            10.0 + slot as f32 * (BUTTON_WIDTH + BUTTON_GAP),
            self.grid_height() + 10.0,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        )
    }

    /// Command under the pointer, if its button is enabled
    fn command_at(&self, x: f32, y: f32) -> Option<pathviz::Event> {
        (0..3)
            .find(|&slot| self.button_rect(slot).contains(vec2(x, y)))
            .and_then(|slot| self.commands[slot].event)
    }

    fn cell_index(&self, x: i32, y: i32) -> usize {
        x as usize + y as usize * self.cols as usize
    }

    fn draw_marker(&self, pos: Option<Position>, color: Color) {
        if let Some(pos) = pos {
            let (x, y) = self.mapper.to_page_coordinate(pos.x, pos.y);
            let size = self.mapper.cell_size;
            draw_rectangle(x, y, size - 1.0, size - 1.0, color);
        }
    }

    fn draw(&self, finder_name: &str) {
        clear_background(self.background);
        let size = self.mapper.cell_size;

        for y in 0..self.built_rows {
            for x in 0..self.cols {
                let (px, py) = self.mapper.to_page_coordinate(x, y);
                let paint = self.cells[self.cell_index(x, y)];
                draw_rectangle(px, py, size - 1.0, size - 1.0, paint.color());
            }
        }

        self.draw_marker(self.start, Color::from_rgba(0, 221, 0, 255));
        self.draw_marker(self.end, Color::from_rgba(238, 68, 0, 255));

        for pair in self.path.windows(2) {
            let (x1, y1) = self.mapper.cell_center(pair[0]);
            let (x2, y2) = self.mapper.cell_center(pair[1]);
            draw_line(x1, y1, x2, y2, 3.0, YELLOW);
        }

        for (slot, command) in self.commands.iter().enumerate() {
            let rect = self.button_rect(slot);
            let fill = if command.is_enabled() { DARKBLUE } else { DARKGRAY };
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);
            draw_text(command.label, rect.x + 10.0, rect.y + 23.0, 22.0, WHITE);
        }

        let text_x = 10.0 + 3.0 * (BUTTON_WIDTH + BUTTON_GAP);
        let text_y = self.grid_height() + 22.0;
        let info = match (self.progress, self.stats) {
            (Some(progress), _) if self.built_rows < self.rows => {
                format!("generating grid {}%", progress.percent())
            }
            (_, Some(stats)) => format!(
                "length: {:.2}   time: {}ms   operations: {}",
                stats.path_length, stats.elapsed_ms, stats.operation_count
            ),
            _ => String::new(),
        };
        draw_text(&info, text_x, text_y, 20.0, WHITE);
        draw_text(
            &format!("finder: {}   [1-4] finder  [C] copy layout  [T] save trace", finder_name),
            text_x,
            text_y + 22.0,
            18.0,
            LIGHTGRAY,
        );
        draw_text(&self.status, text_x, text_y + 44.0, 18.0, LIGHTGRAY);
    }
}

impl View for MacroquadView {
    fn initialize(&mut self, cols: i32, rows: i32) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![CellPaint::Normal; cols.max(0) as usize * rows.max(0) as usize];
        self.built_rows = 0;
    }

    fn build_row(&mut self, row: i32) {
        self.built_rows = self.built_rows.max(row + 1);
    }

    fn report_progress(&mut self, progress: BuildProgress) {
        self.progress = Some(progress);
        // The build yields a frame per row, so draw what exists so far
        self.draw("");
    }

    fn set_cell_attribute(&mut self, x: i32, y: i32, kind: OperationKind, value: bool) {
        if x < 0 || x >= self.cols || y < 0 || y >= self.rows {
            return;
        }
        let paint = match kind {
            OperationKind::Walkable if value => CellPaint::Normal,
            OperationKind::Walkable => CellPaint::Blocked,
            OperationKind::Opened => CellPaint::Opened,
            OperationKind::Closed => CellPaint::Closed,
            other => {
                warn!("unsupported operation: {}:{}", other, value);
                return;
            }
        };
        let index = self.cell_index(x, y);
        self.cells[index] = paint;
    }

    fn set_start_marker(&mut self, x: i32, y: i32) {
        self.start = Some(Position::new(x, y));
    }

    fn set_end_marker(&mut self, x: i32, y: i32) {
        self.end = Some(Position::new(x, y));
    }

    fn draw_path(&mut self, path: &[Position]) {
        self.path = path.to_vec();
    }

    fn clear_path(&mut self) {
        self.path.clear();
        self.stats = None;
    }

    fn show_statistics(&mut self, stats: &SearchStats) {
        self.stats = Some(*stats);
    }

    fn show_commands(&mut self, commands: &[CommandSlot; 3]) {
        self.commands = *commands;
    }
}

fn copy_to_clipboard(text: &str) -> String {
    match Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text) {
                warn!("Failed to copy to clipboard: {}", e);
                "copy failed".to_string()
            } else {
                info!("Grid layout copied to clipboard");
                // Keep clipboard alive for a moment to ensure clipboard managers can capture it
                std::thread::sleep(Duration::from_millis(100));
                "layout copied".to_string()
            }
        }
        Err(e) => {
            warn!("Failed to access clipboard: {}", e);
            "clipboard unavailable".to_string()
        }
    }
}

/// Install logging, then read `config.toml` once. `RUST_LOG` wins over the
/// configured filter.
fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let from_env = EnvFilter::try_from_default_env().ok();
        let overridden = from_env.is_some();
        let (filter, handle) =
            reload::Layer::new(from_env.unwrap_or_else(|| EnvFilter::new("info")));
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();

        let config = Config::load();
        if !overridden {
            if let Err(e) = handle.reload(EnvFilter::new(&config.logging.filter)) {
                warn!("Failed to apply log filter {}: {}", config.logging.filter, e);
            }
        }
        config
    })
}

fn window_conf() -> Conf {
    let config = config();
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: (config.grid.cols as f32 * config.grid.cell_size) as i32,
        window_height: (config.grid.rows as f32 * config.grid.cell_size + PANEL_HEIGHT) as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = config();

    let mut controller = Controller::from_config(config, MacroquadView::new(config));
    controller.build_grid(next_frame).await;

    let mut last_mouse = mouse_position();
    loop {
        let (mouse_x, mouse_y) = mouse_position();

        if is_mouse_button_pressed(MouseButton::Left) {
            match controller.view().command_at(mouse_x, mouse_y) {
                Some(event) => {
                    controller.fire(event);
                }
                None => controller.pointer_down(mouse_x, mouse_y),
            }
        }
        if (mouse_x, mouse_y) != last_mouse {
            controller.pointer_move(mouse_x, mouse_y);
            last_mouse = (mouse_x, mouse_y);
        }
        if is_mouse_button_released(MouseButton::Left) {
            controller.pointer_up();
        }

        let finder_keys = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4];
        for (key, kind) in finder_keys.into_iter().zip(FinderKind::ALL) {
            if is_key_pressed(key) {
                controller.select_finder(kind.build(config.search.heuristic, config.search.allow_diagonal));
            }
        }

        if is_key_pressed(KeyCode::C) {
            let layout = controller.grid().to_layout_string(controller.start(), controller.end());
            let status = copy_to_clipboard(&layout);
            set_status(&mut controller, status);
        }

        if is_key_pressed(KeyCode::T) {
            let status = match controller.last_trace() {
                Some(trace) => match trace.save_to_file(&config.logging.trace_path) {
                    Ok(()) => {
                        info!("Trace saved to {}", config.logging.trace_path);
                        format!("trace saved to {}", config.logging.trace_path)
                    }
                    Err(e) => {
                        warn!("Failed to save trace: {}", e);
                        "trace save failed".to_string()
                    }
                },
                None => "no search yet".to_string(),
            };
            set_status(&mut controller, status);
        }

        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        controller.advance(Duration::from_secs_f32(get_frame_time()));
        controller.view().draw(controller.finder_name());

        next_frame().await
    }
}

fn set_status(controller: &mut Controller<MacroquadView>, status: String) {
    controller.view_mut().status = status;
}

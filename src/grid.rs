use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Calculate Euclidean distance
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Walkability matrix the user edits and the finders search.
///
/// Cloning produces an independent copy, so a search can run on a snapshot
/// while the canonical grid stays editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
    cells: Vec<bool>,
}

/// Number of cells in a `cols` x `rows` grid, computed without `i32` overflow
fn cell_count(cols: i32, rows: i32) -> usize {
    cols.max(0) as usize * rows.max(0) as usize
}

impl Grid {
    /// Create a new grid with every cell walkable
    pub fn new(cols: i32, rows: i32) -> Self {
        let cols = cols.max(0);
        let rows = rows.max(0);
        Grid {
            cols,
            rows,
            cells: vec![true; cell_count(cols, rows)],
        }
    }

    /// Create a grid with specific blocked cells
    pub fn with_blocked(cols: i32, rows: i32, blocked: &[Position]) -> Self {
        let mut grid = Self::new(cols, rows);
        for pos in blocked {
            grid.set_walkable_at(pos.x, pos.y, false);
        }
        grid
    }

    /// Parse a layout drawn with `■`/`#` for walls and anything else for
    /// free cells. Rows shorter than the first one are padded as free.
    pub fn from_layout(layout: &str) -> Self {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let cols = lines.first().map_or(0, |l| l.chars().count()) as i32;
        let mut grid = Self::new(cols, lines.len() as i32);

        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                if ch == '■' || ch == '#' {
                    grid.set_walkable_at(x as i32, y as i32, false);
                }
            }
        }
        grid
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y)
            .then(|| x as usize + y as usize * self.cols as usize)
    }

    /// Out of bounds is reported as not walkable
    pub fn is_walkable_at(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    /// Writes outside the grid are ignored
    pub fn set_walkable_at(&mut self, x: i32, y: i32, walkable: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = walkable;
        }
    }

    /// Walkable 4-neighbours, plus diagonals when `allow_diagonal` is set.
    ///
    /// A diagonal step is only offered when both orthogonal cells it passes
    /// between are walkable.
    pub fn neighbors(&self, pos: Position, allow_diagonal: bool) -> Vec<Position> {
        let Position { x, y } = pos;
        let mut result = Vec::with_capacity(8);

        let up = self.is_walkable_at(x, y - 1);
        let right = self.is_walkable_at(x + 1, y);
        let down = self.is_walkable_at(x, y + 1);
        let left = self.is_walkable_at(x - 1, y);

        if up {
            result.push(Position::new(x, y - 1));
        }
        if right {
            result.push(Position::new(x + 1, y));
        }
        if down {
            result.push(Position::new(x, y + 1));
        }
        if left {
            result.push(Position::new(x - 1, y));
        }

        if !allow_diagonal {
            return result;
        }

        if up && left && self.is_walkable_at(x - 1, y - 1) {
            result.push(Position::new(x - 1, y - 1));
        }
        if up && right && self.is_walkable_at(x + 1, y - 1) {
            result.push(Position::new(x + 1, y - 1));
        }
        if down && right && self.is_walkable_at(x + 1, y + 1) {
            result.push(Position::new(x + 1, y + 1));
        }
        if down && left && self.is_walkable_at(x - 1, y + 1) {
            result.push(Position::new(x - 1, y + 1));
        }

        result
    }

    /// Render the grid as text: `S` start, `E` end, `■` wall, `□` free
    pub fn to_layout_string(&self, start: Position, end: Position) -> String {
        let mut result = String::new();

        for y in 0..self.rows {
            for x in 0..self.cols {
                let pos = Position::new(x, y);
                let symbol = if pos == start {
                    'S'
                } else if pos == end {
                    'E'
                } else if !self.is_walkable_at(x, y) {
                    '■'
                } else {
                    '□'
                };
                result.push(symbol);
            }
            result.push('\n');
        }

        result
    }
}

use crate::grid::Position;

/// Converts between pointer (page) coordinates and grid cells for a fixed
/// cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMapper {
    pub cell_size: f32,
}

impl CellMapper {
    pub fn new(cell_size: f32) -> Self {
        CellMapper { cell_size }
    }

    /// Floor division, so points left of or above the origin map to negative cells
    pub fn to_grid_coordinate(&self, page_x: f32, page_y: f32) -> Position {
        Position::new(
            (page_x / self.cell_size).floor() as i32,
            (page_y / self.cell_size).floor() as i32,
        )
    }

    /// Top-left corner of the cell
    pub fn to_page_coordinate(&self, grid_x: i32, grid_y: i32) -> (f32, f32) {
        (grid_x as f32 * self.cell_size, grid_y as f32 * self.cell_size)
    }

    pub fn cell_center(&self, pos: Position) -> (f32, f32) {
        let (x, y) = self.to_page_coordinate(pos.x, pos.y);
        let half = self.cell_size / 2.0;
        (x + half, y + half)
    }
}

use crate::{ constants::CELL_ASPECT, error::Clipped, math::Vec2 };

/// A character cell on the grid surface, origin in the upper left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

/// Maps simulation coordinates (origin lower left, y up) onto the grid (origin upper left, rows down).
/// All math stays in simulation coordinates until the moment of clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    pub x_scale: f64,
}

impl Default for GridTransform {
    fn default() -> Self {
        GridTransform { x_scale: CELL_ASPECT }
    }
}

impl GridTransform {
    pub fn new(x_scale: f64) -> Self {
        GridTransform { x_scale }
    }

    /// Pure translation, no scaling
    pub fn to_grid(pos: Vec2, off: Option<Vec2>) -> Vec2 {
        match off {
            Some(off) => pos + off,
            None => pos,
        }
    }

    /// Clips `pos` against a `(rows, cols)` surface and flips it to screen rows
    pub fn clip(&self, size: (usize, usize), pos: Vec2) -> Result<GridCell, Clipped> {
        let (rows, cols) = size;
        let col = (pos.x * self.x_scale).floor();
        let sim_row = pos.y.floor();

        // NaN fails every comparison, so it clips too
        let inside = sim_row >= 0.0 && sim_row < rows as f64 && col >= 0.0 && col < cols as f64;
        if !inside {
            return Err(Clipped { pos, rows, cols })
        }

        Ok(GridCell { row: rows - 1 - sim_row as usize, col: col as usize })
    }

    pub fn try_clip(&self, size: (usize, usize), pos: Vec2) -> Option<GridCell> {
        self.clip(size, pos).ok()
    }
}

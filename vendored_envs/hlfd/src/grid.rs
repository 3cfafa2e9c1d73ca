use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::HlfdError;
use crate::types::{ObjectKind, Pos};

/// Fixed-size 2-D array of optional occupants, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Option<Cell>>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Result<Self, HlfdError> {
        if width < 3 || height < 3 {
            return Err(HlfdError::Config(format!("grid must be at least 3x3, got {width}x{height}")));
        }
        Ok(Self { width, height, cells: vec![None; (width * height) as usize] })
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// True for cells strictly inside the border.
    #[inline]
    pub fn is_interior(&self, (x, y): Pos) -> bool {
        x > 0 && y > 0 && x < self.width - 1 && y < self.height - 1
    }

    fn idx(&self, x: i32, y: i32) -> Result<usize, HlfdError> {
        if !self.in_bounds(x, y) {
            return Err(HlfdError::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        Ok((y * self.width + x) as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Option<Cell>, HlfdError> {
        Ok(self.cells[self.idx(x, y)?])
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Option<Cell>) -> Result<(), HlfdError> {
        let i = self.idx(x, y)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Row of `cell` starting at `(x, y)`; `None` runs to the right edge.
    pub fn horz_wall(&mut self, x: i32, y: i32, length: Option<i32>, cell: Cell) -> Result<(), HlfdError> {
        let length = length.unwrap_or(self.width - x);
        for i in 0..length {
            self.set(x + i, y, Some(cell))?;
        }
        Ok(())
    }

    /// Column of `cell` starting at `(x, y)`; `None` runs to the bottom edge.
    pub fn vert_wall(&mut self, x: i32, y: i32, length: Option<i32>, cell: Cell) -> Result<(), HlfdError> {
        let length = length.unwrap_or(self.height - y);
        for j in 0..length {
            self.set(x, y + j, Some(cell))?;
        }
        Ok(())
    }

    /// Rectangle outline of walls.
    pub fn wall_rect(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), HlfdError> {
        self.horz_wall(x, y, Some(w), Cell::Wall)?;
        self.horz_wall(x, y + h - 1, Some(w), Cell::Wall)?;
        self.vert_wall(x, y, Some(h), Cell::Wall)?;
        self.vert_wall(x + w - 1, y, Some(h), Cell::Wall)?;
        Ok(())
    }

    /// Full-grid encoding as `[h][w][3]`; empty cells use the empty id.
    pub fn encode(&self) -> Vec<Vec<[u8; 3]>> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| {
                row.iter()
                    .map(|c| c.map_or([ObjectKind::Empty as u8, 0, 0], |c| c.encode()))
                    .collect()
            })
            .collect()
    }
}

//! Partial, forward-facing view of the grid.
//!
//! The view is a `size x size` window in the agent's frame: the agent sits
//! at the bottom-centre cell `(size / 2, size - 1)`, "forward" points up
//! (decreasing row) and the agent's right-hand side points right. Cells off
//! the grid block sight like walls but are always encoded as unseen.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::grid::Grid;
use crate::types::{Direction, ObjectKind, Pos};

pub const UNSEEN: [u8; 3] = [ObjectKind::Unseen as u8, 0, 0];
pub const EMPTY: [u8; 3] = [ObjectKind::Empty as u8, 0, 0];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// `[row][col][object, color, state]`, `view_size x view_size`.
    pub image: Vec<Vec<[u8; 3]>>,
    pub direction: u8,
    pub agent_pos: Pos,
    pub goal_pos: Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    OffGrid,
    OnGrid(Option<Cell>),
}

impl Slot {
    fn see_behind(self) -> bool {
        match self {
            Slot::OffGrid => false,
            Slot::OnGrid(None) => true,
            Slot::OnGrid(Some(c)) => c.see_behind(),
        }
    }
}

/// Cells in the agent's view plus the visibility mask over them.
#[derive(Debug, Clone)]
pub struct View {
    size: usize,
    slots: Vec<Slot>,
    mask: Vec<bool>,
}

impl View {
    /// Collects the window in front of `agent_pos`. The agent's own cell shows
    /// what it carries, or nothing.
    pub fn new(grid: &Grid, agent_pos: Pos, dir: Direction, carrying: Option<Cell>, size: usize) -> Self {
        let n = size as i32;
        let (fx, fy) = dir.delta();
        let (rx, ry) = dir.right_vec();
        let mut slots = Vec::with_capacity(size * size);
        for j in 0..n {
            for i in 0..n {
                let ahead = n - 1 - j;
                let side = i - n / 2;
                let x = agent_pos.0 + fx * ahead + rx * side;
                let y = agent_pos.1 + fy * ahead + ry * side;
                let slot = match grid.get(x, y) {
                    Ok(cell) => Slot::OnGrid(cell),
                    Err(_) => Slot::OffGrid,
                };
                slots.push(slot);
            }
        }
        let mut view = Self { size, slots, mask: vec![false; size * size] };
        let agent = view.agent_index();
        view.slots[agent] = Slot::OnGrid(carrying);
        view
    }

    pub fn size(&self) -> usize { self.size }

    fn agent_index(&self) -> usize {
        (self.size - 1) * self.size + self.size / 2
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> usize {
        j * self.size + i
    }

    /// Marks every on-grid cell visible.
    pub fn reveal_all(&mut self) {
        for (m, slot) in self.mask.iter_mut().zip(&self.slots) {
            *m = *slot != Slot::OffGrid;
        }
    }

    /// Sweeps rows from the agent outward; sight passes through cells that
    /// can be seen behind, spreading sideways and one row further away.
    pub fn cast_visibility(&mut self) {
        let n = self.size;
        self.mask.iter_mut().for_each(|m| *m = false);
        let agent = self.agent_index();
        self.mask[agent] = true;

        for j in (0..n).rev() {
            for i in 0..n - 1 {
                let k = self.at(i, j);
                if !self.mask[k] || !self.slots[k].see_behind() {
                    continue;
                }
                let right = self.at(i + 1, j);
                self.mask[right] = true;
                if j > 0 {
                    let up_right = self.at(i + 1, j - 1);
                    let up = self.at(i, j - 1);
                    self.mask[up_right] = true;
                    self.mask[up] = true;
                }
            }
            for i in (1..n).rev() {
                let k = self.at(i, j);
                if !self.mask[k] || !self.slots[k].see_behind() {
                    continue;
                }
                let left = self.at(i - 1, j);
                self.mask[left] = true;
                if j > 0 {
                    let up_left = self.at(i - 1, j - 1);
                    let up = self.at(i, j - 1);
                    self.mask[up_left] = true;
                    self.mask[up] = true;
                }
            }
        }
    }

    pub fn is_visible(&self, i: usize, j: usize) -> bool {
        self.mask[self.at(i, j)]
    }

    pub fn encode(&self) -> Vec<Vec<[u8; 3]>> {
        (0..self.size)
            .map(|j| {
                (0..self.size)
                    .map(|i| {
                        let k = self.at(i, j);
                        match self.slots[k] {
                            _ if !self.mask[k] => UNSEEN,
                            Slot::OffGrid => UNSEEN,
                            Slot::OnGrid(None) => EMPTY,
                            Slot::OnGrid(Some(cell)) => cell.encode(),
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Observation encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    pub view_size: usize,
    pub see_through_walls: bool,
}

impl Encoder {
    pub fn view(&self, grid: &Grid, agent_pos: Pos, dir: Direction, carrying: Option<Cell>) -> View {
        let mut view = View::new(grid, agent_pos, dir, carrying, self.view_size);
        if self.see_through_walls {
            view.reveal_all();
        } else {
            view.cast_visibility();
        }
        view
    }

    pub fn encode(
        &self,
        grid: &Grid,
        agent_pos: Pos,
        dir: Direction,
        carrying: Option<Cell>,
        goal_pos: Pos,
    ) -> Observation {
        let view = self.view(grid, agent_pos, dir, carrying);
        Observation { image: view.encode(), direction: dir as u8, agent_pos, goal_pos }
    }
}

//! Random placement of the agent and of single objects inside a region.

use std::fmt;

use rand::{Rng, RngCore};

use crate::error::HlfdError;
use crate::grid::Grid;
use crate::types::{Direction, Pos};

/// Rectangular search area: top-left corner and size, clipped to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub top: Pos,
    pub size: (i32, i32),
}

impl Region {
    pub fn new(top: Pos, size: (i32, i32)) -> Self {
        Self { top, size }
    }

    /// Single column `x`, rows `1..height-1`.
    pub fn interior_column(x: i32, height: i32) -> Self {
        Self { top: (x, 1), size: (1, height - 2) }
    }
}

pub trait Placer: fmt::Debug + Send + Sync {
    /// Picks an empty cell in `region` that `reject` does not refuse.
    fn place(
        &self,
        grid: &Grid,
        region: Region,
        reject: &dyn Fn(Pos) -> bool,
        rng: &mut dyn RngCore,
    ) -> Result<Pos, HlfdError>;

    /// Picks an agent start in `region` plus a random heading.
    fn place_agent(&self, grid: &Grid, region: Region, rng: &mut dyn RngCore) -> Result<(Pos, Direction), HlfdError> {
        let pos = self.place(grid, region, &|_| false, rng)?;
        let dir = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        Ok((pos, dir))
    }
}

/// Uniform rejection sampling over the region.
#[derive(Debug, Clone, Copy)]
pub struct RejectionPlacer {
    pub max_tries: u32,
}

impl Default for RejectionPlacer {
    fn default() -> Self {
        Self { max_tries: 10_000 }
    }
}

impl Placer for RejectionPlacer {
    fn place(
        &self,
        grid: &Grid,
        region: Region,
        reject: &dyn Fn(Pos) -> bool,
        rng: &mut dyn RngCore,
    ) -> Result<Pos, HlfdError> {
        let (tx, ty) = (region.top.0.max(0), region.top.1.max(0));
        let bx = (region.top.0 + region.size.0).min(grid.width());
        let by = (region.top.1 + region.size.1).min(grid.height());
        if tx >= bx || ty >= by {
            return Err(HlfdError::Config(format!("empty placement region {region:?}")));
        }
        for _ in 0..self.max_tries {
            let pos = (rng.gen_range(tx..bx), rng.gen_range(ty..by));
            if grid.get(pos.0, pos.1)?.is_some() || reject(pos) {
                continue;
            }
            return Ok(pos);
        }
        tracing::warn!(?region, tries = self.max_tries, "placement budget exhausted");
        Err(HlfdError::PlacementFailed { tries: self.max_tries })
    }
}
